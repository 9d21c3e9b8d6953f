use async_trait::async_trait;
use std::path::PathBuf;
use tracing::warn;

use crate::error::BackupError;

#[async_trait]
pub trait Backup: Send + Sync {
    /// HTTPクライアントとクッキーストアを準備
    async fn initialize(&mut self) -> Result<(), BackupError>;

    /// ログイン実行（トークン取得 → 認証POST）
    async fn login(&mut self) -> Result<(), BackupError>;

    /// エクスポートファイルをダウンロードして保存
    async fn download(&mut self) -> Result<PathBuf, BackupError>;

    /// リソース解放（クッキーストア削除）
    async fn close(&mut self) -> Result<(), BackupError>;

    /// 一括実行（initialize → login → download → close）
    ///
    /// 途中で失敗してもcloseは必ず実行する。
    async fn execute(&mut self) -> Result<PathBuf, BackupError> {
        let result = async {
            self.initialize().await?;
            self.login().await?;
            self.download().await
        }
        .await;

        if let Err(e) = self.close().await {
            warn!("リソース解放に失敗: {}", e);
        }

        result
    }
}
