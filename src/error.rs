use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("ログイントークンが見つかりません: {0}")]
    TokenNotFound(String),

    #[error("ログイン失敗: {0}")]
    LoginFailed(String),

    #[error("エクスポート取得失敗: {0}")]
    ExportFailed(String),

    #[error("ZIPアーカイブ作成エラー: {0}")]
    ArchiveCreation(String),

    #[error("通信エラー: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("ファイル操作エラー: {0}")]
    FileIO(#[from] std::io::Error),

    #[error("セッションが初期化されていません")]
    NotInitialized,
}

impl BackupError {
    /// 失敗通知メールの対象になるエラーか
    ///
    /// 認証・エクスポート段階の失敗のみ通知する。
    /// ダウンロード成功後の保存段階の失敗は通知しない。
    pub fn is_notifiable(&self) -> bool {
        !matches!(self, Self::ArchiveCreation(_) | Self::FileIO(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_are_notifiable() {
        assert!(BackupError::TokenNotFound("login".into()).is_notifiable());
        assert!(BackupError::LoginFailed("status 200".into()).is_notifiable());
        assert!(BackupError::ExportFailed("status 200".into()).is_notifiable());
    }

    #[test]
    fn test_materialization_errors_are_not_notifiable() {
        assert!(!BackupError::ArchiveCreation("open".into()).is_notifiable());
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(!BackupError::FileIO(io).is_notifiable());
    }
}
