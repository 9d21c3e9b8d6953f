use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use serde::Serialize;
use tower::Service;
use tracing::info;

use crate::config::BackupConfig;
use crate::error::BackupError;
use crate::freeagent::FreeagentBackup;
use crate::notify::{self, Notifier, SendmailNotifier};
use crate::traits::Backup;

/// バックアップリクエスト
#[derive(Debug, Clone)]
pub struct BackupRequest {
    pub url: String,
    pub username: String,
    pub password: String,
    pub notify_email: String,
    pub notify_on_success: bool,
    pub notify_on_failure: bool,
    pub download_filename: String,
    pub download_folder: PathBuf,
    pub zip_and_date: bool,
}

impl BackupRequest {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let defaults = BackupConfig::default();
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            notify_email: defaults.notify_email,
            notify_on_success: defaults.notify_on_success,
            notify_on_failure: defaults.notify_on_failure,
            download_filename: defaults.download_filename,
            download_folder: defaults.download_folder,
            zip_and_date: defaults.zip_and_date,
        }
    }

    pub fn with_notify_email(mut self, email: impl Into<String>) -> Self {
        self.notify_email = email.into();
        self
    }

    pub fn with_notify_on_success(mut self, notify: bool) -> Self {
        self.notify_on_success = notify;
        self
    }

    pub fn with_notify_on_failure(mut self, notify: bool) -> Self {
        self.notify_on_failure = notify;
        self
    }

    pub fn with_download_filename(mut self, filename: impl Into<String>) -> Self {
        self.download_filename = filename.into();
        self
    }

    pub fn with_download_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.download_folder = folder.into();
        self
    }

    pub fn with_zip_and_date(mut self, zip_and_date: bool) -> Self {
        self.zip_and_date = zip_and_date;
        self
    }
}

impl From<BackupRequest> for BackupConfig {
    fn from(req: BackupRequest) -> Self {
        BackupConfig {
            url: req.url,
            username: req.username,
            password: req.password,
            notify_email: req.notify_email,
            notify_on_success: req.notify_on_success,
            notify_on_failure: req.notify_on_failure,
            download_filename: req.download_filename,
            download_folder: req.download_folder,
            zip_and_date: req.zip_and_date,
            ..Default::default()
        }
    }
}

/// バックアップ結果
#[derive(Debug, Serialize)]
pub struct BackupResult {
    /// 書き込んだファイルのパス
    pub artifact_path: PathBuf,
    /// ZIPモード時のアーカイブ名
    pub archive_name: Option<String>,
    /// 書き込んだバイト数
    pub artifact_size: u64,
}

impl BackupResult {
    pub fn new(artifact_path: PathBuf, zip_and_date: bool) -> std::io::Result<Self> {
        let artifact_size = std::fs::metadata(&artifact_path)?.len();
        let archive_name = if zip_and_date {
            artifact_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        } else {
            None
        };

        Ok(Self {
            artifact_path,
            archive_name,
            artifact_size,
        })
    }
}

/// tower::Serviceを実装したバックアップサービス
///
/// 実行と通知ディスパッチをまとめる。通知は1回の実行につき最大1通。
#[derive(Clone)]
pub struct BackupService {
    notifier: Arc<dyn Notifier>,
}

impl BackupService {
    pub fn new() -> Self {
        Self {
            notifier: Arc::new(SendmailNotifier::new()),
        }
    }

    /// テストや別トランスポート用にNotifierを差し替える
    pub fn with_notifier(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

impl Default for BackupService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<BackupRequest> for BackupService {
    type Response = BackupResult;
    type Error = BackupError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: BackupRequest) -> Self::Future {
        info!("バックアップリクエスト受信: url={}", req.url);
        let notifier = self.notifier.clone();

        Box::pin(async move {
            let config: BackupConfig = req.into();
            let notify_email = config.notify_email.clone();
            let notify_on_success = config.notify_on_success;
            let notify_on_failure = config.notify_on_failure;
            let zip_and_date = config.zip_and_date;

            let mut backup = FreeagentBackup::new(config);

            match backup.execute().await {
                Ok(path) => {
                    if notify_on_success {
                        notifier
                            .send(&notify_email, notify::SUCCESS_SUBJECT, &notify::success_body())
                            .await;
                    }

                    let result = BackupResult::new(path, zip_and_date)?;
                    info!(
                        "バックアップ完了: path={:?}, size={}bytes",
                        result.artifact_path, result.artifact_size
                    );
                    Ok(result)
                }
                Err(e) => {
                    // 認証・エクスポート段階の失敗は、呼び出し元に返す前に通知する
                    if notify_on_failure && e.is_notifiable() {
                        notifier
                            .send(
                                &notify_email,
                                notify::FAILURE_SUBJECT,
                                &notify::failure_body(&e.to_string()),
                            )
                            .await;
                    }
                    Err(e)
                }
            }
        })
    }
}
