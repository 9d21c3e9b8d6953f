//! FreeAgentバックアップライブラリ
//!
//! ログインフォーム経由で認証し、会社データのエクスポートファイルを
//! ダウンロードしてバックアップする。ZIP化（日時付き）または上書き保存、
//! 結果のメール通知に対応。
//!
//! # サービス経由の使用例
//!
//! ```rust,ignore
//! use backup_service::{BackupRequest, BackupService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = BackupService::new();
//!
//!     let request = BackupRequest::new(
//!         "https://yourcompany.freeagent.com/",
//!         "user@example.com",
//!         "password",
//!     )
//!     .with_notify_email("ops@example.com")
//!     .with_download_folder("./backups");
//!
//!     let result = service.call(request).await.unwrap();
//!     println!("Backup saved: {:?}", result.artifact_path);
//! }
//! ```
//!
//! # ワークフロー直接実行の使用例
//!
//! ```rust,ignore
//! use backup_service::{Backup, BackupConfig, FreeagentBackup};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = BackupConfig::new(
//!         "https://yourcompany.freeagent.com/",
//!         "user@example.com",
//!         "password",
//!     )
//!     .with_zip_and_date(false);
//!
//!     let mut backup = FreeagentBackup::new(config);
//!     let path = backup.execute().await.unwrap();
//!     println!("Saved: {:?}", path);
//! }
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod freeagent;
pub mod notify;
pub mod service;
pub mod traits;

// 主要な型をリエクスポート
pub use config::BackupConfig;
pub use error::BackupError;
pub use freeagent::FreeagentBackup;
pub use notify::{Notifier, SendmailNotifier};
pub use service::{BackupRequest, BackupResult, BackupService};
pub use traits::Backup;
