//! FreeAgent バックアップモジュール
//!
//! ログインフォーム経由で認証し、会社データのエクスポートファイルを取得する

mod scraper;
mod session;

pub use scraper::FreeagentBackup;
pub use session::SessionJar;
