//! 運用者へのメール通知
//!
//! 送信はsendmailに委譲するfire-and-forget方式。送信失敗はログに残すだけで
//! バックアップ結果には影響させない。

use async_trait::async_trait;
use chrono::Local;
use lettre::message::Mailbox;
use lettre::{Message, SendmailTransport, Transport};
use tracing::{debug, warn};

pub const SUCCESS_SUBJECT: &str = "FreeAgent backup complete";
pub const FAILURE_SUBJECT: &str = "FreeAgent backup FAILED";

/// 成功通知の本文
pub fn success_body() -> String {
    format!(
        "バックアップ完了: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}

/// 失敗通知の本文（エラー内容をそのまま埋め込む）
pub fn failure_body(detail: &str) -> String {
    format!(
        "バックアップ失敗: {}\n{}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        detail
    )
}

/// 通知送信のシーム
///
/// 配送確認はしない。失敗は実装側でログに残す。
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str);
}

/// sendmail経由で送信するNotifier
///
/// FromとReply-Toは宛先と同じアドレスを設定する。
#[derive(Debug, Clone, Default)]
pub struct SendmailNotifier;

impl SendmailNotifier {
    pub fn new() -> Self {
        Self
    }

    fn build_message(to: &str, subject: &str, body: &str) -> Result<Message, String> {
        let mailbox: Mailbox = to.parse().map_err(|e| format!("宛先が不正です: {}", e))?;

        Message::builder()
            .from(mailbox.clone())
            .reply_to(mailbox.clone())
            .to(mailbox)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl Notifier for SendmailNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) {
        let message = match Self::build_message(to, subject, body) {
            Ok(m) => m,
            Err(e) => {
                warn!("通知メール作成失敗: {}", e);
                return;
            }
        };

        let result = tokio::task::spawn_blocking(move || {
            let transport = SendmailTransport::new();
            transport.send(&message)
        })
        .await;

        match result {
            Ok(Ok(())) => debug!("通知メール送信完了: subject={}", subject),
            Ok(Err(e)) => warn!("通知メール送信失敗: {}", e),
            Err(e) => warn!("通知メール送信タスク異常終了: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_message_sets_from_and_reply_to() {
        let message =
            SendmailNotifier::build_message("ops@example.com", SUCCESS_SUBJECT, "body").unwrap();
        let headers = format!("{:?}", message.headers());

        assert!(headers.contains("ops@example.com"));
        assert!(headers.contains(SUCCESS_SUBJECT));
    }

    #[test]
    fn test_build_message_rejects_bad_address() {
        assert!(SendmailNotifier::build_message("not an address", "s", "b").is_err());
    }

    #[test]
    fn test_failure_body_embeds_detail() {
        let body = failure_body("ログイン失敗: HTTP 200");
        assert!(body.contains("ログイン失敗: HTTP 200"));
    }
}
