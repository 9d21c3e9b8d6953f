//! FreeAgent バックアップ実装
//!
//! ログインフォームからauthenticity_tokenを取り出し、認証POSTの後に
//! エクスポートファイルを取得する。3リクエスト直列の1本道で、
//! リトライはしない。

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use async_trait::async_trait;
use chrono::Local;
use regex::Regex;
use reqwest::header::COOKIE;
use reqwest::{redirect, Client, StatusCode};
use tracing::{debug, info};

use crate::archive;
use crate::config::BackupConfig;
use crate::error::BackupError;
use crate::traits::Backup;

use super::session::SessionJar;

const LOGIN_PATH: &str = "login";
const SESSIONS_PATH: &str = "sessions";
const EXPORT_PATH: &str = "company/export.xls";

/// ログインフォームの隠しフィールドからトークンを抜き出す
///
/// 属性の並び順は固定。最初にマッチした値だけを使う。
/// （並び順に依存しない緩いパーサーは意図的に採用していない）
fn extract_login_token(body: &str) -> Result<String, BackupError> {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    let re = TOKEN_RE.get_or_init(|| {
        Regex::new(r#"name="authenticity_token" type="hidden" value="([^"]+)""#)
            .expect("invalid token pattern")
    });

    re.captures(body)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| {
            BackupError::TokenNotFound("authenticity_tokenフィールドがありません".into())
        })
}

/// FreeAgent バックアップワークフロー
pub struct FreeagentBackup {
    config: BackupConfig,
    client: Option<Client>,
    jar: Option<SessionJar>,
}

impl FreeagentBackup {
    pub fn new(config: BackupConfig) -> Self {
        Self {
            config,
            client: None,
            jar: None,
        }
    }

    fn client(&self) -> Result<&Client, BackupError> {
        self.client.as_ref().ok_or(BackupError::NotInitialized)
    }

    fn jar(&self) -> Result<&SessionJar, BackupError> {
        self.jar.as_ref().ok_or(BackupError::NotInitialized)
    }

    fn jar_mut(&mut self) -> Result<&mut SessionJar, BackupError> {
        self.jar.as_mut().ok_or(BackupError::NotInitialized)
    }

    /// クッキーを付与してGET
    async fn get(&self, url: &str) -> Result<reqwest::Response, BackupError> {
        let mut request = self.client()?.get(url);
        if let Some(cookie) = self.jar()?.header_value() {
            request = request.header(COOKIE, cookie);
        }
        Ok(request.send().await?)
    }

    /// ログインページを取得してトークンを抜き出す
    async fn fetch_login_token(&mut self) -> Result<String, BackupError> {
        let url = format!("{}{}", self.config.url, LOGIN_PATH);
        let response = self.get(&url).await?;

        // ログインページが返すクッキーも認証POSTに引き継ぐ
        self.jar_mut()?.absorb(response.headers())?;

        let body = response.text().await?;
        let token = extract_login_token(&body)?;
        debug!("ログイントークン取得完了");

        Ok(token)
    }

    /// 認証フォームをPOSTする
    ///
    /// 成功判定はHTTP 302のみ。200はフォーム再表示（認証失敗）とみなし、
    /// 本文は一切見ない。
    async fn submit_login_form(&mut self, token: &str) -> Result<(), BackupError> {
        let url = format!("{}{}", self.config.url, SESSIONS_PATH);

        let mut request = self.client()?.post(&url).form(&[
            ("authenticity_token", token),
            ("email", self.config.username.as_str()),
            ("password", self.config.password.as_str()),
        ]);
        if let Some(cookie) = self.jar()?.header_value() {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status();
        self.jar_mut()?.absorb(response.headers())?;

        if status != StatusCode::FOUND {
            return Err(BackupError::LoginFailed(format!(
                "HTTP {} (302リダイレクトではありません)",
                status.as_u16()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Backup for FreeagentBackup {
    async fn initialize(&mut self) -> Result<(), BackupError> {
        info!("セッション初期化中...");

        // 302を成功シグナルとして観測するため、リダイレクトは追跡しない
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .connect_timeout(self.config.timeout)
            .build()?;

        self.client = Some(client);
        self.jar = Some(SessionJar::create()?);

        info!("セッション初期化完了");
        Ok(())
    }

    async fn login(&mut self) -> Result<(), BackupError> {
        info!("ログイン処理開始...");

        let token = self.fetch_login_token().await?;
        self.submit_login_form(&token).await?;

        info!("ログイン完了");
        Ok(())
    }

    async fn download(&mut self) -> Result<PathBuf, BackupError> {
        info!("エクスポートダウンロード開始...");

        let url = format!("{}{}", self.config.url, EXPORT_PATH);
        let response = self.get(&url).await?;
        let status = response.status();

        // ログインと同じく302のみを成功とみなす。200で本文が届いていても
        // 失敗として扱い、ファイルは書き込まない。
        if status != StatusCode::FOUND {
            return Err(BackupError::ExportFailed(format!(
                "HTTP {} (302リダイレクトではありません)",
                status.as_u16()
            )));
        }

        let payload = response.bytes().await?;
        debug!("ペイロード受信: {}bytes", payload.len());

        fs::create_dir_all(&self.config.download_folder)?;

        let path = if self.config.zip_and_date {
            archive::write_zip(
                &self.config.download_folder,
                &self.config.download_filename,
                &payload,
                Local::now(),
            )?
        } else {
            archive::write_raw(
                &self.config.download_folder,
                &self.config.download_filename,
                &payload,
            )?
        };

        info!("エクスポートダウンロード完了: {:?}", path);
        Ok(path)
    }

    async fn close(&mut self) -> Result<(), BackupError> {
        if let Some(mut jar) = self.jar.take() {
            jar.remove()?;
        }
        self.client = None;

        debug!("セッション終了");
        Ok(())
    }
}
