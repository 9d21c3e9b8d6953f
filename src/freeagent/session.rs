//! セッションクッキーストア
//!
//! 1回の実行ごとに作成し、終了時に必ず削除する一時リソース。
//! ログイン応答のSet-Cookieを取り込み、以降の全リクエストに付与する。

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use reqwest::header::{HeaderMap, SET_COOKIE};
use tracing::debug;

/// 実行スコープのクッキーストア
///
/// メモリ上のname/valueペアが本体で、状態は一時ファイルにも
/// 書き出す。ファイルは`remove`（またはdrop）で削除される。
pub struct SessionJar {
    path: PathBuf,
    cookies: Vec<(String, String)>,
}

impl SessionJar {
    /// 一時ディレクトリにユニークな名前のクッキーファイルを作成
    pub fn create() -> std::io::Result<Self> {
        let unique_id = format!(
            "{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );
        let path = std::env::temp_dir().join(format!("freeagent-cookies-{}", unique_id));
        fs::File::create(&path)?;
        debug!("クッキーストア作成: {:?}", path);

        Ok(Self {
            path,
            cookies: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 応答ヘッダのSet-Cookieを取り込む
    ///
    /// 同名クッキーは上書き。属性（Path, Expiresなど）は保持しない。
    pub fn absorb(&mut self, headers: &HeaderMap) -> std::io::Result<()> {
        for value in headers.get_all(SET_COOKIE) {
            let raw = match value.to_str() {
                Ok(s) => s,
                Err(_) => continue,
            };
            let pair = raw.split(';').next().unwrap_or("").trim();
            let (name, value) = match pair.split_once('=') {
                Some((n, v)) if !n.is_empty() => (n.to_string(), v.to_string()),
                _ => continue,
            };

            if let Some(entry) = self.cookies.iter_mut().find(|(n, _)| *n == name) {
                entry.1 = value;
            } else {
                self.cookies.push((name, value));
            }
        }

        self.persist()
    }

    /// リクエストに付与するCookieヘッダ値
    pub fn header_value(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(n, v)| format!("{}={}", n, v))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// 現在の状態を一時ファイルへ書き出す
    fn persist(&self) -> std::io::Result<()> {
        let mut file = fs::File::create(&self.path)?;
        for (name, value) in &self.cookies {
            writeln!(file, "{}\t{}", name, value)?;
        }
        Ok(())
    }

    /// クッキーファイルを削除（存在しなければ何もしない）
    pub fn remove(&mut self) -> std::io::Result<()> {
        self.cookies.clear();
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            debug!("クッキーストア削除: {:?}", self.path);
        }
        Ok(())
    }
}

impl Drop for SessionJar {
    fn drop(&mut self) {
        // closeを通らない経路でもファイルを残さない
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers_with(cookies: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for c in cookies {
            headers.append(SET_COOKIE, HeaderValue::from_str(c).unwrap());
        }
        headers
    }

    #[test]
    fn test_absorb_strips_attributes() {
        let mut jar = SessionJar::create().unwrap();
        jar.absorb(&headers_with(&["_session=abc123; path=/; HttpOnly"]))
            .unwrap();

        assert_eq!(jar.header_value().unwrap(), "_session=abc123");
        jar.remove().unwrap();
    }

    #[test]
    fn test_absorb_overwrites_same_name_and_keeps_order() {
        let mut jar = SessionJar::create().unwrap();
        jar.absorb(&headers_with(&["a=1", "b=2"])).unwrap();
        jar.absorb(&headers_with(&["a=9"])).unwrap();

        assert_eq!(jar.header_value().unwrap(), "a=9; b=2");
        jar.remove().unwrap();
    }

    #[test]
    fn test_empty_jar_has_no_header() {
        let mut jar = SessionJar::create().unwrap();
        assert!(jar.header_value().is_none());
        jar.remove().unwrap();
    }

    #[test]
    fn test_remove_deletes_file() {
        let mut jar = SessionJar::create().unwrap();
        let path = jar.path().to_path_buf();
        assert!(path.exists());

        jar.remove().unwrap();
        assert!(!path.exists());

        // 二重削除してもエラーにならない
        jar.remove().unwrap();
    }

    #[test]
    fn test_drop_deletes_file() {
        let jar = SessionJar::create().unwrap();
        let path = jar.path().to_path_buf();
        assert!(path.exists());

        drop(jar);
        assert!(!path.exists());
    }

    #[test]
    fn test_persist_writes_state() {
        let mut jar = SessionJar::create().unwrap();
        jar.absorb(&headers_with(&["_session=abc"])).unwrap();

        let contents = std::fs::read_to_string(jar.path()).unwrap();
        assert_eq!(contents, "_session\tabc\n");
        jar.remove().unwrap();
    }
}
