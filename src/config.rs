use std::path::PathBuf;
use std::time::Duration;

/// バックアップ設定
///
/// `url` と `download_folder` は末尾のスラッシュ/区切り文字まで含めて指定すること。
/// 一度構築したら変更しない（呼び出しごとに新しく構築する）。
#[derive(Debug, Clone)]
pub struct BackupConfig {
    /// 対象アカウントのベースURL (例: "https://yourcompany.freeagent.com/")
    pub url: String,
    /// ログインメールアドレス
    pub username: String,
    /// ログインパスワード
    pub password: String,
    /// 通知先メールアドレス
    pub notify_email: String,
    /// 成功時に通知する (デフォルト: false)
    pub notify_on_success: bool,
    /// 失敗時に通知する (デフォルト: true)
    pub notify_on_failure: bool,
    /// 保存ファイル名
    pub download_filename: String,
    /// 保存先ディレクトリ
    pub download_folder: PathBuf,
    /// ZIP化して日時付きファイル名で保存する (falseなら上書き保存)
    pub zip_and_date: bool,
    /// 接続確立タイムアウト
    pub timeout: Duration,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            password: String::new(),
            notify_email: String::new(),
            notify_on_success: false,
            notify_on_failure: true,
            download_filename: "freeagent-backup.xls".to_string(),
            download_folder: PathBuf::from("./backups"),
            zip_and_date: true,
            timeout: Duration::from_secs(30),
        }
    }
}

impl BackupConfig {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            ..Default::default()
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

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
