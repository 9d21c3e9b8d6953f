use backup_service::{Backup, BackupConfig, FreeagentBackup};

#[tokio::main]
async fn main() {
    // ログ設定
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // 環境変数から認証情報を取得
    let url = std::env::var("FREEAGENT_URL")
        .expect("FREEAGENT_URL environment variable not set");
    let username = std::env::var("FREEAGENT_USERNAME")
        .expect("FREEAGENT_USERNAME environment variable not set");
    let password = std::env::var("FREEAGENT_PASSWORD")
        .expect("FREEAGENT_PASSWORD environment variable not set");

    let config = BackupConfig::new(&url, &username, &password)
        .with_download_folder("./backups");

    let mut backup = FreeagentBackup::new(config);

    println!("=== FreeAgent Backup Test ===");

    match backup.execute().await {
        Ok(path) => {
            println!("成功! 保存先: {:?}", path);
        }
        Err(e) => {
            eprintln!("エラー: {}", e);
        }
    }
}
