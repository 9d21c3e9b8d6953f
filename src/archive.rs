//! ダウンロードしたバイト列の保存処理
//!
//! ZIP化（日時付きファイル名、エントリは1件のみ）と上書き保存の2モード。

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::error::BackupError;

/// ZIPファイル名: `{filename} - YYYY-MM-DD HH-MM-SS.zip`
pub fn archive_name(filename: &str, stamp: DateTime<Local>) -> String {
    format!("{} - {}.zip", filename, stamp.format("%Y-%m-%d %H-%M-%S"))
}

/// ペイロードを1エントリのZIPにまとめて保存し、作成したファイルのパスを返す
pub fn write_zip(
    folder: &Path,
    filename: &str,
    payload: &[u8],
    stamp: DateTime<Local>,
) -> Result<PathBuf, BackupError> {
    let zip_path = folder.join(archive_name(filename, stamp));

    let file = fs::File::create(&zip_path)
        .map_err(|e| BackupError::ArchiveCreation(format!("{:?}: {}", zip_path, e)))?;
    let mut writer = ZipWriter::new(file);

    writer
        .start_file(filename, FileOptions::default())
        .map_err(|e| BackupError::ArchiveCreation(e.to_string()))?;
    writer
        .write_all(payload)
        .map_err(|e| BackupError::ArchiveCreation(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| BackupError::ArchiveCreation(e.to_string()))?;

    info!("ZIPアーカイブ作成完了: {:?}", zip_path);
    Ok(zip_path)
}

/// ペイロードをそのまま書き込む（既存ファイルは上書き）
pub fn write_raw(folder: &Path, filename: &str, payload: &[u8]) -> Result<PathBuf, BackupError> {
    let path = folder.join(filename);
    fs::write(&path, payload)?;

    info!("ファイル保存完了: {:?}", path);
    Ok(path)
}
