//! 検査シートのファイル読み書き
//!
//! 対応フォーマット:
//! - CSV: セミコロン区切り、ヘッダ名でマッチング
//! - Excel: .xlsx、先頭シートのみ、列位置でマッチング
//!
//! 保存はどちらも一時ファイルに書いてからリネームで置き換える

pub mod csv;
pub mod excel;

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::record::Record;

/// CSVヘッダおよびExcel列の並び順
///
/// 高さ列の「Hegth」は旧ツールの綴りをそのまま踏襲する
pub const COLUMNS: [&str; 6] = ["Name", "Distance", "Angle", "Width", "Hegth", "IsDefect"];

/// Excel書き出し時のシート名
pub const SHEET_NAME: &str = "Data";

/// 入出力フォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Excel,
}

impl FileFormat {
    /// 拡張子からフォーマットを判定する
    ///
    /// 大文字小文字は区別しない。対応外の拡張子はUnsupportedFormat
    pub fn from_path(path: &Path) -> Result<FileFormat> {
        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
        if extension.eq_ignore_ascii_case("csv") {
            Ok(FileFormat::Csv)
        } else if extension.eq_ignore_ascii_case("xlsx") {
            Ok(FileFormat::Excel)
        } else {
            Err(Error::UnsupportedFormat(path.display().to_string()))
        }
    }
}

/// 拡張子に応じたコーデックでファイルを読み込む
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    match FileFormat::from_path(path)? {
        FileFormat::Csv => csv::read_file(path),
        FileFormat::Excel => excel::read_file(path),
    }
}

/// 拡張子に応じたコーデックでファイルへ書き出す
pub fn save_records(records: &[Record], path: &Path) -> Result<()> {
    match FileFormat::from_path(path)? {
        FileFormat::Csv => csv::write_file(records, path),
        FileFormat::Excel => excel::write_file(records, path),
    }
}

/// 同じディレクトリの一時ファイルに書いてからリネームで置き換える
///
/// 途中で失敗しても書き込み前のファイルが残る
pub(crate) fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    let mut file = match parent {
        Some(dir) => NamedTempFile::new_in(dir)?,
        None => NamedTempFile::new_in(".")?,
    };
    file.write_all(bytes)?;
    file.persist(path).map_err(|err| Error::Io(err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_file_format_from_path() {
        let csv = FileFormat::from_path(Path::new("data.csv")).expect("CSV判定失敗");
        assert_eq!(csv, FileFormat::Csv);
        let excel = FileFormat::from_path(Path::new("data.xlsx")).expect("Excel判定失敗");
        assert_eq!(excel, FileFormat::Excel);
    }

    #[test]
    fn test_file_format_case_insensitive() {
        let upper = FileFormat::from_path(Path::new("DATA.XLSX")).expect("大文字拡張子判定失敗");
        assert_eq!(upper, FileFormat::Excel);
        let mixed = FileFormat::from_path(Path::new("data.Csv")).expect("混在拡張子判定失敗");
        assert_eq!(mixed, FileFormat::Csv);
    }

    #[test]
    fn test_file_format_unsupported() {
        let error = FileFormat::from_path(Path::new("data.txt"))
            .expect_err("対応外拡張子がエラーにならなかった");
        assert!(matches!(error, Error::UnsupportedFormat(_)));
        assert!(error.to_string().contains("data.txt"));
    }

    #[test]
    fn test_file_format_no_extension() {
        let error = FileFormat::from_path(Path::new("data"))
            .expect_err("拡張子なしがエラーにならなかった");
        assert!(matches!(error, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let dir = tempfile::tempdir().expect("一時ディレクトリ作成失敗");
        let path = dir.path().join("out.csv");
        std::fs::write(&path, b"old").expect("既存ファイル作成失敗");

        atomic_write(&path, b"new contents").expect("書き込み失敗");

        let written = std::fs::read(&path).expect("読み戻し失敗");
        assert_eq!(written, b"new contents");

        // 一時ファイルが残っていないこと
        let leftovers: Vec<PathBuf> = std::fs::read_dir(dir.path())
            .expect("ディレクトリ走査失敗")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p != &path)
            .collect();
        assert!(leftovers.is_empty(), "一時ファイルが残っている: {leftovers:?}");
    }

    #[test]
    fn test_atomic_write_missing_dir() {
        let dir = tempfile::tempdir().expect("一時ディレクトリ作成失敗");
        let path = dir.path().join("missing").join("out.csv");
        let error = atomic_write(&path, b"data").expect_err("存在しない親でもエラーにならなかった");
        assert!(matches!(error, Error::Io(_)));
    }
}
