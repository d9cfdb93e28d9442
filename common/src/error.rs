//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// ファイルが無い・開けない・書けないなどのOSレベルの失敗
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSVヘッダに必須列が足りない。不足列名をカンマ区切りで持つ
    #[error("Header mismatch: missing columns: {0}")]
    HeaderMismatch(String),

    /// 内容が期待した形式と一致しない
    #[error("Format error: {0}")]
    Format(String),

    /// レコードが1件も無い状態で保存しようとした
    #[error("No data to save")]
    NoData,

    /// 対応していない拡張子
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// 保存先パスが未設定
    #[error("No file path set")]
    PathNotSet,
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => Error::Io(io),
            _ => Error::Format(message),
        }
    }
}

impl From<calamine::XlsxError> for Error {
    fn from(err: calamine::XlsxError) -> Self {
        match err {
            calamine::XlsxError::Io(io) => Error::Io(io),
            other => Error::Format(other.to_string()),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        match err {
            rust_xlsxwriter::XlsxError::IoError(io) => Error::Io(io),
            other => Error::Format(other.to_string()),
        }
    }
}
