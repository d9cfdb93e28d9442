//! Kensa Sheet Common Library
//!
//! デスクトップシェルと共有される型とファイル入出力:
//! - record: レコード型と変更通知つき集合
//! - codec: CSV / Excel の読み書き
//! - session: ファイルセッション（開く・保存の状態遷移）
//! - worker: バックグラウンド入出力

pub mod codec;
pub mod error;
pub mod record;
pub mod session;
pub mod worker;

pub use codec::{load_records, save_records, FileFormat, COLUMNS, SHEET_NAME};
pub use error::{Error, Result};
pub use record::{Record, RecordChange, RecordList};
pub use session::FileSession;
pub use worker::{FileWorker, WorkerMessage};
