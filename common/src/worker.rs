//! バックグラウンドのファイル入出力
//!
//! 読み書きは専用のワーカースレッドで実行し、結果はチャネルで
//! 呼び出し側へ返す。ジョブは投入順に1件ずつ直列で処理される

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use tracing::{error, info};

use crate::codec;
use crate::error::Result;
use crate::record::Record;

enum FileJob {
    Load { path: PathBuf },
    Save { path: PathBuf, records: Vec<Record> },
}

/// ワーカーからの完了通知
#[derive(Debug)]
pub enum WorkerMessage {
    LoadDone {
        path: PathBuf,
        result: Result<Vec<Record>>,
    },
    SaveDone {
        path: PathBuf,
        result: Result<()>,
    },
}

/// ファイル入出力ワーカー
///
/// ドロップするとジョブチャネルが閉じ、スレッドは残りのジョブを
/// 処理してから終了する
pub struct FileWorker {
    job_tx: Sender<FileJob>,
    message_rx: Receiver<WorkerMessage>,
}

impl FileWorker {
    /// ワーカースレッドを起動する
    pub fn spawn() -> Self {
        let (job_tx, job_rx) = mpsc::channel::<FileJob>();
        let (message_tx, message_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(job) = job_rx.recv() {
                let message = run_job(job);
                if message_tx.send(message).is_err() {
                    break;
                }
            }
        });

        Self { job_tx, message_rx }
    }

    /// 読み込みジョブを投入する
    pub fn submit_load(&self, path: PathBuf) {
        let _ = self.job_tx.send(FileJob::Load { path });
    }

    /// 保存ジョブを投入する。レコードは投入時点のスナップショット
    pub fn submit_save(&self, path: PathBuf, records: Vec<Record>) {
        let _ = self.job_tx.send(FileJob::Save { path, records });
    }

    /// 完了通知があれば取り出す。無ければNone
    pub fn try_recv(&self) -> Option<WorkerMessage> {
        match self.message_rx.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// 完了通知が届くまで待って取り出す。ワーカー終了後はNone
    pub fn recv(&self) -> Option<WorkerMessage> {
        self.message_rx.recv().ok()
    }
}

fn run_job(job: FileJob) -> WorkerMessage {
    match job {
        FileJob::Load { path } => {
            info!("読み込み開始: {}", path.display());
            let result = codec::load_records(&path);
            match &result {
                Ok(records) => info!("読み込み完了: {} ({}件)", path.display(), records.len()),
                Err(err) => error!("読み込み失敗: {}: {err}", path.display()),
            }
            WorkerMessage::LoadDone { path, result }
        }
        FileJob::Save { path, records } => {
            info!("保存開始: {} ({}件)", path.display(), records.len());
            let result = codec::save_records(&records, &path);
            match &result {
                Ok(()) => info!("保存完了: {}", path.display()),
                Err(err) => error!("保存失敗: {}: {err}", path.display()),
            }
            WorkerMessage::SaveDone { path, result }
        }
    }
}
