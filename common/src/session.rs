//! ファイルセッション管理
//!
//! 現在のファイルパスとレコード集合をまとめて持ち、
//! 開く・保存・名前を付けて保存の状態遷移を行う。
//! パスの更新は必ず成功後。失敗時はパスもレコードも変えない

use std::path::{Path, PathBuf};

use tracing::info;

use crate::codec;
use crate::error::{Error, Result};
use crate::record::{Record, RecordList};

/// 開いているファイルとレコード集合
#[derive(Debug, Default)]
pub struct FileSession {
    current_path: Option<PathBuf>,
    records: RecordList,
}

impl FileSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新規シートを開始する。パスをクリアしレコードを空にする
    pub fn new_sheet(&mut self) {
        self.current_path = None;
        self.records.replace_all(Vec::new());
    }

    /// ファイルを読み込んでレコード集合を置き換える
    ///
    /// 成功した場合のみ読み込んだパスを現在のパスにする
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let records = codec::load_records(path)?;
        self.apply_loaded(path, records);
        Ok(())
    }

    /// 読み込み済みレコードをセッションに反映する
    ///
    /// バックグラウンド読み込みの成功結果を受け取る側でも使う
    pub fn apply_loaded(&mut self, path: &Path, records: Vec<Record>) {
        self.current_path = Some(path.to_path_buf());
        self.records.replace_all(records);
        info!("読み込み反映: {} ({}件)", path.display(), self.records.len());
    }

    /// 現在のパスへ保存する
    ///
    /// # Returns
    /// * `Err(NoData)` - レコードが1件も無い場合。何も書かない
    /// * `Err(PathNotSet)` - パスが未設定の場合。呼び出し側で保存先を
    ///   選ばせてから `save_as` を使う
    pub fn save(&self) -> Result<()> {
        if self.records.is_empty() {
            return Err(Error::NoData);
        }
        let path = self.current_path.as_deref().ok_or(Error::PathNotSet)?;
        codec::save_records(self.records.as_slice(), path)
    }

    /// 指定パスへ保存し、成功したらそのパスを現在のパスにする
    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        if self.records.is_empty() {
            return Err(Error::NoData);
        }
        codec::save_records(self.records.as_slice(), path)?;
        self.current_path = Some(path.to_path_buf());
        Ok(())
    }

    /// バックグラウンド保存の成功をセッションに反映する
    pub fn confirm_saved(&mut self, path: &Path) {
        self.current_path = Some(path.to_path_buf());
        info!("保存反映: {}", path.display());
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn records(&self) -> &RecordList {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut RecordList {
        &mut self.records
    }
}
