//! 検査レコードの型定義
//!
//! デスクトップシェルと各コーデックで共有される型:
//! - Record: 検査1件分の測定値
//! - RecordList: 変更通知つきのレコード集合
//! - RecordChange: 集合の変更イベント

use serde::{Deserialize, Deserializer, Serialize};

/// 検査レコード1件
///
/// serdeのrename名がそのままCSVのヘッダ名になる。
/// 高さ列の「Hegth」は旧ツールが書き出した綴りで、互換のため踏襲する
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Name")]
    pub name: String,

    /// 測点からの距離。数値化せず入力どおり保持する
    #[serde(rename = "Distance")]
    pub distance: String,

    /// 角度。数値化せず入力どおり保持する
    #[serde(rename = "Angle")]
    pub angle: String,

    /// 幅。解釈できない入力は0.0として読む
    #[serde(rename = "Width", deserialize_with = "lenient_f64")]
    pub width: f64,

    /// 高さ。解釈できない入力は0.0として読む
    #[serde(rename = "Hegth", deserialize_with = "lenient_f64")]
    pub height: f64,

    /// 欠陥フラグ。真偽値ではなく自由記述
    #[serde(rename = "IsDefect")]
    pub is_defect: String,
}

/// 数値文字列を寛容にf64へ変換する。解釈できなければ0.0
///
/// 小数点はインバリアント形式（`.`）のみ。`12,5` や空欄は0.0になる
pub(crate) fn parse_f64_or_zero(text: &str) -> f64 {
    text.trim().parse().unwrap_or(0.0)
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    Ok(parse_f64_or_zero(&text))
}

/// レコード集合の変更イベント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordChange {
    /// 全件入れ替え（クリア含む）
    Reset,
    /// 指定位置のレコードを更新
    Updated(usize),
    /// 指定位置へ挿入
    Inserted(usize),
    /// 指定位置から削除
    Removed(usize),
}

type Listener = Box<dyn Fn(&RecordChange)>;

/// 変更通知つきレコード集合
///
/// 変更メソッドは操作後に登録済みリスナーへ同期的に通知する
pub struct RecordList {
    items: Vec<Record>,
    listeners: Vec<Listener>,
}

impl RecordList {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// 変更リスナーを登録する
    pub fn subscribe(&mut self, listener: impl Fn(&RecordChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&self, change: RecordChange) {
        for listener in &self.listeners {
            listener(&change);
        }
    }

    /// 全件を入れ替える
    pub fn replace_all(&mut self, items: Vec<Record>) {
        self.items = items;
        self.notify(RecordChange::Reset);
    }

    /// 全件を削除する
    pub fn clear(&mut self) {
        self.items.clear();
        self.notify(RecordChange::Reset);
    }

    /// 末尾に追加する
    pub fn push(&mut self, record: Record) {
        self.items.push(record);
        self.notify(RecordChange::Inserted(self.items.len() - 1));
    }

    /// 指定位置に挿入する。範囲外の位置は末尾に丸める
    pub fn insert(&mut self, index: usize, record: Record) {
        let index = index.min(self.items.len());
        self.items.insert(index, record);
        self.notify(RecordChange::Inserted(index));
    }

    /// 指定位置を削除する。範囲外ならNoneを返し通知しない
    pub fn remove(&mut self, index: usize) -> Option<Record> {
        if index >= self.items.len() {
            return None;
        }
        let record = self.items.remove(index);
        self.notify(RecordChange::Removed(index));
        Some(record)
    }

    /// 指定位置のレコードをクロージャで書き換える
    ///
    /// 範囲外ならNoneを返し通知しない
    pub fn update<R>(&mut self, index: usize, f: impl FnOnce(&mut Record) -> R) -> Option<R> {
        let result = f(self.items.get_mut(index)?);
        self.notify(RecordChange::Updated(index));
        Some(result)
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.items
    }

    pub fn to_vec(&self) -> Vec<Record> {
        self.items.clone()
    }
}

impl Default for RecordList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RecordList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordList")
            .field("items", &self.items)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
