//! セミコロン区切りCSVの読み書き
//!
//! 旧ツールと互換のフォーマット:
//! - 区切り文字は `;`、文字コードはUTF-8
//! - 先頭行はヘッダ。列順は問わず名前でマッチングする
//! - 書き出しは固定列順でヘッダ1行、以降1レコード1行

use std::fs;
use std::path::Path;

use crate::codec::{atomic_write, COLUMNS};
use crate::error::{Error, Result};
use crate::record::Record;

/// UTF-8 BOM。旧ツールの書き出しファイルは先頭に付いていることがある
const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// CSVファイルを読み込んでレコード列にする
pub fn read_file(path: &Path) -> Result<Vec<Record>> {
    let bytes = fs::read(path)?;
    decode(&bytes)
}

/// レコード列をCSVファイルとして保存する
pub fn write_file(records: &[Record], path: &Path) -> Result<()> {
    let bytes = encode(records)?;
    atomic_write(path, &bytes)
}

/// CSVバイト列をレコード列にする
///
/// # Arguments
/// * `bytes` - ファイル内容そのまま（BOM付き可）
///
/// # Returns
/// * `Ok(Vec<Record>)` - ヘッダ行のみなら空のVec
/// * `Err(HeaderMismatch)` - 必須列が足りない場合。不足列名を持つ
/// * `Err(Format)` - 行の構造が壊れている場合
pub fn decode(bytes: &[u8]) -> Result<Vec<Record>> {
    let bytes = strip_bom(bytes);
    let mut reader = csv::ReaderBuilder::new().delimiter(b';').from_reader(bytes);

    validate_headers(reader.headers()?)?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// レコード列をCSVバイト列にする
///
/// ヘッダは固定列順で常に書く。`;` や引用符を含むフィールドは
/// RFC 4180の引用で書き出す
pub fn encode(records: &[Record]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .from_writer(&mut buffer);
        if records.is_empty() {
            writer.write_record(COLUMNS)?;
        }
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(&BOM).unwrap_or(bytes)
}

/// 必須列がすべて揃っているか検証する
fn validate_headers(headers: &csv::StringRecord) -> Result<()> {
    let missing: Vec<&str> = COLUMNS
        .iter()
        .filter(|name| !headers.iter().any(|header| header == **name))
        .copied()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::HeaderMismatch(missing.join(", ")))
    }
}
