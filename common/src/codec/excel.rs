//! Excel(.xlsx)の読み書き
//!
//! 読み込みは先頭シートのみ。1行目をヘッダとして読み飛ばし、
//! 2行目以降を列位置（1〜6列目）でレコードに対応づける。
//! 書き出しはシート名「Data」の新規ブックを作り、2行目から書く。
//! 1行目はヘッダ行として空けておく（旧ツールのレイアウト互換）

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;

use crate::codec::{atomic_write, SHEET_NAME};
use crate::error::Result;
use crate::record::{parse_f64_or_zero, Record};

/// xlsxファイルを読み込んでレコード列にする
///
/// # Returns
/// * `Ok(Vec<Record>)` - シートが無い・データ行が無い場合は空のVec
/// * `Err(Io)` - ファイルが開けない場合
/// * `Err(Format)` - ブックとして壊れている場合
pub fn read_file(path: &Path) -> Result<Vec<Record>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first_sheet = match sheet_names.first() {
        Some(name) => name.clone(),
        None => return Ok(Vec::new()),
    };

    let range = workbook.worksheet_range(&first_sheet)?;
    let end_row = match range.end() {
        Some((row, _col)) => row,
        None => return Ok(Vec::new()),
    };

    // 絶対行1（インデックス0）はヘッダ行として読み飛ばす
    let mut records = Vec::new();
    for row in 1..=end_row {
        records.push(Record {
            name: cell_text(range.get_value((row, 0))),
            distance: cell_text(range.get_value((row, 1))),
            angle: cell_text(range.get_value((row, 2))),
            width: cell_number(range.get_value((row, 3))),
            height: cell_number(range.get_value((row, 4))),
            is_defect: cell_text(range.get_value((row, 5))),
        });
    }
    Ok(records)
}

/// レコード列をxlsxファイルとして保存する。既存ファイルは丸ごと置き換える
pub fn write_file(records: &[Record], path: &Path) -> Result<()> {
    let bytes = encode(records)?;
    atomic_write(path, &bytes)
}

/// レコード列をxlsxバイト列にする
pub fn encode(records: &[Record]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        worksheet.write_string(row, 0, &record.name)?;
        worksheet.write_string(row, 1, &record.distance)?;
        worksheet.write_string(row, 2, &record.angle)?;
        worksheet.write_number(row, 3, record.width)?;
        worksheet.write_number(row, 4, record.height)?;
        worksheet.write_string(row, 5, &record.is_defect)?;
    }

    let bytes = workbook.save_to_buffer()?;
    Ok(bytes)
}

/// セル値を表示文字列として取り出す
///
/// 整数値のセルは小数点なしの文字列にする（10.0 → "10"）
fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.clone(),
        Some(Data::Float(n)) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Some(Data::Int(n)) => format!("{}", n),
        Some(Data::Bool(true)) => "TRUE".to_string(),
        Some(Data::Bool(false)) => "FALSE".to_string(),
        Some(other) => other.to_string(),
    }
}

/// セル値をf64として取り出す。数値化できないセルは0.0
fn cell_number(cell: Option<&Data>) -> f64 {
    match cell {
        Some(Data::Float(n)) => *n,
        Some(Data::Int(n)) => *n as f64,
        Some(Data::String(s)) => parse_f64_or_zero(s),
        _ => 0.0,
    }
}
