//! CSV/Excel入出力の統合テスト
//!
//! ## 変更履歴
//! - 2026-08-25: 初期作成

use kensa_sheet_common::{
    load_records, save_records, FileSession, FileWorker, Record, WorkerMessage,
};
use tempfile::tempdir;

fn create_test_record(index: usize) -> Record {
    Record {
        name: format!("ひび割れ{}", index),
        distance: format!("{}.5", index * 10),
        angle: "90".to_string(),
        width: 0.25 * index as f64,
        height: 1.5 + index as f64,
        is_defect: if index % 2 == 0 { "no" } else { "yes" }.to_string(),
    }
}

#[test]
fn test_csv_file_roundtrip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("records.csv");

    let records: Vec<Record> = (1..=3).map(create_test_record).collect();
    save_records(&records, &path).expect("CSV保存失敗");
    assert!(path.exists(), "CSVファイルが作成されていない");

    let loaded = load_records(&path).expect("CSV読み込み失敗");
    assert_eq!(loaded, records, "CSVの往復でレコードが変わった");
}

#[test]
fn test_excel_file_roundtrip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("records.xlsx");

    let records: Vec<Record> = (1..=3).map(create_test_record).collect();
    save_records(&records, &path).expect("Excel保存失敗");
    assert!(path.exists(), "Excelファイルが作成されていない");

    let loaded = load_records(&path).expect("Excel読み込み失敗");
    assert_eq!(loaded.len(), records.len());
    for (loaded, original) in loaded.iter().zip(&records) {
        assert_eq!(loaded.name, original.name);
        assert_eq!(loaded.distance, original.distance);
        assert_eq!(loaded.angle, original.angle);
        assert!((loaded.width - original.width).abs() < 1e-9, "幅が一致しない");
        assert!((loaded.height - original.height).abs() < 1e-9, "高さが一致しない");
        assert_eq!(loaded.is_defect, original.is_defect);
    }
}

#[test]
fn test_legacy_csv_bytes_survive_roundtrip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("legacy.csv");
    let original = "Name;Distance;Angle;Width;Hegth;IsDefect\nA;10;30;1.5;2.5;no\n";
    std::fs::write(&path, original).expect("ファイル作成失敗");

    let records = load_records(&path).expect("読み込み失敗");
    assert_eq!(records.len(), 1);

    let out_path = dir.path().join("copy.csv");
    save_records(&records, &out_path).expect("保存失敗");
    let written = std::fs::read_to_string(&out_path).expect("読み戻し失敗");
    assert_eq!(written, original, "旧フォーマットの往復でバイト列が変わった");
}

#[test]
fn test_save_overwrites_without_leftovers() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("records.csv");

    save_records(&[create_test_record(1)], &path).expect("1回目の保存失敗");
    save_records(&[create_test_record(1), create_test_record(2)], &path)
        .expect("2回目の保存失敗");

    let loaded = load_records(&path).expect("読み込み失敗");
    assert_eq!(loaded.len(), 2, "上書き保存が反映されていない");

    // 保存先ディレクトリに一時ファイルが残っていないこと
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .expect("ディレクトリ走査失敗")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    assert_eq!(entries, vec![path.clone()], "保存先に余分なファイルがある: {entries:?}");
}

#[test]
fn test_session_open_edit_save() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("records.csv");
    save_records(&[create_test_record(1)], &path).expect("保存失敗");

    let mut session = FileSession::new();
    session.open(&path).expect("読み込み失敗");

    session
        .records_mut()
        .update(0, |record| record.is_defect = "fixed".to_string())
        .expect("更新対象が無い");
    session.records_mut().push(create_test_record(2));
    session.save().expect("保存失敗");

    let mut reloaded = FileSession::new();
    reloaded.open(&path).expect("読み戻し失敗");
    assert_eq!(reloaded.records().len(), 2);
    assert_eq!(
        reloaded.records().get(0).map(|r| r.is_defect.clone()),
        Some("fixed".to_string())
    );
}

#[test]
fn test_worker_load_commits_into_session() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("records.csv");
    save_records(&[create_test_record(1)], &path).expect("保存失敗");

    let mut session = FileSession::new();
    let worker = FileWorker::spawn();
    worker.submit_load(path.clone());

    match worker.recv().expect("完了通知が来ない") {
        WorkerMessage::LoadDone { path: done, result } => {
            let records = result.expect("バックグラウンド読み込み失敗");
            session.apply_loaded(&done, records);
        }
        other => panic!("想定外の通知: {other:?}"),
    }

    assert_eq!(session.current_path(), Some(path.as_path()));
    assert_eq!(session.records().len(), 1);
}

#[test]
fn test_worker_save_confirms_path() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("out.xlsx");

    let mut session = FileSession::new();
    session.records_mut().push(create_test_record(1));

    let worker = FileWorker::spawn();
    worker.submit_save(path.clone(), session.records().to_vec());

    match worker.recv().expect("完了通知が来ない") {
        WorkerMessage::SaveDone { path: done, result } => {
            result.expect("バックグラウンド保存失敗");
            session.confirm_saved(&done);
        }
        other => panic!("想定外の通知: {other:?}"),
    }

    assert_eq!(session.current_path(), Some(path.as_path()));
    assert!(path.exists(), "保存ファイルが作成されていない");
}
