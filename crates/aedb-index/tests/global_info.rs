//! Integration tests for reading and maintaining the global-info table.

use aedb_index::{Database, Error, FileKind, Value};
use aedb_testing::{SampleDb, TestWorld};

#[test]
fn test_text_values_are_decoded_as_literals() {
    let world = TestWorld::new();
    let path = world.create(
        "run.pridb",
        &SampleDb::new(FileKind::Pri).with_global_info(&[
            ("Int", "123"),
            ("Float", "0.5"),
            ("Text", "abc"),
            ("Flag", "True"),
            ("Channels", "[1, 2, 3]"),
            ("Quoted", "'Vallen'"),
        ]),
    );

    let db = Database::open_kind(&path, FileKind::Pri, true).unwrap();
    let info = db.global_info().unwrap();

    assert_eq!(info["Int"], Value::Int(123));
    assert_eq!(info["Float"], Value::Float(0.5));
    assert_eq!(info["Text"], Value::from("abc"));
    assert_eq!(info["Flag"], Value::Bool(true));
    assert_eq!(
        info["Channels"],
        Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    );
    assert_eq!(info["Quoted"], Value::from("Vallen"));
}

#[test]
fn test_written_text_round_trips_through_global_info() {
    let world = TestWorld::new();
    let path = world.create(
        "run.pridb",
        &SampleDb::new(FileKind::Pri).with_global_info(&[]),
    );

    let db = Database::open_kind(&path, FileKind::Pri, false).unwrap();
    db.execute(
        "INSERT INTO pri_globalinfo (Key, Value) VALUES (?1, ?2), (?3, ?4)",
        ["Number", "123", "Name", "abc"],
    )
    .unwrap();

    let info = db.global_info().unwrap();
    assert_eq!(info["Number"], Value::Int(123));
    assert_eq!(info["Name"], Value::Str("abc".to_string()));
}

#[test]
fn test_summary_matches_data_after_close() {
    let world = TestWorld::new();
    let sample = SampleDb::new(FileKind::Pri);
    let path = world.create("run.pridb", &sample);

    let db = Database::open_kind(&path, FileKind::Pri, false).unwrap();
    for i in 1..=7 {
        db.execute(&sample.insert_row_sql(), [i]).unwrap();
    }
    // Stale until the handle is flushed
    assert_eq!(db.global_info().unwrap()["ValidSets"], Value::Int(0));
    db.close().unwrap();

    let db = Database::open_kind(&path, FileKind::Pri, true).unwrap();
    let info = db.global_info().unwrap();
    assert_eq!(info["ValidSets"].as_i64(), Some(db.row_count().unwrap() as i64));
    assert_eq!(info["TRAI"], Value::Int(7));
    assert_eq!(info["Version"], Value::Int(1));
}

#[test]
fn test_update_global_info_refreshes_immediately() {
    let world = TestWorld::new();
    let sample = SampleDb::new(FileKind::Trf);
    let path = world.create("run.trfdb", &sample);

    let db = Database::open_kind(&path, FileKind::Trf, false).unwrap();
    for trai in [3, 9, 5] {
        db.execute(&sample.insert_row_sql(), [trai]).unwrap();
    }
    db.update_global_info().unwrap();

    let info = db.global_info().unwrap();
    assert_eq!(info["TRAI"], Value::Int(9));
    // TRAI is the rowid of trf_data
    assert_eq!(info["ValidSets"], Value::Int(9));
}

#[test]
fn test_absent_summary_keys_are_not_inserted() {
    let world = TestWorld::new();
    let sample = SampleDb::new(FileKind::Pri).with_global_info(&[("Version", "2")]);
    let path = world.create("run.pridb", &sample);

    let db = Database::open_kind(&path, FileKind::Pri, false).unwrap();
    db.execute(&sample.insert_row_sql(), [1]).unwrap();
    db.close().unwrap();

    let db = Database::open_kind(&path, FileKind::Pri, true).unwrap();
    let info = db.global_info().unwrap();
    assert_eq!(info.keys().collect::<Vec<_>>(), vec!["Version"]);
    assert_eq!(info["Version"], Value::Int(2));
}

#[test]
fn test_empty_data_table_sets_summary_to_none() {
    let world = TestWorld::new();
    let path = world.create("run.pridb", &SampleDb::new(FileKind::Pri));

    let db = Database::open_kind(&path, FileKind::Pri, false).unwrap();
    db.update_global_info().unwrap();

    assert_eq!(db.global_info().unwrap()["ValidSets"], Value::None);
}

#[test]
fn test_missing_global_info_table_is_query_failed() {
    let world = TestWorld::new();
    let path = world.create(
        "run.pridb",
        &SampleDb::new(FileKind::Pri).without_global_info(),
    );

    let db = Database::open_kind(&path, FileKind::Pri, true).unwrap();
    let err = db.global_info().unwrap_err();
    assert!(matches!(err, Error::QueryFailed(_)), "{:?}", err);
    assert!(err.to_string().contains("pri_globalinfo"));
}

#[test]
fn test_failed_refresh_still_releases_write_handle() {
    let world = TestWorld::new();
    let sample = SampleDb::new(FileKind::Pri).without_global_info();
    let path = world.create("run.pridb", &sample);

    let db = Database::open_kind(&path, FileKind::Pri, false).unwrap();
    db.execute(&sample.insert_row_sql(), [1]).unwrap();

    assert!(matches!(db.close(), Err(Error::QueryFailed(_))));
    assert!(!db.is_connected());
    db.close().unwrap();

    let db = Database::open_kind(&path, FileKind::Pri, true).unwrap();
    assert_eq!(db.row_count().unwrap(), 1);
}
