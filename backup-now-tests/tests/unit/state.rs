//! Unit tests for per-group state files

use backup_now::utils::state::{parse_timestamp, StateStore};
use chrono::{Local, TimeZone};
use test_utils::TestContext;

#[test]
fn test_state_round_trip() {
    let ctx = TestContext::new();
    let destination = ctx.create_subdir("out");
    let store = StateStore::new("last_backup.json");
    let stamp = Local.with_ymd_and_hms(2024, 5, 16, 11, 15, 0).unwrap();

    store.write(&destination, stamp).unwrap();
    assert_eq!(store.read(&destination), Some(stamp));
}

#[test]
fn test_state_is_per_destination() {
    let ctx = TestContext::new();
    let store = StateStore::new("last_backup.json");
    let first = ctx.create_subdir("one");
    let second = ctx.create_subdir("two");

    store.write(&first, Local::now()).unwrap();
    assert!(store.read(&first).is_some());
    assert!(store.read(&second).is_none());
}

#[test]
fn test_reads_state_written_by_older_tool() {
    let ctx = TestContext::new();
    let destination = ctx.create_subdir("out");
    ctx.create_file("out/last_backup.json", r#"{"last_backup": "2024-05-16T11:15:00.500000"}"#);

    let store = StateStore::new("last_backup.json");
    let expected = parse_timestamp("2024-05-16T11:15:00.500000").unwrap();
    assert_eq!(store.read(&destination), Some(expected));
}

#[test]
fn test_missing_key_counts_as_absent() {
    let ctx = TestContext::new();
    let destination = ctx.create_subdir("out");
    ctx.create_file("out/last_backup.json", r#"{"something_else": 1}"#);

    assert!(StateStore::new("last_backup.json").read(&destination).is_none());
}

#[test]
fn test_custom_state_file_name() {
    let ctx = TestContext::new();
    let destination = ctx.create_subdir("out");
    let store = StateStore::new("state.json");

    store.write(&destination, Local::now()).unwrap();
    assert!(ctx.file_exists("out/state.json"));
    assert!(!ctx.file_exists("out/last_backup.json"));
}
