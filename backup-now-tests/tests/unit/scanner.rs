//! Unit tests for change scanning

use backup_now::utils::scanner::{list_all_files, modified_since, scan_files};
use chrono::Local;
use rstest::rstest;
use std::path::PathBuf;
use std::time::Duration;
use test_utils::TestContext;

#[test]
fn test_full_listing_spans_all_roots_in_order() {
    let ctx = TestContext::new();
    let a = ctx.create_file("first/a.txt", "a");
    let b = ctx.create_file("second/deep/b.txt", "b");

    let roots = vec![ctx.temp_dir().join("first"), ctx.temp_dir().join("second")];
    assert_eq!(list_all_files(&roots), vec![a, b]);
}

#[rstest]
#[case::no_roots(vec![])]
#[case::missing_root(vec!["missing"])]
#[case::empty_root(vec!["empty"])]
#[case::file_root(vec!["plain.txt"])]
fn test_nothing_to_scan(#[case] roots: Vec<&str>) {
    let ctx = TestContext::new();
    ctx.create_subdir("empty");
    ctx.create_file("plain.txt", "not a directory");
    let roots: Vec<PathBuf> = roots.iter().map(|r| ctx.temp_dir().join(r)).collect();

    assert!(list_all_files(&roots).is_empty());
}

#[test]
fn test_window_between_two_runs() {
    let ctx = TestContext::new();
    ctx.create_file("data/before.txt", "old");
    std::thread::sleep(Duration::from_millis(20));
    let first_run = Local::now();
    std::thread::sleep(Duration::from_millis(20));
    let changed = ctx.create_file("data/after.txt", "new");

    let roots = vec![ctx.temp_dir().join("data")];
    assert_eq!(modified_since(&roots, first_run), vec![changed]);
}

#[test]
fn test_scan_is_lazy() {
    let ctx = TestContext::new();
    for i in 0..10 {
        ctx.create_file(&format!("data/{}.txt", i), "x");
    }
    let roots = vec![ctx.temp_dir().join("data")];

    let mut iter = scan_files(&roots, None);
    assert!(iter.next().is_some());
    assert_eq!(iter.count(), 9);
}
