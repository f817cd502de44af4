//! Tests for the 'run' command
//!
//! The run command backs up every configured group, or a single one.

use backup_now::managers::backup::run_from_config;
use chrono::Local;
use std::fs;
use std::time::Duration;
use test_utils::{
    BackupManager, ConfigBuilder, GroupOutcome, MockExecutor, MockResponse, StateStore,
    TestContext,
};

fn manager(config: backup_now::Config, executor: &MockExecutor) -> BackupManager {
    BackupManager::new(config, Box::new(executor.clone()))
}

#[test]
fn test_run_full_group() {
    let ctx = TestContext::new();
    let data = ctx.create_subdir("data");
    ctx.create_file("data/a.txt", "a");
    ctx.create_file("data/nested/b.txt", "b");
    let out = ctx.temp_dir().join("backups");
    let executor = MockExecutor::new();

    let config = ConfigBuilder::for_context(&ctx)
        .add_group("data", &[data], &out)
        .build();
    let summary = manager(config, &executor).run(None).unwrap();

    assert_eq!(summary.archived(), 1);
    let calls = executor.get_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args.len(), 4);
    assert!(calls[0].args[1].starts_with(&out.join("backup_").display().to_string()));
    assert!(calls[0].args[1].ends_with(".7z"));
    assert!(ctx.log_contents().contains("Successfully backed up to"));
}

#[test]
fn test_run_full_group_with_empty_sources() {
    let ctx = TestContext::new();
    let data = ctx.create_subdir("data");
    let out = ctx.temp_dir().join("backups");
    let executor = MockExecutor::new();

    let config = ConfigBuilder::for_context(&ctx)
        .add_group("data", &[data.clone()], &out)
        .build();
    let summary = manager(config, &executor).run(None).unwrap();

    assert_eq!(summary.outcomes, vec![("data".to_string(), GroupOutcome::Unchanged)]);
    assert_eq!(executor.call_count("7z"), 0);
    assert!(executor.get_calls().is_empty());
    assert!(!out.join("last_backup.json").exists());
    assert!(ctx
        .log_contents()
        .contains(&format!("No files found in {}.", data.display())));
}

#[test]
fn test_run_incremental_first_run_takes_everything() {
    let ctx = TestContext::new();
    let data = ctx.create_subdir("data");
    ctx.create_file("data/a.txt", "a");
    ctx.create_file("data/b.txt", "b");
    let out = ctx.temp_dir().join("backups");
    let executor = MockExecutor::new();

    let config = ConfigBuilder::for_context(&ctx)
        .add_incremental_group("data", &[data], &out)
        .build();
    manager(config, &executor).run(None).unwrap();

    assert_eq!(executor.get_calls()[0].args.len(), 4);
    assert!(StateStore::new("last_backup.json").read(&out).is_some());
}

#[test]
fn test_run_incremental_second_run_takes_only_changes() {
    let ctx = TestContext::new();
    let data = ctx.create_subdir("data");
    ctx.create_file("data/old.txt", "old");
    let out = ctx.temp_dir().join("backups");
    let config = ConfigBuilder::for_context(&ctx)
        .add_incremental_group("data", &[data], &out)
        .build();

    let first = MockExecutor::new();
    manager(config.clone(), &first).run(None).unwrap();
    let first_state = StateStore::new("last_backup.json").read(&out).unwrap();

    std::thread::sleep(Duration::from_millis(20));
    let changed = ctx.create_file("data/new.txt", "new");

    let second = MockExecutor::new();
    manager(config, &second).run(None).unwrap();

    let calls = second.get_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args[2..], [changed.display().to_string()]);
    let second_state = StateStore::new("last_backup.json").read(&out).unwrap();
    assert!(second_state > first_state);
}

#[test]
fn test_run_incremental_nothing_changed() {
    let ctx = TestContext::new();
    let data = ctx.create_subdir("data");
    ctx.create_file("data/a.txt", "a");
    let out = ctx.create_subdir("backups");
    let stamp = Local::now() + chrono::Duration::minutes(5);
    StateStore::new("last_backup.json").write(&out, stamp).unwrap();
    let executor = MockExecutor::new();

    let config = ConfigBuilder::for_context(&ctx)
        .add_incremental_group("data", &[data.clone()], &out)
        .build();
    let summary = manager(config, &executor).run(None).unwrap();

    assert_eq!(summary.unchanged(), 1);
    assert!(executor.get_calls().is_empty());
    assert!(ctx.archives_in(&out).is_empty());
    assert_eq!(StateStore::new("last_backup.json").read(&out), Some(stamp));
    assert!(ctx
        .log_contents()
        .contains(&format!("No files modified since the last backup from the {}.", data.display())));
}

#[test]
fn test_run_failure_keeps_previous_state_and_continues() {
    let ctx = TestContext::new();
    let data = ctx.create_subdir("data");
    ctx.create_file("data/a.txt", "a");
    let out = ctx.create_subdir("backups");
    let earlier = Local::now() - chrono::Duration::days(1);
    StateStore::new("last_backup.json").write(&out, earlier).unwrap();

    let executor = MockExecutor::new().expect(
        "7z",
        MockResponse::Failure {
            stderr: "archive locked".to_string(),
            exit_code: 2,
        },
    );
    let config = ConfigBuilder::for_context(&ctx)
        .add_incremental_group("first", &[data.clone()], &out)
        .add_group("second", &[data], &ctx.temp_dir().join("other"))
        .build();
    let summary = manager(config, &executor).run(None).unwrap();

    assert_eq!(summary.failed(), 2);
    assert_eq!(executor.call_count("7z"), 2);
    assert_eq!(StateStore::new("last_backup.json").read(&out), Some(earlier));
    assert!(ctx.log_contents().contains("archive locked"));
}

#[test]
fn test_run_with_no_groups() {
    let ctx = TestContext::new();
    let executor = MockExecutor::new();
    let config = ConfigBuilder::for_context(&ctx).build();

    let summary = manager(config, &executor).run(None).unwrap();
    assert!(summary.is_empty());
    assert!(executor.get_calls().is_empty());
}

#[test]
fn test_run_with_missing_config_creates_nothing() {
    let ctx = TestContext::new();
    let executor = MockExecutor::new();

    let summary = run_from_config(
        &ctx.temp_dir().join("config.json"),
        Box::new(executor.clone()),
        None,
        false,
    )
    .unwrap();

    assert!(summary.is_empty());
    assert!(executor.get_calls().is_empty());
    let entries: Vec<_> = fs::read_dir(ctx.temp_dir())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["backup.log".to_string()]);
}

#[test]
fn test_run_invalid_group_does_not_stop_others() {
    let ctx = TestContext::new();
    let data = ctx.create_subdir("data");
    ctx.create_file("data/a.txt", "a");
    let executor = MockExecutor::new();

    let config = ConfigBuilder::for_context(&ctx)
        .add_invalid_group("broken")
        .add_group("good", &[data], &ctx.temp_dir().join("out"))
        .build();
    let summary = manager(config, &executor).run(None).unwrap();

    assert_eq!(summary.outcomes[0], ("broken".to_string(), GroupOutcome::Invalid));
    assert!(matches!(summary.outcomes[1].1, GroupOutcome::Archived(_)));
    assert!(ctx.log_contents().contains("Invalid configuration for group:"));
}

#[cfg(unix)]
mod scripted {
    use super::*;
    use backup_now::utils::RealExecutor;
    use test_utils::{failing_archiver, fake_archiver, recorded_args};

    #[test]
    fn test_run_with_real_process() {
        let ctx = TestContext::new();
        let data = ctx.create_subdir("data");
        let odd = ctx.create_file("data/it's \"odd\" $(name).txt", "x");
        let out = ctx.temp_dir().join("backups");
        let archiver = fake_archiver(&ctx.temp_dir().join("bin"));

        let config = ConfigBuilder::for_context(&ctx)
            .with_archiver(&archiver)
            .add_group("data", &[data], &out)
            .build();
        let summary = BackupManager::new(config, Box::new(RealExecutor::new()))
            .run(None)
            .unwrap();

        assert_eq!(summary.archived(), 1);
        assert_eq!(ctx.archives_in(&out).len(), 1);
        let args = recorded_args(&archiver);
        assert_eq!(args[0], "a");
        assert_eq!(args[2], odd.display().to_string());
    }

    #[test]
    fn test_run_with_failing_process() {
        let ctx = TestContext::new();
        let data = ctx.create_subdir("data");
        ctx.create_file("data/a.txt", "a");
        let out = ctx.temp_dir().join("backups");
        let archiver = failing_archiver(&ctx.temp_dir().join("bin"));

        let config = ConfigBuilder::for_context(&ctx)
            .with_archiver(&archiver)
            .add_incremental_group("data", &[data], &out)
            .build();
        let summary = BackupManager::new(config, Box::new(RealExecutor::new()))
            .run(None)
            .unwrap();

        assert_eq!(summary.failed(), 1);
        assert!(!out.join("last_backup.json").exists());
        assert!(ctx.log_contents().contains("simulated archiver failure"));
    }
}
