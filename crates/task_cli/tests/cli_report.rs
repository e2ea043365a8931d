use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

const WARNING: &str = "Warning: too many pending tasks, please prioritize your backlog!";

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskcli-{nanos}-{file_name}"))
}

fn run(store_path: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_task-cli"))
        .args(args)
        .env("TASKCLI_STORE_PATH", store_path)
        .env("TASKCLI_CONFIG_PATH", store_path.with_extension("config.json"))
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run task-cli")
}

fn cleanup(path: &Path) {
    std::fs::remove_file(path).ok();
    let mut backup = path.as_os_str().to_owned();
    backup.push(".backup");
    std::fs::remove_file(PathBuf::from(backup)).ok();
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn warn_fires_only_above_threshold() {
    let store_path = temp_path("cli-warn.json");
    for index in 0..5 {
        run(&store_path, &["add", &format!("task {index}")]);
    }
    let quiet = run(&store_path, &["warn"]);
    run(&store_path, &["add", "sixth"]);
    let loud = run(&store_path, &["warn"]);
    let custom = run(&store_path, &["--json", "warn", "--threshold", "6"]);
    cleanup(&store_path);

    assert!(quiet.status.success());
    assert!(stdout(&quiet).trim().is_empty());
    assert_eq!(stdout(&loud).trim(), WARNING);

    let payload: serde_json::Value = serde_json::from_str(stdout(&custom).trim()).unwrap();
    assert_eq!(payload["threshold"], 6);
    assert!(payload["warning"].is_null());
}

#[test]
fn stats_json_reports_counts_and_rate() {
    let store_path = temp_path("cli-stats.json");
    for description in ["a", "b", "c", "d", "e"] {
        run(&store_path, &["add", description, "--category", "Work"]);
    }
    run(&store_path, &["done", "1"]);
    run(&store_path, &["done", "2"]);
    let output = run(&store_path, &["--json", "stats"]);
    cleanup(&store_path);

    let stats: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(stats["total"], 5);
    assert_eq!(stats["completed"], 2);
    assert_eq!(stats["pending"], 3);
    assert_eq!(stats["completion_rate"], 40.0);
    assert_eq!(stats["by_category"]["Work"], 5);
    assert_eq!(stats["by_priority"]["Medium"], 5);
}

#[test]
fn stats_table_lists_metrics() {
    let store_path = temp_path("cli-stats-table.json");
    let output = run(&store_path, &["stats"]);
    cleanup(&store_path);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("completion rate"));
    assert!(text.contains("0.00%"));
}

#[test]
fn report_prints_daily_summary() {
    let store_path = temp_path("cli-report.json");
    run(&store_path, &["add", "Buy milk", "-c", "Home"]);
    let output = run(&store_path, &["report"]);
    cleanup(&store_path);

    let text = stdout(&output);
    assert!(text.contains("Daily Summary"));
    assert!(text.contains("Total tasks: 1"));
    assert!(text.contains("- Home: 1"));
}

#[test]
fn export_writes_full_report() {
    let store_path = temp_path("cli-export.json");
    let report_path = temp_path("cli-export.txt");
    run(&store_path, &["add", "Buy milk"]);
    let output = run(&store_path, &["export", report_path.to_str().unwrap()]);
    let content = std::fs::read_to_string(&report_path).unwrap();
    std::fs::remove_file(&report_path).ok();
    cleanup(&store_path);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        format!("Report exported: {}", report_path.display())
    );
    assert!(content.contains("Task Manager - Task Report"));
    assert!(content.contains("[1] Buy milk (Medium, General, pending)"));
}

#[test]
fn export_failure_is_reported_as_message() {
    let store_path = temp_path("cli-export-fail.json");
    let report_path = temp_path("no-such-dir").join("summary.txt");
    let output = run(&store_path, &["export", report_path.to_str().unwrap()]);
    cleanup(&store_path);

    assert!(output.status.success());
    assert!(stdout(&output).starts_with("Export failed: "));
}
