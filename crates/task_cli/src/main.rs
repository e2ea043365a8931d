use clap::Parser;
use std::path::PathBuf;
use tabled::{Table, Tabled};
use task_cli::cli::{Cli, Command, collect_overrides};
use task_cli::logging::init_subscriber;
use task_core::config::{Config, load_config_with_fallback, merge_overrides};
use task_core::error::AppError;
use task_core::manager::{Outcome, TaskManager};
use task_core::model::Task;
use task_core::report::format_task;
use task_core::stats::TaskStats;
use task_core::storage::{JsonTaskStorage, json_store};

type Manager = TaskManager<JsonTaskStorage>;

#[derive(Tabled)]
struct StatRow {
    metric: String,
    value: String,
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn print_outcome(outcome: &Outcome, json: bool) {
    if json {
        let mut payload = serde_json::json!({
            "success": outcome.is_success(),
            "message": outcome.to_string(),
            "task": outcome.task().map(Task::to_record),
        });
        if let Outcome::Cleared { removed } = outcome {
            payload["removed"] = serde_json::json!(removed);
        }
        println!("{payload}");
    } else {
        println!("{outcome}");
    }
}

fn print_tasks_json(tasks: &[&Task]) {
    let payload: Vec<serde_json::Value> = tasks.iter().map(|task| task.to_record()).collect();
    println!("{}", serde_json::Value::Array(payload));
}

fn stat_rows(stats: &TaskStats) -> Vec<StatRow> {
    let mut rows = vec![
        StatRow {
            metric: "total".to_string(),
            value: stats.total.to_string(),
        },
        StatRow {
            metric: "completed".to_string(),
            value: stats.completed.to_string(),
        },
        StatRow {
            metric: "pending".to_string(),
            value: stats.pending.to_string(),
        },
        StatRow {
            metric: "completion rate".to_string(),
            value: format!("{:.2}%", stats.completion_rate),
        },
    ];

    for (category, count) in stats.by_category.sorted() {
        rows.push(StatRow {
            metric: format!("category: {category}"),
            value: count.to_string(),
        });
    }
    for (priority, count) in stats.by_priority.sorted() {
        rows.push(StatRow {
            metric: format!("priority: {priority}"),
            value: count.to_string(),
        });
    }

    rows
}

fn print_stats(stats: &TaskStats, json: bool) -> Result<(), AppError> {
    if json {
        let rendered =
            serde_json::to_string(stats).map_err(|err| AppError::invalid_data(err.to_string()))?;
        println!("{rendered}");
    } else {
        println!("{}", Table::new(stat_rows(stats)));
    }
    Ok(())
}

/// Returns whether the command succeeded from the user's point of view.
fn run_command(
    command: Command,
    json: bool,
    manager: &mut Manager,
    config: &Config,
) -> Result<bool, AppError> {
    match command {
        Command::Add {
            description,
            priority,
            category,
        } => {
            let outcome = manager.add_with(
                &description.join(" "),
                priority.unwrap_or_default(),
                category.as_deref(),
            );
            print_outcome(&outcome, json);
            Ok(outcome.is_success())
        }
        Command::List { sorted } => {
            if json {
                let tasks: Vec<&Task> = if sorted {
                    manager.prioritized()
                } else {
                    manager.tasks().iter().collect()
                };
                print_tasks_json(&tasks);
            } else if sorted && !manager.tasks().is_empty() {
                for task in manager.prioritized() {
                    println!("{}", format_task(task));
                }
            } else {
                for line in manager.list() {
                    println!("{line}");
                }
            }
            Ok(true)
        }
        Command::Done { id } => {
            let outcome = manager.done(id);
            print_outcome(&outcome, json);
            Ok(outcome.is_success())
        }
        Command::Delete { id } => {
            let outcome = manager.delete(id);
            print_outcome(&outcome, json);
            Ok(outcome.is_success())
        }
        Command::Clear => {
            let outcome = manager.clear();
            print_outcome(&outcome, json);
            Ok(true)
        }
        Command::Stats => {
            print_stats(&manager.analyzer().statistics(), json)?;
            Ok(true)
        }
        Command::Report => {
            let report = manager.analyzer().today_report();
            if json {
                println!("{}", serde_json::json!({ "report": report }));
            } else {
                println!("{report}");
            }
            Ok(true)
        }
        Command::Export { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(config.export_path()));
            let message = manager.analyzer().export_summary(&path);
            if json {
                println!("{}", serde_json::json!({ "message": message }));
            } else {
                println!("{message}");
            }
            Ok(true)
        }
        Command::Warn { threshold } => {
            let threshold = threshold.unwrap_or_else(|| config.threshold());
            let warning = manager.analyzer().overload_warning(threshold);
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "threshold": threshold, "warning": warning })
                );
            } else if let Some(warning) = warning {
                println!("{warning}");
            }
            Ok(true)
        }
    }
}

fn exit_with(err: &AppError) -> ! {
    eprintln!("ERROR: {}", err);
    std::process::exit(1);
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => exit_with(&normalize_parse_error(err)),
    };

    let loaded = load_config_with_fallback();
    let overrides = match collect_overrides(&cli.config_override) {
        Ok(overrides) => overrides,
        Err(message) => exit_with(&AppError::invalid_input(message)),
    };
    let config = merge_overrides(&loaded.config, &overrides);

    init_subscriber(config.log_level());
    if let Some(err) = loaded.error.as_ref() {
        tracing::warn!(error = %err, "failed to load config, using defaults");
    }

    let Some(command) = cli.command else {
        eprintln!("Error: No command specified");
        eprintln!("Use 'help' for usage information");
        std::process::exit(1);
    };

    let path = match json_store::store_path(config.store_path.as_deref()) {
        Ok(path) => path,
        Err(err) => exit_with(&err),
    };
    tracing::debug!(path = %path.display(), "using task file");

    let mut manager = match TaskManager::open(JsonTaskStorage::new(path)) {
        Ok(manager) => manager,
        Err(err) => {
            eprintln!("Error: Unable to read task file: {}", err.message());
            std::process::exit(1);
        }
    };

    match run_command(command, cli.json, &mut manager, &config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => exit_with(&err),
    }
}
