use clap::{Parser, Subcommand};
use std::path::PathBuf;
use task_core::config::ConfigOverrides;
use task_core::model::Priority;

#[derive(Parser, Debug)]
#[command(name = "task-cli", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: task-cli add Buy milk --priority high --category Home
    Add {
        description: Vec<String>,
        #[arg(short = 'p', long)]
        priority: Option<Priority>,
        #[arg(short = 'c', long)]
        category: Option<String>,
    },
    /// List all tasks
    ///
    /// Example: task-cli list
    /// Example: task-cli list --sorted
    List {
        /// Order by priority, newest first within a priority
        #[arg(long)]
        sorted: bool,
    },
    /// Mark a task as done
    ///
    /// Example: task-cli done 1
    Done { id: u64 },
    /// Delete a task
    ///
    /// Example: task-cli delete 1
    Delete { id: u64 },
    /// Clear all completed tasks
    Clear,
    /// Show task statistics
    Stats,
    /// Show today's summary
    Report,
    /// Export the full report to a text file
    ///
    /// Example: task-cli export reports/summary.txt
    Export { path: Option<PathBuf> },
    /// Warn when too many tasks are pending
    ///
    /// Example: task-cli warn --threshold 3
    Warn {
        #[arg(long)]
        threshold: Option<usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    StorePath,
    Threshold,
    ExportPath,
    LogLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field =
        canonicalize_flag_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match field.as_str() {
        "store_path" | "store" => ConfigOverrideTarget::StorePath,
        "threshold" | "overload_threshold" => ConfigOverrideTarget::Threshold,
        "export_path" | "export" => ConfigOverrideTarget::ExportPath,
        "log_level" | "log" => ConfigOverrideTarget::LogLevel,
        other => return Err(format!("unknown config field '{other}'")),
    };

    if value.is_empty() {
        return Err(format!("override '{field}' requires a value"));
    }

    Ok(ParsedConfigOverride { target, value })
}

/// Folds every `--config-override` value into one set of overrides; later
/// values win.
pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();

    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::StorePath => {
                overrides.store_path = Some(PathBuf::from(parsed.value));
            }
            ConfigOverrideTarget::Threshold => {
                let threshold = parsed
                    .value
                    .parse::<usize>()
                    .map_err(|_| "threshold must be a non-negative integer".to_string())?;
                overrides.overload_threshold = Some(threshold);
            }
            ConfigOverrideTarget::ExportPath => overrides.export_path = Some(parsed.value),
            ConfigOverrideTarget::LogLevel => overrides.log_level = Some(parsed.value),
        }
    }

    Ok(overrides)
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, ConfigOverrideTarget, collect_overrides, parse_config_override};
    use clap::Parser;
    use std::path::PathBuf;
    use task_core::model::Priority;

    #[test]
    fn parse_config_override_canonicalizes_field_names() {
        let parsed = parse_config_override(" Overload-Threshold = 3 ").unwrap();

        assert_eq!(parsed.target, ConfigOverrideTarget::Threshold);
        assert_eq!(parsed.value, "3");
    }

    #[test]
    fn parse_config_override_rejects_unknown_fields() {
        let err = parse_config_override("theme=noir").unwrap_err();
        assert!(err.contains("unknown config field"));
    }

    #[test]
    fn parse_config_override_rejects_missing_equals() {
        let err = parse_config_override("threshold3").unwrap_err();
        assert!(err.contains("KEY=VALUE"));
    }

    #[test]
    fn parse_config_override_rejects_empty_value() {
        let err = parse_config_override("export_path= ").unwrap_err();
        assert!(err.contains("requires a value"));
    }

    #[test]
    fn collect_overrides_applies_in_order() {
        let raw = vec![
            "threshold=3".to_string(),
            "store path = /tmp/a.json".to_string(),
            "threshold=7".to_string(),
        ];

        let overrides = collect_overrides(&raw).unwrap();

        assert_eq!(overrides.overload_threshold, Some(7));
        assert_eq!(overrides.store_path, Some(PathBuf::from("/tmp/a.json")));
        assert_eq!(overrides.export_path, None);
    }

    #[test]
    fn collect_overrides_rejects_bad_threshold() {
        let err = collect_overrides(&["threshold=many".to_string()]).unwrap_err();
        assert!(err.contains("non-negative integer"));
    }

    #[test]
    fn add_joins_words_and_parses_priority() {
        let cli = Cli::try_parse_from([
            "task-cli", "add", "Buy", "milk", "--priority", "high", "-c", "Home",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Add {
                description,
                priority,
                category,
            }) => {
                assert_eq!(description.join(" "), "Buy milk");
                assert_eq!(priority, Some(Priority::High));
                assert_eq!(category.as_deref(), Some("Home"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn done_requires_numeric_id() {
        assert!(Cli::try_parse_from(["task-cli", "done", "abc"]).is_err());
        assert!(Cli::try_parse_from(["task-cli", "done", "3"]).is_ok());
    }

    #[test]
    fn missing_subcommand_parses_to_none() {
        let cli = Cli::try_parse_from(["task-cli", "--json"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.json);
    }
}
