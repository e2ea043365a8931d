use crate::analyzer::TaskAnalyzer;
use crate::model::{Task, utc_timestamp};
use std::path::Path;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const SEPARATOR_WIDTH: usize = 50;

pub const DEFAULT_EXPORT_FILE: &str = "summary.txt";

/// Renders statistics and analyzer output as plain text.
#[derive(Debug, Clone, Copy)]
pub struct ReportGenerator<'a> {
    tasks: &'a [Task],
    analyzer: TaskAnalyzer<'a>,
}

fn separator() -> String {
    "=".repeat(SEPARATOR_WIDTH)
}

/// `[id] description (priority, category, status)`
pub fn format_task(task: &Task) -> String {
    format!(
        "[{}] {} ({}, {}, {})",
        task.id, task.description, task.priority, task.category, task.status
    )
}

fn generated_at() -> String {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let now = OffsetDateTime::now_utc().to_offset(offset);
    now.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))
    .unwrap_or_else(|_| utc_timestamp(now))
}

impl<'a> ReportGenerator<'a> {
    pub fn new(tasks: &'a [Task], analyzer: TaskAnalyzer<'a>) -> Self {
        Self { tasks, analyzer }
    }

    pub fn format_task(&self, task: &Task) -> String {
        format_task(task)
    }

    pub fn format_statistics(&self) -> String {
        let stats = self.analyzer.statistics();
        [
            format!("Total tasks: {}", stats.total()),
            format!("Completed: {}", stats.completed()),
            format!("Pending: {}", stats.pending()),
            format!("Completion rate: {:.2}%", stats.completion_rate()),
        ]
        .join("\n")
    }

    pub fn format_category_stats(&self) -> String {
        let mut lines = vec!["By category:".to_string()];
        for (category, count) in self.analyzer.statistics().by_category().sorted() {
            lines.push(format!("- {category}: {count}"));
        }
        lines.join("\n")
    }

    pub fn format_priority_stats(&self) -> String {
        let mut lines = vec!["By priority:".to_string()];
        for (priority, count) in self.analyzer.priority_distribution().sorted() {
            lines.push(format!("- {priority}: {count}"));
        }
        lines.join("\n")
    }

    pub fn format_task_list(&self) -> String {
        if self.tasks.is_empty() {
            return "No tasks".to_string();
        }

        let mut lines = vec!["Tasks:".to_string()];
        lines.extend(self.tasks.iter().map(|task| self.format_task(task)));
        lines.join("\n")
    }

    pub fn generate_summary(&self) -> String {
        let separator = separator();
        [
            separator.clone(),
            "Daily Summary".to_string(),
            separator.clone(),
            self.format_statistics(),
            String::new(),
            self.format_category_stats(),
            separator,
        ]
        .join("\n")
    }

    pub fn generate_full_report(&self) -> String {
        self.full_report_at(&generated_at())
    }

    fn full_report_at(&self, generated_at: &str) -> String {
        let separator = separator();
        [
            separator.clone(),
            "Task Manager - Task Report".to_string(),
            separator.clone(),
            format!("Generated at: {generated_at}"),
            String::new(),
            separator.clone(),
            "Statistics".to_string(),
            separator.clone(),
            self.format_statistics(),
            String::new(),
            separator.clone(),
            "Categories".to_string(),
            separator.clone(),
            self.format_category_stats(),
            String::new(),
            separator.clone(),
            self.format_task_list(),
            String::new(),
            separator.clone(),
            self.format_priority_stats(),
            separator,
        ]
        .join("\n")
    }

    /// Writes the full report. Failures come back as a message, never as an
    /// error.
    pub fn export_to_txt(&self, path: &Path) -> String {
        let resolved = match std::path::absolute(path) {
            Ok(resolved) => resolved,
            Err(err) => return format!("Export failed: {err}"),
        };

        match std::fs::write(&resolved, self.generate_full_report()) {
            Ok(()) => {
                tracing::info!(path = %resolved.display(), "exported task report");
                format!("Report exported: {}", resolved.display())
            }
            Err(err) => {
                tracing::warn!(error = %err, path = %resolved.display(), "report export failed");
                format!("Export failed: {err}")
            }
        }
    }
}
