use crate::error::AppError;
use crate::model::{DEFAULT_CATEGORY, Priority, Task, TaskStatus, now_timestamp};
use crate::service::AnalyzerService;
use crate::storage::TaskStorage;
use crate::validate::{SkippedRecord, admit_records, validate_description};
use std::fmt;

pub const MSG_NO_TASKS: &str = "No tasks found";

/// Result of a manager operation. `Display` renders the message shown to the
/// user; user-input problems are outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(Task),
    EmptyDescription,
    IdsExhausted,
    NotFound(u64),
    AlreadyDone(u64),
    MarkedDone(Task),
    Deleted(Task),
    Cleared { removed: usize },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(
            self,
            Self::EmptyDescription | Self::IdsExhausted | Self::NotFound(_) | Self::AlreadyDone(_)
        )
    }

    pub fn task(&self) -> Option<&Task> {
        match self {
            Self::Added(task) | Self::MarkedDone(task) | Self::Deleted(task) => Some(task),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added(task) => write!(f, "Added: {}", task.description),
            Self::EmptyDescription => f.write_str("Error: Task description cannot be empty"),
            Self::IdsExhausted => f.write_str("Error: No task ids left"),
            Self::NotFound(id) => write!(f, "Error: Task {id} not found"),
            Self::AlreadyDone(id) => write!(f, "Task {id} is already done"),
            Self::MarkedDone(task) => write!(f, "Task {} marked as done", task.id),
            Self::Deleted(task) => write!(f, "Task {} deleted", task.id),
            Self::Cleared { .. } => f.write_str("Cleared all completed tasks"),
        }
    }
}

/// Owns the task list for the life of the process and writes it back after
/// every mutation.
#[derive(Debug)]
pub struct TaskManager<S: TaskStorage> {
    storage: S,
    tasks: Vec<Task>,
    skipped: Vec<SkippedRecord>,
}

impl<S: TaskStorage> TaskManager<S> {
    /// Hydrates from storage. Unreadable content resets to an empty list;
    /// individual bad records are skipped. Only I/O failures are returned.
    pub fn open(storage: S) -> Result<Self, AppError> {
        let records = match storage.load() {
            Ok(records) => records,
            Err(err) if err.is_data_format() => {
                tracing::warn!(error = %err, "task file unreadable, starting with an empty list");
                Vec::new()
            }
            Err(err) => return Err(err),
        };

        let admission = admit_records(records);
        for skip in &admission.skipped {
            tracing::warn!(
                index = skip.index,
                reason = skip.reason.message(),
                "Skipping invalid task"
            );
        }

        Ok(Self {
            storage,
            tasks: admission.tasks,
            skipped: admission.skipped,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn find(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn analyzer(&self) -> AnalyzerService<'_, S> {
        AnalyzerService::new(self)
    }

    /// `None` once the largest stored id is `u64::MAX`.
    fn next_id(&self) -> Option<u64> {
        self.tasks
            .iter()
            .map(|task| task.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
    }

    pub fn add(&mut self, description: &str) -> Outcome {
        self.add_with(description, Priority::default(), None)
    }

    pub fn add_with(
        &mut self,
        description: &str,
        priority: Priority,
        category: Option<&str>,
    ) -> Outcome {
        if !validate_description(description) {
            return Outcome::EmptyDescription;
        }

        let Some(id) = self.next_id() else {
            tracing::warn!("task id space exhausted");
            return Outcome::IdsExhausted;
        };

        let mut task = Task::new(id, description.trim(), now_timestamp());
        task.priority = priority;
        task.category = category
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string();

        self.tasks.push(task.clone());
        self.persist();
        Outcome::Added(task)
    }

    pub fn list(&self) -> Vec<String> {
        if self.tasks.is_empty() {
            return vec![MSG_NO_TASKS.to_string()];
        }

        self.tasks
            .iter()
            .map(|task| format!("[{}] {} ({})", task.id, task.description, task.status))
            .collect()
    }

    /// Highest priority first, newest first within a priority.
    pub fn prioritized(&self) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.iter().collect();
        tasks.sort_by(|a, b| {
            b.priority
                .weight()
                .cmp(&a.priority.weight())
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        tasks
    }

    pub fn done(&mut self, id: u64) -> Outcome {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return Outcome::NotFound(id);
        };

        if task.status == TaskStatus::Done {
            return Outcome::AlreadyDone(id);
        }

        task.status = TaskStatus::Done;
        task.completed_at = Some(now_timestamp());
        let updated = task.clone();
        self.persist();
        Outcome::MarkedDone(updated)
    }

    pub fn delete(&mut self, id: u64) -> Outcome {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            return Outcome::NotFound(id);
        };

        let removed = self.tasks.remove(index);
        self.persist();
        Outcome::Deleted(removed)
    }

    pub fn clear(&mut self) -> Outcome {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.status == TaskStatus::Pending);
        let removed = before - self.tasks.len();
        self.persist();
        Outcome::Cleared { removed }
    }

    /// A failed save terminates the process; there is no partial-write
    /// recovery.
    fn persist(&mut self) {
        let records: Vec<serde_json::Value> = self.tasks.iter().map(Task::to_record).collect();
        if let Err(err) = self.storage.save(&records) {
            fail_fast(&err);
        }
    }
}

fn fail_fast(err: &AppError) -> ! {
    tracing::error!(error = %err, "unable to write task file");
    match err {
        AppError::PermissionDenied(_) => {
            eprintln!("Error: Permission denied. Unable to write task file.")
        }
        other => eprintln!("Error: Unable to write task file: {}", other.message()),
    }
    std::process::exit(1);
}
