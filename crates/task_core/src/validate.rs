use crate::error::AppError;
use crate::model::{Task, TaskStatus};
use serde_json::Value;

pub const FIELD_ID: &str = "id";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_STATUS: &str = "status";

const REQUIRED_FIELDS: [&str; 3] = [FIELD_ID, FIELD_DESCRIPTION, FIELD_STATUS];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position of the record in the stored array.
    pub index: usize,
    pub reason: AppError,
}

#[derive(Debug, Default)]
pub struct Admission {
    pub tasks: Vec<Task>,
    pub skipped: Vec<SkippedRecord>,
}

/// Structural check only: every required key is present.
pub fn validate_task_dict(record: &Value) -> bool {
    REQUIRED_FIELDS
        .iter()
        .all(|field| record.get(field).is_some())
}

pub fn validate_id(id: u64) -> bool {
    id > 0
}

pub fn validate_description(description: &str) -> bool {
    !description.trim().is_empty()
}

pub fn validate_status(status: &str) -> bool {
    TaskStatus::from_label(status).is_some()
}

/// Reports the first violation, checked in a fixed order.
pub fn validate_task_fields(record: &Value) -> Result<(), AppError> {
    for field in REQUIRED_FIELDS {
        if record.get(field).is_none() {
            return Err(AppError::validation(format!(
                "Missing required field: {field}"
            )));
        }
    }

    if !(record[FIELD_ID].is_i64() || record[FIELD_ID].is_u64()) {
        return Err(AppError::validation("Task ID must be an integer"));
    }

    if !record[FIELD_DESCRIPTION].is_string() {
        return Err(AppError::validation("Task description must be a string"));
    }

    match record[FIELD_STATUS].as_str() {
        Some(status) if validate_status(status) => Ok(()),
        _ => Err(AppError::validation(
            "Task status must be 'pending' or 'done'",
        )),
    }
}

fn admit(record: &Value) -> Result<Task, AppError> {
    validate_task_fields(record)?;
    let task = Task::from_record(record)?;
    if !validate_id(task.id) {
        return Err(AppError::validation("Task ID must be a positive integer"));
    }
    Ok(task)
}

/// Splits stored records into admitted tasks and skipped records. One bad
/// record never stops the rest from loading.
pub fn admit_records(records: Vec<Value>) -> Admission {
    let mut admission = Admission::default();

    for (index, record) in records.iter().enumerate() {
        match admit(record) {
            Ok(task) => admission.tasks.push(task),
            Err(reason) => admission.skipped.push(SkippedRecord { index, reason }),
        }
    }

    admission
}
