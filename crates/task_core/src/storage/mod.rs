use crate::error::AppError;
use serde_json::Value;

pub mod json_store;
pub mod memory;

pub use json_store::JsonTaskStorage;
pub use memory::MemoryTaskStorage;

/// Persistence for the raw task records. Records are promoted to tasks by
/// the manager, so implementations never interpret them.
pub trait TaskStorage {
    fn load(&self) -> Result<Vec<Value>, AppError>;

    fn save(&mut self, records: &[Value]) -> Result<(), AppError>;

    fn exists(&self) -> bool;

    fn create_if_not_exists(&self) -> Result<(), AppError>;
}
