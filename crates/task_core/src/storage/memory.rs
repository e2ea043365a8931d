use crate::error::AppError;
use crate::storage::TaskStorage;
use serde_json::Value;

/// Keeps records in memory; used by tests and embedders that persist
/// elsewhere.
#[derive(Debug, Default, Clone)]
pub struct MemoryTaskStorage {
    records: Vec<Value>,
    saves: usize,
}

impl MemoryTaskStorage {
    pub fn new(records: Vec<Value>) -> Self {
        Self { records, saves: 0 }
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    /// Number of `save` calls seen so far.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl TaskStorage for MemoryTaskStorage {
    fn load(&self) -> Result<Vec<Value>, AppError> {
        Ok(self.records.clone())
    }

    fn save(&mut self, records: &[Value]) -> Result<(), AppError> {
        self.records = records.to_vec();
        self.saves += 1;
        Ok(())
    }

    fn exists(&self) -> bool {
        true
    }

    fn create_if_not_exists(&self) -> Result<(), AppError> {
        Ok(())
    }
}
