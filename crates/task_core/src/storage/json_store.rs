use crate::error::AppError;
use crate::storage::TaskStorage;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const DEFAULT_FILE_NAME: &str = ".tasks.json";
pub const BACKUP_SUFFIX: &str = ".backup";
const STORE_ENV_VAR: &str = "TASKCLI_STORE_PATH";

/// Task list persisted as a single JSON array, rewritten on every save.
#[derive(Debug, Clone)]
pub struct JsonTaskStorage {
    path: PathBuf,
}

impl JsonTaskStorage {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        let mut raw = self.path.clone().into_os_string();
        raw.push(BACKUP_SUFFIX);
        PathBuf::from(raw)
    }

    fn create_backup(&self) {
        if !self.exists() {
            return;
        }

        let backup = self.backup_path();
        if let Err(err) = std::fs::copy(&self.path, &backup) {
            tracing::debug!(error = %err, path = %backup.display(), "task file backup failed");
        }
    }
}

/// Resolution order: `TASKCLI_STORE_PATH`, then the configured path, then
/// `.tasks.json` in the home directory.
pub fn store_path(configured: Option<&Path>) -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if let Some(path) = configured {
        return Ok(path.to_path_buf());
    }

    if cfg!(windows) {
        let profile = std::env::var("USERPROFILE")
            .map_err(|_| AppError::invalid_data("USERPROFILE is not set"))?;
        Ok(PathBuf::from(profile).join(DEFAULT_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home).join(DEFAULT_FILE_NAME))
    }
}

fn write_records(path: &Path, records: &[Value]) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut content = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut content, formatter);
    records
        .serialize(&mut serializer)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content)?;

    Ok(())
}

impl TaskStorage for JsonTaskStorage {
    fn load(&self) -> Result<Vec<Value>, AppError> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let decoded: Value = serde_json::from_str(&content)
            .map_err(|err| AppError::parse(format!("Invalid JSON format: {err}")))?;

        match decoded {
            Value::Array(records) => Ok(records),
            _ => Err(AppError::invalid_format(
                "Invalid task file format. Expected array.",
            )),
        }
    }

    fn save(&mut self, records: &[Value]) -> Result<(), AppError> {
        self.create_backup();
        write_records(&self.path, records)?;
        tracing::debug!(path = %self.path.display(), count = records.len(), "saved task file");
        Ok(())
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn create_if_not_exists(&self) -> Result<(), AppError> {
        if self.exists() {
            return Ok(());
        }
        write_records(&self.path, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonTaskStorage, store_path};
    use crate::storage::TaskStorage;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("taskcli-{nanos}-{file_name}"))
    }

    #[test]
    fn load_missing_file_returns_empty() {
        let storage = JsonTaskStorage::new(temp_path("missing.json"));
        assert!(!storage.exists());
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = temp_path("round-trip.json");
        let mut storage = JsonTaskStorage::new(&path);
        let records = vec![serde_json::json!({
            "id": 1,
            "description": "买牛奶",
            "status": "pending",
            "createdAt": "2025-12-20T00:00:00Z",
            "completedAt": null
        })];

        storage.save(&records).unwrap();
        let loaded = storage.load().unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded, records);
        assert!(raw.contains("买牛奶"));
        assert!(raw.contains("\n  {"));
    }

    #[test]
    fn save_writes_backup_of_previous_content() {
        let path = temp_path("backup.json");
        let mut storage = JsonTaskStorage::new(&path);
        storage.save(&[serde_json::json!({"id": 1})]).unwrap();
        storage.save(&[serde_json::json!({"id": 2})]).unwrap();

        let backup = storage.backup_path();
        let backed_up: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&backup).unwrap()).unwrap();
        fs::remove_file(&path).ok();
        fs::remove_file(&backup).ok();

        assert!(backup.to_string_lossy().ends_with(".json.backup"));
        assert_eq!(backed_up[0]["id"], 1);
    }

    #[test]
    fn failed_backup_does_not_block_save() {
        let path = temp_path("backup-blocked.json");
        let mut storage = JsonTaskStorage::new(&path);
        storage.save(&[serde_json::json!({"id": 1})]).unwrap();
        let backup = storage.backup_path();
        fs::create_dir_all(&backup).unwrap();

        let result = storage.save(&[serde_json::json!({"id": 2})]);
        let loaded = storage.load();
        fs::remove_file(&path).ok();
        fs::remove_dir_all(&backup).ok();

        assert!(result.is_ok());
        assert_eq!(loaded.unwrap()[0]["id"], 2);
    }

    #[test]
    fn first_save_writes_no_backup() {
        let path = temp_path("first-save.json");
        let mut storage = JsonTaskStorage::new(&path);
        storage.save(&[]).unwrap();
        let backup_exists = storage.backup_path().exists();
        fs::remove_file(&path).ok();

        assert!(!backup_exists);
    }

    #[test]
    fn load_rejects_invalid_json() {
        let path = temp_path("invalid.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonTaskStorage::new(&path).load().unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "parse_error");
    }

    #[test]
    fn load_rejects_non_array_payload() {
        let path = temp_path("object.json");
        fs::write(&path, "{\"tasks\": []}").unwrap();

        let err = JsonTaskStorage::new(&path).load().unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_format");
        assert!(err.message().contains("Expected array"));
    }

    #[test]
    fn create_if_not_exists_creates_parents_and_empty_array() {
        let dir = temp_path("nested");
        let path = dir.join("deeper").join("tasks.json");
        let storage = JsonTaskStorage::new(&path);

        storage.create_if_not_exists().unwrap();
        let content = fs::read_to_string(&path).unwrap();
        fs::remove_dir_all(&dir).ok();

        assert_eq!(content.trim(), "[]");
    }

    #[test]
    fn create_if_not_exists_keeps_existing_content() {
        let path = temp_path("existing.json");
        fs::write(&path, "[{\"id\": 3}]").unwrap();

        JsonTaskStorage::new(&path).create_if_not_exists().unwrap();
        let content = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(content, "[{\"id\": 3}]");
    }

    #[test]
    fn store_path_prefers_configured_path_without_env() {
        if std::env::var("TASKCLI_STORE_PATH").is_ok() {
            return;
        }
        let configured = Path::new("/tmp/configured-tasks.json");
        let resolved = store_path(Some(configured)).unwrap();
        assert_eq!(resolved, configured);
    }
}
