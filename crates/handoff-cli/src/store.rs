//! Settings persisted as a single JSON object on disk.

use handoff_core::{Error, Result, SettingsKey, SettingsStore};
use serde_json::{Map, Value};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A [`SettingsStore`] backed by one JSON file.
///
/// Every `set` holds an advisory lock on `<file>.lock`, re-reads the object
/// from disk, replaces only its own key and renames a temporary file over the
/// original. Keys written by other processes since `open` survive.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = read_object(&path)?;
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    fn lock_file(&self) -> Result<fd_lock::RwLock<File>> {
        fs::create_dir_all(self.dir())?;

        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir().join(name))?;
        Ok(fd_lock::RwLock::new(file))
    }

    fn persist(&self, values: &Map<String, Value>) -> Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(self.dir())?;
        tmp.write_all(serde_json::to_string_pretty(values)?.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Wrote settings to {}", self.path.display());
        Ok(())
    }
}

fn read_object(path: &Path) -> Result<Map<String, Value>> {
    if !path.exists() {
        tracing::debug!("No settings at {}, starting empty", path.display());
        return Ok(Map::new());
    }

    tracing::debug!("Reading settings from: {}", path.display());
    let content = fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Object(values) => Ok(values),
        _ => Err(Error::Store(format!(
            "{} does not hold a JSON object",
            path.display()
        ))),
    }
}

impl SettingsStore for FileStore {
    fn get(&self, key: SettingsKey) -> Result<Option<Value>> {
        Ok(self.values.get(key.as_str()).cloned())
    }

    fn set(&mut self, key: SettingsKey, value: Value) -> Result<()> {
        let mut lock = self.lock_file()?;
        let _held = lock.write()?;

        let mut values = read_object(&self.path)?;
        values.insert(key.as_str().to_string(), value);
        self.persist(&values)?;
        self.values = values;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let mut lock = self.lock_file()?;
        let _held = lock.write()?;

        self.values.clear();
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
