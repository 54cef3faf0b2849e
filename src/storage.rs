// Local key-value store: the app's stand-in for browser local storage.
// Holds the chosen language and the list of notify-form submissions.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Error;

/// String keys to string values.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), Error>;
}

/// In-process store; nothing survives the run.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), Error> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// A JSON object on disk, rewritten in full on every `set`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open (or start) the store at `path`. A missing file is an empty store;
    /// an unreadable or malformed one is logged and also treated as empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "store file is not a JSON string map; starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read store file; starting empty");
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), keys = entries.len(), "opened local store");
        Self { path, entries }
    }

    fn flush(&self) -> Result<(), Error> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), Error> {
        self.entries.insert(key.to_owned(), value);
        self.flush()
    }
}
