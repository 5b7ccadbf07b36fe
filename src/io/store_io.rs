use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::io::schema::{self, SchemaViolation};
use crate::model::store::TaskStore;

/// Appended to the file name when a corrupt file is set aside
pub const BACKUP_SUFFIX: &str = ".backup";
/// Appended to the file name for the in-progress save
pub const TEMP_SUFFIX: &str = ".tmp";

const INDENT: &[u8] = b"    ";

/// Why a task file could not be trusted
#[derive(Debug, thiserror::Error)]
pub enum CorruptError {
    #[error("could not read {path}: {source}")]
    Unreadable { path: PathBuf, source: io::Error },
    #[error("{path} is not valid JSON: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{path} has an invalid structure: {source}")]
    Schema {
        path: PathBuf,
        source: SchemaViolation,
    },
}

/// Error type for saving the task file
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("could not create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("could not replace {path}: {source}")]
    Replace { path: PathBuf, source: io::Error },
    #[error("could not serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// What a load had to do with a corrupt file
#[derive(Debug)]
pub struct Recovery {
    pub reason: CorruptError,
    /// Where the corrupt file was (or was meant to be) moved
    pub backup_path: PathBuf,
    /// Set when the rename failed; the corrupt file is then still in place
    pub backup_error: Option<io::Error>,
}

impl Recovery {
    pub fn backed_up(&self) -> bool {
        self.backup_error.is_none()
    }
}

/// Result of [`StoreFile::load`]. The store is empty when a recovery happened.
#[derive(Debug)]
pub struct Loaded {
    pub store: TaskStore,
    pub recovery: Option<Recovery>,
}

/// Result of a side-effect-free look at the task file
#[derive(Debug)]
pub enum Inspection {
    Missing,
    Valid(TaskStore),
    Corrupt(CorruptError),
}

/// The JSON file a [`TaskStore`] lives in, plus its temp and backup siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreFile {
    path: PathBuf,
}

impl StoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn temp_path(&self) -> PathBuf {
        with_suffix(&self.path, TEMP_SUFFIX)
    }

    /// First backup name not already taken: `<file>.backup`, then
    /// `<file>.backup.1`, `<file>.backup.2`, ...
    pub fn backup_path(&self) -> PathBuf {
        let base = with_suffix(&self.path, BACKUP_SUFFIX);
        if !base.exists() {
            return base;
        }
        (1u32..)
            .map(|n| with_suffix(&base, &format!(".{}", n)))
            .find(|p| !p.exists())
            .unwrap_or(base)
    }

    /// Read and validate the file without touching it.
    pub fn inspect(&self) -> Inspection {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Inspection::Missing,
            Err(e) => {
                return Inspection::Corrupt(CorruptError::Unreadable {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        match decode(&self.path, &bytes) {
            Ok(store) => Inspection::Valid(store),
            Err(e) => Inspection::Corrupt(e),
        }
    }

    /// Load the store. A missing file is an empty store; a corrupt file is
    /// renamed to a backup and also yields an empty store.
    pub fn load(&self) -> Loaded {
        match self.inspect() {
            Inspection::Missing => {
                log::info!(
                    "{} does not exist, starting with no tasks",
                    self.path.display()
                );
                Loaded {
                    store: TaskStore::new(),
                    recovery: None,
                }
            }
            Inspection::Valid(store) => {
                log::info!(
                    "loaded {} tasks from {}",
                    store.task_count(),
                    self.path.display()
                );
                Loaded {
                    store,
                    recovery: None,
                }
            }
            Inspection::Corrupt(reason) => {
                log::warn!("{}", reason);
                Loaded {
                    store: TaskStore::new(),
                    recovery: Some(self.set_aside(reason)),
                }
            }
        }
    }

    fn set_aside(&self, reason: CorruptError) -> Recovery {
        self.set_aside_to(reason, self.backup_path())
    }

    /// Rename the corrupt file to `backup_path`. A failed rename is logged
    /// and carried in the returned [`Recovery`]; it never aborts the load.
    fn set_aside_to(&self, reason: CorruptError, backup_path: PathBuf) -> Recovery {
        let backup_error = match fs::rename(&self.path, &backup_path) {
            Ok(()) => {
                log::warn!(
                    "corrupt task file backed up as {}",
                    backup_path.display()
                );
                None
            }
            Err(e) => {
                log::error!(
                    "failed to back up corrupt task file {} to {}: {}",
                    self.path.display(),
                    backup_path.display(),
                    e
                );
                Some(e)
            }
        };
        Recovery {
            reason,
            backup_path,
            backup_error,
        }
    }

    /// Write the whole store to the temp file, then rename it over the real
    /// file. The real file is never written in place.
    pub fn save(&self, store: &TaskStore) -> Result<(), PersistError> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
            && !dir.is_dir()
        {
            fs::create_dir_all(dir).map_err(|e| PersistError::CreateDir {
                path: dir.to_path_buf(),
                source: e,
            })?;
            log::info!("created data directory {}", dir.display());
        }

        let content = encode(store)?;
        let temp = self.temp_path();
        write_synced(&temp, &content).map_err(|e| PersistError::Write {
            path: temp.clone(),
            source: e,
        })?;
        fs::rename(&temp, &self.path).map_err(|e| PersistError::Replace {
            path: self.path.clone(),
            source: e,
        })?;
        log::debug!("saved {} tasks to {}", store.task_count(), self.path.display());
        Ok(())
    }
}

/// Serialize a store the way it is laid out on disk: pretty-printed with
/// four-space indentation, no trailing newline.
pub fn encode(store: &TaskStore) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    store.serialize(&mut ser)?;
    Ok(out)
}

/// Decode and validate file content.
pub fn decode(path: &Path, bytes: &[u8]) -> Result<TaskStore, CorruptError> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| CorruptError::Decode {
            path: path.to_path_buf(),
            source: e,
        })?;
    schema::check(&value).map_err(|e| CorruptError::Schema {
        path: path.to_path_buf(),
        source: e,
    })?;
    // The shape was checked above, so this only fails on a validator bug.
    serde_json::from_value(value).map_err(|e| CorruptError::Decode {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_synced(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
