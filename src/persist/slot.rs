//! Durable storage slots: named string records under a fixed namespace.
//!
//! A slot is deliberately dumb storage. Shape validation and fallback
//! behavior live in the persistence layer; a slot only moves strings.

use std::{
    collections::HashMap,
    env::var,
    fs::{create_dir_all, read_to_string, write},
    io::Error as IoError,
    path::PathBuf,
};

use {parking_lot::Mutex, thiserror::Error, tracing::debug};

/// Error type for slot writes.
#[derive(Error, Debug)]
pub enum SlotError {
    /// Failed to write the record to durable storage.
    #[error("IO error: {0}")]
    Io(#[from] IoError),
}

/// A single named durable record.
///
/// Reads are infallible from the caller's perspective: any record that
/// cannot be produced is simply absent. Writes are serialized by the
/// implementation so concurrent writers cannot interleave partial
/// records; the last committed write wins.
pub trait StorageSlot: Send + Sync {
    /// Returns the record stored under `key`, if any.
    fn read(&self, key: &str) -> Option<String>;

    /// Replaces the record stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), SlotError>;
}

/// File-backed slot: one `<key>.json` record per key in the data directory.
#[derive(Debug)]
pub struct FileSlot {
    dir: PathBuf,
    write_guard: Mutex<()>,
}

impl FileSlot {
    /// Creates a slot rooted at the XDG data directory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dir(get_data_dir())
    }

    /// Creates a slot rooted at a custom directory (for testing).
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_guard: Mutex::new(()),
        }
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Default for FileSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageSlot for FileSlot {
    fn read(&self, key: &str) -> Option<String> {
        read_to_string(self.record_path(key)).ok()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SlotError> {
        let _serialized = self.write_guard.lock();
        create_dir_all(&self.dir)?;
        let path = self.record_path(key);
        debug!("writing slot record to {path:?}");
        write(path, value)?;
        Ok(())
    }
}

/// In-process slot for hosts without a filesystem, and for tests.
#[derive(Debug, Default)]
pub struct MemorySlot {
    records: Mutex<HashMap<String, String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record directly, bypassing the persistence layer.
    pub fn seed(&self, key: impl Into<String>, value: impl Into<String>) {
        self.records.lock().insert(key.into(), value.into());
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self, key: &str) -> Option<String> {
        self.records.lock().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SlotError> {
        self.records.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Gets the XDG data directory for the application.
///
/// Uses `XDG_DATA_HOME` if set, otherwise defaults to `$HOME/.local/share`.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    let mut data_dir = get_xdg_data_home();
    data_dir.push("coffylapse");
    data_dir
}

fn get_xdg_data_home() -> PathBuf {
    if let Ok(data_home) = var("XDG_DATA_HOME")
        && !data_home.is_empty()
    {
        return PathBuf::from(data_home);
    }

    if let Ok(home) = var("HOME") {
        let mut path = PathBuf::from(home);
        path.push(".local");
        path.push("share");
        return path;
    }

    // Fallback to current directory if HOME is not set (shouldn't happen on Unix)
    PathBuf::from(".")
}
