//! Persistence backends for save data and snapshot side-files.
//!
//! Keys are flat file names such as `inventory_data.json` or `<itemID>.png`.

use ahash::AHashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::core::error::{Result, WeldError};

/// Key-value byte storage used by the inventory store
pub trait Persistence {
    /// Read the value stored under `key`, `None` if nothing was ever written
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the value stored under `key`
    fn write(&mut self, key: &str, data: &[u8]) -> Result<()>;

    fn exists(&self, key: &str) -> bool;
}

/// Files in a single directory
#[derive(Debug, Clone)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of `key` inside the base directory.
    ///
    /// Keys are plain file names; anything that could leave `base_dir` is
    /// rejected.
    pub fn resolve(&self, key: &str) -> Result<PathBuf> {
        let plain = !key.is_empty()
            && key != "."
            && !key.contains(|c: char| matches!(c, '/' | '\\' | ':'))
            && !key.contains("..");
        if !plain {
            return Err(WeldError::InvalidKey(key.to_string()));
        }
        Ok(self.base_dir.join(key))
    }
}

impl Persistence for FileStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.resolve(key)?) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to `{key}.tmp`, sync, then rename over the old file so a crash
    /// mid-write leaves the previous save intact.
    fn write(&mut self, key: &str, data: &[u8]) -> Result<()> {
        let final_path = self.resolve(key)?;
        let mut tmp_name = final_path.clone().into_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::create_dir_all(&self.base_dir)?;

        let mut file = File::create(&tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;

        fs::rename(&tmp_path, &final_path)?;
        Ok(())
    }

    fn exists(&self, key: &str) -> bool {
        self.resolve(key).map_or(false, |path| path.is_file())
    }
}

/// In-memory backend; counts writes and can be told to fail them
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: AHashMap<String, Vec<u8>>,
    writes: usize,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Make every following write fail with an I/O error
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.files.get(key).map(Vec::as_slice)
    }

    pub fn insert(&mut self, key: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.files.insert(key.into(), data.into());
    }
}

impl Persistence for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.files.get(key).cloned())
    }

    fn write(&mut self, key: &str, data: &[u8]) -> Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::Other, format!("write to {} refused", key)).into());
        }
        self.files.insert(key.to_string(), data.to_vec());
        self.writes += 1;
        Ok(())
    }

    fn exists(&self, key: &str) -> bool {
        self.files.contains_key(key)
    }
}
