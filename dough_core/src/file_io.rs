//! # File I/O Module
//!
//! Persists the preset library to disk:
//! - **Atomic saves**: write to a temp file, fsync, rename over the target
//! - **File locking**: one writer at a time, visible to other users through a
//!   `.lock` file describing the holder
//! - **Version validation**: refuse libraries written by a newer schema
//!
//! ## File Format
//!
//! A library is a `.dough` file containing JSON ([`PresetLibrary`]). The lock
//! file sits next to it as `<name>.dough.lock`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dough_core::file_io::FilePresetStore;
//! use dough_core::preset::PresetStore;
//! use dough_core::recipe::DoughConfig;
//!
//! let mut store = FilePresetStore::new("presets.dough", "baker");
//! store.save("Neapolitan", &DoughConfig::default())?;
//! let names = store.list()?;
//! # Ok::<(), dough_core::errors::FormulaError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{FormulaError, FormulaResult};
use crate::preset::{PresetLibrary, PresetStore, SCHEMA_VERSION};
use crate::recipe::DoughConfig;

/// Extension for preset library files
pub const LIBRARY_EXTENSION: &str = "dough";

/// Contents of a `.lock` file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    /// Who holds the lock (user name or email)
    pub user_id: String,
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    fn holder(&self) -> String {
        format!("{} ({})", self.user_id, self.machine)
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// Exclusive lock on a library file, released on drop.
///
/// Holds an OS lock (fs2) on the `.lock` file and writes [`LockInfo`] into
/// it so other processes can report who is editing.
#[derive(Debug)]
pub struct FileLock {
    target: PathBuf,
    lock_path: PathBuf,
    _handle: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire the lock for `path`.
    ///
    /// Fails with [`FormulaError::FileLocked`] while another handle holds the
    /// OS lock. A `.lock` file left behind by a holder that exited without
    /// cleaning up carries no OS lock and is taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> FormulaResult<Self> {
        let lock_path = lock_path_for(path);
        let lock_err =
            |op: &str, e: std::io::Error| FormulaError::file_error(op, lock_path.display().to_string(), e.to_string());

        // Must not truncate here: the current holder's info is still in there
        let mut handle = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| lock_err("open lock", e))?;

        if handle.try_lock_exclusive().is_err() {
            let (holder, since) = match read_lock_info(&lock_path) {
                Some(existing) => (existing.holder(), existing.locked_at.to_rfc3339()),
                None => ("another process".to_string(), "unknown".to_string()),
            };
            return Err(FormulaError::file_locked(path.display().to_string(), holder, since));
        }

        if let Some(leftover) = read_lock_info(&lock_path) {
            tracing::warn!(
                path = %path.display(),
                holder = %leftover.holder(),
                "taking over abandoned lock"
            );
        }

        let info = LockInfo::new(user_id);
        let json = serde_json::to_string_pretty(&info).map_err(|e| FormulaError::serialization(e.to_string()))?;
        handle.set_len(0).map_err(|e| lock_err("truncate lock", e))?;
        handle.seek(SeekFrom::Start(0)).map_err(|e| lock_err("seek lock", e))?;
        handle.write_all(json.as_bytes()).map_err(|e| lock_err("write lock", e))?;
        handle.sync_all().map_err(|e| lock_err("sync lock", e))?;

        tracing::debug!(path = %path.display(), user = %info.user_id, "lock acquired");
        Ok(FileLock {
            target: path.to_path_buf(),
            lock_path,
            _handle: handle,
            info,
        })
    }

    /// Current holder of the lock on `path`, if anyone holds it.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        let handle = File::open(&lock_path).ok()?;
        if handle.try_lock_shared().is_ok() {
            let _ = handle.unlock();
            return None;
        }
        read_lock_info(&lock_path)
    }

    pub fn target(&self) -> &Path {
        &self.target
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `presets.dough` -> `presets.dough.lock`
fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

/// `presets.dough` -> `presets.dough.tmp`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn ensure_parent_dir(path: &Path) -> FormulaResult<()> {
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => fs::create_dir_all(parent)
            .map_err(|e| FormulaError::file_error("create directory", parent.display().to_string(), e.to_string())),
        None => Ok(()),
    }
}

/// Unreadable or malformed lock files count as no lock.
fn read_lock_info(lock_path: &Path) -> Option<LockInfo> {
    let text = fs::read_to_string(lock_path).ok()?;
    serde_json::from_str(&text).ok()
}

/// Write `library` to `path` atomically.
///
/// The JSON goes to a sibling `.tmp` file which is synced and renamed over
/// `path`. A crash mid-write leaves the previous file intact.
pub fn save_library(library: &PresetLibrary, path: &Path) -> FormulaResult<()> {
    let json = serde_json::to_string_pretty(library).map_err(|e| FormulaError::serialization(e.to_string()))?;
    ensure_parent_dir(path)?;

    let tmp_path = tmp_path_for(path);
    let tmp_err =
        |op: &str, e: std::io::Error| FormulaError::file_error(op, tmp_path.display().to_string(), e.to_string());

    let mut tmp = File::create(&tmp_path).map_err(|e| tmp_err("create temp file", e))?;
    tmp.write_all(json.as_bytes()).map_err(|e| tmp_err("write temp file", e))?;
    tmp.sync_all().map_err(|e| tmp_err("sync temp file", e))?;
    drop(tmp);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        FormulaError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::debug!(path = %path.display(), presets = library.len(), "library saved");
    Ok(())
}

/// Read a library from `path` and check its schema version.
pub fn load_library(path: &Path) -> FormulaResult<PresetLibrary> {
    let text = fs::read_to_string(path)
        .map_err(|e| FormulaError::file_error("read", path.display().to_string(), e.to_string()))?;
    let library: PresetLibrary = serde_json::from_str(&text)
        .map_err(|e| FormulaError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))?;
    validate_version(&library.version)?;
    Ok(library)
}

/// Like [`load_library`], but a missing file is an empty library.
pub fn load_library_or_default(path: &Path) -> FormulaResult<PresetLibrary> {
    if path.exists() {
        load_library(path)
    } else {
        Ok(PresetLibrary::new())
    }
}

/// Accept files with the same major version and, while on 0.x, a minor
/// version no newer than ours.
fn validate_version(file_version: &str) -> FormulaResult<()> {
    let parse = |v: &str| -> Option<(u32, u32)> {
        let mut parts = v.split('.').map(|p| p.parse::<u32>().ok());
        let major = parts.next()??;
        let minor = parts.next().flatten().unwrap_or(0);
        Some((major, minor))
    };
    let mismatch = || FormulaError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let (file_major, file_minor) = parse(file_version).ok_or_else(mismatch)?;
    let (ours_major, ours_minor) = parse(SCHEMA_VERSION).ok_or_else(mismatch)?;

    if file_major != ours_major || (ours_major == 0 && file_minor > ours_minor) {
        return Err(mismatch());
    }
    Ok(())
}

/// Preset store backed by a `.dough` library file.
///
/// Every mutation locks the file, re-reads it, applies the change and saves
/// atomically, so two processes never overwrite each other's edits.
#[derive(Debug, Clone)]
pub struct FilePresetStore {
    path: PathBuf,
    user_id: String,
}

impl FilePresetStore {
    pub fn new(path: impl Into<PathBuf>, user_id: impl Into<String>) -> Self {
        FilePresetStore {
            path: path.into(),
            user_id: user_id.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut PresetLibrary) -> FormulaResult<T>) -> FormulaResult<T> {
        ensure_parent_dir(&self.path)?;
        let _lock = FileLock::acquire(&self.path, self.user_id.as_str())?;
        let mut library = load_library_or_default(&self.path)?;
        let out = f(&mut library)?;
        save_library(&library, &self.path)?;
        Ok(out)
    }
}

impl PresetStore for FilePresetStore {
    fn save(&mut self, name: &str, config: &DoughConfig) -> FormulaResult<()> {
        self.mutate(|library| library.upsert(name, config.clone()).map(|_| ()))?;
        tracing::info!(preset = name, path = %self.path.display(), "preset saved");
        Ok(())
    }

    fn load(&self, name: &str) -> FormulaResult<Option<DoughConfig>> {
        let library = load_library_or_default(&self.path)?;
        Ok(library.find_by_name(name.trim()).map(|p| p.config.clone()))
    }

    fn list(&self) -> FormulaResult<Vec<String>> {
        Ok(load_library_or_default(&self.path)?.names())
    }

    fn delete(&mut self, name: &str) -> FormulaResult<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let removed = self.mutate(|library| Ok(library.remove_by_name(name.trim()).is_some()))?;
        if removed {
            tracing::info!(preset = name, path = %self.path.display(), "preset deleted");
        }
        Ok(removed)
    }
}
