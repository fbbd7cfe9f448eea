//! # File I/O Module
//!
//! Handles run files and report artifacts with safety features:
//! - **Atomic writes**: Write to .tmp, fsync, rename, so a failed scenario
//!   never leaves a partial artifact
//! - **Output locking**: Prevent two runs from writing one output directory
//! - **Version validation**: Ensure run-file schema compatibility
//!
//! ## Layout
//!
//! ```text
//! <out>/
//! ├── .beamcase.lock     (held while a run is writing)
//! ├── C1.00.csv
//! ├── C1.00.txt
//! ├── ...
//! └── summary.csv
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use beamcase_core::config::RunConfig;
//! use beamcase_core::file_io::{save_run_config, OutputLock};
//! use std::path::Path;
//!
//! save_run_config(&RunConfig::default(), Path::new("beamcase.json")).unwrap();
//!
//! // Lock is released when dropped
//! let lock = OutputLock::acquire(Path::new("csvs"), "engineer").unwrap();
//! drop(lock);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::config::{RunConfig, SCHEMA_VERSION};
use crate::errors::{CalcError, CalcResult};

/// Name of the lock file inside an output directory
pub const LOCK_FILE_NAME: &str = ".beamcase.lock";

/// Lock file metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (username or email)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
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

/// Output directory lock, released when dropped.
///
/// Combines an OS-level lock (fs2) with a JSON lock file naming the holder.
pub struct OutputLock {
    dir: PathBuf,
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    _lock_file: File,
    /// Lock metadata
    pub info: LockInfo,
}

impl OutputLock {
    /// Acquire an exclusive lock on an output directory, creating it if needed.
    ///
    /// # Returns
    ///
    /// * `Ok(OutputLock)` - Lock acquired
    /// * `Err(CalcError::FileLocked)` - Another run holds the lock
    pub fn acquire(dir: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        fs::create_dir_all(dir).map_err(|e| {
            CalcError::file_error("create directory", dir.display().to_string(), e.to_string())
        })?;

        let lock_path = dir.join(LOCK_FILE_NAME);
        let info = LockInfo::new(user_id);

        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                if !is_lock_stale(&existing) {
                    return Err(CalcError::file_locked(
                        dir.display().to_string(),
                        format!("{} ({}, pid {})", existing.user_id, existing.machine, existing.pid),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
            }
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| CalcError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

        // Non-blocking
        lock_file.try_lock_exclusive().map_err(|_| {
            CalcError::file_locked(dir.display().to_string(), "another process", "unknown")
        })?;

        let lock_json = serde_json::to_string_pretty(&info).map_err(|e| CalcError::SerializationError {
            reason: e.to_string(),
        })?;
        lock_file
            .write_all(lock_json.as_bytes())
            .and_then(|_| lock_file.sync_all())
            .map_err(|e| CalcError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

        Ok(OutputLock {
            dir: dir.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Holder of the lock on `dir`, if any
    pub fn check(dir: &Path) -> Option<LockInfo> {
        let lock_path = dir.join(LOCK_FILE_NAME);
        read_lock_info(&lock_path).ok().filter(|info| !is_lock_stale(info))
    }

    /// The locked directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Drop for OutputLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn read_lock_info(lock_path: &Path) -> CalcResult<LockInfo> {
    let contents = read_to_string(lock_path, "read lock")?;
    serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })
}

/// A lock is stale when its process is gone (same machine) or it is older
/// than 24 hours
fn is_lock_stale(info: &LockInfo) -> bool {
    if let Some(our_machine) = hostname() {
        if info.machine == our_machine {
            #[cfg(unix)]
            {
                if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                    return true;
                }
            }
        }
    }

    let age = Utc::now() - info.locked_at;
    age.num_hours() > 24
}

fn read_to_string(path: &Path, operation: &str) -> CalcResult<String> {
    let mut file = File::open(path)
        .map_err(|e| CalcError::file_error(operation, path.display().to_string(), e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error(operation, path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Temp path next to the target: `name.ext` -> `name.ext.tmp`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `contents` to `<path>.tmp` and fsync it. The temp file is removed on failure.
fn stage_tmp(path: &Path, contents: &[u8]) -> CalcResult<PathBuf> {
    let tmp_path = tmp_path_for(path);

    let result = File::create(&tmp_path)
        .and_then(|mut tmp_file| {
            tmp_file.write_all(contents)?;
            tmp_file.sync_all()
        })
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()));
    match result {
        Ok(()) => Ok(tmp_path),
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            Err(e)
        }
    }
}

/// Write a file with atomic semantics.
///
/// 1. Write to `<path>.tmp`
/// 2. Sync to disk (fsync)
/// 3. Rename over `path` (atomic on most filesystems)
///
/// On failure the temp file is removed and `path` is left untouched.
pub fn write_atomic(path: &Path, contents: &[u8]) -> CalcResult<()> {
    write_atomic_group(&[(path, contents)])
}

/// Write several files as one unit.
///
/// Every temp file is staged before any is renamed. If staging fails, no
/// target is touched. If a rename fails, the targets already renamed in this
/// call are removed so no partial set is left behind.
pub fn write_atomic_group(files: &[(&Path, &[u8])]) -> CalcResult<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(files.len());
    for (path, contents) in files {
        match stage_tmp(path, contents) {
            Ok(tmp_path) => staged.push((tmp_path, *path)),
            Err(e) => {
                for (tmp_path, _) in &staged {
                    let _ = fs::remove_file(tmp_path);
                }
                return Err(e);
            }
        }
    }

    for (k, (tmp_path, path)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(tmp_path, path) {
            for (_, done) in &staged[..k] {
                let _ = fs::remove_file(done);
            }
            for (pending, _) in &staged[k..] {
                let _ = fs::remove_file(pending);
            }
            return Err(CalcError::file_error("rename to final", path.display().to_string(), e.to_string()));
        }
    }
    Ok(())
}

/// Save a run file (pretty JSON, atomic write)
pub fn save_run_config(config: &RunConfig, path: &Path) -> CalcResult<()> {
    let mut json = serde_json::to_string_pretty(config).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;
    json.push('\n');
    write_atomic(path, json.as_bytes())
}

/// Load a run file.
///
/// # Returns
///
/// * `Ok(RunConfig)` - Successfully loaded
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_run_config(path: &Path) -> CalcResult<RunConfig> {
    let contents = read_to_string(path, "read")?;

    let config: RunConfig = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&config.version)?;

    Ok(config)
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions, a newer minor is not readable
    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_tmp_path_generation() {
        assert_eq!(tmp_path_for(Path::new("/out/C1.00.csv")), Path::new("/out/C1.00.csv.tmp"));
        assert_eq!(tmp_path_for(Path::new("summary.csv")), Path::new("summary.csv.tmp"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::new("tester");
        assert_eq!(info.user_id, "tester");
        assert!(info.pid > 0);
    }

    #[test]
    fn test_atomic_write_creates_no_tmp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("C1.00.csv");

        write_atomic(&path, b"x,v,m,y\n").unwrap();
        assert!(!tmp_path_for(&path).exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "x,v,m,y\n");

        // Overwrite in place
        write_atomic(&path, b"x,v,m,y\n0,1,2,3\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x,v,m,y\n0,1,2,3\n");
    }

    #[test]
    fn test_atomic_write_failure_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("C1.00.csv");

        let err = write_atomic(&path, b"data").unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(!path.exists());
        assert!(!tmp_path_for(&path).exists());
    }

    #[test]
    fn test_group_write_is_all_or_nothing() {
        let dir = TempDir::new().unwrap();
        let csv = dir.path().join("C1.00.csv");
        let txt = dir.path().join("missing").join("C1.00.txt");

        let err = write_atomic_group(&[(csv.as_path(), &b"x,v,m,y\n"[..]), (txt.as_path(), &b"C1.00"[..])]).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(!csv.exists());
        assert!(!tmp_path_for(&csv).exists());
        assert!(!txt.exists());

        let txt = dir.path().join("C1.00.txt");
        write_atomic_group(&[(csv.as_path(), &b"x,v,m,y\n"[..]), (txt.as_path(), &b"C1.00"[..])]).unwrap();
        assert_eq!(fs::read_to_string(&csv).unwrap(), "x,v,m,y\n");
        assert_eq!(fs::read_to_string(&txt).unwrap(), "C1.00");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("beamcase.json");

        let mut config = RunConfig::default();
        config.output.decimal_places = 3;
        save_run_config(&config, &path).unwrap();

        let loaded = load_run_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_newer_schema() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("future.json");
        fs::write(&path, r#"{ "version": "0.2.0" }"#).unwrap();

        let err = load_run_config(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_run_config(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_output_lock_acquire_and_release() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("csvs");

        let lock = OutputLock::acquire(&out, "tester").unwrap();
        assert!(out.is_dir());
        assert!(out.join(LOCK_FILE_NAME).exists());
        assert_eq!(lock.dir(), out.as_path());

        drop(lock);
        assert!(!out.join(LOCK_FILE_NAME).exists());
        assert!(OutputLock::check(&out).is_none());
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}
