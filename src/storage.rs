// 💾 Storage - explicit (de)serialization per persisted entity
//
// Files are pretty JSON so they diff cleanly. Every save writes a sibling
// temp file and renames it over the target: either the new state is fully
// on disk or the old file is still there.

use crate::entities::{Contestant, Show};
use crate::error::{Result, ShowError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace `path` with `bytes` in one rename
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ShowError::io(parent, e))?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, bytes).map_err(|e| ShowError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| ShowError::io(path, e))?;
    Ok(())
}

fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(value).map_err(|source| ShowError::Serialization {
        path: path.to_path_buf(),
        source,
    })?;
    bytes.push(b'\n');
    write_atomic(path, &bytes)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|e| ShowError::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| ShowError::Serialization {
        path: path.to_path_buf(),
        source,
    })
}

// ============================================================================
// CONTESTANT LEDGER
// ============================================================================

/// Registration rows in append order; a missing file is an empty ledger
pub fn load_ledger(path: &Path) -> Result<Vec<Contestant>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    load_json(path)
}

pub fn save_ledger(path: &Path, rows: &[Contestant]) -> Result<()> {
    save_json(path, rows)
}

// ============================================================================
// SHOW LEDGER
// ============================================================================

/// Load and re-verify an allocated show; `None` if nothing was allocated yet
pub fn load_show(path: &Path, max_entries_per_class: usize) -> Result<Option<Show>> {
    if !path.exists() {
        return Ok(None);
    }
    let show: Show = load_json(path)?;
    show.verify(max_entries_per_class)?;
    Ok(Some(show))
}

pub fn save_show(path: &Path, show: &Show) -> Result<()> {
    save_json(path, show)
}
