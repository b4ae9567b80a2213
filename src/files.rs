//! In-place conversion of one file with a backup copy of the original.

use crate::convert::{Conversion, ConvertOptions, convert_source};
use crate::error::ConvertError;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Backup name for `path`: the file name with `suffix` appended.
pub fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

pub fn read_source(path: &Path) -> Result<String, ConvertError> {
    fs::read_to_string(path).map_err(|source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert a file in memory without touching the disk.
pub fn convert_in_memory(
    path: &Path,
    options: &ConvertOptions,
) -> Result<(String, Conversion), ConvertError> {
    let source = read_source(path)?;
    let conversion = convert_source(&source, options)?;
    Ok((source, conversion))
}

/// Convert `path` in place.
///
/// The converted text goes to a temporary file next to `path` first; then
/// the original is renamed to its backup name and the temporary file takes
/// its place. Files whose text would not change are left alone. Returns the
/// conversion and whether the file was rewritten.
pub fn convert_file(
    path: &Path,
    options: &ConvertOptions,
    backup_suffix: &str,
) -> Result<(Conversion, bool), ConvertError> {
    let (source, conversion) = convert_in_memory(path, options)?;
    if conversion.output == source {
        tracing::info!("no changes: {}", path.display());
        return Ok((conversion, false));
    }

    let backup = backup_path(path, backup_suffix);
    if backup.exists() {
        return Err(ConvertError::BackupExists { backup });
    }

    let write_err = |source: io::Error| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(conversion.output.as_bytes()).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    let permissions = fs::metadata(path).map_err(write_err)?.permissions();
    fs::set_permissions(tmp.path(), permissions).map_err(write_err)?;

    tracing::info!("taking a backup of {} as {}", path.display(), backup.display());
    fs::rename(path, &backup).map_err(|source| ConvertError::Backup {
        path: path.to_path_buf(),
        backup: backup.clone(),
        source,
    })?;
    persist_or_restore(tmp, path, &backup)?;
    Ok((conversion, true))
}

/// Move `tmp` over `path`, which has already been renamed to `backup`. On
/// failure the backup is moved back so `path` is never left missing.
fn persist_or_restore(
    tmp: NamedTempFile,
    path: &Path,
    backup: &Path,
) -> Result<(), ConvertError> {
    let Err(e) = tmp.persist(path) else {
        return Ok(());
    };
    if let Err(restore) = fs::rename(backup, path) {
        tracing::error!(
            "failed to restore {} from {}: {}",
            path.display(),
            backup.display(),
            restore
        );
    }
    Err(ConvertError::Write {
        path: path.to_path_buf(),
        source: e.error,
    })
}
