use crate::config::AppConfig;
use crate::files::backup_path;
use crate::utils::collect_inputs;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::PathBuf;

/// Execute the clean command
///
/// Removes the backups `convert` left next to the given files.
pub fn clean(cfg: &AppConfig, inputs: &[PathBuf], yes: bool) -> Result<usize> {
    let files = collect_inputs(inputs, &cfg.files.extensions)?;
    let backups: Vec<PathBuf> = files
        .iter()
        .map(|p| backup_path(p, &cfg.files.backup_suffix))
        .filter(|b| b.is_file())
        .collect();

    if backups.is_empty() {
        tracing::info!("no backups to remove");
        return Ok(0);
    }
    if !yes {
        bail!(
            "refusing to remove {} backup files without --yes",
            backups.len()
        );
    }
    for backup in &backups {
        tracing::info!("removing {}", backup.display());
        fs::remove_file(backup)
            .with_context(|| format!("failed to remove {}", backup.display()))?;
    }
    Ok(backups.len())
}
