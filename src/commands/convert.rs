use crate::config::AppConfig;
use crate::error::ConvertError;
use crate::files::convert_file;
use crate::utils::collect_inputs;
use anyhow::{Result, bail};
use std::path::PathBuf;

/// Execute the convert command
///
/// A file that fails is logged and skipped; the command fails at the end if
/// any file did.
pub fn convert(cfg: &AppConfig, inputs: &[PathBuf]) -> Result<()> {
    let files = collect_inputs(inputs, &cfg.files.extensions)?;
    if files.is_empty() {
        bail!("no input files found");
    }

    let mut rewritten = 0usize;
    let mut failed = 0usize;
    for path in &files {
        tracing::info!("BEGIN : processing {}", path.display());
        match convert_file(path, &cfg.convert, &cfg.files.backup_suffix) {
            Ok((conversion, written)) => {
                if written {
                    rewritten += 1;
                }
                tracing::info!(
                    calls = conversion.stats.converted_calls,
                    imports = conversion.stats.imports_replaced,
                    factories = conversion.stats.factory_calls,
                    warnings = conversion.warnings.len(),
                    "END   : processed {}",
                    path.display()
                );
            }
            Err(e) => {
                failed += 1;
                let kind = failure_kind(&e);
                tracing::error!("{}: {}: {:#}", path.display(), kind, anyhow::Error::from(e));
            }
        }
    }

    tracing::info!(
        "converted {} of {} files ({} failed)",
        rewritten,
        files.len(),
        failed
    );
    if failed > 0 {
        bail!("{} of {} files failed to convert", failed, files.len());
    }
    Ok(())
}

fn failure_kind(err: &ConvertError) -> &'static str {
    if err.is_filesystem() {
        "filesystem error"
    } else {
        "malformed source, file left untouched"
    }
}
