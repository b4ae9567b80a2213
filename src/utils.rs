use anyhow::{Context, Result};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn is_glob(arg: &Path) -> bool {
    arg.to_str()
        .is_some_and(|s| s.contains(['*', '?', '[']))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

/// Expand command-line inputs into the list of files to process.
///
/// Directories are walked recursively and filtered by extension; glob
/// patterns are expanded; anything else is taken as a file path as is, so a
/// missing file is reported when it is read. Duplicates are dropped, first
/// occurrence wins.
pub fn collect_inputs(inputs: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    let mut push = |path: PathBuf| {
        if seen.insert(path.clone()) {
            files.push(path);
        }
    };

    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(Result::ok)
                .map(|entry| entry.into_path())
                .filter(|p| p.is_file() && has_extension(p, extensions))
                .collect();
            // Keep it deterministic
            found.sort();
            tracing::debug!("{}: {} files", input.display(), found.len());
            found.into_iter().for_each(&mut push);
        } else if is_glob(input) {
            let pattern = input.to_string_lossy();
            let matches = glob::glob(&pattern)
                .with_context(|| format!("invalid glob pattern {}", pattern))?;
            for entry in matches {
                let path = entry.with_context(|| format!("failed to expand {}", pattern))?;
                if path.is_file() {
                    push(path);
                }
            }
        } else {
            push(input.clone());
        }
    }
    Ok(files)
}
