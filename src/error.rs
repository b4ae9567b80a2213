use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Number of characters shown on each side of an error position.
const CONTEXT_LEN: usize = 30;

/// Errors raised while converting a single file.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The argument matcher was pointed at something other than `(`.
    #[error("expected an open parenthesis at offset {offset} (line {line}), found {found:?}: {context}")]
    MalformedConstruct {
        offset: usize,
        line: usize,
        found: Option<char>,
        context: String,
    },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("backup {} already exists", backup.display())]
    BackupExists { backup: PathBuf },

    #[error("failed to back up {} to {}", path.display(), backup.display())]
    Backup {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConvertError {
    pub fn malformed(source: &str, offset: usize) -> Self {
        Self::MalformedConstruct {
            offset,
            line: line_of(source, offset),
            found: source.get(offset..).and_then(|s| s.chars().next()),
            context: highlight(source, offset),
        }
    }

    /// Whether the error comes from the filesystem rather than the source text.
    pub fn is_filesystem(&self) -> bool {
        !matches!(self, Self::MalformedConstruct { .. })
    }
}

/// 1-based line number of a byte offset.
pub fn line_of(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Render the text around `offset` as `before<<c>>after`.
pub fn highlight(source: &str, offset: usize) -> String {
    let Some(rest) = source.get(offset..) else {
        return String::new();
    };
    let mut chars = rest.chars();
    let Some(at) = chars.next() else {
        return String::new();
    };
    let before: String = {
        let prefix: Vec<char> = source[..offset].chars().rev().take(CONTEXT_LEN).collect();
        prefix.into_iter().rev().collect()
    };
    let after: String = chars.take(CONTEXT_LEN - 1).collect();
    format!("{}<<{}>>{}", before, at, after)
}
