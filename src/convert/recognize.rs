//! Lookahead probes run by the rewrite driver at each position.
//!
//! Every probe either consumes a whole construct and reports a match, or
//! reports no match and leaves the cursor exactly where it found it.

use super::ConvertOptions;
use super::scanner::Cursor;
use regex::Regex;
use std::sync::LazyLock;

static LOG4J_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\Aimport\s+org\s*\.\s*apache\s*\.\s*log4j\s*\..+?;")
        .expect("log4j import pattern")
});

static GET_LOGGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\ALogger\s*\.\s*getLogger\s*").expect("getLogger pattern"));

/// A recognized `<identifier>.<level>` call head, in original casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogCall<'a> {
    pub identifier: &'a str,
    pub level: &'a str,
}

/// Probe for `identifier . level` followed (after optional whitespace) by `(`.
///
/// On success the cursor sits right after the level token.
pub fn looking_at_log_call<'a>(
    cursor: &mut Cursor<'a>,
    options: &ConvertOptions,
) -> Option<LogCall<'a>> {
    let start = cursor.position();
    let found = probe_log_call(cursor, options);
    match found {
        Some(call) => tracing::debug!(
            offset = start,
            identifier = call.identifier,
            level = call.level,
            "log call"
        ),
        None => cursor.set_position(start),
    }
    found
}

fn probe_log_call<'a>(cursor: &mut Cursor<'a>, options: &ConvertOptions) -> Option<LogCall<'a>> {
    let identifier = cursor.capture_token()?;
    if !options.is_logger_name(identifier) {
        return None;
    }
    cursor.skip_whitespace();
    if cursor.capture_token()? != "." {
        return None;
    }
    cursor.skip_whitespace();
    let level = cursor.capture_token()?;
    if !options.is_level(level) {
        return None;
    }

    let after_level = cursor.position();
    cursor.skip_whitespace();
    let is_call = cursor.peek() == Some('(');
    cursor.set_position(after_level);
    is_call.then_some(LogCall { identifier, level })
}

/// Probe for `import org.apache.log4j.<anything>;`. On success the cursor
/// moves just past the `;`.
pub fn looking_at_log4j_import(cursor: &mut Cursor<'_>) -> bool {
    let rest = cursor.rest();
    if !rest.starts_with("import") {
        return false;
    }
    let Some(semicolon) = rest.find(';') else {
        tracing::trace!(offset = cursor.position(), "import without semicolon");
        return false;
    };
    if !LOG4J_IMPORT.is_match(&rest[..=semicolon]) {
        tracing::trace!(offset = cursor.position(), "import, but not log4j");
        return false;
    }
    tracing::debug!(offset = cursor.position(), "log4j import");
    cursor.set_position(cursor.position() + semicolon + 1);
    true
}

/// Probe for `Logger . getLogger` ahead of a later `(`. Only the call head is
/// consumed; its arguments stay in the buffer.
pub fn looking_at_get_logger(cursor: &mut Cursor<'_>) -> bool {
    let rest = cursor.rest();
    if !rest.starts_with("Logger") {
        return false;
    }
    let Some(paren) = rest.find('(') else {
        return false;
    };
    let Some(head) = GET_LOGGER.find(&rest[..paren]) else {
        return false;
    };
    tracing::debug!(offset = cursor.position(), "getLogger call");
    cursor.set_position(cursor.position() + head.end());
    true
}
