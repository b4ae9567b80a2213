//! Rewrites a concatenated log message into a placeholder format string.

/// Outcome of converting one call's argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arguments {
    /// A single operand: already placeholder style or nothing to split.
    Unchanged(String),
    /// Concatenation rewritten as `("format", args...)`.
    Converted(String),
    /// Concatenation with an operand that cannot be moved safely.
    Unconvertible { text: String, operand: String },
}

impl Arguments {
    /// Parenthesized argument list to emit.
    pub fn text(&self) -> &str {
        match self {
            Arguments::Unchanged(text) | Arguments::Converted(text) => text,
            Arguments::Unconvertible { text, .. } => text,
        }
    }
}

/// Convert the text between a call's outer parentheses.
pub fn convert_arguments(inner: &str) -> Arguments {
    let args = inner.trim();
    let original = format!("({})", args);
    let operands: Vec<&str> = args.split('+').map(str::trim).collect();
    if operands.len() == 1 {
        return Arguments::Unchanged(original);
    }

    let mut format = String::new();
    let mut values: Vec<&str> = Vec::new();
    for operand in operands {
        if operand.is_empty() || !is_balanced(operand) {
            return Arguments::Unconvertible {
                text: original,
                operand: operand.to_string(),
            };
        }
        match string_literal_body(operand) {
            Some(body) => format.push_str(body),
            None => {
                format.push_str("{}");
                values.push(operand);
            }
        }
    }

    if values.is_empty() {
        Arguments::Converted(format!("(\"{}\")", format))
    } else {
        Arguments::Converted(format!("(\"{}\", {})", format, values.join(", ")))
    }
}

/// Whether brackets (`[<({` against `]>)}`) net to zero and every string
/// and character literal is closed. Brackets inside `"..."` and `'...'` are
/// ignored and `\` escapes the character after it.
pub fn is_balanced(fragment: &str) -> bool {
    let mut depth = 0i64;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in fragment.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' | '\'' if quote.is_none() => quote = Some(c),
            q if quote == Some(q) => quote = None,
            _ if quote.is_some() => {}
            '[' | '<' | '(' | '{' => depth += 1,
            ']' | '>' | ')' | '}' => depth -= 1,
            _ => {}
        }
    }
    depth == 0 && quote.is_none()
}

/// Contents of `fragment` when it is exactly one `"..."` literal.
fn string_literal_body(fragment: &str) -> Option<&str> {
    let body = fragment.strip_prefix('"')?;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => return (i + 1 == body.len()).then(|| &body[..i]),
            _ => {}
        }
    }
    None
}
