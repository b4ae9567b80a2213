use crate::error::ConvertError;

/// Identifier character: alphanumeric or underscore.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Read position over an immutable source buffer.
///
/// Offsets are byte offsets and always sit on a char boundary, with
/// `0 <= position <= source.len()`.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    source: &'a str,
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Move to an absolute offset, typically a snapshot taken earlier.
    pub fn set_position(&mut self, position: usize) {
        debug_assert!(self.source.is_char_boundary(position));
        self.position = position;
    }

    pub fn is_eof(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Unread remainder of the buffer.
    pub fn rest(&self) -> &'a str {
        &self.source[self.position..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.position += rest.len() - rest.trim_start().len();
    }

    /// Capture the next token: a single `.` or `+`, or the maximal run of
    /// identifier characters. The run may be empty, in which case the cursor
    /// does not move. Returns `None` only at end of input.
    pub fn capture_token(&mut self) -> Option<&'a str> {
        let start = self.position;
        let rest = self.rest();
        let first = rest.chars().next()?;
        let len = if first == '.' || first == '+' {
            1
        } else {
            rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len())
        };
        self.position += len;
        let token = &self.source[start..self.position];
        tracing::trace!(token = %token, offset = start, "captured token");
        Some(token)
    }

    /// Advance from an opening `(` to just past its matching `)`.
    ///
    /// Nesting is tracked with a plain depth counter, so parentheses inside
    /// string or character literals are counted too. Returns the end offset,
    /// or `Ok(None)` with the cursor untouched when the buffer ends before the
    /// parenthesis closes.
    pub fn match_outer_parens(&mut self) -> Result<Option<usize>, ConvertError> {
        let start = self.position;
        if self.peek() != Some('(') {
            tracing::error!(offset = start, "not positioned on an open parenthesis");
            return Err(ConvertError::malformed(self.source, start));
        }
        let mut depth = 0usize;
        for (i, b) in self.source.as_bytes()[start..].iter().enumerate() {
            match b {
                b'(' => depth += 1,
                b')' => depth -= 1,
                _ => {}
            }
            if depth == 0 {
                self.position = start + i + 1;
                return Ok(Some(self.position));
            }
        }
        tracing::debug!(offset = start, "parenthesis never closes");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_split_on_dot_and_plus() {
        let mut cursor = Cursor::new("log.info+x");
        assert_eq!(cursor.capture_token(), Some("log"));
        assert_eq!(cursor.capture_token(), Some("."));
        assert_eq!(cursor.capture_token(), Some("info"));
        assert_eq!(cursor.capture_token(), Some("+"));
        assert_eq!(cursor.capture_token(), Some("x"));
        assert!(cursor.is_eof());
        assert_eq!(cursor.capture_token(), None);
    }

    #[test]
    fn empty_token_does_not_advance() {
        let mut cursor = Cursor::new("(x)");
        assert_eq!(cursor.capture_token(), Some(""));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn underscores_and_unicode_are_word_chars() {
        let mut cursor = Cursor::new("my_lögger2 rest");
        assert_eq!(cursor.capture_token(), Some("my_lögger2"));
        assert_eq!(cursor.peek(), Some(' '));
    }

    #[test]
    fn skip_whitespace_crosses_newlines() {
        let mut cursor = Cursor::new(" \t\n\r\n  x");
        cursor.skip_whitespace();
        assert_eq!(cursor.peek(), Some('x'));
        cursor.skip_whitespace();
        assert_eq!(cursor.peek(), Some('x'));
    }

    #[test]
    fn skip_whitespace_at_eof_is_noop() {
        let mut cursor = Cursor::new("");
        cursor.skip_whitespace();
        assert!(cursor.is_eof());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn matches_nested_parens() {
        let source = "(a(b)(c(d))) tail";
        let mut cursor = Cursor::new(source);
        let end = cursor.match_outer_parens().unwrap();
        assert_eq!(end, Some(12));
        assert_eq!(&source[..12], "(a(b)(c(d)))");
        assert_eq!(cursor.rest(), " tail");
    }

    #[test]
    fn unterminated_paren_leaves_cursor() {
        let mut cursor = Cursor::new("(a(b)");
        assert_eq!(cursor.match_outer_parens().unwrap(), None);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn paren_match_requires_open_paren() {
        let mut cursor = Cursor::new("x(y)");
        let err = cursor.match_outer_parens().unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MalformedConstruct {
                offset: 0,
                found: Some('x'),
                ..
            }
        ));
    }
}
