//! Text-scanning primitives for the lockfile grammars.
//!
//! Both yarn dialects are line-oriented grammars with nested quoting and
//! comma-delimited lists, so a small set of composable primitives covers
//! them without a separate lexer stage. Each primitive is a pure function
//! from a cursor to either a value plus the advanced cursor, or a
//! [`Mismatch`] recording where the grammar stopped. The cursor is `Copy`,
//! so a choice point saves it once and retries from the same spot;
//! backtracking never goes deeper than that, which keeps the parse linear.

use std::fmt;

/// A position in the input: byte offset plus a 1-based line counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Byte offset into the input.
    pub pos: usize,
    /// 1-based line number at `pos`.
    pub line: usize,
}

impl Cursor {
    /// Cursor at the beginning of the input.
    pub fn start() -> Self {
        Cursor { pos: 0, line: 1 }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} (byte {})", self.line, self.pos)
    }
}

/// A failed match, carrying the position where the grammar stopped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected} at line {line} (byte {pos})")]
pub struct Mismatch {
    /// Byte offset of the failure.
    pub pos: usize,
    /// 1-based line number of the failure.
    pub line: usize,
    /// What the grammar was looking for.
    pub expected: String,
}

/// Result of one parsing step: the value plus the advanced cursor.
pub type Step<T> = Result<(T, Cursor), Mismatch>;

/// Read-only view over the input text that the cursor indexes into.
pub struct Scanner<'a> {
    src: &'a str,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner over `src`.
    pub fn new(src: &'a str) -> Self {
        Scanner { src }
    }

    fn rest(&self, cur: Cursor) -> &'a str {
        &self.src[cur.pos..]
    }

    fn advance(&self, cur: Cursor, len: usize) -> Cursor {
        let eaten = &self.src[cur.pos..cur.pos + len];
        Cursor {
            pos: cur.pos + len,
            line: cur.line + eaten.matches('\n').count(),
        }
    }

    fn mismatch(&self, cur: Cursor, expected: impl Into<String>) -> Mismatch {
        Mismatch {
            pos: cur.pos,
            line: cur.line,
            expected: expected.into(),
        }
    }

    /// Single-character lookahead without consuming.
    pub fn peek(&self, cur: Cursor) -> Option<char> {
        self.rest(cur).chars().next()
    }

    /// Returns true if the cursor has consumed the whole input.
    pub fn at_end(&self, cur: Cursor) -> bool {
        cur.pos >= self.src.len()
    }

    /// Matches `token` exactly.
    pub fn literal(&self, cur: Cursor, token: &str) -> Step<()> {
        if self.rest(cur).starts_with(token) {
            Ok(((), self.advance(cur, token.len())))
        } else {
            Err(self.mismatch(cur, format!("{token:?}")))
        }
    }

    /// Matches `token` if present; never fails.
    pub fn literal_opt(&self, cur: Cursor, token: &str) -> (bool, Cursor) {
        match self.literal(cur, token) {
            Ok(((), next)) => (true, next),
            Err(_) => (false, cur),
        }
    }

    /// Consumes characters up to the first occurrence of any delimiter,
    /// which must appear; the matched text may be empty. With `consume` the
    /// delimiter itself is eaten, otherwise it is left for the next step.
    pub fn until_any(&self, cur: Cursor, delims: &[char], consume: bool) -> Step<&'a str> {
        let rest = self.rest(cur);
        match rest.find(delims) {
            Some(idx) => {
                let text = &rest[..idx];
                let len = if consume {
                    idx + rest[idx..].chars().next().map_or(0, char::len_utf8)
                } else {
                    idx
                };
                Ok((text, self.advance(cur, len)))
            }
            None => Err(self.mismatch(cur, format!("one of {delims:?}"))),
        }
    }

    /// Consumes one or more characters outside the delimiter set, stopping
    /// at the first delimiter or end of input. Zero characters is a
    /// mismatch.
    pub fn take_some(&self, cur: Cursor, delims: &[char]) -> Step<&'a str> {
        let rest = self.rest(cur);
        let idx = rest.find(delims).unwrap_or(rest.len());
        if idx == 0 {
            Err(self.mismatch(cur, format!("a character outside {delims:?}")))
        } else {
            Ok((&rest[..idx], self.advance(cur, idx)))
        }
    }

    /// Ordered choice: `first` wins if it matches, otherwise `second` runs
    /// from the same cursor.
    pub fn either<T>(
        &self,
        cur: Cursor,
        first: impl FnOnce(&Scanner<'a>, Cursor) -> Step<T>,
        second: impl FnOnce(&Scanner<'a>, Cursor) -> Step<T>,
    ) -> Step<T> {
        first(self, cur).or_else(|_| second(self, cur))
    }

    /// Zero or more `item`s separated by the literal `sep`, greedy. When an
    /// item fails after a separator, the separator is left unconsumed so an
    /// enclosing grammar can claim it.
    pub fn sep_by<T>(
        &self,
        cur: Cursor,
        sep: &str,
        mut item: impl FnMut(&Scanner<'a>, Cursor) -> Step<T>,
    ) -> Step<Vec<T>> {
        let mut out = Vec::new();
        let mut cur = cur;
        match item(self, cur) {
            Ok((value, next)) => {
                out.push(value);
                cur = next;
            }
            Err(_) => return Ok((out, cur)),
        }
        loop {
            let (seen, after_sep) = self.literal_opt(cur, sep);
            if !seen {
                break;
            }
            match item(self, after_sep) {
                Ok((value, next)) => {
                    out.push(value);
                    cur = next;
                }
                Err(_) => break,
            }
        }
        Ok((out, cur))
    }

    /// Runs `parse` from the start of the input and requires that it
    /// consumed every byte.
    pub fn anchored<T>(
        &self,
        parse: impl FnOnce(&Scanner<'a>, Cursor) -> Step<T>,
    ) -> Result<T, Mismatch> {
        let (value, cur) = parse(self, Cursor::start())?;
        if self.at_end(cur) {
            Ok(value)
        } else {
            Err(self.mismatch(cur, "end of input"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_match() {
        let sc = Scanner::new("hello world");
        let ((), cur) = sc.literal(Cursor::start(), "hello").unwrap();
        assert_eq!(cur.pos, 5);
        assert_eq!(cur.line, 1);
    }

    #[test]
    fn test_literal_mismatch_reports_position() {
        let sc = Scanner::new("a\nb\nc");
        let ((), cur) = sc.literal(Cursor::start(), "a\nb\n").unwrap();
        assert_eq!(cur.line, 3);

        let err = sc.literal(cur, "x").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.pos, 4);
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_literal_counts_newlines() {
        let sc = Scanner::new("one\ntwo\nthree");
        let ((), cur) = sc.literal(Cursor::start(), "one\ntwo\n").unwrap();
        assert_eq!(cur.line, 3);
        assert_eq!(cur.pos, 8);
    }

    #[test]
    fn test_literal_opt_never_fails() {
        let sc = Scanner::new("abc");
        let (seen, cur) = sc.literal_opt(Cursor::start(), "x");
        assert!(!seen);
        assert_eq!(cur, Cursor::start());

        let (seen, cur) = sc.literal_opt(Cursor::start(), "ab");
        assert!(seen);
        assert_eq!(cur.pos, 2);
    }

    #[test]
    fn test_until_any_keeps_delimiter() {
        let sc = Scanner::new("name@range");
        let (text, cur) = sc.until_any(Cursor::start(), &['@'], false).unwrap();
        assert_eq!(text, "name");
        assert_eq!(sc.peek(cur), Some('@'));
    }

    #[test]
    fn test_until_any_consumes_delimiter() {
        let sc = Scanner::new("name@range");
        let (text, cur) = sc.until_any(Cursor::start(), &['@'], true).unwrap();
        assert_eq!(text, "name");
        assert_eq!(sc.peek(cur), Some('r'));
    }

    #[test]
    fn test_until_any_allows_empty_match() {
        let sc = Scanner::new("@scope");
        let (text, cur) = sc.until_any(Cursor::start(), &['@'], true).unwrap();
        assert_eq!(text, "");
        assert_eq!(cur.pos, 1);
    }

    #[test]
    fn test_until_any_requires_delimiter() {
        let sc = Scanner::new("no delimiter here");
        assert!(sc.until_any(Cursor::start(), &['@'], true).is_err());
    }

    #[test]
    fn test_take_some_stops_at_delimiter() {
        let sc = Scanner::new("^1.0.0, rest");
        let (text, cur) = sc.take_some(Cursor::start(), &[',', '"']).unwrap();
        assert_eq!(text, "^1.0.0");
        assert_eq!(sc.peek(cur), Some(','));
    }

    #[test]
    fn test_take_some_runs_to_end_of_input() {
        let sc = Scanner::new("^1.0.0");
        let (text, cur) = sc.take_some(Cursor::start(), &[',']).unwrap();
        assert_eq!(text, "^1.0.0");
        assert!(sc.at_end(cur));
    }

    #[test]
    fn test_take_some_rejects_empty() {
        let sc = Scanner::new(",rest");
        assert!(sc.take_some(Cursor::start(), &[',']).is_err());
    }

    #[test]
    fn test_either_first_wins() {
        let sc = Scanner::new("ab");
        let (value, _) = sc
            .either(
                Cursor::start(),
                |sc, cur| sc.literal(cur, "a").map(|((), c)| (1, c)),
                |sc, cur| sc.literal(cur, "ab").map(|((), c)| (2, c)),
            )
            .unwrap();
        assert_eq!(value, 1);
    }

    #[test]
    fn test_either_restores_cursor_for_second() {
        let sc = Scanner::new("ab");
        let (value, cur) = sc
            .either(
                Cursor::start(),
                |sc, cur| sc.literal(cur, "x").map(|((), c)| ("x", c)),
                |sc, cur| sc.literal(cur, "ab").map(|((), c)| ("ab", c)),
            )
            .unwrap();
        assert_eq!(value, "ab");
        assert_eq!(cur.pos, 2);
    }

    #[test]
    fn test_sep_by_collects_items() {
        let sc = Scanner::new("a, a, a");
        let (items, cur) = sc
            .sep_by(Cursor::start(), ", ", |sc, cur| sc.literal(cur, "a"))
            .unwrap();
        assert_eq!(items.len(), 3);
        assert!(sc.at_end(cur));
    }

    #[test]
    fn test_sep_by_empty_is_ok() {
        let sc = Scanner::new("xyz");
        let (items, cur) = sc
            .sep_by(Cursor::start(), ", ", |sc, cur| sc.literal(cur, "a"))
            .unwrap();
        assert!(items.is_empty());
        assert_eq!(cur, Cursor::start());
    }

    #[test]
    fn test_sep_by_restores_trailing_separator() {
        // The separator before a failing item must be left unconsumed.
        let sc = Scanner::new("a, a, b");
        let (items, cur) = sc
            .sep_by(Cursor::start(), ", ", |sc, cur| sc.literal(cur, "a"))
            .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(sc.peek(cur), Some(','));
    }

    #[test]
    fn test_anchored_requires_full_consumption() {
        let sc = Scanner::new("abc tail");
        let err = sc.anchored(|sc, cur| sc.literal(cur, "abc")).unwrap_err();
        assert_eq!(err.pos, 3);
        assert!(err.expected.contains("end of input"));

        let sc = Scanner::new("abc");
        assert!(sc.anchored(|sc, cur| sc.literal(cur, "abc")).is_ok());
    }
}
