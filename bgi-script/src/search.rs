//! Fixed byte-pattern scanning.
//!
//! Matches are reported left to right and never overlap: after a hit at `i`
//! the scan resumes at `i + pattern.len()`. Offsets derived from the code
//! section rely on this stride, so `AAAA` searched for `AAA` yields only `0`.

use std::iter::FusedIterator;

/// Lazy iterator over non-overlapping match offsets.
///
/// Cloning snapshots the scan position; call [`matches`] again to restart.
#[derive(Clone, Debug)]
pub struct Matches<'a> {
    haystack: &'a [u8],
    pattern: &'a [u8],
    pos: usize,
}

impl Matches<'_> {
    fn exhaust(&mut self) -> Option<usize> {
        self.pos = self.haystack.len();
        None
    }
}

impl Iterator for Matches<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.pattern.is_empty() || self.pos >= self.haystack.len() {
            return self.exhaust();
        }

        let rest = &self.haystack[self.pos..];
        match rest.windows(self.pattern.len()).position(|w| w == self.pattern) {
            Some(found) => {
                let start = self.pos + found;
                self.pos = start + self.pattern.len();
                Some(start)
            }
            None => self.exhaust(),
        }
    }
}

impl FusedIterator for Matches<'_> {}

/// All non-overlapping occurrences of `pattern` in `haystack`, ascending.
///
/// An empty pattern never matches.
pub fn matches<'a>(haystack: &'a [u8], pattern: &'a [u8]) -> Matches<'a> {
    Matches { haystack, pattern, pos: 0 }
}

/// Lowest offset of `pattern` in `haystack`.
pub fn find_first(haystack: &[u8], pattern: &[u8]) -> Option<usize> {
    matches(haystack, pattern).next()
}

/// Cursor-style front end over [`matches`] for callers that step through hits.
#[derive(Debug)]
pub struct Searcher<'a> {
    buffer: &'a [u8],
    cursor: Option<Matches<'a>>,
}

impl<'a> Searcher<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: None }
    }

    /// Starts a new scan for `pattern`, discarding any previous one.
    pub fn find_first(&mut self, pattern: &'a [u8]) -> Option<usize> {
        let mut cursor = matches(self.buffer, pattern);
        let first = cursor.next();
        self.cursor = Some(cursor);
        first
    }

    /// Next hit after the end of the previous one; `None` before any `find_first`.
    pub fn find_next(&mut self) -> Option<usize> {
        self.cursor.as_mut()?.next()
    }

    pub fn find_all(&mut self, pattern: &'a [u8]) -> Vec<usize> {
        let mut out = Vec::new();
        let mut hit = self.find_first(pattern);
        while let Some(offset) = hit {
            out.push(offset);
            hit = self.find_next();
        }
        out
    }
}
