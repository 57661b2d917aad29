//! The text file handed to translators.
//!
//! Each exported reference becomes three lines:
//!
//! ```text
//! ◇0000ABCD◇original text
//! ◆0000ABCD◆original text
//!
//! ```
//!
//! The `◇` line is a read-only copy. Only `◆` lines are read back, so the
//! translator edits the second line in place.

use std::io::{BufRead, Write};

use lazy_static::lazy_static;
use regex::Regex;

use crate::catalog::StringRef;
use crate::error::{Result, ScriptError};

pub const ORIGINAL_MARK: char = '◇';
pub const EDIT_MARK: char = '◆';

const LINE_END: &str = "\r\n";

lazy_static! {
    static ref RECORD: Regex = Regex::new(r"^◆(\w+)◆(.+)$").unwrap();
}

/// One edited `◆` record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Translation {
    /// 1-based line number in the source file.
    pub line: usize,
    pub offset: u32,
    pub text: String,
}

/// Whether a string is worth handing to a translator.
///
/// Empty strings and strings starting with a code point up to 0x80 (ASCII
/// identifiers, file names, control codes) are skipped unless exporting all.
pub fn is_translatable(text: &str) -> bool {
    text.chars().next().is_some_and(|c| u32::from(c) > 0x80)
}

/// Writes the record triple for each reference; returns how many were written.
pub fn write_translation<W: Write>(
    writer: &mut W,
    refs: &[StringRef],
    include_all: bool,
) -> Result<usize> {
    let mut written = 0;
    for r in refs {
        if !include_all && !is_translatable(&r.text) {
            continue;
        }
        write!(writer, "{ORIGINAL_MARK}{:08X}{ORIGINAL_MARK}{}{LINE_END}", r.offset, r.text)?;
        write!(writer, "{EDIT_MARK}{:08X}{EDIT_MARK}{}{LINE_END}", r.offset, r.text)?;
        write!(writer, "{LINE_END}")?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Parses one `◆offset◆text` line. The text runs to end of line, so marks
/// inside it are kept verbatim.
pub fn parse_record(line: &str) -> Option<(u32, &str)> {
    let caps = RECORD.captures(line)?;
    let offset = u32::from_str_radix(caps.get(1)?.as_str(), 16).ok()?;
    Some((offset, caps.get(2)?.as_str()))
}

/// Collects every `◆` record; any malformed one fails the whole file.
pub fn read_translation<R: BufRead>(reader: R) -> Result<Vec<Translation>> {
    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = if idx == 0 { line.trim_start_matches('\u{FEFF}') } else { line.as_str() };
        if !line.starts_with(EDIT_MARK) {
            continue;
        }

        let lineno = idx + 1;
        let (offset, text) =
            parse_record(line).ok_or(ScriptError::BadTranslationLine { line: lineno })?;
        out.push(Translation { line: lineno, offset, text: text.to_string() });
    }
    log::debug!("read {} translation records", out.len());
    Ok(out)
}
