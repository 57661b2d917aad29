//! Heuristics to locate the end of the code section.

use crate::search;

use super::layout::HALT_PATTERN;

/// Code length is taken to end right after the *last* halt instruction.
///
/// Compiled scripts close their bytecode with `F4 00 00 00` immediately
/// before the string table. Nothing in the container guarantees this; a
/// string section that happens to contain the pattern moves the boundary.
pub fn probe_code_size(block: &[u8]) -> Option<usize> {
    search::matches(block, &HALT_PATTERN).last().map(|off| off + HALT_PATTERN.len())
}
