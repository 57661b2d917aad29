//! Script container parsing.
//!
//! The container has no section table. Section boundaries are recovered by
//! a [`CodeSizeProbe`] carried in the [`ScriptLayout`], so a different
//! heuristic can be plugged in without touching [`ScriptSections::parse`].

mod layout;
mod parsed;
mod probe;

pub use layout::{
    CodeSizeProbe, ScriptLayout, HALT_PATTERN, LOAD_STRING_LEN, LOAD_STRING_PATTERN, VERSION_TAG,
};
pub use parsed::ScriptSections;
pub use probe::probe_code_size;
