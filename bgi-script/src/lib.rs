//! bgi-script
//!
//! Load, inspect and rebuild `BurikoCompiledScriptVer1.00` scripts.
//!
//! The container stores no section table: the code/string boundary is
//! guessed by a [`format::CodeSizeProbe`], and string references are found
//! by scanning the bytecode for `load string` instructions. Strings can be
//! exported to a translation file and imported back, which lays out a new
//! string section and repoints every reference at it.

pub mod catalog;
pub mod error;
pub mod format;
pub mod script;
pub mod search;
pub mod table;
pub mod translation;

/// Local developer utilities (kept as a module, not a binary).
pub mod test;

pub use catalog::StringRef;
pub use error::{Result, ScriptError};
pub use script::{Script, ScriptOptions};
pub use translation::Translation;
