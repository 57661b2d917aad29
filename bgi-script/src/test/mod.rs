//! Developer-facing utilities for building synthetic scripts.
//!
//! This is intentionally a module (not `#[cfg(test)]`) so integration tests
//! and downstream crates can fabricate containers without shipping game data.

use crate::format::{HALT_PATTERN, LOAD_STRING_PATTERN, VERSION_TAG};

/// Assembles a container: `load string` instructions, optional filler, a
/// closing halt, and a string section the operands point into.
#[derive(Clone, Debug)]
pub struct ScriptBuilder {
    version: String,
    import: Vec<u8>,
    code: Vec<u8>,
    strings: Vec<u8>,
    /// (operand position in code, string-section index)
    fixups: Vec<(usize, usize)>,
}

impl Default for ScriptBuilder {
    fn default() -> Self {
        Self {
            version: VERSION_TAG.to_string(),
            import: Vec::new(),
            code: Vec::new(),
            strings: Vec::new(),
            fixups: Vec::new(),
        }
    }
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn import(mut self, bytes: &[u8]) -> Self {
        self.import = bytes.to_vec();
        self
    }

    /// Raw bytecode that is not a string reference.
    pub fn code(mut self, bytes: &[u8]) -> Self {
        self.code.extend_from_slice(bytes);
        self
    }

    /// Appends already-encoded string bytes (NUL added) and returns their index.
    pub fn add_string(&mut self, encoded: &[u8]) -> usize {
        let index = self.strings.len();
        self.strings.extend_from_slice(encoded);
        self.strings.push(0);
        index
    }

    /// Emits `03 00 00 00` with an operand resolved to `index` at build time.
    pub fn load_index(mut self, index: usize) -> Self {
        self.code.extend_from_slice(&LOAD_STRING_PATTERN);
        self.fixups.push((self.code.len(), index));
        self.code.extend_from_slice(&[0; 4]);
        self
    }

    /// Stores `encoded` as a new string and references it.
    pub fn load(mut self, encoded: &[u8]) -> Self {
        let index = self.add_string(encoded);
        self.load_index(index)
    }

    /// Code bytes (halt appended, operands fixed) and the string section.
    pub fn sections(&self) -> (Vec<u8>, Vec<u8>) {
        let mut code = self.code.clone();
        code.extend_from_slice(&HALT_PATTERN);
        let bias = code.len();
        for &(pos, index) in &self.fixups {
            let value = (bias + index) as u32;
            code[pos..pos + 4].copy_from_slice(&value.to_le_bytes());
        }
        (code, self.strings.clone())
    }

    pub fn build(&self) -> Vec<u8> {
        let (code, strings) = self.sections();
        let mut out = Vec::new();
        out.extend_from_slice(self.version.as_bytes());
        out.push(0);
        out.extend_from_slice(&(self.import.len() as u32 + 4).to_le_bytes());
        out.extend_from_slice(&self.import);
        out.extend_from_slice(&code);
        out.extend_from_slice(&strings);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operands_resolve_after_halt() {
        let (code, strings) = ScriptBuilder::new().load(b"cat").load(b"dog").sections();
        assert_eq!(code.len(), 20);
        assert_eq!(&code[4..8], &20u32.to_le_bytes());
        assert_eq!(&code[12..16], &24u32.to_le_bytes());
        assert_eq!(&code[16..], &HALT_PATTERN);
        assert_eq!(strings, b"cat\0dog\0".to_vec());
    }
}
