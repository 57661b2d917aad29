use super::probe::probe_code_size;

/// Version tag expected at the start of every supported script.
pub const VERSION_TAG: &str = "BurikoCompiledScriptVer1.00";

/// Terminal instruction that precedes the string section.
pub const HALT_PATTERN: [u8; 4] = [0xF4, 0x00, 0x00, 0x00];

/// Opcode of the instruction that loads a string by absolute offset.
pub const LOAD_STRING_PATTERN: [u8; 4] = [0x03, 0x00, 0x00, 0x00];

/// Opcode plus its 4-byte operand.
pub const LOAD_STRING_LEN: usize = 8;

/// Infers the code section length from the bytes that follow the import section.
pub type CodeSizeProbe = fn(&[u8]) -> Option<usize>;

/// What the loader expects from a container.
#[derive(Clone, Debug)]
pub struct ScriptLayout {
    /// Exact version tag; anything else is rejected.
    pub version: String,

    /// Code/string boundary heuristic.
    pub code_size_probe: CodeSizeProbe,
}

impl Default for ScriptLayout {
    fn default() -> Self {
        Self { version: VERSION_TAG.to_string(), code_size_probe: probe_code_size }
    }
}
