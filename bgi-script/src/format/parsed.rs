use std::io::Write;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Result, ScriptError};

use super::ScriptLayout;

/// The three sections of a loaded script plus its version tag.
///
/// Layout (little-endian):
/// - version tag, NUL-terminated ASCII
/// - u32 import_len (counts its own 4 bytes)
/// - [import_len - 4] import section
/// - code section (length inferred, see [`ScriptLayout::code_size_probe`])
/// - string section, to EOF
///
/// String operands in the code section are biased by the code length:
/// operand `v` addresses `strings[v - code.len()]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptSections {
    pub version: String,
    pub import: Vec<u8>,
    pub code: Vec<u8>,
    pub strings: Vec<u8>,
}

impl ScriptSections {
    pub fn parse(bytes: &[u8], layout: &ScriptLayout) -> Result<Self> {
        let tag_len = bytes
            .iter()
            .position(|&b| b == 0)
            .ok_or(ScriptError::Truncated { what: "version tag" })?;
        let tag = &bytes[..tag_len];
        if tag != layout.version.as_bytes() {
            return Err(ScriptError::UnsupportedVersion {
                found: String::from_utf8_lossy(tag).into_owned(),
            });
        }
        let version = layout.version.clone();
        let mut off = tag_len + 1;

        let mut len_field = bytes.get(off..).unwrap_or_default();
        let import_len = len_field
            .read_u32::<LittleEndian>()
            .map_err(|_| ScriptError::Truncated { what: "import section length" })?
            as usize;
        off += 4;

        let import_end = import_len
            .checked_sub(4)
            .and_then(|payload| off.checked_add(payload))
            .filter(|&end| end <= bytes.len())
            .ok_or(ScriptError::Truncated { what: "import section" })?;
        let import = bytes[off..import_end].to_vec();
        off = import_end;

        let block = &bytes[off..];
        let code_len = (layout.code_size_probe)(block)
            .filter(|&n| n <= block.len())
            .ok_or(ScriptError::SectionBoundary)?;

        log::debug!(
            "{}: import=0x{:X} code=0x{:X} strings=0x{:X}",
            version,
            import.len(),
            code_len,
            block.len() - code_len
        );

        Ok(Self {
            version,
            import,
            code: block[..code_len].to_vec(),
            strings: block[code_len..].to_vec(),
        })
    }

    /// Serialize back to the container layout. Sections are written as-is.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let import_len =
            u32::try_from(self.import.len() + 4).map_err(|_| ScriptError::TooLarge)?;

        writer.write_all(self.version.as_bytes())?;
        writer.write_u8(0)?;
        writer.write_u32::<LittleEndian>(import_len)?;
        writer.write_all(&self.import)?;
        writer.write_all(&self.code)?;
        writer.write_all(&self.strings)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(
            self.version.len() + 5 + self.import.len() + self.code.len() + self.strings.len(),
        );
        self.write_to(&mut out)?;
        Ok(out)
    }
}
