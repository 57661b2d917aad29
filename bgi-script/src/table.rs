//! Rebuilding the string section and repointing code operands at it.

use bgi_nls::Decoder;
use byteorder::{ByteOrder, LittleEndian};
use indexmap::IndexMap;

use crate::error::{Result, ScriptError};

/// A freshly laid out string section.
///
/// Each distinct text is stored once, NUL-terminated, in first-seen order;
/// identical texts share one offset.
#[derive(Clone, Debug, Default)]
pub struct StringTable {
    bytes: Vec<u8>,
    offsets: IndexMap<String, u32>,
}

impl StringTable {
    pub fn build<'a, I>(texts: I, nls: &Decoder) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut table = Self::default();
        for text in texts {
            table.insert(text, nls)?;
        }
        log::debug!(
            "string table: {} distinct strings, 0x{:X} bytes",
            table.offsets.len(),
            table.bytes.len()
        );
        Ok(table)
    }

    /// Offset of `text`, appending it first if it is new.
    pub fn insert(&mut self, text: &str, nls: &Decoder) -> Result<u32> {
        if let Some(&offset) = self.offsets.get(text) {
            return Ok(offset);
        }

        let encoded = nls.try_encode(text).ok_or_else(|| ScriptError::Unencodable {
            text: text.to_string(),
            encoding: nls.encoding(),
        })?;
        let offset = u32::try_from(self.bytes.len()).map_err(|_| ScriptError::TooLarge)?;
        self.bytes.extend_from_slice(&encoded);
        self.bytes.push(0);
        self.offsets.insert(text.to_string(), offset);
        Ok(offset)
    }

    pub fn offset_of(&self, text: &str) -> Option<u32> {
        self.offsets.get(text).copied()
    }

    /// Distinct texts in storage order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.offsets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// A 4-byte operand rewrite in the code section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Patch {
    pub offset: usize,
    pub value: u32,
}

/// Operand values pointing every reference at its text in `table`.
///
/// Nothing is written here, so a failure leaves the code section intact.
pub fn plan_patches(
    refs: &IndexMap<u32, String>,
    table: &StringTable,
    code_len: usize,
) -> Result<Vec<Patch>> {
    let bias = u32::try_from(code_len).map_err(|_| ScriptError::TooLarge)?;

    refs.iter()
        .map(|(&offset, text)| {
            let index = table.offset_of(text).ok_or_else(|| ScriptError::UnknownOffset { offset })?;
            let value = index.checked_add(bias).ok_or(ScriptError::TooLarge)?;
            Ok(Patch { offset: offset as usize, value })
        })
        .collect()
}

pub fn apply_patches(code: &mut [u8], patches: &[Patch]) {
    for patch in patches {
        LittleEndian::write_u32(&mut code[patch.offset..patch.offset + 4], patch.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgi_nls::Encoding;
    use pretty_assertions::assert_eq;

    fn utf8() -> Decoder {
        Decoder::new(Encoding::Utf8)
    }

    #[test]
    fn dedups_in_first_seen_order() {
        let table = StringTable::build(["b", "a", "b", "", "a"], &utf8()).unwrap();
        assert_eq!(table.as_bytes(), b"b\0a\0\0");
        assert_eq!(table.offset_of("b"), Some(0));
        assert_eq!(table.offset_of("a"), Some(2));
        assert_eq!(table.offset_of(""), Some(4));
        assert_eq!(table.texts().collect::<Vec<_>>(), vec!["b", "a", ""]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn offsets_track_encoded_width() {
        let table = StringTable::build(["猫", "x"], &utf8()).unwrap();
        assert_eq!(table.offset_of("x"), Some(4));

        let table = StringTable::build(["猫", "x"], &Decoder::new(Encoding::ShiftJis)).unwrap();
        assert_eq!(table.offset_of("x"), Some(3));
    }

    #[test]
    fn unencodable_text() {
        let err = StringTable::build(["\u{1F431}"], &Decoder::new(Encoding::ShiftJis)).unwrap_err();
        assert!(matches!(err, ScriptError::Unencodable { encoding: Encoding::ShiftJis, .. }));
    }

    #[test]
    fn patches_are_biased_and_little_endian() {
        let mut refs = IndexMap::new();
        refs.insert(4u32, "dog".to_string());
        refs.insert(12u32, "cat".to_string());
        refs.insert(20u32, "dog".to_string());
        let table = StringTable::build(refs.values().map(String::as_str), &utf8()).unwrap();

        let patches = plan_patches(&refs, &table, 0x18).unwrap();
        assert_eq!(
            patches,
            vec![
                Patch { offset: 4, value: 0x18 },
                Patch { offset: 12, value: 0x1C },
                Patch { offset: 20, value: 0x18 },
            ]
        );

        let mut code = vec![0u8; 0x18];
        apply_patches(&mut code, &patches);
        assert_eq!(&code[12..16], &[0x1C, 0, 0, 0]);
        assert_eq!(&code[20..24], &[0x18, 0, 0, 0]);
    }
}
