//! String references recovered from raw bytecode.

use bgi_nls::TextDecoder;
use byteorder::{ByteOrder, LittleEndian};

use crate::format::{LOAD_STRING_LEN, LOAD_STRING_PATTERN};
use crate::search;

/// One string operand in the code section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringRef {
    /// Code-section offset of the 4-byte operand (not of the opcode).
    pub offset: u32,
    pub text: String,
}

/// Every `03 00 00 00 <u32>` whose operand lands inside the string section.
///
/// Pattern hits that run past the end of the code, or whose operand points
/// outside the string section, are scan noise and skipped. References come
/// out in ascending offset order; equal texts are kept as separate entries.
pub fn find_strings(code: &[u8], strings: &[u8], nls: &dyn TextDecoder) -> Vec<StringRef> {
    let code_len = code.len();
    let mut refs = Vec::new();

    for m in search::matches(code, &LOAD_STRING_PATTERN) {
        if m + LOAD_STRING_LEN > code_len {
            log::trace!("load-string hit at 0x{:X} truncated by end of code", m);
            continue;
        }

        let operand = LittleEndian::read_u32(&code[m + 4..m + 8]) as usize;
        let Some(index) = operand.checked_sub(code_len).filter(|&i| i < strings.len()) else {
            log::trace!("operand 0x{:08X} at 0x{:X} outside string section", operand, m + 4);
            continue;
        };

        let text = nls.decode_cstr(&strings[index..]).into_owned();
        refs.push(StringRef { offset: (m + 4) as u32, text });
    }

    log::debug!("found {} string references", refs.len());
    refs
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgi_nls::{Decoder, Encoding};
    use pretty_assertions::assert_eq;

    fn sjis() -> Decoder {
        Decoder::new(Encoding::ShiftJis)
    }

    #[test]
    fn operand_is_biased_by_code_length() {
        let code = [0x03, 0, 0, 0, 0x08, 0, 0, 0];
        let refs = find_strings(&code, b"cat\0dog\0", &sjis());
        assert_eq!(refs, vec![StringRef { offset: 4, text: "cat".into() }]);
    }

    #[test]
    fn second_string_and_repeats() {
        let code = [
            0x03, 0, 0, 0, 0x1C, 0, 0, 0, //
            0x03, 0, 0, 0, 0x18, 0, 0, 0, //
            0x03, 0, 0, 0, 0x1C, 0, 0, 0, //
        ];
        let refs = find_strings(&code, b"cat\0dog\0", &sjis());
        let texts: Vec<_> = refs.iter().map(|r| (r.offset, r.text.as_str())).collect();
        assert_eq!(texts, vec![(4, "dog"), (12, "cat"), (20, "dog")]);
    }

    #[test]
    fn skips_noise() {
        let code = [
            0x03, 0, 0, 0, 0x02, 0, 0, 0, // below code length
            0x03, 0, 0, 0, 0xFF, 0, 0, 0, // past string section
            0x03, 0, 0, 0, 0x14, // cut off
        ];
        assert!(find_strings(&code, b"ab\0", &sjis()).is_empty());
    }

    #[test]
    fn decodes_shift_jis_and_unterminated_tail() {
        let code = [0x03, 0, 0, 0, 0x10, 0, 0, 0, 0x03, 0, 0, 0, 0x13, 0, 0, 0];
        // "あ" then "xy" without a terminator
        let strings = [0x82, 0xA0, 0x00, b'x', b'y'];
        let refs = find_strings(&code, &strings, &sjis());
        assert_eq!(refs[0].text, "あ");
        assert_eq!(refs[1].text, "xy");
    }

    #[test]
    fn empty_string_is_a_reference() {
        let code = [0x03, 0, 0, 0, 0x08, 0, 0, 0];
        let refs = find_strings(&code, b"\0", &sjis());
        assert_eq!(refs, vec![StringRef { offset: 4, text: String::new() }]);
    }
}
