use anyhow::bail;
use encoding_rs::{Encoding as RsEncoding, GBK, SHIFT_JIS, UTF_8};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

pub trait TextDecoder {
    fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str>;

    /// Decode C-style string: stop at the first NUL (0x00).
    fn decode_cstr<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        self.decode(&bytes[..end])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Encoding {
    Utf8,
    ShiftJis,
    /// Legacy CN assets; encoded/decoded through the GBK table.
    Gbk,
}

impl Encoding {
    #[inline]
    pub fn as_encoding_rs(self) -> &'static RsEncoding {
        match self {
            Encoding::Utf8 => UTF_8,
            Encoding::ShiftJis => SHIFT_JIS,
            Encoding::Gbk => GBK,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf8",
            Encoding::ShiftJis => "sjis",
            Encoding::Gbk => "gbk",
        }
    }
}

impl FromStr for Encoding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "sjis" | "shiftjis" | "shift_jis" | "shift-jis" | "cp932" => Ok(Encoding::ShiftJis),
            "gbk" | "cp936" => Ok(Encoding::Gbk),
            other => bail!("unsupported nls: {other}"),
        }
    }
}

impl TryFrom<String> for Encoding {
    type Error = anyhow::Error;

    fn try_from(value: String) -> anyhow::Result<Self> {
        value.parse()
    }
}

impl From<Encoding> for String {
    fn from(value: Encoding) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A simple decoder bound to one encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoder {
    enc: Encoding,
}

impl Decoder {
    #[inline]
    pub fn new(enc: Encoding) -> Self {
        Self { enc }
    }

    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.enc
    }

    /// Encode a Rust string to bytes using the selected encoding.
    /// This is "best effort": unrepresentable chars will be replaced.
    pub fn encode<'a>(&self, s: &'a str) -> Cow<'a, [u8]> {
        let enc = self.enc.as_encoding_rs();
        let (cow, _, _had_errors) = enc.encode(s);
        cow
    }

    /// Strict variant of [`Decoder::encode`]: `None` if any char has no mapping.
    pub fn try_encode<'a>(&self, s: &'a str) -> Option<Cow<'a, [u8]>> {
        let enc = self.enc.as_encoding_rs();
        let (cow, _, had_errors) = enc.encode(s);
        if had_errors { None } else { Some(cow) }
    }

    /// Same as encode(), but always returns an owned Vec<u8>.
    pub fn encode_owned(&self, s: &str) -> Vec<u8> {
        self.encode(s).into_owned()
    }
}

impl TextDecoder for Decoder {
    fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        match self.enc {
            Encoding::Utf8 => String::from_utf8_lossy(bytes),
            Encoding::ShiftJis | Encoding::Gbk => {
                let enc = self.enc.as_encoding_rs();
                // section data never carries a BOM; don't let one switch the decoder
                let (cow, had_errors) = enc.decode_without_bom_handling(bytes);
                if had_errors {
                    log::warn!("{} decode error", self.enc);
                }
                cow
            }
        }
    }
}

/// Original script text is Shift-JIS.
impl Default for Decoder {
    fn default() -> Self {
        Self::new(Encoding::ShiftJis)
    }
}
