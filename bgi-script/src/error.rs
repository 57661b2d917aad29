use bgi_nls::Encoding;

#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error("unsupported script version: {found:?}")]
    UnsupportedVersion { found: String },

    #[error("unexpected end of file while reading {what}")]
    Truncated { what: &'static str },

    #[error("unable to guess the code/string section boundary")]
    SectionBoundary,

    #[error("bad format at line: {line}")]
    BadTranslationLine { line: usize },

    #[error("the offset {offset:08X} is not contained in the script")]
    UnknownOffset { offset: u32 },

    #[error("string cannot be encoded as {encoding}: {text:?}")]
    Unencodable { text: String, encoding: Encoding },

    #[error("rebuilt string section does not fit 32-bit operands")]
    TooLarge,

    #[error("the script has not been loaded yet")]
    NotLoaded,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScriptError>;
