use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use bgi_nls::{Decoder, Encoding};
use indexmap::IndexMap;

use crate::catalog::{self, StringRef};
use crate::error::{Result, ScriptError};
use crate::format::{ScriptLayout, ScriptSections};
use crate::table::{self, StringTable};
use crate::translation::{self, Translation};

/// How a [`Script`] reads and rebuilds its sections.
#[derive(Clone, Debug)]
pub struct ScriptOptions {
    pub layout: ScriptLayout,
    /// Encoding of the string section as shipped.
    pub source_nls: Encoding,
    /// Encoding of the string section written by [`Script::import_strings`].
    pub target_nls: Encoding,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            layout: ScriptLayout::default(),
            source_nls: Encoding::ShiftJis,
            target_nls: Encoding::Utf8,
        }
    }
}

/// A compiled script held fully in memory.
///
/// Created empty, filled by [`Script::load`] (or [`Script::parse`]), then
/// optionally rewritten by [`Script::import_strings`] before [`Script::save`].
/// Every operation except loading fails with [`ScriptError::NotLoaded`] on an
/// empty script.
#[derive(Clone, Debug, Default)]
pub struct Script {
    options: ScriptOptions,
    sections: Option<ScriptSections>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ScriptOptions) -> Self {
        Self { options, sections: None }
    }

    /// Parse `bytes` with default options.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut script = Self::new();
        script.parse(bytes)?;
        Ok(script)
    }

    pub fn options(&self) -> &ScriptOptions {
        &self.options
    }

    pub fn is_loaded(&self) -> bool {
        self.sections.is_some()
    }

    pub fn sections(&self) -> Result<&ScriptSections> {
        self.sections.as_ref().ok_or(ScriptError::NotLoaded)
    }

    pub fn version(&self) -> Result<&str> {
        Ok(&self.sections()?.version)
    }

    /// Replaces any previous content; on error the script is left as it was.
    pub fn parse(&mut self, bytes: &[u8]) -> Result<()> {
        let sections = ScriptSections::parse(bytes, &self.options.layout)?;
        self.sections = Some(sections);
        Ok(())
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let mut bytes = Vec::new();
        BufReader::new(File::open(path.as_ref())?).read_to_end(&mut bytes)?;
        self.parse(&bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.sections()?.to_bytes()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.sections()?.write_to(writer)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let sections = self.sections()?;
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        sections.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Every string reference in the code section, ascending by offset.
    pub fn strings(&self) -> Result<Vec<StringRef>> {
        let sections = self.sections()?;
        let nls = Decoder::new(self.options.source_nls);
        Ok(catalog::find_strings(&sections.code, &sections.strings, &nls))
    }

    /// Writes the translation file; returns the number of records.
    pub fn export_strings(&self, path: impl AsRef<Path>, include_all: bool) -> Result<usize> {
        let refs = self.strings()?;
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        translation::write_translation(&mut writer, &refs, include_all)
    }

    pub fn write_strings<W: Write>(&self, writer: &mut W, include_all: bool) -> Result<usize> {
        let refs = self.strings()?;
        translation::write_translation(writer, &refs, include_all)
    }

    /// Reads a translation file and rebuilds the string section from it.
    pub fn import_strings(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        self.sections()?;
        let reader = BufReader::new(File::open(path.as_ref())?);
        let translations = translation::read_translation(reader)?;
        self.apply_translations(&translations)
    }

    /// Replaces the referenced strings and lays out a new string section.
    ///
    /// Strings without a translation keep their current text. Every operand
    /// is repointed, since re-encoding shifts the offsets of later strings.
    /// All checks run before the sections are touched.
    pub fn apply_translations(&mut self, translations: &[Translation]) -> Result<usize> {
        let source = Decoder::new(self.options.source_nls);
        let target = Decoder::new(self.options.target_nls);
        let sections = self.sections.as_mut().ok_or(ScriptError::NotLoaded)?;

        let mut current: IndexMap<u32, String> =
            catalog::find_strings(&sections.code, &sections.strings, &source)
                .into_iter()
                .map(|r| (r.offset, r.text))
                .collect();

        for t in translations {
            let slot = current
                .get_mut(&t.offset)
                .ok_or(ScriptError::UnknownOffset { offset: t.offset })?;
            slot.clone_from(&t.text);
        }

        let table = StringTable::build(current.values().map(String::as_str), &target)?;
        let patches = table::plan_patches(&current, &table, sections.code.len())?;

        table::apply_patches(&mut sections.code, &patches);
        sections.strings = table.into_bytes();

        log::debug!(
            "applied {} translations over {} references",
            translations.len(),
            current.len()
        );
        Ok(translations.len())
    }
}
