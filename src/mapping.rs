use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ConverterConfig;
use crate::error::{ConvertError, Result};
use crate::sanitize::sanitize_filename;
use crate::translator::Translator;

pub const MAPPING_HEADER: [&str; 2] = ["CURRENT_FILE_NAME", "NEW_FILE_NAME"];

/// One file's rename intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingEntry {
    #[serde(rename = "CURRENT_FILE_NAME")]
    original_name: String,
    #[serde(rename = "NEW_FILE_NAME")]
    new_name: String,
}

impl MappingEntry {
    pub fn new(original_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            new_name: new_name.into(),
        }
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn new_name(&self) -> &str {
        &self.new_name
    }
}

/// Ordered list of rename intents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: MappingEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MappingEntry> {
        self.entries.iter()
    }
}

impl FromIterator<MappingEntry> for MappingTable {
    fn from_iter<I: IntoIterator<Item = MappingEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MappingTable {
    type Item = &'a MappingEntry;
    type IntoIter = std::slice::Iter<'a, MappingEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationFailure {
    pub index: usize,
    pub original_name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub table: MappingTable,
    pub failures: Vec<TranslationFailure>,
}

/// Turns a directory listing into a mapping table by translating each name.
pub struct MappingBuilder<'a> {
    translator: &'a dyn Translator,
    config: &'a ConverterConfig,
}

impl<'a> MappingBuilder<'a> {
    pub fn new(translator: &'a dyn Translator, config: &'a ConverterConfig) -> Self {
        Self { translator, config }
    }

    /// Translate every name in listing order. A failed translation leaves
    /// an empty new name at that position and is recorded in the report.
    pub fn build<S: AsRef<str>>(&self, listing: &[S]) -> BuildReport {
        let mut report = BuildReport::default();

        info!(
            count = listing.len(),
            source = %self.config.source_lang,
            target = %self.config.target_lang,
            "building filename mapping"
        );

        for (index, name) in listing.iter().enumerate() {
            let name = name.as_ref();
            let translated = match self.translator.translate(
                name,
                &self.config.source_lang,
                &self.config.target_lang,
            ) {
                Ok(text) => {
                    debug!(original = name, translated = %text, "translated filename");
                    text
                }
                Err(e) => {
                    warn!(original = name, error = %e, "translation failed, leaving new name empty");
                    report.failures.push(TranslationFailure {
                        index,
                        original_name: name.to_string(),
                        error: e.to_string(),
                    });
                    String::new()
                }
            };

            report
                .table
                .push(MappingEntry::new(name, sanitize_filename(&translated)));
        }

        report
    }
}

/// Names of all entries in `dir`, sorted, leaving out `exclude` if present.
pub fn list_directory(dir: &Path, exclude: Option<&str>) -> Result<Vec<String>> {
    let read_error = |source: std::io::Error| ConvertError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                warn!(name = ?raw, "skipping entry whose name is not valid UTF-8");
                continue;
            }
        };
        if Some(name.as_str()) == exclude {
            continue;
        }
        names.push(name);
    }

    names.sort();
    Ok(names)
}
