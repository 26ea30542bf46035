use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

pub const DEFAULT_MAPPING_FILENAME: &str = "filename_mapping.csv";
pub const DEFAULT_SOURCE_LANG: &str = "ja";
pub const DEFAULT_TARGET_LANG: &str = "en";

#[derive(Debug, Clone, PartialEq)]
pub struct ConverterConfig {
    pub directory: PathBuf,
    pub mapping_file: PathBuf,
    pub source_lang: String,
    pub target_lang: String,
}

impl ConverterConfig {
    /// Location of the mapping file; relative paths are taken from `directory`.
    pub fn mapping_path(&self) -> PathBuf {
        if self.mapping_file.is_absolute() {
            self.mapping_file.clone()
        } else {
            self.directory.join(&self.mapping_file)
        }
    }

    /// Name under which the mapping file shows up in a listing of
    /// `directory`, or `None` when it lives somewhere else.
    pub fn mapping_file_in_directory(&self) -> Option<String> {
        let path = self.mapping_path();
        let parent = path.parent()?;

        let same_dir = parent == self.directory
            || matches!(
                (fs::canonicalize(parent), fs::canonicalize(&self.directory)),
                (Ok(a), Ok(b)) if a == b
            );
        if !same_dir {
            return None;
        }

        path.file_name()?.to_str().map(str::to_string)
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            mapping_file: PathBuf::from(DEFAULT_MAPPING_FILENAME),
            source_lang: DEFAULT_SOURCE_LANG.to_string(),
            target_lang: DEFAULT_TARGET_LANG.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    directory: Option<PathBuf>,
    mapping_file: Option<PathBuf>,
    source_lang: Option<String>,
    target_lang: Option<String>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directory<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.directory = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn mapping_file<P: AsRef<Path>>(mut self, file: P) -> Self {
        self.mapping_file = Some(file.as_ref().to_path_buf());
        self
    }

    pub fn source_lang(mut self, lang: impl Into<String>) -> Self {
        self.source_lang = Some(lang.into());
        self
    }

    pub fn target_lang(mut self, lang: impl Into<String>) -> Self {
        self.target_lang = Some(lang.into());
        self
    }

    pub fn build(self) -> Result<ConverterConfig> {
        let defaults = ConverterConfig::default();

        let mapping_file = self.mapping_file.unwrap_or(defaults.mapping_file);
        if mapping_file.as_os_str().is_empty() {
            return Err(ConvertError::InvalidConfig(
                "mapping file path must not be empty".to_string(),
            ));
        }

        let source_lang = self.source_lang.unwrap_or(defaults.source_lang);
        let target_lang = self.target_lang.unwrap_or(defaults.target_lang);
        for (label, lang) in [("source", &source_lang), ("target", &target_lang)] {
            if lang.trim().is_empty() {
                return Err(ConvertError::InvalidConfig(format!(
                    "{label} language code must not be empty"
                )));
            }
        }

        Ok(ConverterConfig {
            directory: self.directory.unwrap_or(defaults.directory),
            mapping_file,
            source_lang,
            target_lang,
        })
    }
}
