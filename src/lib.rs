//! Rename files by translating their names from one language to another.
//!
//! Work happens in two phases: build a mapping file from the current names,
//! then apply it.

pub mod config;
pub mod error;
pub mod mapping;
pub mod mapping_file;
pub mod rename_engine;
pub mod sanitize;
pub mod translator;

pub use config::{ConfigBuilder, ConverterConfig, DEFAULT_MAPPING_FILENAME};
pub use error::{ConvertError, Result};
pub use mapping::{BuildReport, MappingBuilder, MappingEntry, MappingTable, list_directory};
pub use rename_engine::{RenameEngine, RenameReport, RenameStatus};
pub use sanitize::sanitize_filename;
pub use translator::{GoogleTranslator, Translator};
