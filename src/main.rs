use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use filename_converter::config::{ConfigBuilder, ConverterConfig};
use filename_converter::mapping::{MappingBuilder, list_directory};
use filename_converter::mapping_file;
use filename_converter::rename_engine::{RenameEngine, RenameStatus};
use filename_converter::translator::GoogleTranslator;

#[derive(Parser, Debug)]
#[command(name = "filename-converter", about = "Translate file names and rename files")]
struct Cli {
    /// Create a mapping file containing current and suggested new file names
    #[arg(short = 'm', long = "make-mapping", conflicts_with = "rename")]
    make_mapping: bool,

    /// Rename files based on the mapping file created with -m
    #[arg(short = 'r', long = "rename")]
    rename: bool,

    /// Directory whose entries are translated and renamed
    #[arg(long = "dir", env = "FILENAME_CONVERTER_DIR")]
    directory: Option<PathBuf>,

    /// Mapping file, relative to --dir unless absolute
    #[arg(long, env = "FILENAME_CONVERTER_MAPPING_FILE")]
    mapping_file: Option<PathBuf>,

    #[arg(long, env = "FILENAME_CONVERTER_SOURCE_LANG")]
    source_lang: Option<String>,

    #[arg(long, env = "FILENAME_CONVERTER_TARGET_LANG")]
    target_lang: Option<String>,

    /// Show every translation and rename
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let config = build_config(&cli)?;

    if cli.make_mapping {
        make_mapping(&config)?;
    } else if cli.rename {
        rename_files(&config)?;
    } else {
        println!("Nothing to do, use -m to create a mapping file, -r to rename files (see -h)");
        return Ok(());
    }

    print_directory(&config)
}

fn build_config(cli: &Cli) -> Result<ConverterConfig> {
    let mut builder = ConfigBuilder::new();
    if let Some(dir) = &cli.directory {
        builder = builder.directory(dir);
    }
    if let Some(file) = &cli.mapping_file {
        builder = builder.mapping_file(file);
    }
    if let Some(lang) = &cli.source_lang {
        builder = builder.source_lang(lang);
    }
    if let Some(lang) = &cli.target_lang {
        builder = builder.target_lang(lang);
    }
    builder.build().context("Invalid configuration")
}

fn make_mapping(config: &ConverterConfig) -> Result<()> {
    let mapping_path = config.mapping_path();
    println!("*** Creating mapping file: {}", mapping_path.display());

    let exclude = config.mapping_file_in_directory();
    let files = list_directory(&config.directory, exclude.as_deref())
        .context("Failed to list files to translate")?;

    let translator = GoogleTranslator::new();
    let report = MappingBuilder::new(&translator, config).build(&files);

    mapping_file::save(&report.table, &mapping_path).context("Failed to save mapping file")?;

    println!(
        "Summary: {} entries written, {} could not be translated",
        report.table.len(),
        report.failures.len()
    );
    for failure in &report.failures {
        println!("  ✗ {}: {}", failure.original_name, failure.error);
    }

    Ok(())
}

fn rename_files(config: &ConverterConfig) -> Result<()> {
    let mapping_path = config.mapping_path();
    println!("*** Loading mapping file: {} to rename files", mapping_path.display());

    let table = mapping_file::load(&mapping_path).with_context(|| {
        format!(
            "Could not load {}, run with -m first to create it",
            mapping_path.display()
        )
    })?;

    let report = RenameEngine::new(&config.directory).apply(&table);

    for result in &report.results {
        if let RenameStatus::Failed(failure) = &result.status {
            println!(
                "  ✗ {} -> {}: {}",
                result.entry.original_name(),
                result.entry.new_name(),
                failure
            );
        }
    }

    println!(
        "Summary: {} renamed, {} skipped, {} failed",
        report.renamed(),
        report.skipped(),
        report.failed()
    );

    Ok(())
}

fn print_directory(config: &ConverterConfig) -> Result<()> {
    let files = list_directory(&config.directory, None).context("Failed to list directory")?;
    println!("{} {:?}", files.len(), files);
    Ok(())
}
