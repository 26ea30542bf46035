use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use tracing::info;

use crate::error::{ConvertError, Result};
use crate::mapping::{MAPPING_HEADER, MappingEntry, MappingTable};

/// Write the header row followed by one row per entry.
pub fn save(table: &MappingTable, path: &Path) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| ConvertError::persistence(path, format!("cannot create file: {e}")))?;

    writer
        .write_record(MAPPING_HEADER)
        .map_err(|e| ConvertError::persistence(path, e))?;
    for entry in table {
        writer
            .serialize(entry)
            .map_err(|e| ConvertError::persistence(path, e))?;
    }
    writer
        .flush()
        .map_err(|e| ConvertError::persistence(path, e))?;

    info!(path = %path.display(), entries = table.len(), "saved mapping file");
    Ok(())
}

/// Read a mapping file back, skipping its header row.
pub fn load(path: &Path) -> Result<MappingTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| ConvertError::persistence(path, format!("cannot open file: {e}")))?;

    let mut table = MappingTable::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ConvertError::persistence(path, e))?;
        match (record.get(0), record.get(1)) {
            (Some(original), Some(new_name)) => table.push(MappingEntry::new(original, new_name)),
            _ => {
                return Err(ConvertError::persistence(
                    path,
                    format!("row {} has fewer than 2 columns", row + 2),
                ));
            }
        }
    }

    info!(path = %path.display(), entries = table.len(), "loaded mapping file");
    Ok(table)
}
