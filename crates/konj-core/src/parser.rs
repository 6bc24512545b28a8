//! CSV table parser.
//!
//! Turns drill tables into flat lists of [`Item`]s and checks that every
//! cell using alternation syntax lines up with its header.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::{FormatError, LoadError};
use crate::model::{has_alternation, separator_count, split_variants, Item};

/// Load and validate every table in `paths`, in order.
///
/// Stops at the first table that fails to read or validate.
pub fn load_items<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open input file: {}", path.display()))?;
        let loaded = parse_table(file, path)?;
        tracing::info!("loaded {} items from {}", loaded.len(), path.display());
        items.extend(loaded);
    }
    Ok(items)
}

/// Parse one table from an in-memory string (useful for testing).
pub fn parse_table_str(content: &str, source_path: &Path) -> Result<Vec<Item>> {
    parse_table(content.as_bytes(), source_path)
}

/// Parse one table from any reader.
///
/// The first row is the header; its first field only labels the group
/// column. Every non-blank cell after the first column becomes an item.
pub fn parse_table<R: Read>(reader: R, source_path: &Path) -> Result<Vec<Item>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let header: Vec<String> = reader
        .headers()
        .with_context(|| format!("failed to read header row: {}", source_path.display()))?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut items = Vec::new();
    for record in reader.records() {
        let record = record
            .with_context(|| format!("failed to parse table: {}", source_path.display()))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let Some(group) = record.get(0) else {
            continue;
        };

        for (index, cell) in record.iter().enumerate().skip(1) {
            if is_blank(cell) {
                if !cell.trim().is_empty() {
                    tracing::warn!(
                        "{}:{}: field {} holds only separators, skipping",
                        source_path.display(),
                        line,
                        index
                    );
                }
                continue;
            }

            let Some(prompt) = header.get(index) else {
                return Err(LoadError::MissingHeader {
                    file: source_path.to_path_buf(),
                    line,
                    column: index,
                }
                .into());
            };

            if has_alternation(cell) {
                check_alternation(cell, prompt, source_path, line, index)?;
            }

            items.push(Item::new(prompt.as_str(), group, cell));
        }
    }

    Ok(items)
}

/// A cell is not drillable when every variant in it is blank.
fn is_blank(cell: &str) -> bool {
    split_variants(cell).all(|v| v.trim().is_empty())
}

fn check_alternation(
    cell: &str,
    header: &str,
    file: &Path,
    line: u64,
    index: usize,
) -> std::result::Result<(), LoadError> {
    let found = separator_count(cell);
    let expected = separator_count(header);
    if found != expected {
        return Err(FormatError {
            file: PathBuf::from(file),
            line,
            column: index,
            found,
            expected,
        }
        .into());
    }
    Ok(())
}
