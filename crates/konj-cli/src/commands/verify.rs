//! The `konj --verify` path.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(files: &[PathBuf]) -> Result<()> {
    let items = konj_core::parser::load_items(files)?;
    tracing::info!("{} items in {} files", items.len(), files.len());
    eprintln!("All files are correct.");
    Ok(())
}
