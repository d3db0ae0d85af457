//! The `fasal crops` command.

use fasal_core::CropCatalog;

/// Print the crop catalog as pretty JSON.
pub fn execute() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&CropCatalog::new())?);
    Ok(())
}
