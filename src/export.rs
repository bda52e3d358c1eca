use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::models::JobOffer;

/// Write the whole batch as one pretty-printed JSON array. The batch is
/// serialized up front so a failure never leaves a truncated array behind.
pub fn write_offers(path: &Path, offers: &[JobOffer]) -> Result<()> {
    let json = serde_json::to_string_pretty(offers).context("Failed to serialize offers")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn read_offers(path: &Path) -> Result<Vec<JobOffer>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("{} is not a JSON array of offers", path.display()))
}
