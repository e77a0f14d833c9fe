//! JSON output for records and search results.

use serde::Serialize;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Pretty JSON rendering used for both stdout and files.
pub fn to_pretty_json<T: Serialize>(record: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(record)
}

/// Write `record` to `{output_dir}/{provider}/{file_stem}.json`.
///
/// # Arguments
///
/// * `output_dir` - Base directory, already checked by [`crate::utils::ensure_writable_dir`]
/// * `provider` - Provider name, used as the subdirectory
/// * `file_stem` - Record id, or `search-{slug}` for search results
/// * `record` - Anything serializable; written as pretty JSON
///
/// # Returns
///
/// The path that was written.
///
/// # Errors
///
/// Serialization, directory creation or file write failures.
#[instrument(level = "info", skip(record), fields(output_dir = %output_dir))]
pub async fn write_record<T: Serialize>(
    output_dir: &str,
    provider: &str,
    file_stem: &str,
    record: &T,
) -> Result<String, Box<dyn Error>> {
    let json = to_pretty_json(record)?;

    let full_dir = format!("{}/{}", output_dir.trim_end_matches('/'), provider);
    if let Err(e) = fs::create_dir_all(&full_dir).await {
        error!(%full_dir, error = %e, "Failed to create output dir");
        return Err(e.into());
    }

    let path = format!("{full_dir}/{file_stem}.json");
    fs::write(&path, json).await?;
    info!(%path, "Wrote JSON record");

    Ok(path)
}
