//! Drop command implementation.

use filedb_core::Database;
use std::path::Path;

/// Runs the drop command.
pub fn run(path: &Path, collection: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open(path)?;
    db.drop_collection(collection)?;
    tracing::info!(collection, "dropped collection");
    Ok(())
}
