//! Insert command implementation.

use filedb_core::Database;
use std::path::Path;

/// Runs the insert command.
pub fn run(path: &Path, collection: &str, record: &str) -> Result<(), Box<dyn std::error::Error>> {
    if record.contains('\n') {
        return Err("Record must be a single line".into());
    }

    let db = Database::open(path)?;
    db.collection(collection).insert(record.as_bytes())?;
    db.close();
    tracing::info!(collection, "inserted record");
    Ok(())
}
