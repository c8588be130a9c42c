//! Dump command implementation.

use filedb_core::Database;
use std::io::{self, Write};
use std::path::Path;

/// Runs the dump command.
pub fn run(
    path: &Path,
    collection: &str,
    limit: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open(path)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let printed = dump(&db, collection, limit, &mut out)?;
    out.flush()?;
    tracing::debug!(collection, printed, "dumped collection");
    Ok(())
}

/// Writes up to `limit` records of `collection` to `out`, returning how many
/// were written.
pub fn dump<W: Write>(
    db: &Database,
    collection: &str,
    limit: Option<usize>,
    out: &mut W,
) -> Result<usize, Box<dyn std::error::Error>> {
    if !db.collection_names()?.iter().any(|n| n == collection) {
        return Err(format!("No collection named {collection:?} in {:?}", db.path()).into());
    }

    let limit = limit.unwrap_or(usize::MAX);
    let mut printed = 0;
    db.collection(collection).try_for_each(|index, record| {
        if index >= limit {
            return Ok(true);
        }
        out.write_all(record)?;
        out.write_all(b"\n")?;
        printed += 1;
        Ok(false)
    })?;
    Ok(printed)
}
