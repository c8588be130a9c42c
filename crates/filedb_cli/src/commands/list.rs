//! List command implementation.

use filedb_core::Database;
use serde::Serialize;
use std::path::Path;

/// One listed collection.
#[derive(Debug, Serialize)]
pub struct CollectionEntry {
    /// Collection name.
    pub name: String,
    /// Number of records (if requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<usize>,
}

/// Runs the list command.
pub fn run(path: &Path, show_counts: bool, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open(path)?;
    let entries = collect(&db, show_counts)?;
    db.close();

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        _ => {
            for entry in &entries {
                match entry.records {
                    Some(count) => println!("{:<32} {count:>10}", entry.name),
                    None => println!("{}", entry.name),
                }
            }
        }
    }

    Ok(())
}

/// Gathers collection entries for `db`.
pub fn collect(
    db: &Database,
    show_counts: bool,
) -> Result<Vec<CollectionEntry>, Box<dyn std::error::Error>> {
    let mut entries = Vec::new();
    for name in db.collection_names()? {
        let records = if show_counts {
            Some(db.collection(&name).count()?)
        } else {
            None
        };
        entries.push(CollectionEntry { name, records });
    }
    Ok(entries)
}
