//! Database directory management.
//!
//! A database is a plain directory. Every collection is one file in it:
//!
//! ```text
//! <db_path>/
//! ├─ people.filedb                 # one record per line
//! ├─ places.filedb
//! └─ .filedb-rewrite-XXXXXX.tmp    # scratch file, only during a rewrite
//! ```
//!
//! Scratch files never carry the collection extension, so they are never
//! listed as collections.

use crate::error::{CoreError, CoreResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of collection files, without the leading dot.
pub const EXTENSION: &str = "filedb";

/// Prefix of scratch files created by a select-rewrite.
pub(crate) const REWRITE_PREFIX: &str = ".filedb-rewrite-";

/// Suffix of scratch files created by a select-rewrite.
pub(crate) const REWRITE_SUFFIX: &str = ".tmp";

/// The directory backing a database.
///
/// # Example
///
/// ```rust,ignore
/// use filedb_core::dir::DatabaseDir;
/// use std::path::Path;
///
/// let dir = DatabaseDir::open(Path::new("my_db"), false)?;
/// println!("collections: {:?}", dir.collection_names()?);
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseDir {
    /// Root directory path.
    path: PathBuf,
}

impl DatabaseDir {
    /// Opens a database directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the database directory
    /// * `create_if_missing` - If true, creates the directory if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `DatabaseNotFound` if the path is missing, cannot be stat'ed,
    /// or is not a directory. Returns an I/O error if creating the directory
    /// fails.
    pub fn open(path: &Path, create_if_missing: bool) -> CoreResult<Self> {
        if create_if_missing && !path.exists() {
            fs::create_dir_all(path)?;
        }

        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Ok(Self {
                path: path.to_path_buf(),
            }),
            _ => Err(CoreError::database_not_found(path)),
        }
    }

    /// Returns the path to the database directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the backing file path for the named collection.
    #[must_use]
    pub fn collection_path(&self, name: &str) -> PathBuf {
        self.path.join(format!("{name}.{EXTENSION}"))
    }

    /// Lists collection names, sorted lexicographically.
    ///
    /// Entries are matched on the collection extension, case-insensitively.
    /// Subdirectories and names that are not valid UTF-8 are skipped.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be read.
    pub fn collection_names(&self) -> CoreResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = collection_name(&entry.path()) {
                names.push(name.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Syncs the directory so that created, renamed or deleted entries are
    /// durable.
    pub fn sync(&self) -> CoreResult<()> {
        sync_directory(&self.path)
    }
}

/// Returns the collection name for a file path, if it has the collection
/// extension.
fn collection_name(path: &Path) -> Option<&str> {
    let ext = path.extension()?.to_str()?;
    if !ext.eq_ignore_ascii_case(EXTENSION) {
        return None;
    }
    path.file_stem()?.to_str()
}

/// Syncs a directory's entries to disk.
///
/// Windows NTFS journals metadata updates, and directories cannot be opened
/// for fsync there, so this is a no-op off Unix.
#[cfg(unix)]
pub(crate) fn sync_directory(path: &Path) -> CoreResult<()> {
    fs::File::open(path)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
pub(crate) fn sync_directory(_path: &Path) -> CoreResult<()> {
    Ok(())
}
