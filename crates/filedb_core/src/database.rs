//! Database handle.

use crate::collection::Collection;
use crate::config::Config;
use crate::dir::DatabaseDir;
use crate::error::CoreResult;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// An open database directory.
///
/// `Database` is the entry point for filedb. It hands out [`Collection`]s
/// by name and is cheap to clone; clones share the same collections.
///
/// # Opening a Database
///
/// ```rust,ignore
/// use filedb_core::Database;
/// use std::path::Path;
///
/// let db = Database::open(Path::new("my_database"))?;
/// let people = db.collection("people");
/// people.insert(br#"{"name":"Mat"}"#)?;
///
/// for name in db.collection_names()? {
///     println!("{name}");
/// }
///
/// db.close();
/// ```
///
/// # Collection Identity
///
/// Looking up the same name twice returns the same `Arc<Collection>`, so
/// every caller shares one file handle and one lock per collection.
#[derive(Debug, Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

#[derive(Debug)]
pub(crate) struct DatabaseInner {
    /// Database directory.
    dir: DatabaseDir,
    /// Configuration handed to every collection.
    config: Config,
    /// Collections looked up so far, by name.
    collections: Mutex<HashMap<String, Arc<Collection>>>,
}

impl Database {
    /// Opens the database in an existing directory.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseNotFound` if `path` does not exist, cannot be
    /// stat'ed, or is not a directory.
    pub fn open(path: &Path) -> CoreResult<Self> {
        Self::open_with_config(path, Config::default())
    }

    /// Opens a database with custom configuration.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use filedb_core::{Config, Database};
    /// use std::path::Path;
    ///
    /// let config = Config::default()
    ///     .create_if_missing(true)
    ///     .sync_on_insert(true);
    ///
    /// let db = Database::open_with_config(Path::new("my_database"), config)?;
    /// ```
    pub fn open_with_config(path: &Path, config: Config) -> CoreResult<Self> {
        let dir = DatabaseDir::open(path, config.create_if_missing)?;
        tracing::debug!(path = %path.display(), "opened database");

        Ok(Self {
            inner: Arc::new(DatabaseInner {
                dir,
                config,
                collections: Mutex::new(HashMap::new()),
            }),
        })
    }

    pub(crate) fn from_inner(inner: Arc<DatabaseInner>) -> Self {
        Self { inner }
    }

    /// Returns the database directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.dir.path()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Returns true if both handles refer to the same open database.
    #[must_use]
    pub fn ptr_eq(&self, other: &Database) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns the named collection, creating the handle on first use.
    ///
    /// No file I/O happens here; the backing file is created by the first
    /// operation on the collection.
    pub fn collection(&self, name: &str) -> Arc<Collection> {
        let mut collections = self.inner.collections.lock();
        if let Some(collection) = collections.get(name) {
            return Arc::clone(collection);
        }

        let collection = Arc::new(Collection::new(
            name.to_owned(),
            self.inner.dir.collection_path(name),
            self.inner.config.clone(),
            Arc::downgrade(&self.inner),
        ));
        collections.insert(name.to_owned(), Arc::clone(&collection));
        tracing::trace!(collection = name, "created collection handle");
        collection
    }

    /// Lists the collections stored in the directory, sorted by name.
    ///
    /// Only files on disk are listed; a collection that was looked up but
    /// never written has no file yet.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be read.
    pub fn collection_names(&self) -> CoreResult<Vec<String>> {
        self.inner.dir.collection_names()
    }

    /// Drops the named collection, deleting its backing file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file exists but cannot be removed.
    pub fn drop_collection(&self, name: &str) -> CoreResult<()> {
        self.collection(name).drop_collection()
    }

    /// Closes every open collection file.
    ///
    /// Collections stay cached and usable; their next operation reopens the
    /// file. Closing twice is harmless.
    ///
    /// The cache lock is released before any collection lock is taken; a
    /// scan may look up other collections while it holds its own lock.
    pub fn close(&self) {
        let collections: Vec<Arc<Collection>> =
            self.inner.collections.lock().values().cloned().collect();
        for collection in &collections {
            collection.close();
        }
        tracing::debug!(
            path = %self.path().display(),
            collections = collections.len(),
            "closed database"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use std::fs;
    use std::sync::{mpsc, Barrier};
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn open_missing_path_fails() {
        let temp = tempdir().unwrap();
        let result = Database::open(&temp.path().join("missing"));
        assert!(matches!(result, Err(CoreError::DatabaseNotFound { .. })));
    }

    #[test]
    fn open_file_path_fails() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, b"x").unwrap();

        let result = Database::open(&file);
        assert!(matches!(result, Err(CoreError::DatabaseNotFound { .. })));
    }

    #[test]
    fn open_with_create_if_missing() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("new_db");

        let db =
            Database::open_with_config(&path, Config::new().create_if_missing(true)).unwrap();
        assert_eq!(db.path(), path);
        assert!(path.is_dir());
    }

    #[test]
    fn collection_path_and_name() {
        let temp = tempdir().unwrap();
        let db = Database::open(temp.path()).unwrap();
        let c = db.collection("TestCDB");

        assert_eq!(c.name(), "TestCDB");
        assert_eq!(c.path(), temp.path().join("TestCDB.filedb"));
        assert!(!c.path().exists());
    }

    #[test]
    fn same_name_returns_same_instance() {
        let temp = tempdir().unwrap();
        let db = Database::open(temp.path()).unwrap();

        let a = db.collection("people");
        let b = db.collection("people");
        let other = db.collection("places");

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &other));
    }

    #[test]
    fn clones_share_collections() {
        let temp = tempdir().unwrap();
        let db = Database::open(temp.path()).unwrap();
        let clone = db.clone();

        assert!(db.ptr_eq(&clone));
        assert!(Arc::ptr_eq(
            &db.collection("people"),
            &clone.collection("people")
        ));
    }

    #[test]
    fn close_releases_handles_and_allows_reuse() {
        let temp = tempdir().unwrap();
        let db = Database::open(temp.path()).unwrap();
        let c = db.collection("people");
        c.insert(b"a").unwrap();
        assert!(c.is_open());

        db.close();
        assert!(!c.is_open());
        db.close();

        c.insert(b"b").unwrap();
        assert_eq!(c.count().unwrap(), 2);
    }

    #[test]
    fn close_while_scan_writes_to_another_collection() {
        let temp = tempdir().unwrap();
        let db = Database::open(temp.path()).unwrap();
        let src = db.collection("src");
        src.insert(b"a").unwrap();
        src.insert(b"b").unwrap();

        let barrier = Arc::new(Barrier::new(2));
        let (done_tx, done_rx) = mpsc::channel();

        let copier = {
            let db = db.clone();
            let barrier = Arc::clone(&barrier);
            let done_tx = done_tx.clone();
            thread::spawn(move || {
                let mut first = true;
                db.collection("src")
                    .for_each(|_, record| {
                        if first {
                            first = false;
                            barrier.wait();
                            thread::sleep(Duration::from_millis(50));
                        }
                        db.collection("dst").insert(record).unwrap();
                        false
                    })
                    .unwrap();
                done_tx.send(()).unwrap();
            })
        };
        let closer = {
            let db = db.clone();
            thread::spawn(move || {
                barrier.wait();
                db.close();
                done_tx.send(()).unwrap();
            })
        };

        for _ in 0..2 {
            done_rx
                .recv_timeout(Duration::from_secs(5))
                .expect("scan and close did not both finish");
        }
        copier.join().unwrap();
        closer.join().unwrap();

        assert_eq!(
            db.collection("dst").records().unwrap(),
            vec![b"a".to_vec(), b"b".to_vec()]
        );
    }

    #[test]
    fn drop_collection_by_name() {
        let temp = tempdir().unwrap();
        let db = Database::open(temp.path()).unwrap();
        db.collection("people").insert(b"a").unwrap();

        db.drop_collection("people").unwrap();
        db.drop_collection("never_created").unwrap();

        assert!(db.collection_names().unwrap().is_empty());
    }

    #[test]
    fn config_is_inherited() {
        let temp = tempdir().unwrap();
        let db = Database::open_with_config(temp.path(), Config::new().sync_on_insert(true))
            .unwrap();
        assert!(db.config().sync_on_insert);

        let c = db.collection("people");
        c.insert(b"durable").unwrap();
        assert_eq!(c.records().unwrap(), vec![b"durable".to_vec()]);
    }
}
