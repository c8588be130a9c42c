//! Collection storage engine.

use crate::config::Config;
use crate::database::{Database, DatabaseInner};
use crate::dir::{self, REWRITE_PREFIX, REWRITE_SUFFIX};
use crate::error::CoreResult;
use parking_lot::Mutex;
use std::borrow::Cow;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Weak;

/// The outcome of a select-rewrite transform for one record.
///
/// Built with [`Selection::keep`], [`Selection::replace`] or
/// [`Selection::skip`], optionally followed by [`Selection::and_stop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<'a> {
    /// Whether a record is written to the new file.
    pub include: bool,
    /// The bytes written when `include` is set.
    pub data: Cow<'a, [u8]>,
    /// Whether to stop transforming after this record.
    pub stop: bool,
}

impl<'a> Selection<'a> {
    /// Keeps the record unchanged.
    #[must_use]
    pub fn keep(record: &'a [u8]) -> Self {
        Self {
            include: true,
            data: Cow::Borrowed(record),
            stop: false,
        }
    }

    /// Keeps the record, replacing its content.
    #[must_use]
    pub fn replace(data: impl Into<Vec<u8>>) -> Self {
        Self {
            include: true,
            data: Cow::Owned(data.into()),
            stop: false,
        }
    }

    /// Omits the record from the new file.
    #[must_use]
    pub fn skip() -> Self {
        Self {
            include: false,
            data: Cow::Borrowed(&[]),
            stop: false,
        }
    }

    /// Marks this as the last record to transform.
    #[must_use]
    pub fn and_stop(mut self) -> Self {
        self.stop = true;
        self
    }
}

/// A named collection of newline-delimited records backed by one file.
///
/// Every operation holds the collection's lock for its full duration, so
/// at most one insert, scan, rewrite or drop runs at a time per collection
/// within a process. Nothing coordinates separate processes.
///
/// The backing file is opened lazily by the first operation that needs it
/// and created if absent. The handle stays open until the collection is
/// dropped, rewritten, or its database is closed.
///
/// # Example
///
/// ```rust,ignore
/// let people = db.collection("people");
/// people.insert(br#"{"name":"Mat"}"#)?;
/// people.for_each(|i, record| {
///     println!("{i}: {}", String::from_utf8_lossy(record));
///     false
/// })?;
/// ```
#[derive(Debug)]
pub struct Collection {
    /// Logical collection name.
    name: String,
    /// Backing file path.
    path: PathBuf,
    /// Configuration inherited from the database.
    config: Config,
    /// Owning database.
    db: Weak<DatabaseInner>,
    /// Lazily opened file handle; the mutex is the collection lock.
    file: Mutex<Option<File>>,
}

impl Collection {
    pub(crate) fn new(
        name: String,
        path: PathBuf,
        config: Config,
        db: Weak<DatabaseInner>,
    ) -> Self {
        Self {
            name,
            path,
            config,
            db,
            file: Mutex::new(None),
        }
    }

    /// Returns the collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the database that created this collection.
    ///
    /// Returns `None` once every handle to that database has been dropped.
    #[must_use]
    pub fn database(&self) -> Option<Database> {
        self.db.upgrade().map(Database::from_inner)
    }

    /// Returns true if the backing file is currently held open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.file.lock().is_some()
    }

    /// Appends one record followed by a newline.
    ///
    /// The record is not inspected. A record containing a newline byte will
    /// read back as several records.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened or written.
    pub fn insert(&self, record: &[u8]) -> CoreResult<()> {
        let mut slot = self.file.lock();
        let file = open_handle(&mut slot, &self.path)?;

        // Another process may have truncated or replaced the file.
        file.seek(SeekFrom::End(0))?;

        let mut line = Vec::with_capacity(record.len() + 1);
        line.extend_from_slice(record);
        line.push(b'\n');
        file.write_all(&line)?;

        if self.config.sync_on_insert {
            file.sync_data()?;
        }
        Ok(())
    }

    /// Visits every record in file order.
    ///
    /// `visit` receives the record's zero-based position in this scan and
    /// returns true to stop early. A collection without a backing file is
    /// created empty and yields nothing.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened or read.
    pub fn for_each<F>(&self, mut visit: F) -> CoreResult<()>
    where
        F: FnMut(usize, &[u8]) -> bool,
    {
        self.try_for_each(|index, record| Ok(visit(index, record)))
    }

    /// Like [`Collection::for_each`], but `visit` may fail.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened or read. An error
    /// from `visit` ends the scan and is returned as is.
    pub fn try_for_each<F>(&self, visit: F) -> CoreResult<()>
    where
        F: FnMut(usize, &[u8]) -> CoreResult<bool>,
    {
        let mut slot = self.file.lock();
        let file = open_handle(&mut slot, &self.path)?;
        scan(file, visit)
    }

    /// Returns a snapshot of every record, in file order.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened or read.
    pub fn records(&self) -> CoreResult<Vec<Vec<u8>>> {
        let mut records = Vec::new();
        self.for_each(|_, record| {
            records.push(record.to_vec());
            false
        })?;
        Ok(records)
    }

    /// Returns the number of records.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened or read.
    pub fn count(&self) -> CoreResult<usize> {
        let mut count = 0;
        self.for_each(|_, _| {
            count += 1;
            false
        })?;
        Ok(count)
    }

    /// Rewrites the collection through `transform`.
    ///
    /// Every record is passed to `transform` with its position. Records it
    /// includes are written, possibly with new content, to a scratch file in
    /// the collection's directory, which then replaces the backing file with
    /// a single rename. Once `transform` asks to stop, the scan ends and the
    /// records after that point are not written, so they are gone from the
    /// rewritten collection.
    ///
    /// On error the backing file is left as it was and the scratch file is
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the scratch file cannot be created or written,
    /// the scan fails, or the rename fails.
    pub fn select_each<F>(&self, mut transform: F) -> CoreResult<()>
    where
        F: FnMut(usize, &[u8]) -> Selection<'_>,
    {
        let mut slot = self.file.lock();
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut scratch = tempfile::Builder::new()
            .prefix(REWRITE_PREFIX)
            .suffix(REWRITE_SUFFIX)
            .tempfile_in(parent)?;

        let file = open_handle(&mut slot, &self.path)?;
        let permissions = file.metadata()?.permissions();
        tracing::debug!(collection = %self.name, "rewriting collection");

        let mut kept = 0usize;
        let mut dropped = 0usize;
        {
            let mut writer = BufWriter::new(scratch.as_file_mut());
            scan(file, |index, record| {
                let selection = transform(index, record);
                if selection.include {
                    write_line(&mut writer, &selection.data)?;
                    kept += 1;
                } else {
                    dropped += 1;
                }
                Ok(selection.stop)
            })?;
            writer.flush()?;
        }

        scratch.as_file().set_permissions(permissions)?;
        if self.config.sync_on_rewrite {
            scratch.as_file().sync_all()?;
        }

        // The handle points at the file being replaced.
        *slot = None;
        scratch.persist(&self.path)?;

        if self.config.sync_on_rewrite {
            dir::sync_directory(parent)?;
        }

        tracing::debug!(
            collection = %self.name,
            kept,
            dropped,
            "rewrote collection"
        );
        Ok(())
    }

    /// Removes every record for which `decide` returns `(true, _)`.
    ///
    /// `decide` returns `(remove, stop)`. As with [`Collection::select_each`],
    /// records after a stop are not written.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Collection::select_each`].
    pub fn remove_each<F>(&self, mut decide: F) -> CoreResult<()>
    where
        F: FnMut(usize, &[u8]) -> (bool, bool),
    {
        self.select_each(|index, record| {
            let (remove, stop) = decide(index, record);
            let selection = if remove {
                Selection::skip()
            } else {
                Selection::keep(record)
            };
            if stop {
                selection.and_stop()
            } else {
                selection
            }
        })
    }

    /// Replaces the content of every record for which `update` returns
    /// `Some`. Other records are kept unchanged.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Collection::select_each`].
    pub fn update_each<F>(&self, mut update: F) -> CoreResult<()>
    where
        F: FnMut(usize, &[u8]) -> Option<Vec<u8>>,
    {
        self.select_each(|index, record| match update(index, record) {
            Some(data) => Selection::replace(data),
            None => Selection::keep(record),
        })
    }

    /// Closes the handle and deletes the backing file.
    ///
    /// Dropping a collection without a backing file succeeds. The next
    /// operation recreates an empty file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file exists but cannot be removed.
    pub fn drop_collection(&self) -> CoreResult<()> {
        let mut slot = self.file.lock();
        *slot = None;
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(collection = %self.name, "dropped collection");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Closes the file handle if open. The next operation reopens it.
    pub(crate) fn close(&self) {
        if self.file.lock().take().is_some() {
            tracing::trace!(collection = %self.name, "closed collection file");
        }
    }
}

/// Returns the open handle, opening or creating the file first if needed.
fn open_handle<'a>(slot: &'a mut Option<File>, path: &Path) -> io::Result<&'a mut File> {
    let file = match slot.take() {
        Some(file) => file,
        None => OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path)?,
    };
    Ok(slot.insert(file))
}

/// Scans `file` from the start, one newline-terminated record at a time.
///
/// The final record may lack its newline. A trailing newline does not
/// produce an empty record.
fn scan<F>(file: &mut File, mut visit: F) -> CoreResult<()>
where
    F: FnMut(usize, &[u8]) -> CoreResult<bool>,
{
    file.seek(SeekFrom::Start(0))?;
    let mut reader = BufReader::new(file);
    let mut line = Vec::new();
    let mut index = 0;
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(());
        }
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        if visit(index, &line)? {
            return Ok(());
        }
        index += 1;
    }
}

fn write_line<W: Write>(writer: &mut W, record: &[u8]) -> io::Result<()> {
    writer.write_all(record)?;
    writer.write_all(b"\n")
}
