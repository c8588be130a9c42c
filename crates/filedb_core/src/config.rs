//! Database configuration.

/// Configuration for opening a database.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to create the database directory if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether to sync file data after every insert (safer but slower).
    pub sync_on_insert: bool,

    /// Whether to sync the rewritten file and its directory before a
    /// select-rewrite returns.
    pub sync_on_rewrite: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: false,
            sync_on_insert: false,
            sync_on_rewrite: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the database directory if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to sync after every insert.
    #[must_use]
    pub const fn sync_on_insert(mut self, value: bool) -> Self {
        self.sync_on_insert = value;
        self
    }

    /// Sets whether to sync rewritten files.
    #[must_use]
    pub const fn sync_on_rewrite(mut self, value: bool) -> Self {
        self.sync_on_rewrite = value;
        self
    }
}
