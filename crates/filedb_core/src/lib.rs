//! # filedb Core
//!
//! A minimal, append-oriented record store on a plain directory.
//!
//! A database is a directory; each `<name>.filedb` file inside it is a
//! collection of records, one per line. Records are opaque bytes (in
//! practice JSON documents) and are never interpreted beyond the newline
//! delimiter.
//!
//! This crate provides:
//! - [`Database`] - opens a directory and hands out collections by name
//! - [`Collection`] - append, full scan, and select-rewrite over one file
//! - JSON helpers for `serde` values
//!
//! ## Example
//!
//! ```rust,no_run
//! use filedb_core::{Database, Selection};
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("my_db")).unwrap();
//! let people = db.collection("people");
//!
//! people.insert(br#"{"name":"Mat"}"#).unwrap();
//! people.insert(br#"{"name":"Ryan"}"#).unwrap();
//!
//! // Delete by rewriting without the matching records
//! people
//!     .remove_each(|_, record| (record.windows(4).any(|w| w == b"Ryan"), false))
//!     .unwrap();
//!
//! // Update in place
//! people
//!     .select_each(|_, record| Selection::replace(record.to_ascii_uppercase()))
//!     .unwrap();
//!
//! db.close();
//! ```
//!
//! ## Concurrency
//!
//! Each collection serializes its own operations with a lock. Nothing
//! coordinates separate processes sharing a directory.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod config;
pub mod dir;
mod database;
mod error;

pub use collection::{encode_record, Collection, Selection};
pub use config::Config;
pub use database::Database;
pub use error::{CoreError, CoreResult};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
