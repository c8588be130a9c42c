//! Collections of newline-delimited records.
//!
//! A [`Collection`] stores opaque byte records, one per line, in a single
//! file. The JSON helpers in this module layer `serde` values on top.

mod codec;
mod store;

pub use codec::encode_record;
pub use store::{Collection, Selection};
