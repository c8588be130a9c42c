//! CLI command implementations.

pub mod drop;
pub mod dump;
pub mod insert;
pub mod list;
