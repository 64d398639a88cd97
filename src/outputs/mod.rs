//! Presentation of search results.
//!
//! - [`list`]: row mapping and terminal rendering
//! - [`json`]: JSON snapshots written to disk

pub mod json;
pub mod list;
