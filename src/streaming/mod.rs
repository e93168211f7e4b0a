//! Stream engine shared by every stage of a run.
//!
//! This module provides:
//! - Line reading with transparent gzip decoding and uncompressed fallback
//! - Staged line writing with gzip encoding and rename-on-finish
//! - Zero-allocation column extraction for identifier matching

pub mod buffers;
pub mod output;
pub mod parsing;
pub mod reader;

pub use output::{publish_pair, LineWriter, SealedOutput};
pub use parsing::{first_token, is_metadata_line, tab_field, tab_field_range};
pub use reader::LineReader;
