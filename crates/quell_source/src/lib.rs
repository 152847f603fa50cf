//! Source file tables and source line lookup for report rendering.
//!
//! This crate provides the [`FileTable`] shared by every location in a
//! diagnostic bundle, the [`FileIndex`] used to reference its entries, and
//! the [`SourceDb`] cache that serves individual source lines to the hasher,
//! the inline suppression detector, and the formatter.

#![warn(missing_docs)]

pub mod file_table;
pub mod source_db;
pub mod source_file;

pub use file_table::{FileIndex, FileTable};
pub use source_db::SourceDb;
pub use source_file::SourceFile;
