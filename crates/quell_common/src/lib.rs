//! Shared foundational types used across the quell report pipeline.
//!
//! This crate provides the content hash used for finding identities, the
//! path helpers that every stage uses to compare files by basename, and the
//! whole-file rewrite used when persisting bundles and suppression files.

#![warn(missing_docs)]

pub mod fs;
pub mod hash;
pub mod path;

pub use fs::{rewrite_in_place, rewrite_or_create};
pub use hash::{ContentHash, ContentHashBuilder};
pub use path::basename;
