//! Core types for Stitchery.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod catalog;
pub mod format;
pub mod id;
pub mod username;

pub use catalog::{ProductSort, Tier, TierError};
pub use format::{FileFormat, FileFormatError, normalize_formats};
pub use id::*;
pub use username::{Username, UsernameError};
