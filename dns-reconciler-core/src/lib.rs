//! DNS Reconciler Core Library
//!
//! The record model shared by providers and the diff engine that classifies
//! desired-vs-existing records:
//! - `RecordConfig` / `DomainConfig` with per-type target encoding and decoding
//! - `NativeRef`, the typed correlation key providers attach to scraped records
//! - `Differ` / `IncrementalDiff`, yielding creations, deletions and modifications
//!
//! Providers only see the three result sets of a diff, never its internals.

pub mod diff;
pub mod error;
pub mod types;
pub mod utils;

// Re-export common types
pub use diff::{Change, ChangeKind, Changeset, Differ, IncrementalDiff};
pub use error::{ModelError, ModelResult};
pub use types::{
    DEFAULT_TTL, DomainConfig, NativeRef, RecordConfig, SUPPORTED_RECORD_TYPES, fold_spf_records,
    normalize_records, split_long_txt_records,
};
