//! Record model types

mod domain;
mod record;

pub use domain::{DomainConfig, fold_spf_records, normalize_records, split_long_txt_records};
pub use record::{DEFAULT_TTL, NativeRef, RecordConfig, SUPPORTED_RECORD_TYPES};
