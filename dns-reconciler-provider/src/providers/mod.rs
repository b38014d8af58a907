//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

mod hedns;

pub use hedns::{DEFAULT_ENDPOINT, HednsProvider, HednsProviderBuilder};
