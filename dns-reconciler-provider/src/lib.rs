//! # dns-reconciler-provider
//!
//! Provider adapter that reconciles a declared DNS zone against the
//! [Hurricane Electric Free DNS](https://dns.he.net/) web console.
//!
//! The console has no API: the provider logs in with a browser-style session,
//! scrapes zone listings from HTML and submits the same forms a user would.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for cross-compilation and Android targets.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dns_reconciler_core::{DomainConfig, RecordConfig};
//! use dns_reconciler_provider::{DnsServiceProvider, HednsCredentials, HednsProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Log in (resuming ./.hedns-session when it is still valid)
//!     let mut credentials = HednsCredentials::new("alice", "hunter2");
//!     credentials.session_file_path = Some(".".into());
//!     let provider = HednsProvider::new(credentials).await?;
//!
//!     // 2. Make sure the zone exists
//!     provider.ensure_domain_exists("example.com").await?;
//!
//!     // 3. Declare the desired records
//!     let mut www = RecordConfig::new("A", 300);
//!     www.set_label("www", "example.com");
//!     www.set_target("192.0.2.10");
//!     let mut dc = DomainConfig::new("example.com");
//!     dc.records.push(www);
//!
//!     // 4. Compute and apply corrections
//!     for correction in provider.get_domain_corrections(&dc).await? {
//!         println!("{}", correction.msg);
//!         provider.apply_correction(&correction).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All provider operations return [`Result<T, ProviderError>`](ProviderError).
//! Console error banners are mapped to structured variants:
//!
//! - [`ProviderError::InvalidCredentials`]: the console rejected the password
//! - [`ProviderError::SecondFactorInvalid`] / [`ProviderError::SecondFactorReused`]:
//!   the one-time code was refused
//! - [`ProviderError::SecondFactorRequired`]: the console asked for a one-time
//!   code that was not supplied
//! - [`ProviderError::Unknown`]: any other banner, with its text verbatim
//!
//! Requests are never retried.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory functions
pub use factory::{create_provider, get_all_provider_metadata};

// Re-export core trait only (internal traits are not exported)
pub use traits::DnsServiceProvider;

// Re-export types
pub use types::{
    Correction, CredentialValidationError, FieldType, HednsCredentials, Mutation,
    ProviderCredentialField, ProviderFeatures, ProviderMetadata, ProviderType, ProviderZone,
};

// Re-export the concrete provider
pub use providers::{DEFAULT_ENDPOINT, HednsProvider, HednsProviderBuilder};
