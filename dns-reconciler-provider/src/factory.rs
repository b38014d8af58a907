//! Provider factory functions and metadata.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::providers::HednsProvider;
use crate::traits::DnsServiceProvider;
use crate::types::{HednsCredentials, ProviderMetadata};

/// Creates an authenticated [`DnsServiceProvider`] from a credential map.
///
/// Recognized keys are `username`, `password`, `totp`, `totp-key` and
/// `session-file-path`. The map is validated before any network traffic, and
/// the returned provider has already logged in (or resumed its session).
///
/// # Examples
///
/// ```rust,no_run
/// use std::collections::HashMap;
/// use dns_reconciler_provider::create_provider;
///
/// # async fn example() -> dns_reconciler_provider::Result<()> {
/// let mut creds = HashMap::new();
/// creds.insert("username".to_string(), "alice".to_string());
/// creds.insert("password".to_string(), "hunter2".to_string());
/// let provider = create_provider(&creds).await?;
/// # Ok(())
/// # }
/// ```
pub async fn create_provider(
    credentials: &HashMap<String, String>,
) -> Result<Arc<dyn DnsServiceProvider>> {
    let credentials = HednsCredentials::from_map(credentials)?;
    Ok(Arc::new(HednsProvider::new(credentials).await?))
}

/// Returns metadata for every available provider.
pub fn get_all_provider_metadata() -> Vec<ProviderMetadata> {
    vec![HednsProvider::metadata()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;

    #[tokio::test]
    async fn missing_password_rejected_before_login() {
        let mut creds = HashMap::new();
        creds.insert("username".to_string(), "alice".to_string());
        let result = create_provider(&creds).await;
        assert!(matches!(
            result,
            Err(ProviderError::InvalidParameter { ref param, .. }) if param == "password"
        ));
    }

    #[test]
    fn metadata_lists_hedns() {
        let all = get_all_provider_metadata();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id.to_string(), "hedns");
    }
}
