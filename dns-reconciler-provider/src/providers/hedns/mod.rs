//! Hurricane Electric Free DNS Provider
//!
//! The console at <https://dns.he.net/> has no API. Every operation is a
//! form POST or query GET against the same path, and results are scraped
//! from the returned HTML.

mod auth;
mod corrections;
mod error;
mod html;
mod http;
mod provider;
mod scrape;
mod session;
mod totp;

use std::sync::Arc;

use reqwest::Client;
use reqwest::cookie::Jar;
use url::Url;

use crate::error::{ProviderError, Result};
use crate::providers::common::create_http_client;
use crate::types::HednsCredentials;

use session::SessionStore;

pub(crate) const PROVIDER_NAME: &str = "hedns";
/// 控制台地址
pub const DEFAULT_ENDPOINT: &str = "https://dns.he.net/";
/// 默认权威 NS
pub(crate) const DEFAULT_NAMESERVERS: &[&str] = &[
    "ns1.he.net",
    "ns2.he.net",
    "ns3.he.net",
    "ns4.he.net",
    "ns5.he.net",
];

/// Hurricane Electric Free DNS Provider
///
/// Construction authenticates against the console (resuming a persisted
/// session when possible). The instance owns one cookie jar for its lifetime
/// and issues requests strictly one at a time.
pub struct HednsProvider {
    pub(crate) client: Client,
    pub(crate) jar: Arc<Jar>,
    pub(crate) endpoint: Url,
    pub(crate) credentials: HednsCredentials,
    pub(crate) session: Option<SessionStore>,
}

impl std::fmt::Debug for HednsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HednsProvider")
            .field("endpoint", &self.endpoint.as_str())
            .field("username", &self.credentials.username)
            .field("session", &self.session.as_ref().map(SessionStore::path))
            .finish_non_exhaustive()
    }
}

/// HE DNS Provider Builder
pub struct HednsProviderBuilder {
    credentials: HednsCredentials,
    endpoint: String,
}

impl HednsProviderBuilder {
    fn new(credentials: HednsCredentials) -> Self {
        Self {
            credentials,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// 覆盖控制台地址（测试或代理）
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// 校验配置、建立 HTTP 客户端并完成认证
    pub async fn build(self) -> Result<HednsProvider> {
        self.credentials.validate()?;

        let endpoint = Url::parse(&self.endpoint).map_err(|e| ProviderError::InvalidParameter {
            provider: PROVIDER_NAME.to_string(),
            param: "endpoint".to_string(),
            detail: format!("'{}': {e}", self.endpoint),
        })?;

        let jar = Arc::new(Jar::default());
        let client = create_http_client(Arc::clone(&jar), PROVIDER_NAME)?;
        let session = self
            .credentials
            .session_file_path
            .as_deref()
            .map(|dir| SessionStore::new(dir, &self.credentials));

        let provider = HednsProvider {
            client,
            jar,
            endpoint,
            credentials: self.credentials,
            session,
        };
        provider.authenticate().await?;
        Ok(provider)
    }
}

impl HednsProvider {
    /// 使用默认控制台地址创建并认证
    pub async fn new(credentials: HednsCredentials) -> Result<Self> {
        Self::builder(credentials).build().await
    }

    pub fn builder(credentials: HednsCredentials) -> HednsProviderBuilder {
        HednsProviderBuilder::new(credentials)
    }
}
