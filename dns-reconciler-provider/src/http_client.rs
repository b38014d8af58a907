//! Generic HTTP client tools
//!
//! Reusable request execution for providers: sending, logging and reading the
//! response body. Providers build their own `RequestBuilder` (form fields,
//! query parameters) and interpret the body themselves.
//!
//! Requests are never retried here. Console mutations are not idempotent, so a
//! transport failure is surfaced to the caller as-is.

use reqwest::RequestBuilder;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns response text
    ///
    /// Unified processing: sending requests, logging, error handling
    ///
    /// # Arguments
    /// * `request_builder` - configured request constructor (URL, query, form body, etc.)
    /// * `provider_name` - Provider name (for logging)
    /// * `method_name` - request method name (such as "GET", "POST", used for logs)
    /// * `action` - console action or menu name (for logging, never the form body)
    ///
    /// # Returns
    /// * `Ok((status_code, response_text))` - returns status code and response text on success
    /// * `Err(ProviderError::Timeout)` - the request timed out
    /// * `Err(ProviderError::NetworkError)` - Network error or HTTP 5xx
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        action: &str,
    ) -> Result<(u16, String), ProviderError> {
        log::debug!("[{provider_name}] {method_name} {action}");

        // Send request
        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{provider_name}] Response Status: {status_code}");

        if response.status().is_server_error() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Server error (HTTP {status_code})");
            return Err(ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("HTTP {status_code}: {}", truncate_for_log(&body)),
            });
        }

        // Read response body
        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{provider_name}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // ---- execute_request ----

    #[tokio::test]
    async fn returns_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let req = reqwest::Client::new().get(server.uri());
        let result = HttpUtils::execute_request(req, "test", "GET", "index").await;
        assert!(
            matches!(&result, Ok((200, body)) if body == "<html></html>"),
            "unexpected result: {result:?}"
        );
    }

    #[tokio::test]
    async fn server_error_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(1)
            .mount(&server)
            .await;

        let req = reqwest::Client::new().post(server.uri());
        let result = HttpUtils::execute_request(req, "test", "POST", "edit_zone").await;
        assert!(
            matches!(&result, Err(ProviderError::NetworkError { detail, .. }) if detail.contains("503")),
            "unexpected result: {result:?}"
        );
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        // 端口 9 (discard) 在测试环境中通常无人监听
        let req = reqwest::Client::new().get("http://127.0.0.1:9/");
        let result = HttpUtils::execute_request(req, "test", "GET", "index").await;
        assert!(
            matches!(
                &result,
                Err(ProviderError::NetworkError { .. } | ProviderError::Timeout { .. })
            ),
            "unexpected result: {result:?}"
        );
    }
}
