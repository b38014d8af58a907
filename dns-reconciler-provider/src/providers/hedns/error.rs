//! Hurricane Electric console error mapping
//!
//! The console reports failures only as banner text inside `div#dns_err`.
//! Known messages are decoded into typed errors here so the rest of the
//! provider matches on variants instead of strings.

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{HednsProvider, PROVIDER_NAME};

pub(crate) const ERROR_INVALID_CREDENTIALS: &str = "Incorrect";
pub(crate) const ERROR_INVALID_TOTP_TOKEN: &str = "The token supplied is invalid.";
pub(crate) const ERROR_TOTP_TOKEN_REQUIRED: &str =
    "You must enter the token generated by your authenticator.";
// 控制台原文中两句之间是两个空格
pub(crate) const ERROR_TOTP_TOKEN_REUSED: &str =
    "This token has already been used.  You may not reuse tokens.";
pub(crate) const ERROR_IMPROPER_DELEGATION: &str =
    "This zone does not appear to be properly delegated to our nameservers.";

/// 仅作提示、不视为失败的横幅
pub(crate) const IGNORED_BANNERS: &[&str] = &[ERROR_IMPROPER_DELEGATION];

/// 横幅是否在忽略列表中
pub(crate) fn is_ignored_banner(message: &str) -> bool {
    IGNORED_BANNERS.iter().any(|ignored| message.contains(ignored))
}

/// 将横幅文本映射为统一错误类型（不依赖 Provider 实例）
pub(crate) fn map_banner(raw: RawApiError, context: &ErrorContext) -> ProviderError {
    let provider = PROVIDER_NAME.to_string();
    let message = raw.message.trim();

    if message == ERROR_INVALID_CREDENTIALS {
        return ProviderError::InvalidCredentials {
            provider,
            raw_message: Some(message.to_string()),
        };
    }
    if message.contains(ERROR_INVALID_TOTP_TOKEN) {
        return ProviderError::SecondFactorInvalid { provider };
    }
    if message.contains(ERROR_TOTP_TOKEN_REUSED) {
        return ProviderError::SecondFactorReused { provider };
    }
    if message.contains(ERROR_TOTP_TOKEN_REQUIRED) {
        return ProviderError::SecondFactorRequired { provider };
    }

    if let Some(domain) = &context.domain {
        log::warn!("[{PROVIDER_NAME}] Console error for '{domain}': {message}");
    }
    ProviderError::Unknown {
        provider,
        raw_message: raw.message,
    }
}

impl ProviderErrorMapper for HednsProvider {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        map_banner(raw, &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(message: &str) -> ProviderError {
        map_banner(RawApiError::new(message), &ErrorContext::default())
    }

    // ---- 认证错误 ----

    #[test]
    fn incorrect_is_invalid_credentials() {
        assert!(matches!(
            map("Incorrect"),
            ProviderError::InvalidCredentials { raw_message: Some(ref m), .. } if m == "Incorrect"
        ));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert!(matches!(
            map("\n   Incorrect \n"),
            ProviderError::InvalidCredentials { .. }
        ));
    }

    #[test]
    fn totp_errors() {
        assert!(matches!(
            map(ERROR_INVALID_TOTP_TOKEN),
            ProviderError::SecondFactorInvalid { .. }
        ));
        assert!(matches!(
            map(ERROR_TOTP_TOKEN_REUSED),
            ProviderError::SecondFactorReused { .. }
        ));
        assert!(matches!(
            map(ERROR_TOTP_TOKEN_REQUIRED),
            ProviderError::SecondFactorRequired { .. }
        ));
    }

    // ---- 未知错误 ----

    #[test]
    fn unknown_banner_is_verbatim() {
        let message = "Name is not valid for this record type.";
        assert!(matches!(
            map(message),
            ProviderError::Unknown { ref raw_message, .. } if raw_message == message
        ));
    }

    #[test]
    fn partial_credentials_message_is_not_credentials() {
        assert!(matches!(
            map("Incorrect TTL value"),
            ProviderError::Unknown { .. }
        ));
    }

    // ---- 忽略列表 ----

    #[test]
    fn delegation_warning_is_ignored() {
        assert!(is_ignored_banner(&format!("  {ERROR_IMPROPER_DELEGATION}  ")));
        assert!(!is_ignored_banner("Incorrect"));
    }
}
