use serde::{Deserialize, Serialize};

/// Unified error type for all provider operations.
///
/// Each variant includes a `provider` field identifying which provider produced the error,
/// plus variant-specific context. All variants are serializable for structured error reporting.
///
/// Every variant is terminal for the call that produced it: nothing is retried
/// internally, since console mutations are not idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// A configuration value or request parameter is invalid.
    InvalidParameter {
        /// Provider that produced the error.
        provider: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The console rejected the username/password pair.
    InvalidCredentials {
        /// Provider that produced the error.
        provider: String,
        /// Original message from the console, if available.
        raw_message: Option<String>,
    },

    /// The console rejected the one-time code.
    SecondFactorInvalid {
        /// Provider that produced the error.
        provider: String,
    },

    /// The one-time code was already used in the current time window.
    SecondFactorReused {
        /// Provider that produced the error.
        provider: String,
    },

    /// The console asked for a one-time code that was not supplied.
    SecondFactorRequired {
        /// Provider that produced the error.
        provider: String,
    },

    /// Authentication ended in a state that is neither logged in nor a known failure.
    AuthenticationFailed {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// Failed to parse the console response (missing page structure, attribute or text).
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// The specified domain/zone is not owned by the account.
    DomainNotFound {
        /// Provider that produced the error.
        provider: String,
        /// Domain name that was not found.
        domain: String,
    },

    /// Reading or writing the session file failed.
    SessionError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// An error banner reported by the console that has no specific mapping.
    Unknown {
        /// Provider that produced the error.
        provider: String,
        /// Banner text, verbatim.
        raw_message: String,
    },
}

impl ProviderError {
    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter { .. }
                | Self::InvalidCredentials { .. }
                | Self::SecondFactorInvalid { .. }
                | Self::SecondFactorReused { .. }
                | Self::SecondFactorRequired { .. }
                | Self::DomainNotFound { .. }
        )
    }

    /// 认证阶段产生的错误（凭证、一次性验证码、未知终态）
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::SecondFactorInvalid { .. }
                | Self::SecondFactorReused { .. }
                | Self::SecondFactorRequired { .. }
                | Self::AuthenticationFailed { .. }
        )
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::InvalidParameter {
                provider,
                param,
                detail,
            } => {
                write!(f, "[{provider}] Invalid parameter '{param}': {detail}")
            }
            Self::InvalidCredentials {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Invalid credentials: {msg}")
                } else {
                    write!(f, "[{provider}] Invalid credentials")
                }
            }
            Self::SecondFactorInvalid { provider } => {
                write!(f, "[{provider}] Invalid second factor code")
            }
            Self::SecondFactorReused { provider } => {
                write!(
                    f,
                    "[{provider}] Second factor code already used, wait for the next one"
                )
            }
            Self::SecondFactorRequired { provider } => {
                write!(f, "[{provider}] Second factor code required")
            }
            Self::AuthenticationFailed { provider, detail } => {
                write!(f, "[{provider}] Unknown authentication failure: {detail}")
            }
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::DomainNotFound { provider, domain } => {
                write!(f, "[{provider}] Domain '{domain}' not found")
            }
            Self::SessionError { provider, detail } => {
                write!(f, "[{provider}] Session file error: {detail}")
            }
            Self::Unknown {
                provider,
                raw_message,
            } => {
                write!(f, "[{provider}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
