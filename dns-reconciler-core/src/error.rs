//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Record model error type
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum ModelError {
    /// 记录内容无法按类型解码
    #[error("Invalid {record_type} record: {detail}")]
    InvalidRecord { record_type: String, detail: String },

    /// 记录类型不受支持
    #[error("Unsupported record type: {0}")]
    UnsupportedRecordType(String),

    /// TXT 引号字段格式错误
    #[error("Invalid quoted TXT fields: {0}")]
    InvalidQuotedFields(String),

    /// 域名无法转换为 ASCII (IDNA)
    #[error("Invalid domain name: {0}")]
    InvalidDomain(String),
}

impl ModelError {
    pub(crate) fn invalid(record_type: &str, detail: impl Into<String>) -> Self {
        Self::InvalidRecord {
            record_type: record_type.to_string(),
            detail: detail.into(),
        }
    }
}

/// Model layer result type
pub type ModelResult<T> = std::result::Result<T, ModelError>;
