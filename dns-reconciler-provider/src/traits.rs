use async_trait::async_trait;
use dns_reconciler_core::{DomainConfig, RecordConfig};

use crate::error::{ProviderError, Result};
use crate::types::{Correction, ProviderMetadata};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 原始错误消息（控制台错误横幅文本，控制台没有错误码）
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 域名（用于 `DomainNotFound` 等错误）
    pub domain: Option<String>,
}

/// Provider 错误映射 Trait（内部使用）
/// 各 Provider 实现此 trait 以将原始错误文本映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }
}

/// DNS 服务提供商 Trait
///
/// 一次调用只处理一个域名；所有网络请求按顺序逐个发出。
#[async_trait]
pub trait DnsServiceProvider: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// 获取 Provider 元数据（类型级别）
    ///
    /// 返回该 Provider 的元数据，包括名称、凭证字段和能力描述。
    /// 此方法不需要实例，可以在创建 Provider 之前调用。
    fn metadata() -> ProviderMetadata
    where
        Self: Sized;

    /// 验证当前会话是否仍处于登录状态
    async fn validate_credentials(&self) -> Result<bool>;

    /// 获取账户下所有域名（按名称排序）
    async fn list_zones(&self) -> Result<Vec<String>>;

    /// 确保域名存在，不存在时创建
    async fn ensure_domain_exists(&self, domain: &str) -> Result<()>;

    /// 获取域名的权威 NS
    async fn get_nameservers(&self, domain: &str) -> Result<Vec<String>>;

    /// 获取域名下的记录（不含 SOA）
    async fn get_zone_records(&self, domain: &str) -> Result<Vec<RecordConfig>>;

    /// 将期望状态与现有记录比较，生成待执行的修正列表
    ///
    /// 顺序：删除、创建、修改。
    async fn get_domain_corrections(&self, dc: &DomainConfig) -> Result<Vec<Correction>>;

    /// 执行单个修正
    async fn apply_correction(&self, correction: &Correction) -> Result<()>;
}
