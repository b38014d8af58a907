//! HE DNS HTTP request method

use serde::Serialize;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper};

use super::html::PageError;
use super::{HednsProvider, PROVIDER_NAME};

impl HednsProvider {
    /// GET 控制台页面（查询参数区分菜单）
    pub(crate) async fn get_page(&self, query: &[(&str, &str)], action: &str) -> Result<String> {
        let request = self.client.get(self.endpoint.clone()).query(query);
        let (status, body) =
            HttpUtils::execute_request(request, PROVIDER_NAME, "GET", action).await?;
        Self::ensure_success(status, action)?;
        Ok(body)
    }

    /// POST 表单到控制台
    pub(crate) async fn post_form<T>(&self, form: &T, action: &str) -> Result<String>
    where
        T: Serialize + ?Sized + Sync,
    {
        let request = self.client.post(self.endpoint.clone()).form(form);
        let (status, body) =
            HttpUtils::execute_request(request, PROVIDER_NAME, "POST", action).await?;
        Self::ensure_success(status, action)?;
        Ok(body)
    }

    fn ensure_success(status: u16, action: &str) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }
        log::error!("[{PROVIDER_NAME}] {action} failed with HTTP {status}");
        Err(ProviderError::NetworkError {
            provider: PROVIDER_NAME.to_string(),
            detail: format!("HTTP {status} for {action}"),
        })
    }

    /// 将页面解析错误转换为统一错误类型
    pub(crate) fn page_error(&self, e: PageError, context: ErrorContext) -> ProviderError {
        match e {
            PageError::Banner(raw) => self.map_error(raw, context),
            PageError::Structure(detail) => self.parse_error(detail),
        }
    }
}
