//! Authentication state machine
//!
//! Resume a persisted session, fall back to password login, then escalate to
//! the one-time code when the console asks for it. Every failure is terminal.

use reqwest::cookie::CookieStore;

use crate::error::{ProviderError, Result};
use crate::traits::ErrorContext;
use crate::utils::log_sanitizer::mask_cookie;

use super::html::{AuthPage, parse_auth_page};
use super::{HednsProvider, PROVIDER_NAME, totp};

/// 最近一次提交的认证步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthStage {
    /// 已用现有 Cookie 请求首页
    Resumed,
    /// 已提交用户名和密码
    PasswordSubmitted,
    /// 已提交一次性验证码
    SecondFactorSubmitted,
}

/// 下一步动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthStep {
    Authenticated,
    NeedsPassword,
    NeedsSecondFactor,
    Failed,
}

/// 根据当前阶段和页面分类决定下一步
pub(crate) fn next_step(stage: AuthStage, page: AuthPage) -> AuthStep {
    if page.authenticated {
        return AuthStep::Authenticated;
    }
    match stage {
        AuthStage::SecondFactorSubmitted => AuthStep::Failed,
        _ if page.requires_tfa => AuthStep::NeedsSecondFactor,
        AuthStage::Resumed => AuthStep::NeedsPassword,
        AuthStage::PasswordSubmitted => AuthStep::Failed,
    }
}

const TFA_REQUIRED_PAGE: AuthPage = AuthPage {
    authenticated: false,
    requires_tfa: true,
};

impl HednsProvider {
    /// Establishes an authenticated session.
    ///
    /// Resumes the stored cookies when they are still valid, so calling this
    /// again on a live session submits no credentials. On success the session
    /// file (if configured) is rewritten.
    pub async fn authenticate(&self) -> Result<()> {
        self.load_session().await?;

        let mut stage = AuthStage::Resumed;
        let mut page = self.resume_session().await?;
        loop {
            match next_step(stage, page) {
                AuthStep::Authenticated => break,
                AuthStep::NeedsPassword => {
                    page = self.login_with_password().await?;
                    stage = AuthStage::PasswordSubmitted;
                }
                AuthStep::NeedsSecondFactor => {
                    page = self.login_with_second_factor().await?;
                    stage = AuthStage::SecondFactorSubmitted;
                }
                AuthStep::Failed => {
                    log::error!("[{PROVIDER_NAME}] Authentication ended after {stage:?} without a session");
                    return Err(ProviderError::AuthenticationFailed {
                        provider: PROVIDER_NAME.to_string(),
                        detail: format!("not logged in after {stage:?}"),
                    });
                }
            }
        }

        log::info!("[{PROVIDER_NAME}] Authenticated as {}", self.credentials.username);
        self.save_session().await
    }

    /// 使用当前 Cookie 请求首页
    async fn resume_session(&self) -> Result<AuthPage> {
        let body = self.get_page(&[], "resume_session").await?;
        let page = self.classify_auth_page(&body)?;
        if page.authenticated {
            log::info!("[{PROVIDER_NAME}] Resumed existing session");
        }
        Ok(page)
    }

    async fn login_with_password(&self) -> Result<AuthPage> {
        log::debug!("[{PROVIDER_NAME}] Logging in with username and password");
        let form = [
            ("email", self.credentials.username.as_str()),
            ("pass", self.credentials.password.as_str()),
            ("submit", "Login!"),
        ];
        let body = self.post_form(&form, "login").await?;
        self.classify_auth_page(&body)
    }

    /// 提交一次性验证码；既没有验证码也没有密钥时不发请求直接失败
    async fn login_with_second_factor(&self) -> Result<AuthPage> {
        let code = match (&self.credentials.totp, &self.credentials.totp_key) {
            (Some(code), _) => code.clone(),
            (None, Some(secret)) => {
                totp::current_code(secret).map_err(|detail| ProviderError::InvalidParameter {
                    provider: PROVIDER_NAME.to_string(),
                    param: "totp-key".to_string(),
                    detail,
                })?
            }
            (None, None) => {
                return Err(ProviderError::SecondFactorRequired {
                    provider: PROVIDER_NAME.to_string(),
                });
            }
        };

        log::debug!("[{PROVIDER_NAME}] Submitting second factor code");
        let form = [("tfacode", code.as_str()), ("submit", "Submit")];
        let body = self.post_form(&form, "second_factor").await?;
        parse_auth_page(&body).map_err(|e| self.page_error(e, ErrorContext::default()))
    }

    /// 首页/登录响应分类；"需要验证码" 横幅视为要求二次验证而非错误
    fn classify_auth_page(&self, body: &str) -> Result<AuthPage> {
        match parse_auth_page(body).map_err(|e| self.page_error(e, ErrorContext::default())) {
            Err(ProviderError::SecondFactorRequired { .. }) => Ok(TFA_REQUIRED_PAGE),
            other => other,
        }
    }

    // ============ Session ============

    async fn load_session(&self) -> Result<()> {
        let Some(store) = &self.session else {
            return Ok(());
        };
        if let Some(cookies) = store.load().await? {
            for cookie in &cookies {
                self.jar.add_cookie_str(cookie, &self.endpoint);
            }
            log::debug!(
                "[{PROVIDER_NAME}] Loaded {} cookies from {}",
                cookies.len(),
                store.path().display()
            );
        }
        Ok(())
    }

    async fn save_session(&self) -> Result<()> {
        let Some(store) = &self.session else {
            return Ok(());
        };
        let cookies = self.current_cookies();
        log::debug!(
            "[{PROVIDER_NAME}] Saving session cookies: {}",
            cookies
                .iter()
                .map(|c| mask_cookie(c.as_str()))
                .collect::<Vec<_>>()
                .join("; ")
        );
        store.save(&cookies).await
    }

    /// 当前 Cookie Jar 中属于控制台地址的 `name=value` 列表
    pub(crate) fn current_cookies(&self) -> Vec<String> {
        self.jar
            .cookies(&self.endpoint)
            .and_then(|header| header.to_str().ok().map(str::to_string))
            .map(|header| {
                header
                    .split(';')
                    .map(str::trim)
                    .filter(|pair| !pair.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
