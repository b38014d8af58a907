//! Session file persistence
//!
//! Format: the first line is the credential fingerprint (hex digest), each
//! following line is one `name=value` cookie pair. The file is only trusted
//! when its fingerprint matches the active credentials.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::{ProviderError, Result};
use crate::providers::common::sha256_hex;
use crate::types::HednsCredentials;

use super::PROVIDER_NAME;

/// 会话文件名（位于 `session-file-path` 目录下）
pub(crate) const SESSION_FILE_NAME: &str = ".hedns-session";

/// 会话文件存储
#[derive(Debug, Clone)]
pub(crate) struct SessionStore {
    path: PathBuf,
    fingerprint: String,
}

impl SessionStore {
    pub fn new(dir: &Path, credentials: &HednsCredentials) -> Self {
        Self {
            path: dir.join(SESSION_FILE_NAME),
            fingerprint: fingerprint(credentials),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取会话 Cookie
    ///
    /// 文件不存在或指纹不匹配时返回 `None`；其他读取错误返回 `SessionError`。
    pub async fn load(&self) -> Result<Option<Vec<String>>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("[{PROVIDER_NAME}] No session file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(session_error(&self.path, "read", &e)),
        };

        let cookies = parse_session(&content, &self.fingerprint);
        if cookies.is_none() {
            log::warn!(
                "[{PROVIDER_NAME}] Session file {} does not match the configured credentials, ignoring it",
                self.path.display()
            );
        }
        Ok(cookies)
    }

    /// 覆盖写入会话文件（临时文件 + 重命名，仅所有者可读写）
    pub async fn save(&self, cookies: &[String]) -> Result<()> {
        let content = render_session(&self.fingerprint, cookies);
        let temp_path = self.temp_path();

        {
            let mut options = tokio::fs::OpenOptions::new();
            options.write(true).create(true).truncate(true);
            #[cfg(unix)]
            options.mode(0o600);

            let mut file = options
                .open(&temp_path)
                .await
                .map_err(|e| session_error(&temp_path, "create", &e))?;
            file.write_all(content.as_bytes())
                .await
                .map_err(|e| session_error(&temp_path, "write", &e))?;
            file.flush()
                .await
                .map_err(|e| session_error(&temp_path, "flush", &e))?;
        }

        // 临时文件可能是旧文件，mode 只在创建时生效
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(|e| session_error(&temp_path, "chmod", &e))?;
        }

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| session_error(&self.path, "rename", &e))?;

        log::debug!(
            "[{PROVIDER_NAME}] Session saved to {} ({} cookies)",
            self.path.display(),
            cookies.len()
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }
}

/// 凭证指纹：用户名、密码和 TOTP 密钥（不含一次性验证码）的 SHA-256
pub(crate) fn fingerprint(credentials: &HednsCredentials) -> String {
    let mut material = String::new();
    material.push_str(&credentials.username);
    material.push_str(&credentials.password);
    material.push_str(credentials.totp_key.as_deref().unwrap_or_default());
    sha256_hex(material.as_bytes())
}

/// 解析会话文件内容；指纹不匹配返回 `None`
pub(crate) fn parse_session(content: &str, fingerprint: &str) -> Option<Vec<String>> {
    let mut lines = content.lines();
    if lines.next().map(str::trim) != Some(fingerprint) {
        return None;
    }
    Some(
        lines
            .map(str::trim)
            .filter(|line| matches!(line.split_once('='), Some((name, _)) if !name.is_empty()))
            .map(str::to_string)
            .collect(),
    )
}

pub(crate) fn render_session(fingerprint: &str, cookies: &[String]) -> String {
    let mut lines = Vec::with_capacity(cookies.len() + 1);
    lines.push(fingerprint);
    lines.extend(cookies.iter().map(String::as_str));
    lines.join("\n")
}

fn session_error(path: &Path, op: &str, e: &std::io::Error) -> ProviderError {
    ProviderError::SessionError {
        provider: PROVIDER_NAME.to_string(),
        detail: format!("failed to {op} {}: {e}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(totp_key: Option<&str>) -> HednsCredentials {
        HednsCredentials {
            totp_key: totp_key.map(str::to_string),
            ..HednsCredentials::new("alice", "hunter2")
        }
    }

    // ---- fingerprint ----

    #[test]
    fn fingerprint_is_stable() {
        assert_eq!(fingerprint(&credentials(None)), fingerprint(&credentials(None)));
        assert_eq!(fingerprint(&credentials(None)).len(), 64);
    }

    #[test]
    fn fingerprint_ignores_literal_code() {
        let mut with_code = credentials(None);
        with_code.totp = Some("123456".to_string());
        assert_eq!(fingerprint(&with_code), fingerprint(&credentials(None)));
    }

    #[test]
    fn fingerprint_changes_with_secret() {
        assert_ne!(
            fingerprint(&credentials(Some("GEZDGNBV"))),
            fingerprint(&credentials(None))
        );
    }

    // ---- parse / render ----

    #[test]
    fn parse_matching_session() {
        let content = render_session("abc", &["CGISESSID=xyz".to_string(), "a=b=c".to_string()]);
        assert_eq!(
            parse_session(&content, "abc"),
            Some(vec!["CGISESSID=xyz".to_string(), "a=b=c".to_string()])
        );
    }

    #[test]
    fn parse_mismatched_session() {
        let content = render_session("abc", &["CGISESSID=xyz".to_string()]);
        assert_eq!(parse_session(&content, "def"), None);
        assert_eq!(parse_session("", "def"), None);
    }

    #[test]
    fn parse_skips_garbage_lines() {
        let content = "abc\n\nnot-a-cookie\n=novalue\nk=v\n";
        assert_eq!(parse_session(content, "abc"), Some(vec!["k=v".to_string()]));
    }

    // ---- load / save ----

    #[tokio::test]
    async fn missing_file_is_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path(), &credentials(None));
        assert!(matches!(store.load().await, Ok(None)));
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path(), &credentials(None));
        store.save(&["CGISESSID=xyz".to_string()]).await.unwrap();

        assert!(store.path().ends_with(SESSION_FILE_NAME));
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, Some(vec!["CGISESSID=xyz".to_string()]));
    }

    #[tokio::test]
    async fn other_credentials_see_no_session() {
        let dir = tempfile::tempdir().unwrap();
        SessionStore::new(dir.path(), &credentials(None))
            .save(&["CGISESSID=xyz".to_string()])
            .await
            .unwrap();

        let other = SessionStore::new(dir.path(), &credentials(Some("GEZDGNBV")));
        assert!(matches!(other.load().await, Ok(None)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path(), &credentials(None));
        store.save(&[]).await.unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn unreadable_path_is_session_error() {
        let dir = tempfile::tempdir().unwrap();
        // 会话文件路径是目录时读取失败，但不是 NotFound
        std::fs::create_dir(dir.path().join(SESSION_FILE_NAME)).unwrap();
        let store = SessionStore::new(dir.path(), &credentials(None));
        assert!(matches!(
            store.load().await,
            Err(ProviderError::SessionError { .. })
        ));
    }
}
