//! 基于时间的一次性验证码（RFC 6238，HMAC-SHA1，30 秒步长，6 位）

use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// 时间步长（秒）
pub(crate) const TOTP_STEP_SECS: u64 = 30;
/// 验证码位数
const TOTP_DIGITS: u32 = 6;

/// 解码 base32 密钥（忽略大小写、空白、`-` 和末尾填充）
pub(crate) fn decode_secret(secret: &str) -> Result<Vec<u8>, String> {
    let normalized: String = secret
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_uppercase();
    let normalized = normalized.trim_end_matches('=');
    if normalized.is_empty() {
        return Err("empty secret".to_string());
    }
    data_encoding::BASE32_NOPAD
        .decode(normalized.as_bytes())
        .map_err(|e| format!("invalid base32 secret: {e}"))
}

/// 生成指定 Unix 时间的验证码
pub(crate) fn generate_code(key: &[u8], unix_secs: u64) -> Result<String, String> {
    let counter = unix_secs / TOTP_STEP_SECS;
    let mut mac = HmacSha1::new_from_slice(key).map_err(|e| e.to_string())?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    // 动态截断
    let offset = usize::from(digest[digest.len() - 1] & 0x0f);
    let binary = u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);
    let code = binary % 10_u32.pow(TOTP_DIGITS);
    Ok(format!("{code:0width$}", width = TOTP_DIGITS as usize))
}

/// 使用当前时间生成验证码
pub(crate) fn current_code(secret: &str) -> Result<String, String> {
    let key = decode_secret(secret)?;
    let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default();
    generate_code(&key, now)
}
