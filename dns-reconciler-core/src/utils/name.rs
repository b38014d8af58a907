//! 域名名称处理

/// 去掉域名末尾的点
pub fn normalize_domain_name(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

/// 确保主机名以根标签 `.` 结尾
///
/// 空字符串和 `.` 保持不变。
pub fn ensure_fqdn(name: &str) -> String {
    if name.is_empty() || name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

/// 将完整域名转换为相对名称（大小写不敏感）
/// 如: "www.example.com" + "example.com" -> "www"
/// 如: "example.com." + "example.com" -> "@"
pub fn full_name_to_relative(full_name: &str, zone_name: &str) -> String {
    let full = normalize_domain_name(full_name).to_lowercase();
    let zone = normalize_domain_name(zone_name).to_lowercase();

    if full == zone {
        "@".to_string()
    } else if let Some(subdomain) = full.strip_suffix(&format!(".{zone}")) {
        subdomain.to_string()
    } else {
        full
    }
}

/// 将相对名称转换为完整域名
/// 如: "www" + "example.com" -> "www.example.com"
/// 如: "@" + "example.com" -> "example.com"
pub fn relative_to_full_name(relative_name: &str, zone_name: &str) -> String {
    let zone = normalize_domain_name(zone_name);

    if relative_name == "@" || relative_name.is_empty() {
        zone
    } else {
        format!("{relative_name}.{zone}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_apex() {
        assert_eq!(full_name_to_relative("example.com", "example.com"), "@");
        assert_eq!(full_name_to_relative("Example.COM.", "example.com"), "@");
    }

    #[test]
    fn relative_subdomain() {
        assert_eq!(
            full_name_to_relative("www.sub.example.com", "example.com"),
            "www.sub"
        );
    }

    #[test]
    fn relative_foreign_name_kept() {
        assert_eq!(full_name_to_relative("other.org", "example.com"), "other.org");
    }

    #[test]
    fn full_from_relative() {
        assert_eq!(relative_to_full_name("@", "example.com."), "example.com");
        assert_eq!(relative_to_full_name("www", "example.com"), "www.example.com");
    }

    #[test]
    fn fqdn_gets_single_dot() {
        assert_eq!(ensure_fqdn("mail.example.com"), "mail.example.com.");
        assert_eq!(ensure_fqdn("mail.example.com."), "mail.example.com.");
        assert_eq!(ensure_fqdn(""), "");
    }
}
