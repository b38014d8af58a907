use std::net::{Ipv4Addr, Ipv6Addr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::utils::name::{ensure_fqdn, full_name_to_relative, relative_to_full_name};
use crate::utils::txt::{parse_quoted_fields, quote_fields};

/// Default TTL applied to records that do not specify one.
pub const DEFAULT_TTL: u32 = 300;

/// Record types the model can represent.
pub const SUPPORTED_RECORD_TYPES: &[&str] = &[
    "A", "AAAA", "ALIAS", "CAA", "CNAME", "MX", "NAPTR", "NS", "PTR", "SOA", "SPF", "SRV",
    "SSHFP", "TXT",
];

/// Record types whose target is a host name (normalised to a trailing root dot).
const HOSTNAME_TARGET_TYPES: &[&str] = &["ALIAS", "CNAME", "MX", "NS", "PTR", "SRV", "SOA"];

// ============ Correlation Key ============

/// Provider-native identifiers carried by a record so a later mutation can be
/// routed to the exact remote entity it was scraped from.
///
/// This is a correlation key, not an ownership relation: it travels unchanged
/// from the scrape to the correction that consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeRef {
    /// Provider-native zone identifier.
    pub zone_id: u64,
    /// Zone (domain) name.
    pub zone_name: String,
    /// Provider-native record identifier. `None` for records that do not exist yet.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub record_id: Option<u64>,
    /// Record name as the provider reports it (usually fully qualified).
    pub record_name: String,
}

// ============ Record ============

/// A single DNS record in canonical form.
///
/// The record type is kept as its upper-case token (`"MX"`, `"TXT"`, ...).
/// Type-specific target fields are only meaningful for their type; use
/// [`target_combined()`](Self::target_combined) for the zone-file rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordConfig {
    /// Upper-case record type token.
    pub record_type: String,
    /// Label relative to the zone (`"@"` for the apex).
    pub name: String,
    /// Fully qualified name without a trailing dot.
    pub name_fqdn: String,
    /// Time to live in seconds.
    pub ttl: u32,
    target: String,

    pub mx_preference: u16,
    pub srv_priority: u16,
    pub srv_weight: u16,
    pub srv_port: u16,
    pub caa_flag: u8,
    pub caa_tag: String,
    pub sshfp_algorithm: u8,
    pub sshfp_fingerprint_type: u8,
    pub naptr_order: u16,
    pub naptr_preference: u16,
    pub naptr_flags: String,
    pub naptr_service: String,
    pub naptr_regexp: String,
    /// TXT character-strings (TXT and SPF only).
    pub txt_strings: Vec<String>,

    /// Provider correlation key.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub original: Option<NativeRef>,
}

impl RecordConfig {
    /// Creates an empty record of the given type.
    pub fn new(record_type: &str, ttl: u32) -> Self {
        Self {
            record_type: record_type.to_uppercase(),
            ttl,
            ..Default::default()
        }
    }

    /// Whether the model can represent `record_type`.
    pub fn is_supported_type(record_type: &str) -> bool {
        SUPPORTED_RECORD_TYPES
            .iter()
            .any(|t| t.eq_ignore_ascii_case(record_type))
    }

    /// 目标是否为主机名（ALIAS/CNAME/MX/NS/PTR/SRV/SOA）
    pub fn has_hostname_target(&self) -> bool {
        HOSTNAME_TARGET_TYPES.contains(&self.record_type.as_str())
    }

    fn is_txt_like(&self) -> bool {
        matches!(self.record_type.as_str(), "TXT" | "SPF")
    }

    // ---- labels ----

    /// Sets the label relative to `origin` (`"@"` or empty for the apex).
    pub fn set_label(&mut self, label: &str, origin: &str) {
        let label = if label.is_empty() {
            "@".to_string()
        } else {
            label.to_lowercase()
        };
        self.name_fqdn = relative_to_full_name(&label, origin).to_lowercase();
        self.name = label;
    }

    /// Sets the label from a fully qualified name inside `origin`.
    pub fn set_label_from_fqdn(&mut self, fqdn: &str, origin: &str) {
        let label = full_name_to_relative(fqdn, origin);
        self.set_label(&label, origin);
    }

    /// Label relative to the zone.
    pub fn label(&self) -> &str {
        &self.name
    }

    /// (label, type) pair used to group records for comparison.
    pub fn key(&self) -> (String, String) {
        (self.name.to_lowercase(), self.record_type.clone())
    }

    // ---- targets ----

    /// Sets the primary target. Host-name targets get a trailing root dot.
    pub fn set_target(&mut self, target: &str) {
        self.target = if self.has_hostname_target() {
            ensure_fqdn(target)
        } else {
            target.to_string()
        };
        if self.is_txt_like() {
            self.txt_strings = vec![target.to_string()];
        }
    }

    /// The primary target field (host name, address, CAA value, ...).
    pub fn target_field(&self) -> &str {
        &self.target
    }

    pub fn set_target_mx(&mut self, preference: u16, target: &str) {
        self.mx_preference = preference;
        self.set_target(target);
    }

    pub fn set_target_srv(&mut self, priority: u16, weight: u16, port: u16, target: &str) {
        self.srv_priority = priority;
        self.srv_weight = weight;
        self.srv_port = port;
        self.set_target(target);
    }

    /// Sets an SRV target from a separate priority and a `"weight port target"` string.
    pub fn set_target_srv_priority_string(&mut self, priority: u16, rest: &str) -> ModelResult<()> {
        let parts: Vec<&str> = rest.split_whitespace().collect();
        let [weight, port, target] = parts.as_slice() else {
            return Err(ModelError::invalid(
                "SRV",
                format!("expected 'weight port target', got '{rest}'"),
            ));
        };
        let weight = parse_number::<u16>("SRV", "weight", weight)?;
        let port = parse_number::<u16>("SRV", "port", port)?;
        self.set_target_srv(priority, weight, port, target);
        Ok(())
    }

    /// Sets the TXT segments.
    pub fn set_target_txts(&mut self, segments: Vec<String>) {
        self.target = segments.concat();
        self.txt_strings = segments;
    }

    /// Sets the TXT segments from zone-file quoted fields (`"a" "b"`).
    pub fn set_target_txt_quoted_fields(&mut self, content: &str) -> ModelResult<()> {
        let segments = parse_quoted_fields(content)?;
        self.set_target_txts(segments);
        Ok(())
    }

    /// Renders the full target in zone-file order, e.g. `10 mail.example.com.` for MX.
    pub fn target_combined(&self) -> String {
        match self.record_type.as_str() {
            "MX" => format!("{} {}", self.mx_preference, self.target),
            "SRV" => format!(
                "{} {} {} {}",
                self.srv_priority, self.srv_weight, self.srv_port, self.target
            ),
            "CAA" => format!(
                "{} {} {}",
                self.caa_flag,
                self.caa_tag,
                quote_fields(&[self.target.as_str()])
            ),
            "SSHFP" => format!(
                "{} {} {}",
                self.sshfp_algorithm, self.sshfp_fingerprint_type, self.target
            ),
            "NAPTR" => format!(
                "{} {} {} {}",
                self.naptr_order,
                self.naptr_preference,
                quote_fields(&[
                    self.naptr_flags.as_str(),
                    self.naptr_service.as_str(),
                    self.naptr_regexp.as_str(),
                ]),
                self.target
            ),
            "TXT" | "SPF" => quote_fields(&self.txt_strings),
            _ => self.target.clone(),
        }
    }

    /// Decodes `content` as the zone-file rendering of a `record_type` record.
    ///
    /// `origin` resolves a `"@"` host-name target to the zone apex.
    pub fn populate_from_string(
        &mut self,
        record_type: &str,
        content: &str,
        origin: &str,
    ) -> ModelResult<()> {
        self.record_type = record_type.to_uppercase();
        let rtype = self.record_type.clone();

        match rtype.as_str() {
            "A" => {
                content
                    .trim()
                    .parse::<Ipv4Addr>()
                    .map_err(|e| ModelError::invalid("A", format!("'{content}': {e}")))?;
                self.set_target(content.trim());
            }
            "AAAA" => {
                content
                    .trim()
                    .parse::<Ipv6Addr>()
                    .map_err(|e| ModelError::invalid("AAAA", format!("'{content}': {e}")))?;
                self.set_target(content.trim());
            }
            "ALIAS" | "CNAME" | "NS" | "PTR" => {
                let target = content.trim();
                if target.is_empty() {
                    return Err(ModelError::invalid(&rtype, "empty target"));
                }
                if target == "@" {
                    self.set_target(origin);
                } else {
                    self.set_target(target);
                }
            }
            "MX" => {
                let (preference, target) = split_two(&rtype, content)?;
                let preference = parse_number::<u16>("MX", "preference", preference)?;
                self.set_target_mx(preference, target);
            }
            "SRV" => {
                let (priority, rest) = split_two(&rtype, content)?;
                let priority = parse_number::<u16>("SRV", "priority", priority)?;
                self.set_target_srv_priority_string(priority, rest)?;
            }
            "TXT" | "SPF" => self.set_target_txt_quoted_fields(content)?,
            "CAA" => {
                let fields = parse_quoted_fields(content)?;
                let [flag, tag, value] = fields.as_slice() else {
                    return Err(ModelError::invalid(
                        "CAA",
                        format!("expected 'flag tag value', got '{content}'"),
                    ));
                };
                self.caa_flag = parse_number::<u8>("CAA", "flag", flag)?;
                self.caa_tag.clone_from(tag);
                self.set_target(value);
            }
            "SSHFP" => {
                let parts: Vec<&str> = content.split_whitespace().collect();
                let [algorithm, fp_type, fingerprint] = parts.as_slice() else {
                    return Err(ModelError::invalid(
                        "SSHFP",
                        format!("expected 'algorithm type fingerprint', got '{content}'"),
                    ));
                };
                self.sshfp_algorithm = parse_number::<u8>("SSHFP", "algorithm", algorithm)?;
                self.sshfp_fingerprint_type = parse_number::<u8>("SSHFP", "type", fp_type)?;
                self.set_target(fingerprint);
            }
            "NAPTR" => {
                let fields = parse_quoted_fields(content)?;
                let [order, preference, flags, service, regexp, replacement] = fields.as_slice()
                else {
                    return Err(ModelError::invalid(
                        "NAPTR",
                        format!("expected 6 fields, got '{content}'"),
                    ));
                };
                self.naptr_order = parse_number::<u16>("NAPTR", "order", order)?;
                self.naptr_preference = parse_number::<u16>("NAPTR", "preference", preference)?;
                self.naptr_flags.clone_from(flags);
                self.naptr_service.clone_from(service);
                self.naptr_regexp.clone_from(regexp);
                self.set_target(replacement);
            }
            // SOA 只用于获取 zone 标识，保留主名称服务器作为目标
            "SOA" => {
                let primary = content
                    .split_whitespace()
                    .next()
                    .ok_or_else(|| ModelError::invalid("SOA", "empty content"))?;
                self.set_target(primary);
            }
            _ => return Err(ModelError::UnsupportedRecordType(rtype.clone())),
        }
        Ok(())
    }
}

impl std::fmt::Display for RecordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} ttl={}",
            self.record_type,
            self.name_fqdn,
            self.target_combined(),
            self.ttl
        )
    }
}

fn split_two<'a>(record_type: &str, content: &'a str) -> ModelResult<(&'a str, &'a str)> {
    content
        .trim()
        .split_once(char::is_whitespace)
        .map(|(a, b)| (a, b.trim()))
        .ok_or_else(|| ModelError::invalid(record_type, format!("malformed content '{content}'")))
}

fn parse_number<T: std::str::FromStr>(record_type: &str, field: &str, value: &str) -> ModelResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ModelError::invalid(record_type, format!("invalid {field} '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(rtype: &str, content: &str) -> ModelResult<RecordConfig> {
        let mut rc = RecordConfig::new(rtype, 300);
        rc.set_label("www", "example.com");
        rc.populate_from_string(rtype, content, "example.com")?;
        Ok(rc)
    }

    // ---- labels ----

    #[test]
    fn label_from_apex_fqdn() {
        let mut rc = RecordConfig::new("A", 300);
        rc.set_label_from_fqdn("Example.com", "example.com");
        assert_eq!(rc.label(), "@");
        assert_eq!(rc.name_fqdn, "example.com");
    }

    #[test]
    fn label_from_sub_fqdn() {
        let mut rc = RecordConfig::new("A", 300);
        rc.set_label_from_fqdn("WWW.example.com", "example.com");
        assert_eq!(rc.label(), "www");
        assert_eq!(rc.name_fqdn, "www.example.com");
    }

    // ---- decode ----

    #[test]
    fn decode_a() {
        let rc = decode("A", "192.0.2.1").unwrap();
        assert_eq!(rc.target_field(), "192.0.2.1");
    }

    #[test]
    fn decode_a_rejects_garbage() {
        assert!(matches!(
            decode("A", "not-an-ip"),
            Err(ModelError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn decode_cname_adds_root_dot() {
        let rc = decode("CNAME", "target.example.net").unwrap();
        assert_eq!(rc.target_field(), "target.example.net.");
    }

    #[test]
    fn decode_mx() {
        let rc = decode("MX", "10 mail.example.com.").unwrap();
        assert_eq!(rc.mx_preference, 10);
        assert_eq!(rc.target_combined(), "10 mail.example.com.");
    }

    #[test]
    fn decode_srv() {
        let rc = decode("SRV", "1 5 5060 sip.example.com").unwrap();
        assert_eq!(
            (rc.srv_priority, rc.srv_weight, rc.srv_port),
            (1, 5, 5060)
        );
        assert_eq!(rc.target_field(), "sip.example.com.");
    }

    #[test]
    fn srv_priority_string_needs_three_fields() {
        let mut rc = RecordConfig::new("SRV", 300);
        assert!(rc.set_target_srv_priority_string(1, "5 5060").is_err());
    }

    #[test]
    fn decode_caa() {
        let rc = decode("CAA", r#"0 issue "letsencrypt.org""#).unwrap();
        assert_eq!(rc.caa_tag, "issue");
        assert_eq!(rc.target_combined(), r#"0 issue "letsencrypt.org""#);
    }

    #[test]
    fn decode_naptr() {
        let rc = decode("NAPTR", r#"100 10 "U" "E2U+sip" "!^.*$!sip:info@example.com!" ."#)
            .unwrap();
        assert_eq!(rc.naptr_order, 100);
        assert_eq!(rc.naptr_service, "E2U+sip");
        assert_eq!(rc.target_field(), ".");
    }

    #[test]
    fn decode_sshfp() {
        let rc = decode("SSHFP", "1 1 123456789abcdef").unwrap();
        assert_eq!(rc.target_combined(), "1 1 123456789abcdef");
    }

    #[test]
    fn decode_spf_keeps_quoted_fields() {
        let rc = decode("SPF", r#""v=spf1 -all""#).unwrap();
        assert_eq!(rc.txt_strings, vec!["v=spf1 -all"]);
    }

    #[test]
    fn decode_unknown_type() {
        assert!(matches!(
            decode("LOC", "52 22 23.000 N"),
            Err(ModelError::UnsupportedRecordType(t)) if t == "LOC"
        ));
    }

    #[test]
    fn decode_alias_apex_marker() {
        let rc = decode("ALIAS", "@").unwrap();
        assert_eq!(rc.target_field(), "example.com.");
    }

    // ---- encode ----

    #[test]
    fn txt_combined_is_quoted() {
        let mut rc = RecordConfig::new("TXT", 300);
        rc.set_target_txts(vec!["a b".to_string(), "c".to_string()]);
        assert_eq!(rc.target_combined(), r#""a b" "c""#);
    }

    #[test]
    fn supported_types_case_insensitive() {
        assert!(RecordConfig::is_supported_type("txt"));
        assert!(!RecordConfig::is_supported_type("HINFO"));
    }
}
