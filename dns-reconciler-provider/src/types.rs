use std::collections::HashMap;
use std::path::PathBuf;

use dns_reconciler_core::RecordConfig;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

// ============ Provider Types ============

/// Identifies a supported DNS provider.
///
/// Serialized as a lowercase string (e.g., `"hedns"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Hurricane Electric Free DNS (web console).
    Hedns,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hedns => write!(f, "hedns"),
        }
    }
}

// ============ Zone Types ============

/// A zone owned by the account, as listed by the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderZone {
    /// Provider-native zone identifier.
    pub id: u64,
    /// Zone (domain) name.
    pub name: String,
}

// ============ Correction Types ============

/// A single deferred mutation against the console.
///
/// Every variant owns its record; the record's `original` correlation key
/// carries the zone identifier and, for update/delete, the record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "record", rename_all = "camelCase")]
pub enum Mutation {
    /// Create a new record. The correlation key has no record identifier.
    Create(RecordConfig),
    /// Replace the record identified by the correlation key with this content.
    Update(RecordConfig),
    /// Delete the record identified by the correlation key.
    Delete(RecordConfig),
}

impl Mutation {
    /// The record this mutation is bound to.
    pub fn record(&self) -> &RecordConfig {
        match self {
            Self::Create(rc) | Self::Update(rc) | Self::Delete(rc) => rc,
        }
    }
}

/// One planned change: a human-readable message plus the mutation that performs it.
///
/// Pass to [`DnsServiceProvider::apply_correction()`](crate::DnsServiceProvider::apply_correction)
/// to execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correction {
    /// Human-readable description (e.g., `"CREATE A www.example.com 192.0.2.1 ttl=300"`).
    pub msg: String,
    /// Deferred mutation.
    pub mutation: Mutation,
}

// ============ Provider Metadata Types ============

/// The input type of a credential field (affects UI rendering).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Plain text input.
    Text,
    /// Masked/password input.
    Password,
}

/// Definition of a single credential field accepted by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredentialField {
    /// Machine-readable field key (e.g., `"totp-key"`).
    pub key: String,
    /// Human-readable label (e.g., `"TOTP Secret"`).
    pub label: String,
    /// Input type for UI rendering.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the field must be supplied.
    pub required: bool,
    /// Optional help/description text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

/// Static capability descriptor: what the provider can and cannot do.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFeatures {
    pub auto_dnssec: bool,
    pub get_zones: bool,
    pub alias: bool,
    pub caa: bool,
    pub ds: bool,
    pub ds_for_children: bool,
    pub naptr: bool,
    pub ptr: bool,
    pub srv: bool,
    pub sshfp: bool,
    pub tlsa: bool,
    /// Zones can be created through the provider.
    pub create_domains: bool,
    /// Can be used alongside another DNS provider for the same zone.
    pub dual_host: bool,
    /// Maintained by the project itself rather than the community.
    pub officially_supported: bool,
}

impl ProviderFeatures {
    /// Whether records of `record_type` can be managed by this provider.
    pub fn supports_record_type(&self, record_type: &str) -> bool {
        match record_type.to_uppercase().as_str() {
            "A" | "AAAA" | "CNAME" | "MX" | "NS" | "TXT" | "SPF" | "SOA" => true,
            "ALIAS" => self.alias,
            "CAA" => self.caa,
            "DS" => self.ds,
            "NAPTR" => self.naptr,
            "PTR" => self.ptr,
            "SRV" => self.srv,
            "SSHFP" => self.sshfp,
            "TLSA" => self.tlsa,
            _ => false,
        }
    }
}

/// Static metadata describing a DNS provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    /// Provider type identifier.
    pub id: ProviderType,
    /// Human-readable provider name.
    pub name: String,
    /// Short description of the provider.
    pub description: String,
    /// Credential fields accepted by this provider.
    pub credential_fields: Vec<ProviderCredentialField>,
    /// Capability descriptor.
    pub features: ProviderFeatures,
}

// ============ Credential Types ============

/// Validation error for provider credentials.
///
/// Returned when credential fields are missing, empty, or have an invalid format.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// A required credential field is missing entirely.
    MissingField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A credential field is present but empty/whitespace-only.
    EmptyField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A credential field has an invalid format.
    InvalidFormat {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
        /// Description of what's wrong with the format.
        reason: String,
    },
}

impl CredentialValidationError {
    fn field(&self) -> &str {
        match self {
            Self::MissingField { field, .. }
            | Self::EmptyField { field, .. }
            | Self::InvalidFormat { field, .. } => field,
        }
    }
}

impl std::fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { label, .. } => write!(f, "Missing required field: {label}"),
            Self::EmptyField { label, .. } => write!(f, "Field must not be empty: {label}"),
            Self::InvalidFormat { label, reason, .. } => write!(f, "{label}: {reason}"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

impl From<CredentialValidationError> for ProviderError {
    fn from(e: CredentialValidationError) -> Self {
        let provider = match &e {
            CredentialValidationError::MissingField { provider, .. }
            | CredentialValidationError::EmptyField { provider, .. }
            | CredentialValidationError::InvalidFormat { provider, .. } => provider.to_string(),
        };
        ProviderError::InvalidParameter {
            provider,
            param: e.field().to_string(),
            detail: e.to_string(),
        }
    }
}

/// Credential keys in the flat key-value form.
pub(crate) mod keys {
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
    pub const TOTP: &str = "totp";
    pub const TOTP_KEY: &str = "totp-key";
    pub const SESSION_FILE_PATH: &str = "session-file-path";
}

/// Hurricane Electric console credentials.
///
/// `totp` (a literal one-time code) and `totp_key` (a base32 generator secret)
/// are mutually exclusive. When `session_file_path` is set, the session cookies
/// are persisted to `<session_file_path>/.hedns-session` between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HednsCredentials {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub totp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub totp_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub session_file_path: Option<PathBuf>,
}

impl HednsCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    /// Construct credentials from a `HashMap`, validating required fields.
    ///
    /// Reads the keys `username`, `password`, `totp`, `totp-key` and
    /// `session-file-path`. Empty optional values are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialValidationError`] if a required field is missing or empty,
    /// or if both `totp` and `totp-key` are supplied.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, CredentialValidationError> {
        let credentials = Self {
            username: get_required_field(map, keys::USERNAME, "Username")?,
            password: get_required_field(map, keys::PASSWORD, "Password")?,
            totp: get_optional_field(map, keys::TOTP),
            totp_key: get_optional_field(map, keys::TOTP_KEY),
            session_file_path: get_optional_field(map, keys::SESSION_FILE_PATH).map(PathBuf::from),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Convert credentials to a `HashMap` for flat key-value storage.
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut map: HashMap<String, String> = [
            (keys::USERNAME.to_string(), self.username.clone()),
            (keys::PASSWORD.to_string(), self.password.clone()),
        ]
        .into();
        if let Some(totp) = &self.totp {
            map.insert(keys::TOTP.to_string(), totp.clone());
        }
        if let Some(key) = &self.totp_key {
            map.insert(keys::TOTP_KEY.to_string(), key.clone());
        }
        if let Some(path) = &self.session_file_path {
            map.insert(
                keys::SESSION_FILE_PATH.to_string(),
                path.to_string_lossy().into_owned(),
            );
        }
        map
    }

    /// Checks the configuration without touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialValidationError`] if username or password is empty,
    /// or if both `totp` and `totp-key` are supplied.
    pub fn validate(&self) -> Result<(), CredentialValidationError> {
        if self.username.trim().is_empty() {
            return Err(CredentialValidationError::EmptyField {
                provider: ProviderType::Hedns,
                field: keys::USERNAME.to_string(),
                label: "Username".to_string(),
            });
        }
        if self.password.trim().is_empty() {
            return Err(CredentialValidationError::EmptyField {
                provider: ProviderType::Hedns,
                field: keys::PASSWORD.to_string(),
                label: "Password".to_string(),
            });
        }
        if self.totp.is_some() && self.totp_key.is_some() {
            return Err(CredentialValidationError::InvalidFormat {
                provider: ProviderType::Hedns,
                field: keys::TOTP.to_string(),
                label: "TOTP".to_string(),
                reason: "'totp' and 'totp-key' are mutually exclusive".to_string(),
            });
        }
        Ok(())
    }
}

/// Obtain required fields from `HashMap` and verify that it is not empty
fn get_required_field(
    map: &HashMap<String, String>,
    key: &str,
    label: &str,
) -> Result<String, CredentialValidationError> {
    match map.get(key) {
        None => Err(CredentialValidationError::MissingField {
            provider: ProviderType::Hedns,
            field: key.to_string(),
            label: label.to_string(),
        }),
        Some(v) if v.trim().is_empty() => Err(CredentialValidationError::EmptyField {
            provider: ProviderType::Hedns,
            field: key.to_string(),
            label: label.to_string(),
        }),
        Some(v) => Ok(v.clone()),
    }
}

fn get_optional_field(map: &HashMap<String, String>, key: &str) -> Option<String> {
    map.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
