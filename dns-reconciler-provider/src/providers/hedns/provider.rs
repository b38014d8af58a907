//! HE DNS Provider implementation

use std::collections::BTreeMap;

use async_trait::async_trait;
use dns_reconciler_core::{
    Differ, DomainConfig, IncrementalDiff, RecordConfig, fold_spf_records, normalize_records,
    split_long_txt_records,
};

use crate::error::{ProviderError, Result};
use crate::traits::{DnsServiceProvider, ErrorContext};
use crate::types::{
    Correction, FieldType, Mutation, ProviderCredentialField, ProviderFeatures, ProviderMetadata,
    ProviderType, ProviderZone, keys,
};

use super::corrections::{
    add_zone_form, delete_record_form, edit_record_form, native_ref, plan_corrections, split_soa,
};
use super::html::{PageError, check_response, parse_auth_page, parse_zone_list};
use super::scrape::scrape_zone;
use super::{DEFAULT_NAMESERVERS, HednsProvider, PROVIDER_NAME};

fn domain_context(domain: &str) -> ErrorContext {
    ErrorContext {
        domain: Some(domain.to_string()),
    }
}

fn credential_field(
    key: &str,
    label: &str,
    field_type: FieldType,
    required: bool,
    help_text: Option<&str>,
) -> ProviderCredentialField {
    ProviderCredentialField {
        key: key.to_string(),
        label: label.to_string(),
        field_type,
        required,
        help_text: help_text.map(str::to_string),
    }
}

impl HednsProvider {
    /// Static capability descriptor.
    pub fn features() -> ProviderFeatures {
        ProviderFeatures {
            auto_dnssec: false,
            get_zones: true,
            alias: true,
            caa: true,
            ds: false,
            ds_for_children: false,
            naptr: true,
            ptr: true,
            srv: true,
            sshfp: true,
            tlsa: false,
            create_domains: true,
            dual_host: true,
            officially_supported: false,
        }
    }

    /// 账户下的域名（名称 -> zone ID）
    async fn list_domains(&self) -> Result<BTreeMap<String, u64>> {
        let body = self.get_page(&[], "list_zones").await?;
        parse_zone_list(&body).map_err(|e| self.page_error(e, ErrorContext::default()))
    }

    async fn create_domain(&self, domain: &str) -> Result<()> {
        log::info!("[{PROVIDER_NAME}] Creating zone {domain}");
        let body = self.post_form(&add_zone_form(domain), "add_zone").await?;
        check_response(&body).map_err(|e| self.page_error(e, domain_context(domain)))
    }

    /// 抓取域名下的全部记录（包含 SOA）
    async fn fetch_zone_records(&self, domain: &str) -> Result<Vec<RecordConfig>> {
        let zones = self.list_domains().await?;
        let Some(&id) = zones.get(domain) else {
            return Err(ProviderError::DomainNotFound {
                provider: PROVIDER_NAME.to_string(),
                domain: domain.to_string(),
            });
        };
        let zone = ProviderZone {
            id,
            name: domain.to_string(),
        };

        let zone_id = id.to_string();
        let query = [
            ("hosted_dns_zoneid", zone_id.as_str()),
            ("menu", "edit_zone"),
            ("hosted_dns_editzone", ""),
        ];
        let body = self.get_page(&query, "edit_zone").await?;
        let records =
            scrape_zone(&body, &zone).map_err(|e| self.page_error(e, domain_context(domain)))?;
        log::debug!(
            "[{PROVIDER_NAME}] Scraped {} records from {domain}",
            records.len()
        );
        Ok(records)
    }

    async fn edit_zone_record(&self, rc: &RecordConfig, create: bool) -> Result<()> {
        let form = edit_record_form(rc, create)?;
        let action = if create { "create_record" } else { "update_record" };
        let body = self.post_form(&form, action).await?;
        let zone = &native_ref(rc)?.zone_name;
        check_response(&body).map_err(|e| self.page_error(e, domain_context(zone)))
    }

    async fn delete_zone_record(&self, rc: &RecordConfig) -> Result<()> {
        let form = delete_record_form(rc)?;
        let body = self.post_form(&form, "delete_record").await?;
        let zone = &native_ref(rc)?.zone_name;
        check_response(&body).map_err(|e| self.page_error(e, domain_context(zone)))
    }

    /// 拒绝控制台不支持的期望记录类型
    fn audit_records(records: &[RecordConfig]) -> Result<()> {
        let features = Self::features();
        match records
            .iter()
            .find(|rc| !features.supports_record_type(&rc.record_type))
        {
            Some(rc) => Err(ProviderError::InvalidParameter {
                provider: PROVIDER_NAME.to_string(),
                param: "record_type".to_string(),
                detail: format!("{} records are not supported: {rc}", rc.record_type),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DnsServiceProvider for HednsProvider {
    fn id(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Hedns,
            name: "Hurricane Electric DNS".to_string(),
            description: "Hurricane Electric Free DNS (dns.he.net), managed through its web console"
                .to_string(),
            credential_fields: vec![
                credential_field(keys::USERNAME, "Username", FieldType::Text, true, None),
                credential_field(keys::PASSWORD, "Password", FieldType::Password, true, None),
                credential_field(
                    keys::TOTP,
                    "TOTP Code",
                    FieldType::Text,
                    false,
                    Some("Current one-time code when two-factor authentication is enabled"),
                ),
                credential_field(
                    keys::TOTP_KEY,
                    "TOTP Secret",
                    FieldType::Password,
                    false,
                    Some("Base32 generator secret; mutually exclusive with the TOTP code"),
                ),
                credential_field(
                    keys::SESSION_FILE_PATH,
                    "Session Directory",
                    FieldType::Text,
                    false,
                    Some("Directory where a .hedns-session file keeps the login between runs"),
                ),
            ],
            features: Self::features(),
        }
    }

    async fn validate_credentials(&self) -> Result<bool> {
        let body = self.get_page(&[], "validate_credentials").await?;
        match parse_auth_page(&body) {
            Ok(page) => Ok(page.authenticated),
            Err(PageError::Banner(raw)) => {
                log::warn!("[{PROVIDER_NAME}] Session check returned: {}", raw.message);
                Ok(false)
            }
            Err(e) => Err(self.page_error(e, ErrorContext::default())),
        }
    }

    async fn list_zones(&self) -> Result<Vec<String>> {
        Ok(self.list_domains().await?.into_keys().collect())
    }

    async fn ensure_domain_exists(&self, domain: &str) -> Result<()> {
        if self.list_domains().await?.contains_key(domain) {
            log::debug!("[{PROVIDER_NAME}] Zone {domain} already exists");
            return Ok(());
        }
        self.create_domain(domain).await
    }

    async fn get_nameservers(&self, _domain: &str) -> Result<Vec<String>> {
        Ok(DEFAULT_NAMESERVERS.iter().map(ToString::to_string).collect())
    }

    async fn get_zone_records(&self, domain: &str) -> Result<Vec<RecordConfig>> {
        let records = self.fetch_zone_records(domain).await?;
        Ok(split_soa(records)?.1)
    }

    async fn get_domain_corrections(&self, dc: &DomainConfig) -> Result<Vec<Correction>> {
        let mut dc = dc.clone();
        dc.punycode().map_err(|e| ProviderError::InvalidParameter {
            provider: PROVIDER_NAME.to_string(),
            param: "domain".to_string(),
            detail: e.to_string(),
        })?;
        Self::audit_records(&dc.records)?;

        let records = self.fetch_zone_records(&dc.name).await?;
        let (zone_id, mut existing) = split_soa(records)?;

        normalize_records(&mut existing);
        normalize_records(&mut dc.records);
        // 控制台把 SPF 行存为 TXT
        fold_spf_records(&mut dc.records);
        split_long_txt_records(&mut dc.records);

        let changes = IncrementalDiff::new(&dc)
            .incremental_diff(&existing)
            .map_err(|e| ProviderError::InvalidParameter {
                provider: PROVIDER_NAME.to_string(),
                param: "records".to_string(),
                detail: e.to_string(),
            })?;

        let zone = ProviderZone {
            id: zone_id,
            name: dc.name.clone(),
        };
        let corrections = plan_corrections(changes, &zone)?;
        log::info!(
            "[{PROVIDER_NAME}] {} corrections for {}",
            corrections.len(),
            dc.name
        );
        Ok(corrections)
    }

    async fn apply_correction(&self, correction: &Correction) -> Result<()> {
        log::info!("[{PROVIDER_NAME}] {}", correction.msg);
        match &correction.mutation {
            Mutation::Create(rc) => self.edit_zone_record(rc, true).await,
            Mutation::Update(rc) => self.edit_zone_record(rc, false).await,
            Mutation::Delete(rc) => self.delete_zone_record(rc).await,
        }
    }
}
