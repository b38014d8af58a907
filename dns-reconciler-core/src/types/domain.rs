//! Domain (zone) configuration

use serde::{Deserialize, Serialize};

use super::record::{DEFAULT_TTL, RecordConfig};
use crate::error::{ModelError, ModelResult};
use crate::utils::name::relative_to_full_name;
use crate::utils::txt::{MAX_TXT_SEGMENT_LEN, split_long_txt};

/// Desired state of one zone: its name and the records it should contain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainConfig {
    /// Zone name (e.g., `"example.com"`).
    pub name: String,
    /// Desired records.
    pub records: Vec<RecordConfig>,
}

impl DomainConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
        }
    }

    /// 将域名、记录标签和主机名目标转换为 ASCII (Punycode)
    pub fn punycode(&mut self) -> ModelResult<()> {
        self.name = to_ascii(&self.name)?;
        for rc in &mut self.records {
            let label = to_ascii(&rc.name)?;
            rc.name_fqdn = relative_to_full_name(&label, &self.name);
            rc.name = label;

            // TXT/CAA 等内容为自由文本，只转换主机名目标
            if rc.has_hostname_target() && !rc.target_field().is_ascii() {
                let target = to_ascii(rc.target_field())?;
                rc.set_target(&target);
            }
        }
        Ok(())
    }
}

/// 仅转换非 ASCII 名称；`@`、`_dmarc`、`*` 等原样保留
fn to_ascii(name: &str) -> ModelResult<String> {
    if name.is_ascii() {
        return Ok(name.to_string());
    }
    idna::domain_to_ascii(name).map_err(|e| ModelError::InvalidDomain(format!("{name}: {e:?}")))
}

/// 规范化记录：标签小写，TTL 为 0 时使用默认值
pub fn normalize_records(records: &mut [RecordConfig]) {
    for rc in records {
        rc.name = rc.name.to_lowercase();
        rc.name_fqdn = rc.name_fqdn.to_lowercase();
        if rc.ttl == 0 {
            rc.ttl = DEFAULT_TTL;
        }
    }
}

/// 将 SPF 记录改写为 TXT，与只保存 TXT 的服务端对齐
pub fn fold_spf_records(records: &mut [RecordConfig]) {
    for rc in records.iter_mut().filter(|rc| rc.record_type == "SPF") {
        rc.record_type = "TXT".to_string();
    }
}

/// 将只有一个超长片段的 TXT 记录自动拆分为多个 255 字节片段
pub fn split_long_txt_records(records: &mut [RecordConfig]) {
    for rc in records {
        if rc.record_type == "TXT"
            && rc.txt_strings.len() == 1
            && rc.txt_strings[0].len() > MAX_TXT_SEGMENT_LEN
        {
            let segments = split_long_txt(&rc.txt_strings[0]);
            rc.set_target_txts(segments);
        }
    }
}
