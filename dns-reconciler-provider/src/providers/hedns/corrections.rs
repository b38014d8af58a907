//! Correction planning and console form encoding
//!
//! Form fields are kept in a `BTreeMap` so the encoded body is sorted by key
//! and identical across runs.

use std::collections::BTreeMap;

use dns_reconciler_core::{Changeset, NativeRef, RecordConfig};

use crate::error::{ProviderError, Result};
use crate::types::{Correction, Mutation, ProviderZone};

use super::PROVIDER_NAME;

pub(crate) type Form = BTreeMap<&'static str, String>;

fn invalid(param: &str, detail: String) -> ProviderError {
    ProviderError::InvalidParameter {
        provider: PROVIDER_NAME.to_string(),
        param: param.to_string(),
        detail,
    }
}

/// 记录上的关联键
pub(crate) fn native_ref(rc: &RecordConfig) -> Result<&NativeRef> {
    rc.original
        .as_ref()
        .ok_or_else(|| invalid("original", format!("record has no correlation key: {rc}")))
}

/// 更新和删除必须带有控制台记录 ID
fn require_record_id(rc: &RecordConfig) -> Result<u64> {
    native_ref(rc)?
        .record_id
        .ok_or_else(|| invalid("record_id", format!("record has no console id: {rc}")))
}

/// 取出 SOA 记录中的 zone ID，并返回其余可比较的记录
///
/// 每次抓取必须恰好包含一条 SOA。
pub(crate) fn split_soa(records: Vec<RecordConfig>) -> Result<(u64, Vec<RecordConfig>)> {
    let (soa, rest): (Vec<_>, Vec<_>) = records.into_iter().partition(|rc| rc.record_type == "SOA");
    let [soa] = soa.as_slice() else {
        return Err(ProviderError::ParseError {
            provider: PROVIDER_NAME.to_string(),
            detail: format!("expected exactly one SOA record, found {}", soa.len()),
        });
    };
    Ok((native_ref(soa)?.zone_id, rest))
}

/// 将 diff 结果转换为修正列表，顺序为删除、创建、修改
///
/// 创建使用 `zone` 合成关联键（无记录 ID）；修改使用 `zone` 的标识，
/// 记录 ID 取自现有记录。每个修正持有自己的记录副本。
pub(crate) fn plan_corrections(changes: Changeset, zone: &ProviderZone) -> Result<Vec<Correction>> {
    let mut corrections = Vec::with_capacity(changes.len());

    for change in changes.delete {
        let msg = change.to_string();
        let existing = change
            .existing
            .ok_or_else(|| invalid("change", format!("deletion without a record: {msg}")))?;
        require_record_id(&existing)?;
        corrections.push(Correction {
            msg,
            mutation: Mutation::Delete(existing),
        });
    }

    for change in changes.create {
        let msg = change.to_string();
        let mut desired = change
            .desired
            .ok_or_else(|| invalid("change", format!("creation without a record: {msg}")))?;
        desired.original = Some(NativeRef {
            zone_id: zone.id,
            zone_name: zone.name.clone(),
            record_id: None,
            record_name: desired.name.clone(),
        });
        corrections.push(Correction {
            msg,
            mutation: Mutation::Create(desired),
        });
    }

    for change in changes.modify {
        let msg = change.to_string();
        let (Some(existing), Some(mut desired)) = (change.existing, change.desired) else {
            return Err(invalid("change", format!("incomplete modification: {msg}")));
        };
        let record_id = require_record_id(&existing)?;
        desired.original = Some(NativeRef {
            zone_id: zone.id,
            zone_name: zone.name.clone(),
            record_id: Some(record_id),
            record_name: desired.name.clone(),
        });
        corrections.push(Correction {
            msg,
            mutation: Mutation::Update(desired),
        });
    }

    Ok(corrections)
}

// ============ Form Encoding ============

/// 创建或更新记录的表单
///
/// 控制台在创建和更新时的字段语义不一致：创建时类型大写、优先级为空，
/// 更新时类型小写、优先级为 `-`，之后再按类型覆盖。
pub(crate) fn edit_record_form(rc: &RecordConfig, create: bool) -> Result<Form> {
    let native = native_ref(rc)?;
    let mut form = Form::new();
    form.insert("menu", "edit_zone".to_string());
    form.insert("hosted_dns_zoneid", native.zone_id.to_string());
    form.insert("hosted_dns_editzone", "1".to_string());
    form.insert("TTL", rc.ttl.to_string());
    form.insert("Name", rc.name.clone());

    if create {
        form.insert("Type", rc.record_type.to_uppercase());
        form.insert("hosted_dns_editrecord", "Submit".to_string());
        form.insert("hosted_dns_recordid", String::new());
        form.insert("Priority", String::new());
    } else {
        form.insert("Type", rc.record_type.to_lowercase());
        form.insert("hosted_dns_editrecord", "Update".to_string());
        form.insert("hosted_dns_recordid", require_record_id(rc)?.to_string());
        form.insert("Priority", "-".to_string());
    }

    match rc.record_type.as_str() {
        "MX" => {
            form.insert("Priority", rc.mx_preference.to_string());
            form.insert("Content", rc.target_field().to_string());
        }
        "SRV" => {
            form.insert("Target", rc.target_field().to_string());
            form.insert("Priority", rc.srv_priority.to_string());
            form.insert("Weight", rc.srv_weight.to_string());
            form.insert("Port", rc.srv_port.to_string());
        }
        _ => {
            form.insert("Content", rc.target_combined());
        }
    }

    Ok(form)
}

/// 删除记录的表单：只发送标识和确认标志
pub(crate) fn delete_record_form(rc: &RecordConfig) -> Result<Form> {
    let native = native_ref(rc)?;
    let mut form = Form::new();
    form.insert("menu", "edit_zone".to_string());
    form.insert("hosted_dns_zoneid", native.zone_id.to_string());
    form.insert("hosted_dns_recordid", require_record_id(rc)?.to_string());
    form.insert("hosted_dns_editzone", "1".to_string());
    form.insert("hosted_dns_delrecord", "1".to_string());
    form.insert("hosted_dns_delconfirm", "delete".to_string());
    Ok(form)
}

/// 添加域名的表单
pub(crate) fn add_zone_form(domain: &str) -> Form {
    let mut form = Form::new();
    form.insert("action", "add_zone".to_string());
    form.insert("retmain", "0".to_string());
    form.insert("add_domain", domain.to_string());
    form.insert("submit", "Add Domain!".to_string());
    form
}
