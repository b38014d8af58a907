//! Zone view scraping
//!
//! Two phases: [`extract_rows`] turns the zone-edit page into flat
//! [`RawRecordRow`]s, then [`row_to_record`] maps each row to a canonical
//! record with no document access at all.

use dns_reconciler_core::{ModelResult, NativeRef, RecordConfig};
use scraper::Html;

use crate::types::ProviderZone;

use super::PROVIDER_NAME;
use super::html::{ElementParser, PageError, PageResult, exists, selector};

/// 一行记录的原始字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawRecordRow {
    /// 记录类型（大写）
    pub record_type: String,
    pub ttl: u32,
    /// 控制台显示的记录名称（完整域名）
    pub name: String,
    /// 优先级列（MX/SRV 之外为 `-`，解析为 0）
    pub priority: u16,
    /// 内容列 `data` 属性
    pub content: String,
    /// 控制台记录 ID
    pub record_id: u64,
}

const ROW_SELECTOR: &str = "tr.dns_tr, tr.dns_tr_dynamic, tr.dns_tr_locked";

/// 解析 zone 编辑页面中的所有记录行
///
/// 不支持的记录类型（HINFO、LOC 等）直接跳过，不会导致失败。
pub(crate) fn extract_rows(body: &str) -> PageResult<Vec<RawRecordRow>> {
    let doc = Html::parse_document(body);
    if !exists(&doc, "#dns_main_content")? {
        return Err(PageError::Structure("zone records listing failed".to_string()));
    }

    let rows = selector(ROW_SELECTOR)?;
    let type_cell = selector("td > .rrlabel")?;
    let ttl_cell = selector("td:nth-child(5)")?;
    let name_cell = selector(".dns_view")?;
    let priority_cell = selector("td:nth-child(6)")?;
    let content_cell = selector("td:nth-child(7)")?;

    let mut result = Vec::new();
    for row in doc.select(&rows) {
        let mut parser = ElementParser::default();

        let record_type = parser
            .string_attr(row.select(&type_cell).next(), "data")
            .to_uppercase();
        // 类型缺失时继续，由 finish 报告错误
        if !record_type.is_empty() && !RecordConfig::is_supported_type(&record_type) {
            log::debug!("[{PROVIDER_NAME}] Skipping unsupported record type {record_type}");
            continue;
        }

        let ttl = parser.int_text(row.select(&ttl_cell).next());
        let name = parser.string_text(row.select(&name_cell).next());
        let record_id = parser.int_attr(Some(row), "id");
        let content = parser.string_attr(row.select(&content_cell).next(), "data");
        let priority = parser.int_text(row.select(&priority_cell).next());

        result.push(parser.finish(RawRecordRow {
            record_type,
            ttl,
            name,
            priority,
            content,
            record_id,
        })?);
    }
    Ok(result)
}

/// 将原始行转换为规范记录，并附带关联键
pub(crate) fn row_to_record(row: &RawRecordRow, zone: &ProviderZone) -> ModelResult<RecordConfig> {
    let mut rc = RecordConfig::new(&row.record_type, row.ttl);
    rc.set_label_from_fqdn(&row.name, &zone.name);

    match row.record_type.as_str() {
        "ALIAS" => rc.set_target(&row.content),
        // 控制台显示的 MX 目标没有末尾的点，set_target_mx 会补上
        "MX" => rc.set_target_mx(row.priority, &row.content),
        "SRV" => rc.set_target_srv_priority_string(row.priority, &row.content)?,
        // SPF 已废弃，统一为 TXT
        "SPF" | "TXT" => {
            rc.record_type = "TXT".to_string();
            rc.set_target_txt_quoted_fields(&row.content)?;
        }
        other => rc.populate_from_string(other, &row.content, &zone.name)?,
    }

    rc.original = Some(NativeRef {
        zone_id: zone.id,
        zone_name: zone.name.clone(),
        record_id: Some(row.record_id),
        record_name: row.name.clone(),
    });
    Ok(rc)
}

/// 解析整个 zone 页面；任意一行解码失败都会放弃全部结果
pub(crate) fn scrape_zone(body: &str, zone: &ProviderZone) -> PageResult<Vec<RecordConfig>> {
    extract_rows(body)?
        .iter()
        .map(|row| row_to_record(row, zone).map_err(PageError::from))
        .collect()
}
