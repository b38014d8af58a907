//! Console page parsing
//!
//! `scraper::Html` is not `Send`, so every function here parses the body
//! synchronously and returns owned data. Nothing in this module may be held
//! across an `.await`.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use dns_reconciler_core::ModelError;
use scraper::{ElementRef, Html, Selector};

use crate::traits::RawApiError;

use super::PROVIDER_NAME;
use super::error::is_ignored_banner;

/// 页面解析失败原因
#[derive(Debug)]
pub(crate) enum PageError {
    /// 控制台错误横幅（未在忽略列表中）
    Banner(RawApiError),
    /// 页面结构不符合预期，或记录内容无法解码
    Structure(String),
}

impl From<ModelError> for PageError {
    fn from(e: ModelError) -> Self {
        Self::Structure(e.to_string())
    }
}

pub(crate) type PageResult<T> = std::result::Result<T, PageError>;

/// 编译 CSS 选择器
pub(crate) fn selector(css: &str) -> PageResult<Selector> {
    Selector::parse(css).map_err(|e| PageError::Structure(format!("invalid selector '{css}': {e:?}")))
}

/// 文档中是否存在匹配元素
pub(crate) fn exists(doc: &Html, css: &str) -> PageResult<bool> {
    Ok(doc.select(&selector(css)?).next().is_some())
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

// ============ Element Extractor ============

/// 元素取值器：记录第一个错误，之后的取值全部跳过
#[derive(Debug, Default)]
pub(crate) struct ElementParser {
    err: Option<String>,
}

impl ElementParser {
    fn fail(&mut self, detail: String) {
        if self.err.is_none() {
            self.err = Some(detail);
        }
    }

    fn parse_number<T>(&mut self, what: &str, value: &str) -> T
    where
        T: FromStr + Default,
        <T as FromStr>::Err: Display,
    {
        match value.trim().parse() {
            Ok(v) => v,
            Err(e) => {
                self.fail(format!("invalid number '{value}' in {what}: {e}"));
                T::default()
            }
        }
    }

    pub fn string_attr(&mut self, el: Option<ElementRef<'_>>, attr: &str) -> String {
        if self.err.is_some() {
            return String::new();
        }
        match el.and_then(|e| e.value().attr(attr)) {
            Some(v) => v.to_string(),
            None => {
                self.fail(format!("could not locate attribute {attr}"));
                String::new()
            }
        }
    }

    pub fn int_attr<T>(&mut self, el: Option<ElementRef<'_>>, attr: &str) -> T
    where
        T: FromStr + Default,
        <T as FromStr>::Err: Display,
    {
        let value = self.string_attr(el, attr);
        if self.err.is_some() {
            return T::default();
        }
        self.parse_number(attr, &value)
    }

    pub fn string_text(&mut self, el: Option<ElementRef<'_>>) -> String {
        if self.err.is_some() {
            return String::new();
        }
        match el {
            Some(e) => element_text(e).trim().to_string(),
            None => {
                self.fail("could not locate element".to_string());
                String::new()
            }
        }
    }

    /// 读取元素文本为整数；`-` 表示该字段不适用，按 0 处理
    pub fn int_text<T>(&mut self, el: Option<ElementRef<'_>>) -> T
    where
        T: FromStr + Default,
        <T as FromStr>::Err: Display,
    {
        let value = self.string_text(el);
        if self.err.is_some() || value == "-" {
            return T::default();
        }
        self.parse_number("element text", &value)
    }

    /// 返回第一个错误，或者取值结果
    pub fn finish<T>(self, value: T) -> PageResult<T> {
        match self.err {
            Some(detail) => Err(PageError::Structure(detail)),
            None => Ok(value),
        }
    }
}

// ============ Error Banners ============

/// 检查 `div#dns_err` 横幅：忽略列表中的记录 warn 日志，其余第一条作为错误返回
pub(crate) fn check_banners(doc: &Html) -> PageResult<()> {
    for el in doc.select(&selector("div#dns_err")?) {
        let text = element_text(el);
        let message = text.trim();
        if is_ignored_banner(message) {
            log::warn!("[{PROVIDER_NAME}] Ignoring console notice: {message}");
            continue;
        }
        return Err(PageError::Banner(RawApiError::new(message)));
    }
    Ok(())
}

/// 只检查错误横幅（用于变更请求的响应）
pub(crate) fn check_response(body: &str) -> PageResult<()> {
    let doc = Html::parse_document(body);
    check_banners(&doc)
}

// ============ Auth Page ============

/// 登录相关页面的分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AuthPage {
    /// 页面包含注销入口
    pub authenticated: bool,
    /// 页面包含一次性验证码输入框
    pub requires_tfa: bool,
}

pub(crate) fn parse_auth_page(body: &str) -> PageResult<AuthPage> {
    let doc = Html::parse_document(body);
    check_banners(&doc)?;
    Ok(AuthPage {
        authenticated: exists(&doc, "#_tlogout")?,
        requires_tfa: exists(&doc, "input#tfacode")?,
    })
}

// ============ Zone List ============

/// 正向域名表和反向域名表中每行最后一列的图标携带 zone 名称和 ID
const ZONE_SELECTORS: &[&str] = &[
    "#domains_table > tbody > tr > td:last-child > img",
    "#tabs-advanced .generic_table > tbody > tr > td:last-child > img",
];

/// 解析首页的域名表；没有域名表表示账户下没有域名
pub(crate) fn parse_zone_list(body: &str) -> PageResult<BTreeMap<String, u64>> {
    let doc = Html::parse_document(body);
    let mut zones = BTreeMap::new();
    if !exists(&doc, "#domains_table")? {
        return Ok(zones);
    }

    let zone_selector = selector(&ZONE_SELECTORS.join(", "))?;
    for img in doc.select(&zone_selector) {
        let (Some(id), Some(name)) = (img.value().attr("value"), img.value().attr("name")) else {
            continue;
        };
        let id = id
            .trim()
            .parse::<u64>()
            .map_err(|e| PageError::Structure(format!("invalid zone id '{id}' for {name}: {e}")))?;
        zones.insert(name.to_string(), id);
    }
    Ok(zones)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
        doc.select(&selector(css).unwrap()).next()
    }

    // ---- ElementParser ----

    #[test]
    fn parser_reads_attrs_and_text() {
        let doc = Html::parse_fragment(r#"<div id="42" data="x"><span> 3600 </span><i>-</i></div>"#);
        let mut p = ElementParser::default();
        let id: u64 = p.int_attr(first(&doc, "div"), "id");
        let data = p.string_attr(first(&doc, "div"), "data");
        let ttl: u32 = p.int_text(first(&doc, "span"));
        let priority: u16 = p.int_text(first(&doc, "i"));
        let res = p.finish((id, data, ttl, priority));
        assert!(matches!(res, Ok((42, ref d, 3600, 0)) if d == "x"));
    }

    #[test]
    fn parser_keeps_first_error() {
        let doc = Html::parse_fragment(r#"<div data="abc"></div>"#);
        let mut p = ElementParser::default();
        let _: u64 = p.int_attr(first(&doc, "div"), "missing");
        let _: u64 = p.int_attr(first(&doc, "div"), "data");
        let res = p.finish(());
        assert!(matches!(
            res,
            Err(PageError::Structure(ref d)) if d.contains("could not locate attribute missing")
        ));
    }

    #[test]
    fn parser_rejects_missing_element() {
        let doc = Html::parse_fragment("<p></p>");
        let mut p = ElementParser::default();
        let _ = p.string_text(first(&doc, "span"));
        assert!(p.finish(()).is_err());
    }

    // ---- banners ----

    #[test]
    fn banner_is_reported() {
        let res = check_response(r#"<div id="dns_err">Incorrect</div>"#);
        assert!(matches!(res, Err(PageError::Banner(ref raw)) if raw.message == "Incorrect"));
    }

    #[test]
    fn ignored_banner_passes() {
        let body = format!(
            r#"<div id="dns_err">{}</div>"#,
            super::super::error::ERROR_IMPROPER_DELEGATION
        );
        assert!(check_response(&body).is_ok());
    }

    #[test]
    fn ignored_banner_does_not_hide_real_error() {
        let body = format!(
            r#"<div id="dns_err">{}</div><div id="dns_err">Something broke</div>"#,
            super::super::error::ERROR_IMPROPER_DELEGATION
        );
        assert!(matches!(
            check_response(&body),
            Err(PageError::Banner(ref raw)) if raw.message == "Something broke"
        ));
    }

    // ---- auth page ----

    #[test]
    fn classify_logged_in() {
        let page = parse_auth_page(r#"<a id="_tlogout" href="/?action=logout">Logout</a>"#);
        assert!(matches!(
            page,
            Ok(AuthPage {
                authenticated: true,
                requires_tfa: false
            })
        ));
    }

    #[test]
    fn classify_tfa_prompt() {
        let page = parse_auth_page(r#"<form><input id="tfacode" name="tfacode"></form>"#);
        assert!(matches!(
            page,
            Ok(AuthPage {
                authenticated: false,
                requires_tfa: true
            })
        ));
    }

    // ---- zone list ----

    #[test]
    fn zone_list_without_table_is_empty() {
        let zones = parse_zone_list("<html><body>Welcome</body></html>");
        assert!(matches!(zones, Ok(ref z) if z.is_empty()));
    }

    #[test]
    fn zone_list_reads_forward_and_reverse() {
        let body = r#"
            <table id="domains_table"><tbody>
              <tr><td>example.com</td><td><img name="example.com" value="111"></td></tr>
            </tbody></table>
            <div id="tabs-advanced"><table class="generic_table"><tbody>
              <tr><td>2.0.192.in-addr.arpa</td><td><img name="2.0.192.in-addr.arpa" value="222"></td></tr>
            </tbody></table></div>"#;
        let zones = parse_zone_list(body).unwrap();
        assert_eq!(zones.get("example.com"), Some(&111));
        assert_eq!(zones.get("2.0.192.in-addr.arpa"), Some(&222));
    }

    #[test]
    fn zone_list_rejects_bad_id() {
        let body = r#"<table id="domains_table"><tbody>
              <tr><td><img name="example.com" value="abc"></td></tr>
            </tbody></table>"#;
        assert!(matches!(parse_zone_list(body), Err(PageError::Structure(_))));
    }
}
