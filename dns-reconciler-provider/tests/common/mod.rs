//! 共享测试工具和控制台页面样本

#![allow(dead_code)]

use std::path::Path;

use dns_reconciler_provider::{HednsCredentials, HednsProvider, Result};
use wiremock::matchers::{body_string_contains, header_regex, method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

pub const ZONE: &str = "example.com";
pub const ZONE_ID: u64 = 1001;
pub const SESSION_COOKIE: &str = "CGISESSID=s3ss10n";
pub const DELEGATION_NOTICE: &str =
    "This zone does not appear to be properly delegated to our nameservers.";

// ============ 页面样本 ============

pub fn login_page() -> String {
    r#"<html><body><div id="content">
         <form name="login" method="post" action="/">
           <input type="text" name="email"><input type="password" name="pass">
           <input type="submit" name="submit" value="Login!">
         </form>
       </div></body></html>"#
        .to_string()
}

pub fn tfa_page() -> String {
    r#"<html><body><div id="content">
         <form method="post" action="/">
           <input type="text" id="tfacode" name="tfacode">
           <input type="submit" name="submit" value="Submit">
         </form>
       </div></body></html>"#
        .to_string()
}

pub fn banner_page(message: &str) -> String {
    format!(r#"<html><body><div id="dns_err">{message}</div><div id="content"></div></body></html>"#)
}

/// 已登录首页，列出 example.com 和一个反向域名
pub fn landing_page() -> String {
    format!(
        r#"<html><body>
           <div id="_tlogout"><a href="/?action=logout">Logout</a></div>
           <table id="domains_table"><tbody>
             <tr><td>{ZONE}</td><td><img alt="edit" name="{ZONE}" value="{ZONE_ID}"></td></tr>
           </tbody></table>
           <div id="tabs-advanced"><table class="generic_table"><tbody>
             <tr><td>2.0.192.in-addr.arpa</td><td><img alt="edit" name="2.0.192.in-addr.arpa" value="1002"></td></tr>
           </tbody></table></div>
         </body></html>"#
    )
}

/// 已登录首页，只有主表格列出的域名；`zones` 为空时不输出 `#domains_table`
pub fn account_page(zones: &[(&str, u64)]) -> String {
    let table = if zones.is_empty() {
        String::new()
    } else {
        let rows: String = zones
            .iter()
            .map(|(name, id)| {
                format!(r#"<tr><td>{name}</td><td><img alt="edit" name="{name}" value="{id}"></td></tr>"#)
            })
            .collect();
        format!(r#"<table id="domains_table"><tbody>{rows}</tbody></table>"#)
    };
    format!(
        r#"<html><body>
           <div id="_tlogout"><a href="/?action=logout">Logout</a></div>
           {table}
         </body></html>"#
    )
}

fn record_row(class: &str, id: u64, rtype: &str, name: &str, ttl: u32, prio: &str, data: &str) -> String {
    format!(
        r#"<tr class="{class}" id="{id}">
             <td class="hidden">{ZONE_ID}</td>
             <td class="hidden">{id}</td>
             <td class="dns_view">{name}</td>
             <td><span class="rrlabel {rtype}" data="{rtype}">{rtype}</span></td>
             <td>{ttl}</td>
             <td>{prio}</td>
             <td data="{data}">{data}</td>
           </tr>"#
    )
}

/// 超长 TXT 的两个片段（255 + 45 字节）
pub fn long_txt_segments() -> (String, String) {
    ("a".repeat(255), "b".repeat(45))
}

/// example.com 的记录页面：SOA、A、MX、HINFO 和一条双片段 TXT
pub fn zone_page() -> String {
    let (first, second) = long_txt_segments();
    let rows = [
        record_row(
            "dns_tr_locked",
            1,
            "SOA",
            ZONE,
            172_800,
            "-",
            "ns1.he.net. hostmaster.he.net. 2024010101 86400 7200 3600000 172800",
        ),
        record_row("dns_tr", 11, "A", "www.example.com", 3600, "-", "192.0.2.1"),
        record_row("dns_tr", 12, "MX", ZONE, 3600, "10", "mail.example.com"),
        record_row("dns_tr", 13, "HINFO", "box.example.com", 3600, "-", "&quot;i386&quot; &quot;Linux&quot;"),
        record_row(
            "dns_tr",
            14,
            "TXT",
            ZONE,
            3600,
            "-",
            &format!("&quot;{first}&quot; &quot;{second}&quot;"),
        ),
    ];
    format!(
        r#"<html><body>
           <div id="_tlogout"><a href="/?action=logout">Logout</a></div>
           <div id="dns_main_content"><table class="generic_table"><tbody>{}</tbody></table></div>
         </body></html>"#,
        rows.concat()
    )
}

// ============ Mock 控制台 ============

pub fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=UTF-8")
        .set_body_string(body)
}

/// 挂载一个标准控制台：
/// - 带会话 Cookie 的首页请求返回已登录页面
/// - 没有 Cookie 时返回登录表单
/// - 密码登录成功并下发会话 Cookie
/// - zone 编辑页面返回 [`zone_page`]
pub async fn mount_console(server: &MockServer) {
    Mock::given(method("GET"))
        .and(query_param("hosted_dns_zoneid", ZONE_ID.to_string()))
        .respond_with(html(zone_page()))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(header_regex("cookie", SESSION_COOKIE))
        .respond_with(html(landing_page()))
        .with_priority(2)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .respond_with(html(login_page()))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("pass="))
        .respond_with(
            html(landing_page()).insert_header("set-cookie", format!("{SESSION_COOKIE}; Path=/")),
        )
        .mount(server)
        .await;
}

/// 变更请求（添加域名、编辑/删除记录）的成功响应
pub fn change_ok() -> ResponseTemplate {
    html(landing_page())
}

pub fn change_with_banner(message: &str) -> ResponseTemplate {
    html(banner_page(message))
}

pub fn credentials() -> HednsCredentials {
    HednsCredentials::new("alice@example.com", "correct horse")
}

pub fn credentials_with_session(dir: &Path) -> HednsCredentials {
    let mut creds = credentials();
    creds.session_file_path = Some(dir.to_path_buf());
    creds
}

pub async fn connect(server: &MockServer, credentials: HednsCredentials) -> Result<HednsProvider> {
    HednsProvider::builder(credentials)
        .endpoint(format!("{}/", server.uri()))
        .build()
        .await
}

/// 已收到的 POST 请求总数
pub async fn post_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .count()
}

/// 已收到的 POST 请求中包含指定片段的数量
pub async fn posts_containing(server: &MockServer, needle: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .filter(|r| String::from_utf8_lossy(&r.body).contains(needle))
        .count()
}
