//! TXT record content helpers
//!
//! TXT data is a list of character-strings, each at most 255 bytes on the wire.
//! In zone-file form every segment is written as a double-quoted field with
//! `\"` and `\\` escapes, separated by a single space.

use crate::error::{ModelError, ModelResult};

/// 单个 TXT 字符串的最大长度（字节）
pub const MAX_TXT_SEGMENT_LEN: usize = 255;

/// 解析引号字段：`"abc" "d\"ef"` -> `["abc", "d\"ef"]`
///
/// 未加引号的片段按空白分隔。空输入返回一个空片段。
pub fn parse_quoted_fields(input: &str) -> ModelResult<Vec<String>> {
    let mut fields = Vec::new();
    let mut chars = input.trim().chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut field = String::new();
        if c == '"' {
            chars.next();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' => match chars.next() {
                        Some(escaped) => field.push(escaped),
                        None => {
                            return Err(ModelError::InvalidQuotedFields(format!(
                                "dangling escape in {input:?}"
                            )));
                        }
                    },
                    '"' => {
                        closed = true;
                        break;
                    }
                    other => field.push(other),
                }
            }
            if !closed {
                return Err(ModelError::InvalidQuotedFields(format!(
                    "unterminated quote in {input:?}"
                )));
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                field.push(c);
                chars.next();
            }
        }
        fields.push(field);
    }

    if fields.is_empty() {
        fields.push(String::new());
    }
    Ok(fields)
}

/// 将片段编码为引号字段
pub fn quote_fields<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| quote_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_field(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 2);
    out.push('"');
    for c in field.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// 将超长字符串拆分为不超过 255 字节的片段（不拆分多字节字符）
pub fn split_long_txt(text: &str) -> Vec<String> {
    if text.len() <= MAX_TXT_SEGMENT_LEN {
        return vec![text.to_string()];
    }

    let mut segments = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let mut end = rest.len().min(MAX_TXT_SEGMENT_LEN);
        while end > 0 && !rest.is_char_boundary(end) {
            end -= 1;
        }
        let (head, tail) = rest.split_at(end);
        segments.push(head.to_string());
        rest = tail;
    }
    segments
}
