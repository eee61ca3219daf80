// ==========================================
// 配方导入系统 - CSV 分词器
// ==========================================
// 职责: 文本解码、记录切分、单行字段切分
// 规则: 双引号转义（"" → "），引号内逗号/换行为字面字符
// 说明: 不做 trim，清洗交给字段映射
// ==========================================

use crate::domain::recipe::RawRow;

const BOM: char = '\u{feff}';

/// 将上传字节解码为文本（UTF-8 容错解码 + 去除 BOM）
pub fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix(BOM).unwrap_or(&text).to_string()
}

/// 将一行文本切分为有序字段
///
/// # 说明
/// - 行尾仍处于引号内时不报错，剩余部分按字面内容处理
/// - 空行返回单个空字段，由上游过滤
pub fn tokenize_line(line: &str) -> RawRow {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    fields.push(current);
    fields
}

/// 按换行切分记录（引号内的换行保留在同一条记录中）
///
/// 同时接受 `\n` 与 `\r\n`；记录末尾的 `\r` 会被去掉。
/// 只有字段开头的 `"` 才开启引号区，字段中间的 `"` 按普通字符处理，不会跨行吞并后续记录
pub fn split_records(text: &str) -> Vec<&str> {
    let mut records = Vec::new();
    let mut in_quotes = false;
    let mut field_start = true;
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if in_quotes {
            if c == '"' {
                if matches!(chars.peek(), Some((_, '"'))) {
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }

        match c {
            '"' if field_start => {
                in_quotes = true;
                field_start = false;
            }
            ',' => field_start = true,
            '\n' => {
                records.push(trim_cr(&text[start..idx]));
                start = idx + 1;
                field_start = true;
            }
            _ => field_start = false,
        }
    }

    if start < text.len() {
        records.push(trim_cr(&text[start..]));
    }

    records
}

fn trim_cr(record: &str) -> &str {
    record.strip_suffix('\r').unwrap_or(record)
}

/// 解析整段 CSV 文本: 切分记录、过滤空白记录、逐条分词
pub fn tokenize_text(text: &str) -> Vec<RawRow> {
    split_records(text)
        .into_iter()
        .filter(|record| !record.trim().is_empty())
        .map(tokenize_line)
        .collect()
}
