//! カンマ区切りテキストの読み書き
//!
//! 認識ログはJSONをそのまま列に埋め込むため、引用符付きフィールド内の
//! カンマ・改行・二重引用符（`""`）を扱う必要がある。

use std::borrow::Cow;

/// テキスト全体をレコード（フィールド列）に分割
///
/// 空行は読み飛ばす。閉じていない引用符は末尾までを1フィールドとして扱う。
/// 引用符はフィールド先頭にあるときだけ囲みとみなし、途中の `"` は文字として残す。
pub fn parse_records(content: &str) -> Vec<Vec<String>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                at_field_start = true;
            }
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
                at_field_start = true;
            }
            _ => {
                field.push(c);
                at_field_start = false;
            }
        }
    }

    // 最後のレコード（末尾改行なし）
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }

    records
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    let blank = record.len() == 1 && record[0].trim().is_empty();
    if !blank {
        records.push(record);
    }
}

/// 必要な場合のみ引用符で囲む
pub fn escape_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// 1行分を組み立てる（改行付き）
pub fn format_line(fields: &[&str]) -> String {
    let mut line = fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_records() {
        let records = parse_records("a,b,c\n1,2,3\n");
        assert_eq!(records, vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn test_parse_embedded_json_payload() {
        let content = "1700000000000,cam1,\"{\"\"licensePlateResult\"\":{\"\"plateText\"\":\"\"AB 123\"\"}}\"\r\n";
        let records = parse_records(content);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].len(), 3);
        assert_eq!(records[0][0], "1700000000000");
        assert_eq!(
            records[0][2],
            r#"{"licensePlateResult":{"plateText":"AB 123"}}"#
        );
    }

    #[test]
    fn test_parse_unquoted_json_payload_keeps_quotes() {
        let content = "1700000000000,{\"licensePlateResult\":{\"plateText\":\"AB123\"}}\n";
        let records = parse_records(content);
        assert_eq!(
            records,
            vec![vec!["1700000000000", r#"{"licensePlateResult":{"plateText":"AB123"}}"#]]
        );
    }

    #[test]
    fn test_quote_after_text_is_literal() {
        let records = parse_records("ab\"c,\"d,e\"\n");
        assert_eq!(records, vec![vec!["ab\"c", "d,e"]]);
    }

    #[test]
    fn test_parse_quoted_newline_and_blank_lines() {
        let content = "\n\"x\ny\",z\n\n  \nlast";
        let records = parse_records(content);
        assert_eq!(records, vec![vec!["x\ny", "z"], vec!["last"]]);
    }

    #[test]
    fn test_parse_strips_bom_and_keeps_empty_fields() {
        let records = parse_records("\u{feff}1,,3");
        assert_eq!(records, vec![vec!["1", "", "3"]]);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        let records = parse_records("1,\"abc,def");
        assert_eq!(records, vec![vec!["1", "abc,def"]]);
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_format_line_roundtrips_through_parser() {
        let line = format_line(&["2023-11-14 22:13:20 UTC", "Smith, J", "PossibleTypo (AB123)"]);
        let records = parse_records(&line);
        assert_eq!(
            records,
            vec![vec!["2023-11-14 22:13:20 UTC", "Smith, J", "PossibleTypo (AB123)"]]
        );
    }
}
