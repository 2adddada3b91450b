//! Text encoder: space separated `key=value` pairs

use super::{is_empty_group, Encoder};
use crate::core::{Attr, Result, TimestampFormat, Value};

#[derive(Debug, Default, Clone, Copy)]
pub struct TextEncoder;

impl Encoder for TextEncoder {
    fn encode(&self, attrs: &[Attr], buf: &mut Vec<u8>) -> Result<()> {
        let mut line = String::new();
        write_attrs(&mut line, "", attrs);
        line.push('\n');
        buf.extend_from_slice(line.as_bytes());
        Ok(())
    }

    fn name(&self) -> &str {
        "text"
    }
}

fn write_attrs(line: &mut String, prefix: &str, attrs: &[Attr]) {
    for attr in attrs {
        if is_empty_group(attr) {
            continue;
        }
        let key = if prefix.is_empty() {
            attr.key.clone()
        } else {
            format!("{}.{}", prefix, attr.key)
        };

        if let Value::Group(children) = &attr.value {
            write_attrs(line, &key, children);
            continue;
        }

        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&escape_value(&key));
        line.push('=');
        line.push_str(&format_value(&attr.value));
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => escape_value(s),
        Value::Time(t) => TimestampFormat::Iso8601.format(t),
        Value::Any(v) => escape_value(&v.to_string()),
        Value::Source(src) => escape_value(&format!("{}:{}", src.path(), src.line)),
        other => escape_value(&other.to_string()),
    }
}

/// Quote a value if it is empty or contains spaces, `=`, quotes or control
/// characters
fn escape_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c == ' ' || c == '=' || c == '"' || c == '\\' || c.is_control());
    if needs_quotes {
        quote_value(value)
    } else {
        value.to_string()
    }
}

fn quote_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:04x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attr::{attr, Source};
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn encode(attrs: &[Attr]) -> String {
        let mut buf = Vec::new();
        TextEncoder.encode(attrs, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_basic_line() {
        let t = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).single().expect("valid datetime");
        let line = encode(&[
            attr("time", t),
            attr("level", "INFO"),
            attr("msg", "User logged in"),
            attr("user_id", 123),
        ]);
        assert_eq!(
            line,
            "time=2025-01-08T10:30:45.000Z level=INFO msg=\"User logged in\" user_id=123\n"
        );
    }

    #[test]
    fn test_groups_use_dotted_keys() {
        let line = encode(&[
            attr("msg", "done"),
            Attr::group("req", vec![attr("method", "GET"), Attr::group("empty", vec![])]),
            Attr::group("nothing", vec![]),
        ]);
        assert_eq!(line, "msg=done req.method=GET\n");
    }

    #[test]
    fn test_newlines_cannot_inject_lines() {
        let line = encode(&[attr("msg", "login\nERROR fake entry")]);
        assert_eq!(line.lines().count(), 1);
        assert!(line.contains("\\n"));
    }

    #[test]
    fn test_special_values() {
        let src = Source {
            file: "main.rs".into(),
            function: "main".into(),
            directory: "src".into(),
            line: 3,
        };
        let line = encode(&[
            attr("source", src),
            attr("elapsed", Duration::from_millis(1500)),
            attr("query", "id=1"),
            attr("empty", ""),
        ]);
        assert_eq!(line, "source=src/main.rs:3 elapsed=1.5s query=\"id=1\" empty=\"\"\n");
    }
}
