//! JSON encoder for structured logging
//!
//! Writes each record as a single-line JSON object (JSONL format), keeping
//! attribute order. Compatible with log aggregation tools like ELK, Loki, etc.

use super::{is_empty_group, Encoder};
use crate::core::{Attr, Result, TimestampFormat, Value};

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonEncoder;

impl Encoder for JsonEncoder {
    fn encode(&self, attrs: &[Attr], buf: &mut Vec<u8>) -> Result<()> {
        write_object(buf, attrs)?;
        buf.push(b'\n');
        Ok(())
    }

    fn name(&self) -> &str {
        "json"
    }
}

fn write_object(buf: &mut Vec<u8>, attrs: &[Attr]) -> Result<()> {
    buf.push(b'{');
    let mut first = true;
    for attr in attrs.iter().filter(|a| !is_empty_group(a)) {
        if !first {
            buf.push(b',');
        }
        first = false;
        serde_json::to_writer(&mut *buf, &attr.key)?;
        buf.push(b':');
        write_value(buf, &attr.value)?;
    }
    buf.push(b'}');
    Ok(())
}

fn write_value(buf: &mut Vec<u8>, value: &Value) -> Result<()> {
    match value {
        Value::Group(children) => write_object(buf, children)?,
        Value::Time(t) => serde_json::to_writer(&mut *buf, &TimestampFormat::Iso8601.format(t))?,
        Value::Source(src) => serde_json::to_writer(&mut *buf, src)?,
        other => serde_json::to_writer(&mut *buf, &other.to_json_value())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attr::{attr, Source};
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::time::Duration;

    fn encode(attrs: &[Attr]) -> String {
        let mut buf = Vec::new();
        JsonEncoder.encode(attrs, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_single_line_object() {
        let t = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).single().expect("valid datetime");
        let line = encode(&[
            attr("time", t),
            attr("level", "ERROR"),
            attr("msg", "Error occurred"),
            attr("latency", Duration::from_micros(2)),
        ]);
        assert!(line.ends_with("}\n"));
        assert_eq!(line.lines().count(), 1);
        assert!(line.starts_with(r#"{"time":"2025-01-08T10:30:45.000Z","level":"ERROR""#));

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["msg"], "Error occurred");
        assert_eq!(parsed["latency"], 2000);
    }

    #[test]
    fn test_nested_groups_and_source() {
        let src = Source {
            file: "user.rs".into(),
            function: "get_user".into(),
            directory: "src/handlers".into(),
            line: 42,
        };
        let line = encode(&[
            attr("source", src),
            Attr::group("req", vec![attr("method", "GET"), Attr::group("hdr", vec![attr("n", 2)])]),
            Attr::group("skipped", vec![]),
        ]);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(
            parsed,
            json!({
                "source": {"file": "user.rs", "function": "get_user", "directory": "src/handlers", "line": 42},
                "req": {"method": "GET", "hdr": {"n": 2}}
            })
        );
    }
}
