//! Record encoders
//!
//! An encoder turns the final, already rewritten attribute list of one
//! record into a single output line. Built-in attributes come first (time,
//! level, source, msg) followed by user attributes; `Group` values nest.

pub mod json;
pub mod text;

use crate::core::{Attr, Result};
use serde::{Deserialize, Serialize};

pub use json::JsonEncoder;
pub use text::TextEncoder;

/// Output encoding selected by the config
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    /// `key=value` pairs (default)
    ///
    /// Example: `time=2025-01-08T10:30:45.123Z level=INFO msg="request done" status=200`
    #[default]
    Text,

    /// One JSON object per line
    ///
    /// Example: `{"time":"2025-01-08T10:30:45.123Z","level":"INFO","msg":"request done","status":200}`
    Json,
}

impl Encoding {
    pub fn encoder(&self) -> &'static dyn Encoder {
        static TEXT: TextEncoder = TextEncoder;
        static JSON: JsonEncoder = JsonEncoder;
        match self {
            Encoding::Text => &TEXT,
            Encoding::Json => &JSON,
        }
    }
}

pub trait Encoder: Send + Sync {
    /// Append one newline-terminated line for `attrs` to `buf`
    fn encode(&self, attrs: &[Attr], buf: &mut Vec<u8>) -> Result<()>;
    fn name(&self) -> &str;
}

/// Groups with no attributes are left out of the output
pub(crate) fn is_empty_group(attr: &Attr) -> bool {
    matches!(&attr.value, crate::core::Value::Group(attrs) if attrs.iter().all(is_empty_group))
}
