use std::fmt;

use serde_json::Value;

use crate::decode::{impl_deserialize, Decode};
use crate::error::{DecodeError, DecodeResult};

/// Why the model stopped generating.
///
/// Providers have sent this both as a string (`"stop"`, `"length"`,
/// `"content_filter"`, `"tool_calls"`, `"function_call"`, ...) and as an
/// integer code, so whichever form arrived is kept as is. `i128` holds any
/// integer JSON can carry, signed or unsigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FinishReason {
    Integer(i128),
    Text(String),
}

impl FinishReason {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FinishReason::Text(text) => Some(text),
            FinishReason::Integer(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i128> {
        match self {
            FinishReason::Integer(code) => Some(*code),
            FinishReason::Text(_) => None,
        }
    }

    /// True only for the textual form equal to `reason`.
    pub fn is_text(&self, reason: &str) -> bool {
        self.as_text() == Some(reason)
    }
}

impl Decode for FinishReason {
    fn decode(value: &Value, path: &str) -> DecodeResult<Self> {
        match value {
            Value::String(text) => Ok(FinishReason::Text(text.clone())),
            Value::Number(n) => n
                .as_i64()
                .map(i128::from)
                .or_else(|| n.as_u64().map(i128::from))
                .map(FinishReason::Integer)
                .ok_or_else(|| DecodeError::mismatch(path, "integer or string", value)),
            other => Err(DecodeError::mismatch(path, "integer or string", other)),
        }
    }
}

impl_deserialize!(FinishReason);

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinishReason::Integer(code) => write!(f, "{code}"),
            FinishReason::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for FinishReason {
    fn from(code: i64) -> Self {
        FinishReason::Integer(code.into())
    }
}

impl From<u64> for FinishReason {
    fn from(code: u64) -> Self {
        FinishReason::Integer(code.into())
    }
}

impl From<&str> for FinishReason {
    fn from(text: &str) -> Self {
        FinishReason::Text(text.to_string())
    }
}

impl From<String> for FinishReason {
    fn from(text: String) -> Self {
        FinishReason::Text(text)
    }
}
