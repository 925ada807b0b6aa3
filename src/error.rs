use std::fmt;

use serde_derive::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub type DecodeResult<T> = Result<T, DecodeError>;
pub type ResponseResult<T> = Result<T, ResponseError>;

/// Path of the document root in error messages.
pub const ROOT: &str = "$";

/// Why a payload could not be turned into a record.
///
/// Paths are written with wire keys, e.g. `choices[0].message.role`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("missing field `{path}`")]
    MissingField { path: String },
    #[error("invalid type at `{path}`: expected {expected}, found {actual}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: JsonKind,
    },
    #[error("malformed json at `{path}`: {detail}")]
    MalformedContainer { path: String, detail: String },
}

impl DecodeError {
    pub fn path(&self) -> &str {
        match self {
            DecodeError::MissingField { path }
            | DecodeError::TypeMismatch { path, .. }
            | DecodeError::MalformedContainer { path, .. } => path,
        }
    }

    pub(crate) fn missing(path: impl Into<String>) -> Self {
        DecodeError::MissingField { path: path.into() }
    }

    pub(crate) fn mismatch(path: impl Into<String>, expected: &'static str, found: &Value) -> Self {
        DecodeError::TypeMismatch {
            path: path.into(),
            expected,
            actual: JsonKind::of(found),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::MalformedContainer {
            path: ROOT.to_string(),
            detail: err.to_string(),
        }
    }
}

/// The shape of a JSON value, as reported in [`DecodeError::TypeMismatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => JsonKind::Integer,
            Value::Number(_) => JsonKind::Number,
            Value::String(_) => JsonKind::String,
            Value::Array(_) => JsonKind::Array,
            Value::Object(_) => JsonKind::Object,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JsonKind::Null => "null",
            JsonKind::Boolean => "boolean",
            JsonKind::Integer => "integer",
            JsonKind::Number => "number",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error body sent by the provider instead of a completion.
#[derive(Error, Debug, Clone, PartialEq, Deserialize)]
#[error("api error: {message}")]
pub struct ApiError {
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub param: Option<String>,
    // strings from openai, integers from some compatible providers
    #[serde(default)]
    pub code: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorWrapper {
    pub error: ApiError,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResponseError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("unexpected response shape: {0}")]
    Decode(#[from] DecodeError),
}
