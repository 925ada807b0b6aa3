use serde_json::{Map, Value};

use crate::error::{DecodeError, DecodeResult, ROOT};

/// Builds a record out of an already parsed JSON value.
///
/// `path` is where `value` sits in the document and is only used for errors.
pub(crate) trait Decode: Sized {
    fn decode(value: &Value, path: &str) -> DecodeResult<Self>;
}

pub(crate) fn child_path(parent: &str, key: &str) -> String {
    if parent == ROOT {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

/// Keyed access to one JSON object while decoding a record.
pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: &'a str,
}

impl<'a> Fields<'a> {
    pub fn of(value: &'a Value, path: &'a str) -> DecodeResult<Self> {
        match value {
            Value::Object(map) => Ok(Self { map, path }),
            other => Err(DecodeError::mismatch(path, "object", other)),
        }
    }

    pub fn required<T: Decode>(&self, key: &str) -> DecodeResult<T> {
        let path = child_path(self.path, key);
        match self.map.get(key) {
            Some(value) => T::decode(value, &path),
            None => Err(DecodeError::missing(path)),
        }
    }

    /// Absent and `null` both decode to `None`.
    pub fn optional<T: Decode>(&self, key: &str) -> DecodeResult<Option<T>> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::decode(value, &child_path(self.path, key)).map(Some),
        }
    }
}

impl Decode for String {
    fn decode(value: &Value, path: &str) -> DecodeResult<Self> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(DecodeError::mismatch(path, "string", other)),
        }
    }
}

impl Decode for i64 {
    fn decode(value: &Value, path: &str) -> DecodeResult<Self> {
        match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => n
                .as_i64()
                .ok_or_else(|| DecodeError::mismatch(path, "integer in i64 range", value)),
            other => Err(DecodeError::mismatch(path, "integer", other)),
        }
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(value: &Value, path: &str) -> DecodeResult<Self> {
        match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| T::decode(item, &index_path(path, i)))
                .collect(),
            other => Err(DecodeError::mismatch(path, "array", other)),
        }
    }
}

/// Lets a record be used with self-describing serde formats by buffering it
/// as a `serde_json::Value` and running the record's own decoder. Paths in
/// the resulting error are relative to the record, not to any outer type.
macro_rules! impl_deserialize {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl<'de> serde::Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: serde::Deserializer<'de>,
                {
                    let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                    <$ty as $crate::decode::Decode>::decode(&value, $crate::error::ROOT)
                        .map_err(serde::de::Error::custom)
                }
            }
        )+
    };
}

pub(crate) use impl_deserialize;
