//! Typed decoding of chat completion responses.
//!
//! ```
//! let body = r#"{"id":"chatcmpl-1","object":"chat.completion","created":1700000000,
//!     "model":"gpt-4","choices":[{"index":0,"finish_reason":"stop",
//!     "message":{"role":"assistant","content":"Hi there"}}],
//!     "usage":{"prompt_tokens":5,"completion_tokens":2,"total_tokens":7}}"#;
//!
//! let chat = openai_chat_object::decode(body).unwrap();
//! assert_eq!(chat.choices[0].message.content.as_deref(), Some("Hi there"));
//! assert!(chat.choices[0].finish_reason.is_text("stop"));
//! ```

mod chat_completion;
mod decode;
mod error;
mod finish_reason;
mod message;

use std::io::Read;
use std::str::FromStr;

use log::{debug, trace};
use serde_json::Value;

use crate::decode::Decode;
use crate::error::ApiErrorWrapper;

pub use {
    chat_completion::{ChatChoice, ChatCompletionObject, ChatUsage, CHAT_COMPLETION_OBJECT},
    error::{ApiError, DecodeError, DecodeResult, JsonKind, ResponseError, ResponseResult, ROOT},
    finish_reason::FinishReason,
    message::{ChatMessage, FunctionCall, ToolCall, TOOL_TYPE_FUNCTION},
};

/// Decodes a response body.
pub fn decode(body: &str) -> DecodeResult<ChatCompletionObject> {
    trace!("decoding chat completion ({} bytes)", body.len());
    let value: Value = serde_json::from_str(body)?;
    decode_value(&value)
}

pub fn decode_slice(body: &[u8]) -> DecodeResult<ChatCompletionObject> {
    trace!("decoding chat completion ({} bytes)", body.len());
    let value: Value = serde_json::from_slice(body)?;
    decode_value(&value)
}

/// Reads the whole of `reader` before decoding. I/O failures are reported as
/// [`DecodeError::MalformedContainer`] at the root.
pub fn decode_reader<R: Read>(reader: R) -> DecodeResult<ChatCompletionObject> {
    trace!("decoding chat completion from reader");
    let value: Value = serde_json::from_reader(reader)?;
    decode_value(&value)
}

pub fn decode_value(value: &Value) -> DecodeResult<ChatCompletionObject> {
    match ChatCompletionObject::decode(value, ROOT) {
        Ok(chat) => {
            trace!("decoded chat completion {} with {} choice(s)", chat.id, chat.choices.len());
            Ok(chat)
        }
        Err(err) => {
            debug!("chat completion decode failed: {err}");
            Err(err)
        }
    }
}

/// Like [`decode`], but recognises the provider's `{"error": {...}}` body and
/// returns it as [`ResponseError::Api`].
pub fn decode_response(body: &str) -> ResponseResult<ChatCompletionObject> {
    debug!("response: {}", body);
    let value: Value = serde_json::from_str(body).map_err(DecodeError::from)?;
    match decode_value(&value) {
        Ok(chat) => Ok(chat),
        Err(err) => match serde_json::from_value::<ApiErrorWrapper>(value) {
            Ok(wrapper) => {
                debug!("provider returned an error: {}", wrapper.error.message);
                Err(wrapper.error.into())
            }
            Err(_) => Err(err.into()),
        },
    }
}

impl FromStr for ChatCompletionObject {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}
