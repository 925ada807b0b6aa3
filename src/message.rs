use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::decode::{impl_deserialize, Decode, Fields};
use crate::error::DecodeResult;

/// The only tool type the api currently knows about.
pub const TOOL_TYPE_FUNCTION: &str = "function";

/// A message generated by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCall>>,
    #[deprecated(note = "replaced by `tool_calls`")]
    pub function_call: Option<FunctionCall>,
    pub role: String,
}

impl ChatMessage {
    const CONTENT: &'static str = "content";
    const TOOL_CALLS: &'static str = "tool_calls";
    const FUNCTION_CALL: &'static str = "function_call";
    const ROLE: &'static str = "role";

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls().is_empty()
    }

    /// The tool calls, empty when the model made none.
    pub fn tool_calls(&self) -> &[ToolCall] {
        self.tool_calls.as_deref().unwrap_or_default()
    }
}

impl Decode for ChatMessage {
    #[allow(deprecated)]
    fn decode(value: &Value, path: &str) -> DecodeResult<Self> {
        let fields = Fields::of(value, path)?;
        Ok(Self {
            content: fields.optional(Self::CONTENT)?,
            tool_calls: fields.optional(Self::TOOL_CALLS)?,
            function_call: fields.optional(Self::FUNCTION_CALL)?,
            role: fields.required(Self::ROLE)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub id: Option<String>,
    /// Wire key `type`.
    pub kind: Option<String>,
    pub function: FunctionCall,
}

impl ToolCall {
    const ID: &'static str = "id";
    const TYPE: &'static str = "type";
    const FUNCTION: &'static str = "function";

    pub fn new(id: impl Into<String>, function: FunctionCall) -> Self {
        Self {
            id: Some(id.into()),
            kind: Some(TOOL_TYPE_FUNCTION.to_string()),
            function,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

impl Decode for ToolCall {
    fn decode(value: &Value, path: &str) -> DecodeResult<Self> {
        let fields = Fields::of(value, path)?;
        Ok(Self {
            id: fields.optional(Self::ID)?,
            kind: fields.optional(Self::TYPE)?,
            function: fields.required(Self::FUNCTION)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub name: String,
    /// Raw JSON text as produced by the model. It is not guaranteed to be
    /// valid JSON or to match the function's schema.
    pub arguments: String,
}

impl FunctionCall {
    const NAME: &'static str = "name";
    const ARGUMENTS: &'static str = "arguments";

    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    pub fn parse_arguments<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.arguments)
    }
}

impl Decode for FunctionCall {
    fn decode(value: &Value, path: &str) -> DecodeResult<Self> {
        let fields = Fields::of(value, path)?;
        Ok(Self {
            name: fields.required(Self::NAME)?,
            arguments: fields.required(Self::ARGUMENTS)?,
        })
    }
}

impl_deserialize!(ChatMessage, ToolCall, FunctionCall);
