use serde_json::Value;

use crate::decode::{impl_deserialize, Decode, Fields};
use crate::error::DecodeResult;
use crate::{ChatMessage, FinishReason};

/// Value of `object` on every chat completion.
pub const CHAT_COMPLETION_OBJECT: &str = "chat.completion";

/// A chat completion returned by the model for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletionObject {
    pub id: String,
    /// More than one when the request set `n` above 1.
    pub choices: Vec<ChatChoice>,
    /// Unix timestamp in seconds.
    pub created: i64,
    pub model: String,
    /// Backend configuration the model ran with.
    pub system_fingerprint: Option<String>,
    pub object: String,
    pub usage: ChatUsage,
}

impl ChatCompletionObject {
    const ID: &'static str = "id";
    const CHOICES: &'static str = "choices";
    const CREATED: &'static str = "created";
    const MODEL: &'static str = "model";
    const SYSTEM_FINGERPRINT: &'static str = "system_fingerprint";
    const OBJECT: &'static str = "object";
    const USAGE: &'static str = "usage";

    pub fn first_choice(&self) -> Option<&ChatChoice> {
        self.choices.first()
    }

    /// Looks a choice up by its `index` field rather than its position.
    pub fn choice(&self, index: i64) -> Option<&ChatChoice> {
        self.choices.iter().find(|choice| choice.index == index)
    }

    pub fn is_chat_completion(&self) -> bool {
        self.object == CHAT_COMPLETION_OBJECT
    }
}

impl Decode for ChatCompletionObject {
    fn decode(value: &Value, path: &str) -> DecodeResult<Self> {
        let fields = Fields::of(value, path)?;
        Ok(Self {
            id: fields.required(Self::ID)?,
            choices: fields.required(Self::CHOICES)?,
            created: fields.required(Self::CREATED)?,
            model: fields.required(Self::MODEL)?,
            system_fingerprint: fields.optional(Self::SYSTEM_FINGERPRINT)?,
            object: fields.required(Self::OBJECT)?,
            usage: fields.required(Self::USAGE)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatChoice {
    pub finish_reason: FinishReason,
    pub index: i64,
    pub message: ChatMessage,
}

impl ChatChoice {
    const FINISH_REASON: &'static str = "finish_reason";
    const INDEX: &'static str = "index";
    const MESSAGE: &'static str = "message";
}

impl Decode for ChatChoice {
    fn decode(value: &Value, path: &str) -> DecodeResult<Self> {
        let fields = Fields::of(value, path)?;
        Ok(Self {
            finish_reason: fields.required(Self::FINISH_REASON)?,
            index: fields.required(Self::INDEX)?,
            message: fields.required(Self::MESSAGE)?,
        })
    }
}

/// Token accounting for one request.
///
/// `total_tokens` is taken as sent; it is not checked against the other two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChatUsage {
    pub completion_tokens: i64,
    pub prompt_tokens: i64,
    pub total_tokens: i64,
}

impl ChatUsage {
    const COMPLETION_TOKENS: &'static str = "completion_tokens";
    const PROMPT_TOKENS: &'static str = "prompt_tokens";
    const TOTAL_TOKENS: &'static str = "total_tokens";

    pub fn is_consistent(&self) -> bool {
        self.completion_tokens.checked_add(self.prompt_tokens) == Some(self.total_tokens)
    }
}

impl Decode for ChatUsage {
    fn decode(value: &Value, path: &str) -> DecodeResult<Self> {
        let fields = Fields::of(value, path)?;
        Ok(Self {
            completion_tokens: fields.required(Self::COMPLETION_TOKENS)?,
            prompt_tokens: fields.required(Self::PROMPT_TOKENS)?,
            total_tokens: fields.required(Self::TOTAL_TOKENS)?,
        })
    }
}

impl_deserialize!(ChatCompletionObject, ChatChoice, ChatUsage);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, JsonKind, ROOT};
    use serde_json::json;

    fn choice(index: i64, finish_reason: Value) -> Value {
        json!({
            "index": index,
            "finish_reason": finish_reason,
            "message": { "role": "assistant", "content": format!("answer {index}") }
        })
    }

    fn completion() -> Value {
        json!({
            "id": "chatcmpl-42",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "gpt-4",
            "system_fingerprint": "fp_44709d6fcb",
            "choices": [choice(0, json!("stop")), choice(1, json!("length"))],
            "usage": { "prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21 }
        })
    }

    #[test]
    fn decodes_every_field() {
        let chat = ChatCompletionObject::decode(&completion(), ROOT).unwrap();
        assert_eq!(chat.id, "chatcmpl-42");
        assert_eq!(chat.object, CHAT_COMPLETION_OBJECT);
        assert!(chat.is_chat_completion());
        assert_eq!(chat.created, 1_700_000_000);
        assert_eq!(chat.model, "gpt-4");
        assert_eq!(chat.system_fingerprint.as_deref(), Some("fp_44709d6fcb"));
        assert_eq!(chat.choices.len(), 2);
        assert_eq!(chat.choices[1].index, 1);
        assert!(chat.choices[1].finish_reason.is_text("length"));
        assert_eq!(chat.choices[1].message.content.as_deref(), Some("answer 1"));
        assert_eq!(
            chat.usage,
            ChatUsage {
                completion_tokens: 12,
                prompt_tokens: 9,
                total_tokens: 21,
            }
        );
    }

    #[test]
    fn choice_lookup_uses_the_index_field() {
        let mut value = completion();
        value["choices"] = json!([choice(1, json!("stop")), choice(0, json!(0))]);
        let chat = ChatCompletionObject::decode(&value, ROOT).unwrap();
        assert_eq!(chat.first_choice().map(|c| c.index), Some(1));
        assert_eq!(
            chat.choice(0).map(|c| &c.finish_reason),
            Some(&FinishReason::Integer(0))
        );
        assert!(chat.choice(5).is_none());
    }

    #[test]
    fn missing_usage_counter_names_its_path() {
        let mut value = completion();
        value["usage"].as_object_mut().unwrap().remove("total_tokens");
        assert_eq!(
            ChatCompletionObject::decode(&value, ROOT).unwrap_err(),
            DecodeError::MissingField {
                path: "usage.total_tokens".to_string()
            }
        );
    }

    #[test]
    fn bad_choice_fails_the_whole_completion() {
        let mut value = completion();
        value["choices"][1]["index"] = json!("1");
        assert_eq!(
            ChatCompletionObject::decode(&value, ROOT).unwrap_err(),
            DecodeError::TypeMismatch {
                path: "choices[1].index".to_string(),
                expected: "integer",
                actual: JsonKind::String,
            }
        );
    }

    #[test]
    fn usage_sum_is_reported_not_enforced() {
        let mut value = completion();
        value["usage"]["total_tokens"] = json!(100);
        let chat = ChatCompletionObject::decode(&value, ROOT).unwrap();
        assert_eq!(chat.usage.total_tokens, 100);
        assert!(!chat.usage.is_consistent());

        let usage = ChatUsage {
            completion_tokens: 2,
            prompt_tokens: 5,
            total_tokens: 7,
        };
        assert!(usage.is_consistent());
    }

    #[test]
    fn integers_are_taken_as_sent() {
        let mut value = completion();
        value["usage"]["completion_tokens"] = json!(-1);
        value["choices"][0]["index"] = json!(4_294_967_296u64);
        let chat = ChatCompletionObject::decode(&value, ROOT).unwrap();
        assert_eq!(chat.usage.completion_tokens, -1);
        assert_eq!(chat.choices[0].index, 4_294_967_296);
        assert!(chat.choice(4_294_967_296).is_some());
    }

    #[test]
    fn object_literal_is_not_checked() {
        let mut value = completion();
        value["object"] = json!("chat.completion.chunk");
        let chat = ChatCompletionObject::decode(&value, ROOT).unwrap();
        assert!(!chat.is_chat_completion());
    }
}
