use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Reply payload from the relay. `kind` is always `"bot"` for
/// server-constructed replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ChatResponse {
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: "bot".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_serializes_with_type_field() {
        let json = serde_json::to_value(ChatResponse::bot("ciao")).unwrap();
        assert_eq!(serde_json::json!({ "text": "ciao", "type": "bot" }), json);
    }

    #[test]
    fn request_round_trips() {
        let request: ChatRequest = serde_json::from_str(r#"{"message":"ciao"}"#).unwrap();
        assert_eq!("ciao", request.message);
    }
}
