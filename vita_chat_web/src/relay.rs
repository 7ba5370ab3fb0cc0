use axum::{extract::State, http::StatusCode, Json};
use session::wire::{ChatRequest, ChatResponse};
use tracing::error;

use std::sync::Arc;

use crate::AppState;

/// Shown to the caller whenever an exchange fails server-side. Failure
/// detail stays in the logs; callers always see the same reply shape.
pub const APOLOGY_REPLY: &str = "Sorry, I encountered an error processing your request.";

/// `POST /api/chat`: forwards one user message to the completion provider.
///
/// The message goes through as-is: emptiness is only gated client-side by
/// the composer, so a direct caller can submit an empty prompt.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> (StatusCode, Json<ChatResponse>) {
    match state.chat.complete(&request.message).await {
        Ok(text) => (StatusCode::OK, Json(ChatResponse::bot(text))),
        Err(err) => {
            error!("chat completion failed: {err}");
            (StatusCode::BAD_REQUEST, Json(ChatResponse::bot(APOLOGY_REPLY)))
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use session::wire::ChatResponse;
    use tower::ServiceExt;

    use std::sync::Arc;

    use super::*;
    use crate::provider::{ChatCompletion, CompletionError};

    struct FixedReply(&'static str);

    #[async_trait]
    impl ChatCompletion for FixedReply {
        async fn complete(&self, _message: &str) -> Result<String, CompletionError> {
            Ok(self.0.to_string())
        }
    }

    struct BrokenProvider;

    #[async_trait]
    impl ChatCompletion for BrokenProvider {
        async fn complete(&self, _message: &str) -> Result<String, CompletionError> {
            Err(CompletionError::Provider {
                status: 401,
                detail: "invalid credentials".to_string(),
            })
        }
    }

    fn app(chat: impl ChatCompletion + Send + Sync + 'static) -> Router {
        crate::router(Arc::new(AppState {
            chat: Box::new(chat),
        }))
    }

    async fn post_chat(app: Router, message: &str) -> (StatusCode, ChatResponse) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({ "message": message }).to_string(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn healthy_exchange_round_trips() {
        let app = app(FixedReply("Ciao! Come posso aiutarti?"));

        let (status, reply) = post_chat(app, "ciao").await;

        assert_eq!(StatusCode::OK, status);
        assert_eq!("bot", reply.kind);
        assert!(!reply.text.is_empty());
    }

    #[tokio::test]
    async fn provider_failure_maps_to_bad_request_apology() {
        let app = app(BrokenProvider);

        let (status, reply) = post_chat(app, "ciao").await;

        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert_eq!(APOLOGY_REPLY, reply.text);
        assert_eq!("bot", reply.kind);
    }

    #[tokio::test]
    async fn consecutive_failures_answer_identically() {
        let (_, first) = post_chat(app(BrokenProvider), "one").await;
        let (_, second) = post_chat(app(BrokenProvider), "two").await;

        assert_eq!(first.text, second.text);
    }

    #[tokio::test]
    async fn empty_message_is_still_forwarded() {
        let app = app(FixedReply("asked about nothing"));

        let (status, reply) = post_chat(app, "").await;

        assert_eq!(StatusCode::OK, status);
        assert_eq!("asked about nothing", reply.text);
    }

    #[tokio::test]
    async fn liveness_route_answers_plain_text() {
        let app = app(FixedReply("unused"));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(StatusCode::OK, response.status());
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert!(!bytes.is_empty());
    }
}
