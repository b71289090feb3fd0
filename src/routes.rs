use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream::{self, BoxStream, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::chain::ChainInput;
use crate::error::ApiError;
use crate::state::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health_check))
        .merge(chain_routes("/chain"))
}

/// Register the chain's route family under `path`: invoke, batch, stream,
/// and the input/output schemas.
pub fn chain_routes(path: &str) -> Router<AppState> {
    Router::new()
        .route(&format!("{path}/invoke"), post(invoke_chain))
        .route(&format!("{path}/batch"), post(batch_chain))
        .route(&format!("{path}/stream"), post(stream_chain))
        .route(&format!("{path}/input_schema"), get(input_schema))
        .route(&format!("{path}/output_schema"), get(output_schema))
}

#[derive(Debug, Deserialize)]
struct BatchRequest {
    inputs: Vec<ChainInput>,
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model": state.config.groq.model,
    }))
}

async fn invoke_chain(
    State(state): State<AppState>,
    Json(input): Json<ChainInput>,
) -> Result<Json<Value>, ApiError> {
    let output = state.chain.invoke(&input).await?;
    Ok(Json(json!({ "output": output })))
}

async fn batch_chain(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<Value>, ApiError> {
    let outputs = state.chain.batch(&request.inputs).await?;
    Ok(Json(json!({ "outputs": outputs })))
}

async fn stream_chain(
    State(state): State<AppState>,
    Json(input): Json<ChainInput>,
) -> Result<Sse<BoxStream<'static, Result<Event, Infallible>>>, ApiError> {
    let chunks = state.chain.stream(&input).await?;
    let events = chunks
        .map(|chunk| Ok(Event::default().event("data").data(chunk)))
        .chain(stream::once(async { Ok(Event::default().event("end")) }))
        .boxed();
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

async fn input_schema() -> Json<Value> {
    Json(json!({
        "title": "ChainInput",
        "type": "object",
        "properties": {
            "language": { "title": "Language", "type": "string" },
            "text": { "title": "Text", "type": "string" }
        },
        "required": ["language", "text"]
    }))
}

async fn output_schema() -> Json<Value> {
    Json(json!({
        "title": "ChainOutput",
        "type": "string"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::translation_chain;
    use crate::config::Config;
    use crate::llm::{ChatChoice, ChatCompletion, ChatMessage, ChatModel};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Replies with a fixed string, or echoes the user message when no
    /// reply is configured.
    struct StubModel {
        reply: Option<String>,
    }

    #[async_trait]
    impl ChatModel for StubModel {
        async fn chat_completion(
            &self,
            messages: Vec<ChatMessage>,
        ) -> anyhow::Result<ChatCompletion> {
            let content = self
                .reply
                .clone()
                .unwrap_or_else(|| messages[0].content.clone());
            Ok(ChatCompletion {
                id: None,
                model: None,
                choices: vec![ChatChoice {
                    message: ChatMessage::new("assistant", content),
                    finish_reason: Some("stop".to_string()),
                }],
                usage: None,
            })
        }
    }

    fn app(reply: Option<&str>) -> Router {
        let model = Arc::new(StubModel {
            reply: reply.map(str::to_string),
        });
        let state = AppState {
            config: Config::default(),
            chain: Arc::new(translation_chain(model)),
        };
        create_routes().with_state(state)
    }

    fn json_post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn invoke_returns_translated_output() {
        let request = json_post(
            "/chain/invoke",
            json!({ "language": "French", "text": "Hello" }),
        );
        let response = app(Some("Bonjour")).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["output"], "Bonjour");
    }

    #[tokio::test]
    async fn invoke_rejects_missing_text_field() {
        let request = json_post("/chain/invoke", json!({ "language": "French" }));
        let response = app(Some("Bonjour")).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn batch_preserves_input_order() {
        let request = json_post(
            "/chain/batch",
            json!({ "inputs": [
                { "language": "French", "text": "one" },
                { "language": "German", "text": "two" }
            ]}),
        );
        let response = app(None).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["outputs"], json!(["one", "two"]));
    }

    #[tokio::test]
    async fn stream_responds_with_event_stream() {
        let request = json_post(
            "/chain/stream",
            json!({ "language": "French", "text": "Hello" }),
        );
        let response = app(Some("Bonjour tout le monde")).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/event-stream"));

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(body.contains("Bonjour"));
        assert!(body.contains("event: end"));
    }

    #[tokio::test]
    async fn input_schema_names_required_fields() {
        let request = Request::builder()
            .uri("/chain/input_schema")
            .body(Body::empty())
            .unwrap();
        let response = app(None).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["required"], json!(["language", "text"]));
    }

    #[tokio::test]
    async fn output_schema_is_a_plain_string() {
        let request = Request::builder()
            .uri("/chain/output_schema")
            .body(Body::empty())
            .unwrap();
        let response = app(None).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["type"], "string");
    }

    #[tokio::test]
    async fn health_check_reports_ok() {
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = app(None).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }
}
