// Interpretation API server - Axum HTTP front for the LLM stage

pub mod routes;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::core::services::Interpreter;
use crate::error::{InterpretationError, LyricsError, Result, VerseenError};

/// Shared, read-only state for request handlers
pub struct AppState {
    pub interpreter: Arc<dyn Interpreter>,
}

pub fn make_app(interpreter: Arc<dyn Interpreter>) -> Router {
    let state = Arc::new(AppState { interpreter });

    Router::new()
        .nest("/verseen", routes::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C or SIGTERM
pub async fn run_server(interpreter: Arc<dyn Interpreter>, bind_address: &str) -> Result<()> {
    let listener = TcpListener::bind(bind_address).await?;
    info!("Interpretation API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, make_app(interpreter))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Graceful shutdown requested");
}

impl VerseenError {
    fn status_code(&self) -> StatusCode {
        match self {
            VerseenError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            VerseenError::Interpretation(err) if err.upstream_status() == Some(429) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            VerseenError::Interpretation(InterpretationError::InterpretationServiceError { .. })
            | VerseenError::Interpretation(InterpretationError::MalformedToolResponse(_)) => {
                StatusCode::BAD_GATEWAY
            }
            VerseenError::Lyrics(LyricsError::RequestTimeout) => StatusCode::GATEWAY_TIMEOUT,
            VerseenError::Search(_) | VerseenError::Lyrics(_) => StatusCode::BAD_GATEWAY,
            VerseenError::Config(_) | VerseenError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for VerseenError {
    fn from(rejection: JsonRejection) -> Self {
        VerseenError::Validation(rejection.body_text())
    }
}

impl IntoResponse for VerseenError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::Interpretation;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use serde_json::Value;
    use std::sync::Mutex;
    use tower::ServiceExt;

    enum Outcome {
        Interpreted(&'static str),
        Declined,
        Upstream(u16),
        Malformed,
    }

    struct StubInterpreter {
        outcome: Outcome,
        calls: Mutex<Vec<(String, Option<String>)>>,
    }

    impl StubInterpreter {
        fn new(outcome: Outcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Interpreter for StubInterpreter {
        async fn interpret(
            &self,
            lyrics: &str,
            artist: Option<&str>,
        ) -> std::result::Result<Option<Interpretation>, InterpretationError> {
            self.calls
                .lock()
                .unwrap()
                .push((lyrics.to_string(), artist.map(str::to_string)));

            match self.outcome {
                Outcome::Interpreted(text) => Ok(Some(Interpretation {
                    interpretation: text.to_string(),
                })),
                Outcome::Declined => Ok(None),
                Outcome::Upstream(status) => Err(InterpretationError::InterpretationServiceError {
                    status: Some(status),
                    reason: "upstream said no".to_string(),
                }),
                Outcome::Malformed => Err(InterpretationError::MalformedToolResponse(
                    serde_json::from_str::<Value>("{oops").unwrap_err(),
                )),
            }
        }
    }

    fn interpret_request(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/verseen/interpret")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(stub: Arc<StubInterpreter>, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = make_app(stub).oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_interpret_ok() {
        let stub = StubInterpreter::new(Outcome::Interpreted(
            "A song about accepting a partner without judging their past.",
        ));

        let (status, body) = send(
            stub.clone(),
            interpret_request(
                r#"{"artist": " Hozier ", "lyrics": "Honey just put your sweet lips on my lips"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            json!({"interpretation": "A song about accepting a partner without judging their past."})
        );

        let calls = stub.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "Honey just put your sweet lips on my lips");
        assert_eq!(calls[0].1.as_deref(), Some("Hozier"));
    }

    #[tokio::test]
    async fn test_artist_is_optional() {
        let stub = StubInterpreter::new(Outcome::Interpreted("ok"));

        let (status, _) = send(stub.clone(), interpret_request(r#"{"lyrics": "la la la"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(stub.calls.lock().unwrap()[0].1, None);
    }

    #[tokio::test]
    async fn test_declined_interpretation_is_no_content() {
        let stub = StubInterpreter::new(Outcome::Declined);

        let (status, body) = send(stub, interpret_request(r#"{"lyrics": "la la la"}"#)).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_blank_lyrics_rejected_without_upstream_call() {
        let stub = StubInterpreter::new(Outcome::Interpreted("unused"));

        let (status, body) = send(stub.clone(), interpret_request(r#"{"lyrics": "  \n "}"#)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("lyrics must not be empty"));
        assert!(stub.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_lyrics_field_rejected() {
        let stub = StubInterpreter::new(Outcome::Interpreted("unused"));

        let (status, _) = send(stub, interpret_request(r#"{"artist": "Hozier"}"#)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_bad_payloads_use_json_error_body() {
        let missing_field = interpret_request(r#"{"artist": "Hozier"}"#);
        let broken_json = interpret_request(r#"{"lyrics": "#);
        let plain_text = Request::builder()
            .method(Method::POST)
            .uri("/verseen/interpret")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("Honey just put your sweet lips on my lips"))
            .unwrap();

        for request in [missing_field, broken_json, plain_text] {
            let stub = StubInterpreter::new(Outcome::Interpreted("unused"));
            let (status, body) = send(stub.clone(), request).await;

            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            let json: Value = serde_json::from_slice(&body).unwrap();
            assert!(json["error"].as_str().unwrap().starts_with("Validation error: "));
            assert!(stub.calls.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_upstream_errors_map_to_gateway_statuses() {
        let (status, _) = send(
            StubInterpreter::new(Outcome::Upstream(401)),
            interpret_request(r#"{"lyrics": "la"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let (status, _) = send(
            StubInterpreter::new(Outcome::Upstream(429)),
            interpret_request(r#"{"lyrics": "la"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, body) = send(
            StubInterpreter::new(Outcome::Malformed),
            interpret_request(r#"{"lyrics": "la"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("Malformed tool response"));
    }

    #[tokio::test]
    async fn test_only_post_interpret_is_routed() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/verseen/interpret")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(StubInterpreter::new(Outcome::Declined), request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let (status, _) = send(
            StubInterpreter::new(Outcome::Declined),
            Request::builder()
                .method(Method::POST)
                .uri("/interpret")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"lyrics": "la"}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_pipeline_errors_have_distinct_statuses() {
        assert_eq!(
            VerseenError::Lyrics(LyricsError::RequestTimeout).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            VerseenError::Lyrics(LyricsError::LyricsContainerNotFound).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            VerseenError::Config(crate::error::ConfigError::MissingField {
                field: "GROQ_API_KEY".to_string()
            })
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
