//! HTTP gateway — `POST /api/generate`, `POST /api/simulate`, `GET /health`.
//!
//! Startup sequence:
//! 1. Build the generation service (descriptors + HTTP client) from config
//! 2. Build the router (JSON bodies, permissive CORS)
//! 3. Bind and serve until Ctrl+C / SIGTERM

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info, warn};

use diagramgen_core::config::Config;
use diagramgen_core::types::{
    CodeResponse, ErrorResponse, GenerateRequest, HealthResponse, SimulateRequest,
};
use diagramgen_providers::{
    DiagramGenerator, GenerationError, GenerationRequest, GenerationService, ProviderId,
};

use crate::simulate::simulate;

// ─────────────────────────────────────────────
// State & router
// ─────────────────────────────────────────────

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    generator: Arc<dyn DiagramGenerator>,
}

/// Build the HTTP router around a generator.
pub fn router(generator: Arc<dyn DiagramGenerator>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/generate", post(generate_handler))
        .route("/api/simulate", post(simulate_handler))
        .layer(CorsLayer::permissive())
        .with_state(AppState { generator })
}

/// Run the gateway until a shutdown signal arrives.
pub async fn run(config: &Config) -> Result<()> {
    let service = GenerationService::new(&config.providers)
        .context("Failed to initialize providers")?;
    let app = router(Arc::new(service));

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

// ─────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────

/// A [`GenerationError`] rendered as an HTTP response.
pub struct ApiError(GenerationError);

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = if self.0.is_client_error() {
            (StatusCode::BAD_REQUEST, ErrorResponse::message(self.0.summary()))
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_details(self.0.summary(), self.0.details()),
            )
        };
        (status, Json(body)).into_response()
    }
}

// ─────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn generate_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<CodeResponse>, ApiError> {
    // An unreadable body carries no provider, so it takes the unknown-provider path.
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!(reason = %rejection.body_text(), "Rejected generate request body");
            GenerateRequest::default()
        }
    };

    debug!(
        provider = ?body.provider,
        text_chars = body.text.len(),
        "Received generate request"
    );

    let provider: ProviderId = match body.provider_name().unwrap_or_default().parse() {
        Ok(id) => id,
        Err(e) => {
            warn!(provider = ?body.provider, "Invalid provider");
            return Err(ApiError(e));
        }
    };

    let request = GenerationRequest::new(provider, body.text);
    let code = state.generator.generate(&request).await?;

    Ok(Json(CodeResponse::new(code)))
}

async fn simulate_handler(Json(body): Json<SimulateRequest>) -> Json<CodeResponse> {
    info!(text = %body.text, "Simulation request");
    Json(CodeResponse::new(simulate(&body.text)))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use diagramgen_core::config::{ProviderConfig, ProvidersConfig};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Generator that counts calls and answers from a fixed result.
    struct StubGenerator {
        calls: AtomicUsize,
        answer: fn() -> Result<String, GenerationError>,
    }

    #[async_trait]
    impl DiagramGenerator for StubGenerator {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.answer)()
        }

        fn providers(&self) -> Vec<ProviderId> {
            ProviderId::ALL.to_vec()
        }
    }

    fn live_service(api_base: &str) -> Arc<GenerationService> {
        let config = ProvidersConfig {
            deepseek: ProviderConfig {
                api_key: "ds-key".into(),
                api_base: Some(api_base.to_string()),
                ..ProviderConfig::default()
            },
            gemini: ProviderConfig {
                api_key: "g-key".into(),
                api_base: Some(api_base.to_string()),
                ..ProviderConfig::default()
            },
        };
        Arc::new(GenerationService::new(&config).unwrap())
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_generate_success() {
        let stub = Arc::new(StubGenerator {
            calls: AtomicUsize::new(0),
            answer: || Ok("graph TD\nA-->B".to_string()),
        });
        let app = router(stub.clone());

        let (status, body) = post_json(
            app,
            "/api/generate",
            json!({ "text": "two boxes", "provider": "deepseek" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "code": "graph TD\nA-->B" }));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_provider_is_400_without_generation() {
        let stub = Arc::new(StubGenerator {
            calls: AtomicUsize::new(0),
            answer: || Ok("unused".to_string()),
        });

        for body in [
            json!({ "text": "x", "provider": "openai" }),
            json!({ "text": "x" }),
            json!({ "text": "x", "provider": "" }),
            json!({ "text": "x", "provider": 5 }),
            json!({ "text": "x", "provider": null }),
            json!({ "text": "x", "provider": ["deepseek"] }),
        ] {
            let (status, resp) = post_json(router(stub.clone()), "/api/generate", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(resp, json!({ "error": "Invalid AI provider" }));
        }

        // No Content-Type header, then a body that is not JSON at all
        for request in [
            Request::builder()
                .method(Method::POST)
                .uri("/api/generate")
                .body(Body::from(r#"{"text":"x","provider":"deepseek"}"#))
                .unwrap(),
            Request::builder()
                .method(Method::POST)
                .uri("/api/generate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        ] {
            let (status, resp) = send(router(stub.clone()), request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(resp, json!({ "error": "Invalid AI provider" }));
        }
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_provider_makes_no_network_call() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let app = router(live_service(&mock_server.uri()));
        let (status, _) = post_json(
            app,
            "/api/generate",
            json!({ "text": "x", "provider": "mistral" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        mock_server.verify().await;
    }

    #[tokio::test]
    async fn test_upstream_500_details_passthrough() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "error": "rate limited" })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let app = router(live_service(&mock_server.uri()));
        let (status, body) = post_json(
            app,
            "/api/generate",
            json!({ "text": "x", "provider": "gemini" }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "API request failed with status 500");
        assert_eq!(body["details"], "rate limited");
    }

    #[tokio::test]
    async fn test_transport_failure_details() {
        // Point to a port that's not listening
        let app = router(live_service("http://127.0.0.1:1"));
        let (status, body) = post_json(
            app,
            "/api/generate",
            json!({ "text": "x", "provider": "deepseek" }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "API request failed");
        assert!(!body["details"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_hides_api_key() {
        let config = ProvidersConfig {
            deepseek: ProviderConfig::default(),
            gemini: ProviderConfig {
                api_key: "SECRET-GEMINI-KEY".into(),
                api_base: Some("http://127.0.0.1:1".into()),
                ..ProviderConfig::default()
            },
        };
        let app = router(Arc::new(GenerationService::new(&config).unwrap()));

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "text": "x", "provider": "gemini" }).to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let raw = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!raw.contains("SECRET-GEMINI-KEY"));

        // Same failure straight from reqwest, with the URL stripped
        let expected = reqwest::Client::new()
            .post("http://127.0.0.1:1/?key=SECRET-GEMINI-KEY")
            .send()
            .await
            .unwrap_err()
            .without_url()
            .to_string();

        let body: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(body["error"], "API request failed");
        assert_eq!(body["details"], json!(expected));
    }

    #[tokio::test]
    async fn test_post_processing_failures_are_500() {
        let stub = Arc::new(StubGenerator {
            calls: AtomicUsize::new(0),
            answer: || Err(GenerationError::EmptyDiagram),
        });
        let (status, body) = post_json(
            router(stub),
            "/api/generate",
            json!({ "text": "x", "provider": "gemini" }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({
                "error": "API request failed",
                "details": "Empty diagram code received from AI provider"
            })
        );
    }

    #[tokio::test]
    async fn test_live_generation_end_to_end() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [ { "message": { "content": "```mermaid\ngraph TD\nA-->B\n```" } } ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let app = router(live_service(&mock_server.uri()));
        let (status, body) = post_json(
            app,
            "/api/generate",
            json!({ "text": "two boxes", "provider": "deepseek" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "graph TD\nA-->B");
    }

    #[tokio::test]
    async fn test_simulate_endpoint() {
        let stub = Arc::new(StubGenerator {
            calls: AtomicUsize::new(0),
            answer: || Ok("unused".to_string()),
        });
        let (status, body) = post_json(
            router(stub.clone()),
            "/api/simulate",
            json!({ "text": "ssh via bastion" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["code"].as_str().unwrap().starts_with("sequenceDiagram"));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_health() {
        let stub = Arc::new(StubGenerator {
            calls: AtomicUsize::new(0),
            answer: || Ok("unused".to_string()),
        });
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = router(stub).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
