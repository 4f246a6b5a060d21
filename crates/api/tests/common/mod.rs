#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use storyforge_api::config::ServerConfig;
use storyforge_api::router::build_app_router;
use storyforge_api::state::AppState;
use storyforge_core::context::{AttributeMerge, ContextFormat};
use storyforge_llm::{LlmConfig, LlmError, TextGenerator};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and the given media root.
pub fn test_config(media_root: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        media_root,
        max_upload_bytes: 1024 * 1024,
        context_format: ContextFormat::Json,
        attribute_merge: AttributeMerge::Override,
        llm: LlmConfig::default(),
    }
}

/// Fresh media directory under the system temp dir, kept after the test.
fn scratch_media_root() -> PathBuf {
    tempfile::tempdir().expect("tempdir").keep()
}

/// Build the full application router without a text generation backend.
///
/// Uses the same middleware stack as `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with(pool, None, scratch_media_root())
}

/// Build the application with `generator` as the text generation backend.
pub fn build_test_app_with_generator(pool: PgPool, generator: Arc<StubGenerator>) -> Router {
    build_app_with(pool, Some(generator), scratch_media_root())
}

/// Build the application with an explicit media root.
pub fn build_test_app_with_media(pool: PgPool, media_root: PathBuf) -> Router {
    build_app_with(pool, None, media_root)
}

fn build_app_with(
    pool: PgPool,
    generator: Option<Arc<StubGenerator>>,
    media_root: PathBuf,
) -> Router {
    let config = test_config(media_root);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        generator: generator.map(|g| g as Arc<dyn TextGenerator>),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Stub text generator
// ---------------------------------------------------------------------------

/// Records every prompt and answers with a fixed reply or a provider error.
pub struct StubGenerator {
    reply: Result<String, (u16, String)>,
    prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err((status, body.to_string())),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err((status, body)) => Err(LlmError::ApiError {
                status: *status,
                body: body.clone(),
            }),
        }
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send_json(app: Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

/// POST a raw body with a JSON content type.
pub async fn post_raw(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST a single-file multipart form under the `file` field.
pub async fn post_file(app: Router, uri: &str, file_name: &str, data: &[u8]) -> Response<Body> {
    let boundary = "storyforge-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a resource and return its id.
pub async fn create_id(app: Router, uri: &str, body: Value) -> i64 {
    let response = post_json(app, uri, body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED, "POST {uri}");
    body_json(response).await["id"].as_i64().unwrap()
}
