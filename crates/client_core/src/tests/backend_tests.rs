use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::{
    domain::{ImageModel, ImageQuality, ImageSize, ImageStyle, SearchImageId},
    protocol::ApiEnvelope,
};
use tokio::net::TcpListener;

use super::*;

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<(String, Value)>>>,
}

async fn spawn_backend() -> anyhow::Result<(String, Recorded)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = Recorded::default();
    let app = Router::new()
        .route(
            "/api/image/translate-prompt",
            post(|State(state): State<Recorded>, Json(body): Json<Value>| async move {
                state
                    .bodies
                    .lock()
                    .unwrap()
                    .push(("translate".into(), body));
                Json(json!({"success": true, "translated_prompt": "a red fox"}))
            }),
        )
        .route(
            "/api/video/optimize-prompt",
            post(|State(state): State<Recorded>, Json(body): Json<Value>| async move {
                state
                    .bodies
                    .lock()
                    .unwrap()
                    .push(("optimize".into(), body));
                Json(json!({
                    "success": true,
                    "optimizations": ["one", "two"],
                    "style_names": ["Cinematic"]
                }))
            }),
        )
        .route(
            "/api/image/generate",
            post(|State(state): State<Recorded>, Json(body): Json<Value>| async move {
                state
                    .bodies
                    .lock()
                    .unwrap()
                    .push(("generate".into(), body));
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "content policy violation"})),
                )
            }),
        )
        .route(
            "/api/image/search",
            post(|| async {
                Json(json!({
                    "success": true,
                    "total_results": "40",
                    "results": [{"id": "p1", "url": "https://img.example/p1.jpg", "title": "Peak"}]
                }))
            }),
        )
        .route(
            "/api/admin/statistics",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        )
        .route(
            "/static/generated/fox.png",
            get(|| async { b"png-bytes".to_vec() }),
        )
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

#[tokio::test]
async fn posts_prompt_to_content_specific_route() {
    let (base, recorded) = spawn_backend().await.unwrap();
    let backend = HttpBackend::new(&base).unwrap();

    let translated = backend
        .translate_prompt(ContentType::Image, "一隻紅狐狸")
        .await
        .unwrap();
    assert_eq!(translated.translated_prompt.as_deref(), Some("a red fox"));

    let optimized = backend
        .optimize_prompt(ContentType::Video, "waves")
        .await
        .unwrap();
    assert_eq!(optimized.optimizations, vec!["one", "two"]);

    let bodies = recorded.bodies.lock().unwrap().clone();
    assert_eq!(bodies[0].1["prompt"], "一隻紅狐狸");
    assert_eq!(bodies[1].1["content_type"], "video");
}

#[tokio::test]
async fn non_success_status_surfaces_backend_error() {
    let (base, recorded) = spawn_backend().await.unwrap();
    let backend = HttpBackend::new(&base).unwrap();
    let request = ImageGenerationRequest {
        prompt: "a fox".into(),
        model: ImageModel::DallE3,
        count: 1,
        quality: ImageQuality::Standard,
        size: ImageSize::new(1024, 1024),
        style: ImageStyle::Vivid,
    };

    let err = backend.generate_images(&request).await.unwrap_err();
    match err {
        ClientError::Api(api) => {
            assert_eq!(api.status, Some(400));
            assert_eq!(api.message, "content policy violation");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(recorded.bodies.lock().unwrap()[0].1["size"], "1024x1024");

    let err = backend.admin_statistics().await.unwrap_err();
    assert_eq!(err.user_message(), "HTTP error! status: 503");
}

#[tokio::test]
async fn search_accepts_string_totals() {
    let (base, _recorded) = spawn_backend().await.unwrap();
    let backend = HttpBackend::new(&base).unwrap();
    let response = backend
        .search_images(&SearchRequest {
            query: "mountains".into(),
            page: 1,
            per_page: 12,
            orientation: "any".into(),
            size: "medium".into(),
            image_type: "photo".into(),
        })
        .await
        .unwrap();
    assert_eq!(response.failure(), None);
    assert_eq!(response.total_results, 40);
    assert_eq!(response.results[0].id, SearchImageId::new("p1"));
}

#[tokio::test]
async fn fetches_relative_asset_urls() {
    let (base, _recorded) = spawn_backend().await.unwrap();
    let backend = HttpBackend::new(&base).unwrap();
    let bytes = backend
        .fetch_bytes("/static/generated/fox.png")
        .await
        .unwrap();
    assert_eq!(bytes, b"png-bytes");
    assert!(backend.fetch_bytes("/static/missing.png").await.is_err());
}

#[test]
fn resolves_urls_against_base() {
    let backend = HttpBackend::new("http://127.0.0.1:5000/studio").unwrap();
    assert_eq!(backend.base_url().as_str(), "http://127.0.0.1:5000/studio/");
    assert_eq!(
        backend.resolve_url("/static/a.png"),
        "http://127.0.0.1:5000/static/a.png"
    );
    assert_eq!(
        backend.resolve_url("static/a.png"),
        "http://127.0.0.1:5000/static/a.png"
    );
    assert_eq!(
        backend.resolve_url("https://cdn.example/a.png"),
        "https://cdn.example/a.png"
    );
    assert!(HttpBackend::new("not a url").is_err());
}
