//! Integration tests for tvhub
//!
//! These drive the full router (auth, storage, feed reshape, CORS and
//! static assets) in-process without binding a socket.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use tvhub_core::{CONFIG_KEY, KvStore, MemoryStore, SharedStore, SqliteStore};

use crate::auth::AuthState;
use crate::server::{AppState, build_app};

const SECRET: &str = "s3cret";

fn build_test_app() -> (Router, SharedStore) {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let state = AppState::new(Some(store.clone()), AuthState::new(Some(SECRET.to_string())));
    (build_app(state), store)
}

fn request(method: Method, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn sample_document() -> Value {
    json!({
        "sources": [
            {"id": "a", "name": "Movies", "url": "https://m.example/tv.json",
             "type": "mixed", "enabled": true, "updatedAt": 1},
            {"id": "b", "name": "Off", "url": "https://off.example",
             "type": "spider", "enabled": false, "updatedAt": 2},
            {"id": "c", "name": "Live", "url": "https://l.example/live.m3u",
             "type": "live", "enabled": true, "updatedAt": 3}
        ],
        "globalSettings": {"wallpaper": "https://wall.example/bg.jpg", "spider": "https://s.example/s.jar"}
    })
}

#[tokio::test]
async fn test_config_requires_token() {
    let (app, _store) = build_test_app();

    let (status, body) = send(&app, request(Method::GET, "/api/config", None, "")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"error": "Unauthorized"})
    );

    let (status, _) = send(&app, request(Method::GET, "/api/config", Some("wrong"), "")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_post_with_bad_token_is_unauthorized_regardless_of_body() {
    let (app, store) = build_test_app();

    let document = sample_document().to_string();
    for body in ["not json at all", document.as_str()] {
        let (status, _) =
            send(&app, request(Method::POST, "/api/config", Some("nope"), body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    assert_eq!(store.get(CONFIG_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_get_returns_default_when_empty() {
    let (app, _store) = build_test_app();

    let (status, body) = send(&app, request(Method::GET, "/api/config", Some(SECRET), "")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({
            "sources": [],
            "globalSettings": {"wallpaper": "https://picsum.photos/1920/1080", "spider": ""}
        })
    );
}

#[tokio::test]
async fn test_post_then_get_round_trip() {
    let (app, _store) = build_test_app();
    let document = sample_document();

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/config", Some(SECRET), &document.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"success": true})
    );

    let (status, body) = send(&app, request(Method::GET, "/api/config", Some(SECRET), "")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), document);
}

#[tokio::test]
async fn test_post_invalid_json() {
    let (app, store) = build_test_app();

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/config", Some(SECRET), "{not json"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"error": "Invalid JSON"})
    );
    assert_eq!(store.get(CONFIG_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_post_wrong_shape_is_invalid_json() {
    let (app, _store) = build_test_app();

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/config",
            Some(SECRET),
            r#"{"sources":[{"id":"x","name":"n","url":"u","type":"radio","enabled":true,"updatedAt":1}]}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_subscribe_filters_enabled_sources() {
    let (app, store) = build_test_app();
    store
        .put(CONFIG_KEY, sample_document().to_string())
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/subscribe", None, ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json;charset=utf-8"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    // two-space pretty printing
    assert!(text.starts_with("{\n  \"wallpaper\""));
    assert_eq!(
        serde_json::from_str::<Value>(&text).unwrap(),
        json!({
            "wallpaper": "https://wall.example/bg.jpg",
            "spider": "https://s.example/s.jar",
            "urls": [
                {"url": "https://m.example/tv.json", "name": "Movies"},
                {"url": "https://l.example/live.m3u", "name": "Live"}
            ]
        })
    );
}

#[tokio::test]
async fn test_subscribe_accepts_any_method() {
    let (app, _store) = build_test_app();

    let (status, body) = send(&app, request(Method::POST, "/subscribe", None, "")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"wallpaper": "https://picsum.photos/1920/1080", "spider": "", "urls": []})
    );
}

#[tokio::test]
async fn test_subscribe_corrupt_document() {
    let (app, store) = build_test_app();
    store
        .put(CONFIG_KEY, "definitely not json".to_string())
        .await
        .unwrap();

    let (status, body) = send(&app, request(Method::GET, "/subscribe", None, "")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = serde_json::from_str::<Value>(&body).unwrap()["error"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(error.contains("not valid JSON"));
}

#[tokio::test]
async fn test_unbound_store() {
    let app = build_app(AppState::new(
        None,
        AuthState::new(Some(SECRET.to_string())),
    ));

    for req in [
        request(Method::GET, "/api/config", Some(SECRET), ""),
        request(Method::POST, "/api/config", Some(SECRET), "{}"),
        request(Method::GET, "/subscribe", None, ""),
    ] {
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({"error": "KV namespace not bound"})
        );
    }

    // auth still comes first
    let (status, _) = send(&app, request(Method::GET, "/api/config", None, "")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_no_secret_rejects_everything() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let app = build_app(AppState::new(Some(store), AuthState::new(None)));

    for token in [None, Some(""), Some("undefined")] {
        let (status, _) = send(&app, request(Method::GET, "/api/config", token, "")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_cors_headers_on_responses() {
    let (app, _store) = build_test_app();

    let req = Request::builder()
        .uri("/subscribe")
        .header(header::ORIGIN, "https://elsewhere.example")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _store) = build_test_app();

    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/config")
        .header(header::ORIGIN, "https://elsewhere.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    let methods = headers
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap();
    for method in ["GET", "POST", "OPTIONS", "PUT", "DELETE"] {
        assert!(methods.contains(method), "missing {} in {}", method, methods);
    }
    let allowed = headers
        .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(allowed.contains("authorization"));
    assert!(allowed.contains("content-type"));
}

#[tokio::test]
async fn test_plain_options_without_token() {
    let (app, _store) = build_test_app();

    let (status, _) = send(&app, request(Method::OPTIONS, "/api/config", None, "")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, request(Method::OPTIONS, "/subscribe", None, "")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_serves_admin_ui() {
    let (app, _store) = build_test_app();

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/", None, ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );

    let (status, _) = send(&app, request(Method::GET, "/missing.png", None, "")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sqlite_backed_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tvhub.db");
    let document = sample_document();

    {
        let store: SharedStore = Arc::new(SqliteStore::open(&path).unwrap());
        let app = build_app(AppState::new(
            Some(store),
            AuthState::new(Some(SECRET.to_string())),
        ));
        let (status, _) = send(
            &app,
            request(Method::POST, "/api/config", Some(SECRET), &document.to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let store: SharedStore = Arc::new(SqliteStore::open(&path).unwrap());
    let app = build_app(AppState::new(
        Some(store),
        AuthState::new(Some(SECRET.to_string())),
    ));
    let (status, body) = send(&app, request(Method::GET, "/api/config", Some(SECRET), "")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), document);
}
