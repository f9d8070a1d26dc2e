use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use vid_core::VidConfig;
use vid_server::{build, ServerSettings, StorageBackend};

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn memory_settings() -> ServerSettings {
    let mut config = VidConfig::new();
    config.set("storage.backend", "memory");
    config.set("http.port", "8080");
    config.set("http.host", "localhost");
    ServerSettings::from_config(&config).unwrap()
}

#[tokio::test]
async fn health_ok() {
    let ax = build(&memory_settings()).await.unwrap();

    let res = ax
        .router
        .oneshot(Request::builder().method("GET").uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(std::str::from_utf8(&bytes).unwrap(), "ok");
}

#[tokio::test]
async fn publish_sets_data_url_and_request_id() {
    let ax = build(&memory_settings()).await.unwrap();

    let res = ax
        .router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/video")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"title":"demo","duration":120,"contentType":"video/mp4","dataUrl":"ignored"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);
    assert!(res.headers().get("x-request-id").is_some());
    let body = json_body(res).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["dataUrl"], "http://localhost:8080/video/1/data");
}

#[tokio::test]
async fn filesystem_backend_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = VidConfig::new();
    config.set("storage.root", dir.path().to_string_lossy().to_string());
    config.set("http.public_url", "http://media.test");
    let settings = ServerSettings::from_config(&config).unwrap();
    assert_eq!(settings.storage, StorageBackend::Fs(dir.path().to_path_buf()));

    let ax = build(&settings).await.unwrap();

    let res = ax
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/video")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"title":"clip","duration":3,"contentType":"video/webm"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(json_body(res).await["dataUrl"], "http://media.test/video/1/data");

    let res = ax
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/video/1/data")
                .body(Body::from(vec![5u8; 70_000]))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(json_body(res).await, json!({"state": "READY"}));
    assert!(dir.path().join("videos/1.bin").exists());

    let res = ax
        .router
        .oneshot(Request::builder().uri("/video/1/data").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.headers()["content-type"], "video/webm");
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(bytes.len(), 70_000);
}
