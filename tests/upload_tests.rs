//! Upload relay and provider tests
//!
//! The Cloudinary HTTP API is replaced by a wiremock server.

use std::sync::Arc;
use std::time::Duration;

use actix_web::App;
use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use linkshelf::config::{AppConfig, DatabaseConfig, MediaConfig};
use linkshelf::errors::LinkshelfError;
use linkshelf::i18n::Locale;
use linkshelf::media::{
    CloudinaryClient, HttpUploadTarget, Multiplicity, UploadFile, UploadRelay, UploadTarget,
};
use linkshelf::runtime::StartupContext;
use linkshelf::storage::StorageFactory;

const UPLOAD_PATH: &str = "/v1_1/demo/image/upload";
const DESTROY_PATH: &str = "/v1_1/demo/image/destroy";

fn media_config(api_base_url: &str, with_credentials: bool) -> MediaConfig {
    MediaConfig {
        cloud_name: "demo".to_string(),
        api_base_url: api_base_url.to_string(),
        api_key: with_credentials.then(|| "test-key".to_string()),
        api_secret: with_credentials.then(|| "test-secret".to_string()),
        upload_timeout_secs: 5,
        ..Default::default()
    }
}

/// Responds with `public_id` whenever the request body contains `marker`
async fn mount_upload(server: &MockServer, marker: &str, public_id: &str) {
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(body_string_contains(marker))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "public_id": public_id,
            "secure_url": format!("https://res.cloudinary.com/demo/image/upload/{}", public_id),
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn file(name: &str, content: &str) -> UploadFile {
    UploadFile::new(name, content.as_bytes().to_vec()).with_content_type("image/png")
}

// =============================================================================
// CloudinaryClient
// =============================================================================

#[tokio::test]
async fn test_signed_upload_returns_public_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(body_string_contains("name=\"api_key\""))
        .and(body_string_contains("test-key"))
        .and(body_string_contains("name=\"timestamp\""))
        .and(body_string_contains("name=\"signature\""))
        .and(body_string_contains("sha256"))
        .and(body_string_contains("PNGDATA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"public_id": "uploads/a1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = CloudinaryClient::new(&media_config(&server.uri(), true)).unwrap();
    let id = client.upload_image(file("a.png", "PNGDATA")).await.unwrap();
    assert_eq!(id, "uploads/a1");
}

#[tokio::test]
async fn test_provider_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": {"message": "Invalid image file"}})),
        )
        .mount(&server)
        .await;

    let client = CloudinaryClient::new(&media_config(&server.uri(), true)).unwrap();
    let err = client.upload_image(file("a.png", "junk")).await.unwrap_err();
    assert!(matches!(err, LinkshelfError::Provider(_)));
    assert!(err.message().contains("Invalid image file"));
}

#[tokio::test]
async fn test_destroy_signed_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DESTROY_PATH))
        .and(body_string_contains("products/old_1"))
        .and(body_string_contains("name=\"signature\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = CloudinaryClient::new(&media_config(&server.uri(), true)).unwrap();
    client.destroy("products/old_1").await.unwrap();
}

#[tokio::test]
async fn test_destroy_missing_asset_is_ok() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DESTROY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "not found"})))
        .mount(&server)
        .await;

    let client = CloudinaryClient::new(&media_config(&server.uri(), true)).unwrap();
    assert!(client.destroy("gone").await.is_ok());
}

#[tokio::test]
async fn test_destroy_without_credentials_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = CloudinaryClient::new(&media_config(&server.uri(), false)).unwrap();
    assert!(!client.is_configured());
    client.destroy("anything").await.unwrap();
}

// =============================================================================
// UploadRelay over the real client
// =============================================================================

#[tokio::test]
async fn test_relay_batch_preserves_order() {
    let server = MockServer::start().await;
    mount_upload(&server, "FIRST", "ids/first").await;
    mount_upload(&server, "SECOND", "ids/second").await;
    mount_upload(&server, "THIRD", "ids/third").await;

    let config = media_config(&server.uri(), true);
    let target: Arc<dyn UploadTarget> = Arc::new(CloudinaryClient::new(&config).unwrap());
    let relay = UploadRelay::new(target, &config);

    let files = vec![
        file("1.png", "FIRST"),
        file("2.png", "SECOND"),
        file("3.png", "THIRD"),
    ];
    let ids = relay.upload(files, Multiplicity::Multiple).await.unwrap();
    assert_eq!(ids, vec!["ids/first", "ids/second", "ids/third"]);
}

#[tokio::test]
async fn test_relay_batch_fails_when_one_file_fails() {
    let server = MockServer::start().await;
    mount_upload(&server, "GOOD", "ids/good").await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(body_string_contains("BAD"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = media_config(&server.uri(), true);
    let relay = UploadRelay::new(Arc::new(CloudinaryClient::new(&config).unwrap()), &config);

    let err = relay
        .upload(
            vec![file("g.png", "GOOD"), file("b.png", "BAD")],
            Multiplicity::Multiple,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LinkshelfError::UploadFailed(_)));
}

// =============================================================================
// HttpUploadTarget
// =============================================================================

#[tokio::test]
async fn test_http_target_reads_public_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .and(body_string_contains("name=\"file\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "publicId": "relay/x1",
            "publicIds": ["relay/x1"],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let target =
        HttpUploadTarget::new(format!("{}/api/upload", server.uri()), Duration::from_secs(5))
            .unwrap();
    let id = target.upload(file("x.png", "XDATA")).await.unwrap();
    assert_eq!(id, "relay/x1");
}

#[tokio::test]
async fn test_http_target_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({"error": "boom"})))
        .mount(&server)
        .await;

    let target =
        HttpUploadTarget::new(format!("{}/api/upload", server.uri()), Duration::from_secs(5))
            .unwrap();
    let err = target.upload(file("x.png", "XDATA")).await.unwrap_err();
    assert!(matches!(err, LinkshelfError::Provider(_)));
}

// =============================================================================
// POST /api/upload
// =============================================================================

const BOUNDARY: &str = "linkshelf-test-boundary";

fn multipart_body(parts: &[(&str, &str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, filename, content) in parts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(uri: &str, parts: &[(&str, &str, &str)]) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(multipart_body(parts))
}

async fn context(media: MediaConfig) -> (TempDir, StartupContext) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = AppConfig {
        locale: Locale::En,
        database: DatabaseConfig {
            database_url: format!(
                "sqlite://{}?mode=rwc",
                temp_dir.path().join("upload_test.db").display()
            ),
            ..Default::default()
        },
        media,
        ..Default::default()
    };
    let storage = StorageFactory::create(&config.database).await.unwrap();
    let provider = CloudinaryClient::new(&config.media).unwrap();
    let ctx = StartupContext::from_parts(storage, &config, Arc::new(provider));
    (temp_dir, ctx)
}

#[actix_web::test]
async fn test_upload_endpoint_multiple() {
    let server = MockServer::start().await;
    mount_upload(&server, "AAA", "shop/a").await;
    mount_upload(&server, "BBB", "shop/b").await;

    let (_dir, ctx) = context(media_config(&server.uri(), true)).await;
    let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;

    let req = upload_request(
        "/api/upload?multiple=true",
        &[("file", "a.png", "AAA"), ("file", "b.png", "BBB")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["publicId"], "shop/a");
    assert_eq!(body["publicIds"], json!(["shop/a", "shop/b"]));
}

#[actix_web::test]
async fn test_upload_endpoint_single_reports_first() {
    let server = MockServer::start().await;
    mount_upload(&server, "AAA", "shop/a").await;
    mount_upload(&server, "BBB", "shop/b").await;

    let (_dir, ctx) = context(media_config(&server.uri(), true)).await;
    let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;

    let req = upload_request(
        "/api/upload",
        &[("file", "a.png", "AAA"), ("file", "b.png", "BBB")],
    )
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["publicId"], "shop/a");
    assert_eq!(body["publicIds"], json!(["shop/a"]));
}

#[actix_web::test]
async fn test_upload_endpoint_ignores_other_fields() {
    let server = MockServer::start().await;
    mount_upload(&server, "AAA", "shop/a").await;

    let (_dir, ctx) = context(media_config(&server.uri(), true)).await;
    let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;

    let req = upload_request(
        "/api/upload",
        &[("avatar", "x.png", "IGNORED"), ("file", "a.png", "AAA")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_upload_endpoint_missing_file() {
    let server = MockServer::start().await;
    let (_dir, ctx) = context(media_config(&server.uri(), true)).await;
    let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;

    let req = upload_request("/api/upload", &[("other", "x.png", "DATA")]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No file was provided");
}

#[actix_web::test]
async fn test_upload_endpoint_file_too_large() {
    let server = MockServer::start().await;
    let mut media = media_config(&server.uri(), true);
    media.max_file_size = 4;
    let (_dir, ctx) = context(media).await;
    let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;

    let req = upload_request("/api/upload", &[("file", "big.png", "TOO-LARGE")]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_upload_endpoint_provider_failure_is_502() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (_dir, ctx) = context(media_config(&server.uri(), true)).await;
    let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;

    let req = upload_request("/api/upload", &[("file", "a.png", "AAA")]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body: Value = test::read_body_json(resp).await;
    assert!(body.get("publicId").is_none());
    assert_eq!(body["error"], "An error occurred while uploading images");
}

#[actix_web::test]
async fn test_upload_endpoint_unconfigured_is_503() {
    let server = MockServer::start().await;
    let (_dir, ctx) = context(media_config(&server.uri(), false)).await;
    let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;

    let req = upload_request("/api/upload", &[("file", "a.png", "AAA")]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}
