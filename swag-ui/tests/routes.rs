use axum::body::Body;
use axum::Router;
use http::Request;
use http_body_util::BodyExt;
use serde::Serialize;
use serde_json::Value;
use swag_core::{Api, Endpoint, ResponseBuilder};
use swag_macros::Reflect;
use swag_ui::{docs_routes, ui_patterns, DocsConfig, MARKER_ASSET_BASE, MARKER_URL};
use tower::ServiceExt;

#[derive(Serialize, Reflect)]
struct Pet {
    #[swag(required)]
    id: i64,
    name: String,
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn petstore() -> Api {
    let mut api = Api::new().with_title("Petstore").with_base_path("/v2");
    api.add_endpoint(
        Endpoint::get("/pets")
            .response_success(ResponseBuilder::new().schema::<Vec<Pet>>())
            .build()
            .unwrap(),
    )
    .unwrap();
    api
}

fn router(config: DocsConfig) -> Router {
    docs_routes::<()>(petstore(), config)
}

async fn send(router: Router, req: Request<Body>) -> (http::StatusCode, String, http::HeaderMap) {
    let response = router.oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).into_owned(), headers)
}

async fn get_response(router: Router, path: &str) -> (http::StatusCode, String, http::HeaderMap) {
    let req = Request::builder().uri(path).body(Body::empty()).unwrap();
    send(router, req).await
}

// ── Document ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn document_is_served_as_json() {
    let req = Request::builder()
        .uri("/swagger.json")
        .header("host", "petstore.example.com")
        .body(Body::empty())
        .unwrap();
    let (status, body, headers) = send(router(DocsConfig::default()), req).await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(
        headers.get("content-type").unwrap().to_str().unwrap(),
        "application/json"
    );

    let doc: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(doc["swagger"], "2.0");
    assert_eq!(doc["info"]["title"], "Petstore");
    assert_eq!(doc["host"], "petstore.example.com");
    assert_eq!(doc["schemes"], serde_json::json!(["http"]));
    assert!(doc["paths"]["/pets"]["get"].is_object());
    assert!(doc["definitions"]["routes.Pet"].is_object());
}

#[tokio::test]
async fn forwarded_proto_sets_scheme() {
    let req = Request::builder()
        .uri("/swagger.json")
        .header("host", "api.example.com")
        .header("x-forwarded-proto", "https")
        .body(Body::empty())
        .unwrap();
    let (_, body, _) = send(router(DocsConfig::default()), req).await;
    let doc: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(doc["schemes"], serde_json::json!(["https"]));
    assert_eq!(doc["host"], "api.example.com");
}

#[tokio::test]
async fn custom_json_path() {
    let config = DocsConfig::default().with_json_path("/api-docs.json");
    let (status, _, _) = get_response(router(config.clone()), "/api-docs.json").await;
    assert_eq!(status, http::StatusCode::OK);
    let (status, _, _) = get_response(router(config), "/swagger.json").await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
}

// ── UI ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn prefix_redirects_to_index() {
    let (status, _, headers) = get_response(router(DocsConfig::default()), "/swagger/ui").await;
    assert_eq!(status, http::StatusCode::FOUND);
    assert_eq!(headers.get("location").unwrap(), "/swagger/ui/");
}

#[tokio::test]
async fn index_points_at_document() {
    for path in ["/swagger/ui/", "/swagger/ui/index.html"] {
        let (status, body, headers) = get_response(router(DocsConfig::default()), path).await;
        assert_eq!(status, http::StatusCode::OK);
        assert!(headers
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        assert!(body.contains("url: \"/swagger.json\""));
        assert!(!body.contains(MARKER_URL));
    }
}

#[tokio::test]
async fn auto_domain_prefixes_request_origin() {
    let config = DocsConfig::default().with_auto_domain(true);
    let req = Request::builder()
        .uri("/swagger/ui/")
        .header("host", "docs.example.com")
        .header("x-forwarded-proto", "https")
        .body(Body::empty())
        .unwrap();
    let (_, body, _) = send(router(config), req).await;
    assert!(body.contains("https://docs.example.com/swagger.json"));
}

#[tokio::test]
async fn explicit_document_url() {
    let config = DocsConfig::default().with_document_url("/v2/swagger.json");
    let (_, body, _) = get_response(router(config), "/swagger/ui/").await;
    assert!(body.contains("url: \"/v2/swagger.json\""));
}

#[tokio::test]
async fn index_loads_ui_scripts_from_asset_base() {
    let (_, body, _) = get_response(router(DocsConfig::default()), "/swagger/ui/").await;
    assert!(body.contains(&format!("{MARKER_ASSET_BASE}/swagger-ui-bundle.js")));

    let config = DocsConfig::default().with_asset_base("./");
    let (_, body, _) = get_response(router(config), "/swagger/ui/").await;
    assert!(!body.contains(MARKER_ASSET_BASE));
    assert!(body.contains("src=\"./swagger-ui-bundle.js\""));
    assert!(body.contains("href=\"./swagger-ui.css\""));

    let config = DocsConfig::default().with_asset_base("/static/swagger-ui/");
    let (_, body, _) = get_response(router(config), "/swagger/ui/").await;
    assert!(body.contains("src=\"/static/swagger-ui/swagger-ui-standalone-preset.js\""));
}

#[tokio::test]
async fn bundled_asset_has_guessed_content_type() {
    let (status, body, headers) =
        get_response(router(DocsConfig::default()), "/swagger/ui/oauth2-redirect.html").await;
    assert_eq!(status, http::StatusCode::OK);
    assert!(headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert!(body.contains("swaggerUIRedirectOauth2"));
}

#[tokio::test]
async fn unknown_asset_is_not_found() {
    let (status, _, _) = get_response(router(DocsConfig::default()), "/swagger/ui/missing.js").await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ui_can_be_disabled() {
    let config = DocsConfig::default().without_ui();
    let (status, _, _) = get_response(router(config.clone()), "/swagger/ui/").await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
    let (status, _, _) = get_response(router(config), "/swagger.json").await;
    assert_eq!(status, http::StatusCode::OK);
}

#[tokio::test]
async fn custom_prefix() {
    let config = DocsConfig::default().with_ui_prefix("/docs/");
    let (status, _, headers) = get_response(router(config.clone()), "/docs").await;
    assert_eq!(status, http::StatusCode::FOUND);
    assert_eq!(headers.get("location").unwrap(), "/docs/");
    let (status, _, _) = get_response(router(config), "/docs/").await;
    assert_eq!(status, http::StatusCode::OK);
}

// ── Patterns ────────────────────────────────────────────────────────────────

#[test]
fn ui_patterns_list_directory_then_files() {
    assert_eq!(
        ui_patterns("/swagger/ui"),
        [
            "/swagger/ui/",
            "/swagger/ui/index.html",
            "/swagger/ui/oauth2-redirect.html"
        ]
    );
    assert_eq!(ui_patterns("/docs/")[0], "/docs/");
}
