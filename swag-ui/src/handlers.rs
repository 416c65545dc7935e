use std::borrow::Cow;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use http::header::{CONTENT_TYPE, HOST, LOCATION};
use http::{HeaderMap, StatusCode, Uri};
use swag_core::Api;
use tracing::debug;

use crate::assets::{self, MARKER_ASSET_BASE, MARKER_URL};
use crate::config::DocsConfig;

struct DocsState {
    api: Api,
    config: DocsConfig,
}

/// Build an `axum::Router` serving the document at `config.json_path` and,
/// unless disabled, the bundled UI under `config.ui_prefix`.
///
/// The document is snapshotted per request with `host` and `schemes` taken
/// from the request, so the same router answers correctly behind proxies.
pub fn docs_routes<T: Clone + Send + Sync + 'static>(api: Api, config: DocsConfig) -> Router<T> {
    let json_path = config.json_path.clone();
    let prefix = config.ui_prefix.trim_end_matches('/').to_string();
    let ui_enabled = config.ui_enabled;
    let state = Arc::new(DocsState { api, config });

    let mut router = Router::new().route(&json_path, get(document));

    if ui_enabled {
        if !prefix.is_empty() {
            router = router.route(&prefix, get(redirect));
        }
        router = router
            .route(&format!("{prefix}/"), get(index))
            .route(&format!("{prefix}/{{*file}}"), get(asset));
    }

    router.with_state(state)
}

async fn document(State(state): State<Arc<DocsState>>, headers: HeaderMap, uri: Uri) -> Response {
    let scheme = request_scheme(&headers, &uri);
    let host = request_host(&headers, &uri);
    Json(state.api.snapshot(host, &scheme)).into_response()
}

async fn redirect(State(state): State<Arc<DocsState>>) -> Response {
    let location = format!("{}/", state.config.ui_prefix.trim_end_matches('/'));
    debug!(location = %location, "Redirecting to UI index");
    (StatusCode::FOUND, [(LOCATION, location)]).into_response()
}

async fn index(State(state): State<Arc<DocsState>>, headers: HeaderMap, uri: Uri) -> Response {
    let url = document_url(&state.config, &headers, &uri);
    render_index(assets::read("index.html"), &url, &state.config.asset_base)
}

async fn asset(
    State(state): State<Arc<DocsState>>,
    Path(file): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    if file == "index.html" {
        return index(State(state), headers, uri).await;
    }
    match assets::read(&file) {
        Some(data) => {
            let mime = mime_guess::from_path(&file).first_or_octet_stream();
            ([(CONTENT_TYPE, mime.to_string())], data.into_owned()).into_response()
        }
        None => {
            debug!(file = %file, "UI asset not found");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

fn render_index(data: Option<Cow<'static, [u8]>>, url: &str, asset_base: &str) -> Response {
    match data {
        Some(data) => Html(
            String::from_utf8_lossy(&data)
                .replace(MARKER_URL, url)
                .replace(MARKER_ASSET_BASE, asset_base),
        )
        .into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "index.html read exception").into_response(),
    }
}

fn document_url(config: &DocsConfig, headers: &HeaderMap, uri: &Uri) -> String {
    let url = config.document_url();
    if !config.auto_domain {
        return url.to_string();
    }
    match request_host(headers, uri) {
        Some(host) => format!("{}://{}{}", request_scheme(headers, uri), host, url),
        None => url.to_string(),
    }
}

fn request_scheme(headers: &HeaderMap, uri: &Uri) -> String {
    if let Some(proto) = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return proto.to_string();
    }
    uri.scheme_str().unwrap_or("http").to_string()
}

fn request_host(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_index_is_a_server_error() {
        let response = render_index(None, "/swagger.json", MARKER_ASSET_BASE);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn forwarded_proto_wins_over_uri_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-proto", "https, http".parse().unwrap());
        let uri: Uri = "http://internal:8080/swagger.json".parse().unwrap();
        assert_eq!(request_scheme(&headers, &uri), "https");
        assert_eq!(request_host(&headers, &uri).as_deref(), Some("internal:8080"));
    }

    #[test]
    fn scheme_defaults_to_http() {
        let uri: Uri = "/swagger.json".parse().unwrap();
        assert_eq!(request_scheme(&HeaderMap::new(), &uri), "http");
        assert_eq!(request_host(&HeaderMap::new(), &uri), None);
    }
}
