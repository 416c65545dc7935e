use std::collections::HashMap;

use http::Request;
use http_body_util::BodyExt;
use serde::Serialize;
use serde_json::{json, Value};
use swag::prelude::*;
use tower::ServiceExt;

/// Grouping of pets.
#[derive(Serialize, Reflect)]
struct Category {
    id: i64,
    name: String,
}

#[derive(Serialize, Reflect)]
#[serde(rename_all = "camelCase")]
struct Pet {
    #[swag(required)]
    id: i64,
    category: Option<Category>,
    photo_urls: Vec<String>,
    #[swag(enum = "available,pending,sold")]
    status: String,
}

#[derive(Serialize, Reflect)]
#[serde(rename_all = "lowercase")]
enum Status {
    Available,
    Sold,
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn petstore() -> Api {
    let mut api = Api::new().with_title("Petstore").with_base_path("/v2");
    api.with_tag("pet", "Everything about your Pets")
        .add_endpoints([
            Endpoint::get("/pet/{petId}")
                .path_param("petId", ParameterType::Integer, "ID of pet", true)
                .response_success(ResponseBuilder::new().schema::<Pet>())
                .build()
                .unwrap(),
            Endpoint::get("/store/inventory")
                .response_success(ResponseBuilder::new().schema::<HashMap<String, i32>>())
                .build()
                .unwrap(),
        ])
        .unwrap();
    api
}

// ── Document ────────────────────────────────────────────────────────────────

#[test]
fn derive_through_facade_registers_definitions() {
    let api = petstore();
    let names: Vec<&str> = api.definitions().keys().map(String::as_str).collect();
    assert_eq!(names, ["facade.Category", "facade.Pet", "map_int32"]);

    let doc = serde_json::to_value(&api).unwrap();
    assert_eq!(
        doc["definitions"]["facade.Pet"],
        json!({
            "type": "object",
            "required": ["id"],
            "properties": {
                "id": {"type": "integer", "format": "int64"},
                "category": {"$ref": "#/definitions/facade.Category"},
                "photoUrls": {"type": "array", "items": {"type": "string"}},
                "status": {"type": "string", "enum": ["available", "pending", "sold"]}
            }
        })
    );
    assert_eq!(
        doc["definitions"]["facade.Category"]["description"],
        "Grouping of pets."
    );
    assert_eq!(doc["paths"]["/pet/{petId}"]["get"]["tags"], json!(["pet"]));
    assert_eq!(doc["paths"]["/pet/{petId}"]["get"]["operationId"], "getPetPetid");
}

#[test]
fn unit_enum_reflects_as_string_enum() {
    assert_eq!(
        Status::type_info(),
        TypeInfo::enumeration("facade", "Status", ["available", "sold"])
    );
}

// ── Serving ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn docs_routes_serve_the_document() {
    let router: axum::Router = docs_routes(petstore(), DocsConfig::default());
    let req = Request::builder()
        .uri("/swagger.json")
        .header("host", "localhost:8080")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), http::StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let doc: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(doc["host"], "localhost:8080");
    assert_eq!(doc["basePath"], "/v2");
    assert!(doc["definitions"]["facade.Pet"].is_object());
}
