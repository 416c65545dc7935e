//! Serves the classic petstore document and Swagger UI on port 8080.
//!
//! Settings are read from `swag.yaml` (if present) and `SWAG_*` variables.
//!
//! ```sh
//! cargo run -p swag --example petstore --features chrono
//! ```

use std::collections::HashMap;

use axum::Router;
use serde::Serialize;
use swag::swag_ui::layers::init_tracing;
use swag::prelude::*;
use tracing::info;


#[derive(Serialize, Reflect)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Serialize, Reflect)]
pub struct PetTag {
    pub id: i64,
    pub name: String,
}

/// A pet for sale in the store.
#[derive(Serialize, Reflect)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: i64,
    pub category: Option<Category>,
    #[swag(required, example = "doggie")]
    pub name: String,
    #[swag(required)]
    pub photo_urls: Vec<String>,
    pub tags: Vec<PetTag>,
    #[swag(desc = "pet status in the store", enum = "available,pending,sold")]
    pub status: String,
}

#[derive(Serialize, Reflect)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub pet_id: i64,
    pub quantity: i32,
    pub ship_date: chrono::DateTime<chrono::Utc>,
    /// Order Status
    #[swag(enum = "placed,approved,delivered")]
    pub status: String,
    pub complete: bool,
}

#[derive(Serialize, Reflect)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    /// User Status
    pub user_status: i32,
}

#[derive(Serialize, Reflect)]
pub struct ApiResponse {
    pub code: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

fn build_api(config: &ApiConfig) -> Result<Api, SwagError> {
    let mut api = Api::from_config(config)
        .with_security_scheme(
            "petstore_auth",
            SecurityScheme::oauth2("implicit", "http://petstore.swagger.io/oauth/dialog", "")
                .with_scope("write:pets", "modify pets in your account")
                .with_scope("read:pets", "read your pets"),
        )
        .with_security_scheme("api_key", SecurityScheme::api_key("api_key", "header")?);

    api.with_tag("pet", "Everything about your Pets").add_endpoints([
        Endpoint::post("/pet")
            .summary("Add a new pet to the store")
            .body::<Pet>("Pet object that needs to be added to the store", true)
            .response(405, "Invalid input", ResponseBuilder::new())
            .security("petstore_auth", ["write:pets", "read:pets"])
            .build()?,
        Endpoint::get("/pet/findByStatus")
            .summary("Finds Pets by status")
            .query("status", ParameterType::Array, "Status values that need to be considered for filter", true)
            .response_success(ResponseBuilder::new().schema::<Vec<Pet>>())
            .response(400, "Invalid status value", ResponseBuilder::new())
            .security("petstore_auth", ["read:pets"])
            .build()?,
        Endpoint::get("/pet/{petId}")
            .summary("Find pet by ID")
            .path_param("petId", ParameterType::Integer, "ID of pet to return", true)
            .response_success(ResponseBuilder::new().schema::<Pet>())
            .response(404, "Pet not found", ResponseBuilder::new())
            .security("api_key", Vec::<String>::new())
            .build()?,
        Endpoint::post("/pet/{petId}/uploadImage")
            .summary("uploads an image")
            .path_param("petId", ParameterType::Integer, "ID of pet to update", true)
            .form_data("additionalMetadata", ParameterType::String, "Additional data to pass to server", false)
            .form_data("file", ParameterType::File, "file to upload", false)
            .response_success(ResponseBuilder::new().schema::<ApiResponse>())
            .build()?,
        Endpoint::delete("/pet/{petId}")
            .summary("Deletes a pet")
            .header_param("api_key", ParameterType::String, "", false)
            .path_param("petId", ParameterType::Integer, "Pet id to delete", true)
            .response(404, "Pet not found", ResponseBuilder::new())
            .build()?,
    ])?;

    api.with_tag("store", "Access to Petstore orders").add_endpoints([
        Endpoint::get("/store/inventory")
            .summary("Returns pet inventories by status")
            .response_success(ResponseBuilder::new().schema::<HashMap<String, i32>>())
            .security("api_key", Vec::<String>::new())
            .build()?,
        Endpoint::post("/store/order")
            .summary("Place an order for a pet")
            .body::<Order>("order placed for purchasing the pet", true)
            .response_success(ResponseBuilder::new().schema::<Order>())
            .build()?,
    ])?;

    api.with_tag("user", "Operations about user")
        .with_group("/user")
        .add_endpoints([
            Endpoint::post("/")
                .summary("Create user")
                .body::<User>("Created user object", true)
                .response(200, "successful operation", ResponseBuilder::new())
                .no_security()
                .build()?,
            Endpoint::get("/login")
                .summary("Logs user into the system")
                .query_string("username", "The user name for login")
                .query_string("password", "The password for login in clear text")
                .response_success(
                    ResponseBuilder::new()
                        .schema::<String>()
                        .header("X-Expires-After", "string", "date-time", "date in UTC when token expires"),
                )
                .build()?,
        ])?;

    Ok(api)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = ApiConfig::load("swag.yaml")?.with_env_overrides();
    let api = build_api(&config)?;
    api.walk(|path, endpoint| info!(method = %endpoint.method, path, "Documented endpoint"));

    let app: Router = docs_routes(api, DocsConfig::default());
    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
    info!(addr = "0.0.0.0:8080", "Serving Swagger UI at /swagger/ui");
    axum::serve(listener, app).await?;
    Ok(())
}
