//! Core of swag: reflect typed data structures into Swagger 2.0 schema
//! definitions and aggregate them with endpoint metadata into one document.
//!
//! The flow is:
//!
//! 1. describe your types with [`Reflect`] (usually `#[derive(Reflect)]`
//!    from `swag-macros`),
//! 2. build [`Endpoint`]s whose body parameters and responses carry those
//!    types as prototypes,
//! 3. register them on an [`Api`], which discovers and stores every
//!    reachable definition.
//!
//! ```ignore
//! use swag_core::{Api, Endpoint, ResponseBuilder};
//!
//! let mut api = Api::new().with_title("Petstore");
//! api.add_endpoint(
//!     Endpoint::post("/pets")
//!         .body::<Pet>("the pet to create", true)
//!         .response_success(ResponseBuilder::new().schema::<Pet>())
//!         .build()?,
//! )?;
//! let json = serde_json::to_string_pretty(&api)?;
//! ```

extern crate self as swag_core;

pub mod api;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod reflect;
pub mod schema;
pub mod security;
pub mod util;

pub use api::{Api, Contact, Endpoints, Info, License, Tag, TagDocs};
pub use config::ApiConfig;
pub use endpoint::{
    Endpoint, EndpointBuilder, Header, Method, Parameter, ParameterLocation, ParameterType,
    Response, ResponseBuilder, SecurityRequirement,
};
pub use error::SwagError;
pub use reflect::{generic_name, Field, FieldMeta, Kind, Reflect, StructType, TypeInfo};
pub use schema::{define, define_object, inspect, make_schema, Object, Property, Schema};
pub use security::{ApiKeyLocation, SecurityScheme};
pub use util::colon_path;
