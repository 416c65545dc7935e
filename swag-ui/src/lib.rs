//! HTTP surface for swag documents.
//!
//! [`docs_routes`] mounts the JSON document and the bundled Swagger UI on an
//! `axum::Router`:
//!
//! ```ignore
//! let app = axum::Router::new()
//!     .merge(swag_ui::docs_routes(api, swag_ui::DocsConfig::default()));
//! ```

mod assets;
mod config;
mod handlers;
pub mod layers;

pub use assets::{ui_patterns, MARKER_ASSET_BASE, MARKER_URL};
pub use config::DocsConfig;
pub use handlers::docs_routes;
