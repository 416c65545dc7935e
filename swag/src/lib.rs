//! swag: Swagger 2.0 documents from reflected Rust types.
//!
//! This facade re-exports `swag-core`, the `Reflect` derive from
//! `swag-macros` and, with the `ui` feature, the axum routes of `swag-ui`.
//!
//! ```ignore
//! use swag::prelude::*;
//! ```
//!
//! # Feature flags
//!
//! | Feature  | Default | Effect                                   |
//! |----------|---------|------------------------------------------|
//! | `ui`     | **yes** | `swag-ui`: document and Swagger UI routes |
//! | `chrono` | no      | `Reflect` for chrono date/time types     |
//! | `uuid`   | no      | `Reflect` for `uuid::Uuid`               |

// The derive emits `::swag::...` paths when the user depends on this crate.
extern crate self as swag;

pub extern crate swag_core;

pub use swag_core::*;

pub use swag_core::Reflect;
pub use swag_macros::Reflect;

#[cfg(feature = "ui")]
pub use swag_ui;

pub mod prelude {
    //! Everything needed to describe and serve an API.
    pub use crate::{
        Api, ApiConfig, Endpoint, Method, ParameterType, Reflect, ResponseBuilder, SecurityScheme,
        SwagError, Tag, TypeInfo,
    };

    #[cfg(feature = "ui")]
    pub use crate::swag_ui::{docs_routes, DocsConfig};
}
