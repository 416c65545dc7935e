use thiserror::Error;

/// Errors raised while configuring endpoints or reflecting over types.
///
/// Every variant is a configuration mistake: they surface when the document
/// is being built, never while it is served.
#[derive(Debug, Error)]
pub enum SwagError {
    /// The HTTP method is not one of the nine methods a path item can hold.
    #[error("invalid method, {0}")]
    InvalidMethod(String),

    /// An API key security scheme was given a location other than `header`
    /// or `query`.
    #[error("api key location must be one of: \"header\" or \"query\", got {0:?}")]
    InvalidSecurityLocation(String),

    /// A parameter location string did not name a Swagger location.
    #[error("invalid parameter location {0:?}")]
    InvalidParameterLocation(String),

    /// A special-cased named type has no entry in the primitive mapping table.
    #[error("no schema mapping for named type `{0}`")]
    UnknownNamedType(String),

    /// A flattened field cannot contribute properties to its owner.
    #[error("field `{field}` of `{owner}` cannot be flattened: {reason}")]
    UnsupportedEmbed {
        owner: String,
        field: String,
        reason: &'static str,
    },

    /// Loading or parsing an [`ApiConfig`](crate::ApiConfig) failed.
    #[error("config error: {0}")]
    Config(String),
}
