use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SwagError;

/// Where an API key is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Header,
    Query,
}

impl FromStr for ApiKeyLocation {
    type Err = SwagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(Self::Header),
            "query" => Ok(Self::Query),
            other => Err(SwagError::InvalidSecurityLocation(other.to_string())),
        }
    }
}

impl fmt::Display for ApiKeyLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => f.write_str("header"),
            Self::Query => f.write_str("query"),
        }
    }
}

/// Entry of `securityDefinitions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<ApiKeyLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub scopes: BTreeMap<String, String>,
}

impl SecurityScheme {
    fn of_type(ty: &str) -> Self {
        Self {
            ty: ty.to_string(),
            description: None,
            name: None,
            location: None,
            flow: None,
            authorization_url: None,
            token_url: None,
            scopes: BTreeMap::new(),
        }
    }

    pub fn basic() -> Self {
        Self::of_type("basic")
    }

    /// API key sent under `name` in `location`, which must be `header` or
    /// `query`.
    pub fn api_key(name: &str, location: &str) -> Result<Self, SwagError> {
        let location = location.parse()?;
        Ok(Self {
            name: Some(name.to_string()),
            location: Some(location),
            ..Self::of_type("apiKey")
        })
    }

    pub fn oauth2(flow: &str, authorization_url: &str, token_url: &str) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            flow: Some(flow.to_string()),
            authorization_url: non_empty(authorization_url),
            token_url: non_empty(token_url),
            ..Self::of_type("oauth2")
        }
    }

    pub fn with_scope(mut self, scope: &str, description: &str) -> Self {
        self.scopes.insert(scope.to_string(), description.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_key_rejects_unknown_location() {
        let err = SecurityScheme::api_key("token", "cookie").unwrap_err();
        assert!(matches!(err, SwagError::InvalidSecurityLocation(ref loc) if loc == "cookie"));
    }

    #[test]
    fn oauth2_serializes_scopes() {
        let scheme = SecurityScheme::oauth2("accessCode", "http://auth", "http://token")
            .with_scope("read", "read access")
            .with_description("oauth");
        assert_eq!(
            serde_json::to_value(&scheme).unwrap(),
            json!({
                "type": "oauth2",
                "description": "oauth",
                "flow": "accessCode",
                "authorizationUrl": "http://auth",
                "tokenUrl": "http://token",
                "scopes": {"read": "read access"}
            })
        );
    }
}
