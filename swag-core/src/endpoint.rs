//! Endpoint model and its builder.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::error::SwagError;
use crate::reflect::{Reflect, TypeInfo};
use crate::schema::{make_schema, Schema};
use crate::util::camel;

/// HTTP methods a path item has a slot for, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    Delete,
    Head,
    Get,
    Options,
    Post,
    Put,
    Patch,
    Trace,
    Connect,
}

impl Method {
    pub const ALL: [Method; 9] = [
        Method::Delete,
        Method::Head,
        Method::Get,
        Method::Options,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Trace,
        Method::Connect,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Get => "GET",
            Method::Options => "OPTIONS",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Trace => "TRACE",
            Method::Connect => "CONNECT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = SwagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SwagError::InvalidMethod(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParameterLocation {
    #[serde(rename = "path")]
    Path,
    #[serde(rename = "query")]
    Query,
    #[serde(rename = "header")]
    Header,
    #[serde(rename = "formData")]
    FormData,
    #[serde(rename = "body")]
    Body,
}

impl FromStr for ParameterLocation {
    type Err = SwagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "path" => Ok(Self::Path),
            "query" => Ok(Self::Query),
            "header" => Ok(Self::Header),
            "formData" => Ok(Self::FormData),
            "body" => Ok(Self::Body),
            other => Err(SwagError::InvalidParameterLocation(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    Integer,
    Number,
    Boolean,
    String,
    Array,
    File,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<ParameterType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl Parameter {
    fn simple(
        location: ParameterLocation,
        name: &str,
        ty: ParameterType,
        description: &str,
        default: &str,
        required: bool,
    ) -> Self {
        Self {
            location,
            name: name.to_string(),
            description: non_empty(description),
            required,
            schema: None,
            ty: Some(ty),
            format: None,
            default: non_empty(default),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, Header>,
}

/// Security requirement of an operation or of the whole document.
///
/// Disabled serializes as `[]` (explicitly unsecured); no requirements
/// serializes as `null`; otherwise each requirement is a single-key map from
/// scheme name to scopes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecurityRequirement {
    pub requirements: Vec<(String, Vec<String>)>,
    pub disabled: bool,
}

impl SecurityRequirement {
    pub fn disabled() -> Self {
        Self {
            requirements: Vec::new(),
            disabled: true,
        }
    }

    pub fn push(&mut self, scheme: impl Into<String>, scopes: Vec<String>) {
        self.requirements.push((scheme.into(), scopes));
    }
}

impl Serialize for SecurityRequirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.disabled {
            return serializer.serialize_seq(Some(0))?.end();
        }
        if self.requirements.is_empty() {
            return serializer.serialize_none();
        }
        let mut seq = serializer.serialize_seq(Some(self.requirements.len()))?;
        for (scheme, scopes) in &self.requirements {
            let entry: BTreeMap<&str, &Vec<String>> = BTreeMap::from([(scheme.as_str(), scopes)]);
            seq.serialize_element(&entry)?;
        }
        seq.end()
    }
}

/// One operation: a method on a path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    #[serde(skip)]
    pub method: Method,
    #[serde(skip)]
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub operation_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    pub responses: BTreeMap<String, Response>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityRequirement>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
    /// The operation id was derived from method and path.
    #[serde(skip)]
    pub(crate) derived_id: bool,
}

/// `lowercase(method) + camel(path)`: `PATCH /test/{id}/sub` gives
/// `patchTestIdSub`.
pub fn derive_operation_id(method: Method, path: &str) -> String {
    format!("{}{}", method.as_str().to_ascii_lowercase(), camel(path))
}

impl Endpoint {
    pub fn builder(method: impl Into<String>, path: impl Into<String>) -> EndpointBuilder {
        EndpointBuilder::new(method, path)
    }

    pub fn get(path: impl Into<String>) -> EndpointBuilder {
        EndpointBuilder::new("GET", path)
    }

    pub fn post(path: impl Into<String>) -> EndpointBuilder {
        EndpointBuilder::new("POST", path)
    }

    pub fn put(path: impl Into<String>) -> EndpointBuilder {
        EndpointBuilder::new("PUT", path)
    }

    pub fn patch(path: impl Into<String>) -> EndpointBuilder {
        EndpointBuilder::new("PATCH", path)
    }

    pub fn delete(path: impl Into<String>) -> EndpointBuilder {
        EndpointBuilder::new("DELETE", path)
    }

    pub fn head(path: impl Into<String>) -> EndpointBuilder {
        EndpointBuilder::new("HEAD", path)
    }

    pub fn options(path: impl Into<String>) -> EndpointBuilder {
        EndpointBuilder::new("OPTIONS", path)
    }

    pub fn trace(path: impl Into<String>) -> EndpointBuilder {
        EndpointBuilder::new("TRACE", path)
    }

    pub fn connect(path: impl Into<String>) -> EndpointBuilder {
        EndpointBuilder::new("CONNECT", path)
    }

    /// Move the endpoint under another path, re-deriving a derived id.
    pub(crate) fn relocate(&mut self, path: String) {
        self.path = path;
        if self.derived_id {
            self.operation_id = derive_operation_id(self.method, &self.path);
        }
    }

    /// Schemas of body parameters and responses, in declaration order.
    pub(crate) fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.parameters
            .iter()
            .filter_map(|p| p.schema.as_ref())
            .chain(self.responses.values().filter_map(|r| r.schema.as_ref()))
    }
}

/// Chained configuration of an [`Endpoint`].
#[derive(Debug, Clone)]
pub struct EndpointBuilder {
    method: String,
    path: String,
    summary: Option<String>,
    description: Option<String>,
    operation_id: Option<String>,
    produces: Vec<String>,
    consumes: Vec<String>,
    parameters: Vec<Parameter>,
    responses: BTreeMap<String, Response>,
    tags: Vec<String>,
    security: Option<SecurityRequirement>,
    deprecated: bool,
}

const APPLICATION_JSON: &str = "application/json";
const MULTIPART_FORM_DATA: &str = "multipart/form-data";

impl EndpointBuilder {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into().to_ascii_uppercase(),
            path: path.into(),
            summary: None,
            description: None,
            operation_id: None,
            produces: vec![APPLICATION_JSON.to_string()],
            consumes: vec![APPLICATION_JSON.to_string()],
            parameters: Vec::new(),
            responses: BTreeMap::new(),
            tags: Vec::new(),
            security: None,
            deprecated: false,
        }
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }

    pub fn produces<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.produces = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn consumes<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consumes = types.into_iter().map(Into::into).collect();
        self
    }

    /// Append a fully specified parameter.
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn path_param(self, name: &str, ty: ParameterType, description: &str, required: bool) -> Self {
        self.path_default(name, ty, description, "", required)
    }

    /// Required string path parameter.
    pub fn path_string(self, name: &str, description: &str) -> Self {
        self.path_default(name, ParameterType::String, description, "", true)
    }

    pub fn path_default(
        self,
        name: &str,
        ty: ParameterType,
        description: &str,
        default: &str,
        required: bool,
    ) -> Self {
        self.parameter(Parameter::simple(
            ParameterLocation::Path,
            name,
            ty,
            description,
            default,
            required,
        ))
    }

    pub fn query(self, name: &str, ty: ParameterType, description: &str, required: bool) -> Self {
        self.query_default(name, ty, description, "", required)
    }

    /// Optional string query parameter.
    pub fn query_string(self, name: &str, description: &str) -> Self {
        self.query_default(name, ParameterType::String, description, "", false)
    }

    pub fn query_default(
        self,
        name: &str,
        ty: ParameterType,
        description: &str,
        default: &str,
        required: bool,
    ) -> Self {
        self.parameter(Parameter::simple(
            ParameterLocation::Query,
            name,
            ty,
            description,
            default,
            required,
        ))
    }

    pub fn header_param(self, name: &str, ty: ParameterType, description: &str, required: bool) -> Self {
        self.parameter(Parameter::simple(
            ParameterLocation::Header,
            name,
            ty,
            description,
            "",
            required,
        ))
    }

    /// Form field; the endpoint then also consumes `multipart/form-data`.
    pub fn form_data(mut self, name: &str, ty: ParameterType, description: &str, required: bool) -> Self {
        self.parameters.push(Parameter::simple(
            ParameterLocation::FormData,
            name,
            ty,
            description,
            "",
            required,
        ));
        self.consumes.push(MULTIPART_FORM_DATA.to_string());
        self.consumes.sort();
        self.consumes.dedup();
        self
    }

    /// Body parameter described by `T`.
    pub fn body<T: Reflect + ?Sized>(self, description: &str, required: bool) -> Self {
        self.body_type(T::type_info(), description, required)
    }

    pub fn body_type(self, prototype: TypeInfo, description: &str, required: bool) -> Self {
        self.parameter(Parameter {
            location: ParameterLocation::Body,
            name: "body".to_string(),
            description: non_empty(description),
            required,
            schema: Some(make_schema(prototype)),
            ty: None,
            format: None,
            default: None,
        })
    }

    pub fn response(mut self, code: u16, description: &str, response: ResponseBuilder) -> Self {
        self.responses
            .insert(code.to_string(), response.build(description));
        self
    }

    /// `200` with description `success`.
    pub fn response_success(self, response: ResponseBuilder) -> Self {
        self.response(200, "success", response)
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Require `scheme` with the given scopes. Calls accumulate.
    pub fn security<I, S>(mut self, scheme: &str, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let requirement = self.security.get_or_insert_with(SecurityRequirement::default);
        requirement.push(scheme, scopes.into_iter().map(Into::into).collect());
        self
    }

    /// Mark the endpoint as explicitly unsecured.
    pub fn no_security(mut self) -> Self {
        self.security = Some(SecurityRequirement::disabled());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    pub fn build(self) -> Result<Endpoint, SwagError> {
        let method: Method = self.method.parse()?;
        let (operation_id, derived_id) = match self.operation_id {
            Some(id) => (id, false),
            None => (derive_operation_id(method, &self.path), true),
        };
        Ok(Endpoint {
            method,
            path: self.path,
            tags: self.tags,
            summary: self.summary,
            description: self.description,
            operation_id,
            produces: self.produces,
            consumes: self.consumes,
            parameters: self.parameters,
            responses: self.responses,
            security: self.security,
            deprecated: self.deprecated,
            derived_id,
        })
    }
}

/// Schema and headers of one response.
#[derive(Debug, Clone, Default)]
pub struct ResponseBuilder {
    schema: Option<Schema>,
    headers: BTreeMap<String, Header>,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema<T: Reflect + ?Sized>(self) -> Self {
        self.schema_type(T::type_info())
    }

    pub fn schema_type(mut self, prototype: TypeInfo) -> Self {
        self.schema = Some(make_schema(prototype));
        self
    }

    pub fn header(mut self, name: &str, ty: &str, format: &str, description: &str) -> Self {
        self.headers.insert(
            name.to_string(),
            Header {
                ty: ty.to_string(),
                format: non_empty(format),
                description: non_empty(description),
            },
        );
        self
    }

    fn build(self, description: &str) -> Response {
        Response {
            description: description.to_string(),
            schema: self.schema,
            headers: self.headers,
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
