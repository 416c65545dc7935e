//! The document root and endpoint aggregation.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::endpoint::{Endpoint, Method, SecurityRequirement};
use crate::error::SwagError;
use crate::schema::{define, Object};
use crate::security::SecurityScheme;
use crate::util::join_paths;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Contact {
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct License {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub terms_of_service: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    pub license: License,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            description: "Describe your API".to_string(),
            version: "SNAPSHOT".to_string(),
            terms_of_service: "http://swagger.io/terms/".to_string(),
            title: "Your API Title".to_string(),
            contact: None,
            license: License {
                name: "Apache 2.0".to_string(),
                url: "http://www.apache.org/licenses/LICENSE-2.0.html".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagDocs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<TagDocs>,
}

impl Tag {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            name: name.into(),
            description: (!description.is_empty()).then_some(description),
            external_docs: None,
        }
    }

    pub fn with_docs(mut self, url: impl Into<String>, description: impl Into<String>) -> Self {
        let description = description.into();
        self.external_docs = Some(TagDocs {
            description: (!description.is_empty()).then_some(description),
            url: url.into(),
        });
        self
    }
}

/// Operations of one path, one slot per method.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Endpoints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Endpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Endpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Endpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Endpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Endpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Endpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Endpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Endpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect: Option<Endpoint>,
}

impl Endpoints {
    pub fn endpoint(&self, method: Method) -> Option<&Endpoint> {
        match method {
            Method::Delete => self.delete.as_ref(),
            Method::Head => self.head.as_ref(),
            Method::Get => self.get.as_ref(),
            Method::Options => self.options.as_ref(),
            Method::Post => self.post.as_ref(),
            Method::Put => self.put.as_ref(),
            Method::Patch => self.patch.as_ref(),
            Method::Trace => self.trace.as_ref(),
            Method::Connect => self.connect.as_ref(),
        }
    }

    fn slot_mut(&mut self, method: Method) -> &mut Option<Endpoint> {
        match method {
            Method::Delete => &mut self.delete,
            Method::Head => &mut self.head,
            Method::Get => &mut self.get,
            Method::Options => &mut self.options,
            Method::Post => &mut self.post,
            Method::Put => &mut self.put,
            Method::Patch => &mut self.patch,
            Method::Trace => &mut self.trace,
            Method::Connect => &mut self.connect,
        }
    }

    /// Occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        Method::ALL.into_iter().filter_map(|m| self.endpoint(m))
    }
}

fn is_empty_shared<K, V>(map: &Arc<BTreeMap<K, V>>) -> bool {
    map.is_empty()
}

/// A Swagger 2.0 document.
///
/// `paths` and `definitions` are shared: cloning an `Api` is a shallow
/// snapshot, and later registrations copy the maps before writing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Api {
    pub swagger: String,
    pub info: Info,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub base_path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,
    #[serde(skip_serializing_if = "is_empty_shared")]
    paths: Arc<BTreeMap<String, Endpoints>>,
    #[serde(skip_serializing_if = "is_empty_shared")]
    definitions: Arc<BTreeMap<String, Object>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub security_definitions: BTreeMap<String, SecurityScheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityRequirement>,
    #[serde(skip)]
    pending_tags: Vec<String>,
    #[serde(skip)]
    pending_group: Option<String>,
}

impl Default for Api {
    fn default() -> Self {
        Self::new()
    }
}

impl Api {
    pub fn new() -> Self {
        Self {
            swagger: "2.0".to_string(),
            info: Info::default(),
            base_path: "/".to_string(),
            schemes: vec!["http".to_string()],
            paths: Arc::default(),
            definitions: Arc::default(),
            tags: Vec::new(),
            host: None,
            security_definitions: BTreeMap::new(),
            security: None,
            pending_tags: Vec::new(),
            pending_group: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.info.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.info.description = description.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.info.version = version.into();
        self
    }

    pub fn with_terms_of_service(mut self, terms: impl Into<String>) -> Self {
        self.info.terms_of_service = terms.into();
        self
    }

    pub fn with_contact_email(mut self, email: impl Into<String>) -> Self {
        self.info.contact = Some(Contact { email: email.into() });
        self
    }

    pub fn with_license(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.info.license = License {
            name: name.into(),
            url: url.into(),
        };
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schemes = schemes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_tag_entry(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn with_security_scheme(mut self, name: impl Into<String>, scheme: SecurityScheme) -> Self {
        self.security_definitions.insert(name.into(), scheme);
        self
    }

    /// Add a document-wide security requirement. Calls accumulate.
    pub fn with_security<I, S>(mut self, scheme: &str, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.security
            .get_or_insert_with(SecurityRequirement::default)
            .push(scheme, scopes.into_iter().map(Into::into).collect());
        self
    }

    /// Register unknown tags and tag the endpoints of the next
    /// [`add_endpoints`](Self::add_endpoints) call with all of `tags`.
    pub fn with_tags(&mut self, tags: impl IntoIterator<Item = Tag>) -> &mut Self {
        let mut names = Vec::new();
        for tag in tags {
            names.push(tag.name.clone());
            if !self.tags.iter().any(|t| t.name == tag.name) {
                self.tags.push(tag);
            }
        }
        self.pending_tags = names;
        self
    }

    pub fn with_tag(&mut self, name: &str, description: &str) -> &mut Self {
        self.with_tags([Tag::new(name, description)])
    }

    /// Place the endpoints of the next registration call under `prefix`.
    pub fn with_group(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.pending_group = Some(prefix.into());
        self
    }

    /// Append a tag without activating it.
    pub fn add_tag(&mut self, name: &str, description: &str) {
        self.tags.push(Tag::new(name, description));
    }

    pub fn add_endpoint(&mut self, endpoint: Endpoint) -> Result<(), SwagError> {
        self.add_endpoints([endpoint])
    }

    /// Register endpoints and every definition their schemas reach.
    ///
    /// A method already present on a path is replaced. Definitions are
    /// merged first-wins. Active tags and group are consumed by this call.
    pub fn add_endpoints(&mut self, endpoints: impl IntoIterator<Item = Endpoint>) -> Result<(), SwagError> {
        let tags = std::mem::take(&mut self.pending_tags);
        let group = self.pending_group.take();

        for mut endpoint in endpoints {
            if let Some(prefix) = &group {
                let path = join_paths(prefix, &endpoint.path);
                endpoint.relocate(path);
            }
            endpoint.tags.extend(tags.iter().cloned());

            let mut found = BTreeMap::new();
            for schema in endpoint.schemas() {
                for (name, obj) in define(&schema.prototype)? {
                    found.entry(name).or_insert(obj);
                }
            }
            self.merge_definitions(found);
            self.insert_path(endpoint);
        }
        Ok(())
    }

    fn insert_path(&mut self, endpoint: Endpoint) {
        debug!(method = %endpoint.method, path = %endpoint.path, operation_id = %endpoint.operation_id, "Registered endpoint");
        let paths = Arc::make_mut(&mut self.paths);
        let slot = paths
            .entry(endpoint.path.clone())
            .or_default()
            .slot_mut(endpoint.method);
        if slot.is_some() {
            debug!(method = %endpoint.method, path = %endpoint.path, "Replacing previously registered endpoint");
        }
        *slot = Some(endpoint);
    }

    fn merge_definitions(&mut self, found: BTreeMap<String, Object>) {
        let mut fresh = Vec::new();
        for (name, obj) in found {
            match self.definitions.get(&name) {
                Some(existing) if !same_shape(existing, &obj) => {
                    warn!(definition = %name, "Definition already registered with a different shape, keeping the first");
                }
                Some(_) => {}
                None => fresh.push((name, obj)),
            }
        }
        if fresh.is_empty() {
            return;
        }
        let definitions = Arc::make_mut(&mut self.definitions);
        for (name, obj) in fresh {
            debug!(definition = %name, "Registered definition");
            definitions.insert(name, obj);
        }
    }

    pub fn paths(&self) -> &BTreeMap<String, Endpoints> {
        &self.paths
    }

    pub fn definitions(&self) -> &BTreeMap<String, Object> {
        &self.definitions
    }

    pub fn endpoint(&self, path: &str, method: Method) -> Option<&Endpoint> {
        self.paths.get(path).and_then(|e| e.endpoint(method))
    }

    /// Visit every endpoint with the base path joined onto its path, in path
    /// order then slot order.
    pub fn walk(&self, mut callback: impl FnMut(&str, &Endpoint)) {
        for (path, endpoints) in self.paths.iter() {
            let full = join_paths(&self.base_path, path);
            for endpoint in endpoints.iter() {
                callback(&full, endpoint);
            }
        }
    }

    /// Shallow copy served for one request, with `host` and `schemes`
    /// describing how it was reached.
    pub fn snapshot(&self, host: Option<String>, scheme: &str) -> Api {
        let mut doc = self.clone();
        doc.host = host;
        doc.schemes = vec![scheme.to_string()];
        doc.pending_tags.clear();
        doc.pending_group = None;
        doc
    }
}

/// Everything a definition serializes; the array marker and key are not part
/// of the shape.
fn same_shape(a: &Object, b: &Object) -> bool {
    a.ty == b.ty
        && a.description == b.description
        && a.format == b.format
        && a.enum_values == b.enum_values
        && a.items == b.items
        && a.additional_properties == b.additional_properties
        && a.required == b.required
        && a.properties == b.properties
}
