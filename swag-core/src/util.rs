//! Small string helpers shared by the document model.

/// Convert a Swagger path into a colon-identified path.
///
/// `/api/orgs/{org}` becomes `/api/orgs/:org`.
pub fn colon_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + len];
        if name.is_empty() {
            out.push_str(&rest[..start + len + 1]);
        } else {
            out.push_str(&rest[..start]);
            out.push(':');
            out.push_str(name);
        }
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);
    out
}

/// Camel-case every `/`-separated segment of a path, dropping anything that
/// is not ASCII alphanumeric. `/test/{id}/sub` becomes `TestIdSub`.
pub(crate) fn camel(path: &str) -> String {
    path.split('/')
        .filter_map(|segment| {
            let cleaned: String = segment.chars().filter(char::is_ascii_alphanumeric).collect();
            let mut chars = cleaned.chars();
            let first = chars.next()?;
            Some(first.to_ascii_uppercase().to_string() + chars.as_str())
        })
        .collect()
}

/// Reference string for a definition name.
pub(crate) fn make_ref(name: &str) -> String {
    format!("#/definitions/{name}")
}

/// Definition names may not contain hyphens.
pub(crate) fn normalize_name(name: &str) -> String {
    name.replace('-', "_")
}

/// Join URL paths and clean duplicate or trailing separators.
pub(crate) fn join_paths(base: &str, path: &str) -> String {
    let segments: Vec<&str> = base
        .split('/')
        .chain(path.split('/'))
        .filter(|s| !s.is_empty())
        .collect();
    let rooted = base.starts_with('/') || path.starts_with('/');
    match (rooted, segments.is_empty()) {
        (true, _) => format!("/{}", segments.join("/")),
        (false, true) => ".".to_string(),
        (false, false) => segments.join("/"),
    }
}
