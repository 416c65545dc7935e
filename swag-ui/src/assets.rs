use std::borrow::Cow;

use rust_embed::RustEmbed;

/// Document URL baked into the bundled `index.html`, replaced when served.
pub const MARKER_URL: &str = "https://petstore.swagger.io/v2/swagger.json";

/// Location of the swagger-ui scripts and stylesheet baked into the bundled
/// `index.html`, replaced with [`DocsConfig::asset_base`] when served.
///
/// [`DocsConfig::asset_base`]: crate::DocsConfig::asset_base
pub const MARKER_ASSET_BASE: &str = "https://unpkg.com/swagger-ui-dist@5";

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Bundle;

pub(crate) fn read(name: &str) -> Option<Cow<'static, [u8]>> {
    Bundle::get(name).map(|file| file.data)
}

fn list() -> Vec<String> {
    let mut names: Vec<String> = Bundle::iter().map(|name| name.into_owned()).collect();
    names.sort();
    names
}

/// Route patterns the UI answers under `prefix`: the directory itself
/// followed by every bundled file.
pub fn ui_patterns(prefix: &str) -> Vec<String> {
    let prefix = prefix.trim_end_matches('/');
    let mut patterns = vec![format!("{prefix}/")];
    patterns.extend(list().into_iter().map(|name| format!("{prefix}/{name}")));
    patterns
}
