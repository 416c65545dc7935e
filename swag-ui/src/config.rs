use crate::assets::MARKER_ASSET_BASE;

/// Where the document and the UI are mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsConfig {
    /// Route serving the JSON document.
    pub json_path: String,
    /// Route prefix of the bundled UI, without trailing slash.
    pub ui_prefix: String,
    /// Whether the UI routes are mounted at all.
    pub ui_enabled: bool,
    /// Prefix the document URL given to the UI with `scheme://host` of the
    /// incoming request.
    pub auto_domain: bool,
    /// Document URL handed to the UI. Defaults to `json_path`.
    pub document_url: Option<String>,
    /// Where the UI loads `swagger-ui-bundle.js` and friends from, without
    /// trailing slash. `"."` loads them from the UI prefix itself, which
    /// works offline once the swagger-ui-dist files sit in `assets/`.
    pub asset_base: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            json_path: "/swagger.json".to_string(),
            ui_prefix: "/swagger/ui".to_string(),
            ui_enabled: true,
            auto_domain: false,
            document_url: None,
            asset_base: MARKER_ASSET_BASE.to_string(),
        }
    }
}

impl DocsConfig {
    pub fn with_json_path(mut self, path: impl Into<String>) -> Self {
        self.json_path = path.into();
        self
    }

    pub fn with_ui_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.ui_prefix = prefix.trim_end_matches('/').to_string();
        self
    }

    pub fn without_ui(mut self) -> Self {
        self.ui_enabled = false;
        self
    }

    pub fn with_auto_domain(mut self, auto_domain: bool) -> Self {
        self.auto_domain = auto_domain;
        self
    }

    pub fn with_document_url(mut self, url: impl Into<String>) -> Self {
        self.document_url = Some(url.into());
        self
    }

    pub fn with_asset_base(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.asset_base = base.trim_end_matches('/').to_string();
        self
    }

    pub(crate) fn document_url(&self) -> &str {
        self.document_url.as_deref().unwrap_or(&self.json_path)
    }
}
