//! Swagger UI serving.
//!
//! [`SwaggerUi`] renders an HTML page that loads Swagger UI from a CDN and
//! embeds the API document, and serves the raw document next to it:
//!
//! | Request (relative to the mount) | Response                  |
//! |---------------------------------|---------------------------|
//! | `GET /`, `GET /index.html`      | Swagger UI page           |
//! | `GET /swagger.json`             | the document as JSON      |
//! | anything else                   | passed on (`Continue`)    |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docgate_docs::{ApiDocument, Info, SwaggerUi};
//!
//! let doc = ApiDocument::new(Info::new("My API", "1.0.0"));
//! let swagger = SwaggerUi::new(&doc).title("My API docs");
//!
//! // Mount it after the gate
//! let chain = Chain::new([Layer::handler(gate), Layer::handler(swagger)]);
//! ```

use docgate_middleware::{
    html_escape, BoxFuture, Middleware, MiddlewareContext, MiddlewareError, MiddlewareResult,
    Outcome, Request, Response, ResponseExt,
};
use http::Method;
use std::sync::Arc;

use crate::document::ApiDocument;
use crate::error::DocsResult;

/// Relative path of the raw document.
pub const SPEC_PATH: &str = "/swagger.json";

/// Swagger UI configuration and HTML generation.
///
/// The document is captured when the UI is created; later changes to the
/// source document are not shown.
#[derive(Debug, Clone)]
pub struct SwaggerUi {
    /// Snapshot of the document to display.
    document: Arc<ApiDocument>,
    /// Title for the HTML page.
    title: String,
    /// Whether to use deep linking (URL updates with operations).
    deep_linking: bool,
    /// Default expansion depth for operations.
    doc_expansion: DocExpansion,
    /// Whether to display the request duration.
    display_request_duration: bool,
    /// Swagger UI version to use from CDN.
    swagger_version: String,
}

/// Document expansion level for Swagger UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocExpansion {
    /// Show all operations collapsed.
    None,
    /// Show only the list of operations.
    #[default]
    List,
    /// Expand all operations fully.
    Full,
}

impl DocExpansion {
    fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::List => "list",
            Self::Full => "full",
        }
    }
}

impl SwaggerUi {
    /// Create a Swagger UI for a snapshot of `document`.
    #[must_use]
    pub fn new(document: &ApiDocument) -> Self {
        Self {
            title: format!("{} - Swagger UI", document.info.title),
            document: Arc::new(document.clone()),
            deep_linking: true,
            doc_expansion: DocExpansion::List,
            display_request_duration: true,
            swagger_version: "5.18.2".to_string(),
        }
    }

    /// Set the page title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Enable or disable deep linking.
    #[must_use]
    pub fn deep_linking(mut self, enabled: bool) -> Self {
        self.deep_linking = enabled;
        self
    }

    /// Set the document expansion level.
    #[must_use]
    pub fn doc_expansion(mut self, expansion: DocExpansion) -> Self {
        self.doc_expansion = expansion;
        self
    }

    /// Enable or disable request duration display.
    #[must_use]
    pub fn display_request_duration(mut self, enabled: bool) -> Self {
        self.display_request_duration = enabled;
        self
    }

    /// Set the Swagger UI version to use.
    #[must_use]
    pub fn swagger_version(mut self, version: impl Into<String>) -> Self {
        self.swagger_version = version.into();
        self
    }

    /// Returns the displayed document.
    #[must_use]
    pub fn document(&self) -> &ApiDocument {
        &self.document
    }

    /// Get the document as JSON.
    pub fn spec_json(&self) -> DocsResult<String> {
        self.document.to_json()
    }

    /// Generate the HTML page.
    pub fn html(&self) -> DocsResult<String> {
        // A "</script>" inside a description must not close the tag.
        let spec_json = serde_json::to_string(&*self.document)?.replace("</", "<\\/");

        Ok(format!(
            r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@{version}/swagger-ui.css" />
    <style>
        html {{
            box-sizing: border-box;
            overflow-y: scroll;
        }}
        *,
        *:before,
        *:after {{
            box-sizing: inherit;
        }}
        body {{
            margin: 0;
            background: #fafafa;
        }}
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@{version}/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@{version}/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {{
            window.ui = SwaggerUIBundle({{
                spec: {spec_json},
                dom_id: '#swagger-ui',
                deepLinking: {deep_linking},
                docExpansion: '{doc_expansion}',
                displayRequestDuration: {display_duration},
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout"
            }});
        }};
    </script>
</body>
</html>"##,
            title = html_escape(&self.title),
            version = self.swagger_version,
            spec_json = spec_json,
            deep_linking = self.deep_linking,
            doc_expansion = self.doc_expansion.as_str(),
            display_duration = self.display_request_duration,
        ))
    }
}

impl Middleware for SwaggerUi {
    fn name(&self) -> &'static str {
        "swagger_ui"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: &'a Request,
    ) -> BoxFuture<'a, MiddlewareResult> {
        Box::pin(async move {
            if *request.method() != Method::GET {
                return Ok(Outcome::Continue);
            }

            let rendered = match ctx.path() {
                "/" | "/index.html" => self.html().map(Response::html),
                SPEC_PATH => self.spec_json().map(Response::json),
                _ => return Ok(Outcome::Continue),
            };
            tracing::trace!(path = ctx.path(), base = ctx.base_path(), "serving api docs");

            rendered
                .map(Outcome::Respond)
                .map_err(|e| MiddlewareError::source(self.name(), e))
        })
    }
}
