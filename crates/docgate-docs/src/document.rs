//! The Swagger 2.0 document accumulator.
//!
//! [`ApiDocument`] collects operations keyed by path and verb, and schemas
//! keyed by definition name, preserving registration order. Both keys are
//! write-once.
//!
//! Swagger 2.0 reference: <https://swagger.io/specification/v2/>

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{DocsError, DocsResult};

/// Swagger version written into every document.
pub const SWAGGER_VERSION: &str = "2.0";

/// API metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
    /// API description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Terms of service URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "termsOfService")]
    pub terms_of_service: Option<String>,
    /// Contact information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    /// License information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

impl Info {
    /// Creates metadata with a title and version.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
            terms_of_service: None,
            contact: None,
            license: None,
        }
    }

    /// Adds a description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Contact information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Contact name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Contact URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// License information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// License name.
    pub name: String,
    /// License URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// HTTP verbs a path can be documented under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl HttpVerb {
    /// The lower-case key used in a Swagger path item.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Swagger 2.0 document built up one registration at a time.
///
/// # Example
///
/// ```
/// use docgate_docs::{ApiDocument, HttpVerb, Info};
/// use serde_json::json;
///
/// let mut doc = ApiDocument::new(Info::new("Pets", "1.0.0"));
/// let pet = doc.add_definition("Pet", json!({ "type": "object" })).unwrap();
/// assert_eq!(pet, "#/definitions/Pet");
///
/// doc.add_path(HttpVerb::Get, "/pets", json!({ "summary": "List pets" })).unwrap();
/// assert!(doc.add_path(HttpVerb::Get, "/pets", json!({})).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiDocument {
    /// Always "2.0".
    pub swagger: String,
    /// API metadata.
    pub info: Info,
    /// Operations by path, then by lower-case verb.
    pub paths: IndexMap<String, IndexMap<String, Value>>,
    /// Named schemas.
    pub definitions: IndexMap<String, Value>,
}

impl ApiDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new(info: Info) -> Self {
        Self {
            swagger: SWAGGER_VERSION.to_string(),
            info,
            paths: IndexMap::new(),
            definitions: IndexMap::new(),
        }
    }

    /// Documents `verb path` with an operation object.
    pub fn add_path(
        &mut self,
        verb: HttpVerb,
        path: impl Into<String>,
        operation: Value,
    ) -> DocsResult<()> {
        let path = path.into();
        let item = self.paths.entry(path.clone()).or_default();
        if item.contains_key(verb.as_str()) {
            return Err(DocsError::DuplicatePath {
                verb: verb.as_str().to_string(),
                path,
            });
        }
        item.insert(verb.as_str().to_string(), operation);
        Ok(())
    }

    /// Registers a named schema and returns its `$ref` target.
    pub fn add_definition(&mut self, name: impl Into<String>, schema: Value) -> DocsResult<String> {
        let name = name.into();
        if self.definitions.contains_key(&name) {
            return Err(DocsError::DuplicateDefinition { name });
        }
        let reference = definition_ref(&name);
        self.definitions.insert(name, schema);
        Ok(reference)
    }

    /// Returns the operation documented for `verb path`.
    #[must_use]
    pub fn operation(&self, verb: HttpVerb, path: &str) -> Option<&Value> {
        self.paths.get(path)?.get(verb.as_str())
    }

    /// Returns the number of documented operations.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(IndexMap::len).sum()
    }

    /// Serializes the document as pretty-printed JSON.
    pub fn to_json(&self) -> DocsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Returns the `$ref` target for a definition name.
#[must_use]
pub fn definition_ref(name: &str) -> String {
    format!("#/definitions/{name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> ApiDocument {
        ApiDocument::new(Info::new("Pets", "1.0.0"))
    }

    #[test]
    fn test_new_document_shape() {
        let value = serde_json::to_value(doc()).unwrap();
        assert_eq!(
            value,
            json!({
                "swagger": "2.0",
                "info": { "title": "Pets", "version": "1.0.0" },
                "paths": {},
                "definitions": {}
            })
        );
    }

    #[test]
    fn test_add_path_groups_verbs_under_path() {
        let mut doc = doc();
        doc.add_path(HttpVerb::Get, "/pets", json!({ "summary": "list" })).unwrap();
        doc.add_path(HttpVerb::Post, "/pets", json!({ "summary": "create" })).unwrap();
        doc.add_path(HttpVerb::Delete, "/pets/{id}", json!({})).unwrap();

        assert_eq!(doc.paths.len(), 2);
        assert_eq!(doc.operation_count(), 3);
        assert_eq!(
            doc.operation(HttpVerb::Post, "/pets"),
            Some(&json!({ "summary": "create" }))
        );
        assert_eq!(doc.operation(HttpVerb::Put, "/pets"), None);

        let verbs: Vec<&str> = doc.paths["/pets"].keys().map(String::as_str).collect();
        assert_eq!(verbs, ["get", "post"]);
    }

    #[test]
    fn test_duplicate_path_rejected() {
        let mut doc = doc();
        doc.add_path(HttpVerb::Get, "/x", json!({ "first": true })).unwrap();

        let err = doc.add_path(HttpVerb::Get, "/x", json!({})).unwrap_err();
        assert!(matches!(err, DocsError::DuplicatePath { ref verb, ref path } if verb == "get" && path == "/x"));
        assert_eq!(doc.operation(HttpVerb::Get, "/x"), Some(&json!({ "first": true })));
    }

    #[test]
    fn test_duplicate_definition_rejected() {
        let mut doc = doc();
        assert_eq!(
            doc.add_definition("Pet", json!({ "type": "object" })).unwrap(),
            "#/definitions/Pet"
        );
        assert!(matches!(
            doc.add_definition("Pet", json!({})),
            Err(DocsError::DuplicateDefinition { .. })
        ));
        assert_eq!(doc.definitions["Pet"], json!({ "type": "object" }));
    }

    #[test]
    fn test_verb_display() {
        assert_eq!(HttpVerb::Patch.to_string(), "patch");
        assert_eq!(HttpVerb::Delete.to_string(), "delete");
    }

    #[test]
    fn test_to_json_keeps_insertion_order() {
        let mut doc = doc();
        doc.add_path(HttpVerb::Get, "/zebra", json!({})).unwrap();
        doc.add_path(HttpVerb::Get, "/apple", json!({})).unwrap();

        let json = doc.to_json().unwrap();
        assert!(json.find("/zebra").unwrap() < json.find("/apple").unwrap());
    }
}
