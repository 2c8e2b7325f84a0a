//! Postman Collection v2.1 documents.
//!
//! Only the subset of the schema that is generated from Markdown is modelled
//! here. Field order matches the order Postman itself exports.

use serde::Serialize;

mod builder;
mod script;

pub use builder::{build, convert_request};
pub use script::{prerequest_script, save_variable_script};

/// The JSON schema identifier for Postman Collection v2.1.
pub const SCHEMA_URL: &str = "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// The exporter identifier written into every generated collection.
pub const EXPORTER_ID: &str = "markdown-to-postman";

/// A complete collection document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection {
    /// Collection metadata.
    pub info: Info,
    /// Top-level requests and folders.
    pub item: Vec<Item>,
    /// Collection variables.
    pub variable: Vec<Variable>,
    /// Collection-level scripts. Always empty.
    pub event: Vec<Event>,
}

/// Collection metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Info {
    /// Collection name.
    pub name: String,
    /// Collection description.
    pub description: String,
    /// Schema URL, always [`SCHEMA_URL`].
    pub schema: String,
    /// A random identifier generated per build.
    #[serde(rename = "_postman_id")]
    pub postman_id: String,
    /// Always [`EXPORTER_ID`].
    #[serde(rename = "_exporter_id")]
    pub exporter_id: String,
}

/// An entry in an item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Item {
    /// A single request.
    Request(RequestItem),
    /// A named group of requests.
    Folder(FolderItem),
}

impl Item {
    /// The item's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Request(request) => &request.name,
            Self::Folder(folder) => &folder.name,
        }
    }
}

/// A folder of requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderItem {
    /// Folder name.
    pub name: String,
    /// Requests in source order.
    pub item: Vec<RequestItem>,
}

/// A named request, with its scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestItem {
    /// Request name.
    pub name: String,
    /// The HTTP request.
    pub request: Request,
    /// Test and pre-request scripts, in that order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub event: Vec<Event>,
}

/// An HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    /// Uppercase HTTP method.
    pub method: String,
    /// Request headers.
    pub header: Vec<Header>,
    /// Structured URL.
    pub url: Url,
    /// Request body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
    /// Request description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A request header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    /// Header name.
    pub key: String,
    /// Header value.
    pub value: String,
    /// Always `"text"`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Header {
    /// Creates a plain-text header.
    #[must_use]
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            kind: "text".to_string(),
        }
    }
}

/// A structured request URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Url {
    /// The complete URL including the query string.
    pub raw: String,
    /// URL scheme, `https` when the URL has none.
    pub protocol: String,
    /// Host labels.
    pub host: Vec<String>,
    /// Path segments.
    pub path: Vec<String>,
    /// Query parameters.
    pub query: Vec<QueryParam>,
}

/// A URL query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParam {
    /// Parameter name.
    pub key: String,
    /// Parameter value.
    pub value: String,
}

/// A request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Body {
    /// Always `"raw"`.
    pub mode: String,
    /// The body text.
    pub raw: String,
    /// Language hint, set for JSON bodies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<BodyOptions>,
}

impl Body {
    /// A body marked as JSON.
    #[must_use]
    pub fn json(raw: String) -> Self {
        Self {
            mode: "raw".to_string(),
            raw,
            options: Some(BodyOptions {
                raw: RawOptions {
                    language: "json".to_string(),
                },
            }),
        }
    }

    /// A body with no language hint.
    #[must_use]
    pub fn text(raw: String) -> Self {
        Self {
            mode: "raw".to_string(),
            raw,
            options: None,
        }
    }
}

/// Body options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyOptions {
    /// Options for raw bodies.
    pub raw: RawOptions,
}

/// Options for raw bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawOptions {
    /// Editor language, e.g. `json`.
    pub language: String,
}

/// The phase a script runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Listen {
    /// After the response is received.
    Test,
    /// Before the request is sent.
    Prerequest,
}

/// A script attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// When the script runs.
    pub listen: Listen,
    /// The script itself.
    pub script: Script,
}

impl Event {
    /// A JavaScript event from the given lines.
    #[must_use]
    pub fn javascript(listen: Listen, exec: Vec<String>) -> Self {
        Self {
            listen,
            script: Script {
                kind: "text/javascript".to_string(),
                exec,
            },
        }
    }
}

/// Script source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Script {
    /// Always `"text/javascript"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Source lines.
    pub exec: Vec<String>,
}

/// A collection variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    /// Variable name.
    pub key: String,
    /// Initial value, always empty.
    pub value: String,
    /// Always `"string"`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Variable {
    /// An empty string variable.
    #[must_use]
    pub fn empty(key: String) -> Self {
        Self {
            key,
            value: String::new(),
            kind: "string".to_string(),
        }
    }
}

/// Serializes a collection as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize(collection: &Collection) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(collection)
}
