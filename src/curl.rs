//! cURL command tokenizing.
//!
//! Only the parts of a command that map onto a Postman request are
//! extracted: method, URL, headers, body and query parameters. Everything
//! else is skipped.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use tracing::debug;

pub mod shell;
mod url_parts;

pub use url_parts::{UrlParts, decode_query, encode_query};

use crate::variables::extract_variables;

const DEFAULT_METHOD: &str = "GET";

const METHOD_FLAGS: &[&str] = &["-X", "--request"];
const HEADER_FLAGS: &[&str] = &["-H", "--header"];
const DATA_FLAGS: &[&str] = &["-d", "--data", "--data-raw", "--data-binary"];
const JSON_FLAGS: &[&str] = &["--json"];

/// The flags that take a value and are understood by [`tokenize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Method,
    Header,
    Data,
    Json,
}

impl Flag {
    fn classify(token: &str) -> Option<Self> {
        if METHOD_FLAGS.contains(&token) {
            Some(Self::Method)
        } else if HEADER_FLAGS.contains(&token) {
            Some(Self::Header)
        } else if DATA_FLAGS.contains(&token) {
            Some(Self::Data)
        } else if JSON_FLAGS.contains(&token) {
            Some(Self::Json)
        } else {
            None
        }
    }
}

/// The structured parts of a cURL command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Uppercase HTTP method.
    pub method: String,
    /// The URL without its query string.
    pub url: String,
    /// Request headers. A repeated header name keeps its last value.
    pub headers: IndexMap<String, String>,
    /// Raw request body, which need not be JSON.
    pub body: Option<String>,
    /// Query parameters decoded from the URL.
    pub query_params: IndexMap<String, String>,
}

impl Default for ParsedCommand {
    fn default() -> Self {
        Self {
            method: DEFAULT_METHOD.to_string(),
            url: String::new(),
            headers: IndexMap::new(),
            body: None,
            query_params: IndexMap::new(),
        }
    }
}

impl ParsedCommand {
    /// Every `{{name}}` placeholder used in the URL, headers, body or query
    /// parameters.
    #[must_use]
    pub fn variables(&self) -> BTreeSet<String> {
        let mut variables = extract_variables(&self.url);

        for (name, value) in &self.headers {
            variables.extend(extract_variables(name));
            variables.extend(extract_variables(value));
        }

        if let Some(body) = &self.body {
            variables.extend(extract_variables(body));
        }

        for (key, value) in &self.query_params {
            variables.extend(extract_variables(key));
            variables.extend(extract_variables(value));
        }

        variables
    }

    fn promote_to_post(&mut self) {
        if self.method == DEFAULT_METHOD {
            self.method = "POST".to_string();
        }
    }
}

/// Tokenizes a cURL command line.
///
/// This never fails. If the command has unbalanced quotes it is split on
/// whitespace instead.
///
/// Unknown flags are skipped together with the following token, unless that
/// token itself looks like a flag. The first remaining bare token is the
/// URL.
#[must_use]
pub fn tokenize(command: &str) -> ParsedCommand {
    let command = strip_curl_prefix(command.trim());

    let tokens = shell::split(command).unwrap_or_else(|error| {
        debug!(%error, "falling back to whitespace splitting");
        command
            .split_whitespace()
            .filter(|token| *token != "\\")
            .map(str::to_string)
            .collect()
    });

    let mut parsed = ParsedCommand::default();
    let mut index = 0;

    while index < tokens.len() {
        let token = tokens[index].as_str();
        let value = tokens.get(index + 1);

        match (Flag::classify(token), value) {
            (Some(Flag::Method), Some(method)) => {
                parsed.method = method.to_uppercase();
                index += 2;
            }
            (Some(Flag::Header), Some(header)) => {
                if let Some((name, value)) = header.split_once(':') {
                    parsed
                        .headers
                        .insert(name.trim().to_string(), value.trim().to_string());
                }
                index += 2;
            }
            (Some(Flag::Data), Some(body)) => {
                parsed.body = Some(body.clone());
                parsed.promote_to_post();
                index += 2;
            }
            (Some(Flag::Json), Some(body)) => {
                parsed.body = Some(body.clone());
                parsed
                    .headers
                    .insert("Content-Type".to_string(), "application/json".to_string());
                parsed.promote_to_post();
                index += 2;
            }
            _ if token.starts_with('-') => {
                let takes_value = value.is_some_and(|value| !value.starts_with('-'));
                index += if takes_value { 2 } else { 1 };
            }
            _ => {
                if parsed.url.is_empty() {
                    parsed.url = token.to_string();
                }
                index += 1;
            }
        }
    }

    if parsed.url.contains('?') {
        let parts = UrlParts::parse(&parsed.url);
        parsed.query_params = parts.query.map(decode_query).unwrap_or_default();
        parsed.url = parts.without_query();
    }

    parsed
}

fn strip_curl_prefix(command: &str) -> &str {
    command
        .strip_prefix("curl")
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map_or(command, str::trim_start)
}
