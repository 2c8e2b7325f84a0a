use std::collections::BTreeSet;

use indexmap::IndexMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{
    Body, Collection, EXPORTER_ID, Event, FolderItem, Header, Info, Item, Listen, QueryParam,
    Request, RequestItem, SCHEMA_URL, Url, Variable, prerequest_script, save_variable_script,
};
use crate::{
    curl::{ParsedCommand, UrlParts, encode_query, tokenize},
    domain::ParsedRequest,
};

/// Builds a collection from parsed requests.
///
/// Requests without a folder come first, in source order. Then each folder
/// follows in the order it was first seen, holding its requests in source
/// order.
///
/// The collection's variables are every `{{name}}` placeholder used by any
/// request, plus every `Save Response Variable` name, sorted.
///
/// Each call generates a new random `_postman_id`; everything else is
/// deterministic.
#[instrument(level = "debug", skip(requests, description), fields(requests = requests.len()))]
#[must_use]
pub fn build(requests: &[ParsedRequest], name: &str, description: &str) -> Collection {
    let mut item = Vec::new();
    let mut folders: IndexMap<&str, Vec<RequestItem>> = IndexMap::new();
    let mut variables = BTreeSet::new();

    for request in requests {
        let command = tokenize(request.curl_command());

        variables.extend(command.variables());
        if let Some(variable) = &request.metadata().save_response_variable {
            variables.insert(variable.clone());
        }

        let converted = convert_command(request, &command);
        match request.folder() {
            Some(folder) => folders.entry(folder).or_default().push(converted),
            None => item.push(Item::Request(converted)),
        }
    }

    debug!(
        folders = folders.len(),
        variables = variables.len(),
        "assembled collection"
    );

    item.extend(folders.into_iter().map(|(name, item)| {
        Item::Folder(FolderItem {
            name: name.to_string(),
            item,
        })
    }));

    Collection {
        info: Info {
            name: name.to_string(),
            description: description.to_string(),
            schema: SCHEMA_URL.to_string(),
            postman_id: Uuid::new_v4().to_string(),
            exporter_id: EXPORTER_ID.to_string(),
        },
        item,
        variable: variables.into_iter().map(Variable::empty).collect(),
        event: Vec::new(),
    }
}

/// Converts a single request into a collection item.
#[must_use]
pub fn convert_request(request: &ParsedRequest) -> RequestItem {
    convert_command(request, &tokenize(request.curl_command()))
}

fn convert_command(request: &ParsedRequest, command: &ParsedCommand) -> RequestItem {
    let metadata = request.metadata();

    let header = command
        .headers
        .iter()
        .map(|(key, value)| Header::text(key, value))
        .collect();

    let mut event = Vec::new();

    if let Some(variable) = &metadata.save_response_variable {
        event.push(Event::javascript(
            Listen::Test,
            save_variable_script(variable),
        ));
    }

    // Appended after the test script; existing collections rely on this order.
    if metadata.required_variables().next().is_some() {
        event.push(Event::javascript(
            Listen::Prerequest,
            prerequest_script(metadata.required_variables()),
        ));
    }

    RequestItem {
        name: request.name().to_string(),
        request: Request {
            method: command.method.clone(),
            header,
            url: structured_url(command),
            body: command.body.as_deref().and_then(body),
            description: metadata.description.clone(),
        },
        event,
    }
}

fn structured_url(command: &ParsedCommand) -> Url {
    let parts = UrlParts::parse(&command.url);

    let raw = if command.query_params.is_empty() {
        command.url.clone()
    } else {
        format!("{}?{}", command.url, encode_query(&command.query_params))
    };

    Url {
        raw,
        protocol: parts.scheme.unwrap_or("https").to_string(),
        host: parts.host_labels(),
        path: parts.path_segments(),
        query: command
            .query_params
            .iter()
            .map(|(key, value)| QueryParam {
                key: key.clone(),
                value: value.clone(),
            })
            .collect(),
    }
}

/// JSON bodies are pretty-printed with non-ASCII characters escaped; anything
/// else is passed through.
fn body(raw: &str) -> Option<Body> {
    if raw.is_empty() {
        return None;
    }

    let body = serde_json::from_str::<serde_json::Value>(raw)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .map(|json| escape_non_ascii(&json))
        .map_or_else(
            |error| {
                debug!(%error, "body is not JSON, keeping it as raw text");
                Body::text(raw.to_string())
            },
            Body::json,
        );

    Some(body)
}

/// Replaces every non-ASCII character with `\uXXXX` UTF-16 escapes.
///
/// Serialized JSON only has non-ASCII characters inside strings, where the
/// escapes are equivalent.
fn escape_non_ascii(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    let mut units = [0; 2];

    for c in json.chars() {
        if c.is_ascii() {
            escaped.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }

    escaped
}
