//! Template variable extraction.
//!
//! Postman resolves `{{name}}` placeholders from its environment and
//! collection variable stores when a request is sent.

use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;

/// Matches a `{{name}}` placeholder, capturing the name.
pub(crate) static TEMPLATE_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("template pattern is valid"));

/// Returns the names of all `{{name}}` placeholders in the text.
///
/// Names are returned as written between the braces, without trimming, and
/// each name appears once no matter how often it is used.
#[must_use]
pub fn extract_variables(text: &str) -> BTreeSet<String> {
    TEMPLATE_VARIABLE
        .captures_iter(text)
        .map(|captures| captures[1].to_string())
        .collect()
}
