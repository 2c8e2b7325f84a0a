//! Splitting URLs into their components, and query string coding.
//!
//! URLs in request documents frequently start with a template placeholder
//! (`{{base_url}}/users`), which is not a valid URL, so this works on the raw
//! text rather than through a strict URL parser.

use indexmap::IndexMap;
use url::form_urlencoded;

use crate::variables::TEMPLATE_VARIABLE;

/// The components of a URL, borrowed from the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlParts<'a> {
    /// The scheme, if the URL starts with `scheme://`.
    pub scheme: Option<&'a str>,
    /// Host and optional port. Empty when there is no scheme.
    pub authority: &'a str,
    /// Everything from the end of the authority up to the query or fragment.
    pub path: &'a str,
    /// The text after `?`, up to the fragment.
    pub query: Option<&'a str>,
}

impl<'a> UrlParts<'a> {
    /// Splits a URL into its components. This never fails.
    #[must_use]
    pub fn parse(url: &'a str) -> Self {
        let without_fragment = url.split_once('#').map_or(url, |(before, _)| before);

        let (rest, query) = match without_fragment.split_once('?') {
            Some((rest, query)) => (rest, Some(query)),
            None => (without_fragment, None),
        };

        let (scheme, rest) = match rest.split_once("://") {
            Some((scheme, rest)) if is_scheme(scheme) => (Some(scheme), rest),
            _ => (None, rest),
        };

        let (authority, path) = if scheme.is_some() {
            rest.find('/').map_or((rest, ""), |index| rest.split_at(index))
        } else {
            ("", rest)
        };

        Self {
            scheme,
            authority,
            path,
            query,
        }
    }

    /// The URL with query and fragment removed.
    #[must_use]
    pub fn without_query(&self) -> String {
        match self.scheme {
            Some(scheme) => format!("{scheme}://{}{}", self.authority, self.path),
            None => self.path.to_string(),
        }
    }

    /// The dot-separated host labels. Empty when there is no authority.
    #[must_use]
    pub fn host_labels(&self) -> Vec<String> {
        if self.authority.is_empty() {
            return Vec::new();
        }
        self.authority.split('.').map(str::to_string).collect()
    }

    /// The path segments between slashes.
    ///
    /// Leading and trailing slashes are ignored. A path that is empty or just
    /// `/` has no segments.
    #[must_use]
    pub fn path_segments(&self) -> Vec<String> {
        if self.path.is_empty() || self.path == "/" {
            return Vec::new();
        }
        self.path
            .trim_matches('/')
            .split('/')
            .map(str::to_string)
            .collect()
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Decodes a query string into parameters.
///
/// `+` decodes to a space and `%XX` sequences are unescaped. Parameters
/// without a value are dropped. When a key repeats, its first value is kept.
/// Keys keep the order they first appear in.
#[must_use]
pub fn decode_query(query: &str) -> IndexMap<String, String> {
    let mut params = IndexMap::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if value.is_empty() {
            continue;
        }
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }

    params
}

/// Encodes parameters as a query string.
///
/// Keys and values are form-urlencoded, except for `{{name}}` placeholders,
/// which are written as-is.
#[must_use]
pub fn encode_query(params: &IndexMap<String, String>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_component(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    let mut last = 0;

    for placeholder in TEMPLATE_VARIABLE.find_iter(text) {
        encoded.extend(form_urlencoded::byte_serialize(
            text[last..placeholder.start()].as_bytes(),
        ));
        encoded.push_str(placeholder.as_str());
        last = placeholder.end();
    }
    encoded.extend(form_urlencoded::byte_serialize(text[last..].as_bytes()));

    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_url() {
        let parts = UrlParts::parse("https://api.example.com:8443/v1/users?page=2#top");

        assert_eq!(
            parts,
            UrlParts {
                scheme: Some("https"),
                authority: "api.example.com:8443",
                path: "/v1/users",
                query: Some("page=2"),
            }
        );
        assert_eq!(parts.without_query(), "https://api.example.com:8443/v1/users");
        assert_eq!(parts.host_labels(), ["api", "example", "com:8443"]);
        assert_eq!(parts.path_segments(), ["v1", "users"]);
    }

    #[test]
    fn templated_base_url_has_no_host() {
        let parts = UrlParts::parse("{{base_url}}/users/{{id}}?expand=true");

        assert_eq!(parts.scheme, None);
        assert!(parts.host_labels().is_empty());
        assert_eq!(parts.path_segments(), ["{{base_url}}", "users", "{{id}}"]);
        assert_eq!(parts.without_query(), "{{base_url}}/users/{{id}}");
    }

    #[test]
    fn root_and_empty_paths_have_no_segments() {
        assert!(UrlParts::parse("https://example.com").path_segments().is_empty());
        assert!(UrlParts::parse("https://example.com/").path_segments().is_empty());
    }

    #[test]
    fn repeated_slashes_keep_empty_segments() {
        assert_eq!(
            UrlParts::parse("https://example.com//a//b/").path_segments(),
            ["a", "", "b"]
        );
    }

    #[test]
    fn decode_keeps_first_value_and_drops_blank() {
        let params = decode_query("b=2&a=1&b=3&flag&empty=&q=hello+world%21");
        let pairs: Vec<_> = params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();

        assert_eq!(pairs, [("b", "2"), ("a", "1"), ("q", "hello world!")]);
    }

    #[test]
    fn encode_preserves_placeholders() {
        let params = IndexMap::from([
            ("filter".to_string(), "name eq {{user name}}".to_string()),
            ("page".to_string(), "1".to_string()),
        ]);

        assert_eq!(
            encode_query(&params),
            "filter=name+eq+{{user name}}&page=1"
        );
    }
}
