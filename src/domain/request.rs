use non_empty_string::NonEmptyString;

/// Optional annotations attached to a single request.
///
/// All fields default to absent. No validation happens when they are parsed;
/// `requires` in particular is kept as the raw comma-separated text and only
/// split when a pre-request script is generated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMetadata {
    /// Human-readable summary of the request.
    pub description: Option<String>,
    /// Comma-separated names of variables the request depends on.
    pub requires: Option<String>,
    /// Name of the variable populated from the response.
    pub save_response_variable: Option<String>,
}

impl RequestMetadata {
    /// Iterates over the required variable names, trimmed.
    ///
    /// Every comma-separated entry is yielded, including empty ones.
    pub fn required_variables(&self) -> impl Iterator<Item = &str> {
        self.requires
            .as_deref()
            .into_iter()
            .flat_map(|requires| requires.split(','))
            .map(str::trim)
    }
}

/// A request extracted from a `##` heading block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    name: NonEmptyString,
    folder: Option<String>,
    metadata: RequestMetadata,
    curl_command: String,
}

impl ParsedRequest {
    /// Creates a request record.
    #[must_use]
    pub const fn new(
        name: NonEmptyString,
        folder: Option<String>,
        metadata: RequestMetadata,
        curl_command: String,
    ) -> Self {
        Self {
            name,
            folder,
            metadata,
            curl_command,
        }
    }

    /// The request name, taken from the heading text.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The nearest preceding `#` heading, if any.
    #[must_use]
    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    /// The metadata block below the heading.
    #[must_use]
    pub const fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }

    /// The raw text of the `curl` code block, trimmed.
    #[must_use]
    pub fn curl_command(&self) -> &str {
        &self.curl_command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata_requiring(requires: &str) -> RequestMetadata {
        RequestMetadata {
            requires: Some(requires.to_string()),
            ..RequestMetadata::default()
        }
    }

    #[test]
    fn required_variables_are_trimmed() {
        let metadata = metadata_requiring("token,  user_id ,org");
        let names: Vec<_> = metadata.required_variables().collect();
        assert_eq!(names, ["token", "user_id", "org"]);
    }

    #[test]
    fn required_variables_keep_empty_entries() {
        let metadata = metadata_requiring("token, ,");
        let names: Vec<_> = metadata.required_variables().collect();
        assert_eq!(names, ["token", "", ""]);
    }

    #[test]
    fn no_requires_yields_nothing() {
        assert_eq!(RequestMetadata::default().required_variables().count(), 0);
    }

    #[test]
    fn accessors() {
        let request = ParsedRequest::new(
            NonEmptyString::new("Login".to_string()).unwrap(),
            Some("Auth".to_string()),
            RequestMetadata::default(),
            "curl https://example.com".to_string(),
        );

        assert_eq!(request.name(), "Login");
        assert_eq!(request.folder(), Some("Auth"));
        assert_eq!(request.curl_command(), "curl https://example.com");
        assert_eq!(request.metadata(), &RequestMetadata::default());
    }
}
