//! Markdown structure parsing
//!
//! Request documents use a small subset of Markdown:
//!
//! ````text
//! # Folder Name
//! ## Request Name
//! **Description:** text
//! **Requires:** a, b
//! **Save Response Variable:** name
//!
//! ```curl
//! curl https://api.example.com/items
//! ```
//! ````
//!
//! A `#` heading sets the folder for every request below it, until the next
//! `#` heading. Each `##` heading starts a request, which takes the next
//! `curl` code block in the document. Headings passed over on the way to that
//! block are consumed with it, so a heading without a block of its own
//! borrows the next one.

use std::sync::LazyLock;

use non_empty_string::NonEmptyString;
use regex::Regex;
use tracing::{debug, instrument};

use crate::domain::{ParsedRequest, RequestMetadata};

/// Matches `**Key:** value`. The value may be empty.
static METADATA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*\*([^:]+):\*\*\s*(.*)$").expect("metadata pattern is valid")
});

const FENCE: &str = "```";
const COMMAND_FENCE: &str = "```curl";

/// Parses Markdown text into an ordered list of requests.
///
/// This never fails. A heading with no `curl` code block anywhere below it
/// is dropped, along with its metadata.
#[instrument(level = "debug", skip(markdown))]
#[must_use]
pub fn parse(markdown: &str) -> Vec<ParsedRequest> {
    let markdown = markdown.replace("\r\n", "\n");
    let lines: Vec<&str> = markdown.split('\n').collect();

    let mut requests = Vec::new();
    let mut folder: Option<String> = None;
    let mut index = 0;

    while index < lines.len() {
        match Heading::parse(lines[index]) {
            Some(Heading::Folder(name)) => {
                folder = Some(name.to_string());
                index += 1;
            }
            Some(Heading::Request(name)) => {
                let block = RequestBlock::read(&lines, index + 1);
                index = block.next;

                match block.curl_command {
                    Some(curl_command) => requests.push(ParsedRequest::new(
                        name,
                        folder.clone(),
                        block.metadata,
                        curl_command,
                    )),
                    None => debug!(request = %name, "no curl block found, skipping request"),
                }
            }
            None => index += 1,
        }
    }

    debug!(count = requests.len(), "parsed requests");
    requests
}

/// A structural heading line.
#[derive(Debug, PartialEq, Eq)]
enum Heading<'a> {
    /// `# Name`
    Folder(&'a str),
    /// `## Name`
    Request(NonEmptyString),
}

impl<'a> Heading<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();

        if let Some(name) = line.strip_prefix("## ") {
            return NonEmptyString::new(name.trim().to_string())
                .ok()
                .map(Self::Request);
        }

        line.strip_prefix("# ")
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(Self::Folder)
    }
}

/// The body of a request heading: metadata lines and a `curl` block.
#[derive(Debug)]
struct RequestBlock {
    metadata: RequestMetadata,
    curl_command: Option<String>,
    /// Index of the line where scanning for the next heading resumes.
    next: usize,
}

impl RequestBlock {
    fn read(lines: &[&str], start: usize) -> Self {
        let (metadata, metadata_end) = read_metadata(lines, start);

        match find_command_block(lines, metadata_end) {
            CommandSearch::Found { command, next } => Self {
                metadata,
                curl_command: Some(command).filter(|command| !command.is_empty()),
                next,
            },
            CommandSearch::Missing { next } => Self {
                metadata,
                curl_command: None,
                next,
            },
        }
    }
}

/// Reads `**Key:** value` lines until a heading, or a blank line directly
/// followed by a fence.
///
/// Returns the metadata and the index of the line where scanning stopped.
fn read_metadata(lines: &[&str], start: usize) -> (RequestMetadata, usize) {
    let mut metadata = RequestMetadata::default();
    let mut index = start;

    while index < lines.len() {
        let line = lines[index].trim();

        let fence_follows = lines
            .get(index + 1)
            .is_some_and(|next| next.trim().starts_with(FENCE));

        if line.starts_with('#') || (line.is_empty() && fence_follows) {
            break;
        }

        if let Some(captures) = METADATA_LINE.captures(line) {
            let key = captures[1].trim().to_lowercase().replace(' ', "_");
            let value = Some(captures[2].trim().to_string()).filter(|value| !value.is_empty());

            match key.as_str() {
                "description" => metadata.description = value,
                "requires" => metadata.requires = value,
                "save_response_variable" => metadata.save_response_variable = value,
                _ => {}
            }
        }

        index += 1;
    }

    (metadata, index)
}

#[derive(Debug, PartialEq, Eq)]
enum CommandSearch {
    Found { command: String, next: usize },
    Missing { next: usize },
}

/// Searches forward to the end of the document for the first `curl` fenced
/// block.
///
/// Fenced blocks in other languages are skipped whole.
fn find_command_block(lines: &[&str], start: usize) -> CommandSearch {
    let mut index = start;

    while index < lines.len() {
        let line = lines[index].trim();

        if line.starts_with(FENCE) {
            let Some(close) = closing_fence(lines, index + 1) else {
                return CommandSearch::Missing { next: lines.len() };
            };

            if line == COMMAND_FENCE {
                let command = lines[index + 1..close].join("\n").trim().to_string();
                return CommandSearch::Found {
                    command,
                    next: close + 1,
                };
            }

            index = close + 1;
            continue;
        }

        index += 1;
    }

    CommandSearch::Missing { next: lines.len() }
}

fn closing_fence(lines: &[&str], start: usize) -> Option<usize> {
    lines
        .iter()
        .skip(start)
        .position(|line| line.trim_start().starts_with(FENCE))
        .map(|offset| start + offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn no_request_headings() {
        let markdown = "# Folder\n\nSome prose.\n\n```curl\ncurl https://example.com\n```\n";
        assert!(parse(markdown).is_empty());
    }

    #[test]
    fn heading_at_end_of_file_is_dropped() {
        let markdown = "## First\n\n```curl\ncurl https://example.com/a\n```\n\n## Second";
        let requests = parse(markdown);

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name(), "First");
    }

    #[test]
    fn single_request_with_metadata() {
        let markdown = r"## Get user
**Description:** Fetches a user
**Requires:** token, user_id
**Save Response Variable:** user

```curl
curl https://api.example.com/users/{{user_id}}
```
";
        let requests = parse(markdown);

        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.name(), "Get user");
        assert_eq!(request.folder(), None);
        assert_eq!(
            request.metadata(),
            &RequestMetadata {
                description: Some("Fetches a user".to_string()),
                requires: Some("token, user_id".to_string()),
                save_response_variable: Some("user".to_string()),
            }
        );
        assert_eq!(
            request.curl_command(),
            "curl https://api.example.com/users/{{user_id}}"
        );
    }

    #[test]
    fn folder_applies_until_next_folder() {
        let markdown = r"## Health

```curl
curl https://example.com/health
```

# Auth

## Login

```curl
curl -X POST https://example.com/login
```

## Logout

```curl
curl -X POST https://example.com/logout
```

# Users

## List users

```curl
curl https://example.com/users
```
";
        let requests = parse(markdown);
        let folders: Vec<_> = requests
            .iter()
            .map(|request| (request.name(), request.folder()))
            .collect();

        assert_eq!(
            folders,
            [
                ("Health", None),
                ("Login", Some("Auth")),
                ("Logout", Some("Auth")),
                ("List users", Some("Users")),
            ]
        );
    }

    #[test]
    fn unknown_metadata_keys_are_ignored() {
        let markdown = r"## Ping
**Owner:** platform team
**DESCRIPTION:** Liveness probe

```curl
curl https://example.com/ping
```
";
        let requests = parse(markdown);

        assert_eq!(
            requests[0].metadata().description.as_deref(),
            Some("Liveness probe")
        );
        assert_eq!(requests[0].metadata().requires, None);
    }

    #[test]
    fn empty_metadata_value_is_absent() {
        let markdown = "## Ping\n**Requires:**\n\n```curl\ncurl https://example.com\n```\n";
        let requests = parse(markdown);

        assert_eq!(requests[0].metadata().requires, None);
    }

    #[test]
    fn multiline_command_is_kept_verbatim() {
        let markdown = r#"## Create

```curl
curl -X POST https://example.com/items \
  -H "Content-Type: application/json" \
  -d '{"name": "widget"}'
```
"#;
        let requests = parse(markdown);

        assert_eq!(
            requests[0].curl_command(),
            "curl -X POST https://example.com/items \\\n  -H \"Content-Type: application/json\" \\\n  -d '{\"name\": \"widget\"}'"
        );
    }

    #[test]
    fn headings_inside_command_block_are_not_structural() {
        let markdown = r"## Upload script

```curl
curl -X POST https://example.com/scripts -d '
# not a folder
## not a request
'
```

## Next

```curl
curl https://example.com/next
```
";
        let requests = parse(markdown);

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].folder(), None);
        assert!(requests[0].curl_command().contains("## not a request"));
        assert_eq!(requests[1].name(), "Next");
        assert_eq!(requests[1].folder(), None);
    }

    #[test]
    fn heading_without_block_takes_the_next_block() {
        let markdown = r"## Draft
**Description:** not written yet

## Real

```curl
curl https://example.com/real
```
";
        let requests = parse(markdown);

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name(), "Draft");
        assert_eq!(
            requests[0].metadata().description.as_deref(),
            Some("not written yet")
        );
        assert_eq!(requests[0].curl_command(), "curl https://example.com/real");
    }

    #[test]
    fn heading_without_any_block_is_dropped() {
        let markdown = "## First\n\n```curl\ncurl https://example.com/a\n```\n\n## Notes\n\nNothing to send.\n";
        let requests = parse(markdown);

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name(), "First");
    }

    #[test]
    fn fence_directly_after_metadata_is_scanned_as_metadata() {
        let markdown = r"## Ping
**Description:** No blank line before the block
```curl
curl https://example.com/ping
```

## Pong

```curl
curl https://example.com/pong
```
";
        let requests = parse(markdown);

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name(), "Ping");
        assert_eq!(
            requests[0].metadata().description.as_deref(),
            Some("No blank line before the block")
        );
        assert_eq!(requests[0].curl_command(), "curl https://example.com/pong");
    }

    #[test]
    fn other_fenced_blocks_are_skipped() {
        let markdown = r#"## Create

Example payload:

```json
{"name": "widget"}
# comment-looking line
```

```curl
curl -X POST https://example.com/items
```
"#;
        let requests = parse(markdown);

        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].curl_command(),
            "curl -X POST https://example.com/items"
        );
    }

    #[test]
    fn empty_command_block_is_dropped() {
        let markdown = "## Empty\n\n```curl\n\n```\n";
        assert!(parse(markdown).is_empty());
    }

    #[test]
    fn unterminated_command_block_is_dropped() {
        let markdown = "## Broken\n\n```curl\ncurl https://example.com\n";
        assert!(parse(markdown).is_empty());
    }

    #[test]
    fn crlf_line_endings() {
        let markdown = "# Auth\r\n## Login\r\n**Description:** Logs in\r\n\r\n```curl\r\ncurl https://example.com/login\r\n```\r\n";
        let requests = parse(markdown);

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].folder(), Some("Auth"));
        assert_eq!(requests[0].curl_command(), "curl https://example.com/login");
    }

    #[test]
    fn heading_markers_need_a_space() {
        assert_eq!(Heading::parse("#Folder"), None);
        assert_eq!(Heading::parse("##"), None);
        assert_eq!(Heading::parse("### Notes"), None);
        assert_eq!(Heading::parse("  # Folder  "), Some(Heading::Folder("Folder")));
    }
}
