//! Markdown to Postman Collection conversion
//!
//! Requests are documented in Markdown as `curl` code blocks under `##`
//! headings, optionally grouped into folders by `#` headings. This crate
//! parses such documents and builds Postman Collection v2.1 documents from
//! them.
//!
//! ```
//! let markdown = "## Ping\n\n```curl\ncurl https://api.example.com/ping\n```\n";
//!
//! let requests = md2postman::parse(markdown);
//! let collection = md2postman::build(&requests, "Example", "Generated from Markdown");
//! let json = md2postman::serialize(&collection).unwrap();
//!
//! assert!(json.contains("\"name\": \"Ping\""));
//! ```

pub mod domain;
pub use domain::{Config, ConfigError, ParsedRequest, RequestMetadata};

pub mod markdown;
pub use markdown::parse;

pub mod curl;
pub use curl::{ParsedCommand, tokenize};

pub mod variables;
pub use variables::extract_variables;

pub mod postman;
pub use postman::{Collection, build, serialize};

pub mod validation;
pub use validation::{ValidationReport, validate};
