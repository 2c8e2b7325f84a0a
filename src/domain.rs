//! Domain models for Markdown request documents.
//!
//! This module contains the request records produced by the Markdown parser
//! and the configuration used by the command-line front end.

/// Request records extracted from Markdown.
pub mod request;
pub use request::{ParsedRequest, RequestMetadata};

mod config;
pub use config::{Config, ConfigError};
