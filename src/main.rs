//! Command-line front end for converting Markdown request documents into
//! Postman collections.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
