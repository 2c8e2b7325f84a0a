use std::{path::PathBuf, process};

use clap::Parser;
use md2postman::ValidationReport;
use tracing::instrument;

use super::{read_input, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Validate {
    /// The Markdown file to check
    input: PathBuf,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Validate {
    #[instrument(level = "debug", skip(self), fields(input = %self.input.display()))]
    pub fn run(self) -> anyhow::Result<()> {
        let markdown = read_input(&self.input)?;
        let report = md2postman::validate(&markdown);

        match self.output {
            OutputFormat::Table => output_table(&report),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }

        // Exit with a non-zero code when nothing can be converted.
        if !report.valid {
            process::exit(2);
        }

        Ok(())
    }
}

fn output_table(report: &ValidationReport) {
    println!("Markdown structure validation");
    println!("  Requests found: {}", report.requests_found);
    println!("  Folders: {}", report.folders.len());
    for folder in &report.folders {
        println!("    - {folder}");
    }

    for request in &report.requests {
        let location = request.folder.as_deref().unwrap_or("root");
        println!("  {} {}", request.name, format!("({location})").dim());
        if !request.variables_used.is_empty() {
            println!(
                "    {}",
                format!("uses {}", request.variables_used.join(", ")).dim()
            );
        }
    }

    if report.issues.is_empty() && report.suggestions.is_empty() {
        println!("  {}", "No issues found".success());
        return;
    }

    for issue in &report.issues {
        println!("  {}", format!("error: {issue}").warning());
    }
    for suggestion in &report.suggestions {
        println!("  {}", format!("hint: {suggestion}").dim());
    }
}
