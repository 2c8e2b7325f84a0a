use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use md2postman::Config;
use tracing::{info, instrument};

use super::{read_input, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Convert {
    /// The Markdown file to convert
    input: PathBuf,

    /// Output file path (default: <input stem> plus the configured suffix,
    /// next to the input)
    #[arg(short, long, conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Collection name (default: the input file stem)
    #[arg(short, long)]
    name: Option<String>,

    /// Collection description (default: from the config file)
    #[arg(short, long)]
    description: Option<String>,

    /// Write the collection to standard output instead of a file
    #[arg(long)]
    stdout: bool,
}

impl Convert {
    #[instrument(level = "debug", skip(self, config), fields(input = %self.input.display()))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let markdown = read_input(&self.input)?;
        let requests = md2postman::parse(&markdown);

        if requests.is_empty() {
            anyhow::bail!("no valid requests found in {}", self.input.display());
        }

        for request in &requests {
            info!(
                request = request.name(),
                folder = request.folder().unwrap_or("root"),
                "parsed request"
            );
        }

        let name = self.name.unwrap_or_else(|| file_stem(&self.input));
        let description = self.description.as_deref().unwrap_or(&config.description);

        let collection = md2postman::build(&requests, &name, description);
        let json = md2postman::serialize(&collection)?;

        if self.stdout {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
            return Ok(());
        }

        let output = self
            .output
            .unwrap_or_else(|| default_output(&self.input, &config.output_suffix));

        std::fs::write(&output, json)
            .with_context(|| format!("failed to write {}", output.display()))?;

        let folders = requests
            .iter()
            .filter_map(md2postman::ParsedRequest::folder)
            .collect::<std::collections::BTreeSet<_>>()
            .len();

        println!("{}", "Postman collection generated".success());
        println!("   Input:     {}", self.input.display());
        println!("   Output:    {}", output.display());
        println!("   Requests:  {}", requests.len());
        println!("   Folders:   {folders}");
        println!("   Variables: {}", collection.variable.len());

        Ok(())
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `dir/api.md` becomes `dir/api<suffix>`.
fn default_output(input: &Path, suffix: &str) -> PathBuf {
    input.with_file_name(format!("{}{suffix}", file_stem(input)))
}
