use std::path::PathBuf;

use citypages::{GenerateOptions, GenerateOutput, errors::CityPagesError};
use clap::Parser;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Root of the site, defaults to the current directory
    #[arg(long)]
    root: Option<PathBuf>,

    /// YAML file overriding the default input and output paths
    #[arg(long)]
    config: Option<PathBuf>,

    /// Don't print anything
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<GenerateOutput, CityPagesError> {
    let cli = Cli::parse();

    let mut options = match &cli.config {
        Some(path) => GenerateOptions::from_yaml_file(path)?,
        None => GenerateOptions::default(),
    };

    if let Some(root) = cli.root {
        options.root = root;
    }

    citypages::run(options, cli.quiet)
}
