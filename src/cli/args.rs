use crate::config;
use crate::error::DataTaleError;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "datatale")]
#[command(about = "Turn tabular datasets into illustrated Markdown data stories")]
#[command(version)]
pub struct Cli {
    /// CSV files to analyze, processed sequentially
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Directory receiving charts and reports (created if absent)
    #[arg(short, long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Chat model used for the analysis and narrative calls
    #[arg(short, long, default_value = config::DEFAULT_MODEL)]
    pub model: String,

    /// Maximum time per LLM attempt in seconds (10-300)
    #[arg(short, long, default_value = "60", value_parser = validate_timeout)]
    pub timeout: u64,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse_args() -> Result<Self, DataTaleError> {
        Self::try_parse().map_err(|e| DataTaleError::InvalidArguments(e.to_string()))
    }
}

fn validate_timeout(value: &str) -> Result<u64, String> {
    let timeout: u64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if (10..=300).contains(&timeout) {
        Ok(timeout)
    } else {
        Err("timeout must be between 10 and 300 seconds".to_string())
    }
}
