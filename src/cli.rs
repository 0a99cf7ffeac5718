// ABOUTME: Command-line interface for csvenrich
//
// Binary: csvenrich
// Usage: csvenrich <DATASET.csv> [--endpoint URL] [--delimiter CHAR]

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "csvenrich",
    about = "Terminal wizard for configuring CSV data-enrichment jobs",
    version
)]
pub struct Cli {
    /// CSV dataset to configure an enrichment job for
    pub dataset: PathBuf,

    /// Base URL of the field-suggestion service (overrides config file)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Field delimiter of the CSV file (single ASCII character)
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: char,
}

impl Cli {
    pub fn delimiter_byte(&self) -> u8 {
        // parse_delimiter guarantees ASCII
        self.delimiter as u8
    }
}

fn parse_delimiter(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        (Some(_), None) => Err("delimiter must be an ASCII character".to_string()),
        _ => Err("delimiter must be a single character".to_string()),
    }
}
