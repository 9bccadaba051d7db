#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::ColumnSchema;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate, INPUT_EXTENSIONS, LEXICON_EXTENSIONS};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "tweet-etl")]
#[command(about = "Flatten line-delimited tweet JSON into a CSV table with sentiment scores")]
pub struct CliConfig {
    /// Line-delimited JSON input file
    #[arg(short, long)]
    pub input: String,

    #[arg(long, default_value = ".")]
    pub output_path: String,

    #[arg(long, default_value = toml_config::DEFAULT_OUTPUT_FILE)]
    pub output_file: String,

    /// Write the table to <output-path>/<output-file>; otherwise print CSV to stdout
    #[arg(long)]
    pub save: bool,

    #[arg(long, default_value = "default", help = "Column schema: default or extended")]
    pub schema: ColumnSchema,

    /// CSV file (word,polarity,subjectivity) merged into the built-in lexicon
    #[arg(long)]
    pub lexicon: Option<String>,

    #[arg(long)]
    pub max_records: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log memory and timing per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn save_output(&self) -> bool {
        self.save
    }

    fn schema(&self) -> ColumnSchema {
        self.schema
    }

    fn max_records(&self) -> Option<usize> {
        self.max_records
    }

    fn lexicon_path(&self) -> Option<&str> {
        self.lexicon.as_deref()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_file_extension("input", &self.input, &INPUT_EXTENSIONS)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_file_name("output_file", &self.output_file)?;

        if let Some(max) = self.max_records {
            validation::validate_positive_number("max_records", max, 1)?;
        }

        if let Some(lexicon) = &self.lexicon {
            validation::validate_file_extension("lexicon", lexicon, &LEXICON_EXTENSIONS)?;
        }

        Ok(())
    }
}
