pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, CliConfig};

pub use config::toml_config::TomlConfig;
pub use core::{
    assembler::get_tweet_table,
    etl::{EtlEngine, RunOutcome},
    loader::{load_records, parse_records, read_json},
    pipeline::TweetPipeline,
    sentiment::LexiconAnalyzer,
};
pub use domain::model::{ColumnSchema, ExtractedRow, Record, Sentiment, Table};
pub use utils::error::{EtlError, Result};
