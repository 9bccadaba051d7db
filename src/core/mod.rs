pub mod assembler;
pub mod etl;
pub mod extractor;
pub mod loader;
pub mod pipeline;
pub mod query;
pub mod sentiment;
pub mod writer;

pub use crate::domain::model::{Record, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, SentimentAnalyzer, Storage};
pub use crate::utils::error::Result;
