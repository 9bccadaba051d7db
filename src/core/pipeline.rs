use crate::core::assembler::get_tweet_table;
use crate::core::loader::load_records;
use crate::core::sentiment::LexiconAnalyzer;
use crate::core::writer::table_to_csv_string;
use crate::core::{ConfigProvider, Pipeline, Record, SentimentAnalyzer, Storage, TransformResult};
use crate::utils::error::Result;
use std::path::Path;

pub struct TweetPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    analyzer: Box<dyn SentimentAnalyzer>,
}

impl<S: Storage, C: ConfigProvider> TweetPipeline<S, C> {
    /// 使用設定中的詞庫（若有）建立 pipeline
    pub fn new(storage: S, config: C) -> Result<Self> {
        let analyzer = match config.lexicon_path() {
            Some(path) => {
                tracing::info!("📖 Loading lexicon overrides from {}", path);
                LexiconAnalyzer::from_csv_path(path)?
            }
            None => LexiconAnalyzer::default(),
        };
        Ok(Self::with_analyzer(storage, config, Box::new(analyzer)))
    }

    pub fn with_analyzer(storage: S, config: C, analyzer: Box<dyn SentimentAnalyzer>) -> Self {
        Self {
            storage,
            config,
            analyzer,
        }
    }

    fn output_location(&self) -> String {
        Path::new(self.config.output_path())
            .join(self.config.output_file())
            .to_string_lossy()
            .into_owned()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for TweetPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        let input = self.config.input_path();
        tracing::debug!("Reading line-delimited JSON from: {}", input);

        let bytes = self.storage.read_file(input).await?;
        let mut records = load_records(bytes.as_slice())?;

        if let Some(max) = self.config.max_records() {
            if records.len() > max {
                tracing::info!("✂️ Keeping first {} of {} records", max, records.len());
                records.truncate(max);
            }
        }

        Ok(records)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult> {
        let table = get_tweet_table(&data, self.config.schema(), self.analyzer.as_ref())?;
        let csv_output = table_to_csv_string(&table)?;

        tracing::debug!(
            "Built {} rows with {} columns ({} schema)",
            table.len(),
            table.columns().len(),
            table.schema
        );

        Ok(TransformResult { table, csv_output })
    }

    async fn load(&self, result: &TransformResult) -> Result<Option<String>> {
        if !self.config.save_output() {
            tracing::debug!("Save not requested, table kept in memory");
            return Ok(None);
        }

        let location = self.output_location();
        tracing::debug!(
            "Writing {} bytes of CSV to {}",
            result.csv_output.len(),
            location
        );
        self.storage
            .write_file(&location, result.csv_output.as_bytes())
            .await?;

        tracing::info!("💾 File Successfully Saved: {}", location);
        Ok(Some(location))
    }
}
