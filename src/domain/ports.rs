use crate::domain::model::{ColumnSchema, Record, Sentiment, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn save_output(&self) -> bool;
    fn schema(&self) -> ColumnSchema;
    fn max_records(&self) -> Option<usize>;
    fn lexicon_path(&self) -> Option<&str>;
}

/// Text → (polarity, subjectivity)。實作必須是純函數
pub trait SentimentAnalyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Sentiment;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Record>>;
    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult>;
    /// 回傳寫出的檔案路徑；未要求存檔時為 None
    async fn load(&self, result: &TransformResult) -> Result<Option<String>>;
}
