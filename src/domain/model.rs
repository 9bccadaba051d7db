use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// 一筆推文：頂層鍵值對應，不做 schema 驗證
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, Value>,
}

impl From<serde_json::Map<String, Value>> for Record {
    fn from(obj: serde_json::Map<String, Value>) -> Self {
        Self {
            data: obj.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// [-1.0, 1.0]
    pub polarity: f64,
    /// [0.0, 1.0]
    pub subjectivity: f64,
}

impl Sentiment {
    pub const NEUTRAL: Sentiment = Sentiment {
        polarity: 0.0,
        subjectivity: 0.0,
    };

    pub fn label(&self) -> SentimentLabel {
        if self.polarity > 0.0 {
            SentimentLabel::Positive
        } else if self.polarity < 0.0 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

pub const DEFAULT_COLUMNS: [&str; 15] = [
    "created_at",
    "source",
    "original_text",
    "polarity",
    "subjectivity",
    "lang",
    "favorite_count",
    "retweet_count",
    "original_author",
    "followers_count",
    "friends_count",
    "possibly_sensitive",
    "hashtags",
    "user_mentions",
    "place",
];

pub const EXTENDED_COLUMNS: [&str; 19] = [
    "created_at",
    "source",
    "original_text",
    "clean_text",
    "sentiment",
    "polarity",
    "subjectivity",
    "lang",
    "favorite_count",
    "retweet_count",
    "original_author",
    "screen_count",
    "followers_count",
    "friends_count",
    "possibly_sensitive",
    "hashtags",
    "user_mentions",
    "place",
    "place_coord_boundaries",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnSchema {
    #[default]
    Default,
    Extended,
}

impl ColumnSchema {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            ColumnSchema::Default => &DEFAULT_COLUMNS,
            ColumnSchema::Extended => &EXTENDED_COLUMNS,
        }
    }
}

impl std::str::FromStr for ColumnSchema {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(ColumnSchema::Default),
            "extended" => Ok(ColumnSchema::Extended),
            other => Err(format!(
                "unknown column schema '{}', expected 'default' or 'extended'",
                other
            )),
        }
    }
}

impl std::fmt::Display for ColumnSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnSchema::Default => write!(f, "default"),
            ColumnSchema::Extended => write!(f, "extended"),
        }
    }
}

/// 只有 extended schema 才會填的欄位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedFields {
    pub clean_text: String,
    pub sentiment: SentimentLabel,
    pub screen_count: Value,
    pub place_coord_boundaries: Value,
}

/// One flattened post. Source values keep their JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRow {
    pub created_at: Value,
    pub source: Value,
    pub original_text: String,
    pub sentiment: Sentiment,
    pub lang: Value,
    pub favorite_count: Value,
    pub retweet_count: Value,
    pub original_author: Value,
    pub followers_count: Value,
    pub friends_count: Value,
    pub possibly_sensitive: Value,
    pub hashtags: Value,
    pub user_mentions: Value,
    pub place: Value,
    pub extended: Option<ExtendedFields>,
}

impl ExtractedRow {
    /// 依欄位名取值；extended 欄位在 default row 上回傳 None
    pub fn get(&self, column: &str) -> Option<Value> {
        let value = match column {
            "created_at" => self.created_at.clone(),
            "source" => self.source.clone(),
            "original_text" => Value::String(self.original_text.clone()),
            "polarity" => Value::from(self.sentiment.polarity),
            "subjectivity" => Value::from(self.sentiment.subjectivity),
            "lang" => self.lang.clone(),
            "favorite_count" => self.favorite_count.clone(),
            "retweet_count" => self.retweet_count.clone(),
            "original_author" => self.original_author.clone(),
            "followers_count" => self.followers_count.clone(),
            "friends_count" => self.friends_count.clone(),
            "possibly_sensitive" => self.possibly_sensitive.clone(),
            "hashtags" => self.hashtags.clone(),
            "user_mentions" => self.user_mentions.clone(),
            "place" => self.place.clone(),
            other => {
                let ext = self.extended.as_ref()?;
                match other {
                    "clean_text" => Value::String(ext.clean_text.clone()),
                    "sentiment" => Value::String(ext.sentiment.as_str().to_string()),
                    "screen_count" => ext.screen_count.clone(),
                    "place_coord_boundaries" => ext.place_coord_boundaries.clone(),
                    _ => return None,
                }
            }
        };
        Some(value)
    }

    pub fn values(&self, schema: ColumnSchema) -> Vec<Value> {
        schema
            .columns()
            .iter()
            .map(|column| self.get(column).unwrap_or(Value::Null))
            .collect()
    }
}

/// Rows sharing one column schema, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub schema: ColumnSchema,
    pub rows: Vec<ExtractedRow>,
}

impl Table {
    pub fn new(schema: ColumnSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.schema.columns()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn value(&self, row: usize, column: &str) -> Option<Value> {
        if !self.columns().contains(&column) {
            return None;
        }
        self.rows.get(row)?.get(column)
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub table: Table,
    pub csv_output: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_row() -> ExtractedRow {
        ExtractedRow {
            created_at: json!("Mon"),
            source: json!("web"),
            original_text: "great news".to_string(),
            sentiment: Sentiment {
                polarity: 0.8,
                subjectivity: 0.75,
            },
            lang: json!("en"),
            favorite_count: json!(5),
            retweet_count: json!(2),
            original_author: json!("a"),
            followers_count: json!(10),
            friends_count: json!(3),
            possibly_sensitive: Value::Null,
            hashtags: json!([]),
            user_mentions: json!([]),
            place: json!("NY"),
            extended: None,
        }
    }

    #[test]
    fn test_default_row_has_fifteen_values_in_order() {
        let values = sample_row().values(ColumnSchema::Default);
        assert_eq!(values.len(), 15);
        assert_eq!(values[0], json!("Mon"));
        assert_eq!(values[2], json!("great news"));
        assert_eq!(values[3], json!(0.8));
        assert_eq!(values[14], json!("NY"));
    }

    #[test]
    fn test_table_value_respects_schema() {
        let mut table = Table::new(ColumnSchema::Default);
        table.rows.push(sample_row());
        assert_eq!(table.value(0, "followers_count"), Some(json!(10)));
        assert_eq!(table.value(0, "clean_text"), None);
        assert_eq!(table.value(1, "lang"), None);
    }

    #[test]
    fn test_schema_from_str() {
        assert_eq!("Extended".parse::<ColumnSchema>(), Ok(ColumnSchema::Extended));
        assert!("wide".parse::<ColumnSchema>().is_err());
    }

    #[test]
    fn test_sentiment_label() {
        assert_eq!(Sentiment::NEUTRAL.label(), SentimentLabel::Neutral);
        let negative = Sentiment {
            polarity: -0.2,
            subjectivity: 0.5,
        };
        assert_eq!(negative.label(), SentimentLabel::Negative);
    }
}
