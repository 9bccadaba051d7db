use crate::core::extractor::{find_sensitivity, TweetExtractor};
use crate::domain::model::{ColumnSchema, ExtendedFields, ExtractedRow, Record, Table};
use crate::domain::ports::SentimentAnalyzer;
use crate::utils::error::Result;
use serde_json::Value;

/// 將整批 record 組成 Table；任何必要欄位缺失都會讓整批失敗
pub fn get_tweet_table(
    records: &[Record],
    schema: ColumnSchema,
    analyzer: &dyn SentimentAnalyzer,
) -> Result<Table> {
    let sensitivity = match find_sensitivity(records) {
        Some(values) => values,
        None => {
            if !records.is_empty() {
                tracing::warn!("⚠️ possibly_sensitive missing in at least one record, column set to null");
            }
            vec![Value::Null; records.len()]
        }
    };

    let mut table = Table::new(schema);

    // 位置對齊的 zip：長度不一致時以最短者為準
    for (index, (record, possibly_sensitive)) in records.iter().zip(sensitivity).enumerate() {
        let row = assemble_row(record, possibly_sensitive, schema, analyzer)?;
        tracing::debug!(
            "Row {}: polarity={:.3}, subjectivity={:.3}",
            index,
            row.sentiment.polarity,
            row.sentiment.subjectivity
        );
        table.rows.push(row);
    }

    Ok(table)
}

pub fn assemble_row(
    record: &Record,
    possibly_sensitive: Value,
    schema: ColumnSchema,
    analyzer: &dyn SentimentAnalyzer,
) -> Result<ExtractedRow> {
    let ex = TweetExtractor::new(record);

    let created_at = ex.find_created_time()?;
    let source = ex.find_source()?;
    let text = ex.find_full_text()?;
    let sentiment = analyzer.analyze(&text);
    let lang = ex.find_lang()?;
    let favorite_count = ex.find_favourite_count()?;
    let retweet_count = ex.find_retweet_count()?;
    let original_author = ex.find_screen_name()?;
    let followers_count = ex.find_followers_count()?;
    let friends_count = ex.find_friends_count()?;
    let hashtags = ex.find_hashtags()?;
    let user_mentions = ex.find_mentions()?;
    let place = ex.find_location()?;

    let extended = match schema {
        ColumnSchema::Default => None,
        ColumnSchema::Extended => Some(ExtendedFields {
            clean_text: ex.find_clean_text()?,
            sentiment: sentiment.label(),
            screen_count: ex.find_statuses_count()?,
            place_coord_boundaries: ex.find_place_coord_boundaries(),
        }),
    };

    Ok(ExtractedRow {
        created_at,
        source,
        original_text: text,
        sentiment,
        lang,
        favorite_count,
        retweet_count,
        original_author,
        followers_count,
        friends_count,
        possibly_sensitive,
        hashtags,
        user_mentions,
        place,
        extended,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::parse_records;
    use crate::core::sentiment::LexiconAnalyzer;
    use crate::domain::model::{Sentiment, SentimentLabel, DEFAULT_COLUMNS};
    use crate::utils::error::EtlError;
    use serde_json::json;

    struct FixedAnalyzer(Sentiment);

    impl SentimentAnalyzer for FixedAnalyzer {
        fn analyze(&self, _text: &str) -> Sentiment {
            self.0
        }
    }

    fn tweet_line(text: &str, screen_name: &str, sensitive: Option<bool>) -> String {
        let mut value = json!({
            "created_at": "Mon",
            "source": "web",
            "text": text,
            "lang": "en",
            "retweet_count": 2,
            "user": {
                "screen_name": screen_name,
                "followers_count": 10,
                "friends_count": 3,
                "statuses_count": 1,
                "favourites_count": 4,
                "location": "NY"
            },
            "entities": {"hashtags": [], "user_mentions": []}
        });
        if let Some(flag) = sensitive {
            value["possibly_sensitive"] = json!(flag);
        }
        value.to_string()
    }

    #[test]
    fn test_single_post_line() {
        let line = r#"{"created_at":"Mon","source":"web","text":"great news","lang":"en","favourites_count":5,"retweet_count":2,"retweet_count":2,"user":{"screen_name":"a","followers_count":10,"friends_count":3,"statuses_count":1,"location":"NY"},"entities":{"hashtags":[],"user_mentions":[]}}"#;
        let records = parse_records(line).unwrap();
        let table =
            get_tweet_table(&records, ColumnSchema::Default, &LexiconAnalyzer::default()).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.columns(), &DEFAULT_COLUMNS);
        assert_eq!(table.value(0, "original_text"), Some(json!("great news")));
        assert!(table.rows[0].sentiment.polarity > 0.0);
        assert_eq!(table.value(0, "lang"), Some(json!("en")));
        assert_eq!(table.value(0, "followers_count"), Some(json!(10)));
        assert_eq!(table.value(0, "favorite_count"), Some(json!(5)));
        assert_eq!(table.value(0, "possibly_sensitive"), Some(Value::Null));
        assert_eq!(table.value(0, "place"), Some(json!("NY")));
    }

    #[test]
    fn test_rows_keep_input_order() {
        let input = [
            tweet_line("first", "a", Some(false)),
            tweet_line("second", "b", Some(true)),
            tweet_line("third", "c", Some(false)),
        ]
        .join("\n");
        let records = parse_records(&input).unwrap();
        let table = get_tweet_table(
            &records,
            ColumnSchema::Default,
            &FixedAnalyzer(Sentiment::NEUTRAL),
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.value(1, "original_author"), Some(json!("b")));
        assert_eq!(table.value(1, "possibly_sensitive"), Some(json!(true)));
        assert_eq!(table.value(2, "original_text"), Some(json!("third")));
    }

    #[test]
    fn test_one_missing_sensitivity_nulls_whole_column() {
        let input = [
            tweet_line("first", "a", Some(true)),
            tweet_line("second", "b", None),
        ]
        .join("\n");
        let records = parse_records(&input).unwrap();
        let table = get_tweet_table(
            &records,
            ColumnSchema::Default,
            &FixedAnalyzer(Sentiment::NEUTRAL),
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.value(0, "possibly_sensitive"), Some(Value::Null));
        assert_eq!(table.value(1, "possibly_sensitive"), Some(Value::Null));
    }

    #[test]
    fn test_missing_required_field_fails_whole_table() {
        let mut broken: serde_json::Value =
            serde_json::from_str(&tweet_line("oops", "x", Some(false))).unwrap();
        broken["user"].as_object_mut().unwrap().remove("screen_name");
        let input = format!("{}\n{}", tweet_line("ok", "a", Some(false)), broken);
        let records = parse_records(&input).unwrap();

        let err = get_tweet_table(
            &records,
            ColumnSchema::Default,
            &FixedAnalyzer(Sentiment::NEUTRAL),
        )
        .unwrap_err();
        assert!(matches!(err, EtlError::FieldLookupError { ref path, .. } if path == "user.screen_name"));
    }

    #[test]
    fn test_extended_schema_fields() {
        let records = parse_records(&tweet_line("RT @a: so good https://t.co/x", "a", Some(false))).unwrap();
        let table =
            get_tweet_table(&records, ColumnSchema::Extended, &LexiconAnalyzer::default()).unwrap();

        let row = &table.rows[0];
        assert_eq!(row.values(ColumnSchema::Extended).len(), 19);
        let ext = row.extended.as_ref().unwrap();
        assert_eq!(ext.clean_text, "so good");
        assert_eq!(ext.sentiment, SentimentLabel::Positive);
        assert_eq!(ext.screen_count, json!(1));
        assert_eq!(ext.place_coord_boundaries, Value::Null);
    }

    #[test]
    fn test_empty_input_gives_empty_table() {
        let table = get_tweet_table(
            &[],
            ColumnSchema::Default,
            &FixedAnalyzer(Sentiment::NEUTRAL),
        )
        .unwrap();
        assert!(table.is_empty());
    }
}
