use anyhow::Result;
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;
use tweet_etl::core::extractor::{find_sensitivity, TweetExtractor};
use tweet_etl::core::SentimentAnalyzer;
use tweet_etl::{get_tweet_table, parse_records, read_json, ColumnSchema, LexiconAnalyzer, Record};

fn tweet(i: usize) -> Value {
    let text = if i % 2 == 0 { "good day" } else { "bad day" };
    json!({
        "created_at": format!("day {}", i),
        "source": "web",
        "text": text,
        "lang": "en",
        "retweet_count": i,
        "user": {
            "screen_name": format!("u{}", i),
            "followers_count": i * 10,
            "friends_count": 1,
            "statuses_count": 1,
            "favourites_count": 0,
            "location": "Accra"
        },
        "entities": {"hashtags": [], "user_mentions": []}
    })
}

#[test]
fn test_n_lines_produce_n_records_in_order() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    for i in 0..25 {
        writeln!(file, "{}", tweet(i))?;
    }

    let (count, records) = read_json(file.path())?;

    assert_eq!(count, 25);
    assert_eq!(records.len(), 25);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.data.get("retweet_count"), Some(&json!(i)));
    }

    Ok(())
}

#[test]
fn test_every_row_has_fifteen_columns() -> Result<()> {
    let input: Vec<String> = (0..6).map(|i| tweet(i).to_string()).collect();
    let records = parse_records(&input.join("\n"))?;
    let table = get_tweet_table(&records, ColumnSchema::Default, &LexiconAnalyzer::default())?;

    assert_eq!(table.len(), 6);
    for row in &table.rows {
        assert_eq!(row.values(table.schema).len(), 15);
    }
    assert!(table.rows[0].sentiment.polarity > 0.0);
    assert!(table.rows[1].sentiment.polarity < 0.0);

    Ok(())
}

#[test]
fn test_scores_within_conventional_ranges() {
    let analyzer = LexiconAnalyzer::default();
    let long_run = format!("{}low", "really ".repeat(4000));
    let texts = [
        long_run.as_str(),
        "great news",
        "not bad at all, really really wonderful",
        "terrible awful horrible worst",
        "Markets closed 2% lower today",
        "!!! ??? ...",
    ];

    for text in texts {
        let s = analyzer.analyze(text);
        assert!((-1.0..=1.0).contains(&s.polarity), "{text}");
        assert!((0.0..=1.0).contains(&s.subjectivity), "{text}");
    }
}

#[test]
fn test_location_is_empty_when_user_is_null() -> Result<()> {
    let record: Record = parse_records(r#"{"user": null}"#)?.remove(0);
    assert_eq!(TweetExtractor::new(&record).find_location()?, json!(""));
    Ok(())
}

#[test]
fn test_sensitivity_is_all_or_nothing() -> Result<()> {
    let mut with_flags: Vec<Value> = (0..3).map(tweet).collect();
    for value in &mut with_flags {
        value["possibly_sensitive"] = json!(false);
    }
    let lines: Vec<String> = with_flags.iter().map(Value::to_string).collect();
    let records = parse_records(&lines.join("\n"))?;
    assert_eq!(find_sensitivity(&records).map(|v| v.len()), Some(3));

    with_flags[1].as_object_mut().unwrap().remove("possibly_sensitive");
    let lines: Vec<String> = with_flags.iter().map(Value::to_string).collect();
    let records = parse_records(&lines.join("\n"))?;
    assert_eq!(find_sensitivity(&records), None);

    let table = get_tweet_table(&records, ColumnSchema::Default, &LexiconAnalyzer::default())?;
    assert!(table
        .rows
        .iter()
        .all(|row| row.possibly_sensitive == Value::Null));

    Ok(())
}
