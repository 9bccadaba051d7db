use crate::core::loader::json_type_name;
use crate::core::query::{lookup, Lookup};
use crate::domain::model::Record;
use crate::utils::error::{EtlError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static RETWEET_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^RT\s+@\w+:?\s*").expect("valid retweet regex"));
static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("valid url regex"));
static MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"@\w+").expect("valid mention regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// 單筆推文的欄位擷取器
///
/// 大部分欄位缺少時直接回傳 `FieldLookupError`；`location` 與
/// `place_coord_boundaries` 有各自的 fallback。
pub struct TweetExtractor<'a> {
    record: &'a Record,
}

impl<'a> TweetExtractor<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self { record }
    }

    fn required(&self, field: &str, path: &str) -> Result<Value> {
        lookup(self.record, path).required(field, path).cloned()
    }

    pub fn find_statuses_count(&self) -> Result<Value> {
        self.required("statuses_count", "user.statuses_count")
    }

    pub fn find_full_text(&self) -> Result<String> {
        let value = lookup(self.record, "text").required("full_text", "text")?;
        value.as_str().map(str::to_string).ok_or_else(|| {
            EtlError::field_lookup(
                "full_text",
                "text",
                format!("expected a string, found {}", json_type_name(value)),
            )
        })
    }

    pub fn find_created_time(&self) -> Result<Value> {
        self.required("created_time", "created_at")
    }

    pub fn find_source(&self) -> Result<Value> {
        self.required("source", "source")
    }

    pub fn find_screen_name(&self) -> Result<Value> {
        self.required("screen_name", "user.screen_name")
    }

    pub fn find_followers_count(&self) -> Result<Value> {
        self.required("followers_count", "user.followers_count")
    }

    pub fn find_friends_count(&self) -> Result<Value> {
        self.required("friends_count", "user.friends_count")
    }

    /// `user.favourites_count`，舊格式的資料放在頂層 `favourites_count`
    pub fn find_favourite_count(&self) -> Result<Value> {
        let user_level = lookup(self.record, "user.favourites_count");
        if let Some(value) = user_level.found() {
            return Ok(value.clone());
        }

        if let Some(value) = lookup(self.record, "favourites_count").found() {
            tracing::debug!("favourites_count taken from top level of record");
            return Ok(value.clone());
        }

        user_level
            .required("favourite_count", "user.favourites_count")
            .cloned()
    }

    pub fn find_retweet_count(&self) -> Result<Value> {
        self.required("retweet_count", "retweet_count")
    }

    pub fn find_hashtags(&self) -> Result<Value> {
        self.required("hashtags", "entities.hashtags")
    }

    pub fn find_mentions(&self) -> Result<Value> {
        self.required("mentions", "entities.user_mentions")
    }

    /// `user` 不是物件時給空字串；`user` 或 `location` 鍵不存在仍然是錯誤
    pub fn find_location(&self) -> Result<Value> {
        match lookup(self.record, "user.location") {
            Lookup::Found(value) => Ok(value.clone()),
            Lookup::TypeMismatch { found, .. } => {
                tracing::debug!("user is a {} value, location set to empty string", found);
                Ok(Value::String(String::new()))
            }
            absent @ Lookup::Absent { .. } => {
                absent.required("location", "user.location").cloned()
            }
        }
    }

    pub fn find_lang(&self) -> Result<Value> {
        self.required("lang", "lang")
    }

    pub fn find_clean_text(&self) -> Result<String> {
        Ok(clean_text(&self.find_full_text()?))
    }

    pub fn find_place_coord_boundaries(&self) -> Value {
        lookup(self.record, "place.bounding_box.coordinates")
            .found()
            .cloned()
            .unwrap_or(Value::Null)
    }
}

/// `possibly_sensitive` for every record, or `None` for the whole collection
/// as soon as one record lacks it.
pub fn find_sensitivity(records: &[Record]) -> Option<Vec<Value>> {
    let mut values = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        match record.data.get("possibly_sensitive") {
            Some(value) => values.push(value.clone()),
            None => {
                tracing::debug!(
                    "record {} has no possibly_sensitive, column falls back to null",
                    index
                );
                return None;
            }
        }
    }

    Some(values)
}

pub fn clean_text(text: &str) -> String {
    let text = RETWEET_PREFIX.replace(text, "");
    let text = URL.replace_all(&text, "");
    let text = MENTION.replace_all(&text, "");
    let text = text.replace('#', "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(obj) => Record::from(obj),
            _ => panic!("test record must be an object"),
        }
    }

    fn full_tweet() -> Record {
        record(json!({
            "created_at": "Wed Aug 04 12:00:00 +0000 2021",
            "source": "<a href=\"http://twitter.com\">Twitter Web App</a>",
            "text": "RT @bank: Rates are #rising again https://t.co/abc",
            "lang": "en",
            "retweet_count": 12,
            "possibly_sensitive": false,
            "user": {
                "screen_name": "econ_watch",
                "statuses_count": 420,
                "followers_count": 1000,
                "friends_count": 50,
                "favourites_count": 7,
                "location": "Nairobi"
            },
            "entities": {
                "hashtags": [{"text": "rising", "indices": [20, 27]}],
                "user_mentions": [{"screen_name": "bank"}]
            },
            "place": {"bounding_box": {"coordinates": [[[36.6, -1.4], [37.1, -1.1]]]}}
        }))
    }

    #[test]
    fn test_required_fields() {
        let tweet = full_tweet();
        let ex = TweetExtractor::new(&tweet);

        assert_eq!(ex.find_statuses_count().unwrap(), json!(420));
        assert_eq!(ex.find_screen_name().unwrap(), json!("econ_watch"));
        assert_eq!(ex.find_followers_count().unwrap(), json!(1000));
        assert_eq!(ex.find_friends_count().unwrap(), json!(50));
        assert_eq!(ex.find_favourite_count().unwrap(), json!(7));
        assert_eq!(ex.find_retweet_count().unwrap(), json!(12));
        assert_eq!(ex.find_lang().unwrap(), json!("en"));
        assert_eq!(ex.find_hashtags().unwrap()[0]["text"], json!("rising"));
        assert_eq!(ex.find_mentions().unwrap()[0]["screen_name"], json!("bank"));
        assert_eq!(ex.find_location().unwrap(), json!("Nairobi"));
    }

    #[test]
    fn test_missing_required_field_is_fatal() {
        let tweet = record(json!({"text": "hello"}));
        let err = TweetExtractor::new(&tweet).find_lang().unwrap_err();

        match err {
            EtlError::FieldLookupError { field, path, .. } => {
                assert_eq!(field, "lang");
                assert_eq!(path, "lang");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_string_text_is_fatal() {
        let tweet = record(json!({"text": 42}));
        assert!(TweetExtractor::new(&tweet).find_full_text().is_err());
    }

    #[test]
    fn test_location_falls_back_when_user_is_not_a_mapping() {
        let tweet = record(json!({"user": null}));
        assert_eq!(
            TweetExtractor::new(&tweet).find_location().unwrap(),
            json!("")
        );

        let tweet = record(json!({"user": "someone"}));
        assert_eq!(
            TweetExtractor::new(&tweet).find_location().unwrap(),
            json!("")
        );
    }

    #[test]
    fn test_location_missing_key_is_still_fatal() {
        let tweet = record(json!({"user": {"screen_name": "a"}}));
        assert!(TweetExtractor::new(&tweet).find_location().is_err());
    }

    #[test]
    fn test_favourite_count_top_level_fallback() {
        let tweet = record(json!({"favourites_count": 5, "user": {}}));
        assert_eq!(
            TweetExtractor::new(&tweet).find_favourite_count().unwrap(),
            json!(5)
        );

        let tweet = record(json!({"user": {}}));
        assert!(TweetExtractor::new(&tweet).find_favourite_count().is_err());
    }

    #[test]
    fn test_sensitivity_whole_collection() {
        let records = vec![
            record(json!({"possibly_sensitive": true})),
            record(json!({"possibly_sensitive": false})),
        ];
        assert_eq!(
            find_sensitivity(&records),
            Some(vec![json!(true), json!(false)])
        );
    }

    #[test]
    fn test_sensitivity_any_missing_is_none() {
        let records = vec![
            record(json!({"possibly_sensitive": true})),
            record(json!({"text": "no flag"})),
            record(json!({"possibly_sensitive": false})),
        ];
        assert_eq!(find_sensitivity(&records), None);
    }

    #[test]
    fn test_clean_text_and_coordinates() {
        let tweet = full_tweet();
        let ex = TweetExtractor::new(&tweet);

        assert_eq!(ex.find_clean_text().unwrap(), "Rates are rising again");
        assert_eq!(ex.find_place_coord_boundaries()[0][0], json!([36.6, -1.4]));

        let no_place = record(json!({"place": null}));
        assert_eq!(
            TweetExtractor::new(&no_place).find_place_coord_boundaries(),
            Value::Null
        );
    }
}
