//! Dotted-path lookups into a loosely typed [`Record`].
//!
//! A lookup never fails on its own; it reports what it found and the caller
//! decides whether an absent key or a type mismatch is fatal or has a fallback.

use crate::core::loader::json_type_name;
use crate::domain::model::Record;
use crate::utils::error::{EtlError, Result};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a Value),
    /// The parent was a container but had no such key/index.
    Absent { segment: String },
    /// The parent was not a container (e.g. `user` is `null`).
    TypeMismatch {
        segment: String,
        found: &'static str,
    },
}

impl<'a> Lookup<'a> {
    pub fn found(&self) -> Option<&'a Value> {
        match self {
            Lookup::Found(value) => Some(*value),
            _ => None,
        }
    }

    /// Absent and TypeMismatch both become a FieldLookupError.
    pub fn required(self, field: &str, path: &str) -> Result<&'a Value> {
        match self {
            Lookup::Found(value) => Ok(value),
            Lookup::Absent { segment } => Err(EtlError::field_lookup(
                field,
                path,
                format!("key '{}' not found", segment),
            )),
            Lookup::TypeMismatch { segment, found } => Err(EtlError::field_lookup(
                field,
                path,
                format!("cannot look up '{}' in a {} value", segment, found),
            )),
        }
    }
}

pub fn lookup<'a>(record: &'a Record, path: &str) -> Lookup<'a> {
    let mut segments = path.split('.');

    let first = segments.next().unwrap_or_default();
    let mut current = match record.data.get(first) {
        Some(value) => value,
        None => {
            return Lookup::Absent {
                segment: first.to_string(),
            }
        }
    };

    for segment in segments {
        let next = match current {
            Value::Object(obj) => obj.get(segment),
            Value::Array(items) => match segment.parse::<usize>() {
                Ok(index) => items.get(index),
                Err(_) => {
                    return Lookup::TypeMismatch {
                        segment: segment.to_string(),
                        found: "array",
                    }
                }
            },
            other => {
                return Lookup::TypeMismatch {
                    segment: segment.to_string(),
                    found: json_type_name(other),
                }
            }
        };

        current = match next {
            Some(value) => value,
            None => {
                return Lookup::Absent {
                    segment: segment.to_string(),
                }
            }
        };
    }

    Lookup::Found(current)
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

    #[test]
    fn test_nested_lookup() {
        let r = record(json!({"user": {"profile": {"name": "Ann"}}}));
        assert_eq!(lookup(&r, "user.profile.name").found(), Some(&json!("Ann")));
    }

    #[test]
    fn test_missing_top_level_key() {
        let r = record(json!({"text": "hi"}));
        assert_eq!(
            lookup(&r, "user.screen_name"),
            Lookup::Absent {
                segment: "user".to_string()
            }
        );
    }

    #[test]
    fn test_null_parent_is_type_mismatch() {
        let r = record(json!({"user": null}));
        assert_eq!(
            lookup(&r, "user.location"),
            Lookup::TypeMismatch {
                segment: "location".to_string(),
                found: "null"
            }
        );
    }

    #[test]
    fn test_array_index_segment() {
        let r = record(json!({"entities": {"hashtags": [{"text": "rust"}]}}));
        assert_eq!(
            lookup(&r, "entities.hashtags.0.text").found(),
            Some(&json!("rust"))
        );
        assert!(matches!(
            lookup(&r, "entities.hashtags.4"),
            Lookup::Absent { .. }
        ));
        assert!(matches!(
            lookup(&r, "entities.hashtags.text"),
            Lookup::TypeMismatch { found: "array", .. }
        ));
    }

    #[test]
    fn test_null_leaf_is_found() {
        let r = record(json!({"place": null}));
        assert_eq!(lookup(&r, "place").found(), Some(&Value::Null));
    }

    #[test]
    fn test_required_maps_to_field_lookup_error() {
        let r = record(json!({}));
        let err = lookup(&r, "lang").required("lang", "lang").unwrap_err();
        assert!(matches!(err, EtlError::FieldLookupError { ref field, .. } if field == "lang"));
    }
}
