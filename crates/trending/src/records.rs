// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Raw snapshot model and the flattening into table rows
//!
//! Every field of the raw model is optional: a missing or null mapping
//! yields null columns, never an error. Only a document whose shape
//! contradicts the model (e.g. `items` holding a string) fails to parse.

use crate::{PipelineError, Result};
use diagnostics::*;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoded raw snapshot; unknown fields are ignored
#[derive(Deserialize, Debug, Default)]
pub struct RawSnapshot {
    pub items: Option<Vec<RawItem>>,
}

/// One listed video
///
/// Scalars stay raw JSON and a mapping of the wrong shape reads as absent,
/// so one odd item never fails the whole snapshot.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub snippet: Option<Snippet>,
    #[serde(default, deserialize_with = "lenient")]
    pub statistics: Option<Statistics>,
    #[serde(default, deserialize_with = "lenient")]
    pub content_details: Option<ContentDetails>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub title: Option<Value>,
    pub channel_title: Option<Value>,
    pub published_at: Option<Value>,
    pub category_id: Option<Value>,
}

/// Counts arrive string-encoded but are kept as raw JSON until coercion
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub view_count: Option<Value>,
    pub like_count: Option<Value>,
    pub comment_count: Option<Value>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContentDetails {
    pub duration: Option<Value>,
    pub definition: Option<Value>,
    pub caption: Option<Value>,
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

impl RawSnapshot {
    /// Decode a stored object; `key` only labels errors
    pub fn parse(key: &str, data: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(data).map_err(|e| PipelineError::MalformedSnapshot {
            key: key.to_string(),
            reason: format!("not UTF-8: {e}"),
        })?;

        serde_json::from_str(text).map_err(|e| PipelineError::MalformedSnapshot {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    /// The item list, or `NoItems` if it is absent, null, or empty
    pub fn into_items(self, key: &str) -> Result<Vec<RawItem>> {
        match self.items {
            Some(items) if !items.is_empty() => Ok(items),
            _ => Err(PipelineError::NoItems {
                key: key.to_string(),
            }),
        }
    }
}

/// One table row per raw item, columns in output order
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FlatRecord {
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub channel_title: Option<String>,
    pub published_at: Option<String>,
    pub category_id: Option<String>,
    pub view_count: Option<i64>,
    pub like_count: Option<i64>,
    pub comment_count: Option<i64>,
    pub duration: Option<String>,
    pub definition: Option<String>,
    pub caption: Option<String>,
}

impl FlatRecord {
    #[must_use]
    pub fn from_item(item: &RawItem) -> Self {
        let snippet = item.snippet.clone().unwrap_or_default();
        let stats = item.statistics.as_ref();
        let content = item.content_details.clone().unwrap_or_default();

        FlatRecord {
            video_id: text(item.id.as_ref()),
            title: text(snippet.title.as_ref()),
            channel_title: text(snippet.channel_title.as_ref()),
            published_at: text(snippet.published_at.as_ref()),
            category_id: text(snippet.category_id.as_ref()),
            view_count: coerce_count(stats.and_then(|s| s.view_count.as_ref())),
            like_count: coerce_count(stats.and_then(|s| s.like_count.as_ref())),
            comment_count: coerce_count(stats.and_then(|s| s.comment_count.as_ref())),
            duration: text(content.duration.as_ref()),
            definition: text(content.definition.as_ref()),
            caption: text(content.caption.as_ref()),
        }
    }
}

/// Flatten all items, logging how many counts could not be coerced
#[must_use]
pub fn flatten_items(items: &[RawItem]) -> Vec<FlatRecord> {
    let records: Vec<FlatRecord> = items.iter().map(FlatRecord::from_item).collect();

    let dropped = items
        .iter()
        .zip(&records)
        .map(|(item, record)| {
            let stats = item.statistics.clone().unwrap_or_default();
            [
                (stats.view_count, record.view_count),
                (stats.like_count, record.like_count),
                (stats.comment_count, record.comment_count),
            ]
            .into_iter()
            .filter(|(raw, coerced)| raw.as_ref().is_some_and(|v| !v.is_null()) && coerced.is_none())
            .count()
        })
        .sum::<usize>();

    if dropped > 0 {
        debug!("{dropped} count values could not be coerced and were set to null", dropped);
    }
    records
}

/// Text of a string column; numbers and booleans are rendered, anything
/// else is null
#[must_use]
pub fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Coerce a count to an integer; anything unparseable becomes `None`
///
/// Accepts JSON integers, integer strings (surrounding whitespace
/// ignored), and integral floats in either form.
#[must_use]
pub fn coerce_count(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

fn integral(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is out of range
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.is_finite() && f.fract() == 0.0 && in_range).then(|| f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> RawItem {
        serde_json::from_value(value).expect("valid item")
    }

    #[test]
    fn test_coerce_count() {
        assert_eq!(coerce_count(Some(&json!("12345"))), Some(12345));
        assert_eq!(coerce_count(Some(&json!(" 42 "))), Some(42));
        assert_eq!(coerce_count(Some(&json!(7))), Some(7));
        assert_eq!(coerce_count(Some(&json!("3.0"))), Some(3));
        assert_eq!(coerce_count(Some(&json!(3.0))), Some(3));

        assert_eq!(coerce_count(Some(&json!("not-a-number"))), None);
        assert_eq!(coerce_count(Some(&json!("3.5"))), None);
        assert_eq!(coerce_count(Some(&json!(""))), None);
        assert_eq!(coerce_count(Some(&json!("NaN"))), None);
        assert_eq!(coerce_count(Some(&json!("inf"))), None);
        assert_eq!(coerce_count(Some(&json!(true))), None);
        assert_eq!(coerce_count(Some(&json!({"n": 1}))), None);
        assert_eq!(coerce_count(Some(&Value::Null)), None);
        assert_eq!(coerce_count(Some(&json!(u64::MAX))), None);
        assert_eq!(coerce_count(None), None);
    }

    #[test]
    fn test_flatten_full_item() {
        let raw = item(json!({
            "kind": "youtube#video",
            "id": "abc123",
            "snippet": {
                "title": "A video",
                "channelTitle": "A channel",
                "publishedAt": "2025-01-01T00:00:00Z",
                "categoryId": "10",
                "tags": ["ignored"]
            },
            "statistics": {
                "viewCount": "12345",
                "likeCount": "678",
                "commentCount": "9"
            },
            "contentDetails": {
                "duration": "PT4M13S",
                "definition": "hd",
                "caption": "false"
            }
        }));

        assert_eq!(
            FlatRecord::from_item(&raw),
            FlatRecord {
                video_id: Some("abc123".to_string()),
                title: Some("A video".to_string()),
                channel_title: Some("A channel".to_string()),
                published_at: Some("2025-01-01T00:00:00Z".to_string()),
                category_id: Some("10".to_string()),
                view_count: Some(12345),
                like_count: Some(678),
                comment_count: Some(9),
                duration: Some("PT4M13S".to_string()),
                definition: Some("hd".to_string()),
                caption: Some("false".to_string()),
            }
        );
    }

    #[test]
    fn test_missing_mappings_become_nulls() {
        let raw = item(json!({"id": "only-id", "snippet": null}));
        let record = FlatRecord::from_item(&raw);
        assert_eq!(record.video_id.as_deref(), Some("only-id"));
        assert_eq!(
            record,
            FlatRecord {
                video_id: Some("only-id".to_string()),
                ..FlatRecord::default()
            }
        );

        // Comment counts are hidden on some videos
        let raw = item(json!({"id": "x", "statistics": {"viewCount": "5", "likeCount": "1"}}));
        let record = FlatRecord::from_item(&raw);
        assert_eq!(record.view_count, Some(5));
        assert_eq!(record.comment_count, None);
    }

    #[test]
    fn test_odd_field_types_do_not_fail_the_item() {
        let raw = item(json!({
            "id": 42,
            "snippet": {"title": {"text": "nested"}, "categoryId": 10, "channelTitle": "C"},
            "statistics": "hidden",
            "contentDetails": {"caption": true, "definition": ["hd"]}
        }));
        assert_eq!(
            FlatRecord::from_item(&raw),
            FlatRecord {
                video_id: Some("42".to_string()),
                channel_title: Some("C".to_string()),
                category_id: Some("10".to_string()),
                caption: Some("true".to_string()),
                ..FlatRecord::default()
            }
        );

        let raw = item(json!({"id": "x", "snippet": "not a mapping"}));
        assert_eq!(FlatRecord::from_item(&raw).title, None);
    }

    #[test]
    fn test_text() {
        assert_eq!(text(Some(&json!("a"))), Some("a".to_string()));
        assert_eq!(text(Some(&json!(10))), Some("10".to_string()));
        assert_eq!(text(Some(&json!(false))), Some("false".to_string()));
        assert_eq!(text(Some(&Value::Null)), None);
        assert_eq!(text(Some(&json!({"a": 1}))), None);
        assert_eq!(text(None), None);
    }

    #[test]
    fn test_flatten_preserves_order() {
        let items = vec![
            item(json!({"id": "first", "statistics": {"viewCount": "bogus"}})),
            item(json!({"id": "second"})),
        ];
        let records = flatten_items(&items);
        let ids: Vec<_> = records.iter().map(|r| r.video_id.as_deref()).collect();
        assert_eq!(ids, vec![Some("first"), Some("second")]);
        assert_eq!(records[0].view_count, None);
    }

    #[test]
    fn test_parse_snapshot() {
        let snapshot = RawSnapshot::parse("k", br#"{"kind": "x", "items": [{"id": "a"}]}"#)
            .expect("parses");
        let items = snapshot.into_items("k").expect("has items");
        assert_eq!(items.len(), 1);

        let bodies: [&[u8]; 3] = [br#"{"items": []}"#, br#"{"items": null}"#, b"{}"];
        for body in bodies {
            let err = RawSnapshot::parse("k", body)
                .and_then(|s| s.into_items("k"))
                .expect_err("no items");
            assert_eq!(err.status_code(), 400);
        }

        let err = RawSnapshot::parse("k", b"{not json").expect_err("malformed");
        assert_eq!(err.kind(), "malformed_snapshot");

        let err = RawSnapshot::parse("k", &[0xff, 0xfe]).expect_err("not utf-8");
        assert_eq!(err.kind(), "malformed_snapshot");
    }
}
