use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use tokio::time::Instant;

use crate::error::FeedError;

/// Floor on how long the loading indicator stays visible, so a fast fetch
/// does not flash it away.
pub const MIN_LOADING_MS: u64 = 600;

/// One entry from the astronomy-picture-of-the-day feed.
///
/// Every field is optional. The feed has carried records with any subset of
/// these, so a record with nothing usable must still classify cleanly (see
/// [`crate::media::classify`]).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedRecord {
    pub title: Option<String>,
    pub date: Option<String>,
    pub explanation: Option<String>,
    pub media_type: Option<String>,
    pub hdurl: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub thumbnail_url: Option<String>,
    pub thumbnail: Option<String>,
    pub thumb: Option<String>,
}

/// The ordered record sequence from one fetch.
///
/// Immutable once built; replacing it invalidates any pending shuffle order
/// and any live player handles (the viewer controller enforces that).
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    records: Vec<FeedRecord>,
}

impl FeedSnapshot {
    pub fn new(records: Vec<FeedRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FeedRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[FeedRecord] {
        &self.records
    }
}

/// Flatten the feed document into a record sequence.
///
/// The published document has appeared in several top-level shapes: a bare
/// array, `{"items": [...]}`, `{"data": [...]}` (`items` wins when both are
/// present), or an object keyed by date. Anything else that is not
/// array-like is coerced by taking its property values; scalars normalize to
/// an empty sequence. Individual records that fail to deserialize are
/// skipped, not fatal.
pub fn normalize_feed(doc: Value) -> Vec<FeedRecord> {
    let items: Vec<Value> = match doc {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let picked = map.remove("items").or_else(|| map.remove("data"));
            match picked {
                Some(Value::Array(items)) => items,
                Some(Value::Object(inner)) => inner.into_iter().map(|(_, v)| v).collect(),
                Some(_) => Vec::new(),
                None => map.into_iter().map(|(_, v)| v).collect(),
            }
        }
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<FeedRecord>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed feed record: {}", e);
                None
            }
        })
        .collect()
}

/// Fetches the feed document and normalizes it into a [`FeedSnapshot`].
///
/// One load is expected in flight at a time, driven by a single trigger
/// action. Loads are not cancelled; instead each carries a generation token
/// and the caller discards results from a superseded generation (see
/// [`FeedLoader::begin`]).
#[derive(Clone)]
pub struct FeedLoader {
    client: reqwest::Client,
    url: String,
    min_loading: Duration,
    generation: u64,
}

impl FeedLoader {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            min_loading: Duration::from_millis(MIN_LOADING_MS),
            generation: 0,
        }
    }

    /// Override the loading-indicator floor (tests use zero).
    pub fn with_min_loading(mut self, min_loading: Duration) -> Self {
        self.min_loading = min_loading;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Start a new load generation, marking any in-flight load as stale.
    /// Returns the token identifying the load about to run.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// True while `token` still identifies the newest requested load.
    pub fn is_current(&self, token: u64) -> bool {
        self.generation == token
    }

    /// Fetch the feed once. Non-2xx is a hard failure; a malformed body is a
    /// hard failure; an empty normalized sequence is a success with an empty
    /// snapshot. Successful loads are held back until the minimum loading
    /// time has elapsed.
    pub async fn load(&self) -> Result<FeedSnapshot, FeedError> {
        let start = Instant::now();
        debug!("Fetching feed from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let body = response.text().await?;
        let doc: Value = serde_json::from_str(&body)?;
        let records = normalize_feed(doc);
        debug!("Feed normalized to {} records", records.len());

        let elapsed = start.elapsed();
        if elapsed < self.min_loading {
            tokio::time::sleep(self.min_loading - elapsed).await;
        }

        Ok(FeedSnapshot::new(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_bare_array() {
        let doc = json!([{ "title": "A" }, { "title": "B" }]);
        let records = normalize_feed(doc);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title.as_deref(), Some("A"));
    }

    #[test]
    fn normalizes_data_field() {
        let doc = json!({ "data": [{ "url": "https://example.com/a.jpg" }] });
        let records = normalize_feed(doc);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url.as_deref(), Some("https://example.com/a.jpg"));
    }

    #[test]
    fn normalizes_items_field_over_data() {
        let doc = json!({
            "data": [{ "title": "from data" }],
            "items": [{ "title": "from items" }, { "title": "second" }]
        });
        let records = normalize_feed(doc);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title.as_deref(), Some("from items"));
    }

    #[test]
    fn normalizes_keyed_object_by_taking_values() {
        let doc = json!({
            "2024-01-01": { "title": "New Year" },
            "2024-01-02": { "title": "Day Two" }
        });
        let records = normalize_feed(doc);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn empty_data_field_is_empty_not_error() {
        let records = normalize_feed(json!({ "data": [] }));
        assert!(records.is_empty());
    }

    #[test]
    fn scalar_document_is_empty() {
        assert!(normalize_feed(json!(42)).is_empty());
        assert!(normalize_feed(json!("nope")).is_empty());
        assert!(normalize_feed(json!(null)).is_empty());
    }

    #[test]
    fn malformed_records_are_skipped() {
        let doc = json!([{ "title": "ok" }, "not an object", { "date": "2024-05-05" }]);
        let records = normalize_feed(doc);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn generation_tokens_supersede() {
        let mut loader = FeedLoader::new("https://example.com/feed.json");
        let first = loader.begin();
        assert!(loader.is_current(first));
        let second = loader.begin();
        assert!(!loader.is_current(first));
        assert!(loader.is_current(second));
    }
}
