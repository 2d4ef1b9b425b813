use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::transcript::extract_video_id;
use crate::error::{Error, Result};

const VIDEOS_ENDPOINT: &str = "https://youtube.googleapis.com/youtube/v3/videos";

/// Engagement above this rate on a video with enough views marks it trending.
const TRENDING_ENGAGEMENT_RATE: f64 = 5.0;
const TRENDING_MIN_VIEWS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub title: String,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub engagement_rate: f64,
    pub is_trending: bool,
    pub fetched_at: DateTime<Utc>,
}

/// (likes + comments) / views x 100, defined as 0 when there are no views.
pub fn engagement_rate(views: u64, likes: u64, comments: u64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    (likes + comments) as f64 / views as f64 * 100.0
}

pub fn is_trending(engagement_rate: f64, views: u64) -> bool {
    engagement_rate > TRENDING_ENGAGEMENT_RATE && views > TRENDING_MIN_VIEWS
}

/// Bounded TTL cache for video details, keyed by video id. Freshness is
/// best-effort: entries past their TTL are dropped on access, and the
/// oldest entry is evicted when the cache is full.
#[derive(Debug)]
pub struct MetadataCache {
    entries: HashMap<String, VideoDetails>,
    capacity: usize,
    ttl: Duration,
}

impl MetadataCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
            ttl,
        }
    }

    pub fn get(&mut self, video_id: &str) -> Option<VideoDetails> {
        let fresh = self
            .entries
            .get(video_id)
            .is_some_and(|details| Utc::now() - details.fetched_at <= self.ttl);
        if !fresh {
            self.entries.remove(video_id);
            return None;
        }
        self.entries.get(video_id).cloned()
    }

    pub fn insert(&mut self, video_id: String, details: VideoDetails) {
        if self.capacity == 0 {
            return;
        }
        if !self.entries.contains_key(&video_id) && self.entries.len() >= self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, details)| details.fetched_at)
                .map(|(id, _)| id.clone());
            if let Some(id) = oldest {
                self.entries.remove(&id);
            }
        }
        self.entries.insert(video_id, details);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new(64, Duration::minutes(15))
    }
}

/// Client for the YouTube Data API `videos` endpoint.
#[derive(Clone)]
pub struct MetadataService {
    client: reqwest::Client,
    api_key: Option<String>,
    cache: Arc<Mutex<MetadataCache>>,
}

impl MetadataService {
    pub fn new(api_key: Option<String>, cache: MetadataCache) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            cache: Arc::new(Mutex::new(cache)),
        }
    }

    pub async fn fetch(&self, video_url: &str) -> Result<VideoDetails> {
        let video_id = extract_video_id(video_url)?;

        let api_key = self.api_key.clone().ok_or_else(|| {
            Error::config(format!(
                "{} is not set; video details are unavailable",
                crate::config::API_KEY_ENV
            ))
        })?;

        if let Ok(mut cache) = self.cache.lock()
            && let Some(details) = cache.get(&video_id)
        {
            return Ok(details);
        }

        let response = self
            .client
            .get(VIDEOS_ENDPOINT)
            .query(&[
                ("part", "snippet,statistics"),
                ("id", video_id.as_str()),
                ("key", api_key.as_str()),
            ])
            .send()
            .await?;

        let payload: VideosResponse = response.json().await?;
        let details = parse_details(payload, Utc::now())?;

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(video_id, details.clone());
        }

        Ok(details)
    }
}

// The API returns statistics counts as JSON strings; errors arrive as a
// payload rather than a transport failure.
#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(rename = "publishedAt")]
    published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "likeCount")]
    like_count: Option<String>,
    #[serde(rename = "commentCount")]
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

fn parse_details(payload: VideosResponse, fetched_at: DateTime<Utc>) -> Result<VideoDetails> {
    if let Some(error) = payload.error {
        return Err(Error::api(error.message));
    }

    let item = payload
        .items
        .into_iter()
        .next()
        .ok_or_else(|| Error::not_found("Video details not found."))?;

    let views = parse_count(item.statistics.view_count.as_deref());
    let likes = parse_count(item.statistics.like_count.as_deref());
    let comments = parse_count(item.statistics.comment_count.as_deref());
    let rate = engagement_rate(views, likes, comments);

    Ok(VideoDetails {
        title: item.snippet.title,
        views,
        likes,
        comments,
        published_at: item.snippet.published_at,
        engagement_rate: rate,
        is_trending: is_trending(rate, views),
        fetched_at,
    })
}

fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.parse().ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(fetched_at: DateTime<Utc>) -> VideoDetails {
        VideoDetails {
            title: "Review".to_string(),
            views: 20_000,
            likes: 900,
            comments: 300,
            published_at: None,
            engagement_rate: 6.0,
            is_trending: true,
            fetched_at,
        }
    }

    #[test]
    fn engagement_rate_is_zero_without_views() {
        assert_eq!(engagement_rate(0, 50, 10), 0.0);
    }

    #[test]
    fn engagement_rate_math() {
        assert_eq!(engagement_rate(1_000, 40, 10), 5.0);
    }

    #[test]
    fn trending_requires_both_thresholds() {
        assert!(is_trending(5.1, 10_001));
        assert!(!is_trending(5.0, 10_001));
        assert!(!is_trending(5.1, 10_000));
    }

    #[test]
    fn parses_string_typed_statistics() {
        let payload: VideosResponse = serde_json::from_str(
            r#"{
                "items": [{
                    "snippet": {"title": "Great Widget Review", "publishedAt": "2024-03-01T12:00:00Z"},
                    "statistics": {"viewCount": "20000", "likeCount": "900", "commentCount": "300"}
                }]
            }"#,
        )
        .expect("payload");

        let details = parse_details(payload, Utc::now()).expect("details");
        assert_eq!(details.title, "Great Widget Review");
        assert_eq!(details.views, 20_000);
        assert_eq!(details.engagement_rate, 6.0);
        assert!(details.is_trending);
    }

    #[test]
    fn missing_counts_default_to_zero() {
        let payload: VideosResponse = serde_json::from_str(
            r#"{"items": [{"snippet": {"title": "No stats"}, "statistics": {}}]}"#,
        )
        .expect("payload");

        let details = parse_details(payload, Utc::now()).expect("details");
        assert_eq!(details.views, 0);
        assert_eq!(details.engagement_rate, 0.0);
        assert!(!details.is_trending);
    }

    #[test]
    fn error_payload_maps_to_api_error() {
        let payload: VideosResponse =
            serde_json::from_str(r#"{"error": {"message": "quota exceeded"}}"#).expect("payload");
        assert!(matches!(
            parse_details(payload, Utc::now()),
            Err(Error::Api { .. })
        ));
    }

    #[test]
    fn empty_items_maps_to_not_found() {
        let payload: VideosResponse = serde_json::from_str(r#"{"items": []}"#).expect("payload");
        assert!(matches!(
            parse_details(payload, Utc::now()),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn cache_returns_fresh_entries() {
        let mut cache = MetadataCache::new(4, Duration::minutes(15));
        cache.insert("a".to_string(), details(Utc::now()));
        assert!(cache.get("a").is_some());
    }

    #[test]
    fn cache_expires_stale_entries() {
        let mut cache = MetadataCache::new(4, Duration::minutes(15));
        cache.insert("a".to_string(), details(Utc::now() - Duration::minutes(16)));
        assert!(cache.get("a").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn cache_evicts_oldest_when_full() {
        let mut cache = MetadataCache::new(2, Duration::hours(1));
        cache.insert("old".to_string(), details(Utc::now() - Duration::minutes(10)));
        cache.insert("mid".to_string(), details(Utc::now() - Duration::minutes(5)));
        cache.insert("new".to_string(), details(Utc::now()));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("old").is_none());
        assert!(cache.get("mid").is_some());
        assert!(cache.get("new").is_some());
    }
}
