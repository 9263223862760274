//! YouTube Data API v3 models and data structures.
//!
//! Contains the raw API resources we decode and the flattened
//! summaries handed back to callers.

use crate::error::{Result, YouTubeError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// One page of search results, reshaped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Token for the next page, if there is one
    pub next_token: Option<String>,
    /// Total results reported by the API (an estimate, not the page size)
    pub total: u64,
    /// Video items, in API order
    pub videos: Vec<VideoSummary>,
    /// Channel items, in API order
    pub channels: Vec<ChannelSummary>,
}

/// A video search hit with its statistics attached.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    /// YouTube video ID
    pub video_id: String,
    /// Video title
    pub title: String,
    /// Publication date, `YYYY-MM-DD`
    pub published: String,
    /// Video description (as returned by search, i.e. truncated)
    pub description: String,
    /// View count with thousands separators, e.g. `1,234,567`
    pub views: String,
    /// Video duration in seconds
    pub duration: u64,
    /// Thumbnails keyed by size name (`default`, `medium`, `high`, ...)
    pub thumbnails: BTreeMap<String, Thumbnail>,
    /// Channel ID
    pub channel_id: String,
    /// Channel name
    pub channel_title: String,
}

impl VideoSummary {
    /// Watch URL for this video.
    pub fn url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }

    /// Parsed publication date, if `published` is a valid `YYYY-MM-DD` date.
    pub fn published_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.published, "%Y-%m-%d").ok()
    }

    /// Format duration as HH:MM:SS or MM:SS.
    pub fn format_duration(&self) -> String {
        let hours = self.duration / 3600;
        let minutes = (self.duration % 3600) / 60;
        let seconds = self.duration % 60;

        if hours > 0 {
            format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            format!("{:02}:{:02}", minutes, seconds)
        }
    }
}

/// A channel search hit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    /// YouTube channel ID
    pub channel_id: String,
    /// Channel name
    pub title: String,
    /// Channel creation date, `YYYY-MM-DD`
    pub published: String,
    /// Channel description
    pub description: String,
    /// Thumbnails keyed by size name
    pub thumbnails: BTreeMap<String, Thumbnail>,
}

/// Single thumbnail.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Thumbnail {
    /// Thumbnail URL
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// A video's `contentDetails` and `statistics` merged into one flat map.
///
/// Statistics win when both objects carry the same key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ContentDetails(Map<String, Value>);

impl ContentDetails {
    /// Merge the detail objects of a `videos.list` item, leaving values raw.
    pub fn from_item(item: ApiVideoItem) -> Self {
        let mut fields = item.content_details.unwrap_or_default();
        fields.extend(item.statistics.unwrap_or_default());
        Self(fields)
    }

    /// Replace the ISO 8601 `duration` with its value in seconds.
    ///
    /// A duration that cannot be converted becomes `null`.
    pub fn with_duration_in_seconds(mut self) -> Self {
        if self.0.contains_key("duration") {
            let seconds = self.duration_seconds().map_or(Value::Null, Value::from);
            self.0.insert("duration".to_string(), seconds);
        }
        self
    }

    /// Raw field access.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// A numeric field such as `viewCount`.
    ///
    /// The API sends counts as decimal strings; plain JSON numbers are accepted
    /// too. Missing or non-numeric values give `None`.
    pub fn count(&self, key: &str) -> Option<u64> {
        match self.0.get(key)? {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    /// A non-empty text field such as `definition`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Duration in seconds, whether still raw or already converted.
    pub fn duration_seconds(&self) -> Option<u64> {
        match self.0.get("duration")? {
            Value::String(raw) => convert_duration(raw).ok(),
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }
}

/// YouTube API list response wrapper.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Response items
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Next page token for pagination
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub page_info: ApiPageInfo,
}

/// Paging details for lists of resources.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPageInfo {
    #[serde(default)]
    pub total_results: u64,
}

/// Item of a `search.list` response.
#[derive(Debug, Deserialize)]
pub struct ApiSearchItem {
    pub id: ApiSearchItemId,
    #[serde(default)]
    pub snippet: ApiSnippet,
}

/// Identifier of a search hit. Exactly one of the ids is set, matching `kind`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSearchItemId {
    #[serde(default)]
    pub kind: String,
    pub video_id: Option<String>,
    pub channel_id: Option<String>,
}

/// Snippet of a search hit.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiSnippet {
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub channel_id: String,
    pub channel_title: String,
    pub thumbnails: BTreeMap<String, Thumbnail>,
}

/// Item of a `videos.list` response.
///
/// The detail objects are kept as raw maps so every field the API sends
/// ends up in [`ContentDetails`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVideoItem {
    /// Video ID
    pub id: String,
    pub snippet: Option<ApiVideoSnippet>,
    pub content_details: Option<Map<String, Value>>,
    pub statistics: Option<Map<String, Value>>,
}

/// The part of a video snippet we read back.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVideoSnippet {
    pub channel_id: Option<String>,
}

/// Item of a `channels.list` response.
#[derive(Debug, Deserialize)]
pub struct ApiChannelItem {
    pub id: String,
}

/// Reshape a search page, attaching the details fetched for its videos.
///
/// Items without a video id never appear in `videos`; channel items go to
/// `channels` and anything else (playlists) is dropped. Videos missing from
/// `details` get zero views and zero duration.
pub fn shape_search(
    response: ApiResponse<ApiSearchItem>,
    details: &HashMap<String, ContentDetails>,
) -> SearchResult {
    let mut result = SearchResult {
        next_token: response.next_page_token,
        total: response.page_info.total_results,
        ..SearchResult::default()
    };

    for item in response.items {
        let snippet = item.snippet;
        let published = date_part(&snippet.published_at).to_string();

        if let Some(video_id) = item.id.video_id {
            let stats = details.get(&video_id);
            let views = stats.and_then(|d| d.count("viewCount")).unwrap_or(0);
            let duration = stats.and_then(ContentDetails::duration_seconds).unwrap_or(0);

            result.videos.push(VideoSummary {
                video_id,
                title: snippet.title,
                published,
                description: snippet.description,
                views: format_thousands(views),
                duration,
                thumbnails: snippet.thumbnails,
                channel_id: snippet.channel_id,
                channel_title: snippet.channel_title,
            });
        } else if let Some(channel_id) = item.id.channel_id {
            result.channels.push(ChannelSummary {
                channel_id,
                title: snippet.title,
                published,
                description: snippet.description,
                thumbnails: snippet.thumbnails,
            });
        } else {
            tracing::trace!(kind = %item.id.kind, "skipping search item without video or channel id");
        }
    }

    result
}

/// Date portion of an ISO 8601 timestamp (everything before `T`).
pub fn date_part(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or_default()
}

/// Convert a YouTube duration (`PT3M20S`) to seconds.
///
/// The digit groups are read right-aligned as seconds, minutes, hours and
/// days, so `PT3M20S` is 200 and `P1DT2H3M4S` is 93784. Unit letters are not
/// inspected. A string with no digit group or more than four fails.
pub fn convert_duration(raw: &str) -> Result<u64> {
    const WEIGHTS: [u64; 4] = [86_400, 3_600, 60, 1];

    let unsupported = || YouTubeError::UnsupportedDuration(raw.to_string());

    let groups = raw
        .split(|c: char| !c.is_ascii_digit())
        .filter(|group| !group.is_empty())
        .map(|group| group.parse::<u64>().map_err(|_| unsupported()))
        .collect::<Result<Vec<_>>>()?;

    if groups.is_empty() || groups.len() > WEIGHTS.len() {
        return Err(unsupported());
    }

    let weights = &WEIGHTS[WEIGHTS.len() - groups.len()..];
    groups
        .iter()
        .zip(weights)
        .try_fold(0u64, |total, (value, weight)| {
            value.checked_mul(*weight)?.checked_add(total)
        })
        .ok_or_else(unsupported)
}

/// Format an integer with comma thousands separators.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn search_page(value: Value) -> ApiResponse<ApiSearchItem> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_convert_duration() {
        assert_eq!(convert_duration("PT20S").unwrap(), 20);
        assert_eq!(convert_duration("PT3M20S").unwrap(), 200);
        assert_eq!(convert_duration("PT1H2M3S").unwrap(), 3723);
        assert_eq!(convert_duration("PT1D2H3M4S").unwrap(), 93784);
        assert_eq!(convert_duration("P0D").unwrap(), 0);
    }

    #[test]
    fn test_convert_duration_rejects_group_counts() {
        assert!(matches!(
            convert_duration("PT"),
            Err(YouTubeError::UnsupportedDuration(_))
        ));
        assert!(convert_duration("").is_err());
        assert!(convert_duration("P1W2DT3H4M5S").is_err());
        assert!(convert_duration("PT99999999999999999999S").is_err());
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
        assert_eq!(format_thousands(100_000), "100,000");
    }

    #[test]
    fn test_date_part() {
        assert_eq!(date_part("2021-05-01T12:00:00Z"), "2021-05-01");
        assert_eq!(date_part("2021-05-01"), "2021-05-01");
    }

    #[test]
    fn test_shape_search_drops_items_without_video_id() {
        let page = search_page(json!({
            "nextPageToken": "CAUQAA",
            "pageInfo": { "totalResults": 1000, "resultsPerPage": 3 },
            "items": [
                {
                    "id": { "kind": "youtube#video", "videoId": "abc" },
                    "snippet": {
                        "publishedAt": "2021-05-01T12:00:00Z",
                        "channelId": "UC1",
                        "title": "First",
                        "description": "desc",
                        "channelTitle": "Chan",
                        "thumbnails": {
                            "default": { "url": "https://i.ytimg.com/vi/abc/default.jpg", "width": 120, "height": 90 }
                        }
                    }
                },
                {
                    "id": { "kind": "youtube#channel", "channelId": "UC2" },
                    "snippet": { "publishedAt": "2015-01-02T00:00:00Z", "title": "A channel" }
                },
                {
                    "id": { "kind": "youtube#playlist", "playlistId": "PL1" },
                    "snippet": { "title": "A playlist" }
                }
            ]
        }));

        let mut details = HashMap::new();
        details.insert(
            "abc".to_string(),
            ContentDetails(
                json!({ "duration": "PT3M20S", "viewCount": "1234567" })
                    .as_object()
                    .cloned()
                    .unwrap(),
            ),
        );

        let result = shape_search(page, &details);
        assert_eq!(result.next_token.as_deref(), Some("CAUQAA"));
        assert_eq!(result.total, 1000);
        assert_eq!(result.videos.len(), 1);

        let video = &result.videos[0];
        assert_eq!(video.video_id, "abc");
        assert_eq!(video.published, "2021-05-01");
        assert_eq!(video.views, "1,234,567");
        assert_eq!(video.duration, 200);
        assert_eq!(video.thumbnails["default"].width, Some(120));

        assert_eq!(result.channels.len(), 1);
        assert_eq!(result.channels[0].channel_id, "UC2");
        assert_eq!(result.channels[0].published, "2015-01-02");
    }

    #[test]
    fn test_shape_search_without_details() {
        let page = search_page(json!({
            "items": [{ "id": { "videoId": "xyz" }, "snippet": { "title": "T" } }]
        }));
        let result = shape_search(page, &HashMap::new());
        assert_eq!(result.next_token, None);
        assert_eq!(result.total, 0);
        assert_eq!(result.videos[0].views, "0");
        assert_eq!(result.videos[0].duration, 0);
    }

    #[test]
    fn test_content_details_merge_and_fields() {
        let item: ApiVideoItem = serde_json::from_value(json!({
            "id": "abc",
            "contentDetails": { "duration": "PT1H2M3S", "definition": "hd" },
            "statistics": { "viewCount": "42", "likeCount": "n/a" }
        }))
        .unwrap();

        let details = ContentDetails::from_item(item);
        assert_eq!(details.count("viewCount"), Some(42));
        assert_eq!(details.count("likeCount"), None);
        assert_eq!(details.count("commentCount"), None);
        assert_eq!(details.text("definition"), Some("hd"));
        assert_eq!(details.get("duration"), Some(&json!("PT1H2M3S")));

        let normalized = details.with_duration_in_seconds();
        assert_eq!(normalized.get("duration"), Some(&json!(3723)));
        assert_eq!(normalized.duration_seconds(), Some(3723));
    }

    #[test]
    fn test_unconvertible_duration_becomes_null() {
        let item: ApiVideoItem = serde_json::from_value(json!({
            "id": "abc",
            "contentDetails": { "duration": "P1W2DT3H4M5S" },
            "statistics": { "viewCount": "7" }
        }))
        .unwrap();

        let normalized = ContentDetails::from_item(item).with_duration_in_seconds();
        assert_eq!(normalized.get("duration"), Some(&Value::Null));
        assert_eq!(normalized.duration_seconds(), None);
        assert_eq!(normalized.count("viewCount"), Some(7));

        let no_duration = ContentDetails::default().with_duration_in_seconds();
        assert_eq!(no_duration.get("duration"), None);
    }

    #[test]
    fn test_video_summary_helpers() {
        let video = VideoSummary {
            video_id: "abc".to_string(),
            published: "2024-01-15".to_string(),
            duration: 8130,
            ..VideoSummary::default()
        };
        assert_eq!(video.format_duration(), "02:15:30");
        assert_eq!(video.url(), "https://www.youtube.com/watch?v=abc");
        assert_eq!(
            video.published_date(),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );

        let short = VideoSummary {
            duration: 253,
            ..VideoSummary::default()
        };
        assert_eq!(short.format_duration(), "04:13");
        assert_eq!(short.published_date(), None);
    }

    #[test]
    fn test_video_summary_serializes_camel_case() {
        let value = serde_json::to_value(VideoSummary::default()).unwrap();
        assert!(value.get("videoId").is_some());
        assert!(value.get("channelTitle").is_some());
    }
}
