//! Request parameters: search options, sort orders and URL helpers.

use std::convert::Infallible;
use std::str::FromStr;
use url::Url;

/// Result ordering for video searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Highest view count first
    Views,
    /// Highest rating first
    Likes,
    /// Newest first
    PublishedDesc,
    /// API relevance ranking
    Relevance,
}

impl SortOrder {
    /// Value of the API's `order` parameter.
    pub fn as_api_order(self) -> &'static str {
        match self {
            SortOrder::Views => "viewCount",
            SortOrder::Likes => "rating",
            SortOrder::PublishedDesc => "date",
            SortOrder::Relevance => "relevance",
        }
    }
}

impl FromStr for SortOrder {
    type Err = Infallible;

    /// Unknown names fall back to relevance.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "views" => SortOrder::Views,
            "likes" => SortOrder::Likes,
            "published_desc" => SortOrder::PublishedDesc,
            _ => SortOrder::Relevance,
        })
    }
}

/// Per-call paging and ordering.
///
/// A missing `limit` resolves to the client's configured default for the
/// endpoint being called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit: Option<u32>,
    pub page_token: Option<String>,
    pub sort: Option<SortOrder>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn page_token(mut self, token: impl Into<String>) -> Self {
        self.page_token = Some(token.into());
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Resource type a search is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Video,
    Channel,
}

impl SearchKind {
    /// Value of the API's `type` parameter.
    pub fn as_api_type(self) -> &'static str {
        match self {
            SearchKind::Video => "video",
            SearchKind::Channel => "channel",
        }
    }
}

/// Remote list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Search,
    Videos,
    Channels,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Search => "search",
            Endpoint::Videos => "videos",
            Endpoint::Channels => "channels",
        }
    }
}

/// Extract the video id from the `v` query parameter of a watch URL.
///
/// Accepts absolute URLs as well as bare `watch?v=...` fragments. When `v`
/// repeats, the last one wins. Returns `None` when that value is empty or
/// there is no `v` parameter.
pub fn id_by_url(url: &str) -> Option<String> {
    let pairs = match Url::parse(url) {
        Ok(parsed) => parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect::<Vec<_>>(),
        Err(_) => {
            let (_, query) = url.split_once('?')?;
            let query = query.split('#').next().unwrap_or_default();
            url::form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        }
    };

    pairs
        .into_iter()
        .rev()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_by_url() {
        assert_eq!(
            id_by_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            id_by_url("https://www.youtube.com/watch?v=abc123&t=42s&list=PL1").as_deref(),
            Some("abc123")
        );
        assert_eq!(
            id_by_url("https://www.youtube.com/watch?feature=share&v=abc123#t=10").as_deref(),
            Some("abc123")
        );
        assert_eq!(id_by_url("youtube.com/watch?v=xyz&a=b").as_deref(), Some("xyz"));
    }

    #[test]
    fn test_id_by_url_repeated_v_takes_last() {
        assert_eq!(
            id_by_url("https://www.youtube.com/watch?v=first&v=second").as_deref(),
            Some("second")
        );
        assert_eq!(id_by_url("watch?v=a&t=1&v=b").as_deref(), Some("b"));
    }

    #[test]
    fn test_id_by_url_without_v() {
        assert_eq!(id_by_url("https://www.youtube.com/watch?list=PL1"), None);
        assert_eq!(id_by_url("https://youtu.be/abc123"), None);
        assert_eq!(id_by_url("https://www.youtube.com/watch?v="), None);
        assert_eq!(id_by_url("not a url"), None);
        assert_eq!(id_by_url(""), None);
    }

    #[test]
    fn test_sort_order_mapping() {
        let order = |s: &str| s.parse::<SortOrder>().unwrap().as_api_order();
        assert_eq!(order("views"), "viewCount");
        assert_eq!(order("likes"), "rating");
        assert_eq!(order("published_desc"), "date");
        assert_eq!(order("anything"), "relevance");
    }

    #[test]
    fn test_search_options_builder() {
        let options = SearchOptions::new()
            .limit(5)
            .page_token("CAUQAA")
            .sort(SortOrder::Views);
        assert_eq!(options.limit, Some(5));
        assert_eq!(options.page_token.as_deref(), Some("CAUQAA"));
        assert_eq!(options.sort, Some(SortOrder::Views));
        assert_eq!(SearchOptions::new(), SearchOptions::default());
    }
}
