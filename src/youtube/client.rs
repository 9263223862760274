//! YouTube Data API v3 client implementation.
//!
//! Wraps video search, channel search, related-video lookup and the
//! per-video detail calls. Every method returns a typed error instead of
//! swallowing failures.

use crate::config::Config;
use crate::error::{Result, YouTubeError};
use crate::youtube::models::{
    ApiChannelItem, ApiResponse, ApiSearchItem, ApiVideoItem, ContentDetails, SearchResult,
    shape_search,
};
use crate::youtube::query::{Endpoint, SearchKind, SearchOptions, id_by_url};
use crate::youtube::transport::{HttpTransport, Transport};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::instrument;
use url::Url;

/// The API accepts at most this many ids per `videos.list` call.
const MAX_IDS_PER_REQUEST: usize = 50;

const DETAIL_PARTS: &str = "contentDetails,statistics";

/// YouTube Data API v3 client.
///
/// Holds the API key and the configured default page sizes. It has no
/// mutable state, so clones can be used from several tasks at once.
#[derive(Debug, Clone)]
pub struct YouTubeClient<T = HttpTransport> {
    /// Transport performing the GET requests
    transport: T,
    /// API key for authentication
    api_key: String,
    /// Base URL for YouTube Data API
    base_url: Url,
    videos_limit: u32,
    channels_limit: u32,
    related_limit: u32,
}

impl YouTubeClient<HttpTransport> {
    /// Create a new YouTube client from configuration.
    ///
    /// # Arguments
    /// * `config` - Client configuration
    ///
    /// # Returns
    /// * `Result<YouTubeClient>` - New client or error
    ///
    /// # Details
    /// Requires an API key. The HTTP client uses the configured timeout.
    pub fn new(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(Duration::from_secs(config.timeout_secs))?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> YouTubeClient<T> {
    /// Create a client that sends its requests through `transport`.
    pub fn with_transport(config: &Config, transport: T) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(YouTubeError::InvalidInput(
                "YouTube API key is required".to_string(),
            ));
        }

        // A trailing slash keeps `join` from replacing the last path segment.
        let base_url = Url::parse(&format!("{}/", config.base_url.trim_end_matches('/')))?;

        Ok(Self {
            transport,
            api_key: config.api_key.clone(),
            base_url,
            videos_limit: config.videos_limit,
            channels_limit: config.channels_limit,
            related_limit: config.related_limit,
        })
    }

    /// Search videos matching `query`.
    ///
    /// # Arguments
    /// * `query` - Search term
    /// * `options` - Page size, page token and sort order
    ///
    /// # Returns
    /// * `Result<SearchResult>` - One page of videos with statistics attached
    ///
    /// # Details
    /// Issues one `search.list` call and one batched `videos.list` call for
    /// the statistics of the returned videos.
    #[instrument(skip(self, options))]
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchResult> {
        let url = self.search_url(SearchKind::Video, query, options)?;
        self.fetch_search(url).await
    }

    /// Search channels matching `query`.
    ///
    /// Channel hits are returned in [`SearchResult::channels`]. The sort order
    /// in `options` is not sent for channel searches.
    #[instrument(skip(self, options))]
    pub async fn search_channels(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResult> {
        let url = self.search_url(SearchKind::Channel, query, options)?;
        self.fetch_search(url).await
    }

    /// Fetch videos related to `video_id`. The default page size is 8.
    #[instrument(skip(self, options))]
    pub async fn related_videos(
        &self,
        video_id: &str,
        options: &SearchOptions,
    ) -> Result<SearchResult> {
        let url = self.related_url(video_id, options)?;
        self.fetch_search(url).await
    }

    /// Content details and statistics of one video, duration in seconds.
    pub async fn content_details(&self, video_id: &str) -> Result<ContentDetails> {
        Ok(self.raw_details(video_id).await?.with_duration_in_seconds())
    }

    /// Duration in seconds, or `None` if absent or not convertible.
    pub async fn duration(&self, video_id: &str) -> Result<Option<u64>> {
        Ok(self.raw_details(video_id).await?.duration_seconds())
    }

    /// View count, or `None` if absent or not numeric.
    pub async fn views(&self, video_id: &str) -> Result<Option<u64>> {
        self.count(video_id, "viewCount").await
    }

    /// Like count, or `None` if hidden or not numeric.
    pub async fn likes(&self, video_id: &str) -> Result<Option<u64>> {
        self.count(video_id, "likeCount").await
    }

    /// Dislike count; the API only reports it to the video owner.
    pub async fn dislikes(&self, video_id: &str) -> Result<Option<u64>> {
        self.count(video_id, "dislikeCount").await
    }

    pub async fn favorites(&self, video_id: &str) -> Result<Option<u64>> {
        self.count(video_id, "favoriteCount").await
    }

    pub async fn comments(&self, video_id: &str) -> Result<Option<u64>> {
        self.count(video_id, "commentCount").await
    }

    /// Video definition (`hd` or `sd`).
    pub async fn definition(&self, video_id: &str) -> Result<Option<String>> {
        let details = self.raw_details(video_id).await?;
        Ok(details.text("definition").map(str::to_string))
    }

    /// The unshaped `videos.list` response for one video, snippet included.
    pub async fn video_resource(&self, video_id: &str) -> Result<Value> {
        let url = self.videos_url(non_empty_id(video_id)?, "contentDetails,statistics,snippet")?;
        self.transport.get_json(url).await
    }

    /// Resolve a legacy username to its channel id.
    #[instrument(skip(self))]
    pub async fn channel_id_by_name(&self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(YouTubeError::InvalidInput("empty channel name".to_string()));
        }

        let mut url = self.endpoint(Endpoint::Channels)?;
        url.query_pairs_mut()
            .append_pair("forUsername", name)
            .append_pair("part", "id")
            .append_pair("key", &self.api_key);

        let response: ApiResponse<ApiChannelItem> = self.get(url).await?;
        response
            .items
            .into_iter()
            .next()
            .map(|channel| channel.id)
            .ok_or_else(|| YouTubeError::NotFound(format!("channel with username {name}")))
    }

    /// Channel id of the video a watch URL points to.
    ///
    /// Fails with [`YouTubeError::InvalidInput`] when the URL has no `v`
    /// parameter; `None` when the video or its channel id is not returned.
    #[instrument(skip(self))]
    pub async fn channel_id_by_video_url(&self, url: &str) -> Result<Option<String>> {
        let video_id = id_by_url(url)
            .ok_or_else(|| YouTubeError::InvalidInput(format!("no video id in url {url}")))?;

        let url = self.videos_url(&video_id, "snippet")?;
        let response: ApiResponse<ApiVideoItem> = self.get(url).await?;

        Ok(response
            .items
            .into_iter()
            .next()
            .and_then(|item| item.snippet)
            .and_then(|snippet| snippet.channel_id)
            .filter(|id| !id.is_empty()))
    }

    /// Build the `search.list` URL for a video or channel search.
    fn search_url(&self, kind: SearchKind, query: &str, options: &SearchOptions) -> Result<Url> {
        let query = query.trim();
        if query.is_empty() {
            return Err(YouTubeError::InvalidInput("empty search query".to_string()));
        }

        let limit = options.limit.unwrap_or(match kind {
            SearchKind::Video => self.videos_limit,
            SearchKind::Channel => self.channels_limit,
        });

        let mut url = self.endpoint(Endpoint::Search)?;
        {
            // Form encoding turns spaces in `q` into `+`.
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("type", kind.as_api_type())
                .append_pair("part", "snippet")
                .append_pair("q", query)
                .append_pair("key", &self.api_key);
            if let Some(token) = &options.page_token {
                pairs.append_pair("pageToken", token);
            }
            pairs.append_pair("maxResults", &limit.to_string());

            match (kind, options.sort) {
                (SearchKind::Video, Some(sort)) => {
                    pairs.append_pair("order", sort.as_api_order());
                }
                (SearchKind::Channel, Some(sort)) => {
                    tracing::debug!(?sort, "sort order is not applied to channel searches");
                }
                (_, None) => {}
            }
        }

        Ok(url)
    }

    fn related_url(&self, video_id: &str, options: &SearchOptions) -> Result<Url> {
        let video_id = non_empty_id(video_id)?;
        let limit = options.limit.unwrap_or(self.related_limit);

        let mut url = self.endpoint(Endpoint::Search)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("type", SearchKind::Video.as_api_type())
                .append_pair("part", "snippet")
                .append_pair("relatedToVideoId", video_id)
                .append_pair("maxResults", &limit.to_string())
                .append_pair("key", &self.api_key);
            if let Some(token) = &options.page_token {
                pairs.append_pair("pageToken", token);
            }
        }

        Ok(url)
    }

    fn videos_url(&self, ids: &str, parts: &str) -> Result<Url> {
        let mut url = self.endpoint(Endpoint::Videos)?;
        url.query_pairs_mut()
            .append_pair("id", ids)
            .append_pair("key", &self.api_key)
            .append_pair("part", parts);
        Ok(url)
    }

    fn endpoint(&self, endpoint: Endpoint) -> Result<Url> {
        Ok(self.base_url.join(endpoint.path())?)
    }

    /// GET `url` and decode the body as `R`.
    async fn get<R: serde::de::DeserializeOwned>(&self, url: Url) -> Result<R> {
        tracing::debug!(endpoint = url.path(), "requesting YouTube API");
        let value = self.transport.get_json(url).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Run a search request and attach statistics to its videos.
    async fn fetch_search(&self, url: Url) -> Result<SearchResult> {
        let response: ApiResponse<ApiSearchItem> = self.get(url).await?;

        let video_ids: Vec<String> = response
            .items
            .iter()
            .filter_map(|item| item.id.video_id.clone())
            .collect();

        let details = self.fetch_details(&video_ids).await?;
        Ok(shape_search(response, &details))
    }

    /// Fetch raw content details for a list of video ids.
    ///
    /// # Details
    /// Ids are sent in batches of 50, the API's per-request maximum.
    async fn fetch_details(&self, video_ids: &[String]) -> Result<HashMap<String, ContentDetails>> {
        let mut details = HashMap::with_capacity(video_ids.len());

        for chunk in video_ids.chunks(MAX_IDS_PER_REQUEST) {
            let url = self.videos_url(&chunk.join(","), DETAIL_PARTS)?;
            let response: ApiResponse<ApiVideoItem> = self.get(url).await?;

            for item in response.items {
                details.insert(item.id.clone(), ContentDetails::from_item(item));
            }
        }

        Ok(details)
    }

    /// Content details of one video with values left raw.
    async fn raw_details(&self, video_id: &str) -> Result<ContentDetails> {
        let video_id = non_empty_id(video_id)?;
        let url = self.videos_url(video_id, DETAIL_PARTS)?;
        let response: ApiResponse<ApiVideoItem> = self.get(url).await?;

        response
            .items
            .into_iter()
            .next()
            .map(ContentDetails::from_item)
            .ok_or_else(|| YouTubeError::NotFound(format!("video {video_id}")))
    }

    async fn count(&self, video_id: &str, field: &str) -> Result<Option<u64>> {
        Ok(self.raw_details(video_id).await?.count(field))
    }
}

fn non_empty_id(video_id: &str) -> Result<&str> {
    let video_id = video_id.trim();
    if video_id.is_empty() {
        return Err(YouTubeError::InvalidInput("invalid video id".to_string()));
    }
    Ok(video_id)
}
