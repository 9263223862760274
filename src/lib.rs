//! Client for the YouTube Data API v3 search endpoints.
//!
//! Searches videos and channels, looks up related videos and reads
//! per-video statistics, returning flattened results.
//!
//! ```rust,no_run
//! use yt_search::{Config, SearchOptions, SortOrder, YouTubeClient};
//!
//! # async fn example() -> Result<(), yt_search::YouTubeError> {
//! let client = YouTubeClient::new(&Config::with_api_key("AIza..."))?;
//! let page = client
//!     .search("rust tutorial", &SearchOptions::new().limit(5).sort(SortOrder::Views))
//!     .await?;
//! for video in &page.videos {
//!     println!("{} ({}s, {} views)", video.title, video.duration, video.views);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod youtube;

pub use config::Config;
pub use error::YouTubeError;
pub use youtube::{
    ChannelSummary, ContentDetails, HttpTransport, SearchOptions, SearchResult, SortOrder,
    Thumbnail, Transport, VideoSummary, YouTubeClient, convert_duration, id_by_url,
};
