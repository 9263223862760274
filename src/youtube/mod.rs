//! YouTube Data API v3 integration module.
//!
//! Provides the client for searching videos and channels, looking up related
//! videos and reading per-video statistics.

pub mod client;
pub mod models;
pub mod query;
pub mod transport;

pub use client::YouTubeClient;
pub use models::{
    ChannelSummary, ContentDetails, SearchResult, Thumbnail, VideoSummary, convert_duration,
};
pub use query::{SearchOptions, SortOrder, id_by_url};
pub use transport::{HttpTransport, Transport};
