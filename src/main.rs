//! yt-search - command-line front end for the YouTube search client.
//!
//! Each subcommand maps to one client operation and prints its result as JSON.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use yt_search::{Config, SearchOptions, SearchResult, SortOrder, YouTubeClient, id_by_url};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to the config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API key, overriding the one in the config file
    #[arg(long)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search videos
    Search {
        #[arg(required = true)]
        query: Vec<String>,
        #[command(flatten)]
        page: PageArgs,
        /// views, likes, published_desc or relevance
        #[arg(short, long)]
        sort: Option<String>,
    },
    /// Search channels
    Channels {
        #[arg(required = true)]
        query: Vec<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Videos related to a video id
    Related {
        video_id: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Merged content details and statistics of a video
    Details { video_id: String },
    /// Duration of a video in seconds
    Duration { video_id: String },
    /// View count of a video
    Views { video_id: String },
    /// Like count of a video
    Likes { video_id: String },
    /// Channel id for a legacy username
    ChannelId { name: String },
    /// Channel id of the video behind a watch URL
    ChannelOf { url: String },
    /// Video id from a watch URL (no API call)
    VideoId { url: String },
}

#[derive(Args, Debug)]
struct PageArgs {
    /// Results per page
    #[arg(short, long)]
    limit: Option<u32>,
    /// Token of the page to fetch
    #[arg(short, long)]
    page_token: Option<String>,
    /// Print one line per result instead of JSON
    #[arg(long)]
    plain: bool,
}

impl PageArgs {
    fn options(&self) -> SearchOptions {
        SearchOptions {
            limit: self.limit,
            page_token: self.page_token.clone(),
            sort: None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();

    if let Command::VideoId { url } = &cli.command {
        return print_json(&id_by_url(url));
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(api_key) = cli.api_key {
        config.api_key = api_key;
    }

    if config.api_key.is_empty() {
        tracing::error!(
            "YouTube API key is required; set it in {} or pass --api-key",
            Config::default_config_path()?.display()
        );
        return Err(anyhow::anyhow!("API key not configured"));
    }

    let client = YouTubeClient::new(&config).context("Failed to create YouTube client")?;

    match cli.command {
        Command::Search { query, page, sort } => {
            let options = SearchOptions {
                sort: sort.map(|s| s.parse().unwrap_or(SortOrder::Relevance)),
                ..page.options()
            };
            let result = client
                .search(&query.join(" "), &options)
                .await
                .context("Video search failed")?;
            print_search(&result, page.plain)
        }
        Command::Channels { query, page } => {
            let result = client
                .search_channels(&query.join(" "), &page.options())
                .await
                .context("Channel search failed")?;
            print_search(&result, page.plain)
        }
        Command::Related { video_id, page } => {
            let result = client
                .related_videos(&video_id, &page.options())
                .await
                .context("Related video lookup failed")?;
            print_search(&result, page.plain)
        }
        Command::Details { video_id } => print_json(
            &client
                .content_details(&video_id)
                .await
                .context("Failed to fetch video details")?,
        ),
        Command::Duration { video_id } => print_json(&client.duration(&video_id).await?),
        Command::Views { video_id } => print_json(&client.views(&video_id).await?),
        Command::Likes { video_id } => print_json(&client.likes(&video_id).await?),
        Command::ChannelId { name } => print_json(&client.channel_id_by_name(&name).await?),
        Command::ChannelOf { url } => print_json(&client.channel_id_by_video_url(&url).await?),
        Command::VideoId { url } => print_json(&id_by_url(&url)),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn print_search(result: &SearchResult, plain: bool) -> anyhow::Result<()> {
    if !plain {
        return print_json(result);
    }

    for video in &result.videos {
        let date = video
            .published_date()
            .map(|d| d.format("%a. %d.%m.%Y").to_string())
            .unwrap_or_else(|| video.published.clone());
        println!(
            "{}  {}  [{}]  {} views  {}  {}",
            video.video_id,
            video.title,
            video.format_duration(),
            video.views,
            date,
            video.channel_title
        );
    }
    for channel in &result.channels {
        println!("{}  {}", channel.channel_id, channel.title);
    }
    if let Some(token) = &result.next_token {
        println!("next page: {token}");
    }
    Ok(())
}
