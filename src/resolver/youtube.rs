use super::format::{clean_title, join_counts, subscriber_summary};
use super::model::{ChannelRef, Metadata, Platform, Target};
use super::scrape::{absolutize, Fetcher, PreviewTags};
use super::strategy::Strategy;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Thumbnail derived from the video id, no request needed
pub fn video_thumbnail(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/hqdefault.jpg", video_id)
}

pub fn video_fallback(target: &Target) -> Metadata {
    Metadata {
        title: "YouTube Video".to_string(),
        thumbnail: target.video_id().map(video_thumbnail).unwrap_or_default(),
        description: String::new(),
        author: target.author.clone(),
    }
}

pub fn channel_fallback(target: &Target) -> Metadata {
    Metadata {
        title: "YouTube Channel".to_string(),
        author: target.author.clone(),
        ..Default::default()
    }
}

#[derive(Debug, Deserialize)]
struct ApiList<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: VideoStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    channel_title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    snippet: ChannelSnippet,
    #[serde(default)]
    statistics: ChannelStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelSnippet {
    title: String,
    custom_url: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatistics {
    subscriber_count: Option<String>,
    video_count: Option<String>,
    #[serde(default)]
    hidden_subscriber_count: bool,
}

fn video_metadata(video_id: &str, item: VideoItem) -> Metadata {
    let stats = &item.statistics;
    Metadata {
        title: item.snippet.title,
        thumbnail: video_thumbnail(video_id),
        description: join_counts(&[
            ("조회수", stats.view_count.as_deref(), ""),
            ("좋아요", stats.like_count.as_deref(), "개"),
            ("댓글", stats.comment_count.as_deref(), "개"),
        ]),
        author: item.snippet.channel_title,
    }
}

fn channel_metadata(channel: &ChannelRef, item: ChannelItem) -> Metadata {
    let stats = &item.statistics;
    let subscribers = if stats.hidden_subscriber_count {
        None
    } else {
        stats.subscriber_count.as_deref()
    };

    let thumbnails = &item.snippet.thumbnails;
    let thumbnail = [&thumbnails.high, &thumbnails.medium, &thumbnails.default]
        .into_iter()
        .find_map(|thumb| thumb.as_ref().map(|thumb| thumb.url.clone()))
        .unwrap_or_default();

    let author = match channel {
        ChannelRef::Handle(handle) => Some(format!("@{}", handle)),
        ChannelRef::Id(_) => item.snippet.custom_url.clone(),
    };

    Metadata {
        title: item.snippet.title,
        thumbnail,
        description: join_counts(&[
            ("구독자", subscribers, "명"),
            ("동영상", stats.video_count.as_deref(), "개"),
        ]),
        author,
    }
}

/// Official Data API lookup by video id
pub struct VideoApi {
    fetcher: Arc<Fetcher>,
}

impl VideoApi {
    pub fn new(fetcher: Arc<Fetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl Strategy for VideoApi {
    fn name(&self) -> &'static str {
        "youtube_video_api"
    }

    async fn attempt(&self, target: &Target) -> Result<Option<Metadata>, anyhow::Error> {
        let key = api_key(&self.fetcher)?;
        let video_id = target.video_id().context("No video id in URL")?;

        let url = format!("{}/videos", API_BASE);
        let list: ApiList<VideoItem> = self
            .fetcher
            .json(
                &url,
                &[("part", "snippet,statistics"), ("id", video_id), ("key", key)],
            )
            .await?;

        Ok(list
            .items
            .into_iter()
            .next()
            .map(|item| video_metadata(video_id, item)))
    }
}

/// Watch page scrape with a crawler user agent
pub struct VideoPage {
    fetcher: Arc<Fetcher>,
}

impl VideoPage {
    pub fn new(fetcher: Arc<Fetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl Strategy for VideoPage {
    fn name(&self) -> &'static str {
        "youtube_video_page"
    }

    async fn attempt(&self, target: &Target) -> Result<Option<Metadata>, anyhow::Error> {
        let video_id = target.video_id().context("No video id in URL")?;
        let page_url = format!("https://www.youtube.com/watch?v={}", video_id);

        let tags = self
            .fetcher
            .preview(&page_url, &self.fetcher.config().crawler_user_agent)
            .await?;
        Ok(video_page_metadata(video_id, target, &tags))
    }
}

fn video_page_metadata(video_id: &str, target: &Target, tags: &PreviewTags) -> Option<Metadata> {
    let title = page_title(tags)?;

    Some(Metadata {
        title,
        thumbnail: tags
            .og_image()
            .map(|image| absolutize("https://www.youtube.com/", image))
            .unwrap_or_else(|| video_thumbnail(video_id)),
        description: tags.og_description().unwrap_or_default().to_string(),
        author: tags
            .author()
            .map(str::to_string)
            .or_else(|| target.author.clone()),
    })
}

/// Official Data API lookup by handle or channel id
pub struct ChannelApi {
    fetcher: Arc<Fetcher>,
}

impl ChannelApi {
    pub fn new(fetcher: Arc<Fetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl Strategy for ChannelApi {
    fn name(&self) -> &'static str {
        "youtube_channel_api"
    }

    async fn attempt(&self, target: &Target) -> Result<Option<Metadata>, anyhow::Error> {
        let key = api_key(&self.fetcher)?;
        let channel = target.channel().context("No channel reference in URL")?;

        let lookup = match channel {
            ChannelRef::Handle(handle) => ("forHandle", format!("@{}", handle)),
            ChannelRef::Id(id) => ("id", id.clone()),
        };
        let url = format!("{}/channels", API_BASE);
        let list: ApiList<ChannelItem> = self
            .fetcher
            .json(
                &url,
                &[
                    ("part", "snippet,statistics"),
                    (lookup.0, lookup.1.as_str()),
                    ("key", key),
                ],
            )
            .await?;

        Ok(list
            .items
            .into_iter()
            .next()
            .map(|item| channel_metadata(channel, item)))
    }
}

/// Channel page scrape with a crawler user agent
pub struct ChannelPage {
    fetcher: Arc<Fetcher>,
}

impl ChannelPage {
    pub fn new(fetcher: Arc<Fetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl Strategy for ChannelPage {
    fn name(&self) -> &'static str {
        "youtube_channel_page"
    }

    async fn attempt(&self, target: &Target) -> Result<Option<Metadata>, anyhow::Error> {
        let tags = self
            .fetcher
            .preview(&target.url, &self.fetcher.config().crawler_user_agent)
            .await?;
        Ok(channel_page_metadata(target, &tags))
    }
}

fn channel_page_metadata(target: &Target, tags: &PreviewTags) -> Option<Metadata> {
    let title = page_title(tags)?;
    let description = tags.og_description().unwrap_or_default();

    Some(Metadata {
        title,
        thumbnail: tags
            .og_image()
            .map(|image| absolutize(&target.url, image))
            .unwrap_or_default(),
        description: subscriber_summary(description).unwrap_or_else(|| description.to_string()),
        author: target
            .author
            .clone()
            .or_else(|| tags.author().map(str::to_string)),
    })
}

/// `og:title`, else the `<title>` text without its site suffix
fn page_title(tags: &PreviewTags) -> Option<String> {
    let title = match tags.og_title() {
        Some(title) => title.trim().to_string(),
        None => clean_title(tags.page_title()?, Platform::Youtube),
    };

    // unavailable videos come back titled with the bare site name
    let bare = title.trim_start_matches(|c: char| c == '-' || c.is_whitespace());
    if bare.is_empty() || bare.eq_ignore_ascii_case("YouTube") {
        return None;
    }
    Some(title)
}

fn api_key(fetcher: &Fetcher) -> Result<&str, anyhow::Error> {
    fetcher
        .config()
        .youtube_api_key
        .as_deref()
        .ok_or_else(|| anyhow!("YouTube API key is not configured"))
}
