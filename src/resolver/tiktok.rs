use super::format::{clean_title, follower_summary};
use super::model::{ContentType, Metadata, Platform, Target};
use super::scrape::{absolutize, Fetcher, PreviewTags};
use super::strategy::Strategy;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

const OEMBED_ENDPOINT: &str = "https://www.tiktok.com/oembed";

pub fn video_fallback(target: &Target) -> Metadata {
    Metadata {
        title: "TikTok Video".to_string(),
        author: target.author.clone(),
        ..Default::default()
    }
}

pub fn channel_fallback(target: &Target) -> Metadata {
    Metadata {
        title: target
            .author
            .clone()
            .unwrap_or_else(|| "TikTok Channel".to_string()),
        author: target.author.clone(),
        ..Default::default()
    }
}

/// Page scrape with a link-preview bot user agent. TikTok only serves preview tags to
/// such agents, and the like/comment counts only exist in the tag description.
pub struct Page {
    fetcher: Arc<Fetcher>,
}

impl Page {
    pub fn new(fetcher: Arc<Fetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl Strategy for Page {
    fn name(&self) -> &'static str {
        "tiktok_page"
    }

    async fn attempt(&self, target: &Target) -> Result<Option<Metadata>, anyhow::Error> {
        let tags = self
            .fetcher
            .preview(&target.url, &self.fetcher.config().preview_user_agent)
            .await?;
        Ok(page_metadata(target, &tags))
    }
}

fn page_metadata(target: &Target, tags: &PreviewTags) -> Option<Metadata> {
    let title = clean_title(tags.og_title()?, Platform::Tiktok);
    let description = tags.og_description().unwrap_or_default();

    let description = match target.classification.content_type {
        ContentType::Channel => {
            follower_summary(description).unwrap_or_else(|| description.to_string())
        }
        _ => description.to_string(),
    };

    Some(Metadata {
        title,
        thumbnail: tags
            .og_image()
            .map(|image| absolutize(&target.url, image))
            .unwrap_or_default(),
        description,
        author: target.author.clone(),
    })
}

#[derive(Debug, Deserialize)]
struct OEmbed {
    title: Option<String>,
    author_name: Option<String>,
    author_unique_id: Option<String>,
    thumbnail_url: Option<String>,
}

/// oEmbed lookup by URL
pub struct Embed {
    fetcher: Arc<Fetcher>,
}

impl Embed {
    pub fn new(fetcher: Arc<Fetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl Strategy for Embed {
    fn name(&self) -> &'static str {
        "tiktok_oembed"
    }

    async fn attempt(&self, target: &Target) -> Result<Option<Metadata>, anyhow::Error> {
        let embed: OEmbed = self
            .fetcher
            .json(OEMBED_ENDPOINT, &[("url", target.url.as_str())])
            .await?;
        Ok(embed_metadata(target, embed))
    }
}

fn embed_metadata(target: &Target, embed: OEmbed) -> Option<Metadata> {
    let author_name = embed
        .author_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    // captions can be empty, the author name still makes a usable title
    let title = embed
        .title
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
        .or_else(|| author_name.clone())?;

    Some(Metadata {
        title,
        thumbnail: embed.thumbnail_url.unwrap_or_default(),
        description: author_name
            .map(|name| format!("작성자: {}", name))
            .unwrap_or_default(),
        author: embed
            .author_unique_id
            .filter(|id| !id.is_empty())
            .map(|id| format!("@{}", id))
            .or_else(|| target.author.clone()),
    })
}
