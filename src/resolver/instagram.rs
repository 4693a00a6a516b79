use super::format::clean_title;
use super::model::{Metadata, Platform, Target};
use super::scrape::{absolutize, Fetcher, PreviewTags};
use super::strategy::Strategy;
use async_trait::async_trait;
use std::sync::Arc;

pub fn fallback(target: &Target) -> Metadata {
    Metadata {
        title: target
            .author
            .clone()
            .unwrap_or_else(|| "Instagram".to_string()),
        author: target.author.clone(),
        ..Default::default()
    }
}

/// Page scrape for posts, reels and profiles
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
        "instagram_page"
    }

    async fn attempt(&self, target: &Target) -> Result<Option<Metadata>, anyhow::Error> {
        let tags = self
            .fetcher
            .preview(&target.url, &self.fetcher.config().preview_user_agent)
            .await?;
        Ok(page_metadata(target, &tags))
    }
}

// Instagram fills either the og: or the twitter: family, rarely both
fn page_metadata(target: &Target, tags: &PreviewTags) -> Option<Metadata> {
    let title = clean_title(tags.any_title()?, Platform::Instagram);

    Some(Metadata {
        title,
        thumbnail: tags
            .any_image()
            .map(|image| absolutize(&target.url, image))
            .unwrap_or_default(),
        description: tags.any_description().unwrap_or_default().to_string(),
        author: target.author.clone(),
    })
}
