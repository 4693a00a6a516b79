use super::model::{Metadata, Target};
use super::scrape::{absolutize, Fetcher, PreviewTags};
use super::strategy::Strategy;
use async_trait::async_trait;
use std::sync::Arc;

pub fn fallback(_target: &Target) -> Metadata {
    Metadata {
        title: "Untitled".to_string(),
        ..Default::default()
    }
}

/// Preview tags of any page, then its `<title>`
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
        "generic_page"
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
    let title = tags.any_title().or(tags.page_title())?.trim().to_string();

    Some(Metadata {
        title,
        thumbnail: tags
            .any_image()
            .map(|image| absolutize(&target.url, image))
            .unwrap_or_default(),
        description: tags.any_description().unwrap_or_default().to_string(),
        author: tags.author().map(str::to_string),
    })
}
