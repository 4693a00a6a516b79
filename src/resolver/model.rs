use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform a URL belongs to
#[derive(Debug, Enum, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Tiktok,
    Instagram,
    Other,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Youtube => write!(f, "youtube"),
            Self::Tiktok => write!(f, "tiktok"),
            Self::Instagram => write!(f, "instagram"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Kind of resource behind a URL
#[derive(Debug, Enum, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Video,
    Channel,
    Unknown,
}

/// Short-form or long-form video
#[derive(Debug, Enum, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    Shorts,
    Long,
}

/// Result of classifying a URL by its shape alone
#[derive(Debug, Object, Clone, Copy, PartialEq, Eq, Serialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Platform the URL belongs to
    pub platform: Platform,
    /// Kind of resource
    #[oai(rename = "type")]
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Video subtype, null for anything that is not a video
    pub video_type: Option<VideoType>,
}

impl Classification {
    pub const fn new(
        platform: Platform,
        content_type: ContentType,
        video_type: Option<VideoType>,
    ) -> Self {
        Self {
            platform,
            content_type,
            video_type,
        }
    }

    pub const fn unknown() -> Self {
        Self::new(Platform::Other, ContentType::Unknown, None)
    }
}

/// How a channel is referenced in its URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    /// `@handle` form, stored without the leading `@`
    Handle(String),
    /// `/channel/<id>` form
    Id(String),
}

/// Platform-specific identifier pulled out of a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Video(String),
    Channel(ChannelRef),
    /// Author handle including the leading `@`
    Author(String),
}

/// Everything a strategy needs to know about the URL being resolved
#[derive(Debug, Clone)]
pub struct Target {
    pub url: String,
    pub classification: Classification,
    pub identifier: Option<Identifier>,
    /// Best author handle derivable from the URL (e.g. `@someuser`)
    pub author: Option<String>,
}

impl Target {
    pub fn video_id(&self) -> Option<&str> {
        match &self.identifier {
            Some(Identifier::Video(id)) => Some(id),
            _ => None,
        }
    }

    pub fn channel(&self) -> Option<&ChannelRef> {
        match &self.identifier {
            Some(Identifier::Channel(channel)) => Some(channel),
            _ => None,
        }
    }
}

/// Metadata produced by a single strategy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub thumbnail: String,
    pub description: String,
    pub author: Option<String>,
}

impl Metadata {
    /// A strategy result without a title is treated as no result at all
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty()
    }
}

/// Normalized metadata record returned to callers
#[derive(Debug, Object, Clone, PartialEq, Eq, Serialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct MetadataRecord {
    /// Platform the URL belongs to
    pub platform: Platform,
    /// Kind of resource
    #[oai(rename = "type")]
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Video subtype, null for channels and unknown pages
    pub video_type: Option<VideoType>,
    /// Display title
    pub title: String,
    /// Thumbnail URL, empty when none is known
    pub thumbnail: String,
    /// Display description with counts already formatted
    pub description: String,
    /// Author handle or name
    pub author: Option<String>,
    /// The URL that was resolved
    pub url: String,
}

impl MetadataRecord {
    pub fn new(target: &Target, metadata: Metadata) -> Self {
        Self {
            platform: target.classification.platform,
            content_type: target.classification.content_type,
            video_type: target.classification.video_type,
            title: metadata.title,
            thumbnail: metadata.thumbnail,
            description: metadata.description,
            author: metadata.author,
            url: target.url.clone(),
        }
    }
}

/// Resolve request body
#[derive(Debug, Object, Clone, Eq, PartialEq)]
pub struct ResolveRequest {
    #[oai(validator(min_length = 1, max_length = 2048))]
    /// URL of the video, clip or channel page to resolve
    pub url: String,
}
