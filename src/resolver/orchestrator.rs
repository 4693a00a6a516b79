use super::classifier;
use super::config::ResolverConfig;
use super::model::{ContentType, Metadata, MetadataRecord, Platform, Target};
use super::scrape::Fetcher;
use super::strategy::{run_cascade, Cascade, Strategy};
use super::{generic, instagram, tiktok, youtube};
use anyhow::{bail, Context};
use std::{sync::Arc, time::Duration};
use tracing::info;
use url::Url;

/// Which cascade and which minimal fallback serve a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    YoutubeVideo,
    YoutubeChannel,
    TiktokVideo,
    TiktokChannel,
    Instagram,
    Generic,
}

impl Route {
    /// Total over every classification. YouTube targets without a usable identifier take
    /// the generic route.
    pub fn for_target(target: &Target) -> Self {
        let c = &target.classification;
        match (c.platform, c.content_type) {
            (Platform::Youtube, ContentType::Video) if target.video_id().is_some() => {
                Self::YoutubeVideo
            }
            (Platform::Youtube, ContentType::Channel) if target.channel().is_some() => {
                Self::YoutubeChannel
            }
            (Platform::Tiktok, ContentType::Video) => Self::TiktokVideo,
            (Platform::Tiktok, ContentType::Channel) => Self::TiktokChannel,
            (Platform::Instagram, ContentType::Video | ContentType::Channel) => Self::Instagram,
            _ => Self::Generic,
        }
    }

    fn fallback(self, target: &Target) -> Metadata {
        match self {
            Self::YoutubeVideo => youtube::video_fallback(target),
            Self::YoutubeChannel => youtube::channel_fallback(target),
            Self::TiktokVideo => tiktok::video_fallback(target),
            Self::TiktokChannel => tiktok::channel_fallback(target),
            Self::Instagram => instagram::fallback(target),
            Self::Generic => generic::fallback(target),
        }
    }
}

/// Strategy lists, one per route, in order of preference
pub struct Cascades {
    pub youtube_video: Cascade,
    pub youtube_channel: Cascade,
    pub tiktok_video: Cascade,
    pub tiktok_channel: Cascade,
    pub instagram: Cascade,
    pub generic: Cascade,
}

impl Cascades {
    pub fn standard(fetcher: Arc<Fetcher>) -> Self {
        Self {
            youtube_video: vec![
                boxed(youtube::VideoApi::new(fetcher.clone())),
                boxed(youtube::VideoPage::new(fetcher.clone())),
            ],
            youtube_channel: vec![
                boxed(youtube::ChannelApi::new(fetcher.clone())),
                boxed(youtube::ChannelPage::new(fetcher.clone())),
            ],
            tiktok_video: vec![
                boxed(tiktok::Page::new(fetcher.clone())),
                boxed(tiktok::Embed::new(fetcher.clone())),
            ],
            tiktok_channel: vec![boxed(tiktok::Page::new(fetcher.clone()))],
            instagram: vec![boxed(instagram::Page::new(fetcher.clone()))],
            generic: vec![boxed(generic::Page::new(fetcher))],
        }
    }

    fn for_route(&self, route: Route) -> &[Box<dyn Strategy>] {
        match route {
            Route::YoutubeVideo => &self.youtube_video,
            Route::YoutubeChannel => &self.youtube_channel,
            Route::TiktokVideo => &self.tiktok_video,
            Route::TiktokChannel => &self.tiktok_channel,
            Route::Instagram => &self.instagram,
            Route::Generic => &self.generic,
        }
    }
}

fn boxed<S: Strategy + 'static>(strategy: S) -> Box<dyn Strategy> {
    Box::new(strategy)
}

/// Longest URL accepted from callers
pub const MAX_URL_LENGTH: usize = 2048;

pub struct Resolver {
    cascades: Cascades,
    timeout: Duration,
    official_api: bool,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Result<Self, anyhow::Error> {
        let timeout = config.timeout;
        let official_api = config.youtube_api_key.is_some();
        let fetcher = Arc::new(Fetcher::new(config)?);

        Ok(Self::with_cascades(Cascades::standard(fetcher), timeout, official_api))
    }

    pub fn with_cascades(cascades: Cascades, timeout: Duration, official_api: bool) -> Self {
        Self {
            cascades,
            timeout,
            official_api,
        }
    }

    /// Whether the official YouTube API strategies have a key to work with
    pub fn official_api_enabled(&self) -> bool {
        self.official_api
    }

    /// Validate caller input. This is the only failure surfaced to callers.
    pub fn parse_input(raw: &str) -> Result<Url, anyhow::Error> {
        let raw = raw.trim();
        if raw.is_empty() {
            bail!("URL is required");
        }
        if raw.chars().count() > MAX_URL_LENGTH {
            bail!("URL is longer than {} characters", MAX_URL_LENGTH);
        }

        let url = Url::parse(raw).with_context(|| format!("Invalid URL: {}", raw))?;
        match url.scheme() {
            "http" | "https" => {}
            scheme => bail!("Unsupported URL scheme: {}", scheme),
        }
        if url.host_str().map_or(true, str::is_empty) {
            bail!("URL has no host: {}", raw);
        }

        Ok(url)
    }

    /// Validate, classify and resolve a URL
    pub async fn resolve(&self, raw: &str) -> Result<MetadataRecord, anyhow::Error> {
        Self::parse_input(raw)?;
        let target = classifier::target(raw);
        Ok(self.resolve_target(&target).await)
    }

    /// Run the cascade for a classified target. Always produces a record.
    pub async fn resolve_target(&self, target: &Target) -> MetadataRecord {
        let route = Route::for_target(target);
        let strategies = self.cascades.for_route(route);

        let metadata = match run_cascade(strategies, target, self.timeout).await {
            Some(metadata) => metadata,
            None => {
                info!(
                    url = %target.url,
                    platform = %target.classification.platform,
                    route = ?route,
                    "All strategies failed, using minimal fallback"
                );
                route.fallback(target)
            }
        };

        MetadataRecord::new(target, metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::model::VideoType;
    use crate::resolver::strategy::tests::{Behaviour, Stub};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn failing_cascades(calls: &Arc<AtomicUsize>) -> Cascades {
        Cascades {
            youtube_video: vec![
                Stub::boxed(Behaviour::Fail, calls),
                Stub::boxed(Behaviour::Hang, calls),
            ],
            youtube_channel: vec![Stub::boxed(Behaviour::Fail, calls)],
            tiktok_video: vec![Stub::boxed(Behaviour::Empty, calls)],
            tiktok_channel: vec![Stub::boxed(Behaviour::Fail, calls)],
            instagram: vec![Stub::boxed(Behaviour::Fail, calls)],
            generic: vec![Stub::boxed(Behaviour::Fail, calls)],
        }
    }

    fn failing_resolver(calls: &Arc<AtomicUsize>) -> Resolver {
        Resolver::with_cascades(failing_cascades(calls), Duration::from_millis(50), false)
    }

    #[test]
    fn every_classification_has_a_route() {
        let cases = [
            ("https://www.youtube.com/shorts/abc123", Route::YoutubeVideo),
            ("https://youtu.be/abc123", Route::YoutubeVideo),
            ("https://www.youtube.com/watch", Route::Generic),
            ("https://www.youtube.com/@creator", Route::YoutubeChannel),
            ("https://www.tiktok.com/@someuser/video/1", Route::TiktokVideo),
            ("https://www.tiktok.com/@someuser", Route::TiktokChannel),
            ("https://www.instagram.com/p/abc/", Route::Instagram),
            ("https://www.instagram.com/someuser", Route::Instagram),
            ("https://example.com/", Route::Generic),
        ];
        for (url, route) in cases {
            assert_eq!(Route::for_target(&classifier::target(url)), route, "{url}");
        }
    }

    #[test]
    fn rejects_non_urls() {
        assert!(Resolver::parse_input("").is_err());
        assert!(Resolver::parse_input("   ").is_err());
        assert!(Resolver::parse_input("not a url").is_err());
        assert!(Resolver::parse_input("www.youtube.com/watch?v=abc").is_err());
        assert!(Resolver::parse_input("javascript:alert(1)").is_err());
        assert!(Resolver::parse_input("ftp://example.com/file").is_err());
        assert!(Resolver::parse_input(" https://www.youtube.com/watch?v=abc ").is_ok());
    }

    #[test]
    fn overlong_urls_are_rejected() {
        let path = "a".repeat(MAX_URL_LENGTH);
        assert!(Resolver::parse_input(&format!("https://example.com/{}", path)).is_err());

        let fits = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH - 20));
        assert!(Resolver::parse_input(&fits).is_ok());
    }

    #[test]
    fn standard_cascades_prefer_official_sources() {
        let fetcher = Arc::new(Fetcher::new(ResolverConfig::default()).unwrap());
        let cascades = Cascades::standard(fetcher);
        let names = |route| {
            cascades
                .for_route(route)
                .iter()
                .map(|strategy| strategy.name())
                .collect::<Vec<_>>()
        };

        assert_eq!(
            names(Route::YoutubeVideo),
            ["youtube_video_api", "youtube_video_page"]
        );
        assert_eq!(
            names(Route::YoutubeChannel),
            ["youtube_channel_api", "youtube_channel_page"]
        );
        assert_eq!(names(Route::TiktokVideo), ["tiktok_page", "tiktok_oembed"]);
        assert_eq!(names(Route::TiktokChannel), ["tiktok_page"]);
        assert_eq!(names(Route::Instagram), ["instagram_page"]);
        assert_eq!(names(Route::Generic), ["generic_page"]);
    }

    #[tokio::test]
    async fn exhausted_youtube_video_falls_back_to_id_thumbnail() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = failing_resolver(&calls);

        let record = resolver
            .resolve("https://www.youtube.com/shorts/abc123")
            .await
            .unwrap();

        assert_eq!(record.platform, Platform::Youtube);
        assert_eq!(record.content_type, ContentType::Video);
        assert_eq!(record.video_type, Some(VideoType::Shorts));
        assert_eq!(record.title, "YouTube Video");
        assert_eq!(record.thumbnail, "https://img.youtube.com/vi/abc123/hqdefault.jpg");
        assert_eq!(record.url, "https://www.youtube.com/shorts/abc123");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn exhausted_tiktok_channel_uses_handle() {
        let calls = Arc::new(AtomicUsize::new(0));
        let record = failing_resolver(&calls)
            .resolve("https://www.tiktok.com/@someuser")
            .await
            .unwrap();

        assert_eq!(record.platform, Platform::Tiktok);
        assert_eq!(record.content_type, ContentType::Channel);
        assert_eq!(record.video_type, None);
        assert_eq!(record.title, "@someuser");
        assert_eq!(record.author.as_deref(), Some("@someuser"));
    }

    #[tokio::test]
    async fn exhausted_generic_page_is_untitled() {
        let calls = Arc::new(AtomicUsize::new(0));
        let record = failing_resolver(&calls)
            .resolve("https://example.com/article")
            .await
            .unwrap();

        assert_eq!(record.platform, Platform::Other);
        assert_eq!(record.content_type, ContentType::Unknown);
        assert_eq!(record.title, "Untitled");
        assert_eq!(record.thumbnail, "");
        assert_eq!(record.description, "");
        assert_eq!(record.author, None);
    }

    #[tokio::test]
    async fn successful_strategy_result_is_used() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut cascades = failing_cascades(&calls);
        cascades.instagram = vec![
            Stub::boxed(Behaviour::Fail, &calls),
            Stub::boxed(Behaviour::Succeed("Reel title"), &calls),
        ];
        let resolver = Resolver::with_cascades(cascades, Duration::from_millis(50), false);

        let record = resolver
            .resolve("https://www.instagram.com/reel/abc/")
            .await
            .unwrap();
        assert_eq!(record.title, "Reel title");
        assert_eq!(record.video_type, Some(VideoType::Shorts));
    }

    #[tokio::test]
    async fn invalid_input_is_the_only_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = failing_resolver(&calls);

        assert!(resolver.resolve("definitely not a url").await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_api_key_still_yields_a_video_record() {
        // every outbound call goes to a closed local port
        let config = ResolverConfig::default()
            .with_proxy(Some("http://127.0.0.1:1".to_string()))
            .with_timeout(Duration::from_secs(2));
        let resolver = Resolver::new(config).unwrap();
        assert!(!resolver.official_api_enabled());

        let record = resolver
            .resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap();

        assert_eq!(record.video_type, Some(VideoType::Long));
        assert_eq!(record.title, "YouTube Video");
        assert_eq!(
            record.thumbnail,
            "https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
        );
    }
}
