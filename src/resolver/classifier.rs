use super::model::{
    ChannelRef, Classification, ContentType, Identifier, Platform, Target, VideoType,
};
use lazy_static::lazy_static;
use regex::Regex;

/// Top-level Instagram paths that are never profile pages
const INSTAGRAM_RESERVED: &[&str] = &["p", "reel", "reels", "stories", "explore", "direct"];

lazy_static! {
    static ref YOUTUBE_SHORTS: Regex = Regex::new(
        r"(?i)^(?:https?://)?(?:(?:www|m|music)\.)?youtube\.com/shorts/[A-Za-z0-9_-]+"
    )
    .unwrap();
    static ref YOUTUBE_WATCH: Regex = Regex::new(
        r"(?i)^(?:https?://)?(?:(?:www|m|music)\.)?youtube\.com/watch(?:[/?#]|$)"
    )
    .unwrap();
    static ref YOUTUBE_SHORT_LINK: Regex =
        Regex::new(r"(?i)^(?:https?://)?(?:www\.)?youtu\.be/[A-Za-z0-9_-]+").unwrap();
    static ref YOUTUBE_CHANNEL: Regex = Regex::new(
        r"(?i)^(?:https?://)?(?:(?:www|m|music)\.)?youtube\.com/(?:@[^/?#\s]+|channel/[^/?#\s]+)"
    )
    .unwrap();
    static ref TIKTOK_VIDEO: Regex = Regex::new(
        r"(?i)^(?:https?://)?(?:(?:www|m)\.)?tiktok\.com/@[^/?#\s]+/video/\d+"
    )
    .unwrap();
    static ref TIKTOK_CHANNEL: Regex = Regex::new(
        r"(?i)^(?:https?://)?(?:(?:www|m)\.)?tiktok\.com/@[^/?#\s]+/?(?:[?#].*)?$"
    )
    .unwrap();
    static ref INSTAGRAM_REEL: Regex = Regex::new(
        r"(?i)^(?:https?://)?(?:(?:www|m)\.)?instagram\.com/reels?/[A-Za-z0-9_-]+"
    )
    .unwrap();
    static ref INSTAGRAM_POST: Regex = Regex::new(
        r"(?i)^(?:https?://)?(?:(?:www|m)\.)?instagram\.com/p/[A-Za-z0-9_-]+"
    )
    .unwrap();
    static ref INSTAGRAM_PROFILE: Regex = Regex::new(
        r"(?i)^(?:https?://)?(?:(?:www|m)\.)?instagram\.com/([A-Za-z0-9_.]+)/?(?:[?#].*)?$"
    )
    .unwrap();

    static ref YOUTUBE_WATCH_PARAM: Regex = Regex::new(r"[?&]v=([A-Za-z0-9_-]+)").unwrap();
    static ref YOUTUBE_SHORT_LINK_ID: Regex =
        Regex::new(r"(?i)youtu\.be/([A-Za-z0-9_-]+)").unwrap();
    static ref YOUTUBE_SHORTS_ID: Regex = Regex::new(r"/shorts/([A-Za-z0-9_-]+)").unwrap();
    static ref YOUTUBE_HANDLE: Regex = Regex::new(r"/@([^/?#\s]+)").unwrap();
    static ref YOUTUBE_CHANNEL_ID: Regex = Regex::new(r"/channel/([^/?#\s]+)").unwrap();
    static ref TIKTOK_HANDLE: Regex = Regex::new(r"(?i)tiktok\.com/@([^/?#\s]+)").unwrap();
}

/// Classify a URL by its shape. Never touches the network and never fails: anything
/// unrecognised is `other/unknown`.
pub fn classify(url: &str) -> Classification {
    let url = url.trim();

    // shorts before watch: a shorts URL also carries a video id
    if YOUTUBE_SHORTS.is_match(url) {
        return Classification::new(Platform::Youtube, ContentType::Video, Some(VideoType::Shorts));
    }
    if YOUTUBE_WATCH.is_match(url) || YOUTUBE_SHORT_LINK.is_match(url) {
        return Classification::new(Platform::Youtube, ContentType::Video, Some(VideoType::Long));
    }
    if YOUTUBE_CHANNEL.is_match(url) {
        return Classification::new(Platform::Youtube, ContentType::Channel, None);
    }

    if TIKTOK_VIDEO.is_match(url) {
        return Classification::new(Platform::Tiktok, ContentType::Video, Some(VideoType::Shorts));
    }
    if TIKTOK_CHANNEL.is_match(url) {
        return Classification::new(Platform::Tiktok, ContentType::Channel, None);
    }

    if INSTAGRAM_REEL.is_match(url) {
        return Classification::new(
            Platform::Instagram,
            ContentType::Video,
            Some(VideoType::Shorts),
        );
    }
    if INSTAGRAM_POST.is_match(url) {
        return Classification::new(Platform::Instagram, ContentType::Video, Some(VideoType::Long));
    }
    if instagram_profile(url).is_some() {
        return Classification::new(Platform::Instagram, ContentType::Channel, None);
    }

    Classification::unknown()
}

/// Video id from a watch param, a short link or a shorts path, in that order
pub fn youtube_video_id(url: &str) -> Option<String> {
    [&*YOUTUBE_WATCH_PARAM, &*YOUTUBE_SHORT_LINK_ID, &*YOUTUBE_SHORTS_ID]
        .iter()
        .find_map(|pattern| capture(pattern, url))
}

/// Channel reference, handle form preferred over id form
pub fn youtube_channel(url: &str) -> Option<ChannelRef> {
    if let Some(handle) = capture(&YOUTUBE_HANDLE, url) {
        return Some(ChannelRef::Handle(decode(&handle)));
    }
    capture(&YOUTUBE_CHANNEL_ID, url).map(ChannelRef::Id)
}

/// `@handle` when the URL names one
pub fn youtube_author(url: &str) -> Option<String> {
    capture(&YOUTUBE_HANDLE, url).map(|handle| format!("@{}", decode(&handle)))
}

pub fn tiktok_author(url: &str) -> Option<String> {
    capture(&TIKTOK_HANDLE, url).map(|handle| format!("@{}", decode(&handle)))
}

pub fn instagram_author(url: &str) -> Option<String> {
    instagram_profile(url.trim()).map(|name| format!("@{}", name))
}

/// Classify the URL and collect the identifier and author it carries
pub fn target(url: &str) -> Target {
    let url = url.trim();
    let classification = classify(url);

    let (identifier, author) = match (classification.platform, classification.content_type) {
        (Platform::Youtube, ContentType::Video) => {
            (youtube_video_id(url).map(Identifier::Video), youtube_author(url))
        }
        (Platform::Youtube, ContentType::Channel) => {
            (youtube_channel(url).map(Identifier::Channel), youtube_author(url))
        }
        (Platform::Tiktok, _) => {
            let author = tiktok_author(url);
            (author.clone().map(Identifier::Author), author)
        }
        (Platform::Instagram, _) => {
            let author = instagram_author(url);
            (author.clone().map(Identifier::Author), author)
        }
        _ => (None, None),
    };

    Target {
        url: url.to_string(),
        classification,
        identifier,
        author,
    }
}

fn instagram_profile(url: &str) -> Option<String> {
    let name = capture(&INSTAGRAM_PROFILE, url)?;
    if INSTAGRAM_RESERVED
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(&name))
    {
        return None;
    }
    Some(name)
}

fn capture(pattern: &Regex, url: &str) -> Option<String> {
    pattern
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(url: &str) -> (Platform, ContentType, Option<VideoType>) {
        let c = classify(url);
        (c.platform, c.content_type, c.video_type)
    }

    #[test]
    fn youtube_urls() {
        use ContentType::*;
        use Platform::Youtube;

        assert_eq!(
            triple("https://www.youtube.com/shorts/abc123"),
            (Youtube, Video, Some(VideoType::Shorts))
        );
        assert_eq!(
            triple("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            (Youtube, Video, Some(VideoType::Long))
        );
        assert_eq!(
            triple("https://youtu.be/dQw4w9WgXcQ?t=42"),
            (Youtube, Video, Some(VideoType::Long))
        );
        assert_eq!(
            triple("https://m.youtube.com/watch?v=dQw4w9WgXcQ"),
            (Youtube, Video, Some(VideoType::Long))
        );
        assert_eq!(triple("https://www.youtube.com/@someone"), (Youtube, Channel, None));
        assert_eq!(
            triple("https://www.youtube.com/channel/UC_x5XG1OV2P6uZZ5FSM9Ttw"),
            (Youtube, Channel, None)
        );
    }

    #[test]
    fn shorts_never_classify_as_long() {
        for url in [
            "https://www.youtube.com/shorts/abc123",
            "https://youtube.com/shorts/abc123?feature=share",
            "https://www.youtube.com/shorts/abc123?v=other",
            "youtube.com/shorts/abc123",
        ] {
            assert_eq!(classify(url).video_type, Some(VideoType::Shorts), "{url}");
        }
    }

    #[test]
    fn tiktok_urls() {
        assert_eq!(
            triple("https://www.tiktok.com/@someuser/video/7234567890123456789"),
            (Platform::Tiktok, ContentType::Video, Some(VideoType::Shorts))
        );
        assert_eq!(
            triple("https://www.tiktok.com/@someuser"),
            (Platform::Tiktok, ContentType::Channel, None)
        );
        assert_eq!(
            triple("https://www.tiktok.com/@someuser/?lang=ko"),
            (Platform::Tiktok, ContentType::Channel, None)
        );
        assert_eq!(classify("https://www.tiktok.com/explore"), Classification::unknown());
    }

    #[test]
    fn instagram_urls() {
        assert_eq!(
            triple("https://www.instagram.com/reel/C1a2B3c4D5e/"),
            (Platform::Instagram, ContentType::Video, Some(VideoType::Shorts))
        );
        assert_eq!(
            triple("https://www.instagram.com/p/C1a2B3c4D5e/"),
            (Platform::Instagram, ContentType::Video, Some(VideoType::Long))
        );
        assert_eq!(
            triple("https://www.instagram.com/someuser?igsh=xyz"),
            (Platform::Instagram, ContentType::Channel, None)
        );
        assert_eq!(
            triple("https://instagram.com/some.user_1/"),
            (Platform::Instagram, ContentType::Channel, None)
        );
    }

    #[test]
    fn instagram_reserved_paths_are_never_channels() {
        for url in [
            "https://www.instagram.com/p/abc/",
            "https://www.instagram.com/reel/abc/",
            "https://www.instagram.com/reels/abc/",
            "https://www.instagram.com/reels/",
            "https://www.instagram.com/stories/someuser/123/",
            "https://www.instagram.com/stories",
            "https://www.instagram.com/explore/",
            "https://www.instagram.com/explore/tags/rust/",
            "https://www.instagram.com/direct/inbox/",
            "https://www.instagram.com/direct",
        ] {
            assert_ne!(classify(url).content_type, ContentType::Channel, "{url}");
        }
    }

    #[test]
    fn unmatched_input_is_other_unknown() {
        for input in [
            "",
            "not a url",
            "https://example.com/watch?v=abc",
            "https://www.youtube.com/",
            "https://www.youtube.com/feed/subscriptions",
            "ftp://files.example.org/a.txt",
            "https://www.instagram.com/",
        ] {
            assert_eq!(classify(input), Classification::unknown(), "{input}");
        }
    }

    #[test]
    fn classification_is_stable() {
        let url = "https://www.instagram.com/someuser?igsh=xyz";
        assert_eq!(classify(url), classify(url));
    }

    #[test]
    fn video_id_extraction_order() {
        assert_eq!(
            youtube_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=1"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            youtube_video_id("https://www.youtube.com/watch?feature=x&v=abc_DEF-123"),
            Some("abc_DEF-123".to_string())
        );
        assert_eq!(
            youtube_video_id("https://youtu.be/xyz987?si=tracking"),
            Some("xyz987".to_string())
        );
        assert_eq!(
            youtube_video_id("https://www.youtube.com/shorts/abc123"),
            Some("abc123".to_string())
        );
        assert_eq!(youtube_video_id("https://www.youtube.com/watch"), None);
    }

    #[test]
    fn channel_extraction_prefers_handle() {
        assert_eq!(
            youtube_channel("https://www.youtube.com/@creator/videos"),
            Some(ChannelRef::Handle("creator".to_string()))
        );
        assert_eq!(
            youtube_channel("https://www.youtube.com/channel/UC123/@creator"),
            Some(ChannelRef::Handle("creator".to_string()))
        );
        assert_eq!(
            youtube_channel("https://www.youtube.com/channel/UC123"),
            Some(ChannelRef::Id("UC123".to_string()))
        );
        assert_eq!(
            youtube_channel("https://www.youtube.com/@%ED%95%9C%EA%B8%80"),
            Some(ChannelRef::Handle("한글".to_string()))
        );
    }

    #[test]
    fn author_handles() {
        assert_eq!(
            tiktok_author("https://www.tiktok.com/@someuser/video/1"),
            Some("@someuser".to_string())
        );
        assert_eq!(
            instagram_author("https://www.instagram.com/someuser?igsh=xyz"),
            Some("@someuser".to_string())
        );
        assert_eq!(instagram_author("https://www.instagram.com/p/abc/"), None);
        assert_eq!(youtube_author("https://www.youtube.com/watch?v=abc"), None);
    }

    #[test]
    fn target_carries_identifier() {
        let target = target("  https://www.youtube.com/shorts/abc123 ");
        assert_eq!(target.url, "https://www.youtube.com/shorts/abc123");
        assert_eq!(target.video_id(), Some("abc123"));

        let target = super::target("https://www.tiktok.com/@someuser");
        assert_eq!(target.identifier, Some(Identifier::Author("@someuser".to_string())));
        assert_eq!(target.author.as_deref(), Some("@someuser"));
    }
}
