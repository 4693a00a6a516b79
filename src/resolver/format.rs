use super::model::Platform;
use lazy_static::lazy_static;
use regex::Regex;

pub const SEPARATOR: &str = " · ";

lazy_static! {
    static ref YOUTUBE_SUFFIX: Regex = Regex::new(r"\s*-\s*YouTube\s*$").unwrap();
    static ref TIKTOK_PREFIX: Regex = Regex::new(r"^\s*TikTok\s*[·|\-]\s*").unwrap();
    static ref INSTAGRAM_PREFIX: Regex = Regex::new(r"^(?:.*?\s)?on Instagram:\s*").unwrap();
    // native and English phrasing, either may appear depending on the page locale
    static ref SUBSCRIBERS: Regex = Regex::new(
        r"(?i)구독자\s*([0-9][0-9.,]*\s*[KMB만억천]?)\s*명|([0-9][0-9.,]*\s*[KMB]?)\s*subscribers?"
    )
    .unwrap();
    static ref FOLLOWERS: Regex =
        Regex::new(r"(?i)([0-9][0-9.,]*\s*[KMB만억천]?)\s*(?:followers?|팔로워)").unwrap();
}

/// Abbreviate a raw count. `None` for missing, zero or non-numeric input.
pub fn format_count(raw: &str) -> Option<String> {
    let count: u64 = raw.trim().parse().ok()?;
    if count == 0 {
        return None;
    }

    // largest unit first
    let formatted = if count >= 100_000_000 {
        format!("{:.1}억", count as f64 / 100_000_000.0)
    } else if count >= 10_000 {
        format!("{:.1}만", count as f64 / 10_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    };

    Some(formatted)
}

/// `label value suffix` for every present count, joined with a middle dot
pub fn join_counts(parts: &[(&str, Option<&str>, &str)]) -> String {
    parts
        .iter()
        .filter_map(|(label, raw, suffix)| {
            let value = format_count((*raw)?)?;
            Some(format!("{} {}{}", label, value, suffix))
        })
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Strip the boilerplate each platform wraps around titles
pub fn clean_title(title: &str, platform: Platform) -> String {
    let pattern: &Regex = match platform {
        Platform::Youtube => &*YOUTUBE_SUFFIX,
        Platform::Tiktok => &*TIKTOK_PREFIX,
        Platform::Instagram => &*INSTAGRAM_PREFIX,
        Platform::Other => return title.trim().to_string(),
    };

    let cleaned = pattern.replace(title, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return title.trim().to_string();
    }
    cleaned.to_string()
}

/// Rewrite a description carrying a subscriber count to `구독자 N명`
pub fn subscriber_summary(description: &str) -> Option<String> {
    let captures = SUBSCRIBERS.captures(description)?;
    let count = captures.get(1).or_else(|| captures.get(2))?;
    Some(format!("구독자 {}명", count.as_str().trim()))
}

/// Rewrite a description carrying a follower count to `팔로워 N명`
pub fn follower_summary(description: &str) -> Option<String> {
    let captures = FOLLOWERS.captures(description)?;
    Some(format!("팔로워 {}명", captures.get(1)?.as_str().trim()))
}
