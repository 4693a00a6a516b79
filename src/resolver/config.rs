use std::{env, time::Duration};

pub const DEFAULT_CRAWLER_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
pub const DEFAULT_PREVIEW_USER_AGENT: &str =
    "facebookexternalhit/1.1 (+http://www.facebook.com/externalhit_uatext.php)";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7";

/// Settings the resolution pipeline consumes but does not own
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// YouTube Data API key, the official API strategies fail fast without one
    pub youtube_api_key: Option<String>,
    /// Bound applied to every strategy attempt and every outbound call
    pub timeout: Duration,
    /// Redirect hops allowed when fetching pages
    pub max_redirects: usize,
    /// Proxy URL applied to all outbound calls
    pub proxy: Option<String>,
    /// User agent for YouTube page fetches
    pub crawler_user_agent: String,
    /// User agent for TikTok, Instagram and generic page fetches
    pub preview_user_agent: String,
    /// Accept-Language header sent with page fetches
    pub accept_language: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            timeout: Duration::from_secs(8),
            max_redirects: 5,
            proxy: None,
            crawler_user_agent: DEFAULT_CRAWLER_USER_AGENT.to_string(),
            preview_user_agent: DEFAULT_PREVIEW_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
        }
    }
}

impl ResolverConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let timeout = env::var("RESOLVER_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| secs.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        let max_redirects = env::var("RESOLVER_MAX_REDIRECTS")
            .ok()
            .and_then(|hops| hops.parse::<usize>().ok())
            .unwrap_or(defaults.max_redirects);

        Self {
            youtube_api_key: non_empty_var("YOUTUBE_API_KEY"),
            timeout,
            max_redirects,
            proxy: non_empty_var("RESOLVER_PROXY"),
            crawler_user_agent: non_empty_var("CRAWLER_USER_AGENT")
                .unwrap_or(defaults.crawler_user_agent),
            preview_user_agent: non_empty_var("PREVIEW_USER_AGENT")
                .unwrap_or(defaults.preview_user_agent),
            accept_language: non_empty_var("ACCEPT_LANGUAGE").unwrap_or(defaults.accept_language),
        }
    }

    pub fn with_youtube_api_key(mut self, key: Option<String>) -> Self {
        self.youtube_api_key = key.filter(|key| !key.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
