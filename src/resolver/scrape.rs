use super::config::ResolverConfig;
use anyhow::{bail, Context};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT},
    redirect, Client, Proxy,
};
use scraper::{Html, Selector};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Upper bound on the bytes read from any page
pub const PAGE_LIMIT: usize = 2 * 1024 * 1024;

/// Shared outbound HTTP access. Every call is bounded by the configured timeout.
pub struct Fetcher {
    client: Client,
    config: ResolverConfig,
}

impl Fetcher {
    pub fn new(config: ResolverConfig) -> Result<Self, anyhow::Error> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .redirect(redirect::Policy::limited(config.max_redirects));

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(Proxy::all(proxy).context("Invalid proxy URL")?);
        }

        let client = builder.build().context("Failed to build reqwest client")?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Fetch an HTML page with the given user agent and extract its preview tags
    pub async fn preview(
        &self,
        url: &str,
        user_agent: &str,
    ) -> Result<PreviewTags, anyhow::Error> {
        let html = self.page(url, user_agent).await?;
        tokio::task::spawn_blocking(move || PreviewTags::parse(&html))
            .await
            .context("Page parser panicked")
    }

    /// Fetch at most `PAGE_LIMIT` bytes of an HTML page
    pub async fn page(&self, url: &str, user_agent: &str) -> Result<String, anyhow::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).context("Invalid user agent")?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&self.config.accept_language)
                .context("Invalid Accept-Language value")?,
        );

        let mut response = self
            .client
            .get(url)
            .headers(headers)
            .timeout(self.config.timeout)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("{} returned {}", url, status);
        }
        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or_default();
            if !is_html(content_type) {
                bail!("{} is not an HTML page ({})", url, content_type);
            }
        }
        debug!(url = %url, final_url = %response.url(), "Fetched page");

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.context("Failed to read page body")? {
            let room = PAGE_LIMIT - body.len();
            body.extend_from_slice(&chunk[..chunk.len().min(room)]);
            if body.len() >= PAGE_LIMIT {
                debug!(url = %url, limit = PAGE_LIMIT, "Page body truncated");
                break;
            }
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// GET a JSON document. Query values stay out of returned errors.
    pub async fn json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, anyhow::Error> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header(ACCEPT, "application/json")
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("{} returned {}: {}", url, status, truncate(&body, 200));
        }

        response
            .json::<T>()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to parse JSON response")
    }
}

fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// Open Graph, Twitter card and plain `<title>` values of a page
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PreviewTags {
    tags: HashMap<String, String>,
    title: Option<String>,
    author: Option<String>,
}

impl PreviewTags {
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let mut tags = HashMap::new();

        if let Ok(selector) = Selector::parse("meta[content]") {
            for element in document.select(&selector) {
                let value = element.value();
                let key = value.attr("property").or_else(|| value.attr("name"));
                let (Some(key), Some(content)) = (key, value.attr("content")) else {
                    continue;
                };
                let content = content.trim();
                if content.is_empty() {
                    continue;
                }
                // first occurrence wins, pages repeat og:image for alternate sizes
                tags.entry(key.to_ascii_lowercase())
                    .or_insert_with(|| content.to_string());
            }
        }

        let title = Selector::parse("title").ok().and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|element| element.text().collect::<String>().trim().to_string())
                .filter(|title| !title.is_empty())
        });

        let author = Selector::parse(r#"link[itemprop="name"][content]"#)
            .ok()
            .and_then(|selector| {
                document
                    .select(&selector)
                    .next()
                    .and_then(|element| element.value().attr("content"))
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
            });

        Self { tags, title, author }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// First present value among the given keys
    pub fn first(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    pub fn og_title(&self) -> Option<&str> {
        self.get("og:title")
    }

    pub fn og_description(&self) -> Option<&str> {
        self.get("og:description")
    }

    pub fn og_image(&self) -> Option<&str> {
        self.get("og:image")
    }

    /// Title from the Open Graph family, then the Twitter family
    pub fn any_title(&self) -> Option<&str> {
        self.first(&["og:title", "twitter:title"])
    }

    pub fn any_description(&self) -> Option<&str> {
        self.first(&["og:description", "twitter:description", "description"])
    }

    pub fn any_image(&self) -> Option<&str> {
        self.first(&["og:image", "og:image:url", "twitter:image", "twitter:image:src"])
    }

    /// Text of the page `<title>` element
    pub fn page_title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Author from `<meta name="author">` or a microdata channel name
    pub fn author(&self) -> Option<&str> {
        self.get("author").or(self.author.as_deref())
    }
}

/// Resolve a possibly relative image URL against the page it came from
pub fn absolutize(base: &str, src: &str) -> String {
    match Url::parse(base).and_then(|base| base.join(src.trim())) {
        Ok(url) => url.to_string(),
        Err(_) => src.trim().to_string(),
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
