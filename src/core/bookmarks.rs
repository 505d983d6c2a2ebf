//! Netscape bookmark file export for a plain list of URLs.

use crate::domain::model::Bookmark;
use crate::domain::ports::TitleFetcher;
use crate::utils::error::{Result, ToolError};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::io::Write;
use std::sync::LazyLock;
use std::time::Duration;

pub const HEADER: &str = "<!DOCTYPE NETSCAPE-Bookmark-file-1><META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\"><Title>Bookmarks</Title><H1>Bookmarks</H1><DL><p>";
pub const FOOTER: &str = "</DL><p>";

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title\s*>").expect("valid title pattern"));
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("valid entity pattern")
});

/// Split a URL list into its non-empty lines.
pub fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.trim().to_string())
        .collect()
}

/// Pull the text of the first `<title>` element out of an HTML page.
///
/// The text is entity-decoded and only its first non-empty line is kept.
pub fn extract_title(html: &str) -> Option<String> {
    let raw = TITLE_RE.captures(html)?.get(1)?.as_str();

    decode_entities(raw)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

fn decode_entities(text: &str) -> String {
    ENTITY_RE.replace_all(text, |caps: &regex::Captures| {
        let entity = &caps[1];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{a0}'),
            _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                u32::from_str_radix(&entity[2..], 16).ok().and_then(char::from_u32)
            }
            _ if entity.starts_with('#') => entity[1..].parse().ok().and_then(char::from_u32),
            _ => None,
        };
        decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
    })
    .into_owned()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_link(bookmark: &Bookmark) -> String {
    format!(
        "<DT><A HREF=\"{}\">{}</A>",
        escape_html(&bookmark.url),
        escape_html(&bookmark.title)
    )
}

/// Fetches page titles over HTTP, following redirects.
pub struct HttpTitleFetcher {
    client: Client,
}

impl HttpTitleFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TitleFetcher for HttpTitleFetcher {
    async fn fetch_title(&self, url: &str) -> Result<Option<String>> {
        tracing::debug!("Fetching title for {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        Ok(extract_title(&body))
    }
}

pub struct BookmarkExporter<F: TitleFetcher> {
    fetcher: F,
    delay: Duration,
}

impl<F: TitleFetcher> BookmarkExporter<F> {
    pub fn new(fetcher: F, delay: Duration) -> Self {
        Self { fetcher, delay }
    }

    /// Resolve a title for `url`, falling back to the URL itself.
    pub async fn bookmark_for(&self, url: &str) -> Bookmark {
        let title = match self.fetcher.fetch_title(url).await {
            Ok(Some(title)) => title,
            Ok(None) => {
                tracing::warn!("No title found for {}, using the URL", url);
                url.to_string()
            }
            Err(e) => {
                tracing::warn!("Failed to fetch title for {}: {}", url, e);
                url.to_string()
            }
        };
        Bookmark {
            url: url.to_string(),
            title,
        }
    }

    /// Write a complete bookmarks file for `urls` to `out`.
    pub async fn export<W: Write>(&self, urls: &[String], out: &mut W) -> Result<Vec<Bookmark>> {
        writeln!(out, "{}", HEADER)?;

        let mut bookmarks = Vec::with_capacity(urls.len());
        for (i, url) in urls.iter().enumerate() {
            // 節流，避免短時間內發出過多請求
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let bookmark = self.bookmark_for(url).await;
            writeln!(out, "{}", render_link(&bookmark))?;
            bookmarks.push(bookmark);
        }

        writeln!(out, "{}", FOOTER)?;
        out.flush().map_err(ToolError::IoError)?;
        Ok(bookmarks)
    }
}
