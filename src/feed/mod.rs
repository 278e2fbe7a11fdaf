pub mod atom;

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use url::Url;

pub const SLUG_PREFIX: &str = "yt-";

/// One video from the channel feed, validated at the parse boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub canonical_url: String,
    pub published_at: DateTime<Utc>,
    pub description: String,
    pub thumbnail_url: String,
}

impl VideoRecord {
    pub fn slug(&self) -> String {
        format!("{}{}", SLUG_PREFIX, self.video_id)
    }

    /// `2024-01-15T12:00:00.000Z`
    pub fn published_iso(&self) -> String {
        self.published_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[derive(Debug, Default)]
pub struct ParsedFeed {
    pub records: Vec<VideoRecord>,
    /// Entries dropped because a required field was absent or invalid.
    pub rejected: usize,
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

pub fn default_thumbnail_url(video_id: &str) -> String {
    format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", video_id)
}

pub fn feed_url(base: &Url, channel_id: &str) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut().append_pair("channel_id", channel_id);
    url
}

/// Any failure here is fatal for the run: without the feed there is nothing
/// to sync.
pub fn fetch(client: &reqwest::blocking::Client, url: &Url) -> anyhow::Result<ParsedFeed> {
    log::debug!("fetching feed {}", url);
    let response = client
        .get(url.clone())
        .send()
        .with_context(|| format!("failed to fetch feed {}", url))?
        .error_for_status()
        .with_context(|| format!("feed request failed for {}", url))?;
    let bytes = response.bytes().context("failed to read feed body")?;
    let text = String::from_utf8_lossy(&bytes);

    atom::parse(&text)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn record(video_id: &str) -> VideoRecord {
        VideoRecord {
            video_id: video_id.to_string(),
            title: "Demo".to_string(),
            canonical_url: watch_url(video_id),
            published_at: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            description: String::new(),
            thumbnail_url: default_thumbnail_url(video_id),
        }
    }

    #[test]
    fn test_slug_has_prefix() {
        assert_eq!(record("abc123").slug(), "yt-abc123");
    }

    #[test]
    fn test_url_templates() {
        assert_eq!(watch_url("abc123"), "https://www.youtube.com/watch?v=abc123");
        assert_eq!(
            default_thumbnail_url("abc123"),
            "https://i.ytimg.com/vi/abc123/hqdefault.jpg"
        );
    }

    #[test]
    fn test_published_iso_uses_millis_and_z() {
        assert_eq!(record("abc123").published_iso(), "2024-01-15T12:00:00.000Z");
    }

    #[test]
    fn test_feed_url_appends_channel() {
        let base = Url::parse("https://www.youtube.com/feeds/videos.xml").unwrap();
        assert_eq!(
            feed_url(&base, "UC_x5XG1OV2P6uZZ5FSM9Ttw").as_str(),
            "https://www.youtube.com/feeds/videos.xml?channel_id=UC_x5XG1OV2P6uZZ5FSM9Ttw"
        );
    }
}
