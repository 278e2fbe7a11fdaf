use anyhow::Context;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use thiserror::Error;

use super::{ParsedFeed, VideoRecord, default_thumbnail_url, watch_url};

// The channel feed as delivered, every field optional. quick-xml matches
// fields on the local element name, so `yt:videoId` is `videoId`.

#[derive(Debug, Default, Deserialize)]
struct RawFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<RawEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEntry {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
    title: Option<String>,
    #[serde(rename = "link", default)]
    links: Vec<RawLink>,
    published: Option<String>,
    #[serde(rename = "group")]
    media: Option<RawMediaGroup>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLink {
    #[serde(rename = "@rel")]
    rel: Option<String>,
    #[serde(rename = "@href")]
    href: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMediaGroup {
    description: Option<String>,
    thumbnail: Option<RawThumbnail>,
}

#[derive(Debug, Default, Deserialize)]
struct RawThumbnail {
    #[serde(rename = "@url")]
    url: Option<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum EntryError {
    #[error("missing video id")]
    MissingVideoId,

    #[error("video {0} has no title")]
    MissingTitle(String),

    #[error("video {0} has no published date")]
    MissingPublished(String),

    #[error("video {video_id} has an invalid published date: {value}")]
    InvalidPublished { video_id: String, value: String },
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::<FixedOffset>::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::<FixedOffset>::parse_from_rfc2822(raw))
        .ok()
        .map(|d| d.to_utc())
}

impl RawEntry {
    fn alternate_link(&self) -> Option<String> {
        self.links
            .iter()
            .filter(|l| l.rel.as_deref().is_none_or(|rel| rel == "alternate"))
            .find_map(|l| present(l.href.clone()))
    }

    fn into_record(self) -> Result<VideoRecord, EntryError> {
        let canonical_url = self.alternate_link();
        let video_id = present(self.video_id).ok_or(EntryError::MissingVideoId)?;
        let title =
            present(self.title).ok_or_else(|| EntryError::MissingTitle(video_id.clone()))?;
        let raw_published = present(self.published)
            .ok_or_else(|| EntryError::MissingPublished(video_id.clone()))?;
        let published_at =
            parse_published(&raw_published).ok_or_else(|| EntryError::InvalidPublished {
                video_id: video_id.clone(),
                value: raw_published.clone(),
            })?;

        let (description, thumbnail) = match self.media {
            Some(media) => (
                present(media.description),
                media.thumbnail.and_then(|t| present(t.url)),
            ),
            None => (None, None),
        };

        Ok(VideoRecord {
            canonical_url: canonical_url.unwrap_or_else(|| watch_url(&video_id)),
            thumbnail_url: thumbnail.unwrap_or_else(|| default_thumbnail_url(&video_id)),
            description: description.unwrap_or_default(),
            published_at,
            title,
            video_id,
        })
    }
}

/// Parse a channel feed. Malformed XML fails the whole document; a malformed
/// entry is logged and left out.
pub fn parse(xml: &str) -> anyhow::Result<ParsedFeed> {
    let raw: RawFeed = quick_xml::de::from_str(xml).context("failed to parse feed XML")?;

    let mut parsed = ParsedFeed::default();
    for (index, entry) in raw.entries.into_iter().enumerate() {
        match entry.into_record() {
            Ok(record) => parsed.records.push(record),
            Err(e) => {
                log::warn!("skipping feed entry #{}: {}", index, e);
                parsed.rejected += 1;
            }
        }
    }
    Ok(parsed)
}
