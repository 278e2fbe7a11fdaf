pub mod webflow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Custom field holding the canonical video URL; the secondary dedup key.
pub const VIDEO_URL_FIELD: &str = "video-url";

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid CMS URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("item already exists (409 Conflict)")]
    Conflict,

    #[error("CMS returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("CMS response carried no item id")]
    MissingItemId,
}

/// The three collection operations a sync run needs.
pub trait Cms {
    /// One page of the collection listing, starting at `offset`.
    fn list_items(&self, offset: u64) -> Result<ItemPage, CmsError>;

    /// Create a live item and return its id.
    fn create_item(&self, payload: &CmsItemPayload) -> Result<String, CmsError>;

    fn publish_item(&self, item_id: &str) -> Result<(), CmsError>;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPage {
    #[serde(default)]
    pub items: Vec<ListedItem>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Pagination {
    pub offset: u64,
    pub total: u64,
}

impl ItemPage {
    /// Offset of the following page, or `None` once the listing is exhausted.
    pub fn next_offset(&self) -> Option<u64> {
        if self.items.is_empty() {
            return None;
        }
        let pagination = self.pagination?;
        let next = pagination.offset.checked_add(self.items.len() as u64)?;
        (next < pagination.total).then_some(next)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListedItem {
    slug: Option<String>,
    #[serde(rename = "fieldData", default)]
    field_data: Map<String, Value>,
}

impl ListedItem {
    pub fn slug(&self) -> Option<&str> {
        self.field_data
            .get("slug")
            .and_then(Value::as_str)
            .or(self.slug.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn video_url(&self) -> Option<&str> {
        self.field_data
            .get(VIDEO_URL_FIELD)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Body of the create-item request. Items are created live: never draft,
/// never archived.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CmsItemPayload {
    pub is_archived: bool,
    pub is_draft: bool,
    pub field_data: FieldData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldData {
    pub name: String,
    pub slug: String,
    #[serde(rename = "video-url")]
    pub video_url: String,
    pub description: String,
    #[serde(rename = "published-date")]
    pub published_date: String,
    pub thumbnail: ImageRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRef {
    pub url: String,
    pub alt: String,
}
