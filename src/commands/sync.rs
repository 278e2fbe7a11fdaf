use std::fmt;

use crate::cms::{Cms, CmsError, CmsItemPayload, FieldData, ImageRef};
use crate::config::Config;
use crate::feed::VideoRecord;
use crate::inventory::Inventory;

/// Upper bound for the single-line description field on the CMS side.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Terminal state of one feed record within a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Slug or URL already known, or the CMS answered 409.
    Skipped,
    WouldCreate,
    Published,
    /// Created but still unpublished; carries the item id.
    PublishFailed(String),
    CreateFailed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub entries: usize,
    pub rejected: usize,
    pub created: usize,
    pub published: usize,
    pub skipped: usize,
    pub create_failed: usize,
    pub publish_failed: usize,
    /// Ids of items created this run that could not be published.
    pub unpublished: Vec<String>,
    pub dry_run: bool,
}

impl SyncReport {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Skipped => self.skipped += 1,
            Outcome::WouldCreate => self.created += 1,
            Outcome::Published => {
                self.created += 1;
                self.published += 1;
            }
            Outcome::PublishFailed(item_id) => {
                self.created += 1;
                self.publish_failed += 1;
                self.unpublished.push(item_id.clone());
            }
            Outcome::CreateFailed => self.create_failed += 1,
        }
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            return write!(
                f,
                "dry run over {} feed entries: {} would be created, {} skipped, {} unusable",
                self.entries + self.rejected,
                self.created,
                self.skipped,
                self.rejected
            );
        }
        write!(
            f,
            "synced {} feed entries: {} created, {} published, {} skipped, {} failed",
            self.entries + self.rejected,
            self.created,
            self.published,
            self.skipped,
            self.create_failed + self.publish_failed + self.rejected
        )
    }
}

/// Collapse every whitespace run (line breaks included) to one space, trim,
/// and cap the length. Applying it twice changes nothing.
pub fn normalize_description(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.char_indices().nth(DESCRIPTION_MAX_CHARS) {
        Some((cut, _)) => collapsed[..cut].trim_end().to_string(),
        None => collapsed,
    }
}

pub fn build_payload(record: &VideoRecord) -> CmsItemPayload {
    CmsItemPayload {
        is_archived: false,
        is_draft: false,
        field_data: FieldData {
            name: record.title.clone(),
            slug: record.slug(),
            video_url: record.canonical_url.clone(),
            description: normalize_description(&record.description),
            published_date: record.published_iso(),
            thumbnail: ImageRef {
                url: record.thumbnail_url.clone(),
                alt: record.title.clone(),
            },
        },
    }
}

fn upsert(
    cms: &impl Cms,
    inventory: &mut Inventory,
    record: &VideoRecord,
    dry_run: bool,
) -> Outcome {
    let slug = record.slug();
    if inventory.contains(&slug, &record.canonical_url) {
        log::debug!("{} already in collection", slug);
        return Outcome::Skipped;
    }

    if dry_run {
        log::info!("would create {} ({})", slug, record.title);
        inventory.insert(slug, record.canonical_url.clone());
        return Outcome::WouldCreate;
    }

    let item_id = match cms.create_item(&build_payload(record)) {
        Ok(id) => id,
        Err(CmsError::Conflict) => {
            log::warn!("{} rejected as duplicate by the CMS, skipping", slug);
            return Outcome::Skipped;
        }
        Err(e) => {
            log::error!("failed to create {}: {}", slug, e);
            return Outcome::CreateFailed;
        }
    };
    log::info!("created {} as item {}", slug, item_id);
    inventory.insert(slug.clone(), record.canonical_url.clone());

    match cms.publish_item(&item_id) {
        Ok(()) => {
            log::info!("published {}", slug);
            Outcome::Published
        }
        Err(e) => {
            // Left as an unpublished item; later runs see the slug and skip it.
            log::error!("created {} but failed to publish item {}: {}", slug, item_id, e);
            Outcome::PublishFailed(item_id)
        }
    }
}

/// Walk the records in feed order. Nothing here aborts the loop.
pub fn upsert_all(
    cms: &impl Cms,
    inventory: &mut Inventory,
    records: &[VideoRecord],
    dry_run: bool,
) -> SyncReport {
    let mut report = SyncReport {
        entries: records.len(),
        dry_run,
        ..Default::default()
    };
    for record in records {
        let outcome = upsert(cms, inventory, record, dry_run);
        report.record(&outcome);
    }
    report
}

pub(crate) fn cmd_sync(config: &Config, dry_run: bool) -> anyhow::Result<SyncReport> {
    let mut snapshot = super::snapshot(config)?;
    let mut report = upsert_all(
        &snapshot.cms,
        &mut snapshot.inventory,
        &snapshot.feed.records,
        dry_run,
    );
    report.rejected = snapshot.feed.rejected;
    if !report.unpublished.is_empty() {
        log::warn!(
            "items left unpublished, publish them manually: {}",
            report.unpublished.join(", ")
        );
    }
    Ok(report)
}
