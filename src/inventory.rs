use std::collections::HashSet;

use crate::cms::{Cms, ItemPage};

/// Slugs and canonical URLs already present in the collection. Seeded from
/// the CMS at the start of a run and only ever grows during it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    slugs: HashSet<String>,
    urls: HashSet<String>,
}

impl Inventory {
    /// A match on either key is enough.
    pub fn contains(&self, slug: &str, url: &str) -> bool {
        self.slugs.contains(slug) || self.urls.contains(url)
    }

    pub fn insert(&mut self, slug: String, url: String) {
        self.slugs.insert(slug);
        self.urls.insert(url);
    }

    pub fn slug_count(&self) -> usize {
        self.slugs.len()
    }

    pub fn url_count(&self) -> usize {
        self.urls.len()
    }

    fn absorb(&mut self, page: &ItemPage) {
        for item in &page.items {
            if let Some(slug) = item.slug() {
                self.slugs.insert(slug.to_string());
            }
            if let Some(url) = item.video_url() {
                self.urls.insert(url.to_string());
            }
        }
    }
}

/// Walk the collection listing page by page. A failed page ends the walk
/// and whatever was gathered so far is returned.
pub fn load(cms: &impl Cms) -> Inventory {
    let mut inventory = Inventory::default();
    let mut offset = 0;
    let mut pages = 0;

    loop {
        let page = match cms.list_items(offset) {
            Ok(page) => page,
            Err(e) => {
                log::warn!(
                    "inventory listing failed at offset {}: {}; continuing with a partial inventory",
                    offset,
                    e
                );
                break;
            }
        };
        pages += 1;
        log::debug!("inventory page at offset {}: {} items", offset, page.items.len());
        inventory.absorb(&page);

        match page.next_offset() {
            Some(next) if next > offset => offset = next,
            _ => break,
        }
    }

    log::info!(
        "loaded inventory: {} slugs, {} video URLs from {} page(s)",
        inventory.slug_count(),
        inventory.url_count(),
        pages
    );
    inventory
}
