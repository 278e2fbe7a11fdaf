pub mod ls;
pub mod sync;

use crate::cms::webflow::WebflowClient;
use crate::config::Config;
use crate::feed::{self, ParsedFeed};
use crate::inventory::{self, Inventory};

/// Everything a command works from: the CMS handle, what the collection
/// already holds, and the current feed.
pub(crate) struct Snapshot {
    pub cms: WebflowClient,
    pub inventory: Inventory,
    pub feed: ParsedFeed,
}

/// Inventory first, then the feed. Only the feed can fail the run.
pub(crate) fn snapshot(config: &Config) -> anyhow::Result<Snapshot> {
    let http = crate::http::http_client()?;
    let cms = WebflowClient::new(http.clone(), config);

    let inventory = inventory::load(&cms);

    let feed_url = feed::feed_url(&config.feed_base, &config.channel_id);
    let feed = feed::fetch(&http, &feed_url)?;
    log::info!(
        "feed for channel {}: {} videos, {} unusable entries",
        config.channel_id,
        feed.records.len(),
        feed.rejected
    );

    Ok(Snapshot {
        cms,
        inventory,
        feed,
    })
}
