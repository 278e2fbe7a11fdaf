use std::fmt::Write;

use crate::config::Config;
use crate::feed::VideoRecord;
use crate::inventory::Inventory;

fn render(records: &[VideoRecord], inventory: &Inventory) -> String {
    let mut out = String::new();
    for record in records {
        let slug = record.slug();
        let status = if inventory.contains(&slug, &record.canonical_url) {
            "known"
        } else {
            "new"
        };
        writeln!(
            out,
            "{:<5}  {}  {}  {}",
            status,
            record.published_at.format("%Y-%m-%d"),
            slug,
            record.title
        )
        .unwrap();
    }
    out
}

pub(crate) fn cmd_ls(config: &Config) -> anyhow::Result<String> {
    let snapshot = super::snapshot(config)?;
    Ok(render(&snapshot.feed.records, &snapshot.inventory))
}
