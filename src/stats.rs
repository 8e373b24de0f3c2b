//! Citation document summary.
//!
//! Gives a quick overview of what is recorded: source, file, and citation
//! counts, references to sources that were never registered, and when the
//! document last changed. Used by `cite stats`.

use anyhow::Result;
use chrono::{DateTime, Utc};

use citekeep::CitationStore;

/// Run the stats command: summarize the loaded document.
pub fn run_stats(store: &CitationStore) -> Result<()> {
    let doc = store.document();
    let stats = store.stats();

    let last_activity = doc
        .sources
        .values()
        .map(|s| s.added_at)
        .chain(doc.file_citations.values().flatten().map(|c| c.cited_at))
        .max();

    println!("Citations — {}", doc.project_info.name);
    println!("================================");
    println!();
    println!("  Document:    {}", store.document_path().display());
    println!(
        "  Created:     {}",
        doc.project_info.created_at.format("%Y-%m-%d %H:%M")
    );
    println!(
        "  Last change: {}",
        match last_activity {
            Some(ts) => format_ts_relative(ts),
            None => "never".to_string(),
        }
    );
    println!();
    println!("  Sources:     {}", stats.sources);
    println!("  Files:       {}", stats.files);
    println!("  Citations:   {}", stats.citations);

    if !stats.dangling.is_empty() {
        println!();
        println!("  Unregistered sources cited:");
        for id in &stats.dangling {
            println!("    {}", id);
        }
    }

    if !stats.unused.is_empty() {
        println!();
        println!("  Sources never cited:");
        for id in &stats.unused {
            println!("    {}", id);
        }
    }

    println!();
    Ok(())
}

/// Units for relative times, largest first, with their length in seconds.
const UNITS: [(&str, i64); 3] = [("day", 86_400), ("hour", 3_600), ("min", 60)];

/// Format a timestamp as a relative time string (e.g. "3 hours ago").
///
/// Future timestamps and anything older than 30 days fall back to a date.
fn format_ts_relative(ts: DateTime<Utc>) -> String {
    let age = (Utc::now() - ts).num_seconds();
    if !(0..86_400 * 30).contains(&age) {
        return format_ts_iso(ts);
    }

    UNITS
        .iter()
        .find(|(_, secs)| age >= *secs)
        .map(|(unit, secs)| {
            let n = age / secs;
            format!("{} {}{} ago", n, unit, if n == 1 { "" } else { "s" })
        })
        .unwrap_or_else(|| "just now".to_string())
}

fn format_ts_iso(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}
