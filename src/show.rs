//! Per-file citation view for `cite show`.

use anyhow::Result;
use std::path::Path;

use citekeep::render::line_range;
use citekeep::CitationStore;

pub fn run_show(store: &CitationStore, file: &Path) -> Result<()> {
    let key = store.relative_key(file);
    let citations = store.citations_for(file);

    println!("--- {} ---", key);
    if citations.is_empty() {
        println!("(no citations)");
        return Ok(());
    }

    for (i, citation) in citations.iter().enumerate() {
        let names: Vec<String> = citation
            .source_ids
            .iter()
            .map(|id| store.document().source_name(id))
            .collect();
        println!("[{}] {}{}", i + 1, names.join(", "), line_range(citation));
        println!("    cited_at: {}", citation.cited_at.format("%Y-%m-%dT%H:%M:%SZ"));
        if let Some(ref comment) = citation.comment {
            println!("    note:     {}", comment);
        }
    }
    println!();

    println!("--- Sources ---");
    for id in store.cited_sources(file) {
        match store.source(&id) {
            Some(source) => {
                println!("{}: {}", id, source.name);
                if let Some(ref url) = source.url {
                    println!("    url:     {}", url);
                }
                if let Some(ref license) = source.license_type {
                    println!("    license: {}", license);
                }
            }
            None => println!("{}: (unregistered)", id),
        }
    }

    Ok(())
}
