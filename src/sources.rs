use anyhow::Result;

use citekeep::CitationStore;

pub fn list_sources(store: &CitationStore) -> Result<()> {
    let doc = store.document();
    if doc.sources.is_empty() {
        println!("No sources registered.");
        return Ok(());
    }

    let cited = store.stats();

    println!("{:<24} {:<32} {:<16} CITED", "ID", "NAME", "LICENSE");
    for (id, source) in &doc.sources {
        let license = source
            .license_type
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or("-");
        println!(
            "{:<24} {:<32} {:<16} {}",
            id,
            truncate(&source.name, 32),
            truncate(license, 16),
            !cited.unused.contains(id)
        );
    }

    for id in &cited.dangling {
        println!("{:<24} {:<32} {:<16} true", id, "(unregistered)", "-");
    }

    Ok(())
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
