//! Regenerate `CITATIONS.md` for a project.
//!
//! This is the whole surface a build hook needs: open the project's store,
//! write the report, and report success or failure. Used by `cite export`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{self, DEFAULT_CONFIG_NAME};
use crate::store::CitationStore;

/// Update the citations report for `project_dir`.
///
/// Honors `cite.toml` in the project directory when present. `output`
/// overrides the configured report path. Returns the path written.
pub fn update_citations(project_dir: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let cfg = config::load_config_or_default(&project_dir.join(DEFAULT_CONFIG_NAME))?;
    let store = CitationStore::open_with(cfg.into_options(project_dir)?)?;
    run_export(&store, output)
}

/// Write the report for an open store and note where it went on stderr.
pub fn run_export(store: &CitationStore, output: Option<&Path>) -> Result<PathBuf> {
    let path = store
        .export_markdown(output)
        .with_context(|| "Failed to update citations")?;

    let stats = store.stats();
    eprintln!(
        "Exported {} sources, {} citations to {}",
        stats.sources,
        stats.citations,
        path.display()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CiteOptions, NewSource};
    use tempfile::TempDir;

    #[test]
    fn test_update_citations_default_path() {
        let tmp = TempDir::new().unwrap();
        let mut store = CitationStore::open(tmp.path()).unwrap();
        store.register_source(NewSource::new("s", "Some Source")).unwrap();
        store.cite_in_file("main.rs", "s", CiteOptions::default()).unwrap();

        let path = update_citations(tmp.path(), None).unwrap();
        assert_eq!(path, tmp.path().join("CITATIONS.md"));
        let md = std::fs::read_to_string(path).unwrap();
        assert!(md.contains("### Some Source"));
        assert!(md.contains("### main.rs"));
    }

    #[test]
    fn test_update_citations_respects_config() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("cite.toml"),
            "[report]\noutput = \"docs/THIRD_PARTY.md\"\n",
        )
        .unwrap();

        let path = update_citations(tmp.path(), None).unwrap();
        assert_eq!(path, tmp.path().join("docs").join("THIRD_PARTY.md"));
        assert!(path.exists());

        let explicit = tmp.path().join("out.md");
        assert_eq!(update_citations(tmp.path(), Some(explicit.as_path())).unwrap(), explicit);
    }

    #[test]
    fn test_update_citations_reports_write_failure() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("CITATIONS.md")).unwrap();
        let err = update_citations(tmp.path(), None).unwrap_err();
        assert!(err.to_string().contains("Failed to update citations"));
    }
}
