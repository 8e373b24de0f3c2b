//! The citation store: a [`CitationDocument`] bound to a project root.
//!
//! The document is read once when the store opens and written back in full
//! after every mutation, so `citations.json` is always current once a call
//! returns. There is no locking; two processes writing the same project
//! race and the last writer wins.
//!
//! ```no_run
//! use citekeep::{CitationStore, CiteOptions, NewSource};
//!
//! # fn main() -> citekeep::Result<()> {
//! let mut store = CitationStore::open(".")?;
//! store.register_source(NewSource::new("lib-x", "Library X").license("MIT"))?;
//! store.cite_in_file("src/a.rs", "lib-x", CiteOptions::lines(10, 20))?;
//! let path = store.export_markdown(None)?;
//! println!("wrote {}", path.display());
//! # Ok(())
//! # }
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use crate::config::StoreOptions;
use crate::error::{Error, Result};
use crate::models::{Citation, CitationDocument, SourceIds, SourceInfo};
use crate::paths;
use crate::render::{self, CommentStyle};

/// Arguments for [`CitationStore::register_source`].
#[derive(Debug, Clone, Default)]
pub struct NewSource {
    pub source_id: String,
    pub name: String,
    pub url: Option<String>,
    pub author: Option<String>,
    pub license_type: Option<String>,
    pub description: Option<String>,
}

impl NewSource {
    pub fn new(source_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn license(mut self, license_type: impl Into<String>) -> Self {
        self.license_type = Some(license_type.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Optional parts of a citation. All fields default to `None`.
#[derive(Debug, Clone, Default)]
pub struct CiteOptions {
    pub line_start: Option<i64>,
    pub line_end: Option<i64>,
    pub comment: Option<String>,
}

impl CiteOptions {
    pub fn lines(start: i64, end: i64) -> Self {
        Self {
            line_start: Some(start),
            line_end: Some(end),
            comment: None,
        }
    }

    pub fn from_line(start: i64) -> Self {
        Self {
            line_start: Some(start),
            ..Default::default()
        }
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Summary counts over the loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub sources: usize,
    pub files: usize,
    pub citations: usize,
    /// Source ids referenced by citations but never registered.
    pub dangling: Vec<String>,
    /// Sources that no citation references.
    pub unused: Vec<String>,
}

pub struct CitationStore {
    root: PathBuf,
    document_path: PathBuf,
    report_path: PathBuf,
    comment_style: Option<CommentStyle>,
    doc: CitationDocument,
}

impl CitationStore {
    /// Open the store for `project_root` with default options.
    pub fn open(project_root: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(StoreOptions::new(project_root.as_ref()))
    }

    /// Open the store for the current working directory.
    pub fn open_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| Error::persistence(".", e))?;
        Self::open(cwd)
    }

    /// Open the store described by `options`.
    ///
    /// A missing document starts empty. A document that cannot be parsed
    /// is logged and replaced by an empty one; it is overwritten on the
    /// next mutation.
    pub fn open_with(options: StoreOptions) -> Result<Self> {
        let root = if options.project_root.is_absolute() {
            paths::clean(&options.project_root)
        } else {
            let cwd = std::env::current_dir()
                .map_err(|e| Error::persistence(&options.project_root, e))?;
            paths::absolutize(&cwd, &options.project_root)
        };
        let document_path = root.join(&options.document_name);
        let report_path = paths::absolutize(&root, &options.report_path);

        let doc = load_document(&root, &document_path)?;

        Ok(Self {
            root,
            document_path,
            report_path,
            comment_style: options.comment_style,
            doc,
        })
    }

    pub fn project_root(&self) -> &Path {
        &self.root
    }

    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    pub fn document(&self) -> &CitationDocument {
        &self.doc
    }

    pub fn source(&self, source_id: &str) -> Option<&SourceInfo> {
        self.doc.sources.get(source_id)
    }

    /// Project-relative key for `file_path`.
    pub fn relative_key(&self, file_path: impl AsRef<Path>) -> String {
        paths::relative_key(&self.root, file_path.as_ref())
    }

    /// Citations recorded for a file, in the order they were added.
    pub fn citations_for(&self, file_path: impl AsRef<Path>) -> &[Citation] {
        let key = self.relative_key(file_path);
        self.doc
            .file_citations
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Distinct source ids cited in a file, in order of first appearance.
    pub fn cited_sources(&self, file_path: impl AsRef<Path>) -> Vec<String> {
        self.doc.cited_sources(&self.relative_key(file_path))
    }

    /// Insert or replace a source and persist the document.
    pub fn register_source(&mut self, source: NewSource) -> Result<()> {
        if source.source_id.trim().is_empty() {
            return Err(Error::InvalidInput("source id must not be empty".into()));
        }
        if source.name.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "source '{}' needs a name",
                source.source_id
            )));
        }

        let info = SourceInfo {
            name: source.name,
            url: source.url,
            author: source.author,
            license_type: source.license_type,
            description: source.description,
            added_at: Utc::now(),
        };
        debug!(source_id = %source.source_id, "registering source");
        let mut next = self.doc.clone();
        next.sources.insert(source.source_id, info);
        self.commit(next)
    }

    /// Append a citation for `file_path` and persist the document.
    ///
    /// Each call adds a new record; existing citations for the file are
    /// never merged or deduplicated.
    pub fn cite_in_file(
        &mut self,
        file_path: impl AsRef<Path>,
        source_ids: impl Into<SourceIds>,
        options: CiteOptions,
    ) -> Result<()> {
        let source_ids = source_ids.into();
        if source_ids.is_empty() {
            return Err(Error::InvalidInput(
                "a citation needs at least one source id".into(),
            ));
        }

        let key = self.relative_key(file_path);
        let citation = Citation {
            source_ids: source_ids.into_vec(),
            cited_at: Utc::now(),
            line_start: options.line_start,
            line_end: options.line_end,
            comment: options.comment.filter(|c| !c.is_empty()),
        };
        for id in &citation.source_ids {
            if !self.doc.sources.contains_key(id) {
                debug!(source_id = %id, file = %key, "citing unregistered source");
            }
        }

        let mut next = self.doc.clone();
        next.file_citations.entry(key).or_default().push(citation);
        self.commit(next)
    }

    /// Comment style for a file: the configured one, else by extension.
    pub fn style_for(&self, file_path: impl AsRef<Path>) -> CommentStyle {
        self.comment_style
            .or_else(|| CommentStyle::for_path(file_path.as_ref()))
            .unwrap_or_default()
    }

    /// Attribution comment for one source, in the configured style.
    pub fn attribution_comment(&self, source_id: &str) -> String {
        let style = self.comment_style.unwrap_or_default();
        render::attribution_comment(&self.doc, source_id, style)
    }

    pub fn attribution_comment_with(&self, source_id: &str, style: CommentStyle) -> String {
        render::attribution_comment(&self.doc, source_id, style)
    }

    /// Header text listing every source cited in `file_path`.
    ///
    /// The file on disk is not touched.
    pub fn attribution_header(&self, file_path: impl AsRef<Path>) -> String {
        let style = self.style_for(file_path.as_ref());
        self.attribution_header_with(file_path, style)
    }

    pub fn attribution_header_with(
        &self,
        file_path: impl AsRef<Path>,
        style: CommentStyle,
    ) -> String {
        let key = self.relative_key(file_path);
        render::attribution_header(&self.doc, &key, style)
    }

    pub fn citations_markdown(&self) -> String {
        render::citations_markdown(&self.doc)
    }

    /// Write the Markdown report and return the path written.
    ///
    /// `None` writes to the configured report path (`CITATIONS.md` by
    /// default). Relative paths resolve against the project root.
    pub fn export_markdown(&self, output_path: Option<&Path>) -> Result<PathBuf> {
        let path = match output_path {
            Some(p) => paths::absolutize(&self.root, p),
            None => self.report_path.clone(),
        };
        let markdown = self.citations_markdown();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::persistence(parent, e))?;
        }
        std::fs::write(&path, markdown).map_err(|e| Error::persistence(&path, e))?;
        debug!(path = %path.display(), "exported citations report");
        Ok(path)
    }

    pub fn stats(&self) -> StoreStats {
        let mut dangling: Vec<String> = Vec::new();
        let mut referenced: Vec<&str> = Vec::new();
        for id in self
            .doc
            .file_citations
            .values()
            .flatten()
            .flat_map(|c| c.source_ids.iter())
        {
            if !self.doc.sources.contains_key(id) && !dangling.contains(id) {
                dangling.push(id.clone());
            }
            referenced.push(id);
        }
        let unused = self
            .doc
            .sources
            .keys()
            .filter(|id| !referenced.contains(&id.as_str()))
            .cloned()
            .collect();

        StoreStats {
            sources: self.doc.sources.len(),
            files: self
                .doc
                .file_citations
                .values()
                .filter(|c| !c.is_empty())
                .count(),
            citations: self.doc.citation_count(),
            dangling,
            unused,
        }
    }

    /// Write `next` to disk and only then make it the current document.
    /// On failure the in-memory document is left as it was.
    fn commit(&mut self, next: CitationDocument) -> Result<()> {
        let json = serde_json::to_string_pretty(&next)?;
        std::fs::write(&self.document_path, json)
            .map_err(|e| Error::persistence(&self.document_path, e))?;
        debug!(
            path = %self.document_path.display(),
            sources = next.sources.len(),
            files = next.file_citations.len(),
            "saved citations document"
        );
        self.doc = next;
        Ok(())
    }
}

fn load_document(root: &Path, path: &Path) -> Result<CitationDocument> {
    let project_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no citations document, starting empty");
            return Ok(CitationDocument::new(project_name));
        }
        Err(e) => return Err(Error::persistence(path, e)),
    };

    match serde_json::from_str::<CitationDocument>(&content) {
        Ok(doc) => {
            debug!(
                path = %path.display(),
                sources = doc.sources.len(),
                files = doc.file_citations.len(),
                "loaded citations document"
            );
            Ok(doc)
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "citations document is corrupted, starting a new one"
            );
            Ok(CitationDocument::new(project_name))
        }
    }
}
