//! Store options and the optional `cite.toml` project config.
//!
//! [`StoreOptions`] is what the library consumes; every field has a
//! documented default so `StoreOptions::new(root)` is enough for most
//! callers. The CLI reads `cite.toml` into a [`Config`] and converts it.
//!
//! ```toml
//! [store]
//! document = "citations.json"
//!
//! [report]
//! output = "CITATIONS.md"
//!
//! [comments]
//! style = "auto"   # auto | hash | slash
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::render::CommentStyle;

/// Default name of the persisted document under the project root.
pub const DEFAULT_DOCUMENT_NAME: &str = "citations.json";
/// Default name of the exported Markdown report under the project root.
pub const DEFAULT_REPORT_NAME: &str = "CITATIONS.md";
/// Default name of the project config file.
pub const DEFAULT_CONFIG_NAME: &str = "cite.toml";

/// How a [`CitationStore`](crate::store::CitationStore) is bound to a project.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Directory that owns the document. Relative paths are resolved
    /// against the working directory when the store opens.
    pub project_root: PathBuf,
    /// File name of the persisted document. Default: `citations.json`.
    pub document_name: String,
    /// Report path used by `export_markdown(None)`, relative to the
    /// project root unless absolute. Default: `CITATIONS.md`.
    pub report_path: PathBuf,
    /// Comment style for rendered attributions. `None` (the default)
    /// picks a style from each file's extension.
    pub comment_style: Option<CommentStyle>,
}

impl StoreOptions {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            document_name: DEFAULT_DOCUMENT_NAME.to_string(),
            report_path: PathBuf::from(DEFAULT_REPORT_NAME),
            comment_style: None,
        }
    }

    pub fn document_name(mut self, name: impl Into<String>) -> Self {
        self.document_name = name.into();
        self
    }

    pub fn report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }

    pub fn comment_style(mut self, style: Option<CommentStyle>) -> Self {
        self.comment_style = style;
        self
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub comments: CommentsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_document")]
    pub document: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            document: default_document(),
        }
    }
}

fn default_document() -> String {
    DEFAULT_DOCUMENT_NAME.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    #[serde(default = "default_report_output")]
    pub output: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_report_output(),
        }
    }
}

fn default_report_output() -> PathBuf {
    PathBuf::from(DEFAULT_REPORT_NAME)
}

#[derive(Debug, Deserialize, Clone)]
pub struct CommentsConfig {
    #[serde(default = "default_style")]
    pub style: String,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            style: default_style(),
        }
    }
}

fn default_style() -> String {
    "auto".to_string()
}

impl Config {
    /// Explicit comment style, or `None` for `auto`.
    pub fn comment_style(&self) -> Result<Option<CommentStyle>> {
        match self.comments.style.as_str() {
            "auto" => Ok(None),
            other => other
                .parse::<CommentStyle>()
                .map(Some)
                .map_err(|e| anyhow::anyhow!("comments.style: {}", e)),
        }
    }

    pub fn into_options(self, project_root: &Path) -> Result<StoreOptions> {
        let style = self.comment_style()?;
        Ok(StoreOptions::new(project_root)
            .document_name(self.store.document)
            .report_path(self.report.output)
            .comment_style(style))
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    let document = Path::new(&config.store.document);
    if config.store.document.trim().is_empty() {
        anyhow::bail!("store.document must not be empty");
    }
    if document.components().count() != 1 {
        anyhow::bail!(
            "store.document must be a plain file name, got '{}'",
            config.store.document
        );
    }

    if config.report.output.as_os_str().is_empty() {
        anyhow::bail!("report.output must not be empty");
    }

    config.comment_style()?;

    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to defaults.
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::default())
    }
}
