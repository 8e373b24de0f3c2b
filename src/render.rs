//! Human-readable renderings of a [`CitationDocument`].
//!
//! All functions here are pure: they read the document and return text.
//! Absent and empty-string optional fields are treated the same way and
//! left out of the output. Unregistered source ids never fail; they
//! render as placeholders.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::models::{Citation, CitationDocument, SourceInfo};

/// Comment syntax used for attribution comments and headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentStyle {
    /// `#` line comments and `"""` block fences (Python, shell, TOML, ...).
    #[default]
    Hash,
    /// `//` line comments and `/* */` blocks (Rust, C family, JS, ...).
    Slash,
}

impl CommentStyle {
    /// Pick a style from the file extension, or `None` when unrecognized.
    pub fn for_path(path: &Path) -> Option<CommentStyle> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "py" | "pyi" | "sh" | "bash" | "rb" | "toml" | "yaml" | "yml" | "r" | "pl" => {
                Some(CommentStyle::Hash)
            }
            "rs" | "c" | "h" | "cc" | "cpp" | "hpp" | "cs" | "java" | "js" | "jsx" | "ts"
            | "tsx" | "go" | "swift" | "kt" | "scala" | "php" => Some(CommentStyle::Slash),
            _ => None,
        }
    }

    fn line_prefix(self) -> &'static str {
        match self {
            CommentStyle::Hash => "#",
            CommentStyle::Slash => "//",
        }
    }
}

impl fmt::Display for CommentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentStyle::Hash => write!(f, "hash"),
            CommentStyle::Slash => write!(f, "slash"),
        }
    }
}

impl FromStr for CommentStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hash" => Ok(CommentStyle::Hash),
            "slash" => Ok(CommentStyle::Slash),
            other => Err(format!(
                "unknown comment style '{}'. Must be hash or slash.",
                other
            )),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Attribution comment for a single source.
///
/// ```text
/// # Attribution: Library X, by Jane Doe
/// # Source: https://example.com
/// # License: MIT
/// ```
pub fn attribution_comment(doc: &CitationDocument, source_id: &str, style: CommentStyle) -> String {
    let p = style.line_prefix();
    let source = match doc.sources.get(source_id) {
        Some(source) => source,
        None => return format!("{} Attribution: Unknown source ({})", p, source_id),
    };

    let mut comment = format!("{} Attribution: {}", p, source.name);
    if let Some(author) = non_empty(&source.author) {
        comment.push_str(&format!(", by {}", author));
    }
    if let Some(url) = non_empty(&source.url) {
        comment.push_str(&format!("\n{} Source: {}", p, url));
    }
    if let Some(license) = non_empty(&source.license_type) {
        comment.push_str(&format!("\n{} License: {}", p, license));
    }
    comment
}

/// Block comment listing every registered source cited in `rel_path`.
///
/// An uncited file gets the one-line placeholder
/// `No recorded attributions for this file.` behind the style's line
/// comment prefix, so it can be pasted into the file like the header.
pub fn attribution_header(doc: &CitationDocument, rel_path: &str, style: CommentStyle) -> String {
    if !doc.file_citations.contains_key(rel_path) {
        return format!(
            "{} No recorded attributions for this file.",
            style.line_prefix()
        );
    }

    let (open, prefix, blank, close) = match style {
        CommentStyle::Hash => ("\"\"\"", "", "", "\"\"\""),
        CommentStyle::Slash => ("/*", " * ", " *", " */"),
    };

    let mut header = vec![
        open.to_string(),
        format!(
            "{}This file contains code derived from or inspired by the following sources:",
            prefix
        ),
        blank.to_string(),
    ];

    for source_id in doc.cited_sources(rel_path) {
        let Some(source) = doc.sources.get(&source_id) else {
            continue;
        };
        let mut entry = format!("{}- {}", prefix, source.name);
        if let Some(url) = non_empty(&source.url) {
            entry.push_str(&format!(" ({})", url));
        }
        header.push(entry);
        if let Some(author) = non_empty(&source.author) {
            header.push(format!("{}  Author: {}", prefix, author));
        }
        if let Some(license) = non_empty(&source.license_type) {
            header.push(format!("{}  License: {}", prefix, license));
        }
        header.push(blank.to_string());
    }

    header.push(close.to_string());
    header.join("\n")
}

/// Location suffix for a usage bullet: ` (lines A-B)`, ` (from line A)` or nothing.
pub fn line_range(citation: &Citation) -> String {
    match (citation.line_start, citation.line_end) {
        (Some(start), Some(end)) => format!(" (lines {}-{})", start, end),
        (Some(start), None) => format!(" (from line {})", start),
        _ => String::new(),
    }
}

fn push_source(md: &mut Vec<String>, source: &SourceInfo) {
    md.push(format!("### {}", source.name));
    if let Some(author) = non_empty(&source.author) {
        md.push(format!("**Author:** {}", author));
    }
    if let Some(url) = non_empty(&source.url) {
        md.push(format!("**URL:** [{}]({})", url, url));
    }
    if let Some(license) = non_empty(&source.license_type) {
        md.push(format!("**License:** {}", license));
    }
    if let Some(description) = non_empty(&source.description) {
        md.push(format!("\n{}", description));
    }
    md.push(String::new());
}

/// Full Markdown citations report.
pub fn citations_markdown(doc: &CitationDocument) -> String {
    let mut md = vec![
        "# Project Citations".to_string(),
        String::new(),
        "This document lists all external sources used in this project.".to_string(),
    ];

    if doc.sources.is_empty() {
        md.push("\n*No citations recorded.*".to_string());
        return md.join("\n");
    }

    md.push("\n## Sources\n".to_string());
    for source in doc.sources.values() {
        push_source(&mut md, source);
    }

    md.push("## Usage by File\n".to_string());
    for (file_path, citations) in &doc.file_citations {
        if citations.is_empty() {
            continue;
        }
        md.push(format!("### {}", file_path));
        for citation in citations {
            let names: Vec<String> = citation
                .source_ids
                .iter()
                .map(|id| doc.source_name(id))
                .collect();
            md.push(format!(
                "- Uses: {}{}",
                names.join(", "),
                line_range(citation)
            ));
            if let Some(comment) = non_empty(&citation.comment) {
                md.push(format!("  - Note: {}", comment));
            }
        }
        md.push(String::new());
    }

    md.join("\n")
}
