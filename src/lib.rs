//! # citekeep
//!
//! Track which external sources (documentation pages, forum answers,
//! licensed snippets) influenced which files in a project, and render that
//! record as attribution comments, file headers, and a Markdown report.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────────┐   ┌──────────────────┐
//! │  cite (CLI)  │──▶│ CitationStore  │──▶│  citations.json  │
//! │  build hooks │   │ register/cite  │   └──────────────────┘
//! └──────────────┘   └───────┬────────┘
//!                            ▼
//!                    ┌────────────────┐   ┌──────────────────┐
//!                    │     render     │──▶│   CITATIONS.md   │
//!                    │ comment/header │   └──────────────────┘
//!                    └────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`store`] | Load, mutate, and persist the citation document |
//! | [`models`] | Persisted data types |
//! | [`render`] | Attribution comments, headers, Markdown report |
//! | [`paths`] | Project-relative path keys |
//! | [`config`] | Store options and `cite.toml` parsing |
//! | [`export`] | Report export used by build hooks |
//! | [`error`] | Error types |

pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod paths;
pub mod render;
pub mod store;

pub use config::StoreOptions;
pub use error::{Error, Result};
pub use models::{Citation, CitationDocument, ProjectInfo, SourceIds, SourceInfo};
pub use render::CommentStyle;
pub use store::{CitationStore, CiteOptions, NewSource, StoreStats};
