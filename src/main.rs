//! # citekeep CLI (`cite`)
//!
//! Records which external sources influenced which files in a project and
//! renders attributions from that record.
//!
//! ## Usage
//!
//! ```bash
//! cite --project . <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cite add-source <id> <name>` | Register or replace a source |
//! | `cite cite <file> <id>...` | Record that a file uses one or more sources |
//! | `cite comment <id>` | Print an attribution comment for a source |
//! | `cite header <file>` | Print an attribution header for a file |
//! | `cite report` | Print the Markdown citations report |
//! | `cite export` | Write the report to `CITATIONS.md` (build hook) |
//! | `cite sources` | List registered sources |
//! | `cite show <file>` | Show the citations recorded for a file |
//! | `cite stats` | Summarize the citations document |
//!
//! ## Examples
//!
//! ```bash
//! cite add-source lib-x "Library X" --url https://example.com --license MIT
//! cite cite src/a.rs lib-x --lines 10-20 --comment "adapted snippet"
//! cite header src/a.rs
//! cite export --output docs/CITATIONS.md
//! ```

mod show;
mod sources;
mod stats;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use citekeep::config::{self, DEFAULT_CONFIG_NAME};
use citekeep::{export, paths, CitationStore, CiteOptions, CommentStyle, NewSource};

/// citekeep CLI — track and render attributions for external sources.
#[derive(Parser)]
#[command(
    name = "cite",
    about = "citekeep — track which external sources influenced which files",
    version,
    long_about = "citekeep records documentation pages, forum answers, and licensed snippets \
    that influenced files in a project, keeps that record in citations.json, and renders \
    attribution comments, file headers, and a Markdown citations report."
)]
struct Cli {
    /// Project root that owns `citations.json`.
    #[arg(long, global = true, default_value = ".")]
    project: PathBuf,

    /// Path to the project config file (TOML).
    ///
    /// Defaults to `<project>/cite.toml`, which may be absent. A path given
    /// here must exist.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr. `RUST_LOG` takes precedence.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a source, replacing any source with the same id.
    AddSource {
        /// Stable id used to cite this source.
        id: String,
        /// Human-readable name (library, article title, answer).
        name: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        author: Option<String>,
        /// License of the source, e.g. `MIT` or `CC BY-SA 4.0`.
        #[arg(long)]
        license: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Record that a file uses content from one or more sources.
    ///
    /// Each call appends a new citation; earlier ones are kept as-is.
    Cite {
        /// File that uses the sources. Resolved against the current directory.
        file: PathBuf,
        /// Source ids.
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
        /// Line range as `A-B`.
        #[arg(long, value_parser = parse_line_range, conflicts_with_all = ["start", "end"])]
        lines: Option<(u32, u32)>,
        /// First line of the cited region.
        #[arg(long)]
        start: Option<u32>,
        /// Last line of the cited region.
        #[arg(long)]
        end: Option<u32>,
        /// How the sources were used.
        #[arg(long)]
        comment: Option<String>,
    },

    /// Print an attribution comment for a source.
    Comment {
        id: String,
        /// Comment style: `hash` or `slash`. Defaults to the configured style.
        #[arg(long)]
        style: Option<CommentStyle>,
    },

    /// Print an attribution header listing every source cited in a file.
    ///
    /// The file itself is not modified.
    Header {
        file: PathBuf,
        /// Comment style: `hash` or `slash`. Defaults to the file's extension.
        #[arg(long)]
        style: Option<CommentStyle>,
    },

    /// Print the Markdown citations report to stdout.
    Report,

    /// Write the Markdown citations report.
    ///
    /// Intended to run after a build. Exits non-zero with the error when
    /// the report cannot be written.
    Export {
        /// Output path. Defaults to `report.output` from the config (`CITATIONS.md`).
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List registered sources.
    Sources,

    /// Show the citations recorded for a file.
    Show { file: PathBuf },

    /// Summarize the citations document.
    Stats,

    /// Print a shell completion script.
    Completions { shell: clap_complete::Shell },
}

/// Parse an `A-B` line range.
fn parse_line_range(s: &str) -> Result<(u32, u32), String> {
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| format!("invalid line range '{}': expected A-B", s))?;
    let start = start
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid start line '{}': {}", start, e))?;
    let end = end
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid end line '{}': {}", end, e))?;
    Ok((start, end))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_store(project: &Path, config_path: Option<&Path>) -> Result<CitationStore> {
    // Only the implicit project config may be absent.
    let cfg = match config_path {
        Some(p) => config::load_config(p)?,
        None => config::load_config_or_default(&project.join(DEFAULT_CONFIG_NAME))?,
    };
    let options = cfg.into_options(project)?;
    CitationStore::open_with(options)
        .with_context(|| format!("Failed to open citations for {}", project.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Commands that don't need a store
    if let Commands::Completions { shell } = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "cite", &mut std::io::stdout());
        return Ok(());
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let project = paths::absolutize(&cwd, &cli.project);
    let mut store = open_store(&project, cli.config.as_deref())?;

    match cli.command {
        Commands::AddSource {
            id,
            name,
            url,
            author,
            license,
            description,
        } => {
            store.register_source(NewSource {
                source_id: id.clone(),
                name,
                url,
                author,
                license_type: license,
                description,
            })?;
            println!("Registered source '{}'.", id);
        }
        Commands::Cite {
            file,
            ids,
            lines,
            start,
            end,
            comment,
        } => {
            let (line_start, line_end) = match lines {
                Some((a, b)) => (Some(i64::from(a)), Some(i64::from(b))),
                None => (start.map(i64::from), end.map(i64::from)),
            };
            let file = paths::absolutize(&cwd, &file);
            let key = store.relative_key(&file);
            let count = ids.len();
            store.cite_in_file(
                &file,
                ids,
                CiteOptions {
                    line_start,
                    line_end,
                    comment,
                },
            )?;
            println!(
                "Cited {} source{} in {}.",
                count,
                if count == 1 { "" } else { "s" },
                key
            );
        }
        Commands::Comment { id, style } => {
            let text = match style {
                Some(style) => store.attribution_comment_with(&id, style),
                None => store.attribution_comment(&id),
            };
            println!("{}", text);
        }
        Commands::Header { file, style } => {
            let file = paths::absolutize(&cwd, &file);
            let text = match style {
                Some(style) => store.attribution_header_with(&file, style),
                None => store.attribution_header(&file),
            };
            println!("{}", text);
        }
        Commands::Report => {
            println!("{}", store.citations_markdown());
        }
        Commands::Export { output } => {
            let output = output.map(|p| paths::absolutize(&cwd, &p));
            let path = export::run_export(&store, output.as_deref())?;
            println!("{}", path.display());
        }
        Commands::Sources => {
            sources::list_sources(&store)?;
        }
        Commands::Show { file } => {
            let file = paths::absolutize(&cwd, &file);
            show::run_show(&store, &file)?;
        }
        Commands::Stats => {
            stats::run_stats(&store)?;
        }
        Commands::Completions { .. } => {
            // Handled above (before the store is opened)
            unreachable!()
        }
    }

    Ok(())
}
