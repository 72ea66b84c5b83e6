// src/cli.rs
use anyhow::{Context as _, Result, anyhow};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::Config;
use crate::core::corpus::Corpus;
use crate::template::create_note;
use crate::utils::{
    Inspection, format_inspection, format_links, format_note_ids, format_results,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Notes directory (defaults to current directory)
    #[arg(short, long, default_value = ".", global = true)]
    pub directory: PathBuf,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    /// Directories to exclude (comma-separated), replacing the configured list
    #[arg(short, long, global = true, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank notes by text relevance and link importance
    Search {
        /// Search text; quote a part to require it as a phrase
        text: String,

        /// Attribute filter, e.g. "status=draft" (repeatable, all must hold)
        #[arg(short, long = "filter")]
        filters: Vec<String>,

        /// Number of results to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// List notes matching attribute filters, ranked by importance
    Query {
        /// Attribute filters, e.g. "tags=rust and not status=done"
        #[arg(required = true)]
        filters: Vec<String>,

        /// Number of results to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// List every note, ranked by importance
    List,
    /// Notes linking to a note
    Backlinks {
        /// Note id, path, title, alias or file name
        note: String,
    },
    /// Outbound and inbound links of a note
    Links {
        /// Note id, path, title, alias or file name
        note: String,
    },
    /// Corpus statistics and diagnostics, or details of one note
    Inspect {
        /// Note id, path, title, alias or file name
        note: Option<String>,
    },
    /// Create a note from a template
    New {
        /// Path of the new note relative to the notes directory
        path: String,

        /// Template file with {{placeholders}}
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Template variable (repeatable)
        #[arg(long = "var", value_parser = parse_var)]
        vars: Vec<(String, String)>,
    },
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (key.trim().to_owned(), value.to_owned()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))
}

/// Runs one command.
///
/// # Errors
///
/// Returns an error if the corpus cannot be loaded, a filter is malformed, a note cannot
/// be created or output cannot be serialized.
pub fn run(args: Args) -> Result<()> {
    let mut config = Config::load(&args.directory)
        .with_context(|| format!("Failed to load settings for {}", args.directory.display()))?;
    if let Some(exclude) = args.exclude {
        config.scan.exclude = exclude;
    }

    if let Command::New {
        path,
        template,
        vars,
    } = &args.command
    {
        let vars: BTreeMap<String, String> = vars.iter().cloned().collect();
        let created = create_note(&config.directory, path, template.as_deref(), &vars)
            .with_context(|| format!("Failed to create note {path}"))?;
        return emit(args.json, &created, || format!("{}\n", created.display()));
    }

    let corpus = Corpus::load(&config)
        .with_context(|| format!("Failed to load notes from {}", config.directory.display()))?;

    match args.command {
        Command::Search {
            text,
            filters,
            limit,
        } => {
            let mut results = corpus
                .search(&text, &filters)
                .context("Invalid filter")?;
            results.truncate(limit.unwrap_or(config.search.limit));
            emit(args.json, &results, || format_results(&results))
        }
        Command::Query { filters, limit } => {
            let mut results = corpus.query(&filters).context("Invalid filter")?;
            results.truncate(limit.unwrap_or(usize::MAX));
            emit(args.json, &results, || format_results(&results))
        }
        Command::List => {
            let results = corpus.query::<&str>(&[]).context("Invalid filter")?;
            emit(args.json, &results, || format_results(&results))
        }
        Command::Backlinks { note } => {
            let backlinks = corpus.backlinks(&note);
            emit(args.json, &backlinks, || format_note_ids(&backlinks))
        }
        Command::Links { note } => {
            let summary = corpus.lookup_links(&note);
            emit(args.json, &summary, || format_links(&summary))
        }
        Command::Inspect { note } => {
            let inspection = match note {
                Some(note) => Inspection::note(&corpus, &note)
                    .ok_or_else(|| anyhow!("No note matches `{note}`"))?,
                None => Inspection::corpus(&corpus),
            };
            emit(args.json, &inspection, || format_inspection(&inspection))
        }
        Command::New { .. } => Ok(()),
    }
}

fn emit<T: Serialize + ?Sized>(json: bool, value: &T, plain: impl FnOnce() -> String) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        println!("{out}");
    } else {
        print!("{}", plain());
    }
    Ok(())
}
