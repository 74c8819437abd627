//! Subcommand implementations.

use std::path::Path;

use anyhow::{Context, Result};
use dealfinder_client::ItadClient;
use dealfinder_core::{AppConfig, CacheDb, LocalClock, ReportRow, normalize};

use crate::cli::{Command, WatchCommand, split_titles};
use crate::output::{render_history, render_report};
use crate::pipeline::{PipelineSettings, PricePipeline};

/// Dispatch a parsed command.
pub async fn run(command: Command, config: &AppConfig) -> Result<()> {
    match command {
        Command::Search { titles, json } => {
            let client = upstream_client(config)?;
            let db = open_db(config).await?;
            lookup(&db, client, config, &split_titles(&titles), json).await
        }
        Command::Refresh { json } => {
            let client = upstream_client(config)?;
            let db = open_db(config).await?;
            let titles = db.watch_list().await?;
            if titles.is_empty() {
                println!("No titles to check. Add one with `dealfinder watch add <TITLE>`.");
                return Ok(());
            }
            lookup(&db, client, config, &titles, json).await
        }
        Command::Watch { action } => {
            let db = open_db(config).await?;
            match action {
                WatchCommand::Add { title } => println!("-> {}", watch_add(&db, &title).await?),
                WatchCommand::List => {
                    for name in db.watch_list().await? {
                        println!("{name}");
                    }
                }
            }
            Ok(())
        }
        Command::History { title } => {
            let db = open_db(config).await?;
            let term = normalize(&title);
            let records = db.history(&term).await?;
            print!("{}", render_history(&term, &records));
            Ok(())
        }
        Command::Export { output } => {
            let db = open_db(config).await?;
            let count = export(&db, output.as_deref()).await?;
            if count == 0 {
                eprintln!("The offer history is empty. Nothing to export.");
            } else if let Some(path) = output {
                eprintln!("Exported {count} records to '{}'.", path.display());
            }
            Ok(())
        }
    }
}

/// Missing or placeholder keys are fatal before any title is processed.
fn upstream_client(config: &AppConfig) -> Result<ItadClient> {
    ItadClient::from_app_config(config).context("cannot reach IsThereAnyDeal; configure DEALFINDER_API_KEY")
}

async fn open_db(config: &AppConfig) -> Result<CacheDb> {
    CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("failed to open offer history at '{}'", config.db_path.display()))
}

async fn lookup(db: &CacheDb, client: ItadClient, config: &AppConfig, titles: &[String], json: bool) -> Result<()> {
    let pipeline = PricePipeline::new(db.clone(), client, LocalClock, PipelineSettings::from(config));

    // Status lines go to stderr in JSON mode so stdout stays parseable.
    let rows = pipeline
        .run(titles, &mut |event| if json { eprintln!("{event}") } else { println!("{event}") })
        .await;

    print_rows(&rows, json)
}

fn print_rows(rows: &[ReportRow], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
    } else {
        print!("\n{}", render_report(rows));
    }
    Ok(())
}

/// Add a title to the watchlist and describe the outcome.
pub async fn watch_add(db: &CacheDb, title: &str) -> Result<String> {
    let title = title.trim();
    let message = if db.watch_add(title).await? {
        format!("'{title}' added to the watchlist.")
    } else {
        format!("'{title}' is already on the watchlist.")
    };
    Ok(message)
}

/// Write every stored record, with its row id, as a JSON array to `output`
/// (or stdout).
///
/// Nothing is written when the history is empty. Returns the record count.
pub async fn export(db: &CacheDb, output: Option<&Path>) -> Result<usize> {
    let records = db.stored_offers().await?;
    if records.is_empty() {
        return Ok(0);
    }

    let json = serde_json::to_string_pretty(&records)?;
    match output {
        Some(path) => std::fs::write(path, json).with_context(|| format!("failed to write '{}'", path.display()))?,
        None => println!("{json}"),
    }
    Ok(records.len())
}
