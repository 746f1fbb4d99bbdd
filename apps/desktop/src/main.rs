use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use element_store::{
    load_settings, EditCoordinator, EditOutcome, ElementStore, MockDatasetProvider, StoreEvent,
};
use tokio::sync::broadcast;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod controller;
mod prompt;
mod render;

use controller::{parse_command, ShellCommand, HELP};
use prompt::{next_line, stdin_lines, SharedLines, StdinPrompt};
use render::{render_notification, render_state};

#[derive(Parser, Debug)]
#[command(about = "Editable periodic table in the terminal")]
struct Args {
    /// Settings file; defaults to ./periodic_table.toml when present.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Initial search term, applied without waiting for the debounce.
    #[arg(long)]
    search: Option<String>,
    /// Print rows and notifications as JSON.
    #[arg(long)]
    json: bool,
    /// Print the table once after loading and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_settings(args.settings.as_deref());
    debug!(?settings, "settings loaded");
    let provider =
        MockDatasetProvider::from_settings(&settings).context("failed to prepare dataset")?;
    let store = Arc::new(ElementStore::from_settings(Arc::new(provider), &settings));

    let event_task = tokio::spawn(print_async_events(
        Arc::clone(&store),
        store.subscribe_events(),
        args.json,
    ));

    if let Some(term) = args.search {
        store.apply_search_term_now(term);
    }

    eprintln!("Loading elements...");
    if let Err(err) = store.load().await {
        warn!("initial load failed: {err}");
    }
    print!("{}", render_state(&store.snapshot(), args.json));

    if !args.once {
        run_shell(&store, args.json).await?;
    }

    event_task.abort();
    Ok(())
}

/// Prints what arrives without a command driving it: failure notifications
/// and debounced search results.
async fn print_async_events(
    store: Arc<ElementStore>,
    mut events: broadcast::Receiver<StoreEvent>,
    json: bool,
) {
    loop {
        match events.recv().await {
            Ok(StoreEvent::Notification(notification)) => {
                eprintln!("{}", render_notification(&notification, json));
            }
            Ok(StoreEvent::SearchApplied(_)) => {
                print!("{}", render_state(&store.snapshot(), json));
            }
            Ok(StoreEvent::Loaded { .. } | StoreEvent::ElementUpdated(_)) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "store event printer lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn run_shell(store: &ElementStore, json: bool) -> Result<()> {
    let lines = stdin_lines();
    let coordinator = EditCoordinator::new(store, Arc::new(StdinPrompt::new(Arc::clone(&lines))));
    eprintln!("{HELP}");

    while let Some(line) = read_command_line(&lines).await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("{err:#}");
                continue;
            }
        };
        debug!(command = command.name(), "shell command");

        match command {
            ShellCommand::List => print!("{}", render_state(&store.snapshot(), json)),
            ShellCommand::Search(term) => store.set_search_term(term),
            ShellCommand::Edit { id, field } => {
                let Some(element) = store.element(id) else {
                    eprintln!("no element with id {id}");
                    continue;
                };
                match coordinator.request_edit(&element, field).await {
                    Ok(EditOutcome::Submitted(_)) => {
                        print!("{}", render_state(&store.snapshot(), json));
                    }
                    Ok(EditOutcome::Abandoned(reason)) => eprintln!("edit not applied: {reason:?}"),
                    Ok(EditOutcome::Cancelled | EditOutcome::Unchanged) => {}
                    // already surfaced as a notification
                    Err(_) => {}
                }
            }
            ShellCommand::Select(id) => match store.select_element(id) {
                Some(_) => print!("{}", render_state(&store.snapshot(), json)),
                None => eprintln!("no element with id {id}"),
            },
            ShellCommand::Reload => {
                if store.load().await.is_ok() {
                    print!("{}", render_state(&store.snapshot(), json));
                }
            }
            ShellCommand::Help => eprintln!("{HELP}"),
            ShellCommand::Quit => break,
        }
    }
    Ok(())
}

async fn read_command_line(lines: &SharedLines) -> Result<Option<String>> {
    eprint!("> ");
    next_line(lines).await.context("failed to read command")
}
