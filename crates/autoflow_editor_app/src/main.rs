// SPDX-License-Identifier: MIT OR Apache-2.0
//! AutoFlow workflow editor host.
//!
//! Drives the editor core from the command line:
//! - Grid layout for generated graphs
//! - Draw-list output for a presentation layer
//! - Mermaid export
//! - Replay of recorded editing sessions with snapshot autosave
//!
//! Logs go to stderr; command output goes to stdout.

mod config;
mod error;
mod session;
mod store;

use autoflow_editor_graph::export::to_mermaid;
use autoflow_editor_graph::{Graph, Viewport, WorkflowEditor};
use clap::{Parser, Subcommand};
use config::{EditorConfig, CONFIG_FILE_NAME};
use error::{AppError, Result};
use session::SessionCommand;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use store::{FileStore, GraphStore};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Parser)]
#[command(name = "autoflow-editor", version, about = "AutoFlow workflow editor host")]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Place unpositioned nodes on the grid and write the graph
    Layout {
        /// Graph JSON file
        input: PathBuf,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the draw list for a graph as JSON
    Render {
        /// Graph JSON file
        input: PathBuf,
        /// Absolute zoom factor (defaults to the configured one)
        #[arg(long)]
        zoom: Option<f32>,
    },
    /// Print the graph as a Mermaid flowchart
    Mermaid {
        /// Graph JSON file
        input: PathBuf,
    },
    /// Replay a recorded session against a graph and print the result
    Replay {
        /// Graph JSON file
        graph: PathBuf,
        /// Session JSON file
        session: PathBuf,
        /// Skip snapshot saving even if the config enables it
        #[arg(long)]
        no_autosave: bool,
    },
    /// Write a default configuration file
    InitConfig,
}

fn main() {
    let cli = Cli::parse();
    let loaded = EditorConfig::load(&cli.config);
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Starting AutoFlow editor v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = loaded {
        tracing::error!("Failed to load config: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli.command, &cli.config, &config) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run(command: Command, config_path: &Path, config: &EditorConfig) -> Result<()> {
    match command {
        Command::Layout { input, output } => {
            let mut editor = WorkflowEditor::new();
            editor.load_graph(store::load_graph_file(&input)?);
            let text = store::to_json(editor.graph(), config.pretty_json)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, text).map_err(|e| AppError::io(&path, e))?;
                    tracing::info!("Wrote laid-out graph to {:?}", path);
                }
                None => println!("{text}"),
            }
        }
        Command::Render { input, zoom } => {
            let viewport = Viewport::with_zoom(zoom.unwrap_or(config.initial_zoom));
            let mut editor = WorkflowEditor::with_viewport(viewport);
            editor.load_graph(store::load_graph_file(&input)?);
            println!("{}", store::to_json(&editor.draw_list(), config.pretty_json)?);
        }
        Command::Mermaid { input } => {
            let mut editor = WorkflowEditor::new();
            editor.load_graph(store::load_graph_file(&input)?);
            print!("{}", to_mermaid(editor.graph()));
        }
        Command::Replay {
            graph,
            session,
            no_autosave,
        } => {
            let commands = session::load_session(&session)?;
            let graph = store::load_graph_file(&graph)?;
            let snapshots = (config.autosave && !no_autosave)
                .then(|| Rc::new(RefCell::new(FileStore::new(&config.snapshot_dir, config.pretty_json))));

            let editor = replay_with_store(graph, commands, config.initial_zoom, snapshots);
            if editor.is_dirty() {
                tracing::info!("Session left unsaved changes");
            }
            println!("{}", store::to_json(editor.graph(), config.pretty_json)?);
        }
        Command::InitConfig => {
            if config_path.exists() {
                tracing::warn!("Config {:?} already exists, leaving it alone", config_path);
            } else {
                EditorConfig::default().save(config_path)?;
            }
        }
    }
    Ok(())
}

/// Replay `commands` over `graph`, snapshotting every change into
/// `snapshots` when given. The editor ends clean only if the last snapshot
/// made it to disk.
fn replay_with_store(
    graph: Graph,
    commands: Vec<SessionCommand>,
    initial_zoom: f32,
    snapshots: Option<Rc<RefCell<FileStore>>>,
) -> WorkflowEditor {
    let mut editor = WorkflowEditor::with_viewport(Viewport::with_zoom(initial_zoom));
    if let Some(store) = &snapshots {
        let sink = Rc::clone(store);
        editor.subscribe(move |graph| {
            if let Err(e) = sink.borrow_mut().save(graph) {
                tracing::warn!("Snapshot failed: {e}");
            }
        });
    }

    editor.load_graph(graph);
    session::replay(&mut editor, commands);

    if let Some(store) = &snapshots {
        let store = store.borrow();
        if store.last_ok() {
            editor.mark_saved();
            tracing::info!(saves = store.saves(), "Snapshots written to {:?}", store.snapshot_path());
        } else {
            tracing::warn!("Latest snapshot was not written to {:?}", store.snapshot_path());
        }
    }
    editor
}
