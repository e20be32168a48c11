//! Flowcanvas command line
//!
//! Drives the canvas core against a workflow backend without a renderer:
//! export a saved canvas as a backend workflow config, run it as a preview,
//! open a stored workflow, or browse the tool catalog.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flowcanvas::api::{SystemClock, ToolDirectory};
use flowcanvas::mapper::snapshot_to_workflow_config;
use flowcanvas::{
    CanvasController, Config, Edge, ExecutionPhase, HttpWorkflowBackend, Node, WorkflowMeta,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flowcanvas", about = "Workflow canvas tooling", version)]
struct Cli {
    /// JSON config file; environment defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the backend workflow config for a canvas file
    Export { canvas: PathBuf },
    /// Save and execute a canvas file, then print output node text
    Run {
        canvas: PathBuf,
        /// Update this existing workflow instead of creating a new one
        #[arg(long)]
        workflow_id: Option<String>,
    },
    /// Load a stored workflow and print it as a canvas file
    Open { workflow_id: String },
    /// List tools from the backend catalog
    Tools {
        /// Show only this tool
        #[arg(long)]
        name: Option<String>,
    },
}

/// On-disk canvas document: the renderer's nodes and edges plus workflow metadata
#[derive(Deserialize)]
struct CanvasFile {
    #[serde(default)]
    meta: Option<WorkflowMeta>,
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl CanvasFile {
    fn read(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read canvas '{}'", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid canvas file '{}'", path.display()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::Export { canvas } => export(&config, &canvas),
        Command::Run { canvas, workflow_id } => run(&config, &canvas, workflow_id).await,
        Command::Open { workflow_id } => open(&config, &workflow_id).await,
        Command::Tools { name } => tools(&config, name).await,
    }
}

fn controller_for(config: &Config) -> Result<CanvasController> {
    let backend = HttpWorkflowBackend::new(&config.backend).context("Failed to build HTTP client")?;
    tracing::info!("🔌 Using workflow backend at {}", backend.base_url());
    Ok(CanvasController::from_config(config, Arc::new(backend)))
}

fn export(config: &Config, path: &Path) -> Result<()> {
    let file = CanvasFile::read(path)?;
    let mut controller = controller_for(config)?;
    controller.reset_canvas(file.nodes, file.edges);

    let meta = file.meta.unwrap_or_default();
    let workflow = snapshot_to_workflow_config(controller.snapshot(), &meta);
    println!("{}", serde_json::to_string_pretty(&workflow)?);
    Ok(())
}

async fn run(config: &Config, path: &Path, workflow_id: Option<String>) -> Result<()> {
    let file = CanvasFile::read(path)?;
    let mut controller = controller_for(config)?;

    if let Some(id) = workflow_id {
        controller.open_workflow(&id).await?;
    }
    if let Some(meta) = file.meta {
        controller.set_meta(meta);
    }
    controller.reset_canvas(file.nodes, file.edges);

    let execution_id = controller.run_preview().await?;
    tracing::info!("⏳ Waiting for execution {}", execution_id);

    let phase = controller.follow_execution().await?;
    for node in controller.nodes() {
        if let Some(text) = node.data.output_text() {
            println!("== {} ({})", node.data.label, node.id);
            println!("{}", text);
        }
    }

    if phase != ExecutionPhase::Completed {
        anyhow::bail!("Execution {} ended in phase {:?}", execution_id, phase);
    }
    Ok(())
}

async fn open(config: &Config, workflow_id: &str) -> Result<()> {
    let mut controller = controller_for(config)?;
    controller.open_workflow(workflow_id).await?;

    let document = serde_json::json!({
        "meta": controller.meta(),
        "nodes": controller.nodes(),
        "edges": controller.edges(),
    });
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

async fn tools(config: &Config, name: Option<String>) -> Result<()> {
    let backend = Arc::new(HttpWorkflowBackend::new(&config.backend)?);
    let ttl = config.catalog.tool_cache_ttl();
    let directory = ToolDirectory::new(backend, ttl, Arc::new(SystemClock));

    let tools = match name {
        Some(name) => directory
            .find(&name)
            .await?
            .into_iter()
            .collect::<Vec<_>>(),
        None => directory.tools().await?.as_ref().clone(),
    };

    for tool in tools {
        println!("{:<32} {}", tool.name, tool.description.unwrap_or_default());
    }
    Ok(())
}
