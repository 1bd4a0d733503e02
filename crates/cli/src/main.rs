//! LayerKit CLI - run layer actions against a project file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use layerkit_algorithms::actions::{
    find_action, registry, Action, ActionResult, BufferRings, RepairGeometries, Status, ZoomToLayer,
};
use layerkit_core::io::{read_project, write_project};
use layerkit_core::{HostInterface, LayerKind, MemoryHost, Project};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "layerkit")]
#[command(author, version, about = "Vector layer repair and ring buffers", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the layers of a project file
    Info {
        /// Input project file
        input: PathBuf,
    },
    /// Detect and repair invalid geometries
    Repair {
        /// Input project file
        input: PathBuf,
        /// Layer to process (default: the project's active layer)
        #[arg(short, long)]
        layer: Option<String>,
        /// Delete features whose geometry is empty
        #[arg(long)]
        remove_empty: bool,
        /// Output project file (default: overwrite input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Create concentric ring buffers around features
    Rings {
        /// Input project file
        input: PathBuf,
        /// Layer to buffer (default: the project's active layer)
        #[arg(short, long)]
        layer: Option<String>,
        /// Distance of the first ring
        #[arg(long, default_value = "100")]
        initial_distance: f64,
        /// Distance added per ring
        #[arg(long, default_value = "100")]
        increment: f64,
        /// Number of rings
        #[arg(short = 'n', long, default_value = "3")]
        ring_count: u32,
        /// Output project file (default: overwrite input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the extent the canvas would zoom to
    Zoom {
        /// Input project file
        input: PathBuf,
        /// Layer to zoom to (default: the project's active layer)
        #[arg(short, long)]
        layer: Option<String>,
    },
    /// Run any registered action by id
    Run {
        /// Action id (see `layerkit run --list`)
        #[arg(required_unless_present = "list")]
        action: Option<String>,
        /// Input project file
        #[arg(required_unless_present = "list")]
        input: Option<PathBuf>,
        /// Action parameters as a JSON object
        #[arg(short, long)]
        params: Option<String>,
        /// Layer to make active before running
        #[arg(short, long)]
        layer: Option<String>,
        /// Output project file (default: overwrite input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// List the available actions and exit
        #[arg(long)]
        list: bool,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn load_host(path: &Path, layer: Option<&str>) -> Result<MemoryHost> {
    let pb = spinner("Reading project...");
    let mut project: Project = read_project(path)
        .with_context(|| format!("Failed to read project {}", path.display()))?;
    pb.finish_and_clear();
    if let Some(name) = layer {
        project
            .set_active(name)
            .with_context(|| format!("Cannot activate layer '{}'", name))?;
    }
    info!("Project: {} layers", project.layer_count());
    Ok(MemoryHost::new(project))
}

fn save_host(host: MemoryHost, path: &Path) -> Result<()> {
    let pb = spinner("Writing project...");
    write_project(&host.into_project(), path)
        .with_context(|| format!("Failed to write project {}", path.display()))?;
    pb.finish_and_clear();
    Ok(())
}

fn run_action(
    action: &dyn Action,
    host: &mut MemoryHost,
    params: Option<&serde_json::Value>,
) -> ActionResult {
    let pb = spinner(action.description());
    let start = Instant::now();
    let result = action.run(host, params);
    pb.finish_and_clear();
    debug!(
        action = action.id(),
        status = %result.status,
        elapsed = ?start.elapsed(),
        "action finished"
    );
    result
}

fn report(result: &ActionResult) {
    println!("[{}] {}", result.status, result.message);
}

/// Print the result and write the project back unless the action failed.
///
/// Returns `true` when the action ended in an error.
fn finish(
    host: MemoryHost,
    result: &ActionResult,
    input: &Path,
    output: Option<&Path>,
) -> Result<bool> {
    report(result);
    if result.status == Status::Error {
        return Ok(true);
    }
    let target = output.unwrap_or(input);
    save_host(host, target)?;
    println!("Project saved to: {}", target.display());
    Ok(false)
}

fn parse_json_params(params: Option<&str>) -> Result<Option<serde_json::Value>> {
    params
        .map(|s| serde_json::from_str(s).context("--params must be a JSON object"))
        .transpose()
}

fn print_info(input: &Path, project: &Project) {
    println!("File: {}", input.display());
    println!("Layers: {}", project.layer_count());
    for layer in project.layers() {
        let marker = if project.active_name() == Some(layer.name()) { "*" } else { " " };
        let kind = match layer.kind() {
            LayerKind::Vector(g) => format!("{:?}", g).to_lowercase(),
            LayerKind::Raster => "raster".to_string(),
        };
        println!(
            "{} {} ({}, {}, {} features, {} selected)",
            marker,
            layer.name(),
            kind,
            layer.crs(),
            layer.feature_count(),
            layer.selected_count()
        );
        if let Some(e) = layer.extent() {
            println!(
                "    Extent: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                e.min_x, e.min_y, e.max_x, e.max_y
            );
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let failed = match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let host = load_host(&input, None)?;
            print_info(&input, host.project());
            false
        }

        // ── Actions ──────────────────────────────────────────────────
        Commands::Repair {
            input,
            layer,
            remove_empty,
            output,
        } => {
            let mut host = load_host(&input, layer.as_deref())?;
            let params = serde_json::json!({ "remove_empty": remove_empty });
            let result = run_action(&RepairGeometries::default(), &mut host, Some(&params));
            finish(host, &result, &input, output.as_deref())?
        }
        Commands::Rings {
            input,
            layer,
            initial_distance,
            increment,
            ring_count,
            output,
        } => {
            let mut host = load_host(&input, layer.as_deref())?;
            let params = serde_json::json!({
                "initial_distance": initial_distance,
                "increment": increment,
                "ring_count": ring_count,
            });
            let result = run_action(&BufferRings, &mut host, Some(&params));
            finish(host, &result, &input, output.as_deref())?
        }
        Commands::Zoom { input, layer } => {
            let mut host = load_host(&input, layer.as_deref())?;
            let result = run_action(&ZoomToLayer, &mut host, None);
            report(&result);
            if let Some(e) = host.canvas_extent() {
                println!(
                    "Canvas extent: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                    e.min_x, e.min_y, e.max_x, e.max_y
                );
            }
            result.status == Status::Error
        }
        Commands::Run {
            action,
            input,
            params,
            layer,
            output,
            list,
        } => {
            if list {
                for a in registry() {
                    println!("{:<20} {}", a.id(), a.description());
                }
                return Ok(());
            }
            let id = action.context("missing action id")?;
            let input = input.context("missing project file")?;
            let action = find_action(&id).with_context(|| format!("Unknown action: {}", id))?;
            let params = parse_json_params(params.as_deref())?;
            let mut host = load_host(&input, layer.as_deref())?;
            let result = run_action(action.as_ref(), &mut host, params.as_ref());
            finish(host, &result, &input, output.as_deref())?
        }
    };

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
