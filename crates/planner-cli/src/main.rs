use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use planner_core::{summarize, Board, Piece, PlanReport, Planner, Project};
use std::fs;
use std::path::{Path, PathBuf};

mod render;
mod report;
mod store;

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Cutting planner - lay out rectangular pieces on stock boards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a cut plan for a project
    Plan {
        /// Project file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the plan report (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Cap on scanned candidate positions before the run is cut short
        #[arg(long)]
        probe_budget: Option<u64>,
    },

    /// Render a plan as an SVG layout
    Render {
        /// Project file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Plan report from a previous run (JSON); replans when omitted
        #[arg(short, long)]
        results: Option<PathBuf>,

        /// Output SVG file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Write a printable HTML report of a plan
    Report {
        /// Project file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Plan report from a previous run (JSON); replans when omitted
        #[arg(short, long)]
        results: Option<PathBuf>,

        /// Output HTML file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Save a project snapshot into the store
    Save {
        /// Project file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Key the snapshot is filed under
        #[arg(short, long)]
        key: String,

        /// Store directory
        #[arg(long, default_value = ".planner-store")]
        store: PathBuf,
    },

    /// Load a project snapshot from the store
    Load {
        /// Key of the saved snapshot
        #[arg(short, long)]
        key: String,

        /// Output project file (JSON); prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Store directory
        #[arg(long, default_value = ".planner-store")]
        store: PathBuf,
    },

    /// Add a piece to a project file
    AddPiece {
        /// Project file to edit in place
        #[arg(short, long)]
        project: PathBuf,

        #[arg(long)]
        id: String,

        #[arg(long, default_value_t = 50.0)]
        width: f64,

        #[arg(long, default_value_t = 30.0)]
        height: f64,

        #[arg(long, default_value_t = 1)]
        quantity: u32,

        /// Display color; picked from the palette when omitted
        #[arg(long)]
        color: Option<String>,
    },

    /// Remove a piece from a project file
    RemovePiece {
        /// Project file to edit in place
        #[arg(short, long)]
        project: PathBuf,

        #[arg(long)]
        id: String,
    },

    /// Add a board to a project file
    AddBoard {
        /// Project file to edit in place
        #[arg(short, long)]
        project: PathBuf,

        #[arg(long)]
        id: String,

        #[arg(long, default_value_t = 240.0)]
        width: f64,

        #[arg(long, default_value_t = 180.0)]
        height: f64,

        #[arg(long)]
        name: Option<String>,
    },

    /// Remove a board from a project file
    RemoveBoard {
        /// Project file to edit in place
        #[arg(short, long)]
        project: PathBuf,

        #[arg(long)]
        id: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            input,
            output,
            probe_budget,
        } => plan_command(input, output, probe_budget),
        Commands::Render {
            input,
            results,
            output,
        } => render_command(input, results, output),
        Commands::Report {
            input,
            results,
            output,
        } => report_command(input, results, output),
        Commands::Save { input, key, store } => save_command(input, key, store),
        Commands::Load { key, output, store } => load_command(key, output, store),
        Commands::AddPiece {
            project,
            id,
            width,
            height,
            quantity,
            color,
        } => add_piece_command(project, id, width, height, quantity, color),
        Commands::RemovePiece { project, id } => remove_piece_command(project, id),
        Commands::AddBoard {
            project,
            id,
            width,
            height,
            name,
        } => add_board_command(project, id, width, height, name),
        Commands::RemoveBoard { project, id } => remove_board_command(project, id),
    }
}

fn plan_command(input: PathBuf, output: Option<PathBuf>, probe_budget: Option<u64>) -> Result<()> {
    let project = read_project(&input)?;

    println!(
        "{} pieces, {} boards loaded",
        project.pieces.len().to_string().bright_white().bold(),
        project.boards.len().to_string().bright_white().bold()
    );
    if project.pieces.is_empty() {
        println!("{}", "No pieces in the project; nothing to place".yellow());
    }
    if project.boards.is_empty() {
        println!("{}", "No boards in the project; nothing to plan onto".yellow());
    }
    println!();

    let mut planner = Planner::new(
        project.boards.clone(),
        project.pieces.clone(),
        project.params.clone(),
    );
    if let Some(limit) = probe_budget {
        planner = planner.with_probe_budget(limit);
    }
    let results = planner.plan();
    let summary = summarize(&project.pieces, &results);

    println!("{}", "Boards:".bright_yellow().bold());
    for result in &results {
        let label = project
            .find_board(&result.board_id)
            .map(Board::label)
            .unwrap_or(result.board_id.as_str());
        let mut line = format!(
            "  {}: {} pieces ({:.2}% used)",
            label.bright_white(),
            result.placements.len(),
            100.0 - result.waste_percentage
        );
        if result.truncated {
            line.push_str(&format!(" {}", "[truncated]".red()));
        }
        println!("{line}");
    }
    println!();

    println!("{}", "Pieces:".bright_yellow().bold());
    for usage in &summary.piece_usage {
        let counts = format!("{} / {}", usage.placed, usage.requested);
        if usage.shortfall() > 0 {
            println!(
                "  {}: {} ({} short)",
                usage.piece_id.bright_white(),
                counts.red(),
                usage.shortfall()
            );
        } else {
            println!("  {}: {}", usage.piece_id.bright_white(), counts.bright_green());
        }
    }
    println!();

    println!(
        "  Total area: {:.2} cm² | used: {:.2} cm² | waste: {:.2}%",
        summary.total_area, summary.used_area, summary.waste_percentage
    );
    println!();

    let report = PlanReport { results, summary };
    let json = serde_json::to_string_pretty(&report)?;
    if let Some(path) = output {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("Saved plan report to {}", path.display().to_string().bright_white());
    } else {
        println!("{json}");
    }

    Ok(())
}

fn render_command(input: PathBuf, results: Option<PathBuf>, output: PathBuf) -> Result<()> {
    let project = read_project(&input)?;
    let results = resolve_results(&project, results)?;

    let svg = render::render_svg(&project, &results)?;
    fs::write(&output, svg).with_context(|| format!("writing {}", output.display()))?;

    println!(
        "{} Saved layout to {}",
        "Done.".bright_green(),
        output.display().to_string().bright_white()
    );
    Ok(())
}

fn report_command(input: PathBuf, results: Option<PathBuf>, output: PathBuf) -> Result<()> {
    let project = read_project(&input)?;
    let results = resolve_results(&project, results)?;
    let summary = summarize(&project.pieces, &results);

    let svg = render::render_svg(&project, &results)?;
    let html = report::render_html(&project, &results, &summary, &svg)?;
    fs::write(&output, html).with_context(|| format!("writing {}", output.display()))?;

    println!(
        "{} Saved print view to {}",
        "Done.".bright_green(),
        output.display().to_string().bright_white()
    );
    Ok(())
}

fn save_command(input: PathBuf, key: String, store_dir: PathBuf) -> Result<()> {
    let project = read_project(&input)?;
    let path = store::save(&store_dir, &key, &project)?;
    println!(
        "{} Saved project under '{}' ({})",
        "Done.".bright_green(),
        key.bright_white(),
        path.display()
    );
    Ok(())
}

fn load_command(key: String, output: Option<PathBuf>, store_dir: PathBuf) -> Result<()> {
    let project = store::load(&store_dir, &key)?;
    let json = serde_json::to_string_pretty(&project)?;
    if let Some(path) = output {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        println!(
            "{} Restored project '{}' to {}",
            "Done.".bright_green(),
            key.bright_white(),
            path.display()
        );
    } else {
        println!("{json}");
    }
    Ok(())
}

fn add_piece_command(
    path: PathBuf,
    id: String,
    width: f64,
    height: f64,
    quantity: u32,
    color: Option<String>,
) -> Result<()> {
    let mut project = read_project(&path)?;
    project.add_piece(Piece {
        id: id.clone(),
        width,
        height,
        quantity,
        color,
    })?;
    write_project(&path, &project)?;
    println!("Added piece {} ({}×{}, {} copies)", id.bright_white(), width, height, quantity);
    Ok(())
}

fn remove_piece_command(path: PathBuf, id: String) -> Result<()> {
    let mut project = read_project(&path)?;
    project.remove_piece(&id)?;
    write_project(&path, &project)?;
    println!("Removed piece {}", id.bright_white());
    Ok(())
}

fn add_board_command(
    path: PathBuf,
    id: String,
    width: f64,
    height: f64,
    name: Option<String>,
) -> Result<()> {
    let mut project = read_project(&path)?;
    project.add_board(Board {
        id: id.clone(),
        width,
        height,
        name: name.unwrap_or_default(),
    })?;
    write_project(&path, &project)?;
    println!("Added board {} ({}×{})", id.bright_white(), width, height);
    Ok(())
}

fn remove_board_command(path: PathBuf, id: String) -> Result<()> {
    let mut project = read_project(&path)?;
    project.remove_board(&id)?;
    write_project(&path, &project)?;
    println!("Removed board {}", id.bright_white());
    Ok(())
}

/// Reads a project snapshot, YAML or JSON by file extension.
fn read_project(path: &Path) -> Result<Project> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let project = if is_yaml(path) {
        serde_yaml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?
    } else {
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?
    };
    Ok(project)
}

/// Writes a project snapshot back in the format its extension names.
fn write_project(path: &Path, project: &Project) -> Result<()> {
    let content = if is_yaml(path) {
        serde_yaml::to_string(project)?
    } else {
        serde_json::to_string_pretty(project)?
    };
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Uses a stored plan report when one is given, otherwise replans from the
/// project's current state.
fn resolve_results(
    project: &Project,
    results: Option<PathBuf>,
) -> Result<Vec<planner_core::CutResult>> {
    match results {
        Some(path) => {
            let content =
                fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            let report: PlanReport = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            Ok(report.results)
        }
        None => Ok(project.plan()),
    }
}
