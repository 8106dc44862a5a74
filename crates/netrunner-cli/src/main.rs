//! Netrunner CLI
//!
//! Builds graphs from JSON record tables:
//! - `columns`: list a table's columns
//! - `build`: table + spec -> node-link JSON, optionally with degree,
//!   centrality, community and external algorithm-result overlays
//! - `join`: join two tables and union their graphs
//! - `degree`: per-node degree
//! - `export-plan`: label-grouped node and relationship batches for a loader
//!
//! JSON goes to stdout (or `--out`); status lines and logs go to stderr.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use netrunner_core::{analysis, AlgorithmResult, ExportPlan, JoinHow};
use tracing_subscriber::EnvFilter;

mod load;

use load::{build_engine, parse_key_value, parse_overlay, read_frame, read_labels, write_json};

#[derive(Parser)]
#[command(name = "netrunner")]
#[command(author, version, about = "Netrunner: project tables into graphs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the columns of a records table.
    Columns {
        #[arg(long)]
        table: PathBuf,
    },

    /// Build the graph described by a spec and print its node-link JSON.
    Build {
        #[arg(long)]
        table: PathBuf,
        #[arg(long)]
        spec: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Split a text column before indexing (`column=separator`, repeatable).
        #[arg(long, value_parser = parse_key_value)]
        explode: Vec<(String, String)>,
        /// Add node degree under `degree`.
        #[arg(long)]
        degree: bool,
        /// Add degree centrality under `centrality`.
        #[arg(long)]
        centrality: bool,
        /// Add connected-component index under `community`.
        #[arg(long)]
        communities: bool,
        /// Merge a tagged algorithm-result file under `name` (`name=path`, repeatable).
        #[arg(long, value_parser = parse_overlay)]
        overlay: Vec<(String, PathBuf)>,
    },

    /// Join two tables on a key and union their graphs.
    Join {
        #[arg(long)]
        left: PathBuf,
        #[arg(long)]
        left_spec: PathBuf,
        #[arg(long)]
        right: PathBuf,
        #[arg(long)]
        right_spec: PathBuf,
        #[arg(long)]
        left_on: String,
        #[arg(long)]
        right_on: String,
        /// left | right | inner | outer
        #[arg(long, default_value = "inner")]
        how: JoinHow,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print `node<TAB>degree` for every node, in graph order.
    Degree {
        #[arg(long)]
        table: PathBuf,
        #[arg(long)]
        spec: PathBuf,
    },

    /// Plan a graph-database export from a label mapping.
    ExportPlan {
        #[arg(long)]
        table: PathBuf,
        #[arg(long)]
        spec: PathBuf,
        #[arg(long)]
        labels: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("netrunner=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Columns { table } => cmd_columns(&table),
        Commands::Build {
            table,
            spec,
            out,
            explode,
            degree,
            centrality,
            communities,
            overlay,
        } => cmd_build(BuildArgs {
            table,
            spec,
            out,
            explode,
            degree,
            centrality,
            communities,
            overlay,
        }),
        Commands::Join {
            left,
            left_spec,
            right,
            right_spec,
            left_on,
            right_on,
            how,
            out,
        } => {
            let mut nf = build_engine(&left, &left_spec, &[])?;
            let other = build_engine(&right, &right_spec, &[])?;
            nf.join_all(&other, &left_on, &right_on, how)?;
            eprintln!(
                "{} {} rows, {} nodes, {} edges ({how})",
                "Joined".green().bold(),
                nf.frame().len(),
                nf.graph().node_count(),
                nf.graph().edge_count()
            );
            write_json(&nf.to_document(), out.as_deref())
        }
        Commands::Degree { table, spec } => {
            let nf = build_engine(&table, &spec, &[])?;
            if let AlgorithmResult::PairSequence(pairs) = analysis::degree(nf.graph()) {
                for (node, degree) in pairs {
                    println!("{node}\t{degree}");
                }
            }
            Ok(())
        }
        Commands::ExportPlan {
            table,
            spec,
            labels,
            out,
        } => {
            let nf = build_engine(&table, &spec, &[])?;
            let labels = read_labels(&labels)?;
            let plan = ExportPlan::build(&nf, &labels)?;
            eprintln!(
                "{} {} node batches, {} relationship batches",
                "Planned".green().bold(),
                plan.node_batches.len(),
                plan.relationship_batches.len()
            );
            write_json(&plan, out.as_deref())
        }
    }
}

fn cmd_columns(table: &Path) -> Result<()> {
    let frame = read_frame(table)?;
    for column in frame.columns() {
        println!("{column}");
    }
    Ok(())
}

struct BuildArgs {
    table: PathBuf,
    spec: PathBuf,
    out: Option<PathBuf>,
    explode: Vec<(String, String)>,
    degree: bool,
    centrality: bool,
    communities: bool,
    overlay: Vec<(String, PathBuf)>,
}

fn cmd_build(args: BuildArgs) -> Result<()> {
    let mut nf = build_engine(&args.table, &args.spec, &args.explode)?;

    // Measures are computed on the graph as built, before any of them is
    // merged back.
    let mut measures = Vec::new();
    if args.degree {
        measures.push(("degree", analysis::degree(nf.graph())));
    }
    if args.centrality {
        measures.push(("centrality", analysis::degree_centrality(nf.graph())));
    }
    if args.communities {
        measures.push(("community", analysis::connected_components(nf.graph())));
    }
    for (name, result) in &measures {
        nf.apply_result(result, name);
    }
    for (name, path) in &args.overlay {
        let result = load::read_result(path)?;
        let applied = nf.apply_result(&result, name);
        tracing::info!(attribute = %name, applied, "applied overlay");
    }

    eprintln!(
        "{} {} nodes, {} edges",
        "Built".green().bold(),
        nf.graph().node_count(),
        nf.graph().edge_count()
    );
    write_json(&nf.to_document(), args.out.as_deref())
}
