//! Social Map CLI - lay out a letters table for rendering.

use anyhow::{Context, Result};
use clap::{Args, Parser, ValueEnum};
use socialmap::export;
use socialmap::pipeline;
use socialmap::{CentralitySelect, Configuration, LayoutSelect, SocialMapError};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "socialmap")]
#[command(about = "Lay out a letter-exchange network around its most central writers")]
#[command(version)]
struct Cli {
    /// JSON config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run the full pipeline and write the scene for the renderer
    Layout {
        #[command(flatten)]
        overrides: Overrides,

        /// Scene JSON output (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write Graphviz DOT with pinned positions
        #[arg(long)]
        dot: Option<PathBuf>,
    },

    /// Print centrality scores and the anchors they select
    Rank {
        #[command(flatten)]
        overrides: Overrides,
    },
}

#[derive(Args)]
struct Overrides {
    /// Letters table (CSV, first column names the writer)
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Build a directed graph
    #[arg(long)]
    directed: bool,

    /// Minimum letters for an edge to be kept
    #[arg(short, long)]
    threshold: Option<i64>,

    #[arg(short, long, value_enum)]
    centrality: Option<CentralityArg>,

    /// Explicitly positioned central nodes (0 - 4)
    #[arg(short, long)]
    anchors: Option<usize>,

    #[arg(short, long, value_enum)]
    layout: Option<LayoutArg>,

    #[arg(long)]
    scale: Option<f64>,

    #[arg(long)]
    dimensions: Option<usize>,

    /// Log base for edge widths
    #[arg(long)]
    edge_weight_factor: Option<f64>,

    /// Seed for randomized layouts
    #[arg(short = 'S', long)]
    seed: Option<u64>,

    #[arg(long)]
    title: Option<String>,
}

#[derive(Clone, Copy, ValueEnum, Debug)]
enum CentralityArg {
    Betweenness,
    Load,
    Eigenvector,
    None,
}

impl CentralityArg {
    fn to_select(self) -> CentralitySelect {
        match self {
            CentralityArg::Betweenness => CentralitySelect::Betweenness,
            CentralityArg::Load => CentralitySelect::Load,
            CentralityArg::Eigenvector => CentralitySelect::Eigenvector,
            CentralityArg::None => CentralitySelect::None,
        }
    }
}

#[derive(Clone, Copy, ValueEnum, Debug)]
enum LayoutArg {
    /// Fruchterman-Reingold force-directed
    #[value(alias = "force-directed")]
    Spring,
    KamadaKawai,
    Spectral,
    Spiral,
    Circular,
}

impl LayoutArg {
    fn to_select(self) -> LayoutSelect {
        match self {
            LayoutArg::Spring => LayoutSelect::Spring,
            LayoutArg::KamadaKawai => LayoutSelect::KamadaKawai,
            LayoutArg::Spectral => LayoutSelect::Spectral,
            LayoutArg::Spiral => LayoutSelect::Spiral,
            LayoutArg::Circular => LayoutSelect::Circular,
        }
    }
}

impl Overrides {
    fn apply(&self, config: &mut Configuration) {
        if let Some(source) = &self.source {
            config.source_file = source.clone();
        }
        if self.directed {
            config.graph_directional = true;
        }
        if let Some(threshold) = self.threshold {
            config.display_threshold = threshold;
        }
        if let Some(centrality) = self.centrality {
            config.centrality_select = centrality.to_select();
        }
        if let Some(anchors) = self.anchors {
            config.centrality_nodes = anchors;
        }
        if let Some(layout) = self.layout {
            config.layout_select = layout.to_select();
        }
        if let Some(scale) = self.scale {
            config.graph_scale = scale;
        }
        if let Some(dimensions) = self.dimensions {
            config.graph_dimensions = dimensions;
        }
        if let Some(factor) = self.edge_weight_factor {
            config.edge_weight_factor = factor;
        }
        if self.seed.is_some() {
            config.layout_seed = self.seed;
        }
        if let Some(title) = &self.title {
            config.render.graph_title = title.clone();
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("socialmap=info".parse().expect("static directive")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<SocialMapError>() {
                Some(load @ SocialMapError::DataLoad { .. }) => eprintln!("invalid source: {load}"),
                Some(config @ SocialMapError::Config(_)) => eprintln!("invalid config: {config}"),
                _ => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Configuration::load(cli.config.as_deref())
        .with_context(|| "failed to read configuration")?;

    match cli.command {
        Commands::Layout {
            overrides,
            output,
            dot,
        } => {
            overrides.apply(&mut config);
            let map = pipeline::run(&config)?;

            let scene = export::scene_json(&map)?;
            match &output {
                Some(path) => export::write_file(path, &scene)?,
                None => println!("{scene}"),
            }
            if let Some(path) = &dot {
                export::write_file(path, &export::dot_source(&map))?;
            }

            eprintln!(
                "{}: {} nodes, {} edges, {} anchors ({} layout)",
                map.hints.graph_title,
                map.graph.node_count(),
                map.graph.edge_count(),
                map.anchors.len(),
                map.layout.name(),
            );
        }

        Commands::Rank { overrides } => {
            overrides.apply(&mut config);
            config.validate()?;

            let edges = socialmap::loader::read_edges(&config.source_file)?;
            let graph = pipeline::filtered_graph(&config, &edges);
            let (scores, ranked) = pipeline::rank_anchors(&graph, &config);

            let Some(scores) = scores else {
                println!("Centrality ranking is switched off.");
                return Ok(());
            };

            let mut rows: Vec<(&str, f64)> = scores.iter().collect();
            rows.sort_by(|a, b| b.1.total_cmp(&a.1));
            for (name, score) in rows {
                println!("{score:>10.6}  {name}");
            }

            println!("\nspread {:.6}", ranked.spread);
            for (i, (name, score)) in ranked.picks.iter().enumerate() {
                println!("anchor {}: {} ({:.6})", i + 1, name, score);
            }
        }
    }

    Ok(())
}
