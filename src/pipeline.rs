//! One complete layout run.
//!
//! Everything is built fresh from the configuration and the table, and the
//! caller only sees the result once every stage has finished.

use crate::anchors::AnchorSet;
use crate::centrality::{self, CentralityScores, RankedAnchors};
use crate::config::{Configuration, LayoutSelect, RenderHints};
use crate::edges::{self, EdgeWidth};
use crate::error::Result;
use crate::graph::SocialGraph;
use crate::layout::{self, LayoutParams, PositionMap};
use crate::loader::{self, RawEdge};
use tracing::info;

/// Everything the renderer needs for one figure.
#[derive(Debug, Clone)]
pub struct SocialMap {
    pub graph: SocialGraph,
    pub scores: Option<CentralityScores>,
    pub ranked: RankedAnchors,
    pub anchors: AnchorSet,
    pub layout: LayoutSelect,
    pub positions: PositionMap,
    pub edge_widths: Vec<EdgeWidth>,
    pub hints: RenderHints,
}

/// Loads the table named by `config` and lays it out.
pub fn run(config: &Configuration) -> Result<SocialMap> {
    let edges = loader::read_edges(&config.source_file)?;
    run_with_edges(config, &edges)
}

/// Same as [`run`] for a table that is already in memory. The configuration
/// is validated before any graph work.
pub fn run_with_edges(config: &Configuration, edges: &[RawEdge]) -> Result<SocialMap> {
    config.validate()?;

    let graph = filtered_graph(config, edges);
    // widths first: a bad weight must fail the run before any layout work
    let edge_widths = edges::resolve_widths(&graph, config.edge_weight_factor)?;

    let (scores, ranked) = rank_anchors(&graph, config);
    let anchors = AnchorSet::place(&ranked);

    let params = LayoutParams {
        scale: config.graph_scale,
        dimensions: config.graph_dimensions,
        seed: config.layout_seed,
    };
    let algorithm = config.layout_select.algorithm();
    let positions = layout::compute_positions(&graph, algorithm.as_ref(), &anchors, &params);

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        anchors = anchors.len(),
        layout = algorithm.name(),
        "social map ready"
    );

    Ok(SocialMap {
        graph,
        scores,
        ranked,
        anchors,
        layout: config.layout_select,
        positions,
        edge_widths,
        hints: config.render.clone(),
    })
}

/// Builds the graph and drops edges under the display threshold.
pub fn filtered_graph(config: &Configuration, edges: &[RawEdge]) -> SocialGraph {
    let mut graph = SocialGraph::build(edges, config.graph_directional);
    graph.filter(config.display_threshold);
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        threshold = config.display_threshold,
        "graph built"
    );
    graph
}

/// Scores `graph` and picks anchors; no anchors when ranking is switched off.
pub fn rank_anchors(
    graph: &SocialGraph,
    config: &Configuration,
) -> (Option<CentralityScores>, RankedAnchors) {
    let Some(scores) = centrality::rank(graph, config.centrality_select) else {
        return (None, RankedAnchors::default());
    };
    let ranked = centrality::select_anchors(&scores, config.centrality_nodes);
    (Some(scores), ranked)
}
