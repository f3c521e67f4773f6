//! Hand-off formats for the external renderer.

use crate::anchors::Anchor;
use crate::config::RenderHints;
use crate::error::{Result, SocialMapError};
use crate::layout::PositionMap;
use crate::pipeline::SocialMap;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{EdgeIndex, Graph};
use petgraph::visit::EdgeRef;
use petgraph::{EdgeType, Undirected};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct Scene<'a> {
    pub title: &'a str,
    pub directed: bool,
    pub layout: &'static str,
    pub hints: SceneHints<'a>,
    pub nodes: Vec<SceneNode<'a>>,
    pub edges: Vec<SceneEdge<'a>>,
    pub anchors: Vec<&'a Anchor>,
}

#[derive(Debug, Serialize)]
pub struct SceneHints<'a> {
    #[serde(flatten)]
    pub render: &'a RenderHints,
    pub alpha: f64,
}

#[derive(Debug, Serialize)]
pub struct SceneNode<'a> {
    pub id: &'a str,
    pub position: &'a [f64],
    pub anchor: bool,
}

#[derive(Debug, Serialize)]
pub struct SceneEdge<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub weight: i64,
    pub width: u32,
}

impl SocialMap {
    pub fn scene(&self) -> Scene<'_> {
        let nodes = self
            .positions
            .iter()
            .map(|(id, position)| SceneNode {
                id,
                position,
                anchor: self.anchors.contains(id),
            })
            .collect();

        let edges = self
            .edge_widths
            .iter()
            .map(|e| SceneEdge {
                source: &e.source,
                target: &e.target,
                weight: e.weight,
                width: e.width,
            })
            .collect();

        Scene {
            title: &self.hints.graph_title,
            directed: self.graph.is_directed(),
            layout: self.layout.name(),
            hints: SceneHints {
                render: &self.hints,
                alpha: self.hints.alpha(),
            },
            nodes,
            edges,
            anchors: self.anchors.iter().collect(),
        }
    }
}

pub fn scene_json(map: &SocialMap) -> Result<String> {
    Ok(serde_json::to_string_pretty(&map.scene())?)
}

/// Graphviz source with pinned `pos` attributes and `penwidth` per edge,
/// ready for `neato -n`.
pub fn dot_source(map: &SocialMap) -> String {
    let widths: HashMap<(&str, &str), u32> = map
        .edge_widths
        .iter()
        .map(|e| ((e.source.as_str(), e.target.as_str()), e.width))
        .collect();

    let graph = map.graph.inner();
    let edge_widths: HashMap<EdgeIndex, u32> = graph
        .edge_references()
        .filter_map(|e| {
            let key = (graph[e.source()].as_str(), graph[e.target()].as_str());
            widths.get(&key).map(|&w| (e.id(), w))
        })
        .collect();

    if map.graph.is_directed() {
        render_dot(graph, &map.positions, &edge_widths)
    } else {
        let undirected: Graph<String, i64, Undirected> = graph.clone().into_edge_type();
        render_dot(&undirected, &map.positions, &edge_widths)
    }
}

fn render_dot<Ty: EdgeType>(
    graph: &Graph<String, i64, Ty>,
    positions: &PositionMap,
    widths: &HashMap<EdgeIndex, u32>,
) -> String {
    // one statement: the getters are temporaries borrowed by the Dot
    let source = format!(
        "{:?}",
        Dot::with_attr_getters(
            graph,
            &[Config::EdgeNoLabel, Config::NodeNoLabel],
            &|_, edge| {
                let width = widths.get(&edge.id()).copied().unwrap_or(1);
                format!("penwidth={} weight={}", width, edge.weight())
            },
            &|_, (_, name)| {
                let mut attrs = format!("label={:?}", name);
                if let Some(p) = positions.get(name) {
                    let x = p.first().copied().unwrap_or(0.0);
                    let y = p.get(1).copied().unwrap_or(0.0);
                    attrs.push_str(&format!(" pos=\"{:.4},{:.4}!\"", x, y));
                }
                attrs
            },
        )
    );
    source
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|source| SocialMapError::Io {
        source,
        path: path.to_path_buf(),
    })
}
