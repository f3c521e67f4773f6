//! Layout algorithms and the adapter that feeds them anchors.
//!
//! Each algorithm declares through [`Capabilities`] which inputs it accepts.
//! [`compute_positions`] offers weights and anchors accordingly: pinned anchor
//! coordinates when the algorithm supports them, otherwise the most central
//! anchor as a center hint, otherwise nothing.

pub mod circular;
pub mod kamada_kawai;
pub mod spectral;
pub mod spiral;
pub mod spring;

use crate::anchors::AnchorSet;
use crate::config::LayoutSelect;
use crate::graph::SocialGraph;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing::debug;

pub use circular::Circular;
pub use kamada_kawai::KamadaKawai;
pub use spectral::Spectral;
pub use spiral::Spiral;
pub use spring::Spring;

/// Final coordinate of every node, keyed by node name.
pub type PositionMap = BTreeMap<String, Vec<f64>>;

/// Inputs a layout algorithm is able to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub weighted: bool,
    pub pinned: bool,
    pub center_hint: bool,
}

/// How anchors reach the algorithm.
#[derive(Debug, Clone, PartialEq)]
pub enum Anchoring {
    Free,
    Center(Vec<f64>),
    /// `(node position, coordinate)` pairs the algorithm must not move
    Pinned(Vec<(usize, Vec<f64>)>),
}

pub struct LayoutInput<'a> {
    pub graph: &'a SocialGraph,
    pub weighted: bool,
    pub anchoring: Anchoring,
    pub scale: f64,
    pub dimensions: usize,
    pub seed: Option<u64>,
}

impl LayoutInput<'_> {
    /// The center hint, or the origin.
    pub fn center(&self) -> Vec<f64> {
        match &self.anchoring {
            Anchoring::Center(center) => center.clone(),
            _ => vec![0.0; self.dimensions],
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Adjacency matrix, with weights only when the algorithm asked for them.
    pub fn adjacency_matrix(&self) -> Vec<Vec<f64>> {
        self.graph.adjacency_matrix(self.weighted)
    }
}

/// Trait for all layout algorithms.
pub trait LayoutAlgorithm {
    fn name(&self) -> &'static str;

    fn capabilities(&self) -> Capabilities;

    /// One coordinate vector of length `input.dimensions` per node, indexed by
    /// node position. Must not assume inputs outside its capabilities.
    fn layout(&self, input: &LayoutInput) -> Vec<Vec<f64>>;
}

impl LayoutSelect {
    pub fn algorithm(&self) -> Box<dyn LayoutAlgorithm> {
        match self {
            LayoutSelect::Spring => Box::new(Spring::default()),
            LayoutSelect::KamadaKawai => Box::new(KamadaKawai::default()),
            LayoutSelect::Spectral => Box::new(Spectral),
            LayoutSelect::Spiral => Box::new(Spiral::default()),
            LayoutSelect::Circular => Box::new(Circular),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub scale: f64,
    pub dimensions: usize,
    pub seed: Option<u64>,
}

/// Places every node of `graph`, negotiating weights and anchors with
/// `algorithm`. The graph is only read.
pub fn compute_positions(
    graph: &SocialGraph,
    algorithm: &dyn LayoutAlgorithm,
    anchors: &AnchorSet,
    params: &LayoutParams,
) -> PositionMap {
    let caps = algorithm.capabilities();
    let anchoring = negotiate(graph, caps, anchors, params.dimensions);

    debug!(
        layout = algorithm.name(),
        weighted = caps.weighted,
        anchoring = ?anchoring,
        "running layout"
    );

    let input = LayoutInput {
        graph,
        weighted: caps.weighted,
        anchoring,
        scale: params.scale,
        dimensions: params.dimensions,
        seed: params.seed,
    };
    let coords = algorithm.layout(&input);

    graph
        .node_names()
        .into_iter()
        .zip(coords)
        .map(|(name, coord)| (name.to_string(), coord))
        .collect()
}

fn negotiate(
    graph: &SocialGraph,
    caps: Capabilities,
    anchors: &AnchorSet,
    dimensions: usize,
) -> Anchoring {
    if anchors.is_empty() {
        return Anchoring::Free;
    }

    if caps.pinned {
        let pins = anchors
            .iter()
            .filter_map(|a| {
                let idx = graph.position_of(&a.node)?;
                Some((idx, pad(&a.position, dimensions)))
            })
            .collect();
        return Anchoring::Pinned(pins);
    }

    match anchors.center() {
        Some(center) if caps.center_hint => Anchoring::Center(pad(&center.position, dimensions)),
        _ => Anchoring::Free,
    }
}

/// Fits a 2-D anchor coordinate to `dimensions` axes.
pub fn pad(point: &[f64], dimensions: usize) -> Vec<f64> {
    (0..dimensions)
        .map(|axis| point.get(axis).copied().unwrap_or(0.0))
        .collect()
}

/// Centers every axis on zero and scales so the largest absolute coordinate
/// equals `scale`.
pub fn rescale_layout(pos: &mut [Vec<f64>], scale: f64) {
    let Some(dims) = pos.first().map(Vec::len) else {
        return;
    };

    let n = pos.len() as f64;
    let mut lim: f64 = 0.0;
    for axis in 0..dims {
        let mean = pos.iter().map(|p| p[axis]).sum::<f64>() / n;
        for p in pos.iter_mut() {
            p[axis] -= mean;
            lim = lim.max(p[axis].abs());
        }
    }

    if lim > 0.0 {
        for p in pos.iter_mut() {
            for c in p.iter_mut() {
                *c *= scale / lim;
            }
        }
    }
}

pub fn translate(pos: &mut [Vec<f64>], center: &[f64]) {
    for p in pos.iter_mut() {
        for (c, offset) in p.iter_mut().zip(center) {
            *c += offset;
        }
    }
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
