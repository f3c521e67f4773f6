use crate::error::{Result, SocialMapError};
use crate::graph::{Edge, SocialGraph};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeWidth {
    pub source: String,
    pub target: String,
    pub weight: i64,
    pub width: u32,
}

/// `max(1, floor(log_base(weight)))`.
///
/// # Errors
/// [`SocialMapError::DegenerateWeight`] when `weight < 1` or `base <= 1`, where
/// the logarithm is undefined or meaningless.
pub fn edge_width(weight: i64, base: f64) -> Result<u32> {
    if weight < 1 || !base.is_finite() || base <= 1.0 {
        return Err(SocialMapError::DegenerateWeight { weight, base });
    }
    let width = ((weight as f64).ln() / base.ln()).floor();
    Ok(width.max(1.0) as u32)
}

/// Widths for every edge still in the graph, in edge order.
pub fn resolve_widths(graph: &SocialGraph, base: f64) -> Result<Vec<EdgeWidth>> {
    graph
        .edges()
        .map(|Edge { source, target, weight }| {
            Ok(EdgeWidth {
                width: edge_width(weight, base)?,
                source,
                target,
                weight,
            })
        })
        .collect()
}
