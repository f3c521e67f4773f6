//! Circular placement of the selected anchors.
//!
//! Anchors sit at evenly spaced angles, in selection order, at a radius of
//! `spread + sqrt(best - score) / spread`: the most central anchor lands
//! closest to the origin and weaker anchors drift outward.

use crate::centrality::RankedAnchors;
use serde::Serialize;
use std::f64::consts::PI;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anchor {
    pub node: String,
    pub score: f64,
    pub position: [f64; 2],
}

/// Placed anchors, in selection order. Built once and never changed.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnchorSet {
    anchors: Vec<Anchor>,
}

impl AnchorSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Places `ranked` on the circle.
    ///
    /// A zero (or non-finite) spread leaves the radius undefined, so no anchor
    /// is placed and the set comes back empty.
    pub fn place(ranked: &RankedAnchors) -> Self {
        let spread = ranked.spread;
        if ranked.is_empty() || !spread.is_finite() || spread <= 0.0 {
            if !ranked.is_empty() {
                debug!(spread, "degenerate score spread, anchors left unplaced");
            }
            return Self::empty();
        }

        let highest = ranked
            .picks
            .iter()
            .map(|(_, score)| *score)
            .fold(f64::NEG_INFINITY, f64::max);
        let step = 360.0 / ranked.len() as f64;

        let anchors = ranked
            .picks
            .iter()
            .enumerate()
            .map(|(i, (node, score))| {
                let radius = spread + (highest - score).sqrt() / spread;
                let theta = (i as f64 * step) * PI / 180.0;
                Anchor {
                    node: node.clone(),
                    score: *score,
                    position: [theta.cos() * radius, theta.sin() * radius],
                }
            })
            .collect();

        Self { anchors }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.iter()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn contains(&self, node: &str) -> bool {
        self.anchors.iter().any(|a| a.node == node)
    }

    /// The highest-scoring anchor; the first one on a tie.
    pub fn center(&self) -> Option<&Anchor> {
        let mut best: Option<&Anchor> = None;
        for anchor in &self.anchors {
            match best {
                Some(b) if b.score >= anchor.score => {}
                _ => best = Some(anchor),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(picks: &[(&str, f64)], spread: f64) -> RankedAnchors {
        RankedAnchors {
            picks: picks.iter().map(|(n, s)| (n.to_string(), *s)).collect(),
            spread,
        }
    }

    fn radius(anchor: &Anchor) -> f64 {
        anchor.position[0].hypot(anchor.position[1])
    }

    #[test]
    fn test_single_anchor_sits_on_axis_at_spread() {
        let set = AnchorSet::place(&ranked(&[("A", 0.8)], 0.25));
        let a = set.center().unwrap();
        assert_eq!(a.node, "A");
        assert_eq!(a.position, [0.25, 0.0]);
    }

    #[test]
    fn test_radius_grows_with_score_gap() {
        let set = AnchorSet::place(&ranked(&[("A", 10.0), ("B", 9.0)], 4.0));
        let anchors: Vec<&Anchor> = set.iter().collect();

        assert!((radius(anchors[0]) - 4.0).abs() < 1e-12);
        assert!((radius(anchors[1]) - 4.25).abs() < 1e-12);
        // second of two anchors sits at 180 degrees
        assert!((anchors[1].position[0] + 4.25).abs() < 1e-12);
        assert!(anchors[1].position[1].abs() < 1e-12);
    }

    #[test]
    fn test_center_has_smallest_radius() {
        let set = AnchorSet::place(&ranked(
            &[("A", 0.9), ("B", 0.7), ("C", 0.6), ("D", 0.2)],
            0.3,
        ));
        let center = set.center().unwrap();
        assert_eq!(center.node, "A");
        assert!(set.iter().all(|a| radius(center) <= radius(a)));
    }

    #[test]
    fn test_zero_spread_places_nothing() {
        let set = AnchorSet::place(&ranked(&[("A", 0.0), ("B", 0.0)], 0.0));
        assert!(set.is_empty());
    }

    #[test]
    fn test_placement_is_deterministic() {
        let picks = ranked(&[("A", 0.9), ("B", 0.7), ("C", 0.6)], 0.3);
        assert_eq!(AnchorSet::place(&picks), AnchorSet::place(&picks));
    }
}
