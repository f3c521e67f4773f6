use super::{rescale_layout, translate, Capabilities, LayoutAlgorithm, LayoutInput};
use std::f64::consts::PI;

/// Nodes evenly spaced on a circle in insertion order.
pub struct Circular;

/// Unit circle positions in the first two axes, zeros elsewhere.
pub(crate) fn unit_circle(n: usize, dimensions: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| {
            let theta = i as f64 / n as f64 * 2.0 * PI;
            let mut p = vec![0.0; dimensions];
            p[0] = theta.cos();
            if dimensions > 1 {
                p[1] = theta.sin();
            }
            p
        })
        .collect()
}

impl LayoutAlgorithm for Circular {
    fn name(&self) -> &'static str {
        "circular"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            weighted: false,
            pinned: false,
            center_hint: true,
        }
    }

    fn layout(&self, input: &LayoutInput) -> Vec<Vec<f64>> {
        let n = input.graph.node_count();
        let center = input.center();
        if n <= 1 {
            return vec![center; n];
        }

        let mut pos = unit_circle(n, input.dimensions);
        rescale_layout(&mut pos, input.scale);
        translate(&mut pos, &center);
        pos
    }
}
