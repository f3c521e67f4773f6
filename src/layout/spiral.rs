use super::{rescale_layout, translate, Capabilities, LayoutAlgorithm, LayoutInput};

/// Archimedean spiral in insertion order. Purely geometric, 2-D only.
pub struct Spiral {
    /// Radians between consecutive nodes
    pub resolution: f64,
}

impl Default for Spiral {
    fn default() -> Self {
        Self { resolution: 0.35 }
    }
}

impl LayoutAlgorithm for Spiral {
    fn name(&self) -> &'static str {
        "spiral"
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

        let mut pos: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                let dist = i as f64;
                let angle = self.resolution * dist;
                vec![dist * angle.cos(), dist * angle.sin()]
            })
            .collect();

        rescale_layout(&mut pos, input.scale);
        translate(&mut pos, &center);
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tests::{input, letters_graph};
    use crate::layout::Anchoring;

    #[test]
    fn test_spiral_moves_outward() {
        let g = letters_graph(&[("A", "B", 1), ("B", "C", 1), ("C", "D", 1)], false);
        let pos = Spiral::default().layout(&input(&g, Anchoring::Free, 2));
        assert_eq!(pos.len(), 4);

        // undo centering: distance between consecutive points grows
        let gaps: Vec<f64> = pos
            .windows(2)
            .map(|w| (w[1][0] - w[0][0]).hypot(w[1][1] - w[0][1]))
            .collect();
        assert!(gaps[2] > gaps[0]);
    }

    #[test]
    fn test_center_hint_shifts_mean() {
        let g = letters_graph(&[("A", "B", 1), ("B", "C", 1)], false);
        let pos = Spiral::default().layout(&input(&g, Anchoring::Center(vec![3.0, -1.0]), 2));
        let mean_x = pos.iter().map(|p| p[0]).sum::<f64>() / 3.0;
        let mean_y = pos.iter().map(|p| p[1]).sum::<f64>() / 3.0;
        assert!((mean_x - 3.0).abs() < 1e-9);
        assert!((mean_y + 1.0).abs() < 1e-9);
    }
}
