use super::{distance, rescale_layout, translate, Anchoring, Capabilities, LayoutAlgorithm, LayoutInput};
use rand::Rng;

/// Fruchterman-Reingold force-directed layout.
///
/// Edge weights scale the attraction along each edge. Pinned nodes take part
/// in the force computation but never move, and a pinned layout is returned in
/// the anchors' own coordinate frame rather than rescaled.
pub struct Spring {
    pub iterations: usize,
    /// Stop once the mean displacement per node drops below this
    pub threshold: f64,
}

impl Default for Spring {
    fn default() -> Self {
        Self {
            iterations: 50,
            threshold: 1.0e-4,
        }
    }
}

const MIN_DISTANCE: f64 = 0.01;

impl LayoutAlgorithm for Spring {
    fn name(&self) -> &'static str {
        "spring"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            weighted: true,
            pinned: true,
            center_hint: true,
        }
    }

    fn layout(&self, input: &LayoutInput) -> Vec<Vec<f64>> {
        let n = input.graph.node_count();
        let dim = input.dimensions;
        let center = input.center();
        if n <= 1 {
            return vec![center; n];
        }

        let mut rng = input.rng();
        let mut fixed = vec![false; n];

        let (mut pos, k) = match &input.anchoring {
            Anchoring::Pinned(pins) => {
                let dom_size = pins
                    .iter()
                    .flat_map(|(_, p)| p.iter().copied())
                    .fold(f64::NEG_INFINITY, f64::max);
                let dom_size = if dom_size.is_finite() && dom_size > 0.0 {
                    dom_size
                } else {
                    1.0
                };

                let mut pos: Vec<Vec<f64>> = (0..n)
                    .map(|_| {
                        (0..dim)
                            .map(|axis| rng.gen::<f64>() * dom_size + center[axis])
                            .collect()
                    })
                    .collect();
                for (idx, p) in pins {
                    pos[*idx] = p.clone();
                    fixed[*idx] = true;
                }
                (pos, dom_size / (n as f64).sqrt())
            }
            _ => {
                let pos = (0..n)
                    .map(|_| (0..dim).map(|_| rng.gen::<f64>()).collect())
                    .collect();
                (pos, (1.0 / n as f64).sqrt())
            }
        };

        let adjacency = input.adjacency_matrix();
        self.simulate(&mut pos, &adjacency, &fixed, k);

        if matches!(input.anchoring, Anchoring::Pinned(_)) {
            return pos;
        }
        rescale_layout(&mut pos, input.scale);
        translate(&mut pos, &center);
        pos
    }
}

impl Spring {
    fn simulate(&self, pos: &mut [Vec<f64>], adjacency: &[Vec<f64>], fixed: &[bool], k: f64) {
        let n = pos.len();
        let dim = pos[0].len();

        // initial temperature: a tenth of the widest axis
        let mut t = (0..dim)
            .map(|axis| {
                let (lo, hi) = pos.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                    (lo.min(p[axis]), hi.max(p[axis]))
                });
                hi - lo
            })
            .fold(0.0, f64::max)
            * 0.1;
        let dt = t / (self.iterations as f64 + 1.0);

        for _ in 0..self.iterations {
            let mut moves = vec![vec![0.0; dim]; n];

            for i in 0..n {
                let mut displacement = vec![0.0; dim];
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let d = distance(&pos[i], &pos[j]).max(MIN_DISTANCE);
                    let force = k * k / (d * d) - adjacency[i][j] * d / k;
                    for axis in 0..dim {
                        displacement[axis] += (pos[i][axis] - pos[j][axis]) * force;
                    }
                }

                if fixed[i] {
                    continue;
                }
                let length = displacement.iter().map(|c| c * c).sum::<f64>().sqrt();
                let length = if length < MIN_DISTANCE { 0.1 } else { length };
                for axis in 0..dim {
                    moves[i][axis] = displacement[axis] * t / length;
                }
            }

            let mut total = 0.0;
            for (p, m) in pos.iter_mut().zip(&moves) {
                for (c, delta) in p.iter_mut().zip(m) {
                    *c += delta;
                    total += delta * delta;
                }
            }

            t -= dt;
            if total.sqrt() / (n as f64) < self.threshold {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tests::{input, letters_graph};

    #[test]
    fn test_same_seed_same_layout() {
        let g = letters_graph(&[("A", "B", 4), ("B", "C", 2), ("C", "D", 9)], false);
        let first = Spring::default().layout(&input(&g, Anchoring::Free, 2));
        let second = Spring::default().layout(&input(&g, Anchoring::Free, 2));
        assert_eq!(first, second);
    }

    #[test]
    fn test_heavy_edge_pulls_tighter() {
        let g = letters_graph(&[("A", "B", 50), ("B", "C", 1)], false);
        let pos = Spring {
            iterations: 200,
            threshold: 0.0,
        }
        .layout(&input(&g, Anchoring::Free, 2));

        let ab = distance(&pos[0], &pos[1]);
        let bc = distance(&pos[1], &pos[2]);
        assert!(ab < bc);
    }

    #[test]
    fn test_pinned_nodes_do_not_move() {
        let g = letters_graph(&[("A", "B", 4), ("B", "C", 2), ("C", "D", 9)], false);
        let pins = vec![(1, vec![0.5, 0.0]), (3, vec![-0.7, 0.1])];
        let pos = Spring::default().layout(&input(&g, Anchoring::Pinned(pins), 2));
        assert_eq!(pos[1], vec![0.5, 0.0]);
        assert_eq!(pos[3], vec![-0.7, 0.1]);
    }

    #[test]
    fn test_three_dimensions() {
        let g = letters_graph(&[("A", "B", 4), ("B", "C", 2)], true);
        let pos = Spring::default().layout(&input(&g, Anchoring::Free, 3));
        assert!(pos.iter().all(|p| p.len() == 3));
    }
}
