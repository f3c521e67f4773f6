use super::circular::unit_circle;
use super::{distance, rescale_layout, translate, Capabilities, LayoutAlgorithm, LayoutInput};
use crate::graph::SocialGraph;
use petgraph::algo::dijkstra;
use petgraph::graph::Graph;
use petgraph::{EdgeType, Undirected};
use rand::Rng;

/// Kamada-Kawai path-length layout.
///
/// Node separations are fitted to weighted shortest-path distances, so a
/// heavy edge reads as a long path. Pairs with no path get a distance of
/// [`UNREACHABLE`], which leaves them nearly unconstrained.
pub struct KamadaKawai {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for KamadaKawai {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1.0e-6,
        }
    }
}

pub const UNREACHABLE: f64 = 1.0e6;
const MEAN_WEIGHT: f64 = 1.0e-3;
const SELF_DISTANCE: f64 = 1.0e-3;

impl LayoutAlgorithm for KamadaKawai {
    fn name(&self) -> &'static str {
        "kamada-kawai"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            weighted: true,
            pinned: false,
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

        let inv_dist: Vec<Vec<f64>> = shortest_paths(input.graph, input.weighted)
            .into_iter()
            .map(|row| row.into_iter().map(|d| 1.0 / d.max(SELF_DISTANCE)).collect())
            .collect();

        let mut pos = match dim {
            1 => (0..n)
                .map(|i| vec![i as f64 / (n - 1) as f64])
                .collect(),
            2 => unit_circle(n, 2),
            _ => {
                let mut rng = input.rng();
                (0..n)
                    .map(|_| (0..dim).map(|_| rng.gen::<f64>()).collect())
                    .collect()
            }
        };

        self.minimize(&mut pos, &inv_dist);

        rescale_layout(&mut pos, input.scale);
        translate(&mut pos, &center);
        pos
    }
}

impl KamadaKawai {
    /// Gradient descent with a backtracking line search.
    fn minimize(&self, pos: &mut Vec<Vec<f64>>, inv_dist: &[Vec<f64>]) {
        let mut step = 1.0;
        let (mut cost, mut grad) = energy(pos, inv_dist);

        for _ in 0..self.max_iterations {
            let grad_norm2: f64 = grad.iter().flatten().map(|g| g * g).sum();
            if grad_norm2.sqrt() < self.tolerance {
                break;
            }

            let mut accepted = false;
            while step > 1.0e-12 {
                let candidate: Vec<Vec<f64>> = pos
                    .iter()
                    .zip(&grad)
                    .map(|(p, g)| p.iter().zip(g).map(|(c, d)| c - step * d).collect())
                    .collect();
                let (next_cost, next_grad) = energy(&candidate, inv_dist);

                // Armijo condition
                if next_cost <= cost - 1.0e-4 * step * grad_norm2 {
                    *pos = candidate;
                    cost = next_cost;
                    grad = next_grad;
                    step *= 2.0;
                    accepted = true;
                    break;
                }
                step *= 0.5;
            }

            if !accepted {
                break;
            }
        }
    }
}

/// Stress energy and its gradient, plus a weak pull of the mean toward zero.
fn energy(pos: &[Vec<f64>], inv_dist: &[Vec<f64>]) -> (f64, Vec<Vec<f64>>) {
    let n = pos.len();
    let dim = pos[0].len();
    let mut cost = 0.0;
    let mut grad = vec![vec![0.0; dim]; n];

    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let separation = distance(&pos[i], &pos[j]);
            let offset = separation * inv_dist[i][j] - 1.0;
            cost += 0.5 * offset * offset;

            let coeff = inv_dist[i][j] * offset / (separation + f64::EPSILON);
            for axis in 0..dim {
                let pull = coeff * (pos[i][axis] - pos[j][axis]);
                grad[i][axis] += pull;
                grad[j][axis] -= pull;
            }
        }
    }

    let mut sum = vec![0.0; dim];
    for p in pos {
        for (s, c) in sum.iter_mut().zip(p) {
            *s += c;
        }
    }
    cost += 0.5 * MEAN_WEIGHT * sum.iter().map(|s| s * s).sum::<f64>();
    for g in grad.iter_mut() {
        for (c, s) in g.iter_mut().zip(&sum) {
            *c += MEAN_WEIGHT * s;
        }
    }

    (cost, grad)
}

/// Path lengths between every pair of nodes, by node position.
///
/// Undirected graphs are walked both ways; pairs with no path get
/// [`UNREACHABLE`].
pub fn shortest_paths(graph: &SocialGraph, weighted: bool) -> Vec<Vec<f64>> {
    let inner = graph.inner();
    if graph.is_directed() {
        all_pairs(inner, weighted)
    } else {
        let undirected: Graph<String, i64, Undirected> = inner.clone().into_edge_type();
        all_pairs(&undirected, weighted)
    }
}

fn all_pairs<Ty: EdgeType>(graph: &Graph<String, i64, Ty>, weighted: bool) -> Vec<Vec<f64>> {
    graph
        .node_indices()
        .map(|source| {
            let reached = dijkstra(graph, source, None, |e| {
                if weighted {
                    *e.weight() as f64
                } else {
                    1.0
                }
            });
            graph
                .node_indices()
                .map(|target| reached.get(&target).copied().unwrap_or(UNREACHABLE))
                .collect()
        })
        .collect()
}
