//! Node ranking and anchor selection.
//!
//! Scores are computed over the filtered graph, unweighted, following
//! out-edges in directed graphs. Betweenness never fails and is the fallback
//! whenever the selected algorithm cannot score the graph.

use crate::config::CentralitySelect;
use crate::error::CentralityError;
use crate::graph::SocialGraph;
use std::collections::VecDeque;
use tracing::{debug, warn};

const EIGENVECTOR_MAX_ITER: usize = 100;
const EIGENVECTOR_TOL: f64 = 1.0e-6;

/// Centrality score per node, in graph insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct CentralityScores {
    scores: Vec<(String, f64)>,
}

impl CentralityScores {
    fn from_values(graph: &SocialGraph, values: Vec<f64>) -> Self {
        let scores = graph
            .node_names()
            .into_iter()
            .map(str::to_string)
            .zip(values)
            .collect();
        Self { scores }
    }

    pub fn get(&self, node: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|(name, _)| name == node)
            .map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(name, score)| (name.as_str(), *score))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Population standard deviation of all scores.
    pub fn spread(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let n = self.scores.len() as f64;
        let mean = self.scores.iter().map(|(_, s)| s).sum::<f64>() / n;
        let variance = self
            .scores
            .iter()
            .map(|(_, s)| (s - mean).powi(2))
            .sum::<f64>()
            / n;
        variance.sqrt()
    }
}

/// Anchors picked by [`select_anchors`], highest score first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankedAnchors {
    pub picks: Vec<(String, f64)>,
    pub spread: f64,
}

impl RankedAnchors {
    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }
}

impl CentralitySelect {
    /// Runs the selected algorithm; `None` for [`CentralitySelect::None`].
    pub fn compute(
        &self,
        graph: &SocialGraph,
    ) -> Option<Result<CentralityScores, CentralityError>> {
        let values = match self {
            CentralitySelect::Betweenness => Ok(betweenness_centrality(graph)),
            CentralitySelect::Load => Ok(load_centrality(graph)),
            CentralitySelect::Eigenvector => eigenvector_centrality(graph),
            CentralitySelect::None => return None,
        };
        Some(values.map(|v| CentralityScores::from_values(graph, v)))
    }
}

/// Scores the graph with `select`, substituting betweenness when it fails.
pub fn rank(graph: &SocialGraph, select: CentralitySelect) -> Option<CentralityScores> {
    match select.compute(graph)? {
        Ok(scores) => Some(scores),
        Err(err) => {
            warn!(algorithm = ?select, %err, "centrality failed, using betweenness");
            Some(CentralityScores::from_values(
                graph,
                betweenness_centrality(graph),
            ))
        }
    }
}

/// Greedily takes the highest-scoring nodes, at most `max_anchors` of them.
///
/// After every pick the best anchor score is compared with the best remaining
/// candidate; a gap wider than the score spread ends the selection early.
pub fn select_anchors(scores: &CentralityScores, max_anchors: usize) -> RankedAnchors {
    let spread = scores.spread();
    let mut candidates: Vec<(&str, f64)> = scores.iter().collect();
    let mut picks: Vec<(String, f64)> = Vec::new();

    while picks.len() < max_anchors {
        let Some(best) = argmax(&candidates) else {
            break;
        };
        let (name, score) = candidates.remove(best);
        picks.push((name.to_string(), score));

        // picks are non-increasing, so the first is the best anchor
        let top = picks[0].1;
        match argmax(&candidates) {
            Some(next) if (top - candidates[next].1).abs() > spread => break,
            Some(_) => {}
            None => break,
        }
    }

    debug!(anchors = picks.len(), spread, "selected anchors");
    RankedAnchors { picks, spread }
}

// First maximum wins ties.
fn argmax(candidates: &[(&str, f64)]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, (_, score)) in candidates.iter().enumerate() {
        match best {
            Some(b) if candidates[b].1 >= *score => {}
            _ => best = Some(i),
        }
    }
    best
}

fn normalize_pairs(values: &mut [f64]) {
    let n = values.len();
    if n <= 2 {
        return;
    }
    let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
    for v in values.iter_mut() {
        *v *= scale;
    }
}

/// Brandes betweenness centrality, normalized.
pub fn betweenness_centrality(graph: &SocialGraph) -> Vec<f64> {
    let adj = graph.adjacency();
    let n = adj.len();
    let mut centrality = vec![0.0; n];

    for source in 0..n {
        let mut dist: Vec<i64> = vec![-1; n];
        let mut num_paths = vec![0.0; n];
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut stack = Vec::with_capacity(n);
        let mut queue = VecDeque::new();

        dist[source] = 0;
        num_paths[source] = 1.0;
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for &(w, _) in &adj[v] {
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    num_paths[w] += num_paths[v];
                    predecessors[w].push(v);
                }
            }
        }

        let mut dependency = vec![0.0; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                dependency[v] += num_paths[v] / num_paths[w] * (1.0 + dependency[w]);
            }
            if w != source {
                centrality[w] += dependency[w];
            }
        }
    }

    normalize_pairs(&mut centrality);
    centrality
}

/// Newman's load centrality, normalized like betweenness.
pub fn load_centrality(graph: &SocialGraph) -> Vec<f64> {
    let adj = graph.adjacency();
    let n = adj.len();
    let mut load = vec![0.0; n];

    for source in 0..n {
        let mut dist: Vec<i64> = vec![-1; n];
        let mut pred: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut order = Vec::with_capacity(n);
        let mut queue = VecDeque::new();

        dist[source] = 0;
        queue.push_back(source);
        while let Some(v) = queue.pop_front() {
            order.push(v);
            for &(w, _) in &adj[v] {
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 && !pred[w].contains(&v) {
                    pred[w].push(v);
                }
            }
        }

        let mut between = vec![0.0; n];
        for &v in &order {
            between[v] = 1.0;
        }

        // BFS order is non-decreasing in distance; walk it backwards.
        for &v in order.iter().rev() {
            if v == source {
                continue;
            }
            let share = between[v] / pred[v].len() as f64;
            for &x in &pred[v] {
                if x == source {
                    break;
                }
                between[x] += share;
            }
        }

        for &v in &order {
            load[v] += between[v] - 1.0;
        }
    }

    normalize_pairs(&mut load);
    load
}

/// Eigenvector centrality by power iteration on `A + I`.
pub fn eigenvector_centrality(graph: &SocialGraph) -> Result<Vec<f64>, CentralityError> {
    let adj = graph.adjacency();
    let n = adj.len();
    if n == 0 {
        return Err(CentralityError::EmptyGraph);
    }

    let mut x = vec![1.0 / n as f64; n];
    for _ in 0..EIGENVECTOR_MAX_ITER {
        let last = x.clone();
        for (v, neighbors) in adj.iter().enumerate() {
            for &(w, _) in neighbors {
                x[w] += last[v];
            }
        }

        let norm = x.iter().map(|z| z * z).sum::<f64>().sqrt();
        let norm = if norm > 0.0 { norm } else { 1.0 };
        for z in x.iter_mut() {
            *z /= norm;
        }

        let change: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if change < n as f64 * EIGENVECTOR_TOL {
            return Ok(x);
        }
    }

    Err(CentralityError::NotConverged(EIGENVECTOR_MAX_ITER))
}
