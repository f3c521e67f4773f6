use crate::loader::RawEdge;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use tracing::debug;

/// A weighted edge as it leaves the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub weight: i64,
}

/// Letter-exchange graph.
///
/// Edges are stored in a petgraph `DiGraph` either way; an undirected graph
/// keeps one edge per unordered pair and reads it in both directions.
#[derive(Debug, Clone)]
pub struct SocialGraph {
    graph: DiGraph<String, i64>,
    index: HashMap<String, NodeIndex>,
    directed: bool,
}

/// Parses a letter count, never failing: anything unreadable counts as zero.
///
/// Fractional counts are truncated toward zero; negative counts pass through.
pub fn count_letters(raw: &str) -> i64 {
    let raw = raw.trim();
    if let Ok(count) = raw.parse::<i64>() {
        return count;
    }
    match raw.parse::<f64>() {
        Ok(count) if count.is_finite() => count.trunc() as i64,
        _ => 0,
    }
}

impl SocialGraph {
    pub fn new(directed: bool) -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
            directed,
        }
    }

    /// One edge per cell. Both endpoints are added even for zero counts, and a
    /// repeated pair overwrites the earlier weight.
    ///
    /// Nodes keep the order the cells name them in, but weights are applied
    /// one recipient column at a time. An undirected pair is then settled by
    /// the cell in the later column, so a blank reverse cell never erases a
    /// count above the diagonal.
    pub fn build(edges: &[RawEdge], directed: bool) -> Self {
        let mut graph = Self::new(directed);
        let mut columns: HashMap<&str, usize> = HashMap::new();
        for edge in edges {
            graph.add_node(&edge.source);
            graph.add_node(&edge.target);
            let next = columns.len();
            columns.entry(edge.target.as_str()).or_insert(next);
        }

        let mut cells: Vec<&RawEdge> = edges.iter().collect();
        cells.sort_by_key(|edge| columns.get(edge.target.as_str()).copied());
        for edge in cells {
            graph.set_edge(&edge.source, &edge.target, count_letters(&edge.letters));
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            directed,
            "built letters graph"
        );
        graph
    }

    pub fn add_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    pub fn set_edge(&mut self, source: &str, target: &str, weight: i64) -> EdgeIndex {
        let a = self.add_node(source);
        let b = self.add_node(target);

        let existing = if self.directed {
            self.graph.find_edge(a, b)
        } else {
            self.graph.find_edge_undirected(a, b).map(|(e, _)| e)
        };

        match existing {
            Some(e) => {
                self.graph[e] = weight;
                e
            }
            None => self.graph.add_edge(a, b, weight),
        }
    }

    /// Drops every edge lighter than `threshold` and returns what was dropped.
    /// Nodes are kept even when they end up isolated.
    pub fn filter(&mut self, threshold: i64) -> Vec<Edge> {
        let mut removed = Vec::new();
        self.graph.retain_edges(|g, e| {
            if g[e] >= threshold {
                return true;
            }
            if let Some((a, b)) = g.edge_endpoints(e) {
                removed.push(Edge {
                    source: g[a].clone(),
                    target: g[b].clone(),
                    weight: g[e],
                });
            }
            false
        });

        debug!(
            threshold,
            removed = removed.len(),
            kept = self.edge_count(),
            "filtered letters graph"
        );
        removed
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node names in insertion order; position `i` is node index `i`.
    pub fn node_names(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].as_str())
            .collect()
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).map(|idx| idx.index())
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.graph.edge_references().map(|e| Edge {
            source: self.graph[e.source()].clone(),
            target: self.graph[e.target()].clone(),
            weight: *e.weight(),
        })
    }

    /// Edges as `(source position, target position, weight)`.
    pub fn edge_positions(&self) -> impl Iterator<Item = (usize, usize, i64)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), *e.weight()))
    }

    pub fn weight(&self, source: &str, target: &str) -> Option<i64> {
        let a = *self.index.get(source)?;
        let b = *self.index.get(target)?;
        let e = if self.directed {
            self.graph.find_edge(a, b)
        } else {
            self.graph.find_edge_undirected(a, b).map(|(e, _)| e)
        }?;
        Some(self.graph[e])
    }

    /// Outgoing adjacency by node position, with edge weights.
    ///
    /// Undirected edges appear in both lists, self-loops once.
    pub fn adjacency(&self) -> Vec<Vec<(usize, f64)>> {
        let mut adj = vec![Vec::new(); self.node_count()];
        for (a, b, weight) in self.edge_positions() {
            adj[a].push((b, weight as f64));
            if !self.directed && a != b {
                adj[b].push((a, weight as f64));
            }
        }
        adj
    }

    /// Dense weighted adjacency matrix by node position.
    pub fn adjacency_matrix(&self, weighted: bool) -> Vec<Vec<f64>> {
        let n = self.node_count();
        let mut matrix = vec![vec![0.0; n]; n];
        for (i, row) in self.adjacency().into_iter().enumerate() {
            for (j, weight) in row {
                matrix[i][j] = if weighted { weight } else { 1.0 };
            }
        }
        matrix
    }

    pub(crate) fn inner(&self) -> &DiGraph<String, i64> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::read_edges_from;

    fn raw(source: &str, target: &str, letters: &str) -> RawEdge {
        RawEdge {
            source: source.to_string(),
            target: target.to_string(),
            letters: letters.to_string(),
        }
    }

    #[test]
    fn test_count_letters() {
        assert_eq!(count_letters("12"), 12);
        assert_eq!(count_letters(" 7 "), 7);
        assert_eq!(count_letters("3.0"), 3);
        assert_eq!(count_letters("3.9"), 3);
        assert_eq!(count_letters("-4"), -4);
        assert_eq!(count_letters(""), 0);
        assert_eq!(count_letters("many"), 0);
        assert_eq!(count_letters("NaN"), 0);
    }

    #[test]
    fn test_build_keeps_zero_weight_endpoints() {
        let graph = SocialGraph::build(&[raw("A", "B", "0"), raw("A", "C", "")], false);
        assert_eq!(graph.node_names(), vec!["A", "B", "C"]);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.weight("A", "C"), Some(0));
    }

    #[test]
    fn test_undirected_pair_is_stored_once_last_wins() {
        let graph = SocialGraph::build(&[raw("A", "B", "5"), raw("B", "A", "2")], false);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.weight("A", "B"), Some(2));
        assert_eq!(graph.weight("B", "A"), Some(2));
    }

    #[test]
    fn test_blank_reverse_cell_keeps_the_count() {
        let cells = read_edges_from("Name,A,B,C\nA,,5,\nB,,,1\nC,,,\n".as_bytes()).unwrap();
        let mut graph = SocialGraph::build(&cells, false);
        assert_eq!(graph.node_names(), vec!["A", "B", "C"]);
        assert_eq!(graph.weight("A", "B"), Some(5));
        assert_eq!(graph.weight("B", "C"), Some(1));

        graph.filter(2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.weight("A", "B"), Some(5));
    }

    #[test]
    fn test_directed_pairs_are_distinct() {
        let graph = SocialGraph::build(&[raw("A", "B", "5"), raw("B", "A", "2")], true);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.weight("A", "B"), Some(5));
        assert_eq!(graph.weight("B", "A"), Some(2));
    }

    #[test]
    fn test_filter_partitions_edges_by_threshold() {
        let mut graph = SocialGraph::build(
            &[
                raw("A", "B", "5"),
                raw("B", "C", "1"),
                raw("C", "D", "2"),
                raw("D", "A", "junk"),
            ],
            false,
        );
        let removed = graph.filter(2);

        assert!(graph.edges().all(|e| e.weight >= 2));
        assert!(removed.iter().all(|e| e.weight < 2));
        assert_eq!(graph.edge_count() + removed.len(), 4);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.weight("C", "D"), Some(2));
        assert_eq!(graph.weight("B", "C"), None);
    }

    #[test]
    fn test_adjacency_mirrors_undirected_edges() {
        let graph = SocialGraph::build(&[raw("A", "B", "3"), raw("B", "B", "1")], false);
        let adj = graph.adjacency();
        assert_eq!(adj[0], vec![(1, 3.0)]);
        assert_eq!(adj[1], vec![(0, 3.0), (1, 1.0)]);
    }
}
