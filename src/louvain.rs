//! Louvain community detection (Blondel et al. 2008).
//!
//! Each level starts with every (aggregated) node in its own community and
//! greedily moves nodes to the neighbouring community with the best modularity
//! gain until no move improves it. Communities are then collapsed into single
//! weighted nodes and the next level runs on that smaller graph. Detection stops
//! at the first level where nothing moves.

use crate::{
    error::{Error, Result},
    graph::EmailGraph,
    modularity::modularity,
    partition::Partition,
};
use petgraph::{graph::NodeIndex, visit::EdgeRef};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Louvain community detection.
#[derive(Debug, Clone)]
pub struct Louvain {
    resolution: f64,
    tolerance: f64,
    seed: u64,
    max_levels: usize,
}

impl Default for Louvain {
    fn default() -> Self {
        Self::new()
    }
}

impl Louvain {
    pub fn new() -> Self {
        Louvain {
            resolution: 1.0,
            tolerance: 1e-7,
            seed: 123,
            max_levels: 32,
        }
    }

    /// Higher values produce smaller communities.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Seed for the node visiting order.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Minimum modularity gain for a move to count as an improvement.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = max_levels;
        self
    }

    pub fn detect(&self, graph: &EmailGraph) -> Result<Communities> {
        if graph.is_empty() {
            return Err(Error::EmptyGraph);
        }
        let n = graph.node_count();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut level_graph = WeightedGraph::from_email_graph(graph);
        let m2: f64 = level_graph.degree.iter().sum();

        // original node -> node of the current level graph
        let mut membership: Vec<usize> = (0..n).collect();
        let mut levels: Vec<Partition> = Vec::new();

        while m2 > 0.0 && levels.len() < self.max_levels {
            let (communities, moved) = self.local_moving(&level_graph, m2, &mut rng);
            if !moved {
                break;
            }
            let partition = Partition::from_labels(communities);
            for c in membership.iter_mut() {
                *c = partition.group_of(NodeIndex::new(*c));
            }
            level_graph = level_graph.aggregate(&partition);
            levels.push(Partition::from_labels(membership.iter().copied()));
            debug!(
                level = levels.len(),
                communities = partition.len(),
                "louvain level done"
            );
        }

        let partition = levels
            .last()
            .cloned()
            .unwrap_or_else(|| Partition::singletons(n));
        // resolution only steers the moves; the score uses the shared formula
        let modularity = modularity(graph, &partition);
        info!(
            communities = partition.len(),
            levels = levels.len(),
            modularity,
            "louvain finished"
        );
        Ok(Communities {
            partition,
            modularity,
            levels,
        })
    }

    /// One level of local moves. Returns the community of every node and
    /// whether any node changed community.
    fn local_moving(&self, g: &WeightedGraph, m2: f64, rng: &mut StdRng) -> (Vec<usize>, bool) {
        let n = g.len();
        let mut community: Vec<usize> = (0..n).collect();
        let mut community_degree = g.degree.clone();
        let mut order: Vec<usize> = (0..n).collect();
        let mut moved_any = false;

        loop {
            let mut moved = false;
            order.shuffle(rng);
            for &v in &order {
                let old = community[v];
                let k = g.degree[v];

                let mut links: BTreeMap<usize, f64> = BTreeMap::new();
                for &(u, w) in &g.adj[v] {
                    *links.entry(community[u]).or_insert(0.0) += w;
                }

                community_degree[old] -= k;
                let gain = |c: usize, w: f64| w - self.resolution * k * community_degree[c] / m2;
                let stay = gain(old, links.get(&old).copied().unwrap_or(0.0));
                let mut best = (old, stay);
                for (&c, &w) in &links {
                    let candidate = gain(c, w);
                    if candidate > best.1 {
                        best = (c, candidate);
                    }
                }
                // gain is in units of m * delta Q
                if best.0 != old && 2.0 * (best.1 - stay) / m2 > self.tolerance {
                    community[v] = best.0;
                    moved = true;
                    moved_any = true;
                }
                community_degree[community[v]] += k;
            }
            if !moved {
                break;
            }
        }
        (community, moved_any)
    }
}

/// Result of a Louvain run.
#[derive(Debug, Clone)]
pub struct Communities {
    partition: Partition,
    modularity: f64,
    levels: Vec<Partition>,
}

impl Communities {
    /// The final (coarsest) partition.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn modularity(&self) -> f64 {
        self.modularity
    }

    /// Partition of the original nodes after each aggregation level.
    pub fn levels(&self) -> &[Partition] {
        &self.levels
    }

    pub fn community_of(&self, node: NodeIndex) -> usize {
        self.partition.group_of(node)
    }

    pub fn len(&self) -> usize {
        self.partition.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partition.is_empty()
    }
}

/// Weighted undirected graph a level runs on. Self-loops are kept apart from
/// `adj` and count twice towards a node's degree.
#[derive(Debug)]
struct WeightedGraph {
    adj: Vec<Vec<(usize, f64)>>,
    self_loops: Vec<f64>,
    degree: Vec<f64>,
}

impl WeightedGraph {
    fn from_email_graph(graph: &EmailGraph) -> Self {
        let n = graph.node_count();
        let mut adj = vec![Vec::new(); n];
        let mut self_loops = vec![0.0; n];
        for edge in graph.inner().edge_references() {
            let (a, b) = (edge.source().index(), edge.target().index());
            if a == b {
                self_loops[a] += 1.0;
            } else {
                adj[a].push((b, 1.0));
                adj[b].push((a, 1.0));
            }
        }
        Self::new(adj, self_loops)
    }

    fn new(adj: Vec<Vec<(usize, f64)>>, self_loops: Vec<f64>) -> Self {
        let degree = adj
            .iter()
            .zip(&self_loops)
            .map(|(nbrs, sl)| nbrs.iter().map(|(_, w)| w).sum::<f64>() + 2.0 * sl)
            .collect();
        WeightedGraph {
            adj,
            self_loops,
            degree,
        }
    }

    fn len(&self) -> usize {
        self.adj.len()
    }

    /// Collapses every group of `partition` into one node.
    fn aggregate(&self, partition: &Partition) -> Self {
        let mut links: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); partition.len()];
        let mut self_loops = vec![0.0; partition.len()];
        for v in 0..self.len() {
            let cv = partition.group_of(NodeIndex::new(v));
            self_loops[cv] += self.self_loops[v];
            for &(u, w) in &self.adj[v] {
                let cu = partition.group_of(NodeIndex::new(u));
                if cu == cv {
                    // every internal edge is seen from both ends
                    self_loops[cv] += w / 2.0;
                } else {
                    *links[cv].entry(cu).or_insert(0.0) += w;
                }
            }
        }
        let adj = links.into_iter().map(|l| l.into_iter().collect()).collect();
        Self::new(adj, self_loops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Employee;

    fn graph(n: u32, edges: &[(u32, u32)]) -> EmailGraph {
        EmailGraph::from_parts((1..=n).map(|id| Employee::new(id, 1)), edges.iter().copied())
            .unwrap()
    }

    #[test]
    fn triangle_is_one_community() {
        let g = graph(3, &[(1, 2), (2, 3), (1, 3)]);
        let communities = Louvain::new().detect(&g).unwrap();
        assert_eq!(communities.len(), 1);
    }

    #[test]
    fn two_triangles_with_bridge() {
        let g = graph(6, &[(1, 2), (2, 3), (1, 3), (4, 5), (5, 6), (4, 6), (3, 4)]);
        let communities = Louvain::new().detect(&g).unwrap();
        let labels = communities.partition().labels();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
        assert!((communities.modularity() - 5.0 / 14.0).abs() < 1e-12);
    }

    #[test]
    fn ring_of_cliques_is_recovered() {
        // four 5-cliques joined in a ring by single edges
        let mut edges = Vec::new();
        for c in 0..4u32 {
            let base = c * 5 + 1;
            for i in 0..5 {
                for j in (i + 1)..5 {
                    edges.push((base + i, base + j));
                }
            }
            edges.push((base + 4, (base + 5 - 1) % 20 + 1));
        }
        let g = graph(20, &edges);
        let communities = Louvain::new().detect(&g).unwrap();
        assert_eq!(communities.len(), 4);
        for c in 0..4 {
            let first = communities.community_of(NodeIndex::new(c * 5));
            for i in 1..5 {
                assert_eq!(communities.community_of(NodeIndex::new(c * 5 + i)), first);
            }
        }
        assert!(communities.partition().covers(20));
    }

    #[test]
    fn isolated_nodes_stay_apart() {
        let g = graph(2, &[]);
        let communities = Louvain::new().detect(&g).unwrap();
        assert_eq!(communities.len(), 2);
        assert!(communities.levels().is_empty());
        assert_eq!(communities.modularity(), 0.0);
    }

    #[test]
    fn resolution_does_not_change_the_reported_score() {
        let g = graph(2, &[(1, 2)]);
        let communities = Louvain::new().with_resolution(3.0).detect(&g).unwrap();
        assert_eq!(communities.len(), 2);
        assert!((communities.modularity() + 0.5).abs() < 1e-12);
        assert_eq!(communities.modularity(), modularity(&g, communities.partition()));
        assert!((-1.0..=1.0).contains(&communities.modularity()));
    }

    #[test]
    fn empty_graph_is_an_error() {
        let err = Louvain::new().detect(&EmailGraph::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyGraph));
    }

    #[test]
    fn same_seed_same_partition() {
        let g = graph(
            8,
            &[(1, 2), (2, 3), (3, 1), (3, 4), (4, 5), (5, 6), (6, 4), (6, 7), (7, 8), (8, 1)],
        );
        let a = Louvain::new().with_seed(7).detect(&g).unwrap();
        let b = Louvain::new().with_seed(7).detect(&g).unwrap();
        assert_eq!(a.partition(), b.partition());
        assert_eq!(a.modularity(), b.modularity());
    }

    #[test]
    fn levels_get_coarser() {
        let g = graph(6, &[(1, 2), (2, 3), (1, 3), (4, 5), (5, 6), (4, 6), (3, 4)]);
        let communities = Louvain::new().detect(&g).unwrap();
        let sizes: Vec<usize> = communities.levels().iter().map(Partition::len).collect();
        assert!(sizes.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(sizes.last(), Some(&communities.len()));
    }
}
