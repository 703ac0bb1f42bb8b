//! Maximal clique enumeration.
//!
//! Bron-Kerbosch with Tomita pivoting. The outer level walks the vertices in
//! degeneracy order and each vertex seeds an independent search over its
//! later neighbours, so the outer level runs on the rayon pool.
//! Exponential in the worst case; fine for graphs of a few thousand nodes.

use crate::{
    error::{Error, Result},
    graph::EmailGraph,
};
use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::info;

/// All maximal cliques of the graph, self-loops ignored. An isolated node is
/// a clique of size one.
///
/// Each clique is sorted by node index and the list is ordered by size, then
/// by members.
pub fn find_maximal_cliques(graph: &EmailGraph) -> Vec<Vec<NodeIndex>> {
    let adj: Vec<HashSet<usize>> = graph
        .nodes()
        .map(|v| {
            graph
                .neighbors(v)
                .filter(|&u| u != v)
                .map(|u| u.index())
                .collect()
        })
        .collect();
    let order = degeneracy_order(&adj);
    let mut position = vec![0; adj.len()];
    for (rank, &v) in order.iter().enumerate() {
        position[v] = rank;
    }

    let mut cliques: Vec<Vec<NodeIndex>> = order
        .par_iter()
        .flat_map_iter(|&v| {
            let (later, earlier): (Vec<usize>, Vec<usize>) =
                adj[v].iter().partition(|&&u| position[u] > position[v]);
            let mut found = Vec::new();
            let mut clique = vec![v];
            bron_kerbosch(&adj, &mut clique, later, earlier, &mut found);
            found
        })
        .map(|mut clique| -> Vec<NodeIndex> {
            clique.sort_unstable();
            clique.into_iter().map(NodeIndex::new).collect()
        })
        .collect();
    cliques.sort_unstable_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    cliques
}

fn bron_kerbosch(
    adj: &[HashSet<usize>],
    clique: &mut Vec<usize>,
    mut candidates: Vec<usize>,
    mut excluded: Vec<usize>,
    found: &mut Vec<Vec<usize>>,
) {
    if candidates.is_empty() {
        if excluded.is_empty() {
            found.push(clique.clone());
        }
        return;
    }
    let Some(pivot) = candidates
        .iter()
        .chain(&excluded)
        .copied()
        .max_by_key(|&u| candidates.iter().filter(|&&w| adj[u].contains(&w)).count())
    else {
        return;
    };
    let branches: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|u| !adj[pivot].contains(u))
        .collect();
    for v in branches {
        let next_candidates = candidates.iter().copied().filter(|u| adj[v].contains(u)).collect();
        let next_excluded = excluded.iter().copied().filter(|u| adj[v].contains(u)).collect();
        clique.push(v);
        bron_kerbosch(adj, clique, next_candidates, next_excluded, found);
        clique.pop();
        candidates.retain(|&u| u != v);
        excluded.push(v);
    }
}

/// Repeatedly removes a vertex of minimum remaining degree (lowest index on
/// ties).
fn degeneracy_order(adj: &[HashSet<usize>]) -> Vec<usize> {
    let n = adj.len();
    let mut degree: Vec<usize> = adj.iter().map(HashSet::len).collect();
    let mut removed = vec![false; n];
    let mut order = Vec::with_capacity(n);
    for _ in 0..n {
        let Some(v) = (0..n).filter(|&v| !removed[v]).min_by_key(|&v| degree[v]) else {
            break;
        };
        removed[v] = true;
        order.push(v);
        for &u in &adj[v] {
            if !removed[u] {
                degree[u] -= 1;
            }
        }
    }
    order
}

/// Summary of the maximal cliques of a graph.
#[derive(Debug, Clone)]
pub struct CliqueReport {
    cliques: Vec<Vec<NodeIndex>>,
}

impl CliqueReport {
    pub fn from_graph(graph: &EmailGraph) -> Result<Self> {
        if graph.is_empty() {
            return Err(Error::EmptyGraph);
        }
        let report = CliqueReport {
            cliques: find_maximal_cliques(graph),
        };
        info!(
            maximal_cliques = report.maximal_count(),
            clique_number = report.clique_number(),
            "cliques enumerated"
        );
        Ok(report)
    }

    /// Maximal cliques, smallest first.
    pub fn cliques(&self) -> &[Vec<NodeIndex>] {
        &self.cliques
    }

    /// The last clique of maximum size in the sorted list.
    pub fn maximum(&self) -> &[NodeIndex] {
        self.cliques.last().map(Vec::as_slice).unwrap_or_default()
    }

    /// Size of the largest clique.
    pub fn clique_number(&self) -> usize {
        self.maximum().len()
    }

    pub fn maximal_count(&self) -> usize {
        self.cliques.len()
    }

    /// Number of maximal cliques whose size equals the clique number.
    pub fn maximum_count(&self) -> usize {
        let size = self.clique_number();
        self.cliques
            .iter()
            .rev()
            .take_while(|clique| clique.len() == size)
            .count()
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

    fn ids(g: &EmailGraph, clique: &[NodeIndex]) -> Vec<u32> {
        clique.iter().map(|&v| g.employee(v).id).collect()
    }

    #[test]
    fn finds_the_cliques_of_a_small_graph() {
        // K4 on 1..4, triangle 4-5-6, pendant 6-7, isolated 8, loop on 8
        let g = graph(
            8,
            &[
                (1, 2),
                (1, 3),
                (1, 4),
                (2, 3),
                (2, 4),
                (3, 4),
                (4, 5),
                (5, 6),
                (4, 6),
                (6, 7),
                (8, 8),
            ],
        );
        let report = CliqueReport::from_graph(&g).unwrap();
        let found: Vec<Vec<u32>> = report.cliques().iter().map(|c| ids(&g, c)).collect();
        assert_eq!(
            found,
            vec![vec![8], vec![6, 7], vec![4, 5, 6], vec![1, 2, 3, 4]]
        );
        assert_eq!(report.clique_number(), 4);
        assert_eq!(report.maximal_count(), 4);
        assert_eq!(report.maximum_count(), 1);
        assert_eq!(ids(&g, report.maximum()), vec![1, 2, 3, 4]);
    }

    #[test]
    fn counts_ties_at_maximum_size() {
        let g = graph(5, &[(1, 2), (2, 3), (1, 3), (3, 4), (4, 5), (3, 5)]);
        let report = CliqueReport::from_graph(&g).unwrap();
        assert_eq!(report.clique_number(), 3);
        assert_eq!(report.maximum_count(), 2);
        assert_eq!(ids(&g, report.maximum()), vec![3, 4, 5]);
    }

    #[test]
    fn empty_graph_is_an_error() {
        assert!(matches!(
            CliqueReport::from_graph(&EmailGraph::default()),
            Err(Error::EmptyGraph)
        ));
    }

    #[test]
    fn degeneracy_order_peels_low_degree_first() {
        let adj: Vec<HashSet<usize>> = vec![
            HashSet::from([1, 2]),
            HashSet::from([0, 2]),
            HashSet::from([0, 1, 3]),
            HashSet::from([2]),
        ];
        assert_eq!(degeneracy_order(&adj), vec![3, 0, 1, 2]);
    }
}
