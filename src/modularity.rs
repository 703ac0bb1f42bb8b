use crate::{graph::EmailGraph, partition::Partition};
use petgraph::visit::EdgeRef;

/// Newman-Girvan modularity of `partition` over `graph`.
///
/// `Q = sum_c [ L_c / m - (d_c / 2m)^2 ]` where `L_c` is the number of edges
/// inside group `c`, `d_c` the summed degree of its nodes and `m` the number of
/// edges. A self-loop counts as one internal edge and adds 2 to its node's
/// degree. A graph without edges has modularity 0.
pub fn modularity(graph: &EmailGraph, partition: &Partition) -> f64 {
    let m = graph.edge_count() as f64;
    if m == 0.0 {
        return 0.0;
    }
    let mut internal = vec![0.0; partition.len()];
    let mut degree = vec![0.0; partition.len()];
    for edge in graph.inner().edge_references() {
        let a = partition.group_of(edge.source());
        let b = partition.group_of(edge.target());
        degree[a] += 1.0;
        degree[b] += 1.0;
        if a == b {
            internal[a] += 1.0;
        }
    }
    internal
        .iter()
        .zip(&degree)
        .map(|(l, d)| l / m - (d / (2.0 * m)).powi(2))
        .sum()
}
