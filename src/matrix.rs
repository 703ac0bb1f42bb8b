use crate::{
    graph::{DEPARTMENT_COUNT, EmailGraph},
    partition::Partition,
};

/// Department head-count of every community.
///
/// Row `c` is community `c`, column `d - 1` is department `d`.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentMatrix {
    counts: Vec<[u32; DEPARTMENT_COUNT]>,
}

impl DepartmentMatrix {
    pub fn new(graph: &EmailGraph, communities: &Partition) -> Self {
        let mut counts = vec![[0u32; DEPARTMENT_COUNT]; communities.len()];
        for node in graph.nodes() {
            let row = communities.group_of(node);
            counts[row][graph.employee(node).dept_slot()] += 1;
        }
        DepartmentMatrix { counts }
    }

    pub fn counts(&self) -> &[[u32; DEPARTMENT_COUNT]] {
        &self.counts
    }

    /// Share of each department within each community. Rows of non-empty
    /// communities sum to 1; an empty row stays all zero.
    pub fn percentages(&self) -> Vec<[f64; DEPARTMENT_COUNT]> {
        self.counts
            .iter()
            .map(|row| {
                let total: u32 = row.iter().sum();
                let mut shares = [0.0; DEPARTMENT_COUNT];
                if total > 0 {
                    for (share, &count) in shares.iter_mut().zip(row) {
                        *share = f64::from(count) / f64::from(total);
                    }
                }
                shares
            })
            .collect()
    }

    /// Number of communities.
    pub fn rows(&self) -> usize {
        self.counts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Employee;

    #[test]
    fn counts_and_shares_per_community() {
        let g = EmailGraph::from_parts(
            [
                Employee::new(1, 1),
                Employee::new(2, 1),
                Employee::new(3, 42),
                Employee::new(4, 7),
            ],
            [],
        )
        .unwrap();
        let communities = Partition::from_labels([0, 0, 0, 1]);
        let matrix = DepartmentMatrix::new(&g, &communities);
        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.counts()[0][0], 2);
        assert_eq!(matrix.counts()[0][41], 1);
        assert_eq!(matrix.counts()[1][6], 1);

        let shares = matrix.percentages();
        assert!((shares[0][0] - 2.0 / 3.0).abs() < 1e-12);
        assert!((shares[1][6] - 1.0).abs() < 1e-12);
        for row in shares {
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }
}
