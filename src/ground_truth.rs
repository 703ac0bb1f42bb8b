use crate::{graph::EmailGraph, modularity::modularity, partition::Partition};
use petgraph::graph::NodeIndex;
use tracing::debug;

/// Department membership used as a reference partition.
#[derive(Debug, Clone)]
pub struct GroundTruth {
    partition: Partition,
    departments: Vec<u8>,
    modularity: f64,
}

impl GroundTruth {
    /// One group per department, in the order departments first appear in the
    /// vertex table.
    pub fn from_graph(graph: &EmailGraph) -> Self {
        let partition = Partition::from_labels(graph.employees().map(|e| e.dept));
        let departments = partition
            .groups()
            .iter()
            .map(|group| graph.employee(group[0]).dept)
            .collect();
        let modularity = modularity(graph, &partition);
        debug!(departments = partition.len(), modularity, "ground truth");
        GroundTruth {
            partition,
            departments,
            modularity,
        }
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Department of every group, indexed by group id.
    pub fn departments(&self) -> &[u8] {
        &self.departments
    }

    pub fn modularity(&self) -> f64 {
        self.modularity
    }

    /// Groups paired with their department.
    pub fn by_department(&self) -> impl Iterator<Item = (u8, &[NodeIndex])> + '_ {
        self.departments
            .iter()
            .zip(self.partition.groups())
            .map(|(&dept, nodes)| (dept, nodes.as_slice()))
    }
}
