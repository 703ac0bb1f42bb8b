use crate::{
    cliques::CliqueReport,
    components::{Components, connected_components},
    error::Result,
    graph::EmailGraph,
    ground_truth::GroundTruth,
    louvain::{Communities, Louvain},
    matrix::DepartmentMatrix,
};
use tracing::info_span;

/// Every analysis of one run, computed in sequence over the same graph.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub components: Components,
    pub communities: Communities,
    pub ground_truth: GroundTruth,
    /// Departments of the Louvain communities.
    pub matrix: DepartmentMatrix,
    pub cliques: CliqueReport,
}

impl Analysis {
    pub fn run(graph: &EmailGraph, louvain: &Louvain) -> Result<Self> {
        let components = info_span!("components").in_scope(|| connected_components(graph));
        let communities = info_span!("louvain").in_scope(|| louvain.detect(graph))?;
        let ground_truth = info_span!("ground_truth").in_scope(|| GroundTruth::from_graph(graph));
        let matrix = DepartmentMatrix::new(graph, communities.partition());
        let cliques = info_span!("cliques").in_scope(|| CliqueReport::from_graph(graph))?;
        Ok(Analysis {
            components,
            communities,
            ground_truth,
            matrix,
            cliques,
        })
    }
}
