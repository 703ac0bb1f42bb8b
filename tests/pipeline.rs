use email_communities::{
    Analysis, DEPARTMENT_COUNT, EmailGraph, Error, Louvain, SyntheticConfig, render, report,
};
use std::fs;

fn synthetic_graph(dir: &tempfile::TempDir) -> EmailGraph {
    let config = SyntheticConfig {
        nodes: 120,
        emails: 900,
        departments: 4,
        mixing: 0.05,
        seed: 11,
    };
    let vertices = dir.path().join("email_vertices.csv");
    let edges = dir.path().join("email_edgelist.csv");
    config.write_csv(&vertices, &edges).unwrap();
    EmailGraph::from_csv(&vertices, &edges).unwrap()
}

#[test]
fn planted_departments_are_found() {
    let dir = tempfile::tempdir().unwrap();
    let graph = synthetic_graph(&dir);
    assert_eq!(graph.node_count(), 120);
    assert_eq!(graph.departments(), vec![1, 2, 3, 4]);

    let analysis = Analysis::run(&graph, &Louvain::new()).unwrap();

    assert!(analysis.components.largest().unwrap().len() > 100);
    assert_eq!(analysis.ground_truth.partition().len(), 4);
    assert!(analysis.ground_truth.modularity() > 0.5);
    assert!(analysis.communities.modularity() > 0.5);
    assert!(analysis.communities.partition().covers(graph.node_count()));
    assert_eq!(analysis.matrix.rows(), analysis.communities.len());
    for row in analysis.matrix.percentages() {
        assert_eq!(row.len(), DEPARTMENT_COUNT);
        assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
    assert!(analysis.cliques.clique_number() >= 2);
    assert!(analysis.cliques.maximum_count() >= 1);
}

#[test]
fn outputs_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let graph = synthetic_graph(&dir);
    let analysis = Analysis::run(&graph, &Louvain::new()).unwrap();

    let louvain_dot = dir.path().join("louvain.dot");
    render::write_dot(&louvain_dot, &render::layout_dot(&graph, analysis.communities.partition()))
        .unwrap();
    let text = fs::read_to_string(&louvain_dot).unwrap();
    assert_eq!(text.matches("style=filled").count(), graph.node_count());

    let heatmap = dir.path().join("heatmap.dot");
    render::write_dot(&heatmap, &render::heatmap_dot(&analysis.matrix)).unwrap();
    assert!(fs::read_to_string(&heatmap).unwrap().contains("<TABLE"));

    let nodes = dir.path().join("nodes.csv");
    report::write_node_table(&nodes, &report::node_rows(&graph, analysis.communities.partition()))
        .unwrap();
    assert_eq!(
        fs::read_to_string(&nodes).unwrap().lines().count(),
        graph.node_count() + 1
    );
}

#[test]
fn missing_input_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EmailGraph::from_csv(dir.path().join("nope.csv"), dir.path().join("nope2.csv"))
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn dangling_edge_in_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let vertices = dir.path().join("v.csv");
    let edges = dir.path().join("e.csv");
    fs::write(&vertices, "id,dept\n0,1\n1,2\n").unwrap();
    fs::write(&edges, "from,to\n0,1\n1,7\n").unwrap();
    let err = EmailGraph::from_csv(&vertices, &edges).unwrap_err();
    assert_eq!(err.to_string(), "edge on line 3 references unknown node 7");
}
