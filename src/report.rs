//! Console report and CSV summary tables.

use crate::{
    analysis::Analysis,
    error::Result,
    graph::{DEPARTMENT_COUNT, EmailGraph},
    matrix::DepartmentMatrix,
    partition::Partition,
};
use csv::Writer;
use petgraph::graph::NodeIndex;
use serde::Serialize;
use std::{
    io::{self, Write},
    path::Path,
};
use tracing::debug;

/// One line of the node table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeRow {
    pub id: u32,
    pub dept: u8,
    pub community: usize,
}

/// `id`, `dept` and detected community of every node, in vertex-table order.
pub fn node_rows(graph: &EmailGraph, communities: &Partition) -> Vec<NodeRow> {
    graph
        .nodes()
        .map(|node| {
            let employee = graph.employee(node);
            NodeRow {
                id: employee.id,
                dept: employee.dept,
                community: communities.group_of(node),
            }
        })
        .collect()
}

pub fn write_node_table(path: impl AsRef<Path>, rows: &[NodeRow]) -> Result<()> {
    let mut writer = Writer::from_path(path.as_ref())?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    debug!(path = %path.as_ref().display(), rows = rows.len(), "wrote node table");
    Ok(())
}

/// Department shares per community: a `community` column followed by one
/// column per department.
pub fn write_percentage_table(path: impl AsRef<Path>, matrix: &DepartmentMatrix) -> Result<()> {
    let mut writer = Writer::from_path(path.as_ref())?;
    let mut header = vec!["community".to_string()];
    header.extend((1..=DEPARTMENT_COUNT).map(|dept| dept.to_string()));
    writer.write_record(&header)?;
    for (community, row) in matrix.percentages().iter().enumerate() {
        let mut record = vec![community.to_string()];
        record.extend(row.iter().map(|share| share.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// `{1, 2, 3}` using employee ids.
pub fn format_ids(graph: &EmailGraph, nodes: &[NodeIndex]) -> String {
    let ids: Vec<String> = nodes
        .iter()
        .map(|&node| graph.employee(node).id.to_string())
        .collect();
    format!("{{{}}}", ids.join(", "))
}

/// Prints every analysis section.
pub fn write_report<W: Write>(out: &mut W, graph: &EmailGraph, analysis: &Analysis) -> io::Result<()> {
    write_components(out, graph, analysis)?;
    write_communities(out, graph, analysis)?;
    write_ground_truth(out, graph, analysis)?;
    write_cliques(out, graph, analysis)
}

fn write_components<W: Write>(out: &mut W, graph: &EmailGraph, analysis: &Analysis) -> io::Result<()> {
    writeln!(out, "== Connected components ==")?;
    for component in analysis.components.all() {
        writeln!(out, "{}", format_ids(graph, component))?;
    }
    if let Some(largest) = analysis.components.largest() {
        writeln!(
            out,
            "Largest connected component ({} nodes):\n{}",
            largest.len(),
            format_ids(graph, largest)
        )?;
    }
    writeln!(out)
}

fn write_communities<W: Write>(out: &mut W, graph: &EmailGraph, analysis: &Analysis) -> io::Result<()> {
    writeln!(out, "== Louvain communities ==")?;
    for community in analysis.communities.partition().groups() {
        writeln!(out, "{}", format_ids(graph, community))?;
    }
    writeln!(out, "Modularity: {}", analysis.communities.modularity())?;
    writeln!(out)
}

fn write_ground_truth<W: Write>(out: &mut W, graph: &EmailGraph, analysis: &Analysis) -> io::Result<()> {
    writeln!(out, "== Ground truth by department ==")?;
    for (dept, nodes) in analysis.ground_truth.by_department() {
        writeln!(out, "{dept}: {}", format_ids(graph, nodes))?;
    }
    writeln!(out, "Ground truth modularity: {}", analysis.ground_truth.modularity())?;
    writeln!(out, "Louvain modularity: {}", analysis.communities.modularity())?;
    writeln!(out)
}

fn write_cliques<W: Write>(out: &mut W, graph: &EmailGraph, analysis: &Analysis) -> io::Result<()> {
    let cliques = &analysis.cliques;
    writeln!(out, "== Maximal cliques ==")?;
    writeln!(out, "Maximum clique:\n{}", format_ids(graph, cliques.maximum()))?;
    writeln!(out, "Clique number: {}", cliques.clique_number())?;
    writeln!(out, "Maximal cliques: {}", cliques.maximal_count())?;
    writeln!(out, "Cliques of maximum size: {}", cliques.maximum_count())
}
