//! Graphviz output: community layouts and the department heat map.
//!
//! Everything is written as DOT text first. Turning it into an image needs the
//! Graphviz binaries on `PATH` and is optional.

use crate::{
    error::{Error, Result},
    graph::{DEPARTMENT_COUNT, EmailGraph, Employee},
    matrix::DepartmentMatrix,
    partition::Partition,
};
use petgraph::dot::{Config, Dot};
use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};
use tracing::{debug, info};

/// How Graphviz lays out a DOT file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Force-directed layout with a fixed random start.
    Spring { seed: u64 },
    /// Ranked layout, used for the heat map table.
    Table,
}

impl Layout {
    fn program(&self) -> &'static str {
        match self {
            Layout::Spring { .. } => "neato",
            Layout::Table => "dot",
        }
    }

    fn args(&self) -> Vec<String> {
        match self {
            Layout::Spring { seed } => vec![
                format!("-Gstart={seed}"),
                "-Goverlap=false".to_string(),
                "-Nshape=circle".to_string(),
            ],
            Layout::Table => Vec::new(),
        }
    }
}

/// Pastel fill colour of `group` in a colour map with `size` entries.
pub fn group_color(group: usize, size: usize) -> String {
    let hue = group as f64 / size.max(1) as f64;
    format!("{hue:.3} 0.35 0.95")
}

/// DOT document of the graph with every node labelled by its department and
/// filled with the colour of its group in `partition`.
pub fn layout_dot(graph: &EmailGraph, partition: &Partition) -> String {
    // one colour per group id, 0..=max
    let colors = partition.len();
    let edge_attributes = |_, _| "color=grey".to_string();
    let node_attributes = |_, (node, employee): (_, &Employee)| {
        format!(
            "label=\"{}\", style=filled, fillcolor=\"{}\"",
            employee.dept,
            group_color(partition.group_of(node), colors)
        )
    };
    let dot = Dot::with_attr_getters(
        graph.inner(),
        &[Config::EdgeNoLabel, Config::NodeNoLabel],
        &edge_attributes,
        &node_attributes,
    );
    format!("{:?}", dot)
}

/// Autumn colour map: red at 0, yellow at 1.
pub fn autumn(share: f64) -> String {
    let green = (share.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#FF{green:02X}00")
}

/// DOT document holding the department share of every community as a colour
/// table. Rows are communities, columns departments 1 to 42.
pub fn heatmap_dot(matrix: &DepartmentMatrix) -> String {
    let mut table = String::from("<TABLE BORDER=\"0\" CELLSPACING=\"0\" CELLPADDING=\"4\">\n");
    table.push_str("<TR><TD></TD>");
    for dept in 1..=DEPARTMENT_COUNT {
        table.push_str(&format!("<TD>{dept}</TD>"));
    }
    table.push_str("</TR>\n");
    for (community, row) in matrix.percentages().iter().enumerate() {
        table.push_str(&format!("<TR><TD>{community}</TD>"));
        for &share in row {
            table.push_str(&format!(
                "<TD BGCOLOR=\"{}\" WIDTH=\"16\" HEIGHT=\"16\"></TD>",
                autumn(share)
            ));
        }
        table.push_str("</TR>\n");
    }
    table.push_str("</TABLE>");
    format!("digraph heatmap {{\n    node [shape=plaintext];\n    heatmap [label=<{table}>];\n}}\n")
}

pub fn write_dot(path: impl AsRef<Path>, dot: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, dot)?;
    debug!(path = %path.display(), "wrote DOT file");
    Ok(())
}

/// Renders `dot_file` to a PNG next to it and returns the image path.
pub fn render_png(dot_file: impl AsRef<Path>, layout: Layout) -> Result<PathBuf> {
    let dot_file = dot_file.as_ref();
    let output_image = dot_file.with_extension("png");
    let program = layout.program();
    let status = Command::new(program)
        .args(layout.args())
        .arg("-Tpng")
        .arg(dot_file)
        .arg("-o")
        .arg(&output_image)
        .status()?;
    if !status.success() {
        return Err(Error::Render {
            program: program.to_string(),
            status,
        });
    }
    info!(image = %output_image.display(), "rendered");
    Ok(output_image)
}

/// Opens an image with the platform's default viewer.
pub fn open_image(image: impl AsRef<Path>) -> Result<()> {
    let opener = if cfg!(target_os = "windows") {
        "start"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    let status = Command::new(opener).arg(image.as_ref()).status()?;
    if !status.success() {
        return Err(Error::Render {
            program: opener.to_string(),
            status,
        });
    }
    Ok(())
}
