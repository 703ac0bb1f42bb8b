//! Loading the email graph from its vertex and edge tables.
//!
//! The vertex table has the columns `id,dept` and the edge table `from,to`.
//! Both files need a header row. Nodes keep the order of the vertex table,
//! which is the order every analysis iterates in.

use crate::error::{Error, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs::File, io::Read, path::Path};
use tracing::{debug, info};

/// Number of department slots. Department labels run from 1 to 42.
pub const DEPARTMENT_COUNT: usize = 42;

/// A node of the email graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Employee {
    pub id: u32,
    pub dept: u8,
}

impl Employee {
    pub fn new(id: u32, dept: u8) -> Self {
        Employee { id, dept }
    }

    /// Column of this employee's department in a department-indexed row.
    pub fn dept_slot(&self) -> usize {
        usize::from(self.dept) - 1
    }
}

#[derive(Debug, Deserialize)]
struct VertexRecord {
    id: u32,
    dept: u32,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    from: u32,
    to: u32,
}

/// Undirected, unweighted email graph with a department label on every node.
///
/// Built once and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct EmailGraph {
    graph: UnGraph<Employee, ()>,
    index: HashMap<u32, NodeIndex>,
}

impl EmailGraph {
    pub fn from_csv(vertices: impl AsRef<Path>, edges: impl AsRef<Path>) -> Result<Self> {
        let vertices = vertices.as_ref();
        let edges = edges.as_ref();
        info!(vertices = %vertices.display(), edges = %edges.display(), "loading email graph");
        Self::from_readers(File::open(vertices)?, File::open(edges)?)
    }

    pub fn from_readers(vertices: impl Read, edges: impl Read) -> Result<Self> {
        let mut email_graph = EmailGraph::default();

        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(vertices);
        for record in reader.deserialize::<VertexRecord>() {
            let VertexRecord { id, dept } = record?;
            let dept = u8::try_from(dept)
                .ok()
                .filter(|d| (1..=DEPARTMENT_COUNT as u8).contains(d))
                .ok_or(Error::DepartmentOutOfRange { id, dept })?;
            email_graph.add_employee(Employee::new(id, dept))?;
        }

        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(edges);
        let headers = reader.headers()?.clone();
        let mut record = StringRecord::new();
        let mut duplicates = 0usize;
        while reader.read_record(&mut record)? {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let EdgeRecord { from, to } = record.deserialize::<EdgeRecord>(Some(&headers))?;
            if !email_graph.add_email(from, to, line)? {
                duplicates += 1;
            }
        }
        if duplicates > 0 {
            debug!(duplicates, "collapsed repeated edges");
        }

        info!(
            nodes = email_graph.node_count(),
            edges = email_graph.edge_count(),
            "email graph loaded"
        );
        Ok(email_graph)
    }

    /// Builds a graph from in-memory parts. Edge "lines" in errors are 1-based
    /// positions in `edges`.
    pub fn from_parts(
        employees: impl IntoIterator<Item = Employee>,
        edges: impl IntoIterator<Item = (u32, u32)>,
    ) -> Result<Self> {
        let mut email_graph = EmailGraph::default();
        for employee in employees {
            if !(1..=DEPARTMENT_COUNT as u8).contains(&employee.dept) {
                return Err(Error::DepartmentOutOfRange {
                    id: employee.id,
                    dept: u32::from(employee.dept),
                });
            }
            email_graph.add_employee(employee)?;
        }
        for (position, (from, to)) in edges.into_iter().enumerate() {
            email_graph.add_email(from, to, position as u64 + 1)?;
        }
        Ok(email_graph)
    }

    fn add_employee(&mut self, employee: Employee) -> Result<NodeIndex> {
        if self.index.contains_key(&employee.id) {
            return Err(Error::DuplicateNode { id: employee.id });
        }
        let node = self.graph.add_node(employee);
        self.index.insert(employee.id, node);
        Ok(node)
    }

    /// Returns `false` when the edge was already present.
    fn add_email(&mut self, from: u32, to: u32, line: u64) -> Result<bool> {
        let a = self.node(from).ok_or(Error::UnknownNode { id: from, line })?;
        let b = self.node(to).ok_or(Error::UnknownNode { id: to, line })?;
        if self.graph.find_edge(a, b).is_some() {
            Ok(false)
        } else {
            self.graph.add_edge(a, b, ());
            Ok(true)
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Node index of the employee with the given id.
    pub fn node(&self, id: u32) -> Option<NodeIndex> {
        self.index.get(&id).copied()
    }

    pub fn employee(&self, node: NodeIndex) -> &Employee {
        &self.graph[node]
    }

    /// Node indices in vertex-table order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn employees(&self) -> impl Iterator<Item = &Employee> + '_ {
        self.graph.node_indices().map(move |node| &self.graph[node])
    }

    pub fn neighbors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(node)
    }

    pub fn has_edge(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.graph.find_edge(a, b).is_some()
    }

    /// Distinct department labels, sorted.
    pub fn departments(&self) -> Vec<u8> {
        let mut depts: Vec<u8> = self.employees().map(|e| e.dept).collect();
        depts.sort_unstable();
        depts.dedup();
        depts
    }

    pub fn inner(&self) -> &UnGraph<Employee, ()> {
        &self.graph
    }
}
