//! Community structure of an email-communication graph.
//!
//! Loads employees (with their department) and the emails between them into an
//! undirected graph, then finds connected components, Louvain communities and
//! maximal cliques, and compares the communities with the departments.
//!
//! ```no_run
//! use email_communities::{Analysis, EmailGraph, Louvain};
//!
//! let graph = EmailGraph::from_csv("email_vertices.csv", "email_edgelist.csv")?;
//! let analysis = Analysis::run(&graph, &Louvain::new())?;
//! println!(
//!     "louvain {:.3} vs departments {:.3}",
//!     analysis.communities.modularity(),
//!     analysis.ground_truth.modularity()
//! );
//! # Ok::<(), email_communities::Error>(())
//! ```

pub mod analysis;
pub mod cliques;
pub mod components;
pub mod config;
pub mod error;
pub mod graph;
pub mod ground_truth;
pub mod louvain;
pub mod matrix;
pub mod modularity;
pub mod partition;
pub mod render;
pub mod report;
pub mod synthetic;

pub use analysis::Analysis;
pub use cliques::{CliqueReport, find_maximal_cliques};
pub use components::{Components, connected_components};
pub use error::{Error, Result};
pub use graph::{DEPARTMENT_COUNT, EmailGraph, Employee};
pub use ground_truth::GroundTruth;
pub use louvain::{Communities, Louvain};
pub use matrix::DepartmentMatrix;
pub use modularity::modularity;
pub use partition::Partition;
pub use synthetic::SyntheticConfig;
