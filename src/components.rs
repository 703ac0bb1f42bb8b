use crate::graph::EmailGraph;
use petgraph::{algo::tarjan_scc, graph::NodeIndex};
use tracing::debug;

/// Connected components of the email graph.
#[derive(Debug, Clone)]
pub struct Components {
    components: Vec<Vec<NodeIndex>>,
    largest: Option<usize>,
}

impl Components {
    /// All components, ordered by their lowest node index. Nodes within a
    /// component are sorted.
    pub fn all(&self) -> &[Vec<NodeIndex>] {
        &self.components
    }

    /// The component with the most nodes. Ties go to the one listed first.
    pub fn largest(&self) -> Option<&[NodeIndex]> {
        self.largest.map(|i| self.components[i].as_slice())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Splits the graph into connected components.
///
/// On an undirected graph every strongly connected component is a connected
/// component, so Tarjan's traversal gives them directly.
pub fn connected_components(graph: &EmailGraph) -> Components {
    let mut components = tarjan_scc(graph.inner());
    for component in components.iter_mut() {
        component.sort_unstable();
    }
    components.sort_unstable_by_key(|component| component[0]);

    let largest = components
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, usize)>, (i, c)| match best {
            Some((_, len)) if len >= c.len() => best,
            _ => Some((i, c.len())),
        })
        .map(|(i, _)| i);

    debug!(
        components = components.len(),
        largest = largest.map(|i| components[i].len()).unwrap_or(0),
        "connected components"
    );
    Components {
        components,
        largest,
    }
}
