use petgraph::graph::NodeIndex;
use std::collections::HashMap;

/// Hard partition of a graph's nodes into groups.
///
/// Group ids are compact (`0..len()`) and assigned in first-seen order when
/// walking the nodes by index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Partition {
    node_to_group: Vec<usize>,
    groups: Vec<Vec<NodeIndex>>,
}

impl Partition {
    /// Builds a partition from an arbitrary label per node (indexed by node index).
    pub fn from_labels<K, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Eq + std::hash::Hash,
    {
        let mut relabel: HashMap<K, usize> = HashMap::new();
        let mut node_to_group = Vec::new();
        let mut groups: Vec<Vec<NodeIndex>> = Vec::new();
        for (index, label) in labels.into_iter().enumerate() {
            let next = relabel.len();
            let group = *relabel.entry(label).or_insert(next);
            if group == groups.len() {
                groups.push(Vec::new());
            }
            groups[group].push(NodeIndex::new(index));
            node_to_group.push(group);
        }
        Partition {
            node_to_group,
            groups,
        }
    }

    /// Each node in its own group.
    pub fn singletons(n: usize) -> Self {
        Self::from_labels(0..n)
    }

    pub fn group_of(&self, node: NodeIndex) -> usize {
        self.node_to_group[node.index()]
    }

    pub fn group(&self, group: usize) -> &[NodeIndex] {
        &self.groups[group]
    }

    pub fn groups(&self) -> &[Vec<NodeIndex>] {
        &self.groups
    }

    /// Group id of every node, indexed by node index.
    pub fn labels(&self) -> &[usize] {
        &self.node_to_group
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn num_nodes(&self) -> usize {
        self.node_to_group.len()
    }

    /// True when every node `0..n` belongs to exactly one group.
    pub fn covers(&self, n: usize) -> bool {
        if self.node_to_group.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for (group_id, group) in self.groups.iter().enumerate() {
            for node in group {
                let i = node.index();
                if i >= n || seen[i] || self.node_to_group[i] != group_id {
                    return false;
                }
                seen[i] = true;
            }
        }
        seen.into_iter().all(|s| s)
    }
}
