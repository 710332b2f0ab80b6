//! Star-topology graph container
//!
//! Every domain graph in the clinic is a set of independent star centers.
//! A center owns its satellite records directly; centers never reference
//! each other, so a graph is just an insertion-ordered list of centers with
//! an id index on top.

use std::collections::HashMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A star center: a node with a stable id and a display name
pub trait StarNode {
    /// Stable identifier of the center
    fn id(&self) -> &str;

    /// Human-readable name used for name-fragment lookups
    fn name(&self) -> &str;
}

/// Insertion-ordered collection of star centers
///
/// Order is significant: name lookups return the first center in
/// declaration order, mirroring first-match-wins resolution elsewhere.
#[derive(Debug, Clone)]
pub struct StarGraph<N> {
    nodes: Vec<N>,
    index: HashMap<String, usize>,
}

impl<N: StarNode> StarGraph<N> {
    /// Build a graph from centers in declaration order
    ///
    /// When two centers share an id, the first one owns the id slot.
    pub fn from_nodes(nodes: Vec<N>) -> Self {
        let mut index = HashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            index.entry(node.id().to_string()).or_insert(position);
        }
        Self { nodes, index }
    }

    /// Look up a center by id
    pub fn get(&self, id: &str) -> Option<&N> {
        self.index.get(id).map(|&position| &self.nodes[position])
    }

    /// Whether a center with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// First center whose name contains the fragment, ignoring case
    pub fn find_by_name(&self, fragment: &str) -> Option<&N> {
        self.filter_by_name(fragment).next()
    }

    /// All centers whose name contains the fragment, ignoring case
    pub fn filter_by_name<'a>(&'a self, fragment: &str) -> impl Iterator<Item = &'a N> + 'a {
        let needle = fragment.to_lowercase();
        self.nodes
            .iter()
            .filter(move |node| node.name().to_lowercase().contains(&needle))
    }

    /// Ids claimed by more than one center
    pub fn duplicate_ids(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(position, node)| self.index.get(node.id()) != Some(position))
            .map(|(_, node)| node.id())
            .collect()
    }
}

impl<N> StarGraph<N> {
    /// Iterate centers in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, N> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<N> Default for StarGraph<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<'a, N> IntoIterator for &'a StarGraph<N> {
    type Item = &'a N;
    type IntoIter = std::slice::Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl<N: Serialize> Serialize for StarGraph<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.nodes.serialize(serializer)
    }
}

impl<'de, N: Deserialize<'de> + StarNode> Deserialize<'de> for StarGraph<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let graph = Self::from_nodes(Vec::<N>::deserialize(deserializer)?);
        let duplicates = graph.duplicate_ids();
        if !duplicates.is_empty() {
            return Err(D::Error::custom(format!(
                "duplicate node ids: {}",
                duplicates.join(", ")
            )));
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Node {
        id: String,
        name: String,
    }

    impl StarNode for Node {
        fn id(&self) -> &str {
            &self.id
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn node(id: &str, name: &str) -> Node {
        Node {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_get_by_id() {
        let graph = StarGraph::from_nodes(vec![node("A", "Alpha"), node("B", "Beta")]);
        assert_eq!(graph.get("B").map(|n| n.name.as_str()), Some("Beta"));
        assert!(graph.get("C").is_none());
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_find_by_name_is_case_insensitive_and_ordered() {
        let graph = StarGraph::from_nodes(vec![
            node("1", "Lidocaine Injection"),
            node("2", "Lidocaine Gel"),
        ]);
        assert_eq!(graph.find_by_name("LIDOCAINE").map(|n| n.id()), Some("1"));
        assert_eq!(graph.filter_by_name("lidocaine").count(), 2);
        assert!(graph.find_by_name("gloves").is_none());
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let graph = StarGraph::from_nodes(vec![node("A", "First"), node("A", "Second")]);
        assert_eq!(graph.get("A").map(|n| n.name.as_str()), Some("First"));
        assert_eq!(graph.duplicate_ids(), vec!["A"]);
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let json = r#"[{"id":"A","name":"x"},{"id":"A","name":"y"}]"#;
        let result: Result<StarGraph<Node>, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let graph = StarGraph::from_nodes(vec![node("A", "Alpha")]);
        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json, serde_json::json!([{"id": "A", "name": "Alpha"}]));
    }
}
