//! Visual state of every stored element relative to the latest search.
//!
//! The map is always rebuilt from scratch for the whole store; nothing is
//! carried over from a previous search.

use log::debug;

use super::reconcile::ResultSet;
use super::store::{GraphStore, NodeKey};

/// Scores at or above this value render as strong highlights.
pub const STRONG_SCORE_THRESHOLD: f64 = 0.7;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VisualState {
	HighlightedStrong,
	HighlightedNormal,
	Inactive,
	/// No search applied since the last full load.
	#[default]
	Neutral,
}

impl VisualState {
	pub fn is_highlighted(self) -> bool {
		matches!(self, VisualState::HighlightedStrong | VisualState::HighlightedNormal)
	}
}

/// Per-element visual state, indexed like the store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighlightMap {
	nodes: Vec<VisualState>,
	edges: Vec<VisualState>,
	search_active: bool,
}

impl HighlightMap {
	/// Every element neutral: the state right after a full load.
	pub fn neutral(store: &GraphStore) -> Self {
		Self {
			nodes: vec![VisualState::Neutral; store.node_count()],
			edges: vec![VisualState::Neutral; store.edge_count()],
			search_active: false,
		}
	}

	pub fn node(&self, key: NodeKey) -> VisualState {
		self.nodes.get(key.0).copied().unwrap_or_default()
	}

	/// State of the edge at `index` in [`GraphStore::all_edges`].
	pub fn edge(&self, index: usize) -> VisualState {
		self.edges.get(index).copied().unwrap_or_default()
	}

	pub fn search_active(&self) -> bool {
		self.search_active
	}

	pub fn highlighted_nodes(&self) -> Vec<NodeKey> {
		self.nodes
			.iter()
			.enumerate()
			.filter(|(_, s)| s.is_highlighted())
			.map(|(i, _)| NodeKey(i))
			.collect()
	}

	pub fn highlighted_count(&self) -> usize {
		self.nodes.iter().filter(|s| s.is_highlighted()).count()
	}

	pub fn inactive_count(&self) -> usize {
		self.nodes.iter().filter(|s| **s == VisualState::Inactive).count()
	}
}

/// Classifies elements against a result set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HighlightPolicy {
	pub strong_threshold: f64,
}

impl Default for HighlightPolicy {
	fn default() -> Self {
		Self {
			strong_threshold: STRONG_SCORE_THRESHOLD,
		}
	}
}

impl HighlightPolicy {
	pub fn node_state(&self, results: &ResultSet, id: &str) -> VisualState {
		if !results.contains(id) {
			VisualState::Inactive
		} else if results.score(id) >= self.strong_threshold {
			VisualState::HighlightedStrong
		} else {
			VisualState::HighlightedNormal
		}
	}

	/// Highlighted edges get the strong tier; edges have no score of their own.
	pub fn edge_state(&self, results: &ResultSet, source: &str, target: &str) -> VisualState {
		if results.contains(source) && results.contains(target) {
			VisualState::HighlightedStrong
		} else {
			VisualState::Inactive
		}
	}

	/// Recomputes the visual state of every element in `store`.
	///
	/// With an empty result set everything comes out inactive.
	pub fn apply(&self, results: &ResultSet, store: &GraphStore) -> HighlightMap {
		let nodes = store
			.nodes()
			.map(|(_, node)| self.node_state(results, &node.id))
			.collect();
		let edges = store
			.all_edges()
			.iter()
			.map(|e| self.edge_state(results, &e.edge.source, &e.edge.target))
			.collect();

		let map = HighlightMap {
			nodes,
			edges,
			search_active: true,
		};
		debug!(
			"graph-qa: highlight {} nodes, {} inactive",
			map.highlighted_count(),
			map.inactive_count()
		);
		map
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphEdge, GraphNode, NodeType};
	use pretty_assertions::assert_eq;

	fn store() -> GraphStore {
		let mut store = GraphStore::new();
		store.replace_all(
			["A", "B", "C"]
				.iter()
				.map(|id| GraphNode::new(*id, NodeType::Category))
				.collect(),
			vec![
				GraphEdge::new("A", "B", "R"),
				GraphEdge::new("B", "C", "R"),
				GraphEdge::new("C", "A", "R"),
			],
		);
		store
	}

	fn results(scores: &[(&str, f64)]) -> ResultSet {
		let nodes: Vec<GraphNode> = scores
			.iter()
			.map(|(id, s)| GraphNode::new(*id, NodeType::Category).with_property("relevance_score", *s))
			.collect();
		ResultSet::from_nodes(&nodes)
	}

	#[test]
	fn scores_pick_highlight_tier() {
		let store = store();
		let map = HighlightPolicy::default().apply(&results(&[("A", 0.9), ("B", 0.4)]), &store);

		assert_eq!(map.node(store.key_of("A").unwrap()), VisualState::HighlightedStrong);
		assert_eq!(map.node(store.key_of("B").unwrap()), VisualState::HighlightedNormal);
		assert_eq!(map.node(store.key_of("C").unwrap()), VisualState::Inactive);

		assert!(map.edge(0).is_highlighted());
		assert_eq!(map.edge(1), VisualState::Inactive);
		assert_eq!(map.edge(2), VisualState::Inactive);
	}

	#[test]
	fn threshold_is_inclusive() {
		let policy = HighlightPolicy::default();
		let set = results(&[("A", 0.7)]);
		assert_eq!(policy.node_state(&set, "A"), VisualState::HighlightedStrong);
	}

	#[test]
	fn missing_score_counts_as_full_relevance() {
		let set = ResultSet::from_nodes(&[GraphNode::new("A", NodeType::Article)]);
		assert_eq!(
			HighlightPolicy::default().node_state(&set, "A"),
			VisualState::HighlightedStrong
		);
	}

	#[test]
	fn empty_results_mark_everything_inactive() {
		let store = store();
		let map = HighlightPolicy::default().apply(&ResultSet::default(), &store);

		assert!(map.search_active());
		assert_eq!(map.inactive_count(), 3);
		assert!((0..3).all(|i| map.edge(i) == VisualState::Inactive));
	}

	#[test]
	fn recomputation_does_not_leak_previous_search() {
		let store = store();
		let policy = HighlightPolicy::default();
		policy.apply(&results(&[("A", 1.0)]), &store);
		let map = policy.apply(&results(&[("C", 1.0)]), &store);

		assert_eq!(map.highlighted_nodes(), vec![store.key_of("C").unwrap()]);
	}

	#[test]
	fn neutral_map_covers_store() {
		let store = store();
		let map = HighlightMap::neutral(&store);
		assert!(!map.search_active());
		assert_eq!(map.highlighted_count(), 0);
		assert_eq!(map.node(NodeKey(2)), VisualState::Neutral);
	}
}
