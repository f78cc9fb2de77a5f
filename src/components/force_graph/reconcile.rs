//! Merging query results into the displayed graph.
//!
//! Results only ever add to the store. Nodes missing from the store are
//! inserted as supplied; edges are inserted only when both endpoints belong
//! to the result set, so a new result node is never wired to an older,
//! unrelated node through an edge the query did not return.

use std::collections::{HashMap, HashSet};

use log::debug;

use super::store::{GraphStore, InsertReport};
use super::types::{GraphEdge, GraphNode};

/// Relevance assumed for result nodes that carry no score.
pub const DEFAULT_SCORE: f64 = 1.0;

/// Ids and scores extracted from a result payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultSet {
	pub ids: HashSet<String>,
	pub scores: HashMap<String, f64>,
}

impl ResultSet {
	pub fn from_nodes(nodes: &[GraphNode]) -> Self {
		let mut set = Self::default();
		for node in nodes {
			set.ids.insert(node.id.clone());
			set.scores
				.entry(node.id.clone())
				.or_insert_with(|| node.score().unwrap_or(DEFAULT_SCORE));
		}
		set
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.ids.contains(id)
	}

	pub fn score(&self, id: &str) -> f64 {
		self.scores.get(id).copied().unwrap_or(DEFAULT_SCORE)
	}
}

/// What a reconciliation pass did to the store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reconciliation {
	pub results: ResultSet,
	/// Result ids that were not in the store before this pass, sorted.
	pub missing: Vec<String>,
	pub report: InsertReport,
}

impl Reconciliation {
	pub fn grew(&self) -> bool {
		self.report.nodes_added > 0 || self.report.edges_added > 0
	}
}

/// Merges a search-result payload into `store`.
pub fn reconcile(store: &mut GraphStore, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Reconciliation {
	let results = ResultSet::from_nodes(&nodes);

	let mut missing: Vec<String> = results
		.ids
		.iter()
		.filter(|id| !store.contains(id))
		.cloned()
		.collect();
	missing.sort();

	if missing.is_empty() {
		debug!("graph-qa: all {} result nodes already displayed", results.ids.len());
		return Reconciliation {
			results,
			missing,
			report: InsertReport::default(),
		};
	}

	let to_insert: Vec<GraphNode> = nodes
		.into_iter()
		.filter(|n| !store.contains(&n.id))
		.collect();
	let report = store.merge_filtered(to_insert, edges, |e| {
		results.contains(&e.source) && results.contains(&e.target)
	});
	debug!(
		"graph-qa: reconciled {} missing result nodes, {} edges added, {} duplicate",
		report.nodes_added, report.edges_added, report.edges_duplicate
	);

	Reconciliation {
		results,
		missing,
		report,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::store::EdgeIdentity;
	use crate::components::force_graph::types::NodeType;
	use pretty_assertions::assert_eq;

	fn node(id: &str) -> GraphNode {
		GraphNode::new(id, NodeType::Content)
	}

	fn loaded_store() -> GraphStore {
		let mut store = GraphStore::new();
		store.replace_all(
			vec![node("a"), node("b"), node("c")],
			vec![GraphEdge::new("a", "b", "R")],
		);
		store
	}

	#[test]
	fn empty_result_leaves_store_unchanged() {
		let mut store = loaded_store();
		let before = store.clone();

		let rec = reconcile(&mut store, vec![], vec![]);

		assert!(rec.results.is_empty());
		assert!(!rec.grew());
		assert_eq!(store.all_node_ids(), before.all_node_ids());
		assert_eq!(store.all_edges(), before.all_edges());
	}

	#[test]
	fn inserts_missing_nodes_with_their_data() {
		let mut store = loaded_store();
		let mut fresh = node("d").with_property("similarity_score", 0.3);
		fresh.label = "Fresh".into();
		fresh.node_type = NodeType::Media;

		let rec = reconcile(&mut store, vec![node("a"), fresh], vec![]);

		assert_eq!(rec.missing, vec!["d".to_string()]);
		assert_eq!(rec.report.nodes_added, 1);
		let stored = store.node(store.key_of("d").unwrap()).unwrap();
		assert_eq!(stored.label, "Fresh");
		assert_eq!(stored.node_type, NodeType::Media);
		assert_eq!(rec.results.score("d"), 0.3);
		assert_eq!(rec.results.score("a"), DEFAULT_SCORE);
	}

	#[test]
	fn only_edges_internal_to_results_are_added() {
		let mut store = loaded_store();

		let rec = reconcile(
			&mut store,
			vec![node("a"), node("d"), node("e")],
			vec![
				GraphEdge::new("d", "e", "R"),
				GraphEdge::new("d", "c", "R"),
				GraphEdge::new("a", "d", "R"),
			],
		);

		assert_eq!(rec.report.edges_added, 2);
		assert!(store.has_edge(&EdgeIdentity::of(&GraphEdge::new("d", "e", "R"))));
		assert!(store.has_edge(&EdgeIdentity::of(&GraphEdge::new("a", "d", "R"))));
		assert!(!store.has_edge(&EdgeIdentity::of(&GraphEdge::new("d", "c", "R"))));
	}

	#[test]
	fn no_edges_added_when_every_result_is_known() {
		let mut store = loaded_store();

		let rec = reconcile(
			&mut store,
			vec![node("b"), node("c")],
			vec![GraphEdge::new("b", "c", "R")],
		);

		assert!(rec.missing.is_empty());
		assert_eq!(store.edge_count(), 1);
	}

	#[test]
	fn reconciling_twice_is_idempotent() {
		let payload = (
			vec![node("a"), node("x"), node("y")],
			vec![GraphEdge::new("x", "y", "R"), GraphEdge::new("a", "x", "S")],
		);
		let mut once = loaded_store();
		reconcile(&mut once, payload.0.clone(), payload.1.clone());
		let mut twice = once.clone();

		let second = reconcile(&mut twice, payload.0, payload.1);

		assert!(!second.grew());
		assert_eq!(once.all_node_ids(), twice.all_node_ids());
		assert_eq!(once.all_edges(), twice.all_edges());
	}
}
