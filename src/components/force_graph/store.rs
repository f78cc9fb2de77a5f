//! Canonical in-memory graph owned by the page session.
//!
//! The store assigns every node a dense [`NodeKey`] which doubles as the
//! render-element id used by the layout simulation, and keeps the mapping
//! between domain ids and keys in both directions. Edges are only stored
//! when both endpoints are present, and are deduplicated on their
//! `(source, target, relationship)` identity.

use std::collections::{HashMap, HashSet};

use super::types::{GraphEdge, GraphNode};

/// Render-element id of a stored node. Dense, assigned in insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub usize);

/// Identity of an edge for deduplication.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EdgeIdentity {
	pub source: String,
	pub target: String,
	pub relationship: String,
}

impl EdgeIdentity {
	pub fn of(edge: &GraphEdge) -> Self {
		Self {
			source: edge.source.clone(),
			target: edge.target.clone(),
			relationship: edge.relationship.clone(),
		}
	}

	/// Derived edge id, unique within the store because identities are.
	pub fn edge_id(&self) -> String {
		format!("{}-{}-{}", self.source, self.target, self.relationship)
	}
}

/// An edge that made it into the store, with its endpoints resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredEdge {
	pub id: String,
	pub source: NodeKey,
	pub target: NodeKey,
	pub edge: GraphEdge,
}

/// Counts describing what a single insertion pass changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InsertReport {
	pub nodes_added: usize,
	pub edges_added: usize,
	/// Edges skipped because an endpoint was missing.
	pub edges_dangling: usize,
	/// Edges skipped because their identity was already stored.
	pub edges_duplicate: usize,
}

#[derive(Clone, Debug, Default)]
pub struct GraphStore {
	nodes: Vec<GraphNode>,
	keys: HashMap<String, NodeKey>,
	edges: Vec<StoredEdge>,
	edge_ids: HashSet<EdgeIdentity>,
	loaded: bool,
	generation: u64,
}

impl GraphStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Clears everything, then inserts `nodes` and the edges whose endpoints
	/// exist afterwards. An empty `nodes` leaves a loaded, empty store.
	pub fn replace_all(&mut self, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> InsertReport {
		self.reset();
		self.loaded = true;
		let mut report = InsertReport {
			nodes_added: self.insert_nodes(nodes),
			..Default::default()
		};
		self.insert_edges(edges, &mut report, |_| true);
		report
	}

	/// Inserts nodes not already present, then edges whose endpoints are
	/// present and whose identity is new. Never removes anything.
	pub fn merge(&mut self, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> InsertReport {
		self.merge_filtered(nodes, edges, |_| true)
	}

	/// Like [`merge`](Self::merge), but only edges accepted by `keep` are
	/// considered for insertion.
	pub fn merge_filtered(
		&mut self,
		nodes: Vec<GraphNode>,
		edges: Vec<GraphEdge>,
		keep: impl Fn(&GraphEdge) -> bool,
	) -> InsertReport {
		let mut report = InsertReport {
			nodes_added: self.insert_nodes(nodes),
			..Default::default()
		};
		self.insert_edges(edges, &mut report, keep);
		report
	}

	/// Empties the store and returns it to the "never loaded" state.
	pub fn clear(&mut self) {
		self.reset();
		self.loaded = false;
	}

	fn reset(&mut self) {
		self.nodes.clear();
		self.keys.clear();
		self.edges.clear();
		self.edge_ids.clear();
		self.generation += 1;
	}

	fn insert_nodes(&mut self, nodes: Vec<GraphNode>) -> usize {
		let mut added = 0;
		for mut node in nodes {
			if self.keys.contains_key(&node.id) {
				continue;
			}
			if node.label.is_empty() {
				node.label = node.id.clone();
			}
			let key = NodeKey(self.nodes.len());
			self.keys.insert(node.id.clone(), key);
			self.nodes.push(node);
			added += 1;
		}
		added
	}

	fn insert_edges(
		&mut self,
		edges: Vec<GraphEdge>,
		report: &mut InsertReport,
		keep: impl Fn(&GraphEdge) -> bool,
	) {
		for edge in edges {
			if !keep(&edge) {
				continue;
			}
			let (Some(&source), Some(&target)) =
				(self.keys.get(&edge.source), self.keys.get(&edge.target))
			else {
				report.edges_dangling += 1;
				continue;
			};
			let identity = EdgeIdentity::of(&edge);
			if self.edge_ids.contains(&identity) {
				report.edges_duplicate += 1;
				continue;
			}
			self.edges.push(StoredEdge {
				id: identity.edge_id(),
				source,
				target,
				edge,
			});
			self.edge_ids.insert(identity);
			report.edges_added += 1;
		}
	}

	/// Whether a full graph has been loaded since creation or the last clear.
	pub fn is_loaded(&self) -> bool {
		self.loaded
	}

	/// Bumped whenever previously issued keys become invalid.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.keys.contains_key(id)
	}

	pub fn key_of(&self, id: &str) -> Option<NodeKey> {
		self.keys.get(id).copied()
	}

	pub fn id_of(&self, key: NodeKey) -> Option<&str> {
		self.nodes.get(key.0).map(|n| n.id.as_str())
	}

	pub fn node(&self, key: NodeKey) -> Option<&GraphNode> {
		self.nodes.get(key.0)
	}

	/// Nodes paired with their keys, in insertion order.
	pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &GraphNode)> {
		self.nodes.iter().enumerate().map(|(i, n)| (NodeKey(i), n))
	}

	pub fn all_node_ids(&self) -> Vec<String> {
		self.nodes.iter().map(|n| n.id.clone()).collect()
	}

	pub fn all_edges(&self) -> &[StoredEdge] {
		&self.edges
	}

	pub fn has_edge(&self, identity: &EdgeIdentity) -> bool {
		self.edge_ids.contains(identity)
	}
}
