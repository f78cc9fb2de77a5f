//! Page-session state: the displayed graph and everything derived from it.
//!
//! A [`SessionState`] is created on first load and lives for the page. Every
//! mutation bumps [`SessionState::revision`]; changes to the displayed graph
//! or its highlighting also bump [`SessionState::graph_revision`], which the
//! canvas observes to resync its simulation.

use log::{debug, info, warn};

use crate::components::force_graph::{
	FocusTarget, GraphData, GraphStore, HighlightMap, HighlightPolicy, QueryResponse, reconcile,
};
use crate::config::AppConfig;
use crate::error::{ClientError, ClientResult};
use crate::history::SearchHistory;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
	Info,
	Warning,
	Error,
}

/// One-line message shown above the answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusLine {
	pub kind: StatusKind,
	pub text: String,
}

impl StatusLine {
	fn info(text: impl Into<String>) -> Self {
		Self {
			kind: StatusKind::Info,
			text: text.into(),
		}
	}
}

/// The request currently in flight, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pending {
	Graph,
	Search,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
	NotLoaded,
	Loading,
	Loaded,
}

#[derive(Clone, Debug)]
pub struct SessionState {
	pub store: GraphStore,
	pub highlight: HighlightMap,
	pub focus: FocusTarget,
	pub history: SearchHistory,
	/// Answer text of the latest successful search.
	pub answer: Option<String>,
	/// "Retriever: X | Nodes found: N" for the latest search.
	pub retriever_line: Option<String>,
	pub status: Option<StatusLine>,
	pending: Option<Pending>,
	revision: u64,
	graph_revision: u64,
	policy: HighlightPolicy,
}

impl SessionState {
	pub fn new(config: &AppConfig, history: SearchHistory) -> Self {
		Self {
			store: GraphStore::new(),
			highlight: HighlightMap::default(),
			focus: FocusTarget::All,
			history,
			answer: None,
			retriever_line: None,
			status: None,
			pending: None,
			revision: 0,
			graph_revision: 0,
			policy: HighlightPolicy {
				strong_threshold: config.strong_score_threshold,
			},
		}
	}

	pub fn revision(&self) -> u64 {
		self.revision
	}

	pub fn graph_revision(&self) -> u64 {
		self.graph_revision
	}

	pub fn is_busy(&self) -> bool {
		self.pending.is_some()
	}

	pub fn pending(&self) -> Option<Pending> {
		self.pending
	}

	pub fn load_state(&self) -> LoadState {
		if self.pending == Some(Pending::Graph) {
			LoadState::Loading
		} else if self.store.is_loaded() {
			LoadState::Loaded
		} else {
			LoadState::NotLoaded
		}
	}

	fn touch(&mut self) {
		self.revision += 1;
	}

	fn touch_graph(&mut self) {
		self.graph_revision += 1;
		self.touch();
	}

	fn begin(&mut self, pending: Pending) -> ClientResult<()> {
		if let Some(current) = self.pending {
			debug!("graph-qa: rejecting {:?} while {:?} is running", pending, current);
			return Err(ClientError::Busy);
		}
		self.pending = Some(pending);
		self.touch();
		Ok(())
	}

	/// Marks a full-graph fetch as started.
	pub fn begin_graph_load(&mut self) -> ClientResult<()> {
		self.begin(Pending::Graph)?;
		self.status = Some(StatusLine::info("Loading graph..."));
		Ok(())
	}

	/// Validates `query` and marks a search as started. Returns the trimmed query.
	///
	/// A blank query is reported without touching a request already in flight.
	pub fn begin_search(&mut self, query: &str) -> ClientResult<String> {
		if let Some(current) = self.pending {
			debug!("graph-qa: rejecting search while {:?} is running", current);
			return Err(ClientError::Busy);
		}
		let query = query.trim();
		if query.is_empty() {
			self.report(&ClientError::EmptyQuery);
			return Err(ClientError::EmptyQuery);
		}
		self.begin(Pending::Search)?;
		self.status = Some(StatusLine::info("Searching..."));
		Ok(query.to_string())
	}

	/// Replaces the displayed graph with a full load. Everything renders neutral.
	pub fn apply_full_graph(&mut self, data: GraphData) {
		let report = self.store.replace_all(data.nodes, data.edges);
		if report.edges_dangling > 0 {
			debug!("graph-qa: dropped {} edges with unknown endpoints", report.edges_dangling);
		}
		self.highlight = HighlightMap::neutral(&self.store);
		self.focus = FocusTarget::All;
		self.pending = None;

		let text = if self.store.is_empty() {
			warn!("graph-qa: backend returned an empty graph");
			"Graph contains no nodes".to_string()
		} else {
			format!(
				"Graph loaded: {} nodes, {} edges",
				self.store.node_count(),
				self.store.edge_count()
			)
		};
		info!("graph-qa: {}", text);
		self.status = Some(StatusLine::info(text));
		self.touch_graph();
	}

	/// Merges a search answer into the graph and highlights its nodes.
	///
	/// An empty result set leaves the store untouched and renders every
	/// element inactive; the answer and history entry are still recorded.
	pub fn apply_search(&mut self, query: &str, response: QueryResponse, timestamp: String) {
		let found = response.nodes.len();
		let outcome = reconcile(&mut self.store, response.nodes, response.edges);
		if outcome.grew() {
			info!(
				"graph-qa: added {} nodes ({:?}), {} edges from search",
				outcome.report.nodes_added, outcome.missing, outcome.report.edges_added
			);
		}

		self.highlight = self.policy.apply(&outcome.results, &self.store);
		self.focus = FocusTarget::select(&self.highlight);
		self.retriever_line = Some(format!(
			"Retriever: {} | Nodes found: {}",
			response.retriever_used, found
		));
		self.history.push(query, &response.answer, timestamp);
		self.answer = Some(response.answer);
		self.pending = None;
		self.status = if outcome.results.is_empty() {
			Some(StatusLine {
				kind: StatusKind::Warning,
				text: ClientError::EmptyResult.to_string(),
			})
		} else {
			None
		};
		self.touch_graph();
	}

	/// Empties the graph. The caller follows up with a full reload.
	pub fn clear(&mut self) -> ClientResult<()> {
		if let Some(current) = self.pending {
			debug!("graph-qa: rejecting clear while {:?} is running", current);
			return Err(ClientError::Busy);
		}
		self.store.clear();
		self.highlight = HighlightMap::default();
		self.focus = FocusTarget::All;
		self.answer = None;
		self.retriever_line = None;
		self.status = Some(StatusLine::info("Graph cleared"));
		info!("graph-qa: graph cleared");
		self.touch_graph();
		Ok(())
	}

	/// Ends the in-flight request with `err`. The graph is left as it was.
	pub fn fail(&mut self, err: ClientError) {
		if err == ClientError::Busy {
			debug!("graph-qa: {}", err);
			return;
		}
		self.pending = None;
		self.report(&err);
	}

	/// Shows `err` in the status line.
	fn report(&mut self, err: &ClientError) {
		warn!("graph-qa: {}", err);
		let kind = match err {
			ClientError::EmptyQuery | ClientError::EmptyResult => StatusKind::Warning,
			_ => StatusKind::Error,
		};
		self.status = Some(StatusLine {
			kind,
			text: format!("Error: {err}"),
		});
		self.touch();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::{GraphEdge, GraphNode, NodeType, VisualState};
	use pretty_assertions::assert_eq;
	use serde_json::json;

	fn session() -> SessionState {
		SessionState::new(&AppConfig::default(), SearchHistory::new(10, 100))
	}

	fn graph() -> GraphData {
		GraphData {
			nodes: vec![
				GraphNode::new("A", NodeType::Article),
				GraphNode::new("B", NodeType::Media),
				GraphNode::new("C", NodeType::Category),
			],
			edges: vec![GraphEdge::new("A", "B", "HAS_MEDIA"), GraphEdge::new("B", "C", "IN")],
		}
	}

	fn response(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> QueryResponse {
		QueryResponse {
			answer: "because".into(),
			retriever_used: "vector".into(),
			nodes,
			edges,
		}
	}

	fn loaded() -> SessionState {
		let mut s = session();
		s.begin_graph_load().unwrap();
		s.apply_full_graph(graph());
		s
	}

	#[test]
	fn lifecycle_moves_through_load_states() {
		let mut s = session();
		assert_eq!(s.load_state(), LoadState::NotLoaded);
		s.begin_graph_load().unwrap();
		assert_eq!(s.load_state(), LoadState::Loading);
		s.apply_full_graph(graph());
		assert_eq!(s.load_state(), LoadState::Loaded);
		assert_eq!(s.status.as_ref().unwrap().text, "Graph loaded: 3 nodes, 2 edges");
		assert!(!s.highlight.search_active());

		s.clear().unwrap();
		assert_eq!(s.load_state(), LoadState::NotLoaded);
		assert_eq!(s.store.node_count(), 0);
	}

	#[test]
	fn empty_graph_is_loaded_but_empty() {
		let mut s = session();
		s.begin_graph_load().unwrap();
		s.apply_full_graph(GraphData::default());
		assert_eq!(s.load_state(), LoadState::Loaded);
		assert_eq!(s.status.as_ref().unwrap().text, "Graph contains no nodes");
	}

	#[test]
	fn requests_are_serialized() {
		let mut s = session();
		s.begin_graph_load().unwrap();
		assert_eq!(s.begin_search("x"), Err(ClientError::Busy));
		assert_eq!(s.clear(), Err(ClientError::Busy));
		s.apply_full_graph(graph());
		assert_eq!(s.begin_search("  x ").unwrap(), "x");
	}

	#[test]
	fn blank_query_during_load_keeps_request_pending() {
		let mut s = session();
		s.begin_graph_load().unwrap();
		let rev = s.revision();

		assert_eq!(s.begin_search("  "), Err(ClientError::Busy));
		assert!(s.is_busy());
		assert_eq!(s.load_state(), LoadState::Loading);
		assert_eq!(s.begin_search("x"), Err(ClientError::Busy));
		assert_eq!(s.revision(), rev);
	}

	#[test]
	fn blank_query_reports_once() {
		let mut s = loaded();
		let rev = s.revision();
		assert_eq!(s.begin_search(""), Err(ClientError::EmptyQuery));
		assert_eq!(s.revision(), rev + 1);
		assert_eq!(s.status.as_ref().unwrap().text, "Error: please enter a query");
	}

	#[test]
	fn blank_query_is_rejected_without_touching_graph() {
		let mut s = loaded();
		let before = s.store.node_count();
		assert_eq!(s.begin_search("   "), Err(ClientError::EmptyQuery));
		assert!(!s.is_busy());
		assert_eq!(s.store.node_count(), before);
		assert_eq!(s.status.as_ref().unwrap().kind, StatusKind::Warning);
	}

	#[test]
	fn search_highlights_and_merges() {
		let mut s = loaded();
		let query = s.begin_search("what links A and D?").unwrap();
		let a = GraphNode::new("A", NodeType::Article).with_property("similarity_score", json!(0.9));
		let d = GraphNode::new("D", NodeType::Content).with_property("similarity_score", json!(0.5));
		s.apply_search(
			&query,
			response(vec![a, d], vec![GraphEdge::new("A", "D", "MENTIONS")]),
			"2026-01-01T00:00:00.000Z".into(),
		);

		assert_eq!(s.store.node_count(), 4);
		let key = |id: &str| s.store.key_of(id).unwrap();
		assert_eq!(s.highlight.node(key("A")), VisualState::HighlightedStrong);
		assert_eq!(s.highlight.node(key("D")), VisualState::HighlightedNormal);
		assert_eq!(s.highlight.node(key("B")), VisualState::Inactive);
		assert_eq!(s.focus, FocusTarget::Subset(vec![key("A"), key("D")]));
		assert_eq!(s.retriever_line.as_deref(), Some("Retriever: vector | Nodes found: 2"));
		assert_eq!(s.answer.as_deref(), Some("because"));
		assert_eq!(s.history.entries()[0].query, "what links A and D?");
		assert!(s.status.is_none());
	}

	#[test]
	fn empty_search_result_leaves_store_and_dims_everything() {
		let mut s = loaded();
		let rev = s.revision();
		s.begin_search("nothing").unwrap();
		s.apply_search("nothing", response(vec![], vec![]), String::new());

		assert_eq!(s.store.node_count(), 3);
		assert_eq!(s.store.edge_count(), 2);
		assert_eq!(s.highlight.inactive_count(), 3);
		assert_eq!(s.focus, FocusTarget::All);
		assert_eq!(s.status.as_ref().unwrap().kind, StatusKind::Warning);
		assert_eq!(s.history.entries().len(), 1);
		assert!(s.revision() > rev);
	}

	#[test]
	fn only_graph_changes_bump_graph_revision() {
		let mut s = loaded();
		let graph_rev = s.graph_revision();
		s.begin_search("q").unwrap();
		s.fail(ClientError::Status {
			status: 500,
			body: String::new(),
		});
		assert_eq!(s.graph_revision(), graph_rev);

		s.clear().unwrap();
		assert_eq!(s.graph_revision(), graph_rev + 1);
	}

	#[test]
	fn failure_keeps_graph_intact() {
		let mut s = loaded();
		s.begin_search("q").unwrap();
		s.fail(ClientError::Network("refused".into()));

		assert!(!s.is_busy());
		assert_eq!(s.store.node_count(), 3);
		let status = s.status.clone().unwrap();
		assert_eq!(status.kind, StatusKind::Error);
		assert_eq!(status.text, "Error: request failed: refused");
	}

	#[test]
	fn repeated_search_is_idempotent() {
		let mut s = loaded();
		let payload = || response(vec![GraphNode::new("E", NodeType::Content)], vec![]);
		s.begin_search("q").unwrap();
		s.apply_search("q", payload(), String::new());
		let (nodes, edges) = (s.store.node_count(), s.store.edge_count());
		s.begin_search("q").unwrap();
		s.apply_search("q", payload(), String::new());

		assert_eq!((s.store.node_count(), s.store.edge_count()), (nodes, edges));
	}
}
