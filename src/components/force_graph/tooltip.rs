//! Hover tooltip contents for nodes and edges.

use super::store::StoredEdge;
use super::types::{GraphNode, NodeType, value_to_string};

/// Properties shown first, in this order, when present.
pub const IMPORTANT_PROPERTIES: [&str; 6] = ["name", "title", "text", "url", "category", "media_name"];
const IMPORTANT_MAX_CHARS: usize = 100;
const OTHER_MAX_CHARS: usize = 50;
const OTHER_MAX_COUNT: usize = 5;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tooltip {
	pub title: String,
	pub rows: Vec<(String, String)>,
}

/// Cuts `text` to `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
	match text.char_indices().nth(max) {
		Some((byte, _)) => format!("{}...", &text[..byte]),
		None => text.to_string(),
	}
}

pub fn node_tooltip(node: &GraphNode) -> Tooltip {
	let title = match node.node_type {
		NodeType::Unknown => "Node".to_string(),
		t => t.as_str().to_string(),
	};
	let mut rows = vec![("ID".to_string(), node.id.clone())];
	if node.display_label() != node.id {
		rows.push(("Label".to_string(), node.label.clone()));
	}

	for key in IMPORTANT_PROPERTIES {
		if let Some(value) = node.properties.get(key).filter(|v| !v.is_null()) {
			rows.push((key.to_string(), truncate(&value_to_string(value), IMPORTANT_MAX_CHARS)));
		}
	}

	rows.extend(
		node.properties
			.iter()
			.filter(|(k, _)| !IMPORTANT_PROPERTIES.contains(&k.as_str()))
			.take(OTHER_MAX_COUNT)
			.filter(|(_, v)| !v.is_null())
			.map(|(k, v)| (k.clone(), truncate(&value_to_string(v), OTHER_MAX_CHARS))),
	);

	Tooltip { title, rows }
}

pub fn edge_tooltip(edge: &StoredEdge) -> Tooltip {
	let mut rows = vec![
		("Type".to_string(), edge.edge.relationship.clone()),
		("From".to_string(), edge.edge.source.clone()),
		("To".to_string(), edge.edge.target.clone()),
	];
	rows.extend(
		edge.edge
			.properties
			.iter()
			.map(|(k, v)| (k.clone(), value_to_string(v))),
	);
	Tooltip {
		title: "Relationship".to_string(),
		rows,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::store::NodeKey;
	use crate::components::force_graph::types::GraphEdge;
	use pretty_assertions::assert_eq;
	use serde_json::Value;

	#[test]
	fn truncation_counts_characters() {
		assert_eq!(truncate("short", 10), "short");
		assert_eq!(truncate("abcdef", 3), "abc...");
		assert_eq!(truncate("가나다라", 2), "가나...");
	}

	#[test]
	fn node_tooltip_orders_rows() {
		let mut node = GraphNode::new("7", NodeType::Article)
			.with_property("zeta", "z")
			.with_property("title", "x".repeat(120))
			.with_property("url", "http://example.com")
			.with_property("empty", Value::Null);
		node.label = "Seven".into();

		let tip = node_tooltip(&node);

		assert_eq!(tip.title, "Article");
		let keys: Vec<&str> = tip.rows.iter().map(|(k, _)| k.as_str()).collect();
		assert_eq!(keys, vec!["ID", "Label", "title", "url", "zeta"]);
		assert_eq!(tip.rows[2].1.len(), 103);
	}

	#[test]
	fn unknown_nodes_use_generic_title_and_skip_label() {
		let tip = node_tooltip(&GraphNode::new("n", NodeType::Unknown));
		assert_eq!(tip.title, "Node");
		assert_eq!(tip.rows, vec![("ID".to_string(), "n".to_string())]);
	}

	#[test]
	fn other_properties_are_capped() {
		let mut node = GraphNode::new("n", NodeType::Content);
		for i in 0..8 {
			node = node.with_property(&format!("p{i}"), i);
		}
		let tip = node_tooltip(&node);
		assert_eq!(tip.rows.len(), 1 + 5);
	}

	#[test]
	fn other_properties_keep_payload_order() {
		let node: GraphNode = serde_json::from_str(
			r#"{ "id": "n", "properties": {
				"zulu": 1, "yankee": 2, "name": "N", "xray": 3,
				"whiskey": 4, "victor": 5, "alpha": 6
			} }"#,
		)
		.unwrap();

		let keys: Vec<String> = node_tooltip(&node).rows.into_iter().map(|(k, _)| k).collect();
		assert_eq!(keys, vec!["ID", "name", "zulu", "yankee", "xray", "whiskey", "victor"]);
	}

	#[test]
	fn edge_tooltip_lists_endpoints() {
		let mut edge = GraphEdge::new("a", "b", "MENTIONS");
		edge.properties.insert("weight".into(), 2.into());
		let stored = StoredEdge {
			id: "a-b-MENTIONS".into(),
			source: NodeKey(0),
			target: NodeKey(1),
			edge,
		};

		let tip = edge_tooltip(&stored);
		assert_eq!(tip.title, "Relationship");
		assert_eq!(
			tip.rows,
			vec![
				("Type".to_string(), "MENTIONS".to_string()),
				("From".to_string(), "a".to_string()),
				("To".to_string(), "b".to_string()),
				("weight".to_string(), "2".to_string()),
			]
		);
	}
}
