//! Graph data structures exchanged with the backend.
//!
//! Deserialization is permissive: absent fields fall back to defaults rather
//! than failing the whole payload, and ids arrive either as JSON strings or
//! numbers and are normalized to strings.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Relationship label used when the backend omits one.
pub const DEFAULT_RELATIONSHIP: &str = "RELATED";

/// Category of a node as reported by the graph database.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum NodeType {
	Article,
	Media,
	Category,
	Content,
	#[default]
	#[serde(other)]
	Unknown,
}

impl NodeType {
	pub fn as_str(self) -> &'static str {
		match self {
			NodeType::Article => "Article",
			NodeType::Media => "Media",
			NodeType::Category => "Category",
			NodeType::Content => "Content",
			NodeType::Unknown => "Unknown",
		}
	}
}

/// A node in the graph.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphNode {
	/// Stable identifier, unique within the store.
	#[serde(deserialize_with = "id_string")]
	pub id: String,
	/// Display text. Empty labels are replaced by the id on ingest.
	#[serde(default)]
	pub label: String,
	#[serde(rename = "type", default, deserialize_with = "node_type")]
	pub node_type: NodeType,
	/// Open-ended property bag. May carry `similarity_score` / `relevance_score`.
	#[serde(default, deserialize_with = "property_map")]
	pub properties: Map<String, Value>,
}

impl GraphNode {
	pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
		let id = id.into();
		Self {
			label: id.clone(),
			id,
			node_type,
			properties: Map::new(),
		}
	}

	pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
		self.properties.insert(key.to_string(), value.into());
		self
	}

	/// Label to display, falling back to the id.
	pub fn display_label(&self) -> &str {
		if self.label.is_empty() {
			&self.id
		} else {
			&self.label
		}
	}

	/// Relevance score attached by the query backend, if any.
	///
	/// `similarity_score` wins over `relevance_score`.
	pub fn score(&self) -> Option<f64> {
		["similarity_score", "relevance_score"]
			.iter()
			.find_map(|key| self.properties.get(*key).and_then(Value::as_f64))
	}
}

/// A relationship between two nodes.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphEdge {
	#[serde(deserialize_with = "id_string")]
	pub source: String,
	#[serde(deserialize_with = "id_string")]
	pub target: String,
	#[serde(default = "default_relationship", deserialize_with = "relationship")]
	pub relationship: String,
	#[serde(default, deserialize_with = "property_map")]
	pub properties: Map<String, Value>,
}

impl GraphEdge {
	pub fn new(source: impl Into<String>, target: impl Into<String>, relationship: &str) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			relationship: relationship.to_string(),
			properties: Map::new(),
		}
	}
}

/// Complete graph snapshot as returned by `GET /graph`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphData {
	#[serde(default, deserialize_with = "null_as_default")]
	pub nodes: Vec<GraphNode>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub edges: Vec<GraphEdge>,
}

/// Body sent to `POST /query`.
#[derive(Clone, Debug, Serialize)]
pub struct QueryRequest<'a> {
	pub query: &'a str,
}

/// Response of `POST /query`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct QueryResponse {
	#[serde(default, deserialize_with = "null_as_default")]
	pub answer: String,
	#[serde(default = "default_retriever", deserialize_with = "retriever")]
	pub retriever_used: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub nodes: Vec<GraphNode>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub edges: Vec<GraphEdge>,
}

/// Renders a scalar the way it would appear when coerced to text.
pub fn value_to_string(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

fn default_relationship() -> String {
	DEFAULT_RELATIONSHIP.to_string()
}

fn default_retriever() -> String {
	"unknown".to_string()
}

fn id_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
	match Value::deserialize(de)? {
		Value::String(s) => Ok(s),
		Value::Number(n) => Ok(n.to_string()),
		other => Err(serde::de::Error::custom(format!(
			"expected string or number id, got {other}"
		))),
	}
}

fn node_type<'de, D: Deserializer<'de>>(de: D) -> Result<NodeType, D::Error> {
	Ok(Option::<NodeType>::deserialize(de)?.unwrap_or_default())
}

fn relationship<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
	Ok(Option::<String>::deserialize(de)?
		.filter(|s| !s.is_empty())
		.unwrap_or_else(default_relationship))
}

fn retriever<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
	Ok(Option::<String>::deserialize(de)?.unwrap_or_else(default_retriever))
}

fn property_map<'de, D: Deserializer<'de>>(de: D) -> Result<Map<String, Value>, D::Error> {
	Ok(Option::<Map<String, Value>>::deserialize(de)?.unwrap_or_default())
}

fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}
