//! HTTP client for the question-answering backend.

use gloo_net::http::{Request, Response};
use log::{debug, info};
use serde::de::DeserializeOwned;

use crate::components::force_graph::{GraphData, QueryRequest, QueryResponse};
use crate::error::{ClientError, ClientResult};

#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
	base_url: String,
}

impl ApiClient {
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into().trim_end_matches('/').to_string(),
		}
	}

	pub fn graph_url(&self) -> String {
		format!("{}/graph", self.base_url)
	}

	pub fn query_url(&self) -> String {
		format!("{}/query", self.base_url)
	}

	/// `GET /graph?limit=N`.
	pub async fn fetch_graph(&self, limit: usize) -> ClientResult<GraphData> {
		debug!("graph-qa: GET {} limit={}", self.graph_url(), limit);
		let response = Request::get(&self.graph_url())
			.query([("limit", limit.to_string())])
			.send()
			.await?;
		let data: GraphData = read_json(response).await?;
		info!(
			"graph-qa: received graph with {} nodes, {} edges",
			data.nodes.len(),
			data.edges.len()
		);
		Ok(data)
	}

	/// `POST /query` with `{ "query": ... }`.
	pub async fn query(&self, query: &str) -> ClientResult<QueryResponse> {
		debug!("graph-qa: POST {} query={:?}", self.query_url(), query);
		let response = Request::post(&self.query_url())
			.json(&QueryRequest { query })?
			.send()
			.await?;
		let data: QueryResponse = read_json(response).await?;
		info!(
			"graph-qa: answer via {} with {} nodes, {} edges",
			data.retriever_used,
			data.nodes.len(),
			data.edges.len()
		);
		Ok(data)
	}
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
	if !response.ok() {
		let status = response.status();
		let body = response.text().await.unwrap_or_default();
		return Err(ClientError::Status { status, body });
	}
	let text = response.text().await?;
	Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn urls_join_without_double_slash() {
		let api = ApiClient::new("http://localhost:8000/");
		assert_eq!(api.graph_url(), "http://localhost:8000/graph");
		assert_eq!(api.query_url(), "http://localhost:8000/query");
	}
}
