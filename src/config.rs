//! Runtime configuration embedded in the host page.
//!
//! The page may carry a `<script id="app-config" type="application/json">`
//! element; every field is optional and falls back to the defaults below.

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

use crate::components::force_graph::highlight::STRONG_SCORE_THRESHOLD;

pub const CONFIG_ELEMENT_ID: &str = "app-config";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	/// Backend root, without a trailing slash.
	pub api_base_url: String,
	/// Node limit for full graph loads.
	pub graph_limit: usize,
	/// localStorage key holding the search history.
	pub history_key: String,
	pub history_capacity: usize,
	/// Answer summaries in the history are cut to this many characters.
	pub answer_summary_chars: usize,
	pub strong_score_threshold: f64,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base_url: "http://localhost:8000".to_string(),
			graph_limit: 200,
			history_key: "searchHistory".to_string(),
			history_capacity: 10,
			answer_summary_chars: 100,
			strong_score_threshold: STRONG_SCORE_THRESHOLD,
		}
	}
}

impl AppConfig {
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		let mut config: AppConfig = serde_json::from_str(text)?;
		config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
		Ok(config)
	}

	/// Reads the config element from the document, falling back to defaults.
	pub fn from_document() -> Self {
		let Some(text) = config_text() else {
			info!("graph-qa: no #{CONFIG_ELEMENT_ID} element, using default config");
			return Self::default();
		};
		match Self::from_json(&text) {
			Ok(config) => {
				info!("graph-qa: api at {}", config.api_base_url);
				config
			}
			Err(e) => {
				warn!("graph-qa: failed to parse config: {}", e);
				Self::default()
			}
		}
	}
}

fn config_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn partial_config_keeps_defaults() {
		let config = AppConfig::from_json(r#"{ "api_base_url": "https://qa.example.org/api/", "graph_limit": 50 }"#)
			.unwrap();

		assert_eq!(config.api_base_url, "https://qa.example.org/api");
		assert_eq!(config.graph_limit, 50);
		assert_eq!(config.history_capacity, 10);
		assert_eq!(config.history_key, "searchHistory");
	}

	#[test]
	fn empty_object_is_default() {
		assert_eq!(AppConfig::from_json("{}").unwrap(), AppConfig::default());
		assert!(AppConfig::from_json("[1]").is_err());
	}
}
