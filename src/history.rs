//! Recent searches, persisted in a browser key-value store.

use std::cell::RefCell;
use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::components::force_graph::tooltip::truncate;
use crate::error::{ClientError, ClientResult};

/// A single named-entry key-value store.
pub trait KeyValueStore {
	fn get(&self, key: &str) -> ClientResult<Option<String>>;
	fn set(&self, key: &str, value: &str) -> ClientResult<()>;
}

/// `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
	fn storage() -> ClientResult<web_sys::Storage> {
		web_sys::window()
			.ok_or_else(|| ClientError::Storage("no window".into()))?
			.local_storage()
			.map_err(|e| ClientError::Storage(format!("{e:?}")))?
			.ok_or_else(|| ClientError::Storage("localStorage disabled".into()))
	}
}

impl KeyValueStore for LocalStorage {
	fn get(&self, key: &str) -> ClientResult<Option<String>> {
		Self::storage()?
			.get_item(key)
			.map_err(|e| ClientError::Storage(format!("{e:?}")))
	}

	fn set(&self, key: &str, value: &str) -> ClientResult<()> {
		Self::storage()?
			.set_item(key, value)
			.map_err(|e| ClientError::Storage(format!("{e:?}")))
	}
}

/// In-process store, for tests and for pages without storage access.
#[derive(Debug, Default)]
pub struct MemoryStore {
	entries: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> ClientResult<Option<String>> {
		Ok(self.entries.borrow().get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> ClientResult<()> {
		self.entries
			.borrow_mut()
			.insert(key.to_string(), value.to_string());
		Ok(())
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
	pub query: String,
	#[serde(rename = "answer")]
	pub answer_summary: String,
	/// ISO-8601 time of the search.
	pub timestamp: String,
}

/// Most-recent-first list of searches, capped at `capacity`.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchHistory {
	entries: Vec<HistoryEntry>,
	capacity: usize,
	summary_chars: usize,
}

impl SearchHistory {
	pub fn new(capacity: usize, summary_chars: usize) -> Self {
		Self {
			entries: Vec::new(),
			capacity,
			summary_chars,
		}
	}

	/// Loads the list stored under `key`. Unreadable or malformed entries
	/// yield an empty history.
	pub fn load(store: &impl KeyValueStore, key: &str, capacity: usize, summary_chars: usize) -> Self {
		let mut history = Self::new(capacity, summary_chars);
		match store.get(key) {
			Ok(Some(text)) => match serde_json::from_str::<Vec<HistoryEntry>>(&text) {
				Ok(mut entries) => {
					entries.truncate(capacity);
					history.entries = entries;
				}
				Err(e) => warn!("graph-qa: ignoring malformed history: {}", e),
			},
			Ok(None) => {}
			Err(e) => warn!("graph-qa: history not loaded: {}", e),
		}
		history
	}

	pub fn save(&self, store: &impl KeyValueStore, key: &str) -> ClientResult<()> {
		store.set(key, &serde_json::to_string(&self.entries)?)
	}

	/// Records a search at the front, evicting the oldest beyond capacity.
	pub fn push(&mut self, query: &str, answer: &str, timestamp: String) {
		self.entries.insert(
			0,
			HistoryEntry {
				query: query.to_string(),
				answer_summary: truncate(answer, self.summary_chars),
				timestamp,
			},
		);
		self.entries.truncate(self.capacity);
	}

	pub fn entries(&self) -> &[HistoryEntry] {
		&self.entries
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
