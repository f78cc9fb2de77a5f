//! User-triggered actions: full load, search, clear.
//!
//! Each action marks the session busy, runs its request on the local task
//! queue and folds the outcome back into the session signal.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::error::ClientResult;
use crate::history::LocalStorage;
use crate::session::SessionState;

/// Current time as an ISO-8601 string.
fn now_iso() -> String {
	js_sys::Date::new_0().to_iso_string().into()
}

#[derive(Clone, Copy)]
pub struct Actions {
	session: RwSignal<SessionState>,
	api: StoredValue<ApiClient>,
	config: StoredValue<AppConfig>,
}

impl Actions {
	pub fn new(session: RwSignal<SessionState>, config: AppConfig) -> Self {
		Self {
			session,
			api: StoredValue::new(ApiClient::new(config.api_base_url.clone())),
			config: StoredValue::new(config),
		}
	}

	pub fn session(&self) -> RwSignal<SessionState> {
		self.session
	}

	/// Runs a `begin_*` step against the session. Rejections are already
	/// reported by the session itself.
	fn start<T>(&self, f: impl FnOnce(&mut SessionState) -> ClientResult<T>) -> Option<T> {
		self.session.try_update(f)?.ok()
	}

	/// Replaces the displayed graph with a fresh full load.
	pub fn load_graph(self) {
		if self.start(SessionState::begin_graph_load).is_none() {
			return;
		}
		let session = self.session;
		let api = self.api.get_value();
		let limit = self.config.with_value(|c| c.graph_limit);
		spawn_local(async move {
			match api.fetch_graph(limit).await {
				Ok(data) => session.update(|s| s.apply_full_graph(data)),
				Err(e) => session.update(|s| s.fail(e)),
			}
		});
	}

	/// Asks the backend `query` and merges the answer into the graph.
	pub fn search(self, query: String) {
		let Some(query) = self.start(|s| s.begin_search(&query)) else {
			return;
		};
		let session = self.session;
		let api = self.api.get_value();
		let (key, store) = (self.config.with_value(|c| c.history_key.clone()), LocalStorage);
		spawn_local(async move {
			match api.query(&query).await {
				Ok(response) => {
					session.update(|s| s.apply_search(&query, response, now_iso()));
					if let Err(e) = session.with_untracked(|s| s.history.save(&store, &key)) {
						warn!("graph-qa: history not saved: {}", e);
					}
				}
				Err(e) => session.update(|s| s.fail(e)),
			}
		});
	}

	/// Empties the graph, then reloads it.
	pub fn clear(self) {
		if self.start(SessionState::clear).is_some() {
			self.load_graph();
		}
	}
}
