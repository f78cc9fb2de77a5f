//! graph-qa: Interactive graph explorer for a graph-database question-answering backend.
//!
//! This crate provides a WASM front end that loads a bounded slice of the
//! knowledge graph, sends natural-language questions to the backend, merges
//! the returned nodes into the displayed graph and highlights them, with a
//! physics-based layout, pan/zoom and hover tooltips.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod actions;
pub mod api;
pub mod components;
pub mod config;
pub mod error;
pub mod history;
pub mod session;

pub use components::force_graph::{ForceGraphCanvas, GraphData, GraphEdge, GraphNode, HoverTooltip};

use actions::Actions;
use components::search_panel::SearchPanel;
use config::AppConfig;
use history::{LocalStorage, SearchHistory};
use session::{LoadState, SessionState};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("graph-qa: logging initialized");
}

#[component]
fn TooltipOverlay(tooltip: RwSignal<Option<HoverTooltip>>) -> impl IntoView {
	move || {
		tooltip.get().map(|t| {
			view! {
				<div class="graph-tooltip" style=format!("left: {}px; top: {}px;", t.x, t.y)>
					<div class="tooltip-title">{t.content.title}</div>
					{t
						.content
						.rows
						.into_iter()
						.map(|(name, value)| {
							view! {
								<div class="tooltip-row">
									<span class="tooltip-key">{name}": "</span>
									{value}
								</div>
							}
						})
						.collect_view()}
				</div>
			}
		})
	}
}

/// Main application component.
/// Reads config and history from the page, then loads the full graph.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = AppConfig::from_document();
	let history = SearchHistory::load(
		&LocalStorage,
		&config.history_key,
		config.history_capacity,
		config.answer_summary_chars,
	);
	let session = RwSignal::new(SessionState::new(&config, history));
	let tooltip = RwSignal::new(None::<HoverTooltip>);
	let actions = Actions::new(session, config);

	actions.load_graph();

	let overlay = move || {
		let text = match session.with(|s| s.load_state()) {
			LoadState::Loading => "Loading graph...",
			LoadState::NotLoaded => "No graph loaded",
			LoadState::Loaded => return None,
		};
		Some(view! { <div class="graph-overlay">{text}</div> })
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Graph Q&A" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="app-layout">
			<SearchPanel actions=actions />
			<main class="graph-container">
				<ForceGraphCanvas session=session tooltip=tooltip />
				{overlay}
			</main>
			<TooltipOverlay tooltip=tooltip />
		</div>
	}
}
