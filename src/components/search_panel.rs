//! Sidebar with the query box, answer, status line and search history.

use leptos::prelude::*;
use wasm_bindgen::JsValue;
use web_sys::KeyboardEvent;

use crate::actions::Actions;
use crate::history::HistoryEntry;
use crate::session::StatusKind;

fn status_class(kind: StatusKind) -> &'static str {
	match kind {
		StatusKind::Info => "status status-info",
		StatusKind::Warning => "status status-warning",
		StatusKind::Error => "status status-error",
	}
}

/// Non-empty lines of an answer, one paragraph each.
fn paragraphs(answer: &str) -> Vec<String> {
	answer
		.split('\n')
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(str::to_string)
		.collect()
}

/// Formats an ISO timestamp in the browser's locale.
fn local_time(timestamp: &str) -> String {
	let date = js_sys::Date::new(&JsValue::from_str(timestamp));
	if date.get_time().is_nan() {
		return timestamp.to_string();
	}
	date.to_locale_string("default", &JsValue::UNDEFINED).into()
}

#[component]
pub fn SearchPanel(actions: Actions) -> impl IntoView {
	let session = actions.session();
	let query = RwSignal::new(String::new());
	let busy = Memo::new(move |_| session.with(|s| s.is_busy()));
	let run = move || actions.search(query.get_untracked());

	let status = move || {
		session.with(|s| s.status.clone()).map(|status| {
			view! { <div class=status_class(status.kind)>{status.text}</div> }
		})
	};

	let answer = move || {
		session.with(|s| s.answer.clone()).map(|answer| {
			view! {
				<section class="answer">
					<h2>"Answer"</h2>
					{paragraphs(&answer)
						.into_iter()
						.map(|p| view! { <p>{p}</p> })
						.collect_view()}
				</section>
			}
		})
	};

	let retriever = move || {
		session
			.with(|s| s.retriever_line.clone())
			.map(|line| view! { <div class="retriever-info">{line}</div> })
	};

	let history = move || {
		let entries: Vec<HistoryEntry> = session.with(|s| s.history.entries().to_vec());
		if entries.is_empty() {
			return view! { <li class="history-empty">"No search history yet."</li> }.into_any();
		}
		entries
			.into_iter()
			.map(|entry| {
				let rerun = entry.query.clone();
				view! {
					<li
						class="history-item"
						on:click=move |_| {
							query.set(rerun.clone());
							actions.search(rerun.clone());
						}
					>
						<div class="history-query">{entry.query}</div>
						<div class="history-answer">{entry.answer_summary}</div>
						<div class="history-time">{local_time(&entry.timestamp)}</div>
					</li>
				}
			})
			.collect_view()
			.into_any()
	};

	view! {
		<aside class="search-panel">
			<h1>"Graph Q&A"</h1>
			<div class="search-box">
				<input
					type="text"
					placeholder="Ask a question about the graph..."
					prop:value=move || query.get()
					on:input=move |ev| query.set(event_target_value(&ev))
					on:keydown=move |ev: KeyboardEvent| {
						if ev.key() == "Enter" && !busy.get_untracked() {
							run();
						}
					}
				/>
				<button on:click=move |_| run() disabled=move || busy.get()>
					"Search"
				</button>
			</div>
			<div class="graph-actions">
				<button on:click=move |_| actions.load_graph() disabled=move || busy.get()>
					"Refresh graph"
				</button>
				<button on:click=move |_| actions.clear() disabled=move || busy.get()>
					"Clear graph"
				</button>
			</div>
			{status}
			{answer}
			{retriever}
			<section class="history">
				<h2>"Recent searches"</h2>
				<ul class="history-list">{history}</ul>
			</section>
		</aside>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn answers_split_into_trimmed_paragraphs() {
		assert_eq!(
			paragraphs("First line.\n\n  Second line.  \n"),
			vec!["First line.".to_string(), "Second line.".to_string()]
		);
		assert!(paragraphs("\n \n").is_empty());
	}
}
