//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, panning, zooming and hover tooltips. An
//! animation loop runs via `requestAnimationFrame`, calling the physics
//! simulation and renderer each frame. The simulation is resynced from the
//! session whenever its graph revision changes.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::scale::ScaleConfig;
use super::state::{ForceGraphState, Hover};
use super::theme::Theme;
use super::tooltip::{Tooltip, edge_tooltip, node_tooltip};
use crate::session::SessionState;

/// Tooltip offset from the pointer, in CSS pixels.
const TOOLTIP_OFFSET: (f64, f64) = (15.0, -15.0);

/// Tooltip content positioned in page coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct HoverTooltip {
	pub content: Tooltip,
	pub x: f64,
	pub y: f64,
}

/// Bundles graph simulation state with visual configuration.
struct GraphContext {
	state: ForceGraphState,
	scale: ScaleConfig,
	theme: Theme,
}

type Shared<T> = Rc<RefCell<Option<T>>>;

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|(w, h)| *w > 0.0 && *h > 0.0)
		.unwrap_or((800.0, 600.0))
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders the session's graph on a canvas sized to its parent container.
///
/// Hovering a node or edge writes its tooltip into `tooltip`; the caller
/// decides where and how to show it.
#[component]
pub fn ForceGraphCanvas(
	session: RwSignal<SessionState>,
	tooltip: RwSignal<Option<HoverTooltip>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Shared<GraphContext> = Rc::new(RefCell::new(None));
	let animate: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let resize_cb: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("graph-qa: canvas 2d context unavailable");
			return;
		};

		let mut state = ForceGraphState::new(w, h);
		session.with_untracked(|s| state.sync(&s.store, &s.highlight, &s.focus));
		*context_init.borrow_mut() = Some(GraphContext {
			state,
			scale: ScaleConfig::default(),
			theme: Theme::default(),
		});

		let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = parent_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				c.state.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick(0.016);
				render::render(&c.state, &ctx, &c.scale, &c.theme);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Resync only when the graph or its highlighting changed, not on status updates.
	let graph_revision = Memo::new(move |_| session.with(|s| s.graph_revision()));
	let context_sync = context.clone();
	Effect::new(move |_| {
		graph_revision.track();
		if let Some(ref mut c) = *context_sync.borrow_mut() {
			session.with_untracked(|s| c.state.sync(&s.store, &s.highlight, &s.focus));
		}
		tooltip.set(None);
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.state.press(x, y, &c.scale, &c.theme);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};

		let hover = {
			let mut context = context_mm.borrow_mut();
			let Some(c) = context.as_mut() else {
				return;
			};
			if c.state.drag_to(x, y) {
				return;
			}
			c.state.hover = c.state.hit(x, y, &c.scale, &c.theme);
			c.state.hover
		};
		let content = session.with_untracked(|s| match hover {
			Hover::Node(key) => s.store.node(key).map(node_tooltip),
			Hover::Edge(i) => s.store.all_edges().get(i).map(edge_tooltip),
			Hover::None => None,
		});
		tooltip.set(content.map(|content| HoverTooltip {
			content,
			x: ev.client_x() as f64 + TOOLTIP_OFFSET.0,
			y: ev.client_y() as f64 + TOOLTIP_OFFSET.1,
		}));
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			c.state.release();
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.release();
			c.state.hover = Hover::None;
		}
		tooltip.set(None);
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			c.state.zoom_at(x, y, if ev.delta_y() > 0.0 { 0.9 } else { 1.1 });
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
