//! Layout simulation state mirrored from the graph store.
//!
//! Wraps the `force_graph` physics simulation, which plays the role of the
//! layout engine. The simulation is kept in step with [`GraphStore`] through
//! [`ForceGraphState::sync`]: new store elements are appended, a new store
//! generation rebuilds the simulation, and visual states are re-applied to
//! every element on each sync.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::focus::{Bounds, FocusTarget, fit_transform};
use super::highlight::{HighlightMap, VisualState};
use super::scale::{ScaleConfig, ScaledValues};
use super::store::{GraphStore, NodeKey};
use super::theme::Theme;
use super::types::NodeType;

/// Seconds of simulation to run before framing a focus target.
const FOCUS_SETTLE_TIME: f64 = 0.6;

/// Seconds the physics keeps running after the last layout change.
const LAYOUT_RUN_TIME: f64 = 8.0;

/// Zoom range reachable with the mouse wheel.
const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 10.0;

/// Per-node display metadata attached to each node in the simulation.
#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub key: NodeKey,
	pub node_type: NodeType,
	pub state: VisualState,
}

/// Display metadata for a stored edge, indexed like [`GraphStore::all_edges`].
#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub source: NodeKey,
	pub target: NodeKey,
	pub relationship: String,
	pub state: VisualState,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Element under the pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Hover {
	#[default]
	None,
	Node(NodeKey),
	/// Index into the store's edge list.
	Edge(usize),
}

/// Animated move of the view towards a fit transform.
#[derive(Clone, Debug)]
struct FocusAnimation {
	target: FocusTarget,
	settle: f64,
	to: Option<ViewTransform>,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: Hover,
	pub width: f64,
	pub height: f64,
	/// Whether the physics still advances. Stops once the run time is spent.
	pub animation_running: bool,
	run_remaining: f64,
	generation: Option<u64>,
	sim_idx: Vec<DefaultNodeIdx>,
	key_of: HashMap<DefaultNodeIdx, NodeKey>,
	edges: Vec<EdgeInfo>,
	focus: Option<FocusAnimation>,
}

fn simulation() -> ForceGraph<NodeInfo, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

impl ForceGraphState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			graph: simulation(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: Hover::None,
			width,
			height,
			animation_running: true,
			run_remaining: LAYOUT_RUN_TIME,
			generation: None,
			sim_idx: Vec::new(),
			key_of: HashMap::new(),
			edges: Vec::new(),
			focus: None,
		}
	}

	/// Brings the simulation in line with `store` and applies `highlight`.
	///
	/// Returns `true` when elements were added to the simulation.
	pub fn sync(&mut self, store: &GraphStore, highlight: &HighlightMap, focus: &FocusTarget) -> bool {
		if self.generation != Some(store.generation()) {
			self.graph = simulation();
			self.sim_idx.clear();
			self.key_of.clear();
			self.edges.clear();
			self.hover = Hover::None;
			self.drag = DragState::default();
			self.generation = Some(store.generation());
		}

		let known_nodes = self.sim_idx.len();
		let known_edges = self.edges.len();
		let mut positions = self.positions();

		for (key, node) in store.nodes().skip(known_nodes) {
			let (x, y) = self.seed_position(store, key, &positions);
			positions.push((x as f64, y as f64));
			let idx = self.graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					key,
					node_type: node.node_type,
					state: VisualState::Neutral,
				},
			});
			self.sim_idx.push(idx);
			self.key_of.insert(idx, key);
		}

		for stored in store.all_edges().iter().skip(known_edges) {
			if let (Some(&src), Some(&tgt)) =
				(self.sim_idx.get(stored.source.0), self.sim_idx.get(stored.target.0))
			{
				self.graph.add_edge(src, tgt, EdgeData::default());
			}
			self.edges.push(EdgeInfo {
				source: stored.source,
				target: stored.target,
				relationship: stored.edge.relationship.clone(),
				state: VisualState::Neutral,
			});
		}

		self.graph.visit_nodes_mut(|node| {
			node.data.user_data.state = highlight.node(node.data.user_data.key);
		});
		for (i, edge) in self.edges.iter_mut().enumerate() {
			edge.state = highlight.edge(i);
		}

		self.focus = Some(FocusAnimation {
			target: focus.clone(),
			settle: FOCUS_SETTLE_TIME,
			to: None,
		});

		let grew = self.sim_idx.len() > known_nodes || self.edges.len() > known_edges;
		if grew {
			self.wake();
			debug!(
				"graph-qa: layout now {} nodes, {} edges",
				self.sim_idx.len(),
				self.edges.len()
			);
		}
		grew
	}

	/// Places a new node next to an already placed neighbour, or on a ring
	/// around the origin when it has none.
	fn seed_position(
		&self,
		store: &GraphStore,
		key: NodeKey,
		positions: &[(f64, f64)],
	) -> (f32, f32) {
		let neighbour = store.all_edges().iter().find_map(|e| {
			let other = if e.source == key {
				e.target
			} else if e.target == key {
				e.source
			} else {
				return None;
			};
			positions.get(other.0).copied()
		});
		// golden angle spreads consecutive nodes evenly
		let angle = key.0 as f64 * PI * (3.0 - 5f64.sqrt());
		let (x, y) = match neighbour {
			Some((nx, ny)) => (nx + 40.0 * angle.cos(), ny + 40.0 * angle.sin()),
			None => {
				let r = 20.0 * (key.0 as f64 + 1.0).sqrt();
				(r * angle.cos(), r * angle.sin())
			}
		};
		(x as f32, y as f32)
	}

	/// Current node positions in graph space, indexed by [`NodeKey`].
	pub fn positions(&self) -> Vec<(f64, f64)> {
		let mut out = vec![(0.0, 0.0); self.sim_idx.len()];
		self.graph.visit_nodes(|node| {
			if let Some(slot) = out.get_mut(node.data.user_data.key.0) {
				*slot = (node.x() as f64, node.y() as f64);
			}
		});
		out
	}

	pub fn edges(&self) -> &[EdgeInfo] {
		&self.edges
	}

	pub fn key_of(&self, idx: DefaultNodeIdx) -> Option<NodeKey> {
		self.key_of.get(&idx).copied()
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(
		&self,
		sx: f64,
		sy: f64,
		config: &ScaleConfig,
		theme: &Theme,
	) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let size = theme.node_look(info.node_type, info.state).size;
			if (dx * dx + dy * dy).sqrt() < scale.hit_radius(size) {
				found = Some(node.index());
			}
		});
		found
	}

	/// Index of the closest edge within picking distance of a screen point.
	pub fn edge_at_position(&self, sx: f64, sy: f64, config: &ScaleConfig) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let limit = ScaledValues::new(config, self.transform.k).edge_hit_distance();
		let positions = self.positions();
		self.edges
			.iter()
			.enumerate()
			.filter_map(|(i, e)| {
				let a = positions.get(e.source.0)?;
				let b = positions.get(e.target.0)?;
				Some((i, segment_distance((gx, gy), *a, *b)))
			})
			.filter(|(_, d)| *d <= limit)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(i, _)| i)
	}

	/// Hover target at a screen point; nodes take precedence over edges.
	pub fn hit(&self, sx: f64, sy: f64, config: &ScaleConfig, theme: &Theme) -> Hover {
		if let Some(key) = self
			.node_at_position(sx, sy, config, theme)
			.and_then(|idx| self.key_of(idx))
		{
			Hover::Node(key)
		} else if let Some(i) = self.edge_at_position(sx, sy, config) {
			Hover::Edge(i)
		} else {
			Hover::None
		}
	}

	/// Pointer down: grabs the node under the point, or starts panning.
	pub fn press(&mut self, sx: f64, sy: f64, config: &ScaleConfig, theme: &Theme) {
		let Some(idx) = self.node_at_position(sx, sy, config, theme) else {
			self.cancel_focus();
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
			return;
		};
		let mut origin = (0.0, 0.0);
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				origin = (node.x(), node.y());
			}
		});
		self.wake();
		self.drag = DragState {
			active: true,
			node_idx: Some(idx),
			start_x: sx,
			start_y: sy,
			node_start_x: origin.0,
			node_start_y: origin.1,
		};
	}

	/// Pointer move while pressed. Returns `false` when nothing is held.
	///
	/// Dragged nodes stay pinned where they are dropped.
	pub fn drag_to(&mut self, sx: f64, sy: f64) -> bool {
		if let (true, Some(idx)) = (self.drag.active, self.drag.node_idx) {
			let k = self.transform.k;
			let nx = self.drag.node_start_x + ((sx - self.drag.start_x) / k) as f32;
			let ny = self.drag.node_start_y + ((sy - self.drag.start_y) / k) as f32;
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.x = nx;
					node.data.y = ny;
					node.data.is_anchor = true;
				}
			});
			true
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
			true
		} else {
			false
		}
	}

	pub fn release(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
	}

	/// Zooms by `factor` around a screen point, which stays put.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		self.cancel_focus();
		let k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = k;
	}

	/// Restarts the physics for another full run.
	pub fn wake(&mut self) {
		self.animation_running = true;
		self.run_remaining = LAYOUT_RUN_TIME;
	}

	pub fn tick(&mut self, dt: f32) {
		if self.animation_running {
			self.graph.update(dt);
			// a held node keeps the layout live
			if !self.drag.active {
				self.run_remaining -= dt as f64;
			}
			if self.run_remaining <= 0.0 {
				self.animation_running = false;
				debug!("graph-qa: layout settled");
			}
		}
		self.tick_focus(dt as f64);
	}

	fn tick_focus(&mut self, dt: f64) {
		let Some(focus) = self.focus.as_mut() else {
			return;
		};
		let to = match focus.to {
			Some(to) => to,
			None => {
				focus.settle -= dt;
				if focus.settle <= 0.0 {
					let target = focus.target.clone();
					match self.fit_for(&target) {
						Some(to) => {
							if let Some(focus) = self.focus.as_mut() {
								focus.to = Some(to);
							}
						}
						None => self.focus = None,
					}
				}
				return;
			}
		};

		// exponential approach, ~95% in half a second
		let f = 1.0 - (-6.0 * dt).exp();
		self.transform.x += (to.x - self.transform.x) * f;
		self.transform.y += (to.y - self.transform.y) * f;
		self.transform.k += (to.k - self.transform.k) * f;
		if (to.k - self.transform.k).abs() < 1e-3
			&& (to.x - self.transform.x).abs() < 0.5
			&& (to.y - self.transform.y).abs() < 0.5
		{
			self.transform = to;
			self.focus = None;
		}
	}

	/// Transform framing `target` at the current node positions.
	pub fn fit_for(&self, target: &FocusTarget) -> Option<ViewTransform> {
		let positions = self.positions();
		let bounds = match target {
			FocusTarget::All => Bounds::of_points(positions),
			FocusTarget::Subset(keys) => {
				Bounds::of_points(keys.iter().filter_map(|k| positions.get(k.0).copied()))
			}
		}?;
		Some(fit_transform(bounds, self.width, self.height, target.padding()))
	}

	/// Drops a pending fit, e.g. when the user starts panning or zooming.
	pub fn cancel_focus(&mut self) {
		self.focus = None;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let len2 = dx * dx + dy * dy;
	let t = if len2 < f64::EPSILON {
		0.0
	} else {
		(((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
	((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}
