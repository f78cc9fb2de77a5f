//! Choosing what the view should frame after a graph update.

use super::highlight::HighlightMap;
use super::state::ViewTransform;
use super::store::{GraphStore, NodeKey};

/// Screen padding around a highlighted subset.
pub const SUBSET_PADDING: f64 = 150.0;
/// Screen padding around the whole graph.
pub const ALL_PADDING: f64 = 50.0;

/// Advisory fit target for the renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FocusTarget {
	/// Frame every element in the store.
	#[default]
	All,
	/// Frame only these nodes.
	Subset(Vec<NodeKey>),
}

impl FocusTarget {
	/// The highlighted subset if there is one, otherwise the whole store.
	pub fn select(highlight: &HighlightMap) -> Self {
		let keys = highlight.highlighted_nodes();
		if keys.is_empty() {
			FocusTarget::All
		} else {
			FocusTarget::Subset(keys)
		}
	}

	pub fn padding(&self) -> f64 {
		match self {
			FocusTarget::All => ALL_PADDING,
			FocusTarget::Subset(_) => SUBSET_PADDING,
		}
	}

	/// Keys to frame, resolved against the store.
	pub fn keys(&self, store: &GraphStore) -> Vec<NodeKey> {
		match self {
			FocusTarget::All => store.nodes().map(|(k, _)| k).collect(),
			FocusTarget::Subset(keys) => keys
				.iter()
				.copied()
				.filter(|k| store.node(*k).is_some())
				.collect(),
		}
	}
}

/// Axis-aligned bounds in graph space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Bounds {
	pub fn of_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
		points.into_iter().fold(None, |acc, (x, y)| {
			Some(match acc {
				None => Bounds {
					min_x: x,
					min_y: y,
					max_x: x,
					max_y: y,
				},
				Some(b) => Bounds {
					min_x: b.min_x.min(x),
					min_y: b.min_y.min(y),
					max_x: b.max_x.max(x),
					max_y: b.max_y.max(y),
				},
			})
		})
	}

	pub fn center(&self) -> (f64, f64) {
		((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
	}
}

/// Transform that centres `bounds` in a `width` x `height` viewport with
/// `padding` pixels to spare on each side. Zoom is clamped to 0.1..=2.0 so a
/// single node does not fill the screen.
pub fn fit_transform(bounds: Bounds, width: f64, height: f64, padding: f64) -> ViewTransform {
	let avail_w = (width - 2.0 * padding).max(1.0);
	let avail_h = (height - 2.0 * padding).max(1.0);
	let span_w = (bounds.max_x - bounds.min_x).max(1.0);
	let span_h = (bounds.max_y - bounds.min_y).max(1.0);
	let k = (avail_w / span_w).min(avail_h / span_h).clamp(0.1, 2.0);
	let (cx, cy) = bounds.center();
	ViewTransform {
		x: width / 2.0 - cx * k,
		y: height / 2.0 - cy * k,
		k,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::highlight::HighlightPolicy;
	use crate::components::force_graph::reconcile::ResultSet;
	use crate::components::force_graph::types::{GraphNode, NodeType};
	use pretty_assertions::assert_eq;

	fn store() -> GraphStore {
		let mut store = GraphStore::new();
		store.replace_all(
			vec![
				GraphNode::new("a", NodeType::Media),
				GraphNode::new("b", NodeType::Media),
			],
			vec![],
		);
		store
	}

	#[test]
	fn highlighted_subset_is_preferred() {
		let store = store();
		let results = ResultSet::from_nodes(&[GraphNode::new("b", NodeType::Media)]);
		let map = HighlightPolicy::default().apply(&results, &store);

		let target = FocusTarget::select(&map);
		assert_eq!(target, FocusTarget::Subset(vec![NodeKey(1)]));
		assert_eq!(target.padding(), SUBSET_PADDING);
	}

	#[test]
	fn falls_back_to_whole_store() {
		let store = store();
		let map = HighlightPolicy::default().apply(&ResultSet::default(), &store);

		let target = FocusTarget::select(&map);
		assert_eq!(target, FocusTarget::All);
		assert_eq!(target.keys(&store), vec![NodeKey(0), NodeKey(1)]);
	}

	#[test]
	fn bounds_cover_points() {
		let b = Bounds::of_points([(1.0, 5.0), (-3.0, 2.0), (4.0, -1.0)]).unwrap();
		assert_eq!(
			b,
			Bounds {
				min_x: -3.0,
				min_y: -1.0,
				max_x: 4.0,
				max_y: 5.0
			}
		);
		assert!(Bounds::of_points(std::iter::empty()).is_none());
	}

	#[test]
	fn fit_centres_bounds() {
		let bounds = Bounds {
			min_x: 0.0,
			min_y: 0.0,
			max_x: 100.0,
			max_y: 50.0,
		};
		let t = fit_transform(bounds, 400.0, 300.0, 50.0);

		assert_eq!(t.k, 2.0);
		let (cx, cy) = bounds.center();
		assert_eq!(cx * t.k + t.x, 200.0);
		assert_eq!(cy * t.k + t.y, 150.0);
	}
}
