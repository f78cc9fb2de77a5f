//! Graph store, search reconciliation and the force-directed canvas.
//!
//! The pieces, bottom-up:
//! - [`GraphStore`] holds every displayed node and edge, keyed by domain id
//! - [`reconcile`] merges a search answer into the store
//! - [`HighlightPolicy`] classifies every element against the latest results
//! - [`FocusTarget`] picks what the view should frame afterwards
//! - [`ForceGraphCanvas`] lays the store out with a force simulation and draws it
//!
//! # Example
//!
//! ```ignore
//! let mut store = GraphStore::new();
//! store.replace_all(data.nodes, data.edges);
//!
//! let outcome = reconcile(&mut store, response.nodes, response.edges);
//! let highlight = HighlightPolicy::default().apply(&outcome.results, &store);
//! let focus = FocusTarget::select(&highlight);
//! ```

mod component;
pub mod focus;
pub mod highlight;
pub mod reconcile;
mod render;
pub mod scale;
mod state;
pub mod store;
pub mod theme;
pub mod tooltip;
mod types;

pub use component::{ForceGraphCanvas, HoverTooltip};
pub use focus::FocusTarget;
pub use highlight::{HighlightMap, HighlightPolicy, VisualState};
pub use reconcile::{Reconciliation, ResultSet, reconcile};
pub use store::{GraphStore, NodeKey};
pub use theme::Theme;
pub use tooltip::Tooltip;
pub use types::{GraphData, GraphEdge, GraphNode, NodeType, QueryRequest, QueryResponse};
