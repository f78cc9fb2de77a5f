//! Colors and per-state styling for the graph canvas.

use super::highlight::VisualState;
use super::types::NodeType;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Parses `#rrggbb`, falling back to mid gray.
	pub fn hex(s: &str) -> Self {
		let channel = |range: std::ops::Range<usize>| {
			s.get(range)
				.and_then(|h| u8::from_str_radix(h, 16).ok())
				.unwrap_or(128)
		};
		if s.len() == 7 && s.starts_with('#') {
			Self::rgb(channel(1..3), channel(3..5), channel(5..7))
		} else {
			Self::rgb(128, 128, 128)
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Resolved drawing parameters for one node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeLook {
	pub fill: Color,
	pub border: Color,
	/// Border width in screen pixels.
	pub border_width: f64,
	/// Diameter in screen pixels at zoom 1.
	pub size: f64,
	pub opacity: f64,
}

/// Resolved drawing parameters for one edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeLook {
	pub color: Color,
	pub width: f64,
	pub opacity: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: Color,
	pub label: Color,
	pub node_border: Color,
	pub node_fallback: Color,
	pub article: Color,
	pub media: Color,
	pub category: Color,
	pub content: Color,
	pub highlight: Color,
	pub edge: Color,
	pub edge_inactive: Color,
	pub hover_border: Color,
	pub inactive_fill: Color,
	pub inactive_border: Color,
	pub inactive_node_opacity: f64,
	pub inactive_edge_opacity: f64,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(248, 249, 252),
			label: Color::rgb(51, 51, 51),
			node_border: Color::rgb(255, 255, 255),
			node_fallback: Color::hex("#667eea"),
			article: Color::hex("#48bb78"),
			media: Color::hex("#ed8936"),
			category: Color::hex("#9f7aea"),
			content: Color::hex("#4299e1"),
			highlight: Color::hex("#f56565"),
			edge: Color::hex("#666666"),
			edge_inactive: Color::hex("#cccccc"),
			hover_border: Color::hex("#f56565"),
			inactive_fill: Color::hex("#999999"),
			inactive_border: Color::hex("#666666"),
			inactive_node_opacity: 0.3,
			inactive_edge_opacity: 0.2,
		}
	}
}

impl Theme {
	pub fn node_color(&self, node_type: NodeType) -> Color {
		match node_type {
			NodeType::Article => self.article,
			NodeType::Media => self.media,
			NodeType::Category => self.category,
			NodeType::Content => self.content,
			NodeType::Unknown => self.node_fallback,
		}
	}

	pub fn node_look(&self, node_type: NodeType, state: VisualState) -> NodeLook {
		let base = NodeLook {
			fill: self.node_color(node_type),
			border: self.node_border,
			border_width: 2.0,
			size: if node_type == NodeType::Content { 20.0 } else { 30.0 },
			opacity: 1.0,
		};
		match state {
			VisualState::Neutral => base,
			VisualState::HighlightedStrong => NodeLook {
				border: self.highlight,
				border_width: 4.0,
				size: 35.0,
				..base
			},
			VisualState::HighlightedNormal => NodeLook {
				border: self.highlight,
				border_width: 3.0,
				size: 30.0,
				..base
			},
			VisualState::Inactive => NodeLook {
				fill: self.inactive_fill,
				border: self.inactive_border,
				opacity: self.inactive_node_opacity,
				size: 30.0,
				..base
			},
		}
	}

	pub fn edge_look(&self, state: VisualState) -> EdgeLook {
		match state {
			VisualState::Neutral => EdgeLook {
				color: self.edge,
				width: 4.0,
				opacity: 1.0,
			},
			VisualState::HighlightedStrong | VisualState::HighlightedNormal => EdgeLook {
				color: self.highlight,
				width: 4.0,
				opacity: 1.0,
			},
			VisualState::Inactive => EdgeLook {
				color: self.edge_inactive,
				width: 3.0,
				opacity: self.inactive_edge_opacity,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn hex_parses_and_falls_back() {
		assert_eq!(Color::hex("#48bb78"), Color::rgb(0x48, 0xbb, 0x78));
		assert_eq!(Color::hex("teal"), Color::rgb(128, 128, 128));
		assert_eq!(Color::hex("#zz0000").r, 128);
	}

	#[test]
	fn css_output_depends_on_alpha() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
		assert_eq!(Color::rgba(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.5)");
	}

	#[test]
	fn strong_nodes_are_larger_with_thicker_border() {
		let theme = Theme::default();
		let strong = theme.node_look(NodeType::Article, VisualState::HighlightedStrong);
		let normal = theme.node_look(NodeType::Article, VisualState::HighlightedNormal);
		let inactive = theme.node_look(NodeType::Article, VisualState::Inactive);

		assert_eq!((strong.size, strong.border_width), (35.0, 4.0));
		assert_eq!((normal.size, normal.border_width), (30.0, 3.0));
		assert_eq!(strong.border, theme.highlight);
		assert_eq!(inactive.opacity, 0.3);
		assert_eq!(inactive.fill, theme.inactive_fill);
	}

	#[test]
	fn content_nodes_are_smaller_until_highlighted() {
		let theme = Theme::default();
		assert_eq!(theme.node_look(NodeType::Content, VisualState::Neutral).size, 20.0);
		assert_eq!(theme.node_look(NodeType::Content, VisualState::HighlightedStrong).size, 35.0);
		assert_eq!(theme.node_look(NodeType::Media, VisualState::Neutral).fill, theme.media);
	}

	#[test]
	fn edge_states_map_to_styles() {
		let theme = Theme::default();
		assert_eq!(theme.edge_look(VisualState::HighlightedStrong).width, 4.0);
		assert_eq!(theme.edge_look(VisualState::Inactive).color, theme.edge_inactive);
	}
}
