//! Zoom-dependent sizing for graph visuals.
//!
//! Node and edge sizes from the theme are expressed in world units, so they
//! grow and shrink with the zoom factor `k`. A few elements are held to
//! screen-space bounds so they stay legible or clickable at any zoom:
//!
//! - node radius never drops below a minimum on-screen size;
//! - hit testing adds a constant screen-space margin around each node;
//! - edge labels fade out below a zoom threshold instead of shrinking into noise.

/// How a length responds to the view zoom.
#[derive(Clone, Debug, PartialEq)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// World-space size kept within `[min_screen, max_screen]` pixels.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space length for `base` at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Linear fade between two zoom levels.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoomFade {
	pub zero_alpha_k: f64,
	pub full_alpha_k: f64,
}

impl ZoomFade {
	pub fn alpha(&self, k: f64) -> f64 {
		if self.zero_alpha_k == self.full_alpha_k {
			return 1.0;
		}
		((k - self.zero_alpha_k) / (self.full_alpha_k - self.zero_alpha_k)).clamp(0.0, 1.0)
	}
}

#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node_radius: ScaleBehavior,
	pub edge_width: ScaleBehavior,
	/// Arrow length in world units.
	pub arrow_size: f64,
	/// Extra hit radius around nodes, in screen pixels.
	pub hit_margin: f64,
	/// Pick distance for edges, in screen pixels.
	pub edge_hit_distance: f64,
	/// Edge label font size in world units.
	pub edge_label_size: f64,
	pub edge_label_fade: ZoomFade,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node_radius: ScaleBehavior::Clamped {
				min_screen: 3.0,
				max_screen: f64::INFINITY,
			},
			edge_width: ScaleBehavior::Clamped {
				min_screen: 0.5,
				max_screen: 8.0,
			},
			arrow_size: 12.0,
			hit_margin: 4.0,
			edge_hit_distance: 5.0,
			edge_label_size: 11.0,
			edge_label_fade: ZoomFade {
				zero_alpha_k: 0.6,
				full_alpha_k: 1.0,
			},
		}
	}
}

/// Scale values resolved for one zoom level. Build once per frame.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub k: f64,
	config: ScaleConfig,
	pub arrow_size: f64,
	pub edge_label_alpha: f64,
	pub edge_label_font: String,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		Self {
			k,
			config: config.clone(),
			arrow_size: config.arrow_size,
			edge_label_alpha: config.edge_label_fade.alpha(k),
			edge_label_font: format!("bold {}px sans-serif", config.edge_label_size),
		}
	}

	/// World-space radius of a node whose theme size (diameter) is `size`.
	pub fn node_radius(&self, size: f64) -> f64 {
		self.config.node_radius.apply(size / 2.0, self.k)
	}

	/// World-space radius used for picking a node of theme size `size`.
	pub fn hit_radius(&self, size: f64) -> f64 {
		self.node_radius(size) + self.config.hit_margin / self.k
	}

	pub fn edge_width(&self, width: f64) -> f64 {
		self.config.edge_width.apply(width, self.k)
	}

	/// Border widths stay constant on screen.
	pub fn border_width(&self, width: f64) -> f64 {
		width / self.k
	}

	pub fn edge_hit_distance(&self) -> f64 {
		self.config.edge_hit_distance / self.k
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamped_lengths_respect_screen_bounds() {
		let b = ScaleBehavior::Clamped {
			min_screen: 2.0,
			max_screen: 10.0,
		};
		assert_eq!(b.apply(5.0, 1.0), 5.0);
		// zoomed far out: 5 world units would be 0.5px, so clamp to 2px
		assert_eq!(b.apply(5.0, 0.1), 20.0);
		// zoomed far in: cap at 10px on screen
		assert_eq!(b.apply(5.0, 4.0), 2.5);
		assert_eq!(ScaleBehavior::World.apply(5.0, 4.0), 5.0);
	}

	#[test]
	fn label_fade_is_linear() {
		let fade = ZoomFade {
			zero_alpha_k: 0.5,
			full_alpha_k: 1.0,
		};
		assert_eq!(fade.alpha(0.25), 0.0);
		assert_eq!(fade.alpha(0.75), 0.5);
		assert_eq!(fade.alpha(3.0), 1.0);
	}

	#[test]
	fn hit_radius_exceeds_drawn_radius() {
		let s = ScaledValues::new(&ScaleConfig::default(), 2.0);
		assert_eq!(s.node_radius(30.0), 15.0);
		assert_eq!(s.hit_radius(30.0), 17.0);
		assert_eq!(s.border_width(4.0), 2.0);
	}
}
