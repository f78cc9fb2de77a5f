//! Canvas rendering for the force graph.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Inactive edges, then active edges with arrows and labels (world space)
//! 3. Inactive nodes, then the rest, then the hovered node on top

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::highlight::VisualState;
use super::scale::{ScaleConfig, ScaledValues};
use super::state::{EdgeInfo, ForceGraphState, Hover, NodeInfo};
use super::theme::{NodeLook, Theme};

/// Hovered nodes grow to this size.
const HOVER_SIZE: f64 = 40.0;

/// Renders the complete graph to the canvas.
pub fn render(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, state.transform.k);
	let positions = state.positions();

	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	let edges = state.edges();
	for pass_inactive in [true, false] {
		for (i, edge) in edges.iter().enumerate() {
			if (edge.state == VisualState::Inactive) != pass_inactive {
				continue;
			}
			let (Some(&a), Some(&b)) = (positions.get(edge.source.0), positions.get(edge.target.0))
			else {
				continue;
			};
			let hovered = state.hover == Hover::Edge(i);
			draw_edge(ctx, &scale, theme, edge, a, b, hovered);
		}
	}

	let mut hovered = None;
	for pass_inactive in [true, false] {
		state.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			if (info.state == VisualState::Inactive) != pass_inactive {
				return;
			}
			let (x, y) = (node.x() as f64, node.y() as f64);
			if state.hover == Hover::Node(info.key) {
				hovered = Some((info.clone(), x, y));
				return;
			}
			draw_node(ctx, &scale, theme.node_look(info.node_type, info.state), x, y);
		});
	}
	if let Some((info, x, y)) = hovered {
		draw_hovered_node(ctx, &scale, theme, &info, x, y);
	}

	ctx.restore();
}

fn draw_edge(
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	edge: &EdgeInfo,
	(x1, y1): (f64, f64),
	(x2, y2): (f64, f64),
	hovered: bool,
) {
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let look = theme.edge_look(edge.state);
	let (ux, uy) = (dx / dist, dy / dist);
	// stop lines at the target node's rim
	let target_r = scale.node_radius(30.0);
	let (tip_x, tip_y) = (x2 - ux * target_r, y2 - uy * target_r);
	let (back_x, back_y) = (tip_x - ux * scale.arrow_size, tip_y - uy * scale.arrow_size);
	let width = scale.edge_width(if hovered { look.width + 2.0 } else { look.width });

	ctx.set_global_alpha(look.opacity);
	ctx.set_stroke_style_str(&look.color.to_css());
	ctx.set_line_width(width);
	ctx.begin_path();
	ctx.move_to(x1, y1);
	ctx.line_to(back_x, back_y);
	ctx.stroke();

	let (px, py) = (-uy * scale.arrow_size * 0.5, ux * scale.arrow_size * 0.5);
	ctx.set_fill_style_str(&look.color.to_css());
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();

	let label_alpha = scale.edge_label_alpha * look.opacity;
	if label_alpha > 0.01 {
		draw_edge_label(ctx, scale, theme, &edge.relationship, (x1, y1), (x2, y2), label_alpha);
	}
	ctx.set_global_alpha(1.0);
}

/// Relationship label at the midpoint, rotated along the edge and kept upright.
fn draw_edge_label(
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	text: &str,
	(x1, y1): (f64, f64),
	(x2, y2): (f64, f64),
	alpha: f64,
) {
	let mut angle = (y2 - y1).atan2(x2 - x1);
	if angle.abs() > PI / 2.0 {
		angle += PI;
	}
	ctx.save();
	ctx.set_global_alpha(alpha);
	let _ = ctx.translate((x1 + x2) / 2.0, (y1 + y2) / 2.0);
	let _ = ctx.rotate(angle);
	ctx.set_font(&scale.edge_label_font);
	ctx.set_text_align("center");
	ctx.set_line_width(4.0);
	ctx.set_stroke_style_str(&theme.background.to_css());
	let _ = ctx.stroke_text(text, 0.0, -6.0);
	ctx.set_fill_style_str(&theme.label.to_css());
	let _ = ctx.fill_text(text, 0.0, -6.0);
	ctx.restore();
}

fn draw_node(ctx: &CanvasRenderingContext2d, scale: &ScaledValues, look: NodeLook, x: f64, y: f64) {
	let radius = scale.node_radius(look.size);

	ctx.set_global_alpha(look.opacity);
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&look.fill.to_css());
	ctx.fill();

	if look.border_width > 0.0 {
		ctx.set_stroke_style_str(&look.border.to_css());
		ctx.set_line_width(scale.border_width(look.border_width));
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_hovered_node(
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	info: &NodeInfo,
	x: f64,
	y: f64,
) {
	let base = theme.node_look(info.node_type, info.state);
	let look = NodeLook {
		size: base.size.max(HOVER_SIZE),
		border: theme.hover_border,
		border_width: base.border_width.max(3.0),
		opacity: 1.0,
		..base
	};
	draw_node(ctx, scale, look, x, y);
}
