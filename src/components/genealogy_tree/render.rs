use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{NODE_RADIUS, TreeCanvasState};

const DEPTH_COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

pub fn depth_color(depth: usize) -> &'static str {
	DEPTH_COLORS[depth % DEPTH_COLORS.len()]
}

pub fn render(state: &TreeCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	if state.scene.is_empty() {
		draw_empty_state(state, ctx);
		return;
	}
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_empty_state(state: &TreeCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.6)");
	ctx.set_font("16px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text("No entities", state.width / 2.0, state.height / 2.0);
}

fn draw_edges(state: &TreeCanvasState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let has_highlight = state.has_active_highlight();

	for &(parent, child) in &state.scene.edges {
		let (px, py) = state.position(parent);
		let (cx, cy) = state.position(child);
		let is_highlighted =
			state.is_highlighted(parent) && state.is_highlighted(child) && state.hover.is_some_and(|h| h == parent || h == child);

		let (alpha, width) = match (has_highlight, is_highlighted) {
			(true, true) => (0.95, 2.2 / k),
			(true, false) => (0.2, 1.0 / k),
			_ => (0.6, 1.5 / k),
		};
		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {})", alpha));
		ctx.set_line_width(width);

		if state.scene.nodes[child].cycle_closure {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(6.0 / k),
				&JsValue::from_f64(4.0 / k),
			));
		}

		let mid_y = (py + cy) / 2.0;
		ctx.begin_path();
		ctx.move_to(px, py + NODE_RADIUS);
		ctx.line_to(px, mid_y);
		ctx.line_to(cx, mid_y);
		ctx.line_to(cx, cy - NODE_RADIUS);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}
}

fn draw_nodes(state: &TreeCanvasState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let has_highlight = state.has_active_highlight();
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	for (idx, node) in state.scene.nodes.iter().enumerate() {
		let (x, y) = state.position(idx);
		if node.is_virtual() {
			ctx.begin_path();
			let _ = ctx.arc(x, y, NODE_RADIUS * 0.4, 0.0, 2.0 * PI);
			ctx.set_fill_style_str("rgba(255, 255, 255, 0.35)");
			ctx.fill();
			continue;
		}

		let alpha = if has_highlight && !state.is_highlighted(idx) {
			0.3
		} else {
			1.0
		};
		let radius = if state.hover == Some(idx) {
			NODE_RADIUS * 1.3
		} else {
			NODE_RADIUS
		};
		ctx.set_global_alpha(alpha);

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		if node.cycle_closure {
			ctx.set_fill_style_str("#1a1a2e");
			ctx.fill();
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(3.0 / k),
				&JsValue::from_f64(2.0 / k),
			));
			ctx.set_stroke_style_str(depth_color(node.depth));
			ctx.set_line_width(2.0 / k);
			ctx.stroke();
			let _ = ctx.set_line_dash(&js_sys::Array::new());
			ctx.set_fill_style_str(depth_color(node.depth));
			ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
			let _ = ctx.fill_text("\u{21ba}", x, y);
		} else {
			ctx.set_fill_style_str(depth_color(node.depth));
			ctx.fill();
		}

		if let Some(glyph) = node.glyph {
			let (gx, gy, gr) = (x + radius, y - radius, radius * 0.6);
			ctx.begin_path();
			let _ = ctx.arc(gx, gy, gr, 0.0, 2.0 * PI);
			ctx.set_fill_style_str("white");
			ctx.fill();
			ctx.set_fill_style_str("#1a1a2e");
			ctx.set_font(&format!("bold {}px sans-serif", gr * 1.8));
			let _ = ctx.fill_text(glyph.symbol(), gx, gy);
		}

		ctx.set_fill_style_str("white");
		ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));
		let label = if node.hidden_children > 0 {
			format!("{} ({})", node.label, node.hidden_children)
		} else {
			node.label.clone()
		};
		let _ = ctx.fill_text(&label, x, y + radius + 10.0);
		ctx.set_global_alpha(1.0);
	}
}
