use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::GraphViewState;
use super::style::{BACKGROUND, LABEL_COLOR, font_size};

const EMPTY_MESSAGE: &str = "No keywords to display";
const NODE_OUTLINE: &str = "#9ca3af";
const HOVER_RING: &str = "#111827";

pub fn render(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	if state.graph.is_empty() {
		draw_empty(state, ctx);
		return;
	}

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	draw_labels(state, ctx);
	ctx.restore();
}

fn draw_empty(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(NODE_OUTLINE);
	ctx.set_font("14px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(EMPTY_MESSAGE, state.width / 2.0, state.height / 2.0);
}

fn draw_edges(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	let has_hover = state.hovered().is_some();
	let dash: JsValue =
		js_sys::Array::of2(&JsValue::from_f64(4.0), &JsValue::from_f64(3.0)).into();
	let solid: JsValue = js_sys::Array::new().into();

	for (idx, edge) in state.graph.edges.iter().enumerate() {
		let Some((from, control, to)) = state.edge_curve(idx) else {
			continue;
		};
		let stroke = state.stroke(idx);
		let emphasised = state.is_highlighted(edge.source) && state.is_highlighted(edge.target);
		let alpha = match (has_hover, emphasised) {
			(false, _) => 0.8,
			(true, true) => 1.0,
			(true, false) => 0.2,
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(&stroke.color);
		ctx.set_line_width(if emphasised && has_hover {
			stroke.width * 1.5
		} else {
			stroke.width
		});
		let _ = ctx.set_line_dash(if stroke.dashed { &dash } else { &solid });

		ctx.begin_path();
		ctx.move_to(from.x, from.y);
		if edge.group_size > 1 {
			ctx.quadratic_curve_to(control.x, control.y, to.x, to.y);
		} else {
			ctx.line_to(to.x, to.y);
		}
		ctx.stroke();
	}

	let _ = ctx.set_line_dash(&solid);
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let has_hover = state.hovered().is_some();
	let snapshot = state.simulation.snapshot();

	for (idx, pos) in snapshot.positions.iter().enumerate() {
		let radius = state.radius(idx);
		let dimmed = has_hover && !state.is_highlighted(idx);

		ctx.set_global_alpha(if dimmed { 0.35 } else { 1.0 });
		ctx.begin_path();
		let _ = ctx.arc(pos.x, pos.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(state.fill(idx));
		ctx.fill();
		ctx.set_stroke_style_str(NODE_OUTLINE);
		ctx.set_line_width(1.0 / k);
		ctx.stroke();

		if state.hovered() == Some(idx) {
			ctx.begin_path();
			let _ = ctx.arc(pos.x, pos.y, radius + 3.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(HOVER_RING);
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}
	}
	ctx.set_global_alpha(1.0);
}

fn draw_labels(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	let has_hover = state.hovered().is_some();
	let snapshot = state.simulation.snapshot();

	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str(LABEL_COLOR);
	for (idx, (node, pos)) in state.graph.nodes.iter().zip(snapshot.positions).enumerate() {
		ctx.set_global_alpha(if has_hover && !state.is_highlighted(idx) {
			0.4
		} else {
			1.0
		});
		let weight = if node.is_central {
			node.weight.max(16.0)
		} else {
			node.weight
		};
		ctx.set_font(&format!("{}px sans-serif", font_size(weight)));
		let _ = ctx.fill_text(&node.name, pos.x, pos.y);
	}
	ctx.set_global_alpha(1.0);
}
