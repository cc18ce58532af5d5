use super::graph::{Edge, Node};

pub const PALETTE: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

pub const CENTRAL_COLOR: &str = "#FDD835";
pub const NEUTRAL_NODE_COLOR: &str = "#ffffff";
pub const NEUTRAL_EDGE_COLOR: &str = "#aaaaaa";
pub const LABEL_COLOR: &str = "#333333";
pub const BACKGROUND: &str = "#fafafa";

const MIN_RADIUS: f64 = 8.0;
const MAX_RADIUS: f64 = 60.0;
const CENTRAL_EXTRA_RADIUS: f64 = 6.0;
const MIN_FONT: f64 = 10.0;
const MAX_FONT: f64 = 28.0;
// Average glyph width relative to font size, enough for mixed latin/hangul labels.
const GLYPH_WIDTH: f64 = 0.62;

const WEAK_EDGE: (f64, f64, f64) = (176.0, 196.0, 222.0);
const STRONG_EDGE: (f64, f64, f64) = (25.0, 82.0, 190.0);

pub fn font_size(weight: f64) -> f64 {
	(MIN_FONT + weight.max(0.0).sqrt() * 1.5).min(MAX_FONT)
}

/// Radius grows with weight and is wide enough for roughly half the label.
pub fn node_radius(node: &Node) -> f64 {
	let by_weight = MIN_RADIUS + node.weight.max(0.0).sqrt() * 2.4;
	let label_width = node.name.chars().count() as f64 * font_size(node.weight) * GLYPH_WIDTH;
	let radius = by_weight.max(label_width * 0.5).min(MAX_RADIUS);
	if node.is_central {
		radius + CENTRAL_EXTRA_RADIUS
	} else {
		radius
	}
}

pub fn cluster_color(slot: usize) -> &'static str {
	PALETTE[slot % PALETTE.len()]
}

/// Blend between the weak and strong edge colours for `strength` in `0..=1`.
pub fn strength_color(strength: f64) -> String {
	let t = strength.clamp(0.0, 1.0);
	let mix = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
	format!(
		"rgb({}, {}, {})",
		mix(WEAK_EDGE.0, STRONG_EDGE.0),
		mix(WEAK_EDGE.1, STRONG_EDGE.1),
		mix(WEAK_EDGE.2, STRONG_EDGE.2)
	)
}

/// `strength` is the strongest incident edge weight, used when the node has
/// no cluster to take a colour from.
pub fn node_fill(node: &Node, strength: Option<f64>) -> String {
	if node.is_central {
		return CENTRAL_COLOR.into();
	}
	match (node.cluster, strength) {
		(Some(tag), _) => cluster_color(tag.slot).into(),
		(None, Some(s)) => strength_color(s),
		(None, None) => NEUTRAL_NODE_COLOR.into(),
	}
}

pub struct EdgeStroke {
	pub color: String,
	pub width: f64,
	pub dashed: bool,
}

pub fn edge_stroke(edge: &Edge) -> EdgeStroke {
	match (edge.weight, edge.cluster) {
		(Some(w), _) => EdgeStroke {
			color: strength_color(w),
			width: 1.0 + 3.0 * w,
			dashed: w < 0.2,
		},
		(None, Some(tag)) => EdgeStroke {
			color: cluster_color(tag.slot).into(),
			width: 2.0,
			dashed: false,
		},
		(None, None) => EdgeStroke {
			color: NEUTRAL_EDGE_COLOR.into(),
			width: 1.5,
			dashed: false,
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::keyword_graph::graph::ClusterTag;
	use crate::components::keyword_graph::types::NodeId;

	fn node(name: &str, weight: f64) -> Node {
		Node {
			id: NodeId::Int(1),
			name: name.into(),
			weight,
			cluster: None,
			is_central: false,
		}
	}

	#[test]
	fn radius_grows_with_weight() {
		let mut last = 0.0;
		for weight in [0.0, 1.0, 4.0, 16.0, 64.0] {
			let r = node_radius(&node("ai", weight));
			assert!(r >= last, "radius shrank at weight {weight}");
			last = r;
		}
		assert!(node_radius(&node("ai", 64.0)) > node_radius(&node("ai", 1.0)));
	}

	#[test]
	fn long_labels_widen_the_node() {
		assert!(node_radius(&node("semiconductor export", 1.0)) > node_radius(&node("ai", 1.0)));
	}

	#[test]
	fn central_node_has_reserved_colour() {
		let mut n = node("search", 1.0);
		n.is_central = true;
		n.cluster = Some(ClusterTag { id: 3, slot: 3 });
		assert_eq!(node_fill(&n, None), CENTRAL_COLOR);
	}

	#[test]
	fn cluster_palette_wraps() {
		assert_eq!(cluster_color(0), cluster_color(PALETTE.len()));
		let mut n = node("x", 1.0);
		n.cluster = Some(ClusterTag { id: 42, slot: 2 });
		assert_eq!(node_fill(&n, Some(0.9)), PALETTE[2]);
	}

	#[test]
	fn strength_colour_spans_weak_to_strong() {
		assert_eq!(strength_color(0.0), "rgb(176, 196, 222)");
		assert_eq!(strength_color(1.0), "rgb(25, 82, 190)");
		assert_eq!(strength_color(7.0), strength_color(1.0));
	}
}
