use std::collections::HashSet;

use super::geometry::{Point, curve_control, distance_to_curve};
use super::graph::Graph;
use super::layout::{LayoutConfig, Simulation};
use super::style::{self, EdgeStroke};
use super::types::{GraphInput, NavTarget};

/// Screen pixels the pointer may travel before a press stops being a click.
pub const CLICK_TOLERANCE: f64 = 3.0;
/// Screen-space distance within which a press selects an edge.
pub const EDGE_HIT_TOLERANCE: f64 = 5.0;

#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

/// One pointer gesture, from press to release.
#[derive(Clone, Debug, Default)]
enum Gesture {
	#[default]
	Idle,
	Node {
		idx: usize,
		origin: Point,
		/// Node position minus pointer position, in graph space.
		grab: Point,
		moved: bool,
	},
	Background {
		origin: Point,
		transform_start: Point,
		edge: Option<usize>,
		moved: bool,
	},
}

/// Everything one rendered graph owns between rebuilds.
pub struct GraphViewState {
	pub graph: Graph,
	pub simulation: Simulation,
	pub transform: ViewTransform,
	pub width: f64,
	pub height: f64,
	hover: Option<usize>,
	hover_neighbors: HashSet<usize>,
	gesture: Gesture,
	radii: Vec<f64>,
	fills: Vec<String>,
	strokes: Vec<EdgeStroke>,
}

impl GraphViewState {
	pub fn new(input: &GraphInput, config: LayoutConfig, width: f64, height: f64) -> Self {
		let graph = Graph::build(input);
		let simulation = Simulation::new(&graph, config, width, height);

		let mut strongest: Vec<Option<f64>> = vec![None; graph.nodes.len()];
		for edge in &graph.edges {
			if let Some(w) = edge.weight {
				for end in [edge.source, edge.target] {
					strongest[end] = Some(strongest[end].map_or(w, |s: f64| s.max(w)));
				}
			}
		}
		let radii = graph.nodes.iter().map(style::node_radius).collect();
		let fills = graph
			.nodes
			.iter()
			.zip(&strongest)
			.map(|(node, s)| style::node_fill(node, *s))
			.collect();
		let strokes = graph.edges.iter().map(style::edge_stroke).collect();

		Self {
			graph,
			simulation,
			transform: ViewTransform::default(),
			width,
			height,
			hover: None,
			hover_neighbors: HashSet::new(),
			gesture: Gesture::Idle,
			radii,
			fills,
			strokes,
		}
	}

	pub fn radius(&self, idx: usize) -> f64 {
		self.radii[idx]
	}

	pub fn fill(&self, idx: usize) -> &str {
		&self.fills[idx]
	}

	pub fn stroke(&self, edge: usize) -> &EdgeStroke {
		&self.strokes[edge]
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		Point::new(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Endpoints and control point of an edge in group-key order.
	pub fn edge_curve(&self, edge: usize) -> Option<(Point, Point, Point)> {
		let edge = self.graph.edges.get(edge)?;
		let (a, b) = edge.group_key();
		let from = self.simulation.position(a)?;
		let to = self.simulation.position(b)?;
		let control = curve_control(from, to, edge.offset_sign(), edge.group_size);
		Some((from, control, to))
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let p = self.screen_to_graph(sx, sy);
		self.simulation
			.snapshot()
			.positions
			.iter()
			.enumerate()
			.filter_map(|(idx, pos)| {
				let d = pos.distance(p);
				(d <= self.radii[idx]).then_some((idx, d))
			})
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(idx, _)| idx)
	}

	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let p = self.screen_to_graph(sx, sy);
		let tolerance = EDGE_HIT_TOLERANCE / self.transform.k;
		(0..self.graph.edges.len())
			.filter_map(|idx| {
				let (from, control, to) = self.edge_curve(idx)?;
				let d = distance_to_curve(p, from, control, to);
				(d <= tolerance).then_some((idx, d))
			})
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(idx, _)| idx)
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover == node {
			return;
		}
		self.hover = node;
		self.hover_neighbors = match node {
			Some(idx) => self.graph.neighbors(idx).collect(),
			None => HashSet::new(),
		};
	}

	pub fn hovered(&self) -> Option<usize> {
		self.hover
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover == Some(idx) || self.hover_neighbors.contains(&idx)
	}

	pub fn is_dragging(&self) -> bool {
		matches!(self.gesture, Gesture::Node { .. })
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		let origin = Point::new(sx, sy);
		if let Some(idx) = self.node_at_position(sx, sy)
			&& let Some(pos) = self.simulation.position(idx)
		{
			self.simulation.pin(idx, pos);
			self.simulation.reheat();
			self.gesture = Gesture::Node {
				idx,
				origin,
				grab: pos - self.screen_to_graph(sx, sy),
				moved: false,
			};
		} else {
			self.gesture = Gesture::Background {
				origin,
				transform_start: Point::new(self.transform.x, self.transform.y),
				edge: self.edge_at_position(sx, sy),
				moved: false,
			};
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		let pointer = Point::new(sx, sy);
		let graph_pointer = self.screen_to_graph(sx, sy);
		match &mut self.gesture {
			Gesture::Idle => {
				let hovered = self.node_at_position(sx, sy);
				self.set_hover(hovered);
			}
			Gesture::Node {
				idx,
				origin,
				grab,
				moved,
			} => {
				*moved |= pointer.distance(*origin) > CLICK_TOLERANCE;
				if *moved {
					let idx = *idx;
					let at = graph_pointer + *grab;
					self.simulation.pin(idx, at);
				}
			}
			Gesture::Background {
				origin,
				transform_start,
				moved,
				..
			} => {
				*moved |= pointer.distance(*origin) > CLICK_TOLERANCE;
				if *moved {
					self.transform.x = transform_start.x + (pointer.x - origin.x);
					self.transform.y = transform_start.y + (pointer.y - origin.y);
				}
			}
		}
	}

	/// Ends the gesture. A press that never left the click tolerance is a
	/// click and yields where to navigate; a drag yields nothing.
	pub fn pointer_up(&mut self) -> Option<NavTarget> {
		match std::mem::take(&mut self.gesture) {
			Gesture::Idle => None,
			Gesture::Node { idx, moved, .. } => {
				self.simulation.unpin(idx);
				self.simulation.release();
				(!moved).then(|| NavTarget::Keyword(self.graph.nodes[idx].id.clone()))
			}
			Gesture::Background { edge, moved, .. } => {
				if moved {
					return None;
				}
				let cluster = self.graph.edges.get(edge?)?.cluster?;
				Some(NavTarget::Cluster(cluster.id))
			}
		}
	}

	/// The pointer left the surface: drop the gesture without a click.
	pub fn pointer_leave(&mut self) {
		if let Gesture::Node { idx, .. } = std::mem::take(&mut self.gesture) {
			self.simulation.unpin(idx);
			self.simulation.release();
		}
		self.set_hover(None);
	}

	pub fn zoom(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = k;
	}

	/// Runs this frame's ticks. Returns whether the layout is still moving.
	pub fn tick(&mut self) -> bool {
		for _ in 0..self.simulation.config().max_ticks_per_frame.max(1) {
			if !self.simulation.tick() {
				break;
			}
		}
		self.simulation.is_running()
	}
}
