//! Force-directed layout.
//!
//! Every tick combines a link spring per edge, all-pairs charge repulsion, a
//! centering force and an optional collision force, then integrates
//! velocities with decay. The `alpha` temperature scales the alpha-aware forces and
//! decays towards `alpha_target`; once it drops below `alpha_min` the
//! simulation stops until it is reheated by a drag.
//!
//! [`SimulationState::advance`] is the whole per-tick transition. [`Simulation`]
//! owns one state plus the graph-derived constants and is what the renderer
//! drives.

use std::f64::consts::TAU;

use log::debug;
use serde::Deserialize;

use super::geometry::Point;
use super::graph::Graph;
use super::style::node_radius;

const INITIAL_RADIUS: f64 = 100.0;
const DISTANCE_MIN_SQ: f64 = 1.0;
const JIGGLE: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Centering {
	/// Shift the whole layout so its mean sits on the centre.
	Translate,
	/// Pull every node towards the centre on each axis.
	Pull { strength: f64 },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	pub link_distance: f64,
	/// Negative values repel.
	pub charge_strength: f64,
	pub centering: Centering,
	/// Collision strength in `0..=1`; `None` disables the force.
	pub collide: Option<f64>,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	pub velocity_decay: f64,
	/// Alpha target held while a node is dragged.
	pub drag_alpha_target: f64,
	pub max_ticks_per_frame: usize,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self::keyword()
	}
}

impl LayoutConfig {
	/// Plain cluster keyword graph.
	pub fn keyword() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			link_distance: 80.0,
			charge_strength: -200.0,
			centering: Centering::Translate,
			collide: None,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
			max_ticks_per_frame: 1,
		}
	}

	/// Related keywords around a searched term; weighted nodes need collision.
	pub fn related() -> Self {
		Self {
			collide: Some(0.7),
			..Self::keyword()
		}
	}

	/// Today's keywords, weighted by article counts.
	pub fn today() -> Self {
		Self {
			link_distance: 100.0,
			charge_strength: -150.0,
			centering: Centering::Pull { strength: 0.07 },
			collide: Some(0.7),
			..Self::keyword()
		}
	}
}

#[derive(Clone, Copy, Debug)]
struct Link {
	source: usize,
	target: usize,
	strength: f64,
	bias: f64,
}

/// Graph-derived constants that do not change between ticks.
#[derive(Clone, Debug, Default)]
pub struct Topology {
	links: Vec<Link>,
	radii: Vec<f64>,
}

impl Topology {
	pub fn new(graph: &Graph) -> Self {
		let degrees = graph.degrees();
		let links = graph
			.edges
			.iter()
			.map(|edge| {
				let (ds, dt) = (degrees[edge.source] as f64, degrees[edge.target] as f64);
				Link {
					source: edge.source,
					target: edge.target,
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();
		let radii = graph.nodes.iter().map(node_radius).collect();
		Self { links, radii }
	}
}

/// Positions, velocities and pins of one simulation run.
#[derive(Clone, Debug, Default)]
pub struct SimulationState {
	positions: Vec<Point>,
	velocities: Vec<Point>,
	pins: Vec<Option<Point>>,
	center: Point,
	alpha: f64,
	alpha_target: f64,
	running: bool,
	last_displacement: f64,
}

fn jiggle(i: usize, j: usize) -> Point {
	let angle = ((i as f64) * 0.618_034 + (j as f64) * 0.414_214) * TAU;
	Point::new(angle.cos(), angle.sin()) * JIGGLE
}

impl SimulationState {
	/// Places nodes on a circle around the centre, the central node in the middle.
	pub fn initial(graph: &Graph, width: f64, height: f64) -> Self {
		let n = graph.nodes.len();
		let center = Point::new(width / 2.0, height / 2.0);
		let positions = (0..n)
			.map(|i| {
				if graph.central == Some(i) {
					return center;
				}
				let angle = (i as f64) * TAU / n as f64;
				center + Point::new(angle.cos(), angle.sin()) * INITIAL_RADIUS
			})
			.collect();
		Self {
			positions,
			velocities: vec![Point::ZERO; n],
			pins: vec![None; n],
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			running: n > 0,
			last_displacement: 0.0,
		}
	}

	/// One simulation tick.
	pub fn advance(mut self, topology: &Topology, config: &LayoutConfig) -> Self {
		if self.positions.is_empty() {
			self.running = false;
			return self;
		}

		self.alpha += (self.alpha_target - self.alpha) * config.alpha_decay;
		let before = self.positions.clone();

		self.apply_links(topology, config);
		self.apply_charge(config);
		if let Some(strength) = config.collide {
			self.apply_collision(topology, strength);
		}
		self.apply_centering(config.centering);

		let keep = 1.0 - config.velocity_decay;
		let mut moved = 0.0;
		let mut free = 0usize;
		for (i, pin) in self.pins.iter().enumerate() {
			match pin {
				Some(p) => {
					self.positions[i] = *p;
					self.velocities[i] = Point::ZERO;
				}
				None => {
					self.velocities[i] = self.velocities[i] * keep;
					let v = self.velocities[i];
					self.positions[i] += v;
					moved += self.positions[i].distance(before[i]);
					free += 1;
				}
			}
		}
		self.last_displacement = if free > 0 { moved / free as f64 } else { 0.0 };

		if self.alpha < config.alpha_min && self.alpha_target < config.alpha_min {
			self.running = false;
			debug!("layout settled, mean displacement {:.4}", self.last_displacement);
		}
		self
	}

	fn apply_links(&mut self, topology: &Topology, config: &LayoutConfig) {
		for link in &topology.links {
			let (s, t) = (link.source, link.target);
			let mut delta = (self.positions[t] + self.velocities[t])
				- (self.positions[s] + self.velocities[s]);
			if delta.length_sq() == 0.0 {
				delta = jiggle(s, t);
			}
			let l = delta.length();
			let scale = (l - config.link_distance) / l * self.alpha * link.strength;
			let pull = delta * scale;
			self.velocities[t] -= pull * link.bias;
			self.velocities[s] += pull * (1.0 - link.bias);
		}
	}

	/// Naive all-pairs repulsion; graphs here hold tens of nodes.
	fn apply_charge(&mut self, config: &LayoutConfig) {
		let n = self.positions.len();
		for i in 0..n {
			let mut push = Point::ZERO;
			for j in 0..n {
				if i == j {
					continue;
				}
				let mut delta = self.positions[j] - self.positions[i];
				let mut l = delta.length_sq();
				if l == 0.0 {
					delta = jiggle(i, j);
					l = delta.length_sq();
				}
				if l < DISTANCE_MIN_SQ {
					l = (DISTANCE_MIN_SQ * l).sqrt();
				}
				push += delta * (config.charge_strength * self.alpha / l);
			}
			self.velocities[i] += push;
		}
	}

	fn apply_collision(&mut self, topology: &Topology, strength: f64) {
		let n = self.positions.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let (ri, rj) = (topology.radii[i], topology.radii[j]);
				let r = ri + rj;
				let mut delta = (self.positions[i] + self.velocities[i])
					- (self.positions[j] + self.velocities[j]);
				if delta.length_sq() >= r * r {
					continue;
				}
				if delta.length_sq() == 0.0 {
					delta = jiggle(i, j);
				}
				let l = delta.length();
				let push = delta * ((r - l) / l * strength);
				let share = (rj * rj) / (ri * ri + rj * rj);
				self.velocities[i] += push * share;
				self.velocities[j] -= push * (1.0 - share);
			}
		}
	}

	fn apply_centering(&mut self, centering: Centering) {
		match centering {
			Centering::Translate => {
				let n = self.positions.len() as f64;
				let mut mean = Point::ZERO;
				for p in &self.positions {
					mean += *p;
				}
				let shift = self.center - mean * (1.0 / n);
				for p in &mut self.positions {
					*p += shift;
				}
			}
			Centering::Pull { strength } => {
				for (p, v) in self.positions.iter().zip(self.velocities.iter_mut()) {
					*v += (self.center - *p) * (strength * self.alpha);
				}
			}
		}
	}
}

/// Read-only view of the layout handed to the renderer each frame.
#[derive(Clone, Copy, Debug)]
pub struct LayoutSnapshot<'a> {
	pub positions: &'a [Point],
	pub alpha: f64,
	pub running: bool,
}

pub struct Simulation {
	state: SimulationState,
	topology: Topology,
	config: LayoutConfig,
}

impl Simulation {
	pub fn new(graph: &Graph, config: LayoutConfig, width: f64, height: f64) -> Self {
		Self {
			state: SimulationState::initial(graph, width, height),
			topology: Topology::new(graph),
			config,
		}
	}

	pub fn config(&self) -> &LayoutConfig {
		&self.config
	}

	pub fn is_running(&self) -> bool {
		self.state.running
	}

	pub fn alpha(&self) -> f64 {
		self.state.alpha
	}

	/// Mean distance moved by free nodes during the last tick.
	pub fn last_displacement(&self) -> f64 {
		self.state.last_displacement
	}

	/// Advances one tick if running. Returns whether it is still running.
	pub fn tick(&mut self) -> bool {
		if !self.state.running {
			return false;
		}
		let state = std::mem::take(&mut self.state);
		self.state = state.advance(&self.topology, &self.config);
		self.state.running
	}

	pub fn position(&self, idx: usize) -> Option<Point> {
		self.state.positions.get(idx).copied()
	}

	pub fn is_pinned(&self, idx: usize) -> bool {
		matches!(self.state.pins.get(idx), Some(Some(_)))
	}

	/// Fixes a node at `at`; forces no longer move it.
	pub fn pin(&mut self, idx: usize, at: Point) {
		if let Some(pin) = self.state.pins.get_mut(idx) {
			*pin = Some(at);
			self.state.positions[idx] = at;
			self.state.velocities[idx] = Point::ZERO;
		}
	}

	pub fn unpin(&mut self, idx: usize) {
		if let Some(pin) = self.state.pins.get_mut(idx) {
			*pin = None;
		}
	}

	/// Holds alpha up for the duration of a drag and restarts a settled run.
	pub fn reheat(&mut self) {
		if self.state.positions.is_empty() {
			return;
		}
		self.state.alpha_target = self.config.drag_alpha_target;
		self.state.running = true;
	}

	/// Lets alpha decay again after a drag; the run keeps going until it settles.
	pub fn release(&mut self) {
		self.state.alpha_target = 0.0;
	}

	/// Safe to call repeatedly.
	pub fn stop(&mut self) {
		self.state.running = false;
	}

	pub fn snapshot(&self) -> LayoutSnapshot<'_> {
		LayoutSnapshot {
			positions: &self.state.positions,
			alpha: self.state.alpha,
			running: self.state.running,
		}
	}
}
