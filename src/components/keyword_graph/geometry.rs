use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// Base bend of a parallel edge group, split across the group's members.
pub const CURVE_BASE: f64 = 25.0;
const CURVE_SAMPLES: usize = 16;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn length_sq(self) -> f64 {
		self.x * self.x + self.y * self.y
	}

	pub fn length(self) -> f64 {
		self.length_sq().sqrt()
	}

	pub fn distance(self, other: Point) -> f64 {
		(self - other).length()
	}

	pub fn lerp(self, other: Point, t: f64) -> Point {
		self + (other - self) * t
	}
}

impl Add for Point {
	type Output = Point;
	fn add(self, rhs: Point) -> Point {
		Point::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Point {
	type Output = Point;
	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f64> for Point {
	type Output = Point;
	fn mul(self, rhs: f64) -> Point {
		Point::new(self.x * rhs, self.y * rhs)
	}
}

impl AddAssign for Point {
	fn add_assign(&mut self, rhs: Point) {
		self.x += rhs.x;
		self.y += rhs.y;
	}
}

impl SubAssign for Point {
	fn sub_assign(&mut self, rhs: Point) {
		self.x -= rhs.x;
		self.y -= rhs.y;
	}
}

/// Control point of the quadratic curve for one member of a parallel edge
/// group. `from`/`to` must be given in group-key order so that every member
/// bends relative to the same perpendicular.
pub fn curve_control(from: Point, to: Point, offset_sign: f64, group_size: usize) -> Point {
	let mid = from.lerp(to, 0.5);
	if offset_sign == 0.0 {
		return mid;
	}
	let delta = to - from;
	let length = match delta.length() {
		l if l > 0.0 => l,
		_ => 1.0,
	};
	let normal = Point::new(-delta.y / length, delta.x / length);
	let amount = offset_sign * (CURVE_BASE / group_size.max(1) as f64);
	mid + normal * amount
}

pub fn quadratic_point(from: Point, control: Point, to: Point, t: f64) -> Point {
	let u = 1.0 - t;
	from * (u * u) + control * (2.0 * u * t) + to * (t * t)
}

pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
	let ab = b - a;
	let len_sq = ab.length_sq();
	if len_sq <= f64::EPSILON {
		return p.distance(a);
	}
	let t = (((p.x - a.x) * ab.x + (p.y - a.y) * ab.y) / len_sq).clamp(0.0, 1.0);
	p.distance(a + ab * t)
}

/// Approximate distance from `p` to a quadratic curve by sampling it into
/// line segments.
pub fn distance_to_curve(p: Point, from: Point, control: Point, to: Point) -> f64 {
	let mut best = f64::INFINITY;
	let mut prev = from;
	for step in 1..=CURVE_SAMPLES {
		let next = quadratic_point(from, control, to, step as f64 / CURVE_SAMPLES as f64);
		best = best.min(distance_to_segment(p, prev, next));
		prev = next;
	}
	best
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lone_edge_control_point_is_midpoint() {
		let c = curve_control(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 0.0, 1);
		assert_eq!(c, Point::new(5.0, 0.0));
	}

	#[test]
	fn parallel_pair_fans_out_symmetrically() {
		let (a, b) = (Point::new(0.0, 0.0), Point::new(100.0, 0.0));
		let first = curve_control(a, b, -0.5, 2);
		let second = curve_control(a, b, 0.5, 2);
		assert_eq!(first.x, 50.0);
		assert_eq!(second.x, 50.0);
		assert!((first.y + second.y).abs() < 1e-9);
		assert!((second.y - 6.25).abs() < 1e-9);
	}

	#[test]
	fn middle_of_odd_group_stays_straight() {
		let (a, b) = (Point::new(0.0, 0.0), Point::new(0.0, 40.0));
		assert_eq!(curve_control(a, b, 0.0, 3), Point::new(0.0, 20.0));
		let outer = curve_control(a, b, 1.0, 3);
		assert!(outer.x.abs() > 1.0);
	}

	#[test]
	fn coincident_endpoints_do_not_produce_nan() {
		let p = Point::new(3.0, 3.0);
		let c = curve_control(p, p, 1.0, 2);
		assert!(c.x.is_finite() && c.y.is_finite());
	}

	#[test]
	fn curve_distance_matches_straight_segment() {
		let (a, b) = (Point::new(0.0, 0.0), Point::new(10.0, 0.0));
		let mid = a.lerp(b, 0.5);
		let d = distance_to_curve(Point::new(5.0, 3.0), a, mid, b);
		assert!((d - 3.0).abs() < 1e-9);
		assert!((distance_to_segment(Point::new(-4.0, 3.0), a, b) - 5.0).abs() < 1e-9);
	}
}
