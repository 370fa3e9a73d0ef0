use glam::DVec2;
use log::{debug, warn};
use rand::Rng;

use super::builder::build_graph;
use super::params::{Repulsion, SimulationParams, Walls};
use super::types::{GraphData, GraphLink, GraphNode, GraphVariant, Record};

/// Distances below this are treated as this, so forces stay finite.
pub const MIN_DISTANCE: f64 = 1.0;

const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Clamp {
	Inside,
	Low,
	High,
	/// The axis is narrower than the node; the node sits in the middle.
	Pinned,
}

/// Owns the node arena for one mounted graph and advances it frame by frame.
#[derive(Clone, Debug)]
pub struct GraphState {
	pub variant: GraphVariant,
	pub params: SimulationParams,
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
	pub width: f64,
	pub height: f64,
	pub pointer: Option<DVec2>,
	pub hovered: Option<usize>,
}

impl GraphState {
	pub fn new<R: Rng + ?Sized>(
		records: &[Record],
		variant: GraphVariant,
		width: f64,
		height: f64,
		rng: &mut R,
	) -> Self {
		let data = build_graph(records, variant, width, height, rng);
		Self::from_data(data, variant, width, height)
	}

	pub fn from_data(data: GraphData, variant: GraphVariant, width: f64, height: f64) -> Self {
		let mut state = Self {
			variant,
			params: variant.params(),
			nodes: data.nodes,
			links: data.links,
			width: 0.0,
			height: 0.0,
			pointer: None,
			hovered: None,
		};
		state.resize(width, height);
		state
	}

	/// Replaces every node and link; nothing carries over from the old layout.
	pub fn rebuild<R: Rng + ?Sized>(&mut self, records: &[Record], rng: &mut R) {
		let data = build_graph(records, self.variant, self.width, self.height, rng);
		self.nodes = data.nodes;
		self.links = data.links;
		self.hovered = None;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
			warn!("ignoring invalid canvas size {width}x{height}");
			return;
		}
		if width != self.width || height != self.height {
			debug!("canvas resized to {width}x{height}");
		}
		self.width = width;
		self.height = height;
	}

	pub fn center(&self) -> DVec2 {
		DVec2::new(self.width / 2.0, self.height / 2.0)
	}

	/// Radius used for click hit-testing of node `idx`.
	pub fn hit_radius(&self, idx: usize) -> f64 {
		self.params
			.hit_radius
			.unwrap_or_else(|| self.nodes[idx].radius)
	}

	/// First node, in arena order, whose hit circle contains `point`.
	pub fn node_at(&self, point: DVec2) -> Option<usize> {
		self.nodes
			.iter()
			.enumerate()
			.position(|(idx, node)| node.position.distance(point) <= self.hit_radius(idx))
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		self.hovered = node.filter(|&idx| idx < self.nodes.len());
	}

	pub fn is_hovered(&self, idx: usize) -> bool {
		self.hovered == Some(idx)
	}

	/// Nodes linked to `idx` in either direction.
	pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
		self.links.iter().filter_map(move |link| {
			if link.source == idx {
				Some(link.target)
			} else if link.target == idx {
				Some(link.source)
			} else {
				None
			}
		})
	}

	/// Advances the layout by one frame.
	pub fn tick(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		self.sanitize();
		self.apply_repulsion();
		self.apply_centering();
		self.apply_springs();
		self.apply_pointer();
		self.integrate();
		self.sanitize();
	}

	fn apply_repulsion(&mut self) {
		let n = self.nodes.len();
		for i in 0..n {
			let (position, radius) = (self.nodes[i].position, self.nodes[i].radius);
			let mut push = DVec2::ZERO;
			for (j, other) in self.nodes.iter().enumerate() {
				if i == j {
					continue;
				}
				let delta = position - other.position;
				let distance = delta.length().max(MIN_DISTANCE);
				let direction = delta
					.try_normalize()
					.unwrap_or_else(|| fallback_direction(i, j));
				match self.params.repulsion {
					Repulsion::InverseSquare {
						strength,
						min_distance,
					} => {
						if distance < min_distance {
							push += direction * strength / (distance * distance);
						}
					}
					Repulsion::Overlap { padding, strength } => {
						let reach = radius + other.radius + padding;
						if distance < reach {
							push += direction * (reach - distance) * strength;
						}
					}
				}
			}
			self.nodes[i].velocity += push;
		}
	}

	fn apply_centering(&mut self) {
		let (center, strength) = (self.center(), self.params.center_strength);
		for node in &mut self.nodes {
			node.velocity += (center - node.position) * strength;
		}
	}

	fn apply_springs(&mut self) {
		let Some(spring) = self.params.spring else {
			return;
		};
		for link in &self.links {
			let (a, b) = (link.source, link.target);
			if a == b || a >= self.nodes.len() || b >= self.nodes.len() {
				continue;
			}
			let delta = self.nodes[b].position - self.nodes[a].position;
			let distance = delta.length().max(MIN_DISTANCE);
			let direction = delta
				.try_normalize()
				.unwrap_or_else(|| fallback_direction(a, b));
			let force = direction * (distance - spring.rest_length) * spring.stiffness * 0.5;
			self.nodes[a].velocity += force;
			self.nodes[b].velocity -= force;
		}
	}

	fn apply_pointer(&mut self) {
		let (Some(pointer), Some(repel)) = (self.pointer, self.params.pointer) else {
			return;
		};
		for node in &mut self.nodes {
			let delta = node.position - pointer;
			let distance = delta.length();
			if distance < repel.radius {
				let direction = delta.try_normalize().unwrap_or(DVec2::NEG_Y);
				node.velocity += direction * (1.0 - distance / repel.radius) * repel.strength;
			}
		}
	}

	fn integrate(&mut self) {
		let (width, height) = (self.width, self.height);
		let (damping, max_speed, walls) = (
			self.params.damping,
			self.params.max_speed,
			self.params.walls,
		);
		for node in &mut self.nodes {
			node.velocity = (node.velocity * damping).clamp_length_max(max_speed);
			node.position += node.velocity;

			let (x, side_x) = clamp_axis(node.position.x, node.radius, width);
			let (y, side_y) = clamp_axis(node.position.y, node.radius, height);
			node.position = DVec2::new(x, y);

			if walls == Walls::Bounce {
				node.velocity.x = bounce(node.velocity.x, side_x);
				node.velocity.y = bounce(node.velocity.y, side_y);
			}
		}
	}

	fn sanitize(&mut self) {
		let center = self.center();
		for node in &mut self.nodes {
			if !node.position.is_finite() {
				warn!("node {} had a non-finite position, recentering", node.id);
				node.position = center;
				node.velocity = DVec2::ZERO;
			} else if !node.velocity.is_finite() {
				warn!("node {} had a non-finite velocity, stopping it", node.id);
				node.velocity = DVec2::ZERO;
			}
		}
	}
}

fn clamp_axis(value: f64, radius: f64, extent: f64) -> (f64, Clamp) {
	let (lo, hi) = (radius, extent - radius);
	if hi < lo {
		(extent / 2.0, Clamp::Pinned)
	} else if value < lo {
		(lo, Clamp::Low)
	} else if value > hi {
		(hi, Clamp::High)
	} else {
		(value, Clamp::Inside)
	}
}

fn bounce(v: f64, side: Clamp) -> f64 {
	match side {
		Clamp::Inside => v,
		Clamp::Low => v.abs(),
		Clamp::High => -v.abs(),
		Clamp::Pinned => 0.0,
	}
}

/// Deterministic unit vector for two coincident nodes; opposite for `(j, i)`.
fn fallback_direction(i: usize, j: usize) -> DVec2 {
	let (lo, hi) = (i.min(j), i.max(j));
	let angle = (lo.wrapping_mul(31).wrapping_add(hi) % 360) as f64 * GOLDEN_ANGLE;
	let direction = DVec2::new(angle.cos(), angle.sin());
	if i < j { direction } else { -direction }
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	fn sample_notes(n: usize) -> Vec<Record> {
		(0..n)
			.map(|i| {
				Record::new(i.to_string(), format!("Nota {i}"))
					.with_content(format!("[[Nota {}]] [[Nota {}]]", (i + 1) % n, (i * 7) % n))
			})
			.collect()
	}

	fn sample_tags(n: usize) -> Vec<Record> {
		(0..n)
			.map(|i| Record::new(format!("tag-{i}"), format!("#tema{i}")))
			.collect()
	}

	fn assert_in_bounds(state: &GraphState, tick: usize) {
		for node in &state.nodes {
			let (r, p) = (node.radius, node.position);
			assert!(
				p.x >= r && p.x <= state.width - r && p.y >= r && p.y <= state.height - r,
				"node {} out of bounds at tick {tick}: {p:?}",
				node.id
			);
		}
	}

	fn single_node(position: DVec2, velocity: DVec2) -> GraphState {
		let data = GraphData {
			nodes: vec![GraphNode {
				id: "solo".into(),
				label: "Solo".into(),
				position,
				velocity,
				radius: 6.0,
				color: None,
			}],
			links: Vec::new(),
		};
		GraphState::from_data(data, GraphVariant::Notes, 800.0, 600.0)
	}

	#[test]
	fn notes_stay_inside_canvas_every_tick() {
		let mut rng = SmallRng::seed_from_u64(11);
		let mut state = GraphState::new(&sample_notes(40), GraphVariant::Notes, 500.0, 400.0, &mut rng);
		for tick in 0..1500 {
			state.tick();
			assert_in_bounds(&state, tick);
		}
	}

	#[test]
	fn tags_stay_inside_canvas_every_tick_with_pointer() {
		let mut rng = SmallRng::seed_from_u64(12);
		let mut state = GraphState::new(&sample_tags(30), GraphVariant::Tags, 600.0, 450.0, &mut rng);
		for tick in 0..1500 {
			if tick % 100 == 0 {
				state.pointer = Some(DVec2::new(
					rng.gen_range(0.0..600.0),
					rng.gen_range(0.0..450.0),
				));
			}
			state.tick();
			assert_in_bounds(&state, tick);
		}
	}

	#[test]
	fn damping_shrinks_velocity_every_tick() {
		let mut state = single_node(DVec2::new(400.0, 300.0), DVec2::new(4.0, -3.0));
		state.params.center_strength = 0.0;

		let mut previous = state.nodes[0].velocity.length();
		for _ in 0..200 {
			state.tick();
			let speed = state.nodes[0].velocity.length();
			assert!(speed < previous || speed == 0.0);
			assert!((speed - previous * state.params.damping).abs() < 1e-9);
			previous = speed;
		}
		assert!(previous < 1e-6);
	}

	#[test]
	fn lone_node_settles_at_center() {
		let mut state = single_node(DVec2::new(400.0, 300.0), DVec2::new(5.0, 0.0));
		let initial = state.nodes[0].velocity.length();
		for _ in 0..3000 {
			state.tick();
			assert!(state.nodes[0].velocity.length() <= initial);
		}
		assert!(state.nodes[0].velocity.length() < 1e-6);
		assert!(state.nodes[0].position.distance(state.center()) < 1e-3);
	}

	#[test]
	fn lone_node_at_center_at_rest_stays_put() {
		let mut state = single_node(DVec2::new(400.0, 300.0), DVec2::ZERO);
		state.tick();
		assert_eq!(state.nodes[0].position, DVec2::new(400.0, 300.0));
		assert_eq!(state.nodes[0].velocity, DVec2::ZERO);
	}

	#[test]
	fn coincident_nodes_separate() {
		let node = |id: &str| GraphNode {
			id: id.into(),
			label: id.into(),
			position: DVec2::new(200.0, 200.0),
			velocity: DVec2::ZERO,
			radius: 6.0,
			color: None,
		};
		let data = GraphData {
			nodes: vec![node("a"), node("b")],
			links: Vec::new(),
		};
		let mut state = GraphState::from_data(data, GraphVariant::Notes, 400.0, 400.0);
		state.tick();

		let (a, b) = (&state.nodes[0], &state.nodes[1]);
		assert!(a.position.is_finite() && b.position.is_finite());
		assert!(a.position.distance(b.position) > 0.0);
	}

	#[test]
	fn springs_pull_linked_nodes_together() {
		let node = |id: &str, x: f64| GraphNode {
			id: id.into(),
			label: id.into(),
			position: DVec2::new(x, 300.0),
			velocity: DVec2::ZERO,
			radius: 6.0,
			color: None,
		};
		let data = GraphData {
			nodes: vec![node("a", 100.0), node("b", 700.0)],
			links: vec![GraphLink {
				source: 0,
				target: 1,
			}],
		};
		let mut state = GraphState::from_data(data, GraphVariant::Notes, 800.0, 600.0);
		state.params.center_strength = 0.0;
		state.tick();

		assert!(state.nodes[0].velocity.x > 0.0);
		assert!(state.nodes[1].velocity.x < 0.0);
		assert!((state.nodes[0].velocity.x + state.nodes[1].velocity.x).abs() < 1e-9);
	}

	#[test]
	fn pointer_pushes_tags_away() {
		let mut rng = SmallRng::seed_from_u64(3);
		let mut state = GraphState::new(&sample_tags(1), GraphVariant::Tags, 800.0, 600.0, &mut rng);
		state.params.center_strength = 0.0;
		state.nodes[0].position = DVec2::new(400.0, 300.0);
		state.pointer = Some(DVec2::new(380.0, 300.0));
		state.tick();

		assert!(state.nodes[0].velocity.x > 0.0);
		assert!(state.nodes[0].position.x > 400.0);
	}

	#[test]
	fn tag_walls_bounce_note_walls_absorb() {
		let mut rng = SmallRng::seed_from_u64(4);
		let mut tags = GraphState::new(&sample_tags(1), GraphVariant::Tags, 800.0, 600.0, &mut rng);
		tags.params.center_strength = 0.0;
		let r = tags.nodes[0].radius;
		tags.nodes[0].position = DVec2::new(800.0 - r - 1.0, 300.0);
		tags.nodes[0].velocity = DVec2::new(10.0, 0.0);
		tags.tick();
		assert_eq!(tags.nodes[0].position.x, 800.0 - r);
		assert!(tags.nodes[0].velocity.x < 0.0);

		let mut notes = single_node(DVec2::new(800.0 - 7.0, 300.0), DVec2::new(10.0, 0.0));
		notes.params.center_strength = 0.0;
		notes.tick();
		assert_eq!(notes.nodes[0].position.x, 800.0 - 6.0);
		assert!(notes.nodes[0].velocity.x > 0.0);
	}

	#[test]
	fn corrupted_node_is_recovered_without_spreading() {
		let mut rng = SmallRng::seed_from_u64(5);
		let mut state = GraphState::new(&sample_notes(10), GraphVariant::Notes, 800.0, 600.0, &mut rng);
		state.nodes[3].position = DVec2::new(f64::NAN, 10.0);
		state.nodes[4].velocity = DVec2::new(f64::INFINITY, 0.0);
		for tick in 0..50 {
			state.tick();
			assert!(
				state
					.nodes
					.iter()
					.all(|n| n.position.is_finite() && n.velocity.is_finite())
			);
			assert_in_bounds(&state, tick);
		}
	}

	#[test]
	fn resize_reclamps_on_next_tick() {
		let mut rng = SmallRng::seed_from_u64(6);
		let mut state = GraphState::new(&sample_notes(20), GraphVariant::Notes, 800.0, 600.0, &mut rng);
		state.tick();
		state.resize(200.0, 150.0);
		assert_eq!(state.center(), DVec2::new(100.0, 75.0));
		state.tick();
		assert_in_bounds(&state, 1);
	}

	#[test]
	fn invalid_resize_is_ignored() {
		let mut state = single_node(DVec2::new(10.0, 10.0), DVec2::ZERO);
		state.resize(f64::NAN, 100.0);
		state.resize(-5.0, 100.0);
		assert_eq!((state.width, state.height), (800.0, 600.0));
	}

	#[test]
	fn tiny_canvas_pins_nodes_to_middle() {
		let mut state = single_node(DVec2::new(3.0, 3.0), DVec2::new(1.0, 1.0));
		state.resize(4.0, 4.0);
		state.tick();
		assert_eq!(state.nodes[0].position, DVec2::new(2.0, 2.0));
	}

	#[test]
	fn empty_graph_tick_is_noop() {
		let mut rng = SmallRng::seed_from_u64(7);
		let mut state = GraphState::new(&[], GraphVariant::Tags, 800.0, 600.0, &mut rng);
		state.tick();
		assert!(state.nodes.is_empty());
		assert_eq!(state.node_at(DVec2::new(1.0, 1.0)), None);
	}

	#[test]
	fn hit_test_exact_position_and_miss() {
		let mut rng = SmallRng::seed_from_u64(8);
		let mut state = GraphState::new(&sample_notes(15), GraphVariant::Notes, 800.0, 600.0, &mut rng);
		for _ in 0..30 {
			state.tick();
		}
		for idx in 0..state.nodes.len() {
			let at = state.nodes[idx].position;
			let found = state.node_at(at).expect("node under its own position");
			assert!(found <= idx, "an earlier overlapping node wins ties");
			assert!(state.nodes[found].position.distance(at) <= state.hit_radius(found));
		}
		assert_eq!(state.node_at(DVec2::new(-1000.0, -1000.0)), None);
	}

	#[test]
	fn rebuild_replaces_nodes_and_clears_hover() {
		let mut rng = SmallRng::seed_from_u64(9);
		let mut state = GraphState::new(&sample_notes(5), GraphVariant::Notes, 800.0, 600.0, &mut rng);
		state.set_hover(Some(2));
		state.rebuild(&sample_notes(3), &mut rng);
		assert_eq!(state.nodes.len(), 3);
		assert_eq!(state.hovered, None);
	}

	#[test]
	fn neighbors_follow_links_both_ways() {
		let records = vec![
			Record::new("a", "A").with_content("[[B]]"),
			Record::new("b", "B"),
			Record::new("c", "C").with_content("[[A]]"),
		];
		let mut rng = SmallRng::seed_from_u64(10);
		let state = GraphState::new(&records, GraphVariant::Notes, 800.0, 600.0, &mut rng);
		let mut around_a: Vec<usize> = state.neighbors(0).collect();
		around_a.sort();
		assert_eq!(around_a, vec![1, 2]);
		assert_eq!(state.neighbors(1).collect::<Vec<_>>(), vec![0]);
	}
}
