/// How two nodes push each other apart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Repulsion {
	/// `strength / distance²` while closer than `min_distance`.
	InverseSquare { strength: f64, min_distance: f64 },
	/// `(r_a + r_b + padding - distance) * strength` while overlapping.
	Overlap { padding: f64, strength: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
	pub rest_length: f64,
	pub stiffness: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerRepulsion {
	pub radius: f64,
	pub strength: f64,
}

/// What happens to a node that hits the canvas edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Walls {
	/// Position clamped, velocity kept.
	Absorb,
	/// Position clamped, velocity component on the clamped axis reflected.
	Bounce,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationParams {
	pub repulsion: Repulsion,
	pub center_strength: f64,
	pub spring: Option<Spring>,
	pub pointer: Option<PointerRepulsion>,
	pub damping: f64,
	/// Speed cap applied after damping.
	pub max_speed: f64,
	pub walls: Walls,
	/// Fixed click radius; `None` hit-tests against each node's own radius.
	pub hit_radius: Option<f64>,
	/// Radius given to every node when the builder doesn't size them.
	pub node_radius: f64,
}

pub const NODE_RADIUS: f64 = 6.0;
pub const HIT_RADIUS: f64 = 12.0;
pub const TAG_RADIUS_MIN: f64 = 20.0;
pub const TAG_RADIUS_MAX: f64 = 45.0;

impl SimulationParams {
	pub fn notes() -> Self {
		Self {
			repulsion: Repulsion::InverseSquare {
				strength: 1000.0,
				min_distance: 150.0,
			},
			center_strength: 0.001,
			spring: Some(Spring {
				rest_length: 100.0,
				stiffness: 0.02,
			}),
			pointer: None,
			damping: 0.9,
			max_speed: 50.0,
			walls: Walls::Absorb,
			hit_radius: Some(HIT_RADIUS),
			node_radius: NODE_RADIUS,
		}
	}

	pub fn tags() -> Self {
		Self {
			repulsion: Repulsion::Overlap {
				padding: 10.0,
				strength: 0.05,
			},
			center_strength: 0.0005,
			spring: None,
			pointer: Some(PointerRepulsion {
				radius: 100.0,
				strength: 1.5,
			}),
			damping: 0.95,
			max_speed: 30.0,
			walls: Walls::Bounce,
			hit_radius: None,
			node_radius: TAG_RADIUS_MIN,
		}
	}
}
