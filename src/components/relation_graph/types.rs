use glam::DVec2;

use super::params::SimulationParams;

/// A content record supplied by the host page: a note or a community tag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
	pub id: String,
	pub title: String,
	pub content: Option<String>,
	/// Popularity metric (posts using a tag); drives the tag-graph radius.
	pub weight: Option<f64>,
}

impl Record {
	pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			title: title.into(),
			..Self::default()
		}
	}

	pub fn with_content(mut self, content: impl Into<String>) -> Self {
		self.content = Some(content.into());
		self
	}

	pub fn with_weight(mut self, weight: f64) -> Self {
		self.weight = Some(weight);
		self
	}
}

/// Which flavour of graph is being simulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphVariant {
	/// Notes knowledge-graph: springs along wiki-links, absorbing walls,
	/// context menu on click.
	Notes,
	/// Community tag-graph: overlap repulsion, pointer repulsion, bouncing
	/// walls, toggle on click.
	Tags,
}

impl GraphVariant {
	pub fn params(self) -> SimulationParams {
		match self {
			GraphVariant::Notes => SimulationParams::notes(),
			GraphVariant::Tags => SimulationParams::tags(),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	pub position: DVec2,
	pub velocity: DVec2,
	pub radius: f64,
	pub color: Option<&'static str>,
}

/// Directed link between two nodes, stored as indices into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GraphLink {
	pub source: usize,
	pub target: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

#[cfg(test)]
impl GraphData {
	/// Links resolved back to node ids, in derivation order.
	pub fn link_ids(&self) -> Vec<(&str, &str)> {
		self.links
			.iter()
			.map(|link| {
				(
					self.nodes[link.source].id.as_str(),
					self.nodes[link.target].id.as_str(),
				)
			})
			.collect()
	}
}
