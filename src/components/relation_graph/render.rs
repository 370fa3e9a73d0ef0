//! Render pass, written against [`Surface`] so it runs without a browser.

use glam::DVec2;

use super::state::GraphState;
use super::types::GraphVariant;

pub const BACKGROUND: &str = "#1a1a2e";
const NOTE_COLOR: &str = "#64b4ff";
const AMBIENT_DISTANCE: f64 = 120.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CircleStyle<'a> {
	Fill(&'a str),
	Stroke { color: &'a str, width: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle<'a> {
	pub color: &'a str,
	pub font: &'a str,
	pub centered: bool,
}

/// The drawing operations the render pass needs from a 2D surface.
pub trait Surface {
	fn clear(&mut self, width: f64, height: f64);
	fn draw_line(&mut self, from: DVec2, to: DVec2, color: &str, width: f64);
	fn draw_circle(&mut self, center: DVec2, radius: f64, style: CircleStyle<'_>);
	fn draw_text(&mut self, text: &str, at: DVec2, style: TextStyle<'_>);
}

/// Draws one frame: ambient texture (tags), links, nodes, then labels.
pub fn render<S: Surface + ?Sized>(state: &GraphState, selected: &[String], surface: &mut S) {
	surface.clear(state.width, state.height);
	if state.nodes.is_empty() {
		return;
	}
	if state.variant == GraphVariant::Tags {
		draw_ambient(state, surface);
	}
	draw_links(state, surface);
	draw_nodes(state, selected, surface);
	draw_labels(state, selected, surface);
}

fn is_selected(selected: &[String], id: &str) -> bool {
	selected.iter().any(|s| s == id)
}

fn draw_ambient<S: Surface + ?Sized>(state: &GraphState, surface: &mut S) {
	for (i, a) in state.nodes.iter().enumerate() {
		for b in &state.nodes[i + 1..] {
			let distance = a.position.distance(b.position);
			if distance < AMBIENT_DISTANCE {
				let alpha = (1.0 - distance / AMBIENT_DISTANCE) * 0.15;
				surface.draw_line(
					a.position,
					b.position,
					&format!("rgba(255, 255, 255, {alpha:.3})"),
					0.5,
				);
			}
		}
	}
}

fn draw_links<S: Surface + ?Sized>(state: &GraphState, surface: &mut S) {
	for link in &state.links {
		let (Some(a), Some(b)) = (state.nodes.get(link.source), state.nodes.get(link.target))
		else {
			continue;
		};
		let touches_hover = state.is_hovered(link.source) || state.is_hovered(link.target);
		let (color, width) = if touches_hover {
			("rgba(100, 180, 255, 0.9)", 2.0)
		} else {
			("rgba(100, 180, 255, 0.4)", 1.0)
		};
		surface.draw_line(a.position, b.position, color, width);
	}
}

fn draw_nodes<S: Surface + ?Sized>(state: &GraphState, selected: &[String], surface: &mut S) {
	for (idx, node) in state.nodes.iter().enumerate() {
		let color = node.color.unwrap_or(NOTE_COLOR);
		let active = is_selected(selected, &node.id);

		if active {
			surface.draw_circle(
				node.position,
				node.radius * 1.8,
				CircleStyle::Fill("rgba(255, 255, 255, 0.25)"),
			);
		}
		surface.draw_circle(node.position, node.radius, CircleStyle::Fill(color));
		if active || state.is_hovered(idx) {
			surface.draw_circle(
				node.position,
				node.radius + 2.0,
				CircleStyle::Stroke {
					color: "white",
					width: if active { 2.0 } else { 1.0 },
				},
			);
		}
	}
}

fn draw_labels<S: Surface + ?Sized>(state: &GraphState, selected: &[String], surface: &mut S) {
	let lit: Vec<usize> = state
		.hovered
		.map(|h| state.neighbors(h).chain([h]).collect())
		.unwrap_or_default();
	for (idx, node) in state.nodes.iter().enumerate() {
		let active = is_selected(selected, &node.id);
		let font = if active {
			"bold 11px sans-serif"
		} else {
			"10px sans-serif"
		};
		let color = if active || lit.contains(&idx) {
			"white"
		} else {
			"rgba(255, 255, 255, 0.8)"
		};
		let (at, centered) = match state.variant {
			GraphVariant::Notes => (node.position + DVec2::new(node.radius + 3.0, 3.0), false),
			GraphVariant::Tags => (node.position + DVec2::new(0.0, 4.0), true),
		};
		surface.draw_text(
			&node.label,
			at,
			TextStyle {
				color,
				font,
				centered,
			},
		);
	}
}
