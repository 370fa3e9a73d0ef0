//! Pointer handling: hover, click hit-testing and the notes context menu.

use glam::DVec2;
use log::debug;

use super::state::GraphState;
use super::types::GraphVariant;

/// Receives the semantic actions produced by clicks on the graph.
pub trait GraphHandler {
	fn node_open(&mut self, _id: &str) {}
	fn create_connection(&mut self, _source_id: &str) {}
	fn toggle(&mut self, _id: &str) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
	Open,
	CreateConnection,
}

/// Context menu opened on a node of the notes graph.
#[derive(Clone, Debug, PartialEq)]
pub struct ContextMenu {
	pub node_id: String,
	pub label: String,
	pub anchor: DVec2,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
	MenuOpened,
	Toggled(String),
	Missed,
}

#[derive(Clone, Debug, Default)]
pub struct InteractionState {
	pub menu: Option<ContextMenu>,
}

impl InteractionState {
	/// Records the canvas-local pointer position and the node under it.
	pub fn pointer_move(&mut self, graph: &mut GraphState, point: DVec2) {
		graph.pointer = Some(point);
		let hovered = graph.node_at(point);
		graph.set_hover(hovered);
	}

	pub fn pointer_leave(&mut self, graph: &mut GraphState) {
		graph.pointer = None;
		graph.set_hover(None);
	}

	pub fn click<H: GraphHandler + ?Sized>(
		&mut self,
		graph: &GraphState,
		point: DVec2,
		handler: &mut H,
	) -> ClickOutcome {
		let Some(idx) = graph.node_at(point) else {
			self.dismiss();
			return ClickOutcome::Missed;
		};
		let node = &graph.nodes[idx];
		match graph.variant {
			GraphVariant::Notes => {
				debug!("opening menu for note {}", node.id);
				self.menu = Some(ContextMenu {
					node_id: node.id.clone(),
					label: node.label.clone(),
					anchor: point,
				});
				ClickOutcome::MenuOpened
			}
			GraphVariant::Tags => {
				handler.toggle(&node.id);
				ClickOutcome::Toggled(node.id.clone())
			}
		}
	}

	/// Runs `action` for the node the menu was opened on and closes the menu.
	pub fn choose<H: GraphHandler + ?Sized>(&mut self, action: MenuAction, handler: &mut H) -> bool {
		let Some(menu) = self.menu.take() else {
			return false;
		};
		match action {
			MenuAction::Open => handler.node_open(&menu.node_id),
			MenuAction::CreateConnection => handler.create_connection(&menu.node_id),
		}
		true
	}

	pub fn dismiss(&mut self) {
		self.menu = None;
	}
}
