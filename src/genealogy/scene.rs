//! Renderer adapter: flattens a laid-out tree into nodes, edges and style hints.

use super::entity::EntityId;
use super::layout::LayoutExtent;
use super::tree::TreeNode;

/// Collapse indicator drawn next to a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollapseGlyph {
	/// Node is collapsed; clicking reveals children.
	Expand,
	/// Node is expanded; clicking hides children.
	Collapse,
}

impl CollapseGlyph {
	/// Character drawn on the canvas.
	pub fn symbol(self) -> &'static str {
		match self {
			Self::Expand => "+",
			Self::Collapse => "\u{2212}",
		}
	}
}

/// A positioned node as handed to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
	/// Path of entity ids from the root; stable across rebuilds.
	pub key: String,
	/// Backing entity, `None` for the virtual root.
	pub entity_id: Option<EntityId>,
	/// Display label.
	pub label: String,
	/// Level below the root, used for coloring.
	pub depth: usize,
	/// Canvas x.
	pub x: f64,
	/// Canvas y.
	pub y: f64,
	/// Collapse indicator, absent for leaves.
	pub glyph: Option<CollapseGlyph>,
	/// Revisit of an ancestor on this path.
	pub cycle_closure: bool,
	/// Number of hidden children while collapsed.
	pub hidden_children: usize,
}

impl SceneNode {
	/// True for the synthetic root.
	pub fn is_virtual(&self) -> bool {
		self.entity_id.is_none()
	}
}

/// Everything the renderer draws for one state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderScene {
	/// Nodes in pre-order; edges index into this list.
	pub nodes: Vec<SceneNode>,
	/// `(parent, child)` index pairs.
	pub edges: Vec<(usize, usize)>,
	/// Bounds of the laid-out tree.
	pub extent: LayoutExtent,
}

const VIRTUAL_KEY: &str = "~";

impl RenderScene {
	/// Flattens the visible part of a laid-out tree.
	pub fn from_tree(root: &TreeNode, extent: LayoutExtent) -> Self {
		let mut scene = Self {
			extent,
			..Self::default()
		};
		scene.push(root, None, "");
		scene
	}

	fn push(&mut self, node: &TreeNode, parent: Option<usize>, parent_key: &str) {
		let key = match node.entity_id() {
			Some(id) if parent_key.is_empty() => id.to_string(),
			Some(id) => format!("{parent_key}/{id}"),
			None => VIRTUAL_KEY.to_string(),
		};
		let glyph = if node.is_collapsed() {
			Some(CollapseGlyph::Expand)
		} else if !node.children.is_empty() && !node.is_virtual() {
			Some(CollapseGlyph::Collapse)
		} else {
			None
		};

		let idx = self.nodes.len();
		self.nodes.push(SceneNode {
			key: key.clone(),
			entity_id: node.entity_id().map(str::to_string),
			label: node.label().to_string(),
			depth: node.depth,
			x: node.x.unwrap_or_default(),
			y: node.y.unwrap_or_default(),
			glyph,
			cycle_closure: node.is_cycle_closure,
			hidden_children: node.collapsed_children.len(),
		});
		if let Some(parent) = parent {
			self.edges.push((parent, idx));
		}
		let prefix = if node.is_virtual() { "" } else { key.as_str() };
		for child in &node.children {
			self.push(child, Some(idx), prefix);
		}
	}

	/// No entity is visible.
	pub fn is_empty(&self) -> bool {
		self.nodes.iter().all(SceneNode::is_virtual)
	}

	/// Index of the parent of a node, if any.
	pub fn parent_of(&self, idx: usize) -> Option<usize> {
		self.edges
			.iter()
			.find(|&&(_, child)| child == idx)
			.map(|&(parent, _)| parent)
	}
}
