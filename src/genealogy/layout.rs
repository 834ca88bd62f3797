//! Deterministic top-down tree layout.
//!
//! Visible leaves take consecutive slots `sibling_spacing` apart in pre-order;
//! a parent sits midway between its first and last child. Depth maps to a
//! fixed level spacing. Only the current tree shape and canvas size feed the
//! result.

use super::tree::TreeNode;

/// Spacing parameters, in canvas pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	/// Distance between neighbouring leaf slots.
	pub sibling_spacing: f64,
	/// Distance between depth levels.
	pub level_spacing: f64,
	/// Minimum gap to the canvas edge.
	pub margin: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			sibling_spacing: 140.0,
			level_spacing: 110.0,
			margin: 40.0,
		}
	}
}

/// Bounding box of the positioned nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutExtent {
	/// Left-most node center.
	pub min_x: f64,
	/// Top-most node center.
	pub min_y: f64,
	/// Right-most node center.
	pub max_x: f64,
	/// Bottom-most node center.
	pub max_y: f64,
}

impl LayoutExtent {
	/// Horizontal span.
	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	/// Vertical span.
	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	/// Center point.
	pub fn center(&self) -> (f64, f64) {
		(
			(self.min_x + self.max_x) / 2.0,
			(self.min_y + self.max_y) / 2.0,
		)
	}
}

/// Assigns coordinates to visible tree nodes.
#[derive(Clone, Debug, Default)]
pub struct LayoutEngine {
	config: LayoutConfig,
}

impl LayoutEngine {
	/// Engine with explicit spacing.
	pub fn new(config: LayoutConfig) -> Self {
		Self { config }
	}

	/// Positions every node reachable through `children`. Hidden
	/// `collapsed_children` are left without coordinates. The tree is centered
	/// on the canvas when it fits, otherwise anchored at the margin.
	pub fn layout(&self, root: &mut TreeNode, canvas_width: f64, canvas_height: f64) -> LayoutExtent {
		let mut next_slot = 0.0;
		let mut max_depth = 0;
		self.place(root, 0, &mut next_slot, &mut max_depth);

		let tree_width = (next_slot - self.config.sibling_spacing).max(0.0);
		let tree_height = max_depth as f64 * self.config.level_spacing;
		let dx = ((canvas_width - tree_width) / 2.0).max(self.config.margin);
		let dy = ((canvas_height - tree_height) / 2.0).max(self.config.margin);
		shift(root, dx, dy);

		LayoutExtent {
			min_x: dx,
			min_y: dy,
			max_x: dx + tree_width,
			max_y: dy + tree_height,
		}
	}

	fn place(&self, node: &mut TreeNode, depth: usize, next_slot: &mut f64, max_depth: &mut usize) -> f64 {
		node.depth = depth;
		*max_depth = (*max_depth).max(depth);
		for hidden in &mut node.collapsed_children {
			clear(hidden);
		}

		let x = if node.children.is_empty() {
			let x = *next_slot;
			*next_slot += self.config.sibling_spacing;
			x
		} else {
			let xs: Vec<f64> = node
				.children
				.iter_mut()
				.map(|child| self.place(child, depth + 1, next_slot, max_depth))
				.collect();
			(xs[0] + xs[xs.len() - 1]) / 2.0
		};

		node.x = Some(x);
		node.y = Some(depth as f64 * self.config.level_spacing);
		x
	}
}

fn shift(node: &mut TreeNode, dx: f64, dy: f64) {
	node.x = node.x.map(|x| x + dx);
	node.y = node.y.map(|y| y + dy);
	for child in &mut node.children {
		shift(child, dx, dy);
	}
}

fn clear(node: &mut TreeNode) {
	node.x = None;
	node.y = None;
	for child in node.children.iter_mut().chain(node.collapsed_children.iter_mut()) {
		clear(child);
	}
}

/// Lays the tree out with default spacing.
pub fn layout(root: &mut TreeNode, canvas_width: f64, canvas_height: f64) -> LayoutExtent {
	LayoutEngine::default().layout(root, canvas_width, canvas_height)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::genealogy::collapse::CollapseState;
	use crate::genealogy::entity::{Entity, EntityGraph, MythologyFilter, RelationshipKind::Parent};
	use crate::genealogy::lineage::{Lineage, build};

	fn graph() -> EntityGraph {
		EntityGraph::new(vec![
			Entity::new("a", "A", "deity", "greek"),
			Entity::new("b", "B", "deity", "greek").with(Parent, "a"),
			Entity::new("c", "C", "deity", "greek").with(Parent, "a"),
			Entity::new("d", "D", "deity", "greek").with(Parent, "b"),
			Entity::new("e", "E", "deity", "greek").with(Parent, "b"),
			Entity::new("f", "F", "deity", "greek"),
		])
	}

	fn positions(root: &TreeNode) -> Vec<(Option<&str>, f64, f64)> {
		root.visible()
			.into_iter()
			.map(|n| (n.entity_id(), n.x.unwrap(), n.y.unwrap()))
			.collect()
	}

	#[test]
	fn test_depth_drives_vertical_position() {
		let graph = graph();
		let mut root = build(&graph, &MythologyFilter::All, &CollapseState::new());
		layout(&mut root, 800.0, 600.0);

		for node in root.visible() {
			let expected = node.depth as f64 * 110.0;
			assert!((node.y.unwrap() - root.y.unwrap() - expected).abs() < 1e-9);
		}
	}

	#[test]
	fn test_siblings_do_not_overlap() {
		let graph = graph();
		let mut root = build(&graph, &MythologyFilter::All, &CollapseState::new());
		layout(&mut root, 800.0, 600.0);

		let mut by_depth: Vec<Vec<f64>> = Vec::new();
		for node in root.visible() {
			if by_depth.len() <= node.depth {
				by_depth.resize(node.depth + 1, Vec::new());
			}
			by_depth[node.depth].push(node.x.unwrap());
		}
		for row in by_depth {
			for pair in row.windows(2) {
				assert!(pair[1] - pair[0] >= 140.0 - 1e-9, "{:?}", pair);
			}
		}
	}

	#[test]
	fn test_parent_centered_over_children() {
		let graph = graph();
		let mut root = build(&graph, &MythologyFilter::All, &CollapseState::new());
		layout(&mut root, 800.0, 600.0);

		let a = &root.children[0];
		let b = &a.children[0];
		assert_eq!(b.x.unwrap(), (b.children[0].x.unwrap() + b.children[1].x.unwrap()) / 2.0);
		assert_eq!(a.x.unwrap(), (b.x.unwrap() + a.children[1].x.unwrap()) / 2.0);
	}

	#[test]
	fn test_collapsed_children_unpositioned() {
		let graph = graph();
		let mut collapse = CollapseState::new();
		collapse.toggle("b");
		let mut root = build(&graph, &MythologyFilter::All, &collapse);
		layout(&mut root, 800.0, 600.0);

		let b = &root.children[0].children[0];
		assert!(b.x.is_some());
		assert!(b.collapsed_children.iter().all(|n| n.x.is_none() && n.y.is_none()));
	}

	#[test]
	fn test_layout_independent_of_history() {
		let graph = graph();
		let lineage = Lineage::new(&graph, &MythologyFilter::All);

		let mut fresh = lineage.build(&graph, &CollapseState::new());
		layout(&mut fresh, 800.0, 600.0);

		let mut collapse = CollapseState::new();
		collapse.toggle("a");
		collapse.set_all(true);
		collapse.toggle("b");
		collapse.set_all(false);
		let mut replayed = lineage.build(&graph, &collapse);
		layout(&mut replayed, 800.0, 600.0);

		assert_eq!(positions(&fresh), positions(&replayed));
	}

	#[test]
	fn test_wide_tree_anchored_at_margin() {
		let graph = EntityGraph::new(
			(0..20)
				.map(|i| Entity::new(format!("e{i:02}"), format!("E{i:02}"), "deity", "greek"))
				.collect(),
		);
		let mut root = build(&graph, &MythologyFilter::All, &CollapseState::new());
		let extent = layout(&mut root, 400.0, 300.0);

		assert_eq!(extent.min_x, 40.0);
		assert_eq!(root.children[0].x, Some(40.0));
		assert_eq!(extent.width(), 19.0 * 140.0);
	}

	#[test]
	fn test_empty_root_centered() {
		let mut root = TreeNode::virtual_root(Vec::new());
		let extent = layout(&mut root, 800.0, 600.0);
		assert_eq!(root.x, Some(400.0));
		assert_eq!(root.y, Some(300.0));
		assert_eq!(extent.width(), 0.0);
	}
}
