//! Hierarchy nodes produced by the builder.

use std::sync::Arc;

use super::entity::Entity;

/// One occurrence of an entity in the rendered hierarchy.
///
/// Rebuilt from scratch on every state change. `children` and
/// `collapsed_children` are never both non-empty.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
	/// Backing entity, `None` for the virtual root.
	pub entity: Option<Arc<Entity>>,
	/// Levels below the root.
	pub depth: usize,
	/// Visible children, in discovery order.
	pub children: Vec<TreeNode>,
	/// Children retained while this entity is collapsed.
	pub collapsed_children: Vec<TreeNode>,
	/// This occurrence revisits an ancestor on its own path.
	pub is_cycle_closure: bool,
	/// Horizontal position, set by the layout engine.
	pub x: Option<f64>,
	/// Vertical position, set by the layout engine.
	pub y: Option<f64>,
}

impl TreeNode {
	pub(crate) fn new(entity: Option<Arc<Entity>>, depth: usize) -> Self {
		Self {
			entity,
			depth,
			children: Vec::new(),
			collapsed_children: Vec::new(),
			is_cycle_closure: false,
			x: None,
			y: None,
		}
	}

	/// Synthetic common parent of several roots.
	pub fn virtual_root(children: Vec<TreeNode>) -> Self {
		Self {
			children,
			..Self::new(None, 0)
		}
	}

	/// True for the synthetic root.
	pub fn is_virtual(&self) -> bool {
		self.entity.is_none()
	}

	/// Id of the backing entity.
	pub fn entity_id(&self) -> Option<&str> {
		self.entity.as_deref().map(|e| e.id.as_str())
	}

	/// Display label.
	pub fn label(&self) -> &str {
		self.entity.as_deref().map(|e| e.name.as_str()).unwrap_or("")
	}

	/// Has hidden children.
	pub fn is_collapsed(&self) -> bool {
		!self.collapsed_children.is_empty()
	}

	/// Visible nodes in pre-order (hidden `collapsed_children` are skipped).
	pub fn visible(&self) -> Vec<&TreeNode> {
		let mut out = Vec::new();
		let mut stack = vec![self];
		while let Some(node) = stack.pop() {
			out.push(node);
			stack.extend(node.children.iter().rev());
		}
		out
	}

	/// Every node, including hidden ones, in pre-order.
	pub fn all(&self) -> Vec<&TreeNode> {
		let mut out = Vec::new();
		let mut stack = vec![self];
		while let Some(node) = stack.pop() {
			out.push(node);
			stack.extend(node.collapsed_children.iter().rev());
			stack.extend(node.children.iter().rev());
		}
		out
	}

	/// Visible occurrences of an entity.
	#[cfg(test)]
	pub fn occurrences(&self, id: &str) -> Vec<&TreeNode> {
		self.visible()
			.into_iter()
			.filter(|n| n.entity_id() == Some(id))
			.collect()
	}

	/// Structural fingerprint: entity ids, nesting and collapse/cycle flags.
	pub fn shape(&self) -> String {
		let mut out = String::new();
		self.write_shape(&mut out);
		out
	}

	fn write_shape(&self, out: &mut String) {
		out.push_str(self.entity_id().unwrap_or("*"));
		if self.is_cycle_closure {
			out.push('!');
		}
		if self.is_collapsed() {
			out.push('+');
		}
		if !self.children.is_empty() {
			out.push('(');
			for (i, child) in self.children.iter().enumerate() {
				if i > 0 {
					out.push(',');
				}
				child.write_shape(out);
			}
			out.push(')');
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn leaf(id: &str, depth: usize) -> TreeNode {
		TreeNode::new(Some(Arc::new(Entity::new(id, id, "deity", "greek"))), depth)
	}

	#[test]
	fn test_visible_skips_collapsed() {
		let mut a = leaf("a", 1);
		a.collapsed_children.push(leaf("c", 2));
		let root = TreeNode::virtual_root(vec![a, leaf("b", 1)]);

		let visible: Vec<_> = root.visible().iter().map(|n| n.entity_id()).collect();
		assert_eq!(visible, vec![None, Some("a"), Some("b")]);
		assert_eq!(root.all().len(), 4);
		assert_eq!(root.shape(), "*(a+,b)");
	}

	#[test]
	fn test_occurrences() {
		let mut a = leaf("a", 1);
		a.children.push(leaf("c", 2));
		let root = TreeNode::virtual_root(vec![a, leaf("c", 1)]);
		assert_eq!(root.occurrences("c").len(), 2);
		assert!(root.is_virtual());
		assert_eq!(root.label(), "");
	}
}
