//! Entity-keyed expanded/collapsed memory that survives rebuilds.

use std::collections::HashMap;

use super::entity::EntityId;

/// Collapse state shared by every occurrence of an entity.
///
/// Bulk operations set a store-wide default and drop per-entity overrides;
/// `toggle` records an override relative to the current effective state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollapseState {
	default_collapsed: bool,
	overrides: HashMap<EntityId, bool>,
}

impl CollapseState {
	/// Everything expanded.
	pub fn new() -> Self {
		Self::default()
	}

	/// Effective state for an entity. Untouched entities follow the default.
	pub fn is_collapsed(&self, id: &str) -> bool {
		self.overrides
			.get(id)
			.copied()
			.unwrap_or(self.default_collapsed)
	}

	/// Flips one entity. Returns the new collapsed state.
	pub fn toggle(&mut self, id: &str) -> bool {
		let collapsed = !self.is_collapsed(id);
		if collapsed == self.default_collapsed {
			self.overrides.remove(id);
		} else {
			self.overrides.insert(id.to_string(), collapsed);
		}
		collapsed
	}

	/// Expand-all (`false`) or collapse-all (`true`).
	pub fn set_all(&mut self, collapsed: bool) {
		self.default_collapsed = collapsed;
		self.overrides.clear();
	}

	/// Back to all-expanded.
	pub fn reset(&mut self) {
		self.set_all(false);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_to_expanded() {
		let state = CollapseState::new();
		assert!(!state.is_collapsed("zeus"));
	}

	#[test]
	fn test_toggle_twice_restores_state() {
		let mut state = CollapseState::new();
		let before = state.clone();
		assert!(state.toggle("zeus"));
		assert!(state.is_collapsed("zeus"));
		assert!(!state.toggle("zeus"));
		assert_eq!(state, before);
	}

	#[test]
	fn test_set_all_then_toggle() {
		let mut state = CollapseState::new();
		state.toggle("hera");
		state.set_all(true);
		assert!(state.is_collapsed("zeus"));
		assert!(state.is_collapsed("hera"));
		assert!(!state.toggle("zeus"));
		assert!(!state.is_collapsed("zeus"));
		assert!(state.is_collapsed("hera"));
	}

	#[test]
	fn test_reset() {
		let mut state = CollapseState::new();
		state.set_all(true);
		state.toggle("zeus");
		state.reset();
		assert_eq!(state, CollapseState::new());
	}
}
