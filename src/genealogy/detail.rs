//! Detail-view model for a single entity.

use std::sync::Arc;

use super::entity::{Entity, EntityGraph, EntityId, RelationshipKind};

/// A relationship target resolved for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedEntity {
	/// Target id.
	pub id: EntityId,
	/// Target name, or the raw id when it does not resolve.
	pub name: String,
	/// Whether the target exists in the loaded graph.
	pub resolved: bool,
}

/// Entity detail side channel opened by double-click.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailView {
	/// The entity being shown.
	pub entity: Arc<Entity>,
	/// Relationships grouped by kind, known kinds only, in display order.
	pub groups: Vec<(RelationshipKind, Vec<RelatedEntity>)>,
}

impl DetailView {
	/// Resolves the entity's relationships against the loaded graph.
	pub fn new(entity: Arc<Entity>, graph: &EntityGraph) -> Self {
		let groups = RelationshipKind::KNOWN
			.into_iter()
			.filter_map(|kind| {
				let related: Vec<RelatedEntity> = entity
					.relationships
					.iter()
					.filter(|rel| rel.kind == kind)
					.map(|rel| match graph.get(&rel.target_id) {
						Some(target) => RelatedEntity {
							id: target.id.clone(),
							name: target.name.clone(),
							resolved: true,
						},
						None => RelatedEntity {
							id: rel.target_id.clone(),
							name: rel.target_id.clone(),
							resolved: false,
						},
					})
					.collect();
				(!related.is_empty()).then_some((kind, related))
			})
			.collect();
		Self { entity, groups }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use RelationshipKind::*;

	#[test]
	fn test_groups_resolved_in_kind_order() {
		let graph = EntityGraph::new(vec![
			Entity::new("zeus", "Zeus", "deity", "greek")
				.with(Consort, "hera")
				.with(Parent, "cronus")
				.with(Consort, "leto")
				.with(Enemy, "typhon"),
			Entity::new("hera", "Hera", "deity", "greek"),
			Entity::new("cronus", "Cronus", "titan", "greek"),
		]);
		let zeus = graph.get("zeus").unwrap().clone();
		let view = DetailView::new(zeus, &graph);

		let kinds: Vec<_> = view.groups.iter().map(|(k, _)| k.clone()).collect();
		assert_eq!(kinds, vec![Parent, Consort, Enemy]);
		assert_eq!(view.groups[0].1[0].name, "Cronus");
		assert_eq!(view.groups[1].1.len(), 2);
		assert!(view.groups[1].1[0].resolved);
		assert!(!view.groups[1].1[1].resolved);
		assert_eq!(view.groups[2].1[0].name, "typhon");
	}
}
