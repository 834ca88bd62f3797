//! Entity data source boundary.

use std::future::Future;

use log::info;

use super::entity::{Entity, MythologyFilter};
use super::error::{GenealogyError, Result};

/// Asynchronous provider of the entity graph.
pub trait EntitySource {
	/// Fetches every entity passing the filter, relationships embedded.
	fn fetch(&self, filter: &MythologyFilter) -> impl Future<Output = Result<Vec<Entity>>>;
}

/// JSON-backed source over a dataset held in memory.
#[derive(Clone, Debug)]
pub struct BundledSource {
	json: &'static str,
}

impl BundledSource {
	/// Source over an arbitrary JSON array of entities.
	pub fn new(json: &'static str) -> Self {
		Self { json }
	}

	/// The sample pantheon shipped with the app.
	pub fn pantheon() -> Self {
		Self::new(include_str!("../../data/pantheon.json"))
	}

	/// Parses and filters synchronously.
	pub fn load(&self, filter: &MythologyFilter) -> Result<Vec<Entity>> {
		let entities: Vec<Entity> = serde_json::from_str(self.json)
			.map_err(|e| GenealogyError::DataFetch(format!("Invalid entity dataset: {}", e)))?;
		let entities: Vec<Entity> = entities.into_iter().filter(|e| filter.matches(e)).collect();
		info!("Loaded {} entities for filter '{}'", entities.len(), filter);
		Ok(entities)
	}
}

impl EntitySource for BundledSource {
	fn fetch(&self, filter: &MythologyFilter) -> impl Future<Output = Result<Vec<Entity>>> {
		let result = self.load(filter);
		async move { result }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::genealogy::collapse::CollapseState;
	use crate::genealogy::entity::EntityGraph;
	use crate::genealogy::lineage::Lineage;

	#[test]
	fn test_pantheon_parses_cleanly() {
		let entities = BundledSource::pantheon().load(&MythologyFilter::All).unwrap();
		assert!(!entities.is_empty());

		let graph = EntityGraph::new(entities);
		assert!(graph.warnings().is_empty());
		let lineage = Lineage::new(&graph, &MythologyFilter::All);
		assert!(lineage.warnings().is_empty(), "{:?}", lineage.warnings());

		let root = lineage.build(&graph, &CollapseState::new());
		assert!(root.visible().iter().any(|n| n.is_cycle_closure));
	}

	#[test]
	fn test_filtered_load() {
		let entities = BundledSource::pantheon()
			.load(&MythologyFilter::Only("norse".into()))
			.unwrap();
		assert!(!entities.is_empty());
		assert!(entities.iter().all(|e| e.mythology == "norse"));
	}

	#[test]
	fn test_invalid_json_is_fetch_error() {
		let err = BundledSource::new("{not json").load(&MythologyFilter::All).unwrap_err();
		assert!(matches!(err, GenealogyError::DataFetch(_)));
	}
}
