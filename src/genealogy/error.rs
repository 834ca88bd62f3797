//! Error and data-quality warning types.

use thiserror::Error;

use super::entity::{EntityId, RelationshipKind};

/// Hard failures surfaced to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenealogyError {
	/// Fetching the entity graph failed. Moves the controller to `error`.
	#[error("Failed to load entities: {0}")]
	DataFetch(String),

	/// Image serialization failed. Does not affect visualization state.
	#[error("Export failed: {0}")]
	Export(String),
}

/// Convenient Result type using GenealogyError
pub type Result<T> = std::result::Result<T, GenealogyError>;

/// Data-quality problems absorbed during a build.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataWarning {
	/// A relationship target does not resolve to a known entity.
	#[error("Dangling {kind} reference from '{source_id}' to unknown entity '{target_id}'")]
	DanglingReference {
		/// Entity owning the relationship.
		source_id: EntityId,
		/// Relationship type.
		kind: RelationshipKind,
		/// The unresolved id.
		target_id: EntityId,
	},

	/// A relationship carries a tag outside the known set.
	#[error("Unknown relationship type '{kind}' on '{source_id}'")]
	UnknownRelationship {
		/// Entity owning the relationship.
		source_id: EntityId,
		/// The unrecognized tag.
		kind: String,
	},

	/// Two entities share an id; the later one was dropped.
	#[error("Duplicate entity id '{id}'")]
	DuplicateEntity {
		/// The repeated id.
		id: EntityId,
	},
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_display() {
		let err = GenealogyError::DataFetch("network down".to_string());
		assert!(err.to_string().contains("Failed to load entities"));
		assert!(err.to_string().contains("network down"));
	}

	#[test]
	fn test_dangling_display() {
		let warning = DataWarning::DanglingReference {
			source_id: "zeus".into(),
			kind: RelationshipKind::Parent,
			target_id: "ghost".into(),
		};
		assert_eq!(
			warning.to_string(),
			"Dangling parent reference from 'zeus' to unknown entity 'ghost'"
		);
	}
}
