//! Entity data model and the id lookup table built once per load.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Serialize};

use super::error::DataWarning;

/// Identity of an entity as supplied by the data source.
pub type EntityId = String;

/// Typed relationship tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
	/// The target is a parent of the owning entity.
	Parent,
	/// The target is a child of the owning entity.
	Child,
	/// The target is a sibling of the owning entity.
	Sibling,
	/// The target is a consort of the owning entity.
	Consort,
	/// The target is an ally of the owning entity.
	Ally,
	/// The target is an enemy of the owning entity.
	Enemy,
	/// Any tag outside the known set. Skipped when building the hierarchy.
	#[serde(untagged)]
	Unknown(String),
}

impl RelationshipKind {
	/// Kinds shown in the detail view, in display order.
	pub const KNOWN: [RelationshipKind; 6] = [
		RelationshipKind::Parent,
		RelationshipKind::Child,
		RelationshipKind::Sibling,
		RelationshipKind::Consort,
		RelationshipKind::Ally,
		RelationshipKind::Enemy,
	];

	/// Lowercase tag as it appears in the dataset.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Parent => "parent",
			Self::Child => "child",
			Self::Sibling => "sibling",
			Self::Consort => "consort",
			Self::Ally => "ally",
			Self::Enemy => "enemy",
			Self::Unknown(tag) => tag,
		}
	}
}

impl fmt::Display for RelationshipKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A directed, typed edge from the owning entity to `target_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
	/// Edge type.
	#[serde(rename = "type")]
	pub kind: RelationshipKind,
	/// Id of the related entity. May not resolve.
	pub target_id: EntityId,
}

impl Relationship {
	/// Shorthand constructor.
	pub fn new(kind: RelationshipKind, target_id: impl Into<EntityId>) -> Self {
		Self {
			kind,
			target_id: target_id.into(),
		}
	}
}

/// A mythological subject.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
	/// Unique id.
	pub id: EntityId,
	/// Display name.
	pub name: String,
	/// Free-form category such as `deity`, `hero`, `creature` or `place`.
	#[serde(rename = "type")]
	pub kind: String,
	/// Mythology tag used for filtering.
	pub mythology: String,
	/// Short domain keywords.
	#[serde(default)]
	pub domain: Vec<String>,
	/// Long description.
	#[serde(default)]
	pub description: String,
	/// Ordered relationship list.
	#[serde(default)]
	pub relationships: Vec<Relationship>,
}

impl Entity {
	/// Creates an entity with no relationships.
	pub fn new(
		id: impl Into<EntityId>,
		name: impl Into<String>,
		kind: impl Into<String>,
		mythology: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			kind: kind.into(),
			mythology: mythology.into(),
			domain: Vec::new(),
			description: String::new(),
			relationships: Vec::new(),
		}
	}

	/// Appends a relationship, builder style.
	pub fn with(mut self, kind: RelationshipKind, target_id: impl Into<EntityId>) -> Self {
		self.relationships.push(Relationship::new(kind, target_id));
		self
	}
}

/// Which mythology the hierarchy is restricted to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MythologyFilter {
	/// Every loaded entity.
	#[default]
	All,
	/// Entities whose `mythology` equals the tag.
	Only(String),
}

impl MythologyFilter {
	/// Parses a selector value. `"all"` and the empty string select everything.
	pub fn parse(value: &str) -> Self {
		match value.trim() {
			"" | "all" => Self::All,
			tag => Self::Only(tag.to_string()),
		}
	}

	/// Whether the entity passes the filter.
	pub fn matches(&self, entity: &Entity) -> bool {
		match self {
			Self::All => true,
			Self::Only(tag) => entity.mythology == *tag,
		}
	}
}

impl fmt::Display for MythologyFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::All => f.write_str("all"),
			Self::Only(tag) => f.write_str(tag),
		}
	}
}

/// All loaded entities plus the id lookup table used to resolve edges.
#[derive(Clone, Debug, Default)]
pub struct EntityGraph {
	entities: Vec<Arc<Entity>>,
	index: HashMap<EntityId, usize>,
	warnings: Vec<DataWarning>,
}

impl EntityGraph {
	/// Builds the lookup table. Later duplicates of an id are dropped.
	pub fn new(entities: Vec<Entity>) -> Self {
		let mut graph = Self::default();
		for entity in entities {
			if graph.index.contains_key(&entity.id) {
				let warning = DataWarning::DuplicateEntity { id: entity.id };
				warn!("{}", warning);
				graph.warnings.push(warning);
				continue;
			}
			graph.index.insert(entity.id.clone(), graph.entities.len());
			graph.entities.push(Arc::new(entity));
		}
		graph
	}

	/// Looks an entity up by id.
	pub fn get(&self, id: &str) -> Option<&Arc<Entity>> {
		self.index.get(id).map(|&idx| &self.entities[idx])
	}

	/// Position of an entity in load order.
	pub fn position(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Entity at a load-order position.
	pub fn at(&self, idx: usize) -> &Arc<Entity> {
		&self.entities[idx]
	}

	/// All entities in load order.
	pub fn entities(&self) -> &[Arc<Entity>] {
		&self.entities
	}

	/// Warnings raised while indexing.
	pub fn warnings(&self) -> &[DataWarning] {
		&self.warnings
	}

	/// Number of distinct entities.
	pub fn len(&self) -> usize {
		self.entities.len()
	}

	/// True when nothing was loaded.
	pub fn is_empty(&self) -> bool {
		self.entities.is_empty()
	}

	/// Sorted, distinct mythology tags.
	pub fn mythologies(&self) -> Vec<String> {
		self.entities
			.iter()
			.map(|e| e.mythology.clone())
			.collect::<BTreeSet<_>>()
			.into_iter()
			.collect()
	}
}
