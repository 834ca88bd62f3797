//! Relationship graph to collapsible hierarchy: the toolkit-independent core.

pub mod collapse;
pub mod controller;
pub mod detail;
pub mod entity;
pub mod error;
pub mod layout;
pub mod lineage;
pub mod scene;
pub mod source;
pub mod tree;

pub use collapse::CollapseState;
pub use controller::{Action, Controller, Outcome, Phase};
pub use detail::{DetailView, RelatedEntity};
pub use entity::{Entity, EntityGraph, EntityId, MythologyFilter, Relationship, RelationshipKind};
pub use error::{DataWarning, GenealogyError, Result};
pub use layout::{LayoutConfig, LayoutEngine, LayoutExtent, layout};
pub use lineage::{Lineage, build};
pub use scene::{CollapseGlyph, RenderScene, SceneNode};
pub use source::{BundledSource, EntitySource};
pub use tree::TreeNode;
