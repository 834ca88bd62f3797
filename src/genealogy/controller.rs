//! Interaction controller: the session state machine.
//!
//! Owns the entity graph, collapse store, filter and canvas size, and turns
//! every accepted action into rebuild, re-layout and a fresh render scene.

use std::fmt;

use log::{debug, error, info, warn};

use super::collapse::CollapseState;
use super::detail::DetailView;
use super::entity::{Entity, EntityGraph, EntityId, MythologyFilter};
use super::error::{DataWarning, GenealogyError, Result};
use super::layout::{LayoutConfig, LayoutEngine};
use super::lineage::Lineage;
use super::scene::RenderScene;
use super::tree::TreeNode;

/// Lifecycle of a visualization session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Nothing requested yet.
	Idle,
	/// Entity fetch in flight; interaction is ignored.
	Loading,
	/// Tree built and laid out.
	Ready,
	/// Fetch failed; carries the user-facing message.
	Error(String),
}

impl fmt::Display for Phase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Idle => f.write_str("idle"),
			Self::Loading => f.write_str("loading"),
			Self::Ready => f.write_str("ready"),
			Self::Error(_) => f.write_str("error"),
		}
	}
}

/// User interaction accepted in `ready`.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
	/// Flip one entity everywhere it appears.
	Toggle(EntityId),
	/// Expand every entity.
	ExpandAll,
	/// Collapse every entity.
	CollapseAll,
	/// Restrict the hierarchy to one mythology.
	SetFilter(MythologyFilter),
	/// Open the detail view for an entity.
	OpenDetail(EntityId),
	/// Close the detail view.
	CloseDetail,
	/// Re-run layout at the current canvas size.
	ResetView,
	/// Canvas size changed.
	Resize {
		/// New canvas width.
		width: f64,
		/// New canvas height.
		height: f64,
	},
}

/// What an action did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
	/// Not in `ready`, or nothing to do.
	Ignored,
	/// Tree rebuilt and scene replaced.
	Rebuilt,
	/// Only the detail side channel changed.
	DetailChanged,
}

/// One visualization session.
#[derive(Clone, Debug)]
pub struct Controller {
	phase: Phase,
	graph: EntityGraph,
	lineage: Lineage,
	filter: MythologyFilter,
	collapse: CollapseState,
	engine: LayoutEngine,
	width: f64,
	height: f64,
	tree: Option<TreeNode>,
	scene: RenderScene,
	detail: Option<EntityId>,
}

impl Controller {
	/// Idle session for a canvas of the given size.
	pub fn new(width: f64, height: f64) -> Self {
		Self::with_config(LayoutConfig::default(), width, height)
	}

	/// Idle session with explicit layout spacing.
	pub fn with_config(config: LayoutConfig, width: f64, height: f64) -> Self {
		Self {
			phase: Phase::Idle,
			graph: EntityGraph::default(),
			lineage: Lineage::default(),
			filter: MythologyFilter::All,
			collapse: CollapseState::new(),
			engine: LayoutEngine::new(config),
			width,
			height,
			tree: None,
			scene: RenderScene::default(),
			detail: None,
		}
	}

	/// `idle`/`ready`/`error` → `loading`. Drops all session state so a
	/// failed session can be re-initialized. Refused while a fetch is pending.
	pub fn begin_load(&mut self) -> bool {
		if self.phase == Phase::Loading {
			warn!("Entity fetch already in flight");
			return false;
		}
		self.phase = Phase::Loading;
		self.graph = EntityGraph::default();
		self.lineage = Lineage::default();
		self.collapse.reset();
		self.tree = None;
		self.scene = RenderScene::default();
		self.detail = None;
		true
	}

	/// `loading` → `ready` or `error`.
	pub fn complete_load(&mut self, result: Result<Vec<Entity>>) {
		if self.phase != Phase::Loading {
			warn!("Ignoring fetch result in phase {}", self.phase);
			return;
		}
		match result {
			Ok(entities) => {
				self.graph = EntityGraph::new(entities);
				info!(
					"Entity graph ready: {} entities across {} mythologies",
					self.graph.len(),
					self.graph.mythologies().len()
				);
				self.relineage();
				self.phase = Phase::Ready;
				self.rebuild();
			}
			Err(err) => {
				error!("{}", err);
				let message = match err {
					GenealogyError::DataFetch(message) | GenealogyError::Export(message) => message,
				};
				self.phase = Phase::Error(message);
			}
		}
	}

	/// Applies one action. Everything is ignored outside `ready`.
	pub fn dispatch(&mut self, action: Action) -> Outcome {
		if self.phase != Phase::Ready {
			debug!("Ignoring {:?} in phase {}", action, self.phase);
			return Outcome::Ignored;
		}
		match action {
			Action::Toggle(id) => {
				if self.graph.get(&id).is_none() {
					warn!("Toggle for unknown entity '{}'", id);
					return Outcome::Ignored;
				}
				let collapsed = self.collapse.toggle(&id);
				debug!("Toggled '{}' collapsed={}", id, collapsed);
			}
			Action::ExpandAll => {
				info!("Expanding all entities");
				self.collapse.set_all(false);
			}
			Action::CollapseAll => {
				info!("Collapsing all entities");
				self.collapse.set_all(true);
			}
			Action::SetFilter(filter) => {
				if filter == self.filter {
					return Outcome::Ignored;
				}
				info!("Mythology filter changed to '{}'", filter);
				self.filter = filter;
				self.relineage();
			}
			Action::OpenDetail(id) => {
				if self.graph.get(&id).is_none() {
					return Outcome::Ignored;
				}
				self.detail = Some(id);
				return Outcome::DetailChanged;
			}
			Action::CloseDetail => {
				return match self.detail.take() {
					Some(_) => Outcome::DetailChanged,
					None => Outcome::Ignored,
				};
			}
			Action::ResetView => {}
			Action::Resize { width, height } => {
				self.width = width;
				self.height = height;
			}
		}
		self.rebuild();
		Outcome::Rebuilt
	}

	fn relineage(&mut self) {
		self.lineage = Lineage::new(&self.graph, &self.filter);
		info!(
			"Lineage for '{}': {} entities under roots {:?}",
			self.filter,
			self.lineage.scope_len(),
			self.lineage.root_ids(&self.graph)
		);
	}

	fn rebuild(&mut self) {
		let mut tree = self.lineage.build(&self.graph, &self.collapse);
		let extent = self.engine.layout(&mut tree, self.width, self.height);
		self.scene = RenderScene::from_tree(&tree, extent);
		debug!(
			"Rebuilt hierarchy: {} visible of {} nodes",
			self.scene.nodes.len(),
			tree.all().len()
		);
		self.tree = Some(tree);
	}

	/// Current phase.
	pub fn phase(&self) -> &Phase {
		&self.phase
	}

	/// Laid-out tree, once ready.
	pub fn tree(&self) -> Option<&TreeNode> {
		self.tree.as_ref()
	}

	/// Scene for the renderer. Empty until ready.
	pub fn scene(&self) -> &RenderScene {
		&self.scene
	}

	/// Active mythology filter.
	pub fn filter(&self) -> &MythologyFilter {
		&self.filter
	}

	/// Mythologies present in the loaded graph.
	pub fn mythologies(&self) -> Vec<String> {
		self.graph.mythologies()
	}

	/// Collapse store.
	pub fn collapse(&self) -> &CollapseState {
		&self.collapse
	}

	/// Canvas size used for layout.
	pub fn canvas_size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// Detail view for the entity opened by double-click.
	pub fn detail(&self) -> Option<DetailView> {
		let id = self.detail.as_deref()?;
		let entity = self.graph.get(id)?.clone();
		Some(DetailView::new(entity, &self.graph))
	}

	/// Data-quality warnings for the loaded graph and active filter.
	pub fn warnings(&self) -> Vec<DataWarning> {
		self.graph
			.warnings()
			.iter()
			.chain(self.lineage.warnings())
			.cloned()
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::genealogy::entity::RelationshipKind::*;

	fn entities() -> Vec<Entity> {
		vec![
			Entity::new("ares", "Ares", "deity", "greek"),
			Entity::new("aphrodite", "Aphrodite", "deity", "greek").with(Consort, "ares"),
			Entity::new("harmonia", "Harmonia", "deity", "greek")
				.with(Parent, "ares")
				.with(Parent, "aphrodite"),
			Entity::new("semele", "Semele", "hero", "greek").with(Parent, "harmonia"),
			Entity::new("odin", "Odin", "deity", "norse").with(Child, "thor"),
			Entity::new("thor", "Thor", "deity", "norse").with(Parent, "ghost"),
		]
	}

	fn ready() -> Controller {
		let mut controller = Controller::new(800.0, 600.0);
		assert!(controller.begin_load());
		controller.complete_load(Ok(entities()));
		assert_eq!(controller.phase(), &Phase::Ready);
		controller
	}

	fn shape(controller: &Controller) -> String {
		controller.tree().unwrap().shape()
	}

	fn positions(controller: &Controller) -> Vec<(String, f64, f64)> {
		controller
			.scene()
			.nodes
			.iter()
			.map(|n| (n.key.clone(), n.x, n.y))
			.collect()
	}

	#[test]
	fn test_load_lifecycle() {
		let mut controller = Controller::new(800.0, 600.0);
		assert_eq!(controller.phase(), &Phase::Idle);
		assert!(controller.begin_load());
		assert!(!controller.begin_load());
		assert_eq!(controller.phase(), &Phase::Loading);

		controller.complete_load(Ok(entities()));
		assert_eq!(controller.phase(), &Phase::Ready);
		assert_eq!(controller.mythologies(), vec!["greek", "norse"]);
		assert!(!controller.scene().is_empty());
	}

	#[test]
	fn test_fetch_failure_is_error() {
		let mut controller = Controller::new(800.0, 600.0);
		controller.begin_load();
		controller.complete_load(Err(GenealogyError::DataFetch("offline".into())));
		assert_eq!(controller.phase(), &Phase::Error("offline".into()));
		assert_eq!(controller.dispatch(Action::ExpandAll), Outcome::Ignored);

		assert!(controller.begin_load());
		controller.complete_load(Ok(entities()));
		assert_eq!(controller.phase(), &Phase::Ready);
	}

	#[test]
	fn test_actions_ignored_while_loading() {
		let mut controller = Controller::new(800.0, 600.0);
		controller.begin_load();
		assert_eq!(controller.dispatch(Action::Toggle("ares".into())), Outcome::Ignored);
		assert!(!controller.collapse().is_collapsed("ares"));
	}

	#[test]
	fn test_dangling_reference_keeps_ready() {
		let controller = ready();
		assert!(matches!(
			controller.warnings().as_slice(),
			[DataWarning::DanglingReference { target_id, .. }] if target_id == "ghost"
		));
		assert_eq!(controller.phase(), &Phase::Ready);
	}

	#[test]
	fn test_toggle_twice_restores_tree() {
		let mut controller = ready();
		let before = shape(&controller);
		let before_positions = positions(&controller);

		assert_eq!(controller.dispatch(Action::Toggle("harmonia".into())), Outcome::Rebuilt);
		assert_ne!(shape(&controller), before);
		controller.dispatch(Action::Toggle("harmonia".into()));

		assert_eq!(shape(&controller), before);
		assert_eq!(positions(&controller), before_positions);
		assert!(!controller.collapse().is_collapsed("harmonia"));
	}

	#[test]
	fn test_toggle_hits_every_occurrence() {
		let mut controller = ready();
		controller.dispatch(Action::Toggle("harmonia".into()));
		let tree = controller.tree().unwrap();
		let hidden: Vec<_> = tree
			.all()
			.into_iter()
			.filter(|n| n.entity_id() == Some("harmonia"))
			.collect();
		assert_eq!(hidden.len(), 2);
		assert!(hidden.iter().all(|n| n.children.is_empty() && n.is_collapsed()));
	}

	#[test]
	fn test_collapse_all_then_expand_all() {
		let mut controller = ready();
		let expanded = shape(&controller);
		controller.dispatch(Action::CollapseAll);
		assert_eq!(shape(&controller), "*(aphrodite+,ares+,odin+)");
		controller.dispatch(Action::ExpandAll);
		assert_eq!(shape(&controller), expanded);
	}

	#[test]
	fn test_filter_change_and_empty_state() {
		let mut controller = ready();
		assert_eq!(
			controller.dispatch(Action::SetFilter(MythologyFilter::Only("norse".into()))),
			Outcome::Rebuilt
		);
		assert_eq!(shape(&controller), "odin(thor)");

		controller.dispatch(Action::SetFilter(MythologyFilter::Only("aztec".into())));
		assert_eq!(controller.phase(), &Phase::Ready);
		assert!(controller.scene().is_empty());
		assert!(controller.tree().unwrap().children.is_empty());
	}

	#[test]
	fn test_detail_does_not_touch_tree() {
		let mut controller = ready();
		let before = shape(&controller);
		assert_eq!(
			controller.dispatch(Action::OpenDetail("harmonia".into())),
			Outcome::DetailChanged
		);
		let detail = controller.detail().unwrap();
		assert_eq!(detail.entity.name, "Harmonia");
		assert_eq!(shape(&controller), before);

		assert_eq!(controller.dispatch(Action::CloseDetail), Outcome::DetailChanged);
		assert!(controller.detail().is_none());
		assert_eq!(controller.dispatch(Action::CloseDetail), Outcome::Ignored);
	}

	#[test]
	fn test_layout_independent_of_toggle_history() {
		let mut a = ready();
		let mut b = ready();
		b.dispatch(Action::Toggle("ares".into()));
		b.dispatch(Action::CollapseAll);
		b.dispatch(Action::Toggle("semele".into()));
		b.dispatch(Action::ExpandAll);
		a.dispatch(Action::ResetView);
		assert_eq!(positions(&a), positions(&b));
	}

	#[test]
	fn test_resize_relayouts() {
		let mut controller = ready();
		let before = positions(&controller);
		controller.dispatch(Action::Resize {
			width: 1600.0,
			height: 1200.0,
		});
		assert_eq!(controller.canvas_size(), (1600.0, 1200.0));
		assert_ne!(positions(&controller), before);
	}

	#[test]
	fn test_warnings_stable_across_toggles() {
		let mut controller = ready();
		controller.dispatch(Action::Toggle("thor".into()));
		controller.dispatch(Action::CollapseAll);
		controller.dispatch(Action::ExpandAll);
		controller.dispatch(Action::ResetView);

		let dangling: Vec<_> = controller
			.warnings()
			.into_iter()
			.filter(|w| matches!(w, DataWarning::DanglingReference { .. }))
			.collect();
		assert_eq!(dangling.len(), 1);

		controller.dispatch(Action::SetFilter(MythologyFilter::Only("norse".into())));
		assert_eq!(controller.warnings().len(), 1);
	}

	#[test]
	fn test_reset_view_keeps_collapse_state() {
		let mut controller = ready();
		controller.dispatch(Action::Toggle("harmonia".into()));
		let collapsed = shape(&controller);
		let before = positions(&controller);

		assert_eq!(controller.dispatch(Action::ResetView), Outcome::Rebuilt);
		assert_eq!(shape(&controller), collapsed);
		assert_eq!(positions(&controller), before);
		assert!(controller.collapse().is_collapsed("harmonia"));
	}
}
