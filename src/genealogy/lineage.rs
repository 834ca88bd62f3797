//! Hierarchy builder: turns the relationship graph into a rooted tree.
//!
//! Parent/child edges are read in both directions and de-duplicated per
//! parent. Cycles are clipped with a path-scoped visited set, so an entity
//! may recur on independent branches while a revisit of its own ancestor
//! becomes a childless cycle-closure leaf.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use super::collapse::CollapseState;
use super::entity::{EntityGraph, MythologyFilter, RelationshipKind};
use super::error::DataWarning;
use super::tree::TreeNode;

/// Parent → children adjacency and root selection for one filter.
///
/// Computed once per load or filter change; `build` is then pure over the
/// collapse state.
#[derive(Clone, Debug, Default)]
pub struct Lineage {
	scope: Vec<usize>,
	children: HashMap<usize, Vec<usize>>,
	roots: Vec<usize>,
	warnings: Vec<DataWarning>,
}

impl Lineage {
	/// Resolves every in-scope relationship and picks the roots.
	pub fn new(graph: &EntityGraph, filter: &MythologyFilter) -> Self {
		let scope: Vec<usize> = (0..graph.len())
			.filter(|&idx| filter.matches(graph.at(idx)))
			.collect();
		let in_scope: HashSet<usize> = scope.iter().copied().collect();

		let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
		let mut has_parent = HashSet::new();
		let mut warnings = Vec::new();

		for &idx in &scope {
			let entity = graph.at(idx);
			for rel in &entity.relationships {
				if let RelationshipKind::Unknown(tag) = &rel.kind {
					let warning = DataWarning::UnknownRelationship {
						source_id: entity.id.clone(),
						kind: tag.clone(),
					};
					warn!("{}", warning);
					warnings.push(warning);
					continue;
				}
				let Some(target) = graph.position(&rel.target_id) else {
					let warning = DataWarning::DanglingReference {
						source_id: entity.id.clone(),
						kind: rel.kind.clone(),
						target_id: rel.target_id.clone(),
					};
					warn!("{}", warning);
					warnings.push(warning);
					continue;
				};
				if !in_scope.contains(&target) {
					debug!(
						"Skipping {} edge {} -> {} outside filter {}",
						rel.kind, entity.id, rel.target_id, filter
					);
					continue;
				}
				let (parent, child) = match rel.kind {
					RelationshipKind::Parent => (target, idx),
					RelationshipKind::Child => (idx, target),
					_ => continue,
				};
				let list = children.entry(parent).or_default();
				if !list.contains(&child) {
					list.push(child);
				}
				has_parent.insert(child);
			}
		}

		let mut lineage = Self {
			scope,
			children,
			roots: Vec::new(),
			warnings,
		};
		lineage.roots = lineage.pick_roots(graph, &has_parent);
		lineage
	}

	/// Parentless entities first, then one representative per component
	/// that no parentless entity reaches (pure cycles). Ordered by name.
	fn pick_roots(&self, graph: &EntityGraph, has_parent: &HashSet<usize>) -> Vec<usize> {
		let by_name = |a: &usize, b: &usize| -> Ordering {
			let (a, b) = (graph.at(*a), graph.at(*b));
			a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id))
		};
		let mut ordered = self.scope.clone();
		ordered.sort_by(by_name);

		let mut reached = HashSet::new();
		let mut roots = Vec::new();
		for &idx in ordered.iter().filter(|&&idx| !has_parent.contains(&idx)) {
			roots.push(idx);
			self.mark_reachable(idx, &mut reached);
		}
		for &idx in &ordered {
			if !reached.contains(&idx) {
				debug!("Promoting '{}' to root of a parentless cycle", graph.at(idx).id);
				roots.push(idx);
				self.mark_reachable(idx, &mut reached);
			}
		}
		roots.sort_by(by_name);
		roots
	}

	fn mark_reachable(&self, start: usize, reached: &mut HashSet<usize>) {
		let mut stack = vec![start];
		while let Some(idx) = stack.pop() {
			if reached.insert(idx) {
				stack.extend(self.children_of(idx).iter().copied());
			}
		}
	}

	fn children_of(&self, idx: usize) -> &[usize] {
		self.children.get(&idx).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Ids of the chosen roots.
	pub fn root_ids<'g>(&self, graph: &'g EntityGraph) -> Vec<&'g str> {
		self.roots.iter().map(|&idx| graph.at(idx).id.as_str()).collect()
	}

	/// Number of entities passing the filter.
	pub fn scope_len(&self) -> usize {
		self.scope.len()
	}

	/// Data-quality warnings found while resolving edges.
	pub fn warnings(&self) -> &[DataWarning] {
		&self.warnings
	}

	/// Builds a fresh tree. A single root is returned as is; anything else
	/// (including zero) gets a virtual root.
	pub fn build(&self, graph: &EntityGraph, collapse: &CollapseState) -> TreeNode {
		let path = HashSet::new();
		match self.roots.as_slice() {
			[root] => self.grow(graph, *root, 0, &path, collapse),
			roots => TreeNode::virtual_root(
				roots
					.iter()
					.map(|&idx| self.grow(graph, idx, 1, &path, collapse))
					.collect(),
			),
		}
	}

	fn grow(
		&self,
		graph: &EntityGraph,
		idx: usize,
		depth: usize,
		path: &HashSet<usize>,
		collapse: &CollapseState,
	) -> TreeNode {
		let entity = graph.at(idx);
		let mut node = TreeNode::new(Some(entity.clone()), depth);
		if path.contains(&idx) {
			node.is_cycle_closure = true;
			return node;
		}

		let mut path = path.clone();
		path.insert(idx);
		let kids: Vec<TreeNode> = self
			.children_of(idx)
			.iter()
			.map(|&child| self.grow(graph, child, depth + 1, &path, collapse))
			.collect();

		if collapse.is_collapsed(&entity.id) {
			node.collapsed_children = kids;
		} else {
			node.children = kids;
		}
		node
	}
}

/// One-shot hierarchy build over an entity graph.
pub fn build(graph: &EntityGraph, filter: &MythologyFilter, collapse: &CollapseState) -> TreeNode {
	Lineage::new(graph, filter).build(graph, collapse)
}
