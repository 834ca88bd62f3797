use std::collections::HashMap;

use crate::genealogy::{EntityId, RenderScene};

pub const NODE_RADIUS: f64 = 9.0;
pub const HIT_RADIUS: f64 = 14.0;
pub const TRANSITION_SECS: f64 = 0.35;
const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 10.0;
// Pointer travel (screen px) after which a press counts as a pan, not a click.
const CLICK_SLOP: f64 = 4.0;
// Screen gap kept around the tree when the view is refitted.
const FIT_PADDING: f64 = 40.0;

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub suppress_click: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// A single click held back until it cannot be part of a double-click.
#[derive(Clone, Debug, Default)]
pub struct PendingClick {
	ticket: u64,
	entity: Option<EntityId>,
}

pub struct TreeCanvasState {
	pub scene: RenderScene,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hover: Option<usize>,
	pub width: f64,
	pub height: f64,
	pending: PendingClick,
	origins: Vec<(f64, f64)>,
	transition_t: f64,
}

impl TreeCanvasState {
	pub fn new(scene: RenderScene, width: f64, height: f64) -> Self {
		let origins = scene.nodes.iter().map(|n| (n.x, n.y)).collect();
		Self {
			scene,
			transform: ViewTransform::default(),
			pan: PanState::default(),
			hover: None,
			width,
			height,
			pending: PendingClick::default(),
			origins,
			transition_t: 1.0,
		}
	}

	/// Swaps in a rebuilt scene. Surviving nodes tween from where they are
	/// drawn now; new nodes grow out of their nearest surviving ancestor.
	pub fn set_scene(&mut self, scene: RenderScene) {
		let previous: HashMap<&str, (f64, f64)> = self
			.scene
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.key.as_str(), self.position(i)))
			.collect();

		let origins = (0..scene.nodes.len())
			.map(|i| {
				let mut cursor = Some(i);
				while let Some(idx) = cursor {
					if let Some(&pos) = previous.get(scene.nodes[idx].key.as_str()) {
						return pos;
					}
					cursor = scene.parent_of(idx);
				}
				(scene.nodes[i].x, scene.nodes[i].y)
			})
			.collect();

		self.origins = origins;
		self.scene = scene;
		self.transition_t = 0.0;
		self.hover = None;
	}

	pub fn tick(&mut self, dt: f64) {
		self.transition_t = (self.transition_t + dt / TRANSITION_SECS).min(1.0);
	}

	pub fn is_animating(&self) -> bool {
		self.transition_t < 1.0
	}

	/// Drawn position of a node at the current point of the transition.
	pub fn position(&self, idx: usize) -> (f64, f64) {
		let node = &self.scene.nodes[idx];
		let (ox, oy) = self.origins.get(idx).copied().unwrap_or((node.x, node.y));
		let t = ease_out_cubic(self.transition_t);
		(ox + (node.x - ox) * t, oy + (node.y - oy) * t)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		let mut best = HIT_RADIUS;
		for (idx, node) in self.scene.nodes.iter().enumerate() {
			if node.is_virtual() {
				continue;
			}
			let (x, y) = self.position(idx);
			let dist = ((x - gx).powi(2) + (y - gy).powi(2)).sqrt();
			if dist < best {
				best = dist;
				found = Some(idx);
			}
		}
		found
	}

	pub fn entity_at_position(&self, sx: f64, sy: f64) -> Option<EntityId> {
		self.node_at_position(sx, sy)
			.and_then(|idx| self.scene.nodes[idx].entity_id.clone())
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		self.hover = node;
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.is_some()
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		let Some(hovered) = self.hover else {
			return false;
		};
		hovered == idx
			|| self
				.scene
				.edges
				.iter()
				.any(|&(p, c)| (p == hovered && c == idx) || (c == hovered && p == idx))
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			moved: false,
			suppress_click: false,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		if !self.pan.active {
			return;
		}
		let (dx, dy) = (sx - self.pan.start_x, sy - self.pan.start_y);
		if dx.abs() > CLICK_SLOP || dy.abs() > CLICK_SLOP {
			self.pan.moved = true;
		}
		if self.pan.moved {
			self.transform.x = self.pan.transform_start_x + dx;
			self.transform.y = self.pan.transform_start_y + dy;
		}
	}

	pub fn end_pan(&mut self) {
		self.pan.suppress_click = self.pan.moved;
		self.pan.active = false;
		self.pan.moved = false;
	}

	/// Consumes the click that follows a pan release.
	pub fn take_click(&mut self) -> bool {
		!std::mem::take(&mut self.pan.suppress_click)
	}

	/// Registers a click on the canvas. `count` is the browser's click
	/// counter; the second click of a double-click cancels the first. Returns
	/// the ticket to commit once the double-click interval has passed.
	pub fn queue_click(&mut self, sx: f64, sy: f64, count: i32) -> Option<u64> {
		if !self.take_click() {
			return None;
		}
		if count > 1 {
			self.cancel_click();
			return None;
		}
		let entity = self.entity_at_position(sx, sy)?;
		self.pending.ticket += 1;
		self.pending.entity = Some(entity);
		Some(self.pending.ticket)
	}

	/// Entity to toggle if `ticket` is still the live pending click.
	pub fn commit_click(&mut self, ticket: u64) -> Option<EntityId> {
		if ticket != self.pending.ticket {
			return None;
		}
		self.pending.entity.take()
	}

	pub fn cancel_click(&mut self) {
		self.pending.entity = None;
	}

	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Fits the whole scene into the canvas, centered, never zooming in
	/// past 1:1.
	pub fn reset_view(&mut self) {
		self.transform = self.fit_transform();
		self.pan = PanState::default();
	}

	fn fit_transform(&self) -> ViewTransform {
		if self.scene.nodes.is_empty() {
			return ViewTransform::default();
		}
		let extent = &self.scene.extent;
		let room_x = (self.width - 2.0 * FIT_PADDING).max(1.0);
		let room_y = (self.height - 2.0 * FIT_PADDING).max(1.0);
		let k = (room_x / extent.width().max(1.0))
			.min(room_y / extent.height().max(1.0))
			.min(1.0)
			.clamp(MIN_ZOOM, MAX_ZOOM);
		let (cx, cy) = extent.center();
		ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
