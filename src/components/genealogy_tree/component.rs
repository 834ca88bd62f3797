use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::export;
use super::render;
use super::state::TreeCanvasState;
use crate::genealogy::{EntityId, RenderScene, Result};

// Single clicks wait this long for a second click before toggling.
const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(250);

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> (f64, f64) {
	let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: std::result::Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64());
	(
		dim(window.inner_width()).unwrap_or(800.0),
		dim(window.inner_height()).unwrap_or(600.0),
	)
}

fn parent_size(canvas: &HtmlCanvasElement, width: Option<f64>, height: Option<f64>) -> (f64, f64) {
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| parent.as_ref().map_or(800.0, |p| p.client_width() as f64)),
		height.unwrap_or_else(|| parent.as_ref().map_or(600.0, |p| p.client_height() as f64)),
	)
}

fn fit_canvas(canvas: &HtmlCanvasElement, width: f64, height: f64) {
	canvas.set_width(width as u32);
	canvas.set_height(height as u32);
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

#[component]
pub fn GenealogyCanvas(
	#[prop(into)] scene: Signal<RenderScene>,
	#[prop(into)] on_toggle: Callback<EntityId>,
	#[prop(into)] on_detail: Callback<EntityId>,
	#[prop(into)] on_resize: Callback<(f64, f64)>,
	#[prop(into)] view_resets: Signal<u64>,
	#[prop(into)] export_requests: Signal<u64>,
	#[prop(into)] export_name: Signal<String>,
	#[prop(into)] on_export: Callback<Result<()>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<TreeCanvasState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			parent_size(&canvas, width, height)
		};
		fit_canvas(&canvas, w, h);

		let Some(ctx) = context_2d(&canvas) else {
			log::error!("Canvas 2d context unavailable");
			return;
		};
		*state_init.borrow_mut() = Some(TreeCanvasState::new(scene.get_untracked(), w, h));
		on_resize.run((w, h));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				fit_canvas(&canvas_resize, nw, nh);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
				on_resize.run((nw, nh));
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.is_animating() {
					s.tick(0.016);
				}
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_scene = state.clone();
	Effect::new(move |_| {
		let next = scene.get();
		if let Some(ref mut s) = *state_scene.borrow_mut() {
			s.set_scene(next);
		}
	});

	let state_reset = state.clone();
	Effect::new(move |_| {
		if view_resets.get() == 0 {
			return;
		}
		if let Some(ref mut s) = *state_reset.borrow_mut() {
			s.reset_view();
		}
	});

	Effect::new(move |_| {
		if export_requests.get() == 0 {
			return;
		}
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		export::export_png(&canvas, export_name.get_untracked(), move |result| {
			on_export.run(result)
		});
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let (x, y) = canvas_point(canvas_ref, &ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.begin_pan(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let (x, y) = canvas_point(canvas_ref, &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.pan.active {
				s.pan_to(x, y);
			} else {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.end_pan();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.end_pan();
			s.set_hover(None);
		}
	};

	let state_click = state.clone();
	let on_click = move |ev: MouseEvent| {
		let (x, y) = canvas_point(canvas_ref, &ev);
		let ticket = state_click
			.borrow_mut()
			.as_mut()
			.and_then(|s| s.queue_click(x, y, ev.detail()));
		let Some(ticket) = ticket else {
			return;
		};
		let state_commit = state_click.clone();
		set_timeout(
			move || {
				let hit = state_commit
					.borrow_mut()
					.as_mut()
					.and_then(|s| s.commit_click(ticket));
				if let Some(id) = hit {
					on_toggle.run(id);
				}
			},
			DOUBLE_CLICK_WINDOW,
		);
	};

	let state_dbl = state.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let (x, y) = canvas_point(canvas_ref, &ev);
		let hit = state_dbl.borrow_mut().as_mut().and_then(|s| {
			s.cancel_click();
			s.entity_at_position(x, y)
		});
		if let Some(id) = hit {
			on_detail.run(id);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let (x, y) = canvas_point(canvas_ref, &ev);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="genealogy-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:click=on_click
			on:dblclick=on_dblclick
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
