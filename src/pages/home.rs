use std::time::Duration;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::error;

use crate::components::controls::Controls;
use crate::components::detail_panel::DetailPanel;
use crate::components::genealogy_tree::{GenealogyCanvas, export_file_name};
use crate::genealogy::{Action, BundledSource, Controller, EntitySource, MythologyFilter, Phase, Result};

const NOTICE_TIMEOUT: Duration = Duration::from_secs(4);

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let controller = RwSignal::new(Controller::new(800.0, 600.0));
	let view_resets = RwSignal::new(0u64);
	let export_requests = RwSignal::new(0u64);
	let notice = RwSignal::new(None::<String>);

	// The whole dataset is fetched once; filter changes rebuild locally.
	if controller.try_update(|c| c.begin_load()).unwrap_or(false) {
		spawn_local(async move {
			let result = BundledSource::pantheon().fetch(&MythologyFilter::All).await;
			controller.update(|c| c.complete_load(result));
		});
	}

	let dispatch = move |action: Action| {
		controller.update(|c| {
			c.dispatch(action);
		});
	};

	let phase = Memo::new(move |_| controller.with(|c| c.phase().clone()));
	let scene = Memo::new(move |_| controller.with(|c| c.scene().clone()));
	let mythologies = Memo::new(move |_| controller.with(|c| c.mythologies()));
	let filter = Memo::new(move |_| controller.with(|c| c.filter().clone()));
	let detail = Signal::derive(move || controller.with(|c| c.detail()));
	let export_name = Signal::derive(move || filter.with(export_file_name));

	let on_resize = move |(width, height): (f64, f64)| dispatch(Action::Resize { width, height });

	let on_export = move |result: Result<()>| {
		if let Err(err) = result {
			error!("{}", err);
			notice.set(Some(err.to_string()));
			set_timeout(move || notice.set(None), NOTICE_TIMEOUT);
		}
	};

	view! {
		<div class="fullscreen-graph">
			{move || match phase.get() {
				Phase::Idle | Phase::Loading => {
					view! { <p class="graph-status">"Loading genealogy\u{2026}"</p> }.into_any()
				}
				Phase::Error(message) => {
					view! {
						<div class="graph-status graph-error">
							<h1>"Uh oh! Something went wrong!"</h1>
							<p>{message}</p>
						</div>
					}
						.into_any()
				}
				Phase::Ready => {
					view! {
						<GenealogyCanvas
							scene=scene
							on_toggle=move |id| dispatch(Action::Toggle(id))
							on_detail=move |id| dispatch(Action::OpenDetail(id))
							on_resize=move |(width, height): (f64, f64)| dispatch(Action::Resize { width, height })
							view_resets=view_resets
							export_requests=export_requests
							export_name=export_name
							on_export=on_export
							fullscreen=true
						/>
					}
						.into_any()
				}
			}}
			<div class="graph-overlay">
				<h1>"Mythic Genealogies"</h1>
				<p class="subtitle">
					"Click a node to collapse or expand it everywhere it appears. Double-click for details. Scroll to zoom, drag to pan."
				</p>
				<Controls
					mythologies=mythologies
					filter=filter
					on_filter=move |f| dispatch(Action::SetFilter(f))
					on_expand_all=move |_| dispatch(Action::ExpandAll)
					on_collapse_all=move |_| dispatch(Action::CollapseAll)
					on_reset_view=move |_| {
						dispatch(Action::ResetView);
						view_resets.update(|n| *n += 1);
					}
					on_export=move |_| export_requests.update(|n| *n += 1)
				/>
				{move || notice.get().map(|message| view! { <p class="graph-notice">{message}</p> })}
			</div>
			<DetailPanel detail=detail on_close=move |_| dispatch(Action::CloseDetail) />
		</div>
	}
}
