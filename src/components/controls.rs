use leptos::prelude::*;

use crate::genealogy::MythologyFilter;

/// Expand/collapse/reset/export buttons and the mythology selector.
#[component]
pub fn Controls(
	#[prop(into)] mythologies: Signal<Vec<String>>,
	#[prop(into)] filter: Signal<MythologyFilter>,
	#[prop(into)] on_filter: Callback<MythologyFilter>,
	#[prop(into)] on_expand_all: Callback<()>,
	#[prop(into)] on_collapse_all: Callback<()>,
	#[prop(into)] on_reset_view: Callback<()>,
	#[prop(into)] on_export: Callback<()>,
) -> impl IntoView {
	view! {
		<div class="graph-controls">
			<select
				prop:value=move || filter.get().to_string()
				on:change=move |ev| on_filter.run(MythologyFilter::parse(&event_target_value(&ev)))
			>
				<option value="all">"All mythologies"</option>
				{move || {
					mythologies
						.get()
						.into_iter()
						.map(|m| {
							let value = m.clone();
							view! { <option value=value>{m}</option> }
						})
						.collect_view()
				}}
			</select>
			<button on:click=move |_| on_expand_all.run(())>"Expand All"</button>
			<button on:click=move |_| on_collapse_all.run(())>"Collapse All"</button>
			<button on:click=move |_| on_reset_view.run(())>"Reset View"</button>
			<button on:click=move |_| on_export.run(())>"Export as Image"</button>
		</div>
	}
}
