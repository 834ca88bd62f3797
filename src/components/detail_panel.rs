use leptos::prelude::*;

use crate::genealogy::DetailView;

#[component]
pub fn DetailPanel(
	#[prop(into)] detail: Signal<Option<DetailView>>,
	#[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
	move || {
		detail.get().map(|detail_view| {
			let entity = detail_view.entity.clone();
			let groups = detail_view
				.groups
				.into_iter()
				.map(|(kind, related)| {
					let names = related
						.into_iter()
						.map(|r| {
							if r.resolved {
								r.name
							} else {
								format!("{} (unknown)", r.name)
							}
						})
						.collect::<Vec<_>>()
						.join(", ");
					view! {
						<dt>{kind.to_string()}</dt>
						<dd>{names}</dd>
					}
				})
				.collect_view();

			view! {
				<aside class="detail-panel">
					<button class="detail-close" on:click=move |_| on_close.run(())>"\u{00d7}"</button>
					<h2>{entity.name.clone()}</h2>
					<p class="detail-meta">{format!("{} \u{00b7} {}", entity.kind, entity.mythology)}</p>
					<p class="detail-domain">{entity.domain.join(", ")}</p>
					<p>{entity.description.clone()}</p>
					<dl>{groups}</dl>
				</aside>
			}
		})
	}
}
