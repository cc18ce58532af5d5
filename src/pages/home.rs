use leptos::prelude::*;

use super::{navigate_on_select, sample};
use crate::components::keyword_graph::{KeywordGraphCanvas, LayoutConfig};

/// Today's issue keywords. Edges are coloured by cluster and fan out where
/// two keywords share more than one cluster.
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = Signal::derive(sample::today);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="graph-page">
				<h1>"오늘의 키워드"</h1>
				<p class="subtitle">"Click a keyword or an edge to open it. Drag nodes to reposition."</p>
				<KeywordGraphCanvas
					data=graph_data
					on_select=navigate_on_select()
					layout=LayoutConfig::today()
					width=700.0
					height=500.0
				/>
				<a href="/map">"나의 지식맵"</a>
			</div>
		</ErrorBoundary>
	}
}
