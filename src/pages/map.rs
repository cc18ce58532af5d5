use leptos::prelude::*;

use super::{navigate_on_select, sample};
use crate::components::keyword_graph::{KeywordGraphCanvas, LayoutConfig};
use crate::store::{ArticleSet, LocalStorage};

/// The user's latest knowledge map: explicit keyword nodes and weighted
/// co-occurrence edges.
#[component]
pub fn KnowledgeMapPage() -> impl IntoView {
	let graph_data = Signal::derive(sample::knowledge_map);
	let scrapped = LocalStorage::open()
		.map(|storage| ArticleSet::scrapped(storage).ids().len())
		.unwrap_or(0);

	view! {
		<div class="graph-page">
			<h1>"나의 최신 지식맵"</h1>
			<p class="subtitle">{format!("스크랩한 기사 {scrapped}건")}</p>
			<KeywordGraphCanvas
				data=graph_data
				on_select=navigate_on_select()
				layout=LayoutConfig::related()
			/>
			<a href="/">"오늘의 키워드"</a>
		</div>
	}
}
