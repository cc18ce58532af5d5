use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use super::{navigate_on_select, sample};
use crate::components::keyword_graph::{
	CentralKeyword, GraphInput, KeywordGraphCanvas, KeywordInput, LayoutConfig, NodeId,
};

fn parse_id(raw: &str) -> NodeId {
	raw.parse::<i64>()
		.map(NodeId::Int)
		.unwrap_or_else(|_| NodeId::Text(raw.to_string()))
}

/// Puts the searched keyword in the middle of the related-keyword clusters.
fn centred_on(mut input: GraphInput, id: NodeId) -> GraphInput {
	if let GraphInput::Clusters(set) = &mut input {
		let name = set
			.clusters
			.iter()
			.flat_map(|c| &c.keywords)
			.find_map(|k| match k {
				KeywordInput::Record(r) if r.id.as_ref() == Some(&id) => r.name.clone(),
				KeywordInput::Name(n) if NodeId::Text(n.clone()) == id => Some(n.clone()),
				_ => None,
			})
			.unwrap_or_else(|| id.to_string());
		set.central = Some(CentralKeyword {
			id,
			name,
			weight: None,
		});
	}
	input
}

#[component]
pub fn KeywordPage() -> impl IntoView {
	let params = use_params_map();
	let keyword = move || params.with(|p| p.get("id")).unwrap_or_default();
	let graph_data = Signal::derive(move || centred_on(sample::related(), parse_id(&keyword())));

	view! {
		<div class="graph-page">
			<h1>"연관 키워드: " {keyword}</h1>
			<KeywordGraphCanvas
				data=graph_data
				on_select=navigate_on_select()
				layout=LayoutConfig::related()
				width=600.0
				height=400.0
			/>
			<a href="/">"오늘의 키워드"</a>
		</div>
	}
}
