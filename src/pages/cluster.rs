use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use super::{navigate_on_select, sample};
use crate::components::keyword_graph::{GraphInput, KeywordGraphCanvas, LayoutConfig};

/// Keeps only the cluster with `id`; an unknown id leaves an empty graph.
fn single_cluster(mut input: GraphInput, id: Option<i64>) -> GraphInput {
	if let GraphInput::Clusters(set) = &mut input {
		set.clusters.retain(|c| c.id.is_some() && c.id == id);
	}
	input
}

/// The cluster's label, or its id when the cluster is unnamed.
fn cluster_title(input: &GraphInput, id: Option<i64>) -> String {
	let GraphInput::Clusters(set) = input else {
		return String::new();
	};
	set.clusters
		.iter()
		.find(|c| c.id.is_some() && c.id == id)
		.map(|c| c.label.clone().unwrap_or_else(|| c.id.unwrap_or_default().to_string()))
		.unwrap_or_default()
}

#[component]
pub fn ClusterPage() -> impl IntoView {
	let params = use_params_map();
	let cluster_id = move || params.with(|p| p.get("id")).and_then(|id| id.parse::<i64>().ok());
	let graph_data = Signal::derive(move || single_cluster(sample::today(), cluster_id()));
	let title = move || cluster_title(&graph_data.get(), cluster_id());

	view! {
		<div class="graph-page">
			<h1>"클러스터: " {title}</h1>
			<KeywordGraphCanvas
				data=graph_data
				on_select=navigate_on_select()
				layout=LayoutConfig::keyword()
				width=600.0
				height=400.0
			/>
			<a href="/">"오늘의 키워드"</a>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::keyword_graph::Graph;

	#[test]
	fn keeps_only_the_requested_cluster() {
		let graph = Graph::build(&single_cluster(sample::today(), Some(102)));
		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(graph.edges.len(), 3);
	}

	#[test]
	fn title_prefers_the_cluster_label() {
		let today = sample::today();
		assert_eq!(cluster_title(&today, Some(102)), "반도체 수출");
		assert_eq!(cluster_title(&today, Some(103)), "103");
		assert_eq!(cluster_title(&today, Some(9)), "");
	}

	#[test]
	fn unknown_cluster_renders_empty() {
		assert!(Graph::build(&single_cluster(sample::today(), Some(9))).is_empty());
		assert!(Graph::build(&single_cluster(sample::today(), None)).is_empty());
	}
}
