//! Canned responses shaped like the cluster and knowledge-map endpoints.

use log::error;

use crate::components::keyword_graph::GraphInput;

const TODAY: &str = r#"{"clusters": [
	{"cluster_id": 101, "label": "통화정책", "num_articles": 12, "keywords": ["금리", "한국은행", "물가"]},
	{"cluster_id": 102, "label": "반도체 수출", "num_articles": 8, "keywords": ["반도체", "수출", "AI"]},
	{"cluster_id": 103, "num_articles": 5, "keywords": ["AI", "ChatGPT", "규제"]},
	{"cluster_id": 104, "num_articles": 3, "keywords": ["수출", "물가", "환율"]},
	{"cluster_id": 105, "num_articles": 4, "keywords": ["AI", "반도체", "투자"]}
]}"#;

const RELATED: &str = r#"{"clusters": [
	{"id": 0, "keywords": [{"id": 1, "name": "AI", "count": 9}, {"id": 2, "name": "ChatGPT", "count": 6}, {"id": 3, "name": "딥러닝", "count": 2}]},
	{"id": 1, "keywords": [{"id": 4, "name": "선거", "count": 7}, {"id": 5, "name": "정치", "count": 4}, {"id": 6, "name": "후보"}]},
	{"id": 2, "keywords": [{"id": 1, "name": "AI", "count": 3}, {"id": 7, "name": "규제", "count": 2}, {"name": "missing id"}]}
]}"#;

const KNOWLEDGE_MAP: &str = r#"{
	"nodes": [
		{"id": 1, "name": "AI", "count": 9},
		{"id": 2, "name": "반도체", "count": 6},
		{"id": 3, "name": "수출", "count": 4},
		{"id": 4, "name": "환율", "count": 2},
		{"id": 5, "name": "규제", "count": 3}
	],
	"edges": [
		{"source": 1, "target": 2, "weight": 0.9},
		{"source": 2, "target": 3, "weight": 0.6},
		{"source": 3, "target": 4, "weight": 0.35},
		{"source": 1, "target": 5, "weight": 0.1},
		{"source": 4, "target": 99, "weight": 0.5}
	]
}"#;

fn parse(name: &str, json: &str) -> GraphInput {
	GraphInput::from_json(json).unwrap_or_else(|err| {
		error!("sample {name} is not valid graph input: {err}");
		GraphInput::default()
	})
}

pub fn today() -> GraphInput {
	parse("today", TODAY)
}

pub fn related() -> GraphInput {
	parse("related", RELATED)
}

pub fn knowledge_map() -> GraphInput {
	parse("knowledge map", KNOWLEDGE_MAP)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::keyword_graph::Graph;

	#[test]
	fn samples_parse_into_their_shapes() {
		assert!(matches!(today(), GraphInput::Clusters(_)));
		assert!(matches!(related(), GraphInput::Clusters(_)));
		assert!(matches!(knowledge_map(), GraphInput::Explicit(_)));
	}

	#[test]
	fn knowledge_map_drops_the_dangling_edge() {
		let graph = Graph::build(&knowledge_map());
		assert_eq!(graph.nodes.len(), 5);
		assert_eq!(graph.edges.len(), 4);
	}

	#[test]
	fn today_merges_repeated_keywords() {
		let graph = Graph::build(&today());
		let ai = graph.node_index(&"AI".into()).expect("AI node");
		assert_eq!(graph.nodes[ai].weight, 8.0 + 5.0 + 4.0);
		let semiconductors = graph.node_index(&"반도체".into()).expect("node");
		let pair: Vec<_> = graph
			.edges
			.iter()
			.filter(|e| e.group_key() == (ai.min(semiconductors), ai.max(semiconductors)))
			.collect();
		assert_eq!(pair.len(), 2);
		assert!(pair.iter().all(|e| e.group_size == 2));
	}
}
