//! Normalises either input shape into one [`Graph`] of unique keyword nodes
//! and undirected co-occurrence edges.

use std::collections::HashMap;

use log::debug;

use super::types::{ClusterSet, ExplicitGraph, GraphInput, KeywordInput, NodeId};

pub const DEFAULT_WEIGHT: f64 = 1.0;

/// The cluster an element came from. `slot` is the cluster's position in the
/// input and picks its palette colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClusterTag {
	pub id: i64,
	pub slot: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: NodeId,
	pub name: String,
	pub weight: f64,
	pub cluster: Option<ClusterTag>,
	pub is_central: bool,
}

/// Undirected edge between two node indices.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub source: usize,
	pub target: usize,
	/// Position inside the group of parallel edges sharing [`Edge::group_key`].
	pub offset_index: usize,
	pub group_size: usize,
	/// Co-occurrence strength in `0..=1`, only set for explicit input.
	pub weight: Option<f64>,
	pub cluster: Option<ClusterTag>,
}

impl Edge {
	pub fn group_key(&self) -> (usize, usize) {
		(self.source.min(self.target), self.source.max(self.target))
	}

	/// Signed position of this edge relative to the middle of its group.
	pub fn offset_sign(&self) -> f64 {
		self.offset_index as f64 - (self.group_size.max(1) - 1) as f64 / 2.0
	}
}

#[derive(Clone, Debug, Default)]
pub struct Graph {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
	/// Index of the searched keyword, if the input named one.
	pub central: Option<usize>,
	index: HashMap<NodeId, usize>,
}

impl Graph {
	pub fn build(input: &GraphInput) -> Self {
		let graph = match input {
			GraphInput::Clusters(set) => from_clusters(set),
			GraphInput::Explicit(explicit) => from_explicit(explicit),
		};
		debug!(
			"built keyword graph: {} nodes, {} edges",
			graph.nodes.len(),
			graph.edges.len()
		);
		graph
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node_index(&self, id: &NodeId) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
		self.edges.iter().filter_map(move |e| {
			if e.source == idx {
				Some(e.target)
			} else if e.target == idx {
				Some(e.source)
			} else {
				None
			}
		})
	}

	/// Number of edges touching each node.
	pub fn degrees(&self) -> Vec<usize> {
		let mut degrees = vec![0; self.nodes.len()];
		for edge in &self.edges {
			degrees[edge.source] += 1;
			degrees[edge.target] += 1;
		}
		degrees
	}

	fn upsert_node(
		&mut self,
		id: NodeId,
		name: &str,
		weight: f64,
		cluster: Option<ClusterTag>,
	) -> usize {
		if let Some(&idx) = self.index.get(&id) {
			// Duplicates sum their weight; the first name and cluster stick.
			self.nodes[idx].weight += weight;
			return idx;
		}
		let idx = self.nodes.len();
		self.index.insert(id.clone(), idx);
		self.nodes.push(Node {
			id,
			name: name.to_string(),
			weight,
			cluster,
			is_central: false,
		});
		idx
	}

	fn push_edge(
		&mut self,
		source: usize,
		target: usize,
		weight: Option<f64>,
		cluster: Option<ClusterTag>,
	) {
		if source == target {
			return;
		}
		self.edges.push(Edge {
			source,
			target,
			offset_index: 0,
			group_size: 1,
			weight,
			cluster,
		});
	}

	fn assign_edge_groups(&mut self) {
		let mut groups: HashMap<(usize, usize), usize> = HashMap::new();
		for edge in &mut self.edges {
			let seen = groups.entry(edge.group_key()).or_default();
			edge.offset_index = *seen;
			*seen += 1;
		}
		for edge in &mut self.edges {
			edge.group_size = groups.get(&edge.group_key()).copied().unwrap_or(1);
		}
	}
}

fn usable_weight(weight: Option<f64>) -> Option<f64> {
	weight.filter(|w| w.is_finite() && *w >= 0.0)
}

fn resolve_keyword(keyword: &KeywordInput) -> Option<(NodeId, &str, Option<f64>)> {
	match keyword {
		KeywordInput::Name(name) if !name.is_empty() => {
			Some((NodeId::Text(name.clone()), name.as_str(), None))
		}
		KeywordInput::Record(record) => match (&record.id, &record.name) {
			(Some(id), Some(name)) => Some((id.clone(), name.as_str(), record.count)),
			_ => None,
		},
		_ => None,
	}
}

fn from_clusters(set: &ClusterSet) -> Graph {
	let mut graph = Graph::default();

	if let Some(central) = &set.central {
		let weight = usable_weight(central.weight).unwrap_or(DEFAULT_WEIGHT);
		let idx = graph.upsert_node(central.id.clone(), &central.name, weight, None);
		graph.nodes[idx].is_central = true;
		graph.central = Some(idx);
	}

	for (slot, cluster) in set.clusters.iter().enumerate() {
		let Some(cluster_id) = cluster.id else {
			debug!("skipping cluster #{slot} without an id");
			continue;
		};
		let tag = ClusterTag {
			id: cluster_id,
			slot,
		};
		let default_weight = usable_weight(cluster.article_count).unwrap_or(DEFAULT_WEIGHT);

		let mut members: Vec<usize> = Vec::with_capacity(cluster.keywords.len());
		for keyword in &cluster.keywords {
			let Some((id, name, count)) = resolve_keyword(keyword) else {
				debug!("skipping malformed keyword in cluster {cluster_id}");
				continue;
			};
			if members.iter().any(|&m| graph.nodes[m].id == id) {
				continue;
			}
			let weight = usable_weight(count).unwrap_or(default_weight);
			members.push(graph.upsert_node(id, name, weight, Some(tag)));
		}

		if let Some(central) = graph.central {
			for &member in &members {
				graph.push_edge(central, member, None, Some(tag));
			}
			if members.contains(&central) {
				continue;
			}
		}

		for (i, &a) in members.iter().enumerate() {
			for &b in &members[i + 1..] {
				graph.push_edge(a, b, None, Some(tag));
			}
		}
	}

	graph.assign_edge_groups();
	graph
}

fn from_explicit(explicit: &ExplicitGraph) -> Graph {
	let mut graph = Graph::default();

	for node in &explicit.nodes {
		let (Some(id), Some(name)) = (&node.id, &node.name) else {
			debug!("skipping node without id or name");
			continue;
		};
		let weight = usable_weight(node.weight).unwrap_or(DEFAULT_WEIGHT);
		graph.upsert_node(id.clone(), name, weight, None);
	}

	for edge in &explicit.edges {
		let (Some(source), Some(target)) = (
			graph.node_index(&edge.source),
			graph.node_index(&edge.target),
		) else {
			debug!("dropping edge {} -> {}: unknown endpoint", edge.source, edge.target);
			continue;
		};
		let weight = edge
			.weight
			.filter(|w| w.is_finite())
			.map(|w| w.clamp(0.0, 1.0));
		graph.push_edge(source, target, weight, None);
	}

	graph.assign_edge_groups();
	graph
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::keyword_graph::types::{
		CentralKeyword, ClusterInput, EdgeInput, KeywordRecord, NodeInput,
	};

	fn cluster(id: i64, keywords: &[(i64, &str)]) -> ClusterInput {
		ClusterInput {
			id: Some(id),
			label: None,
			article_count: None,
			keywords: keywords
				.iter()
				.map(|&(kid, name)| KeywordInput::record(kid, name, None))
				.collect(),
		}
	}

	fn clusters(clusters: Vec<ClusterInput>) -> GraphInput {
		GraphInput::Clusters(ClusterSet {
			clusters,
			central: None,
		})
	}

	fn pairs(graph: &Graph) -> Vec<(String, String)> {
		graph
			.edges
			.iter()
			.map(|e| {
				(
					graph.nodes[e.source].name.clone(),
					graph.nodes[e.target].name.clone(),
				)
			})
			.collect()
	}

	#[test]
	fn single_cluster_links_every_pair() {
		let graph = Graph::build(&clusters(vec![cluster(0, &[(1, "A"), (2, "B"), (3, "C")])]));
		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(
			pairs(&graph),
			vec![
				("A".into(), "B".into()),
				("A".into(), "C".into()),
				("B".into(), "C".into()),
			]
		);
	}

	#[test]
	fn edge_count_is_sum_of_pair_counts() {
		let graph = Graph::build(&clusters(vec![
			cluster(0, &[(1, "a"), (2, "b"), (3, "c")]),
			cluster(1, &[(4, "d"), (5, "e"), (6, "f"), (7, "g")]),
			cluster(2, &[(8, "h")]),
		]));
		assert_eq!(graph.edges.len(), 3 + 6);
	}

	#[test]
	fn shared_keyword_is_one_node_with_summed_weight() {
		let mut first = cluster(10, &[(5, "Economy"), (1, "Rates")]);
		let mut second = cluster(11, &[(5, "Economy"), (2, "Jobs")]);
		first.keywords[0] = KeywordInput::record(5, "Economy", Some(3.0));
		second.keywords[0] = KeywordInput::record(5, "Economy (dup)", Some(2.0));
		let graph = Graph::build(&clusters(vec![first, second]));

		let economy: Vec<_> = graph.nodes.iter().filter(|n| n.id == NodeId::Int(5)).collect();
		assert_eq!(economy.len(), 1);
		assert_eq!(economy[0].weight, 5.0);
		assert_eq!(economy[0].name, "Economy");
		assert_eq!(economy[0].cluster.map(|c| c.id), Some(10));
	}

	#[test]
	fn parallel_edges_share_a_group() {
		let graph = Graph::build(&clusters(vec![
			cluster(0, &[(2, "x"), (7, "y")]),
			cluster(1, &[(7, "y"), (2, "x")]),
		]));
		assert_eq!(graph.edges.len(), 2);
		let (a, b) = (&graph.edges[0], &graph.edges[1]);
		assert_eq!(a.group_key(), b.group_key());
		assert_eq!((a.group_size, b.group_size), (2, 2));
		assert_eq!((a.offset_index, b.offset_index), (0, 1));
		assert_eq!(a.offset_sign(), -0.5);
		assert_eq!(b.offset_sign(), 0.5);
	}

	#[test]
	fn lone_edge_has_no_offset() {
		let graph = Graph::build(&clusters(vec![cluster(0, &[(1, "a"), (2, "b")])]));
		assert_eq!(graph.edges[0].group_size, 1);
		assert_eq!(graph.edges[0].offset_sign(), 0.0);
	}

	#[test]
	fn empty_input_builds_empty_graph() {
		let graph = Graph::build(&clusters(vec![]));
		assert!(graph.is_empty());
		assert!(graph.edges.is_empty());

		let graph = Graph::build(&GraphInput::default());
		assert!(graph.is_empty());
	}

	#[test]
	fn malformed_keywords_and_clusters_are_skipped() {
		let mut good = cluster(0, &[(1, "a"), (2, "b")]);
		good.keywords.push(KeywordInput::Record(KeywordRecord {
			id: Some(NodeId::Int(3)),
			name: None,
			count: None,
		}));
		good.keywords.push(KeywordInput::Record(KeywordRecord::default()));
		let mut no_id = cluster(0, &[(9, "z"), (8, "w")]);
		no_id.id = None;

		let graph = Graph::build(&clusters(vec![good, no_id]));
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.edges.len(), 1);
	}

	#[test]
	fn dangling_and_self_edges_are_dropped() {
		let input = GraphInput::Explicit(ExplicitGraph {
			nodes: vec![
				NodeInput {
					id: Some(NodeId::Int(1)),
					name: Some("a".into()),
					weight: None,
				},
				NodeInput {
					id: Some(NodeId::Int(2)),
					name: Some("b".into()),
					weight: Some(4.0),
				},
			],
			edges: vec![
				EdgeInput {
					source: NodeId::Int(1),
					target: NodeId::Int(2),
					weight: Some(1.7),
				},
				EdgeInput {
					source: NodeId::Int(1),
					target: NodeId::Int(99),
					weight: None,
				},
				EdgeInput {
					source: NodeId::Int(2),
					target: NodeId::Int(2),
					weight: None,
				},
			],
		});
		let graph = Graph::build(&input);
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(graph.edges[0].weight, Some(1.0));
		assert_eq!(graph.nodes[0].weight, DEFAULT_WEIGHT);
		assert_eq!(graph.nodes[1].weight, 4.0);
	}

	#[test]
	fn central_keyword_links_to_every_member() {
		let input = GraphInput::Clusters(ClusterSet {
			clusters: vec![
				cluster(0, &[(1, "a"), (2, "b")]),
				cluster(1, &[(3, "c")]),
			],
			central: Some(CentralKeyword {
				id: NodeId::Text("search".into()),
				name: "search".into(),
				weight: None,
			}),
		});
		let graph = Graph::build(&input);
		let central = graph.central.expect("central node");
		assert!(graph.nodes[central].is_central);

		let mut hub: Vec<_> = graph.neighbors(central).collect();
		hub.sort_unstable();
		assert_eq!(hub.len(), 3);
		// hub edges plus the single a-b pair
		assert_eq!(graph.edges.len(), 4);
	}

	#[test]
	fn cluster_containing_central_gets_hub_edges_only() {
		let input = GraphInput::Clusters(ClusterSet {
			clusters: vec![cluster(-1, &[(100, "root"), (1, "a"), (2, "b")])],
			central: Some(CentralKeyword {
				id: NodeId::Int(100),
				name: "root".into(),
				weight: Some(2.0),
			}),
		});
		let graph = Graph::build(&input);
		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(graph.edges.len(), 2);
		assert!(graph.edges.iter().all(|e| e.source == 0));
	}

	#[test]
	fn bare_keywords_take_cluster_article_count() {
		let input = GraphInput::from_json(
			r#"{"clusters": [
				{"cluster_id": 4, "num_articles": 3, "keywords": ["rates", "inflation"]},
				{"cluster_id": 5, "num_articles": 2, "keywords": ["rates", 17, "bonds"]}
			]}"#,
		)
		.expect("valid json");
		let graph = Graph::build(&input);
		let rates = graph.node_index(&"rates".into()).expect("rates node");
		assert_eq!(graph.nodes[rates].weight, 5.0);
		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(graph.edges.len(), 2);
	}

	#[test]
	fn json_explicit_shape_is_recognised() {
		let input = GraphInput::from_json(
			r#"{"nodes": [{"id": 1, "name": "a", "count": 2}, {"id": 2, "name": "b"}],
			    "edges": [{"source": 1, "target": 2, "weight": 0.4}]}"#,
		)
		.expect("valid json");
		assert!(matches!(input, GraphInput::Explicit(_)));
		let graph = Graph::build(&input);
		assert_eq!(graph.nodes[0].weight, 2.0);
		assert_eq!(graph.edges[0].weight, Some(0.4));
	}

	#[test]
	fn one_bad_cluster_keeps_the_good_ones() {
		for bad in [
			r#"{"cluster_id": "x", "keywords": ["c", "d"]}"#,
			r#"{"cluster_id": 2, "keywords": null}"#,
			r#""not a cluster""#,
		] {
			let json = format!(r#"{{"clusters": [{{"cluster_id": 1, "keywords": ["a", "b"]}}, {bad}]}}"#);
			let graph = Graph::build(&GraphInput::from_json(&json).expect("valid json"));
			assert_eq!(pairs(&graph), vec![("a".to_string(), "b".to_string())], "with {bad}");
		}
	}

	#[test]
	fn bad_explicit_nodes_and_edges_are_skipped() {
		let input = GraphInput::from_json(
			r#"{"nodes": [
					{"id": 1, "name": "a"},
					{"id": 2, "name": "b"},
					{"id": 3, "name": "c", "weight": "heavy"}
				],
				"edges": [
					{"source": 1, "target": 2, "weight": 0.5},
					{"source": 2},
					"1-3"
				]}"#,
		)
		.expect("valid json");
		assert!(matches!(input, GraphInput::Explicit(_)));
		let graph = Graph::build(&input);
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(pairs(&graph), vec![("a".to_string(), "b".to_string())]);
		assert_eq!(graph.edges[0].weight, Some(0.5));
	}
}
