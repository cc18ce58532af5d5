use std::fmt;

use log::debug;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Identifier of a keyword node. Upstream services send either numeric ids
/// or the keyword text itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
	Int(i64),
	Text(String),
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			NodeId::Int(id) => write!(f, "{id}"),
			NodeId::Text(id) => f.write_str(id),
		}
	}
}

impl From<i64> for NodeId {
	fn from(id: i64) -> Self {
		NodeId::Int(id)
	}
}

impl From<&str> for NodeId {
	fn from(id: &str) -> Self {
		NodeId::Text(id.to_string())
	}
}

/// A list element or optional value that may not have the expected shape.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
	Valid(T),
	Malformed(IgnoredAny),
}

/// Keeps the well-formed elements of a list. A value that is not a list at
/// all reads as empty.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	let items = match Lenient::<Vec<Lenient<T>>>::deserialize(deserializer)? {
		Lenient::Valid(items) => items,
		Lenient::Malformed(_) => {
			debug!("expected a list, reading it as empty");
			return Ok(Vec::new());
		}
	};
	let total = items.len();
	let kept: Vec<T> = items
		.into_iter()
		.filter_map(|item| match item {
			Lenient::Valid(item) => Some(item),
			Lenient::Malformed(_) => None,
		})
		.collect();
	if kept.len() < total {
		debug!("skipped {} malformed list element(s)", total - kept.len());
	}
	Ok(kept)
}

fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	Ok(match Option::<Lenient<T>>::deserialize(deserializer)? {
		Some(Lenient::Valid(value)) => Some(value),
		Some(Lenient::Malformed(_)) => {
			debug!("skipping malformed optional value");
			None
		}
		None => None,
	})
}

/// A keyword record as sent by the cluster endpoints.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct KeywordRecord {
	#[serde(default)]
	pub id: Option<NodeId>,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub count: Option<f64>,
}

/// One entry of a cluster's keyword list.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum KeywordInput {
	/// Bare keyword text, used as both id and label.
	Name(String),
	Record(KeywordRecord),
	/// Anything else the upstream sent; skipped by the builder.
	Malformed(IgnoredAny),
}

impl KeywordInput {
	pub fn record(id: i64, name: &str, count: Option<f64>) -> Self {
		KeywordInput::Record(KeywordRecord {
			id: Some(NodeId::Int(id)),
			name: Some(name.to_string()),
			count,
		})
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ClusterInput {
	#[serde(default, alias = "cluster_id")]
	pub id: Option<i64>,
	#[serde(default)]
	pub label: Option<String>,
	/// Articles in the cluster; default weight for keywords without a count.
	#[serde(default, alias = "num_articles")]
	pub article_count: Option<f64>,
	#[serde(default, deserialize_with = "lenient_list")]
	pub keywords: Vec<KeywordInput>,
}

/// The searched keyword a related-keyword graph revolves around.
#[derive(Clone, Debug, Deserialize)]
pub struct CentralKeyword {
	pub id: NodeId,
	pub name: String,
	#[serde(default)]
	pub weight: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ClusterSet {
	/// Required: its presence alone selects the cluster shape.
	#[serde(deserialize_with = "lenient_list")]
	pub clusters: Vec<ClusterInput>,
	#[serde(default, deserialize_with = "lenient_option")]
	pub central: Option<CentralKeyword>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NodeInput {
	#[serde(default)]
	pub id: Option<NodeId>,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default, alias = "count")]
	pub weight: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EdgeInput {
	pub source: NodeId,
	pub target: NodeId,
	#[serde(default)]
	pub weight: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ExplicitGraph {
	#[serde(default, deserialize_with = "lenient_list")]
	pub nodes: Vec<NodeInput>,
	#[serde(default, deserialize_with = "lenient_list")]
	pub edges: Vec<EdgeInput>,
}

/// Either shape the renderer accepts. Resolved once by [`Graph::build`](super::graph::Graph::build).
///
/// An object with a `clusters` key is always the cluster shape; malformed
/// elements inside either shape are dropped one by one.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum GraphInput {
	Clusters(ClusterSet),
	Explicit(ExplicitGraph),
}

impl Default for GraphInput {
	fn default() -> Self {
		GraphInput::Clusters(ClusterSet::default())
	}
}

impl GraphInput {
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}
}

/// What a click on the graph asks the surrounding app to open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavTarget {
	Keyword(NodeId),
	Cluster(i64),
}

impl NavTarget {
	/// Route of the detail view for this target.
	pub fn path(&self) -> String {
		match self {
			NavTarget::Keyword(id) => format!("/keywords/{id}"),
			NavTarget::Cluster(id) => format!("/clusters/{id}"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keyword_entries_accept_strings_records_and_junk() {
		let keywords: Vec<KeywordInput> =
			serde_json::from_str(r#"["AI", {"id": 3, "name": "chips", "count": 2}, {"name": "no id"}, 42, null]"#)
				.expect("valid json");
		assert!(matches!(&keywords[0], KeywordInput::Name(n) if n == "AI"));
		assert!(matches!(&keywords[1], KeywordInput::Record(r) if r.id == Some(NodeId::Int(3))));
		assert!(matches!(&keywords[2], KeywordInput::Record(r) if r.id.is_none()));
		assert!(matches!(keywords[3], KeywordInput::Malformed(_)));
		assert!(matches!(keywords[4], KeywordInput::Malformed(_)));
	}

	#[test]
	fn empty_object_is_an_empty_explicit_graph() {
		let input = GraphInput::from_json("{}").expect("valid json");
		assert!(matches!(input, GraphInput::Explicit(g) if g.nodes.is_empty() && g.edges.is_empty()));
	}

	#[test]
	fn clusters_key_selects_the_cluster_shape() {
		for json in [
			r#"{"clusters": null}"#,
			r#"{"clusters": [1, "x", {"cluster_id": "x"}]}"#,
			r#"{"clusters": [], "central": {"id": 1}}"#,
		] {
			let input = GraphInput::from_json(json).expect("valid json");
			assert!(
				matches!(&input, GraphInput::Clusters(set) if set.clusters.is_empty() && set.central.is_none()),
				"{json} parsed as {input:?}"
			);
		}
	}

	#[test]
	fn malformed_elements_are_dropped_individually() {
		let input = GraphInput::from_json(
			r#"{"clusters": [
				{"cluster_id": 1, "keywords": ["a", "b"]},
				{"cluster_id": "x", "keywords": ["c", "d"]},
				{"cluster_id": 2, "keywords": null}
			]}"#,
		)
		.expect("valid json");
		let GraphInput::Clusters(set) = input else {
			panic!("expected clusters");
		};
		assert_eq!(set.clusters.len(), 2);
		assert_eq!(set.clusters[0].keywords.len(), 2);
		assert!(set.clusters[1].keywords.is_empty());
	}

	#[test]
	fn targets_route_to_detail_views() {
		assert_eq!(NavTarget::Keyword(NodeId::Int(5)).path(), "/keywords/5");
		assert_eq!(NavTarget::Keyword("금리".into()).path(), "/keywords/금리");
		assert_eq!(NavTarget::Cluster(12).path(), "/clusters/12");
	}
}
