mod component;
mod error;
mod frame_loop;
mod geometry;
mod graph;
mod layout;
mod render;
mod state;
mod style;
mod types;

pub use component::KeywordGraphCanvas;
pub use error::SurfaceError;
pub use graph::{ClusterTag, Edge, Graph, Node};
pub use layout::{Centering, LayoutConfig, LayoutSnapshot, Simulation, SimulationState};
pub use types::{
	CentralKeyword, ClusterInput, ClusterSet, EdgeInput, ExplicitGraph, GraphInput, KeywordInput,
	KeywordRecord, NavTarget, NodeId, NodeInput,
};
