//! Reusable view components.

pub mod keyword_graph;
