//! Mechanism topology: a directed graph of bodies and joints and its rooted
//! spanning tree.
//!
//! The graph and tree are generic over their vertex and edge handle types
//! (any [`GraphKey`](bounds::GraphKey)); mechanisms use
//! [`BodyId`](ids::BodyId) vertices and [`JointId`](ids::JointId) edges.

pub mod bounds;
pub mod cache;
pub mod graph;
pub mod ids;
pub mod spanning_tree;
pub mod tree_path;

pub use cache::InvalidateCache;
pub use graph::DirectedGraph;
pub use spanning_tree::{FrontierPolicy, SpanningTree};
pub use tree_path::{PathDirection, TreePath};
