//! MechanismError: Unified error type for multibody-tree public APIs
//!
//! Structural precondition failures (duplicate handles, removing a connected
//! vertex, malformed spanning trees, unknown frames/bodies/joints) are reported
//! through this type. The structure being mutated is left untouched whenever an
//! operation returns an error.

use thiserror::Error;

/// Unified error type for graph, tree, joint and mechanism operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MechanismError {
    /// The vertex is already a member of the graph.
    #[error("Graph error: vertex `{0}` is already a member of the graph")]
    DuplicateVertex(String),
    /// The edge is already a member of the graph.
    #[error("Graph error: edge `{0}` is already a member of the graph")]
    DuplicateEdge(String),
    /// The vertex is not a member of the graph.
    #[error("Graph error: vertex `{0}` is not a member of the graph")]
    MissingVertex(String),
    /// The edge is not a member of the graph.
    #[error("Graph error: edge `{0}` is not a member of the graph")]
    MissingEdge(String),
    /// A vertex can only be removed once it has no incident edges.
    #[error("Graph error: vertex `{vertex}` still has {in_edges} in-edge(s) and {out_edges} out-edge(s)")]
    VertexHasIncidentEdges {
        vertex: String,
        in_edges: usize,
        out_edges: usize,
    },
    /// A spanning tree over `n` vertices needs exactly `n - 1` edges.
    #[error("Spanning tree error: expected {expected} edges, got {found}")]
    WrongTreeEdgeCount { expected: usize, found: usize },
    /// A tree edge was listed before any edge reaching its source vertex.
    #[error("Spanning tree error: source of edge `{0}` is not yet part of the tree")]
    TreeEdgeOutOfOrder(String),
    /// A tree edge targets a vertex that already has a parent.
    #[error("Spanning tree error: target of edge `{0}` already has a parent in the tree")]
    TreeEdgeRevisitsVertex(String),
    /// The vertex or edge is not part of the spanning tree.
    #[error("Spanning tree error: `{0}` is not part of the tree")]
    NotInTree(String),
    /// Graph has no vertices to root a tree at.
    #[error("Spanning tree error: graph has no vertices")]
    EmptyGraph,
    /// Frames of two spatial quantities do not line up.
    #[error("Frame mismatch: expected frame {expected}, found {found}")]
    FrameMismatch { expected: String, found: String },
    /// The frame is already attached to a body of the mechanism.
    #[error("Mechanism error: frame {0} is already attached to a body")]
    DuplicateFrame(String),
    /// The frame is not known to the mechanism.
    #[error("Mechanism error: unknown frame {0}")]
    UnknownFrame(String),
    /// The body is not part of the mechanism.
    #[error("Mechanism error: unknown body `{0}`")]
    UnknownBody(String),
    /// The joint is not part of the mechanism.
    #[error("Mechanism error: unknown joint `{0}`")]
    UnknownJoint(String),
    /// A coordinate vector has the wrong length.
    #[error("Dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}

impl MechanismError {
    pub(crate) fn dims(what: &'static str, expected: usize, found: usize) -> Self {
        MechanismError::DimensionMismatch {
            what,
            expected,
            found,
        }
    }
}
