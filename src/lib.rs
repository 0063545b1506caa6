#![cfg_attr(docsrs, feature(doc_cfg))]
//! # multibody-tree
//!
//! multibody-tree computes forward kinematics and composite inertia quantities
//! for articulated mechanisms: trees of rigid bodies connected by joints.
//!
//! ## Features
//! - An indexed directed graph over strongly typed body/joint handles, with a
//!   rooted spanning tree supporting ancestor, lowest-common-ancestor and path
//!   queries in O(depth)
//! - A closed set of joint variants (quaternion floating, prismatic, revolute,
//!   fixed) behind one kinematics trait, including exponential-coordinate
//!   charts for the floating joint
//! - A lazy, dependency-aware state cache: transforms to parent and root,
//!   twists with respect to the world, motion subspaces, spatial and composite
//!   rigid body inertias, each recomputed at most once per invalidation
//! - Mass matrix, kinetic energy and geometric Jacobian algorithms on top of
//!   the cache
//!
//! ## Conventions
//!
//! Spatial vectors put the angular part first. Every spatial quantity records
//! the frames it relates; mismatches are caught by `debug_assert!` inside the
//! spatial algebra and reported as [`MechanismError::FrameMismatch`] at the
//! public boundaries of [`mechanism`] and [`joint`].
//!
//! ## Determinism
//!
//! Random configurations take any `rand::Rng`; seed a `SmallRng` for
//! reproducible runs. Unit tests fix seeds explicitly.
//!
//! ## Invariant checking
//!
//! Structural invariants of graphs, trees and mechanisms are validated after
//! every mutation in debug builds, and in release builds with the
//! `check-invariants` feature (see [`DebugInvariants`]).

pub mod algs;
pub mod debug_invariants;
pub mod joint;
pub mod mechanism;
pub mod mechanism_error;
pub mod spatial;
pub mod topology;

pub use debug_invariants::DebugInvariants;
pub use mechanism_error::MechanismError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::{GeometricJacobian, geometric_jacobian, kinetic_energy, mass_matrix};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::joint::{
        Fixed, Joint, JointKinematics, JointType, Prismatic, QuaternionFloating, Revolute,
    };
    pub use crate::mechanism::{Mechanism, MechanismState, MechanismStateCache, RigidBody, StateVectors};
    pub use crate::mechanism_error::MechanismError;
    pub use crate::spatial::{
        CartesianFrame3D, MotionSubspace, SpatialAcceleration, SpatialInertia, Transform3D, Twist,
        Wrench,
    };
    pub use crate::topology::cache::InvalidateCache;
    pub use crate::topology::graph::DirectedGraph;
    pub use crate::topology::ids::{BodyId, JointId};
    pub use crate::topology::spanning_tree::{FrontierPolicy, SpanningTree};
    pub use crate::topology::tree_path::{PathDirection, TreePath};
}
