//! Mechanisms: rigid bodies connected by joints in a tree.
//!
//! A [`Mechanism`] owns a [`DirectedGraph`] whose vertices are bodies and whose
//! edges are joints, plus the [`SpanningTree`] rooted at the root body. Bodies
//! are attached one at a time to a body already in the mechanism, so the tree
//! edge order is always the attachment order (parent before child).
//!
//! Every frame of the mechanism is fixed to exactly one body: each body's
//! default frame, the before-frame of each joint (fixed to the joint's
//! predecessor) and any frame added with [`Mechanism::add_body_fixed_frame`].
//! The default frame of a non-root body is the after-frame of its joint to
//! the parent.
//!
//! The layout of the generalized coordinate vectors (joint order = tree edge
//! order) is computed lazily and dropped whenever the topology changes.

pub(crate) mod cache_element;
pub mod rigid_body;
pub mod state;
pub mod state_cache;

pub use rigid_body::RigidBody;
pub use state::{MechanismState, StateVectors};
pub use state_cache::MechanismStateCache;

use crate::debug_invariants::DebugInvariants;
use crate::joint::Joint;
use crate::mechanism_error::MechanismError;
use crate::spatial::{CartesianFrame3D, Scalar, Transform3D};
use crate::topology::cache::InvalidateCache;
use crate::topology::graph::DirectedGraph;
use crate::topology::ids::{BodyId, IdAllocator, JointId};
use crate::topology::spanning_tree::SpanningTree;
use crate::topology::tree_path::TreePath;
use hashbrown::HashMap;
use once_cell::sync::OnceCell;
use std::ops::Range;

/// Where each joint's coordinates live in the mechanism-wide `q` and `v`.
#[derive(Clone, Debug, Default)]
struct CoordinateLayout {
    q_ranges: HashMap<JointId, Range<usize>>,
    v_ranges: HashMap<JointId, Range<usize>>,
    num_positions: usize,
    num_velocities: usize,
}

#[derive(Clone, Debug)]
pub struct Mechanism<T: Scalar> {
    graph: DirectedGraph<BodyId, JointId>,
    tree: SpanningTree<BodyId, JointId>,
    bodies: HashMap<BodyId, RigidBody<T>>,
    joints: HashMap<JointId, Joint<T>>,
    frame_to_body: HashMap<CartesianFrame3D, BodyId>,
    body_ids: IdAllocator,
    joint_ids: IdAllocator,
    root_frame: CartesianFrame3D,
    layout: OnceCell<CoordinateLayout>,
}

fn check_inertia<T: Scalar>(body: &RigidBody<T>) -> Result<(), MechanismError> {
    match body.inertia() {
        Some(inertia) => inertia.frame.check(body.frame()),
        None => Ok(()),
    }
}

impl<T: Scalar> Mechanism<T> {
    /// A mechanism consisting of the root body alone. The root's default
    /// frame serves as the world frame.
    pub fn new(root: RigidBody<T>) -> Result<Self, MechanismError> {
        check_inertia(&root)?;
        let mut body_ids = IdAllocator::new();
        let root_id = BodyId::allocate(&mut body_ids);
        let mut graph = DirectedGraph::new();
        graph.add_vertex(root_id)?;
        let tree = SpanningTree::new(&graph, std::iter::empty())?;
        let root_frame = root.frame();
        let mut frame_to_body = HashMap::new();
        frame_to_body.insert(root_frame, root_id);
        let mut bodies = HashMap::new();
        bodies.insert(root_id, root);
        Ok(Self {
            graph,
            tree,
            bodies,
            joints: HashMap::new(),
            frame_to_body,
            body_ids,
            joint_ids: IdAllocator::new(),
            root_frame,
            layout: OnceCell::new(),
        })
    }

    /// Attaches `body` to `parent` through `joint`.
    ///
    /// `joint_to_parent` maps the joint's before-frame to the parent's default
    /// frame. The body's default frame must be the joint's after-frame, and
    /// its inertia (if any) must be expressed in that frame.
    ///
    /// # Errors
    /// [`MechanismError::UnknownBody`] for an unknown parent,
    /// [`MechanismError::FrameMismatch`] for inconsistent frames, and
    /// [`MechanismError::DuplicateFrame`] if one of the new frames already
    /// belongs to the mechanism. The mechanism is unchanged on error.
    pub fn attach(
        &mut self,
        parent: BodyId,
        joint: Joint<T>,
        joint_to_parent: Transform3D<T>,
        body: RigidBody<T>,
    ) -> Result<(JointId, BodyId), MechanismError> {
        let parent_frame = self.body(parent)?.frame();
        joint_to_parent.from.check(joint.frame_before())?;
        joint_to_parent.to.check(parent_frame)?;
        body.frame().check(joint.frame_after())?;
        check_inertia(&body)?;
        let new_frames = [joint.frame_before(), body.frame()];
        for (i, frame) in new_frames.iter().enumerate() {
            if self.frame_to_body.contains_key(frame) || new_frames[..i].contains(frame) {
                return Err(MechanismError::DuplicateFrame(frame.to_string()));
            }
        }

        let body_id = BodyId::allocate(&mut self.body_ids);
        let joint_id = JointId::allocate(&mut self.joint_ids);
        self.graph.add_edge(parent, body_id, joint_id)?;
        self.tree.push_edge(joint_id, parent, body_id)?;
        if let Some(p) = self.bodies.get_mut(&parent) {
            p.push_frame_definition(joint_to_parent);
        }
        self.frame_to_body.insert(joint.frame_before(), parent);
        self.frame_to_body.insert(body.frame(), body_id);
        log::debug!(
            "attached body `{}` ({body_id}) to {parent} via joint `{}` ({joint_id})",
            body.name(),
            joint.name()
        );
        self.bodies.insert(body_id, body);
        self.joints.insert(joint_id, joint);
        self.invalidate_cache();
        self.debug_assert_invariants();
        Ok((joint_id, body_id))
    }

    /// Fixes a new frame to `body`; `tf` maps the new frame (`tf.from`) to
    /// the body's default frame.
    pub fn add_body_fixed_frame(
        &mut self,
        body: BodyId,
        tf: Transform3D<T>,
    ) -> Result<(), MechanismError> {
        let frame = self.body(body)?.frame();
        tf.to.check(frame)?;
        if self.frame_to_body.contains_key(&tf.from) {
            return Err(MechanismError::DuplicateFrame(tf.from.to_string()));
        }
        self.frame_to_body.insert(tf.from, body);
        if let Some(b) = self.bodies.get_mut(&body) {
            b.push_frame_definition(tf);
        }
        Ok(())
    }

    #[inline]
    pub fn root_body(&self) -> BodyId {
        self.tree.root()
    }

    /// World frame (the root body's default frame).
    #[inline]
    pub fn root_frame(&self) -> CartesianFrame3D {
        self.root_frame
    }

    /// Bodies in tree order (root first, parents before children).
    #[inline]
    pub fn bodies(&self) -> &[BodyId] {
        self.tree.vertices()
    }

    /// Joints in tree order.
    #[inline]
    pub fn joints(&self) -> &[JointId] {
        self.tree.edges()
    }

    #[inline]
    pub fn num_bodies(&self) -> usize {
        self.bodies.len()
    }

    #[inline]
    pub fn num_joints(&self) -> usize {
        self.joints.len()
    }

    pub fn body(&self, id: BodyId) -> Result<&RigidBody<T>, MechanismError> {
        self.bodies
            .get(&id)
            .ok_or_else(|| MechanismError::UnknownBody(id.to_string()))
    }

    pub fn joint(&self, id: JointId) -> Result<&Joint<T>, MechanismError> {
        self.joints
            .get(&id)
            .ok_or_else(|| MechanismError::UnknownJoint(id.to_string()))
    }

    /// First body (in tree order) called `name`.
    pub fn find_body(&self, name: &str) -> Option<BodyId> {
        self.bodies()
            .iter()
            .copied()
            .find(|b| self.bodies.get(b).is_some_and(|body| body.name() == name))
    }

    /// First joint (in tree order) called `name`.
    pub fn find_joint(&self, name: &str) -> Option<JointId> {
        self.joints()
            .iter()
            .copied()
            .find(|j| self.joints.get(j).is_some_and(|joint| joint.name() == name))
    }

    pub fn parent(&self, body: BodyId) -> Result<Option<BodyId>, MechanismError> {
        self.body(body)?;
        self.tree.parent(body)
    }

    pub fn children(&self, body: BodyId) -> Result<Vec<BodyId>, MechanismError> {
        self.body(body)?;
        Ok(self.tree.children(body)?.collect())
    }

    /// Joint connecting `body` to its parent; `None` for the root.
    pub fn joint_to_parent(&self, body: BodyId) -> Result<Option<JointId>, MechanismError> {
        self.body(body)?;
        self.tree.edge_to_parent(body)
    }

    /// Body the joint's before-frame is fixed to.
    pub fn predecessor(&self, joint: JointId) -> Result<BodyId, MechanismError> {
        self.joint(joint)?;
        self.graph.source(joint)
    }

    /// Body whose default frame is the joint's after-frame.
    pub fn successor(&self, joint: JointId) -> Result<BodyId, MechanismError> {
        self.joint(joint)?;
        self.graph.target(joint)
    }

    /// Unique tree path between two bodies.
    pub fn path(&self, from: BodyId, to: BodyId) -> Result<TreePath<BodyId, JointId>, MechanismError> {
        self.body(from)?;
        self.body(to)?;
        self.tree.path(from, to)
    }

    /// Body that `frame` is fixed to.
    pub fn body_fixed_frame_to_body(&self, frame: CartesianFrame3D) -> Result<BodyId, MechanismError> {
        self.frame_to_body
            .get(&frame)
            .copied()
            .ok_or_else(|| MechanismError::UnknownFrame(frame.to_string()))
    }

    /// Transform from `frame` to the default frame of the body it is fixed to.
    pub fn frame_definition(&self, frame: CartesianFrame3D) -> Result<Transform3D<T>, MechanismError> {
        let body = self.body_fixed_frame_to_body(frame)?;
        self.body(body)?
            .frame_definition(frame)
            .ok_or_else(|| MechanismError::UnknownFrame(frame.to_string()))
    }

    #[inline]
    pub fn graph(&self) -> &DirectedGraph<BodyId, JointId> {
        &self.graph
    }

    #[inline]
    pub fn tree(&self) -> &SpanningTree<BodyId, JointId> {
        &self.tree
    }

    fn layout(&self) -> &CoordinateLayout {
        self.layout.get_or_init(|| {
            let mut layout = CoordinateLayout::default();
            for (id, joint) in self
                .joints()
                .iter()
                .filter_map(|j| self.joints.get(j).map(|joint| (*j, joint)))
            {
                let (nq, nv) = (joint.num_positions(), joint.num_velocities());
                layout
                    .q_ranges
                    .insert(id, layout.num_positions..layout.num_positions + nq);
                layout
                    .v_ranges
                    .insert(id, layout.num_velocities..layout.num_velocities + nv);
                layout.num_positions += nq;
                layout.num_velocities += nv;
            }
            log::trace!(
                "coordinate layout: {} positions, {} velocities",
                layout.num_positions,
                layout.num_velocities
            );
            layout
        })
    }

    /// Length of the mechanism-wide configuration vector `q`.
    pub fn num_positions(&self) -> usize {
        self.layout().num_positions
    }

    /// Length of the mechanism-wide velocity vector `v`.
    pub fn num_velocities(&self) -> usize {
        self.layout().num_velocities
    }

    /// Slice of `q` holding the joint's configuration.
    pub fn configuration_range(&self, joint: JointId) -> Result<Range<usize>, MechanismError> {
        self.layout()
            .q_ranges
            .get(&joint)
            .cloned()
            .ok_or_else(|| MechanismError::UnknownJoint(joint.to_string()))
    }

    /// Slice of `v` holding the joint's velocity.
    pub fn velocity_range(&self, joint: JointId) -> Result<Range<usize>, MechanismError> {
        self.layout()
            .v_ranges
            .get(&joint)
            .cloned()
            .ok_or_else(|| MechanismError::UnknownJoint(joint.to_string()))
    }
}

impl<T: Scalar> InvalidateCache for Mechanism<T> {
    fn invalidate_cache(&mut self) {
        self.layout.take();
    }
}

impl<T: Scalar> DebugInvariants for Mechanism<T> {
    fn validate_invariants(&self) -> Result<(), MechanismError> {
        self.graph.validate_invariants()?;
        self.tree.validate_invariants()?;
        if self.tree.num_vertices() != self.bodies.len() {
            return Err(MechanismError::WrongTreeEdgeCount {
                expected: self.bodies.len().saturating_sub(1),
                found: self.tree.num_edges(),
            });
        }
        for (&id, body) in &self.bodies {
            for frame in body.frames() {
                if self.frame_to_body.get(&frame) != Some(&id) {
                    return Err(MechanismError::UnknownFrame(frame.to_string()));
                }
            }
        }
        for &j in self.joints() {
            let joint = self.joint(j)?;
            let pred = self.body(self.graph.source(j)?)?;
            let succ = self.body(self.graph.target(j)?)?;
            if pred.frame_definition(joint.frame_before()).is_none() {
                return Err(MechanismError::UnknownFrame(joint.frame_before().to_string()));
            }
            succ.frame().check(joint.frame_after())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Mechanism, RigidBody};
    use crate::joint::{Fixed, Joint, QuaternionFloating, Revolute};
    use crate::mechanism_error::MechanismError;
    use crate::spatial::{CartesianFrame3D, Transform3D};
    use nalgebra::Vector3;

    fn attach_revolute(
        m: &mut Mechanism<f64>,
        parent: crate::topology::ids::BodyId,
        name: &str,
    ) -> (crate::topology::ids::JointId, crate::topology::ids::BodyId) {
        let joint = Joint::new(name, Revolute::new(Vector3::z()));
        let parent_frame = m.body(parent).unwrap().frame();
        let to_parent = Transform3D::from_translation(
            joint.frame_before(),
            parent_frame,
            Vector3::new(0.0, 0.0, 1.0),
        );
        let body = RigidBody::with_frame(format!("{name}_link"), joint.frame_after());
        m.attach(parent, joint, to_parent, body).unwrap()
    }

    #[test]
    fn layout_follows_tree_order() {
        let mut m = Mechanism::new(RigidBody::new("world")).unwrap();
        let root = m.root_body();
        let floating = Joint::new("base", QuaternionFloating);
        let base = RigidBody::with_frame("base", floating.frame_after());
        let tf = Transform3D::identity(floating.frame_before(), m.root_frame());
        let (j0, b0) = m.attach(root, floating, tf, base).unwrap();
        assert_eq!((m.num_positions(), m.num_velocities()), (7, 6));
        let (j1, b1) = attach_revolute(&mut m, b0, "shoulder");
        assert_eq!((m.num_positions(), m.num_velocities()), (8, 7));
        assert_eq!(m.configuration_range(j0).unwrap(), 0..7);
        assert_eq!(m.configuration_range(j1).unwrap(), 7..8);
        assert_eq!(m.velocity_range(j1).unwrap(), 6..7);
        assert_eq!(m.bodies(), &[root, b0, b1]);
        assert_eq!(m.parent(b1).unwrap(), Some(b0));
        assert_eq!(m.joint_to_parent(b1).unwrap(), Some(j1));
        assert_eq!(m.predecessor(j1).unwrap(), b0);
        assert_eq!(m.successor(j1).unwrap(), b1);
        assert_eq!(m.find_joint("shoulder"), Some(j1));
        assert_eq!(m.find_body("shoulder_link"), Some(b1));
    }

    #[test]
    fn attach_rejects_inconsistent_frames() {
        let mut m = Mechanism::<f64>::new(RigidBody::new("world")).unwrap();
        let root = m.root_body();
        let joint = Joint::new("weld", Fixed);
        let tf = Transform3D::identity(joint.frame_before(), m.root_frame());
        let stranger = RigidBody::new("stranger");
        assert!(matches!(
            m.attach(root, joint.clone(), tf, stranger),
            Err(MechanismError::FrameMismatch { .. })
        ));
        assert_eq!(m.num_bodies(), 1);

        let reused = RigidBody::with_frame("reused", m.root_frame());
        let joint = Joint::with_frames("weld", Fixed, CartesianFrame3D::new(), m.root_frame());
        let tf = Transform3D::identity(joint.frame_before(), m.root_frame());
        assert!(matches!(
            m.attach(root, joint, tf, reused),
            Err(MechanismError::DuplicateFrame(_))
        ));
    }

    #[test]
    fn body_fixed_frames() {
        let mut m = Mechanism::<f64>::new(RigidBody::new("world")).unwrap();
        let root = m.root_body();
        let (j, b) = attach_revolute(&mut m, root, "elbow");
        let marker = CartesianFrame3D::new();
        let body_frame = m.body(b).unwrap().frame();
        m.add_body_fixed_frame(b, Transform3D::from_translation(marker, body_frame, Vector3::x()))
            .unwrap();
        assert_eq!(m.body_fixed_frame_to_body(marker).unwrap(), b);
        let before = m.joint(j).unwrap().frame_before();
        assert_eq!(m.body_fixed_frame_to_body(before).unwrap(), m.root_body());
        assert!(matches!(
            m.add_body_fixed_frame(b, Transform3D::identity(marker, body_frame)),
            Err(MechanismError::DuplicateFrame(_))
        ));
        assert!(matches!(
            m.body_fixed_frame_to_body(CartesianFrame3D::new()),
            Err(MechanismError::UnknownFrame(_))
        ));
    }

    #[test]
    fn root_frame_is_the_root_body_frame() {
        let world = RigidBody::<f64>::new("world");
        let world_frame = world.frame();
        let mut m = Mechanism::new(world).unwrap();
        assert_eq!(m.root_frame(), world_frame);
        let root = m.root_body();
        let (_, b) = attach_revolute(&mut m, root, "hip");
        attach_revolute(&mut m, b, "knee");
        assert_eq!(m.root_frame(), world_frame);
        assert_eq!(m.root_frame(), m.body(m.root_body()).unwrap().frame());
        assert_eq!(m.clone().root_frame(), world_frame);
    }
}
