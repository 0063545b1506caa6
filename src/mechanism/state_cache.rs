//! Lazily recomputed kinematic quantities of a mechanism state.
//!
//! [`MechanismStateCache`] holds one memoized element per
//!
//! * frame: transform to its parent frame and transform to the root frame,
//! * body: twist with respect to the world, spatial inertia and composite
//!   rigid body inertia (all expressed in the root frame),
//! * joint: motion subspace (expressed in the root frame).
//!
//! Each element stores a small computation descriptor naming the elements it
//! depends on by index. Reading a dirty element reads its dependencies first
//! (recomputing those that are dirty), so one read may cascade up the tree but
//! computes every element at most once per invalidation. Elements whose inputs
//! never change with the state (constant frame offsets, the root frame, bodies
//! without inertia, subtrees welded to the root) are immutable and survive
//! [`MechanismStateCache::set_dirty`].
//!
//! All recomputations take the current [`StateVectors`] explicitly.

use super::Mechanism;
use super::cache_element::CacheElement;
use super::state::StateVectors;
use crate::joint::{JointKinematics, JointType};
use crate::mechanism_error::MechanismError;
use crate::spatial::{
    CartesianFrame3D, MotionSubspace, Scalar, SpatialInertia, Transform3D, Twist,
};
use crate::topology::cache::InvalidateCache;
use crate::topology::ids::{BodyId, JointId};
use hashbrown::HashMap;
use nalgebra::Matrix3xX;
use std::ops::Range;

/// Static data of a joint, copied out of the mechanism at build time.
#[derive(Clone, Debug)]
pub(crate) struct JointEntry<T: Scalar> {
    pub(crate) id: JointId,
    pub(crate) joint_type: JointType<T>,
    pub(crate) before: CartesianFrame3D,
    pub(crate) after: CartesianFrame3D,
    /// Default frame of the predecessor body.
    pub(crate) parent_frame: CartesianFrame3D,
    /// Frame slot of `after`.
    pub(crate) after_slot: usize,
    pub(crate) q_range: Range<usize>,
    pub(crate) v_range: Range<usize>,
}

#[derive(Clone, Debug)]
struct Slot<V, C> {
    element: CacheElement<V>,
    computation: C,
}

impl<V, C> Slot<V, C> {
    fn new(placeholder: V, mutable: bool, computation: C) -> Self {
        Self {
            element: CacheElement::new(placeholder, mutable),
            computation,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum ToParent<T: Scalar> {
    /// Constant offset (a frame definition, or identity for the root frame).
    Fixed(Transform3D<T>),
    /// Joint transform of the joint at this index.
    Joint(usize),
}

#[derive(Copy, Clone, Debug)]
enum ToRoot {
    Root,
    /// `to_root(parent) * to_parent(self)`
    Compose { parent: usize },
}

#[derive(Copy, Clone, Debug)]
enum TwistComputation {
    Root,
    /// Parent body's twist plus the joint twist, in the root frame.
    Joint { parent: usize, joint: usize },
}

#[derive(Copy, Clone, Debug)]
enum InertiaComputation<T: Scalar> {
    Zero,
    /// Body inertia moved through the frame's transform to root.
    Transformed { local: SpatialInertia<T>, frame: usize },
}

/// Per-state memoized kinematics of a [`Mechanism`].
#[derive(Clone, Debug)]
pub struct MechanismStateCache<T: Scalar> {
    root_frame: CartesianFrame3D,
    num_positions: usize,
    num_velocities: usize,
    frame_slots: HashMap<CartesianFrame3D, usize>,
    body_slots: HashMap<BodyId, usize>,
    joint_slots: HashMap<JointId, usize>,
    joints: Vec<JointEntry<T>>,
    /// Body slots of each body's children.
    body_children: Vec<Vec<usize>>,
    to_parent: Vec<Slot<Transform3D<T>, ToParent<T>>>,
    to_root: Vec<Slot<Transform3D<T>, ToRoot>>,
    twists: Vec<Slot<Twist<T>, TwistComputation>>,
    /// Indexed like `joints`.
    motion_subspaces: Vec<CacheElement<MotionSubspace<T>>>,
    inertias: Vec<Slot<SpatialInertia<T>, InertiaComputation<T>>>,
    /// Indexed like `body_children`.
    crb_inertias: Vec<CacheElement<SpatialInertia<T>>>,
}

impl<T: Scalar> MechanismStateCache<T> {
    /// Wires one element per frame, body and joint of `mechanism`, walking
    /// its spanning tree parent before child.
    pub fn new(mechanism: &Mechanism<T>) -> Result<Self, MechanismError> {
        let root_frame = mechanism.root_frame();
        let mut cache = Self {
            root_frame,
            num_positions: mechanism.num_positions(),
            num_velocities: mechanism.num_velocities(),
            frame_slots: HashMap::new(),
            body_slots: HashMap::new(),
            joint_slots: HashMap::new(),
            joints: Vec::with_capacity(mechanism.num_joints()),
            body_children: Vec::with_capacity(mechanism.num_bodies()),
            to_parent: Vec::new(),
            to_root: Vec::new(),
            twists: Vec::with_capacity(mechanism.num_bodies()),
            motion_subspaces: Vec::with_capacity(mechanism.num_joints()),
            inertias: Vec::with_capacity(mechanism.num_bodies()),
            crb_inertias: Vec::with_capacity(mechanism.num_bodies()),
        };

        for (slot, &body_id) in mechanism.bodies().iter().enumerate() {
            let body = mechanism.body(body_id)?;
            cache.body_slots.insert(body_id, slot);
            cache.body_children.push(Vec::new());

            let frame = body.frame();
            let frame_slot = match mechanism.joint_to_parent(body_id)? {
                None => {
                    cache.twists.push(Slot::new(
                        Twist::zero(frame, frame, frame),
                        false,
                        TwistComputation::Root,
                    ));
                    cache.push_frame(
                        frame,
                        ToParent::Fixed(Transform3D::identity(frame, frame)),
                        ToRoot::Root,
                    )
                }
                Some(joint_id) => {
                    let joint = mechanism.joint(joint_id)?;
                    let parent = mechanism.predecessor(joint_id)?;
                    let parent_slot = cache.body_slot(parent)?;
                    cache.body_children[parent_slot].push(slot);
                    let before_slot = cache.frame_slot(joint.frame_before())?;
                    let j = cache.joints.len();
                    let after_slot = cache.to_parent.len();
                    cache.joint_slots.insert(joint_id, j);
                    cache.joints.push(JointEntry {
                        id: joint_id,
                        joint_type: joint.joint_type().clone(),
                        before: joint.frame_before(),
                        after: joint.frame_after(),
                        parent_frame: mechanism.body(parent)?.frame(),
                        after_slot,
                        q_range: mechanism.configuration_range(joint_id)?,
                        v_range: mechanism.velocity_range(joint_id)?,
                    });
                    cache.push_frame(frame, ToParent::Joint(j), ToRoot::Compose { parent: before_slot });

                    let to_root_mutable = cache.to_root[after_slot].element.is_mutable();
                    let twist_mutable = cache.twists[parent_slot].element.is_mutable()
                        || joint.num_velocities() > 0;
                    cache.twists.push(Slot::new(
                        Twist::zero(frame, root_frame, root_frame),
                        twist_mutable,
                        TwistComputation::Joint {
                            parent: parent_slot,
                            joint: j,
                        },
                    ));
                    let n = joint.num_velocities();
                    cache.motion_subspaces.push(CacheElement::new(
                        MotionSubspace::new(
                            joint.frame_after(),
                            joint.frame_before(),
                            root_frame,
                            Matrix3xX::zeros(n),
                            Matrix3xX::zeros(n),
                        ),
                        to_root_mutable,
                    ));
                    after_slot
                }
            };

            let inertia = match body.inertia() {
                Some(local) => Slot::new(
                    SpatialInertia::zero(root_frame),
                    cache.to_root[frame_slot].element.is_mutable(),
                    InertiaComputation::Transformed {
                        local: *local,
                        frame: frame_slot,
                    },
                ),
                None => Slot::new(SpatialInertia::zero(root_frame), false, InertiaComputation::Zero),
            };
            cache.inertias.push(inertia);

            for def in body.frame_definitions() {
                cache.push_frame(def.from, ToParent::Fixed(*def), ToRoot::Compose { parent: frame_slot });
            }
        }

        // children come after their parent in tree order
        let mut crb_mutable = vec![false; cache.inertias.len()];
        for b in (0..cache.inertias.len()).rev() {
            crb_mutable[b] = cache.inertias[b].element.is_mutable()
                || cache.body_children[b].iter().any(|&c| crb_mutable[c]);
        }
        cache.crb_inertias = crb_mutable
            .into_iter()
            .map(|m| CacheElement::new(SpatialInertia::zero(root_frame), m))
            .collect();

        log::debug!(
            "state cache built: {} frames, {} bodies, {} joints ({} elements)",
            cache.to_root.len(),
            cache.twists.len(),
            cache.joints.len(),
            cache.num_elements()
        );
        Ok(cache)
    }

    fn push_frame(&mut self, frame: CartesianFrame3D, to_parent: ToParent<T>, to_root: ToRoot) -> usize {
        let slot = self.to_parent.len();
        let parent_mutable = match to_parent {
            ToParent::Fixed(_) => false,
            ToParent::Joint(j) => self.joints[j].joint_type.num_positions() > 0,
        };
        let root_mutable = match to_root {
            ToRoot::Root => false,
            ToRoot::Compose { parent } => {
                parent_mutable || self.to_root[parent].element.is_mutable()
            }
        };
        let placeholder = Transform3D::identity(frame, frame);
        self.to_parent
            .push(Slot::new(placeholder, parent_mutable, to_parent));
        self.to_root
            .push(Slot::new(placeholder, root_mutable, to_root));
        self.frame_slots.insert(frame, slot);
        slot
    }

    fn frame_slot(&self, frame: CartesianFrame3D) -> Result<usize, MechanismError> {
        self.frame_slots
            .get(&frame)
            .copied()
            .ok_or_else(|| MechanismError::UnknownFrame(frame.to_string()))
    }

    fn body_slot(&self, body: BodyId) -> Result<usize, MechanismError> {
        self.body_slots
            .get(&body)
            .copied()
            .ok_or_else(|| MechanismError::UnknownBody(body.to_string()))
    }

    fn joint_slot(&self, joint: JointId) -> Result<usize, MechanismError> {
        self.joint_slots
            .get(&joint)
            .copied()
            .ok_or_else(|| MechanismError::UnknownJoint(joint.to_string()))
    }

    /// `q` and `v` must match the coordinate layout the cache was built for.
    fn check_state(&self, state: &StateVectors<T>) -> Result<(), MechanismError> {
        if state.q().len() != self.num_positions {
            return Err(MechanismError::dims("configuration", self.num_positions, state.q().len()));
        }
        if state.v().len() != self.num_velocities {
            return Err(MechanismError::dims("velocity", self.num_velocities, state.v().len()));
        }
        Ok(())
    }

    pub(crate) fn joint_entries(&self) -> &[JointEntry<T>] {
        &self.joints
    }

    /// The frame every cached quantity is expressed in.
    #[inline]
    pub fn root_frame(&self) -> CartesianFrame3D {
        self.root_frame
    }

    /// Marks every mutable element stale. Nothing is recomputed here.
    pub fn set_dirty(&mut self) {
        self.to_parent.iter_mut().for_each(|s| s.element.set_dirty());
        self.to_root.iter_mut().for_each(|s| s.element.set_dirty());
        self.twists.iter_mut().for_each(|s| s.element.set_dirty());
        self.motion_subspaces.iter_mut().for_each(CacheElement::set_dirty);
        self.inertias.iter_mut().for_each(|s| s.element.set_dirty());
        self.crb_inertias.iter_mut().for_each(CacheElement::set_dirty);
    }

    fn elements_dirty(&self) -> impl Iterator<Item = bool> + '_ {
        self.to_parent
            .iter()
            .map(|s| s.element.is_dirty())
            .chain(self.to_root.iter().map(|s| s.element.is_dirty()))
            .chain(self.twists.iter().map(|s| s.element.is_dirty()))
            .chain(self.motion_subspaces.iter().map(CacheElement::is_dirty))
            .chain(self.inertias.iter().map(|s| s.element.is_dirty()))
            .chain(self.crb_inertias.iter().map(CacheElement::is_dirty))
    }

    /// Total number of cache elements.
    pub fn num_elements(&self) -> usize {
        self.elements_dirty().count()
    }

    /// Number of elements that would be recomputed on their next read.
    pub fn num_dirty(&self) -> usize {
        self.elements_dirty().filter(|&d| d).count()
    }

    /// Total number of element recomputations since the cache was built.
    pub fn recompute_count(&self) -> u64 {
        self.to_parent
            .iter()
            .map(|s| s.element.recompute_count())
            .chain(self.to_root.iter().map(|s| s.element.recompute_count()))
            .chain(self.twists.iter().map(|s| s.element.recompute_count()))
            .chain(self.motion_subspaces.iter().map(CacheElement::recompute_count))
            .chain(self.inertias.iter().map(|s| s.element.recompute_count()))
            .chain(self.crb_inertias.iter().map(CacheElement::recompute_count))
            .sum()
    }

    fn to_parent_value(&mut self, i: usize, state: &StateVectors<T>) -> Transform3D<T> {
        if self.to_parent[i].element.is_dirty() {
            let value = match self.to_parent[i].computation {
                ToParent::Fixed(tf) => tf,
                ToParent::Joint(j) => {
                    let joint = &self.joints[j];
                    joint.joint_type.joint_transform(
                        joint.after,
                        joint.before,
                        &state.q()[joint.q_range.clone()],
                    )
                }
            };
            log::trace!("recomputed transform to parent, frame slot {i}");
            self.to_parent[i].element.store(value);
        }
        *self.to_parent[i].element.get()
    }

    fn to_root_value(&mut self, i: usize, state: &StateVectors<T>) -> Transform3D<T> {
        if self.to_root[i].element.is_dirty() {
            let computation = self.to_root[i].computation;
            let value = match computation {
                ToRoot::Root => Transform3D::identity(self.root_frame, self.root_frame),
                ToRoot::Compose { parent } => {
                    let parent_to_root = self.to_root_value(parent, state);
                    parent_to_root * self.to_parent_value(i, state)
                }
            };
            log::trace!("recomputed transform to root, frame slot {i}");
            self.to_root[i].element.store(value);
        }
        *self.to_root[i].element.get()
    }

    fn twist_value(&mut self, b: usize, state: &StateVectors<T>) -> Twist<T> {
        if self.twists[b].element.is_dirty() {
            let computation = self.twists[b].computation;
            let value = match computation {
                TwistComputation::Root => {
                    Twist::zero(self.root_frame, self.root_frame, self.root_frame)
                }
                TwistComputation::Joint { parent, joint } => {
                    let parent_twist = self.twist_value(parent, state);
                    let to_root = self.to_root_value(self.joints[joint].after_slot, state);
                    let joint = &self.joints[joint];
                    let joint_twist = joint
                        .joint_type
                        .joint_twist(
                            joint.after,
                            joint.before,
                            &state.q()[joint.q_range.clone()],
                            &state.v()[joint.v_range.clone()],
                        )
                        .with_base(joint.parent_frame);
                    parent_twist + joint_twist.transform(&to_root)
                }
            };
            log::trace!("recomputed twist wrt world, body slot {b}");
            self.twists[b].element.store(value);
        }
        *self.twists[b].element.get()
    }

    fn update_motion_subspace(&mut self, j: usize, state: &StateVectors<T>) {
        if self.motion_subspaces[j].is_dirty() {
            let to_root = self.to_root_value(self.joints[j].after_slot, state);
            let joint = &self.joints[j];
            let value = joint
                .joint_type
                .motion_subspace(joint.after, joint.before, &state.q()[joint.q_range.clone()])
                .transform(&to_root);
            log::trace!("recomputed motion subspace, joint slot {j}");
            self.motion_subspaces[j].store(value);
        }
    }

    fn inertia_value(&mut self, b: usize, state: &StateVectors<T>) -> SpatialInertia<T> {
        if self.inertias[b].element.is_dirty() {
            let computation = self.inertias[b].computation;
            let value = match computation {
                InertiaComputation::Zero => SpatialInertia::zero(self.root_frame),
                InertiaComputation::Transformed { local, frame } => {
                    local.transform(&self.to_root_value(frame, state))
                }
            };
            log::trace!("recomputed spatial inertia, body slot {b}");
            self.inertias[b].element.store(value);
        }
        *self.inertias[b].element.get()
    }

    fn crb_value(&mut self, b: usize, state: &StateVectors<T>) -> SpatialInertia<T> {
        if self.crb_inertias[b].is_dirty() {
            let mut value = self.inertia_value(b, state);
            for k in 0..self.body_children[b].len() {
                let child = self.body_children[b][k];
                value = value + self.crb_value(child, state);
            }
            log::trace!("recomputed composite rigid body inertia, body slot {b}");
            self.crb_inertias[b].store(value);
        }
        *self.crb_inertias[b].get()
    }

    /// Transform from `frame` to the frame it is defined relative to: the
    /// joint's before-frame for a body's default frame, the body's default
    /// frame for other body-fixed frames.
    pub fn transform_to_parent(
        &mut self,
        state: &StateVectors<T>,
        frame: CartesianFrame3D,
    ) -> Result<Transform3D<T>, MechanismError> {
        self.check_state(state)?;
        let i = self.frame_slot(frame)?;
        Ok(self.to_parent_value(i, state))
    }

    /// Transform from `frame` to the root frame.
    pub fn transform_to_root(
        &mut self,
        state: &StateVectors<T>,
        frame: CartesianFrame3D,
    ) -> Result<Transform3D<T>, MechanismError> {
        self.check_state(state)?;
        let i = self.frame_slot(frame)?;
        Ok(self.to_root_value(i, state))
    }

    /// Transform from `from` to `to`.
    pub fn relative_transform(
        &mut self,
        state: &StateVectors<T>,
        from: CartesianFrame3D,
        to: CartesianFrame3D,
    ) -> Result<Transform3D<T>, MechanismError> {
        let to_root = self.transform_to_root(state, to)?;
        let from_root = self.transform_to_root(state, from)?;
        Ok(to_root.inv() * from_root)
    }

    /// Twist of the body's default frame relative to the root frame,
    /// expressed in the root frame.
    pub fn twist_wrt_world(
        &mut self,
        state: &StateVectors<T>,
        body: BodyId,
    ) -> Result<Twist<T>, MechanismError> {
        self.check_state(state)?;
        let b = self.body_slot(body)?;
        Ok(self.twist_value(b, state))
    }

    /// Twist of `body` relative to `base`, expressed in the root frame.
    pub fn relative_twist(
        &mut self,
        state: &StateVectors<T>,
        body: BodyId,
        base: BodyId,
    ) -> Result<Twist<T>, MechanismError> {
        let base_twist = self.twist_wrt_world(state, base)?;
        let body_twist = self.twist_wrt_world(state, body)?;
        Ok(-base_twist + body_twist)
    }

    /// Motion subspace of `joint`, expressed in the root frame.
    pub fn motion_subspace(
        &mut self,
        state: &StateVectors<T>,
        joint: JointId,
    ) -> Result<&MotionSubspace<T>, MechanismError> {
        self.check_state(state)?;
        let j = self.joint_slot(joint)?;
        self.update_motion_subspace(j, state);
        Ok(self.motion_subspaces[j].get())
    }

    /// Inertia of `body` expressed in the root frame (zero for massless bodies).
    pub fn spatial_inertia(
        &mut self,
        state: &StateVectors<T>,
        body: BodyId,
    ) -> Result<SpatialInertia<T>, MechanismError> {
        self.check_state(state)?;
        let b = self.body_slot(body)?;
        Ok(self.inertia_value(b, state))
    }

    /// Combined inertia of `body` and all its descendants, in the root frame.
    pub fn crb_inertia(
        &mut self,
        state: &StateVectors<T>,
        body: BodyId,
    ) -> Result<SpatialInertia<T>, MechanismError> {
        self.check_state(state)?;
        let b = self.body_slot(body)?;
        Ok(self.crb_value(b, state))
    }
}

impl<T: Scalar> InvalidateCache for MechanismStateCache<T> {
    fn invalidate_cache(&mut self) {
        log::trace!("state cache invalidated");
        self.set_dirty();
    }
}
