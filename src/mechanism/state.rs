//! Generalized coordinates of a mechanism and the kinematics derived from them.

use super::Mechanism;
use super::state_cache::MechanismStateCache;
use crate::joint::JointKinematics;
use crate::mechanism_error::MechanismError;
use crate::spatial::{
    CartesianFrame3D, MotionSubspace, Scalar, SpatialInertia, Transform3D, Twist, lit,
};
use crate::topology::cache::InvalidateCache;
use crate::topology::ids::{BodyId, JointId};
use rand::Rng;

/// Mechanism-wide configuration `q` and velocity `v`.
#[derive(Clone, Debug, PartialEq)]
pub struct StateVectors<T: Scalar> {
    q: Vec<T>,
    v: Vec<T>,
}

impl<T: Scalar> StateVectors<T> {
    /// Vectors sized for `mechanism`, every joint at its zero configuration
    /// and with zero velocity.
    pub fn new(mechanism: &Mechanism<T>) -> Result<Self, MechanismError> {
        let mut vectors = Self::zeros(mechanism.num_positions(), mechanism.num_velocities());
        for &joint_id in mechanism.joints() {
            let range = mechanism.configuration_range(joint_id)?;
            mechanism.joint(joint_id)?.zero_configuration(&mut vectors.q[range])?;
        }
        Ok(vectors)
    }

    fn zeros(num_positions: usize, num_velocities: usize) -> Self {
        Self {
            q: vec![T::zero(); num_positions],
            v: vec![T::zero(); num_velocities],
        }
    }

    #[inline]
    pub fn q(&self) -> &[T] {
        &self.q
    }

    #[inline]
    pub fn v(&self) -> &[T] {
        &self.v
    }
}

/// State of a mechanism: its coordinate vectors plus a
/// [`MechanismStateCache`] over them.
///
/// Every method that can change `q` or `v` marks the cache dirty; the
/// kinematic accessors recompute what they need on demand.
///
/// # Example
/// ```rust
/// use multibody_tree::prelude::*;
/// use nalgebra::Vector3;
///
/// let mut mechanism = Mechanism::new(RigidBody::new("world")).unwrap();
/// let joint = Joint::new("hinge", Revolute::new(Vector3::z()));
/// let link = RigidBody::with_frame("link", joint.frame_after());
/// let to_world = Transform3D::identity(joint.frame_before(), mechanism.root_frame());
/// let root = mechanism.root_body();
/// let (hinge, link) = mechanism.attach(root, joint, to_world, link).unwrap();
///
/// let mut state = MechanismState::new(&mechanism).unwrap();
/// state.set_joint_velocity(hinge, &[2.0]).unwrap();
/// let twist = state.twist_wrt_world(link).unwrap();
/// assert_eq!(twist.angular, Vector3::new(0.0, 0.0, 2.0));
/// ```
#[derive(Clone, Debug)]
pub struct MechanismState<'a, T: Scalar> {
    mechanism: &'a Mechanism<T>,
    vectors: StateVectors<T>,
    cache: MechanismStateCache<T>,
}

impl<'a, T: Scalar> MechanismState<'a, T> {
    /// State at the zero configuration with zero velocity.
    pub fn new(mechanism: &'a Mechanism<T>) -> Result<Self, MechanismError> {
        let cache = MechanismStateCache::new(mechanism)?;
        let state = Self {
            mechanism,
            vectors: StateVectors::new(mechanism)?,
            cache,
        };
        Ok(state)
    }

    #[inline]
    pub fn mechanism(&self) -> &'a Mechanism<T> {
        self.mechanism
    }

    #[inline]
    pub fn vectors(&self) -> &StateVectors<T> {
        &self.vectors
    }

    #[inline]
    pub fn cache(&self) -> &MechanismStateCache<T> {
        &self.cache
    }

    #[inline]
    pub fn configuration(&self) -> &[T] {
        &self.vectors.q
    }

    #[inline]
    pub fn velocity(&self) -> &[T] {
        &self.vectors.v
    }

    /// Marks every cached quantity stale.
    #[inline]
    pub fn set_dirty(&mut self) {
        self.cache.set_dirty();
    }

    pub fn set_configuration(&mut self, q: &[T]) -> Result<(), MechanismError> {
        if q.len() != self.vectors.q.len() {
            return Err(MechanismError::dims("configuration", self.vectors.q.len(), q.len()));
        }
        self.vectors.q.copy_from_slice(q);
        self.set_dirty();
        Ok(())
    }

    pub fn set_velocity(&mut self, v: &[T]) -> Result<(), MechanismError> {
        if v.len() != self.vectors.v.len() {
            return Err(MechanismError::dims("velocity", self.vectors.v.len(), v.len()));
        }
        self.vectors.v.copy_from_slice(v);
        self.set_dirty();
        Ok(())
    }

    /// Mutable access to `q`; the cache is marked dirty up front.
    pub fn configuration_mut(&mut self) -> &mut [T] {
        self.set_dirty();
        &mut self.vectors.q
    }

    /// Mutable access to `v`; the cache is marked dirty up front.
    pub fn velocity_mut(&mut self) -> &mut [T] {
        self.set_dirty();
        &mut self.vectors.v
    }

    pub fn joint_configuration(&self, joint: JointId) -> Result<&[T], MechanismError> {
        let range = self.mechanism.configuration_range(joint)?;
        Ok(&self.vectors.q[range])
    }

    pub fn joint_velocity(&self, joint: JointId) -> Result<&[T], MechanismError> {
        let range = self.mechanism.velocity_range(joint)?;
        Ok(&self.vectors.v[range])
    }

    pub fn set_joint_configuration(&mut self, joint: JointId, q: &[T]) -> Result<(), MechanismError> {
        let range = self.mechanism.configuration_range(joint)?;
        if q.len() != range.len() {
            return Err(MechanismError::dims("joint configuration", range.len(), q.len()));
        }
        self.vectors.q[range].copy_from_slice(q);
        self.set_dirty();
        Ok(())
    }

    pub fn set_joint_velocity(&mut self, joint: JointId, v: &[T]) -> Result<(), MechanismError> {
        let range = self.mechanism.velocity_range(joint)?;
        if v.len() != range.len() {
            return Err(MechanismError::dims("joint velocity", range.len(), v.len()));
        }
        self.vectors.v[range].copy_from_slice(v);
        self.set_dirty();
        Ok(())
    }

    /// Puts every joint at its zero configuration.
    pub fn zero_configuration(&mut self) {
        for joint in self.cache.joint_entries() {
            joint
                .joint_type
                .zero_configuration(&mut self.vectors.q[joint.q_range.clone()]);
        }
        self.cache.set_dirty();
    }

    pub fn zero_velocity(&mut self) {
        self.vectors.v.iter_mut().for_each(|x| *x = T::zero());
        self.set_dirty();
    }

    pub fn zero(&mut self) {
        self.zero_configuration();
        self.zero_velocity();
    }

    /// Draws a random valid configuration for every joint.
    pub fn rand_configuration<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for joint in self.cache.joint_entries() {
            joint
                .joint_type
                .rand_configuration(&mut self.vectors.q[joint.q_range.clone()], rng);
        }
        self.cache.set_dirty();
    }

    /// Draws every velocity uniformly from `[-1, 1)`.
    pub fn rand_velocity<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for x in &mut self.vectors.v {
            *x = lit(rng.gen_range(-1.0..1.0));
        }
        self.set_dirty();
    }

    /// Projects each joint's configuration back onto its valid set (unit
    /// quaternions for floating joints).
    pub fn normalize_configuration(&mut self) {
        for joint in self.cache.joint_entries() {
            joint
                .joint_type
                .normalize_configuration(&mut self.vectors.q[joint.q_range.clone()]);
        }
        self.cache.set_dirty();
    }

    /// Time derivative of `q` implied by the current `v`.
    pub fn configuration_derivative(&self) -> Vec<T> {
        let mut q_dot = vec![T::zero(); self.vectors.q.len()];
        for joint in self.cache.joint_entries() {
            joint.joint_type.velocity_to_configuration_derivative(
                &mut q_dot[joint.q_range.clone()],
                &self.vectors.q[joint.q_range.clone()],
                &self.vectors.v[joint.v_range.clone()],
            );
        }
        q_dot
    }

    pub fn transform_to_root(&mut self, frame: CartesianFrame3D) -> Result<Transform3D<T>, MechanismError> {
        self.cache.transform_to_root(&self.vectors, frame)
    }

    pub fn transform_to_parent(&mut self, frame: CartesianFrame3D) -> Result<Transform3D<T>, MechanismError> {
        self.cache.transform_to_parent(&self.vectors, frame)
    }

    pub fn relative_transform(
        &mut self,
        from: CartesianFrame3D,
        to: CartesianFrame3D,
    ) -> Result<Transform3D<T>, MechanismError> {
        self.cache.relative_transform(&self.vectors, from, to)
    }

    pub fn twist_wrt_world(&mut self, body: BodyId) -> Result<Twist<T>, MechanismError> {
        self.cache.twist_wrt_world(&self.vectors, body)
    }

    pub fn relative_twist(&mut self, body: BodyId, base: BodyId) -> Result<Twist<T>, MechanismError> {
        self.cache.relative_twist(&self.vectors, body, base)
    }

    pub fn motion_subspace(&mut self, joint: JointId) -> Result<&MotionSubspace<T>, MechanismError> {
        self.cache.motion_subspace(&self.vectors, joint)
    }

    pub fn spatial_inertia(&mut self, body: BodyId) -> Result<SpatialInertia<T>, MechanismError> {
        self.cache.spatial_inertia(&self.vectors, body)
    }

    pub fn crb_inertia(&mut self, body: BodyId) -> Result<SpatialInertia<T>, MechanismError> {
        self.cache.crb_inertia(&self.vectors, body)
    }
}

impl<T: Scalar> InvalidateCache for MechanismState<'_, T> {
    fn invalidate_cache(&mut self) {
        self.cache.invalidate_cache();
    }
}
