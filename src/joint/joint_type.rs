//! The closed set of joint variants and the per-variant kinematics contract.

use super::{Fixed, Prismatic, QuaternionFloating, Revolute};
use crate::spatial::{
    CartesianFrame3D, MotionSubspace, Scalar, SpatialAcceleration, Transform3D, Twist, Wrench,
};
use rand::Rng;
use std::fmt;

/// Kinematics of one joint variant.
///
/// Slice arguments are the joint's own coordinates: `q` has
/// [`num_positions`](Self::num_positions) entries, `v` has
/// [`num_velocities`](Self::num_velocities). Callers are responsible for
/// the lengths; [`Joint`](super::Joint) checks them at the public boundary.
///
/// Every variant must provide the required methods. The provided ones are
/// correct for joints whose configuration space is a vector space with
/// `q̇ = v` and whose motion subspace is constant in the after-frame.
pub trait JointKinematics<T: Scalar> {
    fn num_positions(&self) -> usize;

    fn num_velocities(&self) -> usize;

    /// Transform from `after` to `before` at configuration `q`.
    fn joint_transform(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        q: &[T],
    ) -> Transform3D<T>;

    /// Twist of `after` relative to `before`, expressed in `after`.
    fn joint_twist(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        q: &[T],
        v: &[T],
    ) -> Twist<T>;

    /// Motion subspace expressed in `after`.
    fn motion_subspace(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        q: &[T],
    ) -> MotionSubspace<T>;

    fn bias_acceleration(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        _q: &[T],
        _v: &[T],
    ) -> SpatialAcceleration<T> {
        SpatialAcceleration::zero(after, before, after)
    }

    fn configuration_derivative_to_velocity(&self, v: &mut [T], q: &[T], q_dot: &[T]);

    fn velocity_to_configuration_derivative(&self, q_dot: &mut [T], q: &[T], v: &[T]);

    fn zero_configuration(&self, q: &mut [T]);

    fn rand_configuration<R: Rng + ?Sized>(&self, q: &mut [T], rng: &mut R);

    /// Projects `wrench` (expressed in the after-frame) onto the joint's
    /// generalized forces.
    fn joint_torque(&self, tau: &mut [T], q: &[T], wrench: &Wrench<T>);

    /// Local coordinates `ϕ` of `q` around `q0`, and their rate `ϕ̇` given `v`.
    #[allow(clippy::too_many_arguments)]
    fn local_coordinates(
        &self,
        _after: CartesianFrame3D,
        _before: CartesianFrame3D,
        phi: &mut [T],
        phi_dot: &mut [T],
        q0: &[T],
        q: &[T],
        v: &[T],
    ) {
        for ((p, &a), &b) in phi.iter_mut().zip(q).zip(q0) {
            *p = a - b;
        }
        phi_dot.copy_from_slice(v);
    }

    /// Inverse of [`local_coordinates`](Self::local_coordinates).
    fn global_coordinates(
        &self,
        _after: CartesianFrame3D,
        _before: CartesianFrame3D,
        q: &mut [T],
        q0: &[T],
        phi: &[T],
    ) {
        for ((out, &a), &b) in q.iter_mut().zip(q0).zip(phi) {
            *out = a + b;
        }
    }

    /// Same joint with the roles of the before and after frames swapped.
    fn flip_direction(&self) -> Self
    where
        Self: Clone,
    {
        self.clone()
    }

    fn normalize_configuration(&self, _q: &mut [T]) {}

    /// Whether the motion subspace is constant when expressed in the
    /// after-frame.
    fn has_fixed_subspaces(&self) -> bool {
        true
    }

    fn is_floating(&self) -> bool {
        false
    }
}

/// A joint variant, dispatched by `match`.
#[derive(Clone, Debug, PartialEq)]
pub enum JointType<T: Scalar> {
    QuaternionFloating(QuaternionFloating),
    Prismatic(Prismatic<T>),
    Revolute(Revolute<T>),
    Fixed(Fixed),
}

macro_rules! dispatch {
    ($self:expr, $jt:ident => $body:expr) => {
        match $self {
            JointType::QuaternionFloating($jt) => $body,
            JointType::Prismatic($jt) => $body,
            JointType::Revolute($jt) => $body,
            JointType::Fixed($jt) => $body,
        }
    };
}

impl<T: Scalar> JointKinematics<T> for JointType<T> {
    fn num_positions(&self) -> usize {
        dispatch!(self, jt => JointKinematics::<T>::num_positions(jt))
    }

    fn num_velocities(&self) -> usize {
        dispatch!(self, jt => JointKinematics::<T>::num_velocities(jt))
    }

    fn joint_transform(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        q: &[T],
    ) -> Transform3D<T> {
        dispatch!(self, jt => jt.joint_transform(after, before, q))
    }

    fn joint_twist(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        q: &[T],
        v: &[T],
    ) -> Twist<T> {
        dispatch!(self, jt => jt.joint_twist(after, before, q, v))
    }

    fn motion_subspace(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        q: &[T],
    ) -> MotionSubspace<T> {
        dispatch!(self, jt => jt.motion_subspace(after, before, q))
    }

    fn bias_acceleration(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        q: &[T],
        v: &[T],
    ) -> SpatialAcceleration<T> {
        dispatch!(self, jt => jt.bias_acceleration(after, before, q, v))
    }

    fn configuration_derivative_to_velocity(&self, v: &mut [T], q: &[T], q_dot: &[T]) {
        dispatch!(self, jt => jt.configuration_derivative_to_velocity(v, q, q_dot))
    }

    fn velocity_to_configuration_derivative(&self, q_dot: &mut [T], q: &[T], v: &[T]) {
        dispatch!(self, jt => jt.velocity_to_configuration_derivative(q_dot, q, v))
    }

    fn zero_configuration(&self, q: &mut [T]) {
        dispatch!(self, jt => jt.zero_configuration(q))
    }

    fn rand_configuration<R: Rng + ?Sized>(&self, q: &mut [T], rng: &mut R) {
        dispatch!(self, jt => jt.rand_configuration(q, rng))
    }

    fn joint_torque(&self, tau: &mut [T], q: &[T], wrench: &Wrench<T>) {
        dispatch!(self, jt => jt.joint_torque(tau, q, wrench))
    }

    #[allow(clippy::too_many_arguments)]
    fn local_coordinates(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        phi: &mut [T],
        phi_dot: &mut [T],
        q0: &[T],
        q: &[T],
        v: &[T],
    ) {
        dispatch!(self, jt => jt.local_coordinates(after, before, phi, phi_dot, q0, q, v))
    }

    fn global_coordinates(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        q: &mut [T],
        q0: &[T],
        phi: &[T],
    ) {
        dispatch!(self, jt => jt.global_coordinates(after, before, q, q0, phi))
    }

    fn flip_direction(&self) -> Self {
        match self {
            JointType::QuaternionFloating(jt) => {
                JointType::QuaternionFloating(JointKinematics::<T>::flip_direction(jt))
            }
            JointType::Prismatic(jt) => JointType::Prismatic(jt.flip_direction()),
            JointType::Revolute(jt) => JointType::Revolute(jt.flip_direction()),
            JointType::Fixed(jt) => JointType::Fixed(JointKinematics::<T>::flip_direction(jt)),
        }
    }

    fn normalize_configuration(&self, q: &mut [T]) {
        dispatch!(self, jt => jt.normalize_configuration(q))
    }

    fn has_fixed_subspaces(&self) -> bool {
        dispatch!(self, jt => JointKinematics::<T>::has_fixed_subspaces(jt))
    }

    fn is_floating(&self) -> bool {
        dispatch!(self, jt => JointKinematics::<T>::is_floating(jt))
    }
}

impl<T: Scalar> From<QuaternionFloating> for JointType<T> {
    fn from(jt: QuaternionFloating) -> Self {
        JointType::QuaternionFloating(jt)
    }
}

impl<T: Scalar> From<Prismatic<T>> for JointType<T> {
    fn from(jt: Prismatic<T>) -> Self {
        JointType::Prismatic(jt)
    }
}

impl<T: Scalar> From<Revolute<T>> for JointType<T> {
    fn from(jt: Revolute<T>) -> Self {
        JointType::Revolute(jt)
    }
}

impl<T: Scalar> From<Fixed> for JointType<T> {
    fn from(jt: Fixed) -> Self {
        JointType::Fixed(jt)
    }
}

impl<T: Scalar> fmt::Display for JointType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JointType::QuaternionFloating(_) => f.write_str("quaternion floating"),
            JointType::Prismatic(jt) => write!(f, "prismatic along {:?}", jt.axis().as_slice()),
            JointType::Revolute(jt) => write!(f, "revolute about {:?}", jt.axis().as_slice()),
            JointType::Fixed(_) => f.write_str("fixed"),
        }
    }
}
