//! Geometric Jacobians along tree paths.

use crate::mechanism::MechanismState;
use crate::mechanism_error::MechanismError;
use crate::spatial::{MotionSubspace, Scalar};
use crate::topology::ids::{BodyId, JointId};
use crate::topology::tree_path::{PathDirection, TreePath};
use nalgebra::Matrix3xX;

/// A 6 × `num_velocities` map from the full velocity vector to the twist of
/// `body` relative to `base`, expressed in `frame`.
pub type GeometricJacobian<T> = MotionSubspace<T>;

/// Jacobian of the path's target body relative to its source body, in the
/// root frame.
///
/// Columns of joints traversed downward (toward the target) are the joints'
/// motion subspaces; columns of joints traversed upward are negated. All other
/// columns are zero.
pub fn geometric_jacobian<T: Scalar>(
    state: &mut MechanismState<'_, T>,
    path: &TreePath<BodyId, JointId>,
) -> Result<GeometricJacobian<T>, MechanismError> {
    let mechanism = state.mechanism();
    let nv = mechanism.num_velocities();
    let mut angular = Matrix3xX::zeros(nv);
    let mut linear = Matrix3xX::zeros(nv);

    for (joint, direction) in path.iter() {
        let range = mechanism.velocity_range(joint)?;
        let s = state.motion_subspace(joint)?;
        for (k, col) in range.enumerate() {
            let (a, l) = match direction {
                PathDirection::Down => (s.angular.column(k).into_owned(), s.linear.column(k).into_owned()),
                PathDirection::Up => (-s.angular.column(k), -s.linear.column(k)),
            };
            angular.set_column(col, &a);
            linear.set_column(col, &l);
        }
    }

    let body = mechanism.body(path.target())?.frame();
    let base = mechanism.body(path.source())?.frame();
    Ok(MotionSubspace::new(body, base, mechanism.root_frame(), angular, linear))
}
