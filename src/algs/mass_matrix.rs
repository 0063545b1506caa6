//! Joint-space mass matrix by the composite rigid body algorithm.

use crate::mechanism::MechanismState;
use crate::mechanism_error::MechanismError;
use crate::spatial::Scalar;
use nalgebra::DMatrix;

/// Mass matrix `H(q)` (`num_velocities × num_velocities`, symmetric).
///
/// For each joint `i` with successor body `b`, `F = Ic(b) · S_i` where `Ic` is
/// the composite rigid body inertia; then `H[j, i] = S_jᵀ F` for `i` and every
/// joint `j` on the path from `b` to the root. All quantities come from the
/// state cache and are expressed in the root frame.
pub fn mass_matrix<T: Scalar>(state: &mut MechanismState<'_, T>) -> Result<DMatrix<T>, MechanismError> {
    let mechanism = state.mechanism();
    let nv = mechanism.num_velocities();
    let mut h = DMatrix::zeros(nv, nv);

    for &joint_i in mechanism.joints() {
        let vi = mechanism.velocity_range(joint_i)?;
        if vi.is_empty() {
            continue;
        }
        let body = mechanism.successor(joint_i)?;
        let crb = state.crb_inertia(body)?.to_matrix();
        let f = crb * state.motion_subspace(joint_i)?.to_matrix();

        let mut next = Some(joint_i);
        while let Some(joint_j) = next {
            let vj = mechanism.velocity_range(joint_j)?;
            if !vj.is_empty() {
                let block = state.motion_subspace(joint_j)?.to_matrix().transpose() * &f;
                h.view_mut((vj.start, vi.start), (vj.len(), vi.len()))
                    .copy_from(&block);
                if joint_j != joint_i {
                    h.view_mut((vi.start, vj.start), (vi.len(), vj.len()))
                        .copy_from(&block.transpose());
                }
            }
            next = mechanism.joint_to_parent(mechanism.predecessor(joint_j)?)?;
        }
    }
    Ok(h)
}
