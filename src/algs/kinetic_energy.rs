use crate::mechanism::MechanismState;
use crate::mechanism_error::MechanismError;
use crate::spatial::Scalar;

/// Total kinetic energy `Σ ½ tᵀ I t` over all bodies, from the cached
/// world-frame twists and inertias.
pub fn kinetic_energy<T: Scalar>(state: &mut MechanismState<'_, T>) -> Result<T, MechanismError> {
    let mechanism = state.mechanism();
    let mut energy = T::zero();
    for &body in mechanism.bodies() {
        if mechanism.body(body)?.inertia().is_none() {
            continue;
        }
        let inertia = state.spatial_inertia(body)?;
        let twist = state.twist_wrt_world(body)?;
        energy += inertia.kinetic_energy(&twist);
    }
    Ok(energy)
}
