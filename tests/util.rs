#![allow(dead_code)]
use multibody_tree::prelude::*;
use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

pub fn rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// A vector with components in [-1, 1) and norm at least 0.1.
pub fn rand_axis<R: Rng>(rng: &mut R) -> Vector3<f64> {
    loop {
        let v = Vector3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if v.norm() > 0.1 {
            return v;
        }
    }
}

pub fn rand_rotation<R: Rng>(rng: &mut R) -> UnitQuaternion<f64> {
    UnitQuaternion::from_euler_angles(
        rng.gen_range(-3.0..3.0),
        rng.gen_range(-1.5..1.5),
        rng.gen_range(-3.0..3.0),
    )
}

pub fn rand_joint_type<R: Rng>(rng: &mut R) -> JointType<f64> {
    match rng.gen_range(0..4) {
        0 => Revolute::new(rand_axis(rng)).into(),
        1 => Prismatic::new(rand_axis(rng)).into(),
        2 => Fixed.into(),
        _ => QuaternionFloating.into(),
    }
}

pub fn rand_inertia<R: Rng>(rng: &mut R, frame: CartesianFrame3D) -> SpatialInertia<f64> {
    let moment = Matrix3::from_diagonal(&Vector3::new(
        rng.gen_range(0.01..0.5),
        rng.gen_range(0.01..0.5),
        rng.gen_range(0.01..0.5),
    ));
    SpatialInertia::from_com(frame, rng.gen_range(0.5..2.0), rand_axis(rng) * 0.5, moment)
}

/// Attaches `num_bodies` bodies with random joints, inertias and offsets,
/// each to a uniformly chosen existing body.
pub fn rand_mechanism<R: Rng>(rng: &mut R, num_bodies: usize) -> Mechanism<f64> {
    let mut mechanism = Mechanism::new(RigidBody::new("world")).unwrap();
    for i in 0..num_bodies {
        let bodies = mechanism.bodies().to_vec();
        let parent = bodies[rng.gen_range(0..bodies.len())];
        let parent_frame = mechanism.body(parent).unwrap().frame();
        let joint = Joint::new(format!("joint{i}"), rand_joint_type(rng));
        let body = RigidBody::with_frame(format!("body{i}"), joint.frame_after())
            .with_inertia(rand_inertia(rng, joint.frame_after()));
        let offset = Transform3D::new(
            joint.frame_before(),
            parent_frame,
            rand_rotation(rng),
            rand_axis(rng),
        );
        mechanism.attach(parent, joint, offset, body).unwrap();
    }
    mechanism
}

/// A random state of `mechanism` with random configuration and velocity.
pub fn rand_state<'a, R: Rng>(rng: &mut R, mechanism: &'a Mechanism<f64>) -> MechanismState<'a, f64> {
    let mut state = MechanismState::new(mechanism).unwrap();
    state.rand_configuration(rng);
    state.rand_velocity(rng);
    state
}

/// A serial chain of `n` unit-mass links on revolute joints about z, each
/// offset by one unit along x from its parent.
pub fn revolute_chain(n: usize) -> Mechanism<f64> {
    let mut mechanism = Mechanism::new(RigidBody::new("world")).unwrap();
    let mut parent = mechanism.root_body();
    for i in 0..n {
        let joint = Joint::new(format!("hinge{i}"), Revolute::new(Vector3::z()));
        let inertia = SpatialInertia::from_com(
            joint.frame_after(),
            1.0,
            Vector3::new(0.5, 0.0, 0.0),
            Matrix3::identity() * 0.01,
        );
        let body = RigidBody::with_frame(format!("link{i}"), joint.frame_after()).with_inertia(inertia);
        let parent_frame = mechanism.body(parent).unwrap().frame();
        let offset = Transform3D::from_translation(joint.frame_before(), parent_frame, Vector3::x());
        parent = mechanism.attach(parent, joint, offset, body).unwrap().1;
    }
    mechanism
}
