mod util;
use util::*;

use approx::assert_relative_eq;
use multibody_tree::prelude::*;
use nalgebra::{DVector, Vector3};
use proptest::prelude::*;

fn assert_same_transform(a: &Transform3D<f64>, b: &Transform3D<f64>) {
    assert_eq!((a.from, a.to), (b.from, b.to));
    assert_relative_eq!(a.iso, b.iso, epsilon = 1e-10);
}

#[test]
fn second_read_recomputes_nothing() {
    let mut rng = rng(7);
    let m = rand_mechanism(&mut rng, 8);
    let mut state = rand_state(&mut rng, &m);
    let bodies = m.bodies().to_vec();
    for &b in &bodies {
        state.twist_wrt_world(b).unwrap();
        state.crb_inertia(b).unwrap();
    }
    let count = state.cache().recompute_count();
    for &b in &bodies {
        state.twist_wrt_world(b).unwrap();
        state.crb_inertia(b).unwrap();
    }
    assert_eq!(state.cache().recompute_count(), count);
    mass_matrix(&mut state).unwrap();
    let after_mass_matrix = state.cache().recompute_count();
    mass_matrix(&mut state).unwrap();
    assert_eq!(state.cache().recompute_count(), after_mass_matrix);
}

#[test]
fn set_dirty_defers_work_until_read() {
    let mut rng = rng(11);
    let m = revolute_chain(6);
    let mut state = rand_state(&mut rng, &m);
    let leaf = *m.bodies().last().unwrap();
    let leaf_frame = m.body(leaf).unwrap().frame();
    state.transform_to_root(leaf_frame).unwrap();

    let count = state.cache().recompute_count();
    state.set_dirty();
    assert!(state.cache().num_dirty() > 0);
    assert_eq!(state.cache().recompute_count(), count);

    state.transform_to_root(leaf_frame).unwrap();
    // per link: joint transform and transform to root; per inner joint:
    // transform to root of its before-frame
    assert_eq!(state.cache().recompute_count(), count + 6 * 2 + 5);
}

#[test]
fn chain_tip_position() {
    let m = revolute_chain(3);
    let tip = *m.bodies().last().unwrap();
    let tip_frame = m.body(tip).unwrap().frame();
    let mut state = MechanismState::new(&m).unwrap();
    let tf = state.transform_to_root(tip_frame).unwrap();
    assert_relative_eq!(*tf.translation(), Vector3::new(3.0, 0.0, 0.0), epsilon = 1e-12);
    state.set_configuration(&[std::f64::consts::FRAC_PI_2, 0.0, 0.0]).unwrap();
    let tf = state.transform_to_root(tip_frame).unwrap();
    assert_relative_eq!(*tf.translation(), Vector3::new(1.0, 2.0, 0.0), epsilon = 1e-12);
}

#[test]
fn welded_subtree_stays_clean_after_set_dirty() {
    let mut m = Mechanism::<f64>::new(RigidBody::new("world")).unwrap();
    let root = m.root_body();
    let weld = Joint::new("weld", Fixed);
    let plate = RigidBody::with_frame("plate", weld.frame_after());
    let offset = Transform3D::from_translation(weld.frame_before(), m.root_frame(), Vector3::z());
    let (_, plate) = m.attach(root, weld, offset, plate).unwrap();

    let mut state = MechanismState::new(&m).unwrap();
    let plate_frame = m.body(plate).unwrap().frame();
    let tf = state.transform_to_root(plate_frame).unwrap();
    assert_relative_eq!(*tf.translation(), Vector3::z());
    state.set_dirty();
    let count = state.cache().recompute_count();
    state.transform_to_root(plate_frame).unwrap();
    assert_eq!(state.cache().recompute_count(), count);
}

#[test]
fn root_quantities_are_trivial() {
    let mut rng = rng(3);
    let m = rand_mechanism(&mut rng, 3);
    let mut state = rand_state(&mut rng, &m);
    let root = m.root_body();
    let tf = state.transform_to_root(m.root_frame()).unwrap();
    assert_same_transform(&tf, &Transform3D::identity(m.root_frame(), m.root_frame()));
    let twist = state.twist_wrt_world(root).unwrap();
    assert_eq!(twist.angular, Vector3::zeros());
    assert_eq!(twist.linear, Vector3::zeros());
    assert_eq!(state.spatial_inertia(root).unwrap().mass, 0.0);
}

#[test]
fn unknown_frame_is_an_error() {
    let mut rng = rng(5);
    let m = rand_mechanism(&mut rng, 2);
    let mut state = MechanismState::new(&m).unwrap();
    assert!(matches!(
        state.transform_to_root(CartesianFrame3D::new()),
        Err(MechanismError::UnknownFrame(_))
    ));
}

#[test]
fn body_fixed_frames_compose_with_body_transform() {
    let mut rng = rng(13);
    let mut m = rand_mechanism(&mut rng, 4);
    let body = m.bodies()[2];
    let body_frame = m.body(body).unwrap().frame();
    let tool = CartesianFrame3D::new();
    let tool_to_body = Transform3D::new(tool, body_frame, rand_rotation(&mut rng), rand_axis(&mut rng));
    m.add_body_fixed_frame(body, tool_to_body).unwrap();
    assert_eq!(m.body_fixed_frame_to_body(tool).unwrap(), body);

    let mut state = rand_state(&mut rng, &m);
    let body_to_root = state.transform_to_root(body_frame).unwrap();
    let tool_to_root = state.transform_to_root(tool).unwrap();
    assert_same_transform(&tool_to_root, &(body_to_root * tool_to_body));
    let tool_to_parent = state.transform_to_parent(tool).unwrap();
    assert_same_transform(&tool_to_parent, &tool_to_body);
}

fn floating_base() -> (Mechanism<f64>, BodyId) {
    let mut m = Mechanism::new(RigidBody::new("world")).unwrap();
    let root = m.root_body();
    let joint = Joint::new("base", QuaternionFloating);
    let base = RigidBody::with_frame("base", joint.frame_after());
    let offset = Transform3D::identity(joint.frame_before(), m.root_frame());
    let (_, base) = m.attach(root, joint, offset, base).unwrap();
    (m, base)
}

#[test]
fn cache_rejects_vectors_of_the_wrong_length() {
    let m = revolute_chain(1);
    let link = m.bodies()[1];
    let link_frame = m.body(link).unwrap().frame();
    let hinge = m.joints()[0];
    let mut cache = MechanismStateCache::new(&m).unwrap();

    let empty = StateVectors::new(&Mechanism::<f64>::new(RigidBody::new("other")).unwrap()).unwrap();
    assert!(matches!(
        cache.transform_to_root(&empty, link_frame),
        Err(MechanismError::DimensionMismatch { what: "configuration", expected: 1, found: 0 })
    ));
    assert!(matches!(
        cache.transform_to_parent(&empty, link_frame),
        Err(MechanismError::DimensionMismatch { .. })
    ));
    assert!(matches!(cache.twist_wrt_world(&empty, link), Err(MechanismError::DimensionMismatch { .. })));
    assert!(matches!(cache.motion_subspace(&empty, hinge), Err(MechanismError::DimensionMismatch { .. })));
    assert!(matches!(cache.spatial_inertia(&empty, link), Err(MechanismError::DimensionMismatch { .. })));
    assert!(matches!(cache.crb_inertia(&empty, link), Err(MechanismError::DimensionMismatch { .. })));
    assert!(matches!(
        cache.relative_twist(&empty, link, m.root_body()),
        Err(MechanismError::DimensionMismatch { .. })
    ));

    let (floating, _) = floating_base();
    let foreign = StateVectors::new(&floating).unwrap();
    assert!(matches!(
        cache.twist_wrt_world(&foreign, link),
        Err(MechanismError::DimensionMismatch { what: "configuration", expected: 1, found: 7 })
    ));

    let vectors = StateVectors::new(&m).unwrap();
    let tf = cache.transform_to_root(&vectors, link_frame).unwrap();
    assert_relative_eq!(*tf.translation(), Vector3::x(), epsilon = 1e-12);
}

#[test]
fn state_vectors_start_at_the_zero_configuration() {
    let (m, base) = floating_base();
    let base_frame = m.body(base).unwrap().frame();
    let vectors = StateVectors::new(&m).unwrap();
    assert_eq!((vectors.q().len(), vectors.v().len()), (7, 6));
    assert_eq!(vectors, *MechanismState::new(&m).unwrap().vectors());

    let mut cache = MechanismStateCache::new(&m).unwrap();
    let tf = cache.transform_to_root(&vectors, base_frame).unwrap();
    assert!(tf.iso.rotation.coords.iter().all(|x| x.is_finite()));
    assert_same_transform(&tf, &Transform3D::identity(base_frame, m.root_frame()));
    let twist = cache.twist_wrt_world(&vectors, base).unwrap();
    assert_eq!(twist.angular, Vector3::zeros());
    assert_eq!(twist.linear, Vector3::zeros());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn recomputed_values_match_a_fresh_state(seed in any::<u64>(), n in 1usize..8) {
        let mut rng = rng(seed);
        let m = rand_mechanism(&mut rng, n);
        let mut state = rand_state(&mut rng, &m);
        let bodies = m.bodies().to_vec();
        for &b in &bodies {
            state.crb_inertia(b).unwrap();
            state.twist_wrt_world(b).unwrap();
        }
        // move to a new state through the dirtying setters
        state.rand_configuration(&mut rng);
        state.rand_velocity(&mut rng);

        let mut fresh = MechanismState::new(&m).unwrap();
        fresh.set_configuration(state.configuration()).unwrap();
        fresh.set_velocity(state.velocity()).unwrap();
        for &b in &bodies {
            let frame = m.body(b).unwrap().frame();
            assert_same_transform(
                &state.transform_to_root(frame).unwrap(),
                &fresh.transform_to_root(frame).unwrap(),
            );
            let (t1, t2) = (state.twist_wrt_world(b).unwrap(), fresh.twist_wrt_world(b).unwrap());
            assert_relative_eq!(t1.angular, t2.angular, epsilon = 1e-10);
            assert_relative_eq!(t1.linear, t2.linear, epsilon = 1e-10);
            let (c1, c2) = (state.crb_inertia(b).unwrap(), fresh.crb_inertia(b).unwrap());
            assert_relative_eq!(c1.to_matrix(), c2.to_matrix(), epsilon = 1e-10);
        }
    }

    #[test]
    fn crb_is_own_inertia_plus_children(seed in any::<u64>(), n in 1usize..8) {
        let mut rng = rng(seed);
        let m = rand_mechanism(&mut rng, n);
        let mut state = rand_state(&mut rng, &m);
        let mut total_mass = 0.0;
        for &b in m.bodies() {
            let mut expected = state.spatial_inertia(b).unwrap();
            total_mass += expected.mass;
            for child in m.children(b).unwrap() {
                expected = expected + state.crb_inertia(child).unwrap();
            }
            let crb = state.crb_inertia(b).unwrap();
            assert_relative_eq!(crb.to_matrix(), expected.to_matrix(), epsilon = 1e-10);
        }
        let root_crb = state.crb_inertia(m.root_body()).unwrap();
        prop_assert!((root_crb.mass - total_mass).abs() < 1e-10);
    }

    #[test]
    fn mass_matrix_gives_kinetic_energy(seed in any::<u64>(), n in 1usize..8) {
        let mut rng = rng(seed);
        let m = rand_mechanism(&mut rng, n);
        let mut state = rand_state(&mut rng, &m);
        let h = mass_matrix(&mut state).unwrap();
        prop_assert_eq!(h.shape(), (m.num_velocities(), m.num_velocities()));
        assert_relative_eq!(h.clone(), h.transpose(), epsilon = 1e-10);

        let v = DVector::from_column_slice(state.velocity());
        let quadratic = 0.5 * v.dot(&(&h * &v));
        let energy = kinetic_energy(&mut state).unwrap();
        prop_assert!((quadratic - energy).abs() < 1e-9 * (1.0 + energy.abs()));
        prop_assert!(energy >= -1e-12);
    }

    #[test]
    fn jacobian_times_velocity_is_relative_twist(seed in any::<u64>(), n in 1usize..8) {
        use rand::Rng;
        let mut rng = rng(seed);
        let m = rand_mechanism(&mut rng, n);
        let mut state = rand_state(&mut rng, &m);
        let bodies = m.bodies().to_vec();
        let source = bodies[rng.gen_range(0..bodies.len())];
        let target = bodies[rng.gen_range(0..bodies.len())];

        let path = m.path(source, target).unwrap();
        let jacobian = geometric_jacobian(&mut state, &path).unwrap();
        prop_assert_eq!(jacobian.frame, m.root_frame());
        let v = state.velocity().to_vec();
        let from_jacobian = jacobian.twist(&v);
        let twist = state.relative_twist(target, source).unwrap();
        prop_assert_eq!((from_jacobian.body, from_jacobian.base), (twist.body, twist.base));
        assert_relative_eq!(from_jacobian.angular, twist.angular, epsilon = 1e-10);
        assert_relative_eq!(from_jacobian.linear, twist.linear, epsilon = 1e-10);
    }

    #[test]
    fn twist_matches_transform_derivative(seed in any::<u64>(), n in 1usize..6) {
        let mut rng = rng(seed);
        let m = rand_mechanism(&mut rng, n);
        let mut state = rand_state(&mut rng, &m);
        let q = state.configuration().to_vec();
        let q_dot = state.configuration_derivative();
        let eps = 1e-7;
        let q_eps: Vec<f64> = q.iter().zip(&q_dot).map(|(a, b)| a + eps * b).collect();

        let mut moved = MechanismState::new(&m).unwrap();
        moved.set_configuration(&q_eps).unwrap();
        moved.normalize_configuration();
        for &b in m.bodies() {
            let frame = m.body(b).unwrap().frame();
            let t = state.transform_to_root(frame).unwrap();
            let t_eps = moved.transform_to_root(frame).unwrap();
            let twist = state.twist_wrt_world(b).unwrap();
            // world-frame twist: ω from Ṙ Rᵀ, linear part is the velocity of
            // the body point at the world origin, ṗ - ω × p
            let omega = (t_eps.rotation() * t.rotation().inverse()).scaled_axis() / eps;
            let p_dot = (t_eps.translation() - t.translation()) / eps;
            let linear = p_dot - omega.cross(t.translation());
            assert_relative_eq!(omega, twist.angular, epsilon = 1e-4);
            assert_relative_eq!(linear, twist.linear, epsilon = 1e-4);
        }
    }
}
