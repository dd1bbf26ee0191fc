use std::f64::consts::PI;
use rand::SeedableRng;
use rand::rngs::StdRng;
use crate::constraint_sampler::{JointConstraint, JointConstraintSampler};
use crate::robot_state::RobotState;
use crate::tests::test_utils::{are_isometries_approx_equal, floating_robot, mobile_manipulator};

const SMALL: f64 = 1e-9;

#[test]
fn test_distance_laws() {
    let model = mobile_manipulator();
    let mut rng = StdRng::seed_from_u64(3);
    let mut a = RobotState::new(model.clone());
    let mut b = RobotState::new(model);
    for _ in 0..20 {
        a.set_to_random_values(&mut rng);
        b.set_to_random_values(&mut rng);
        assert!(a.distance(&a).abs() < SMALL);
        assert!((a.distance(&b) - b.distance(&a)).abs() < SMALL);
        assert!(a.distance(&b) >= 0.0);
    }
}

#[test]
fn test_interpolation_end_points() {
    let model = mobile_manipulator();
    let mut rng = StdRng::seed_from_u64(5);
    let mut from = RobotState::new(model.clone());
    let mut to = RobotState::new(model);
    from.set_to_random_values(&mut rng);
    to.set_to_random_values(&mut rng);

    let start = from.interpolate(&to, 0.0);
    assert!(start.distance(&from) < SMALL);
    assert!(start.is_up_to_date());
    let end = from.interpolate(&to, 1.0);
    assert!(end.distance(&to) < SMALL);

    let middle = from.interpolate(&to, 0.5);
    let halfway = middle.distance(&from);
    assert!((halfway - middle.distance(&to)).abs() < 1e-6);
    assert!(middle.satisfies_bounds(0.0));
}

#[test]
fn test_interpolation_wraps_around_pi() {
    let model = mobile_manipulator();
    let mut from = RobotState::new(model.clone());
    let mut to = RobotState::new(model);
    from.set_joint_values("base_joint", &[0.0, 0.0, 3.0]).expect("known joint");
    to.set_joint_values("base_joint", &[0.0, 0.0, -3.0]).expect("known joint");
    from.set_joint_values("pan", &[-3.0]).expect("known joint");
    to.set_joint_values("pan", &[3.0]).expect("known joint");

    let middle = from.interpolate(&to, 0.5);
    let theta = middle.joint_values("base_joint").expect("known joint")[2];
    assert!((theta.abs() - PI).abs() < 1e-9);
    let pan = middle.joint_values("pan").expect("known joint")[0];
    assert!((pan.abs() - PI).abs() < 1e-9);
}

#[test]
fn test_interpolated_angles_stay_normalized() {
    let model = mobile_manipulator();
    let mut from = RobotState::new(model.clone());
    let mut to = RobotState::new(model);
    from.set_joint_values("base_joint", &[0.0, 0.0, -3.0]).expect("known joint");
    to.set_joint_values("base_joint", &[0.0, 0.0, 3.0]).expect("known joint");
    from.set_joint_values("pan", &[-3.0]).expect("known joint");
    to.set_joint_values("pan", &[3.0]).expect("known joint");

    for step in 0..=20 {
        let waypoint = from.interpolate(&to, step as f64 / 20.0);
        let theta = waypoint.joint_values("base_joint").expect("known joint")[2];
        assert!(theta > -PI && theta <= PI, "theta {} at step {}", theta, step);
        let pan = waypoint.joint_values("pan").expect("known joint")[0];
        assert!(pan > -PI && pan <= PI, "pan {} at step {}", pan, step);
    }
}

#[test]
fn test_near_by_sampling() {
    let model = mobile_manipulator();
    let mut rng = StdRng::seed_from_u64(9);
    let mut near = RobotState::new(model.clone());
    near.set_to_random_values(&mut rng);
    let mut state = RobotState::new(model);
    for _ in 0..50 {
        state.set_to_random_values_near_by(&mut rng, &near, 0.1);
        assert!(state.satisfies_bounds(0.0));
        for (joint, reference) in state.joint_states().iter().zip(near.joint_states()) {
            if joint.joint_model().state_space_dimension() == 1 {
                assert!(joint.distance(reference) <= 0.1 + SMALL, "{} moved too far", joint.name());
            }
        }
    }
}

#[test]
fn test_near_by_sampling_without_distance_limit() {
    let mut rng = StdRng::seed_from_u64(10);
    for model in [mobile_manipulator(), floating_robot()] {
        let mut near = RobotState::new(model.clone());
        near.set_to_random_values(&mut rng);
        let mut state = RobotState::new(model.clone());
        for distance in [model.maximum_extent(), 1e308, f64::INFINITY] {
            for _ in 0..20 {
                state.set_to_random_values_near_by(&mut rng, &near, distance);
                assert!(state.satisfies_bounds(0.0), "{} at distance {}", model.name(), distance);
                assert!(state.variable_values().iter().all(|v| v.is_finite()));
            }
        }
    }

    // Planar base: unbounded x and y stay at the origin, theta covers the circle
    let model = mobile_manipulator();
    let near = RobotState::new(model.clone());
    let mut state = RobotState::new(model);
    for _ in 0..50 {
        state.set_to_random_values_near_by(&mut rng, &near, 1e308);
        let base = state.joint_values("base_joint").expect("known joint");
        assert_eq!(&base[..2], &[0.0, 0.0]);
        assert!(base[2] > -PI && base[2] <= PI);
        let pan = state.joint_values("pan").expect("known joint")[0];
        assert!(pan > -PI && pan <= PI);
    }
}

#[test]
fn test_near_by_angles_stay_normalized() {
    let model = mobile_manipulator();
    let mut rng = StdRng::seed_from_u64(14);
    let mut near = RobotState::new(model.clone());
    near.set_joint_values("base_joint", &[0.0, 0.0, PI]).expect("known joint");
    near.set_joint_values("pan", &[PI]).expect("known joint");
    let mut state = RobotState::new(model);
    for distance in [0.5, 3.0, 10.0] {
        for _ in 0..50 {
            state.set_to_random_values_near_by(&mut rng, &near, distance);
            let theta = state.joint_values("base_joint").expect("known joint")[2];
            assert!(theta > -PI && theta <= PI);
            let pan = state.joint_values("pan").expect("known joint")[0];
            assert!(pan > -PI && pan <= PI);
        }
    }
}

#[test]
fn test_constrained_sampling_with_unlimited_tolerance() {
    let model = mobile_manipulator();
    let sampler = JointConstraintSampler::configure(
        model.clone(),
        &[
            JointConstraint::symmetric("base_joint/x", 0.0, f64::INFINITY),
            JointConstraint::symmetric("shoulder", 0.0, f64::INFINITY),
        ],
    )
    .expect("constraints are satisfiable");
    let mut rng = StdRng::seed_from_u64(15);
    let mut state = RobotState::new(model);
    for _ in 0..20 {
        sampler.sample(&mut rng, &mut state).expect("sampled");
        assert_eq!(state.joint_values("base_joint").expect("known joint")[0], 0.0);
        assert!(state.satisfies_bounds(0.0));
    }
}

#[test]
fn test_enforce_and_default_values() {
    let mut state = RobotState::new(mobile_manipulator());
    state
        .set_variable_values(&[0.0, 0.0, 4.0, 3.0, -2.0, 0.9, 7.0])
        .expect("valid length");
    assert!(!state.satisfies_bounds(0.0));
    assert!(state.satisfies_bounds(1.0));
    state.enforce_bounds();
    assert!(state.satisfies_bounds(0.0));
    let values = state.variable_values();
    assert!((values[2] - (4.0 - 2.0 * PI)).abs() < SMALL);
    assert_eq!(&values[3..6], &[2.5, -1.5, 0.4]);
    assert!((values[6] - (7.0 - 2.0 * PI)).abs() < SMALL);

    state.set_to_default_values();
    assert_eq!(state.variable_values(), vec![0.0; 7]);
}

#[test]
fn test_floating_robot_round_trip() {
    let model = floating_robot();
    let mut rng = StdRng::seed_from_u64(13);
    let mut state = RobotState::new(model);
    assert_eq!(state.variable_values(), vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]);

    for _ in 0..20 {
        state.set_to_random_values(&mut rng);
        assert!(state.satisfies_bounds(0.0));
        state.update_link_transforms();
        let body = *state.global_link_transform("body").expect("known link");

        let mut copy = state.clone();
        copy.set_joint_transform("body_joint", &body).expect("known joint");
        copy.update_link_transforms();
        assert!(copy.distance(&state) < 1e-6);
        let flap = copy.global_link_transform("flap").expect("known link");
        assert!(are_isometries_approx_equal(flap, state.global_link_transform("flap").expect("known link"), 1e-9));
    }
}
