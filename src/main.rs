use std::collections::BTreeSet;
use std::f64::consts::PI;
use std::sync::Arc;

use nalgebra::{Translation3, UnitQuaternion, Vector3};
use parry3d::shape::SharedShape;
use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_kinematic_tree::constraint_sampler::{JointConstraint, JointConstraintSampler};
use rs_kinematic_tree::joint_model::JointModel;
use rs_kinematic_tree::kinematic_traits::Pose;
use rs_kinematic_tree::link_model::LinkSpec;
use rs_kinematic_tree::robot_model::RobotModel;
use rs_kinematic_tree::robot_state::RobotState;
use rs_kinematic_tree::utils::{dump_pose, dump_values};

fn offset(x: f64, y: f64, z: f64) -> Pose {
    Pose::from_parts(Translation3::new(x, y, z), UnitQuaternion::identity())
}

/// Mobile manipulator: planar base, two revolute joints and a telescopic forearm with a gripper.
fn mobile_manipulator() -> anyhow::Result<RobotModel> {
    let specs = vec![
        LinkSpec::root("base", JointModel::planar("base_joint")),
        LinkSpec::child(
            "torso",
            "base",
            JointModel::revolute("torso_yaw", Vector3::z_axis(), -PI, PI),
            offset(0.0, 0.0, 0.4),
        ),
        LinkSpec::child(
            "upper_arm",
            "torso",
            JointModel::revolute("shoulder", Vector3::y_axis(), -1.5, 1.5),
            offset(0.0, 0.0, 0.3),
        ),
        LinkSpec::child(
            "forearm",
            "upper_arm",
            JointModel::prismatic("telescope", Vector3::x_axis(), 0.0, 0.4),
            offset(0.5, 0.0, 0.0),
        ),
        LinkSpec::child("gripper", "forearm", JointModel::fixed("gripper_mount"), offset(0.1, 0.0, 0.0))
            .with_collision_origin(offset(0.05, 0.0, 0.0)),
    ];
    Ok(RobotModel::new("mobile_manipulator", specs)?)
}

fn print_links(state: &RobotState) {
    for link in state.link_states() {
        print!("{:>10}: ", link.name());
        dump_pose(link.global_link_transform());
    }
}

/// Usage example.
fn main() -> anyhow::Result<()> {
    let model = Arc::new(mobile_manipulator()?);
    let mut state = RobotState::new(Arc::clone(&model));
    let mut rng = StdRng::seed_from_u64(2024);

    println!("Default configuration:");
    dump_values(model.variable_names(), &state.variable_values());
    print_links(&state);

    state.set_to_random_values(&mut rng);
    state.update_link_transforms();
    println!("Random configuration:");
    dump_values(model.variable_names(), &state.variable_values());
    print_links(&state);

    // Tool held by the gripper, moving with it from now on
    state.attach_body(
        "gripper",
        "screwdriver",
        vec![SharedShape::cylinder(0.1, 0.01)],
        vec![offset(0.1, 0.0, 0.0)],
        BTreeSet::from(["gripper".to_string(), "forearm".to_string()]),
    )?;

    let goal = {
        let mut goal = RobotState::new(Arc::clone(&model));
        goal.set_to_random_values_near_by(&mut rng, &state, 0.5);
        goal
    };
    println!("Moving {:.4} in configuration space", state.distance(&goal));
    for step in 0..=4 {
        let waypoint = state.interpolate(&goal, step as f64 / 4.0);
        if let Some(tool) = waypoint.attached_body("screwdriver") {
            print!("step {}, tool: ", step);
            dump_pose(&tool.global_collision_body_transforms()[0]);
        }
    }

    // Keep the arm level while the rest moves freely
    let sampler = JointConstraintSampler::configure(
        Arc::clone(&model),
        &[JointConstraint::symmetric("shoulder", 0.0, 0.05)],
    )?;
    sampler.sample(&mut rng, &mut state)?;
    state.update_link_transforms();
    println!("Constrained sample:");
    dump_values(model.variable_names(), &state.variable_values());
    print_links(&state);

    #[cfg(feature = "parallel")]
    {
        let configurations: Vec<Vec<f64>> = (0..8).map(|_| model.random_values(&mut rng)).collect();
        let poses = rs_kinematic_tree::batch::global_link_transforms(&state, &configurations)?;
        println!("Gripper over {} random configurations:", poses.len());
        let gripper = model.link_index("gripper").ok_or_else(|| anyhow::anyhow!("no gripper link"))?;
        for link_poses in &poses {
            dump_pose(&link_poses[gripper]);
        }
    }
    Ok(())
}
