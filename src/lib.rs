//! Joint configuration spaces and forward kinematics for articulated robots described as a
//! tree of links.
//!
//! # Features
//!
//! - Fixed, revolute (bounded or continuous), prismatic, planar and floating joints with
//!   sampling, interpolation, distance, bounds checking and enforcement that respect the
//!   periodic nature of orientation variables.
//! - Conversion between joint values and the rigid transform the joint produces.
//! - Robot model built from link descriptions given in any order, stored parents first so
//!   every subtree occupies a contiguous index range.
//! - Robot state with per-link dirty flags: changing a joint invalidates only the links below
//!   it, and propagation recomputes only what is stale.
//! - Bodies attached to links (grasped objects, tools) that move with them.
//! - Sampling configurations within joint position constraints.
//! - Batch forward kinematics on cloned states, spread over threads (feature `parallel`).
//!
//! Poses are `nalgebra::Isometry3<f64>` (aliased as [`kinematic_traits::Pose`]). Any
//! `rand::Rng` can be used where a source of random numbers is needed.
//!
//! ```
//! use std::sync::Arc;
//! use nalgebra::{Translation3, UnitQuaternion, Vector3};
//! use rs_kinematic_tree::joint_model::JointModel;
//! use rs_kinematic_tree::kinematic_traits::Pose;
//! use rs_kinematic_tree::link_model::LinkSpec;
//! use rs_kinematic_tree::robot_model::RobotModel;
//! use rs_kinematic_tree::robot_state::RobotState;
//!
//! let model = RobotModel::new("arm", vec![
//!     LinkSpec::root("base", JointModel::fixed("world_joint")),
//!     LinkSpec::child(
//!         "link1",
//!         "base",
//!         JointModel::revolute("j1", Vector3::z_axis(), -3.0, 3.0),
//!         Pose::from_parts(Translation3::new(0.0, 0.0, 0.5), UnitQuaternion::identity()),
//!     ),
//! ]).unwrap();
//! let mut state = RobotState::new(Arc::new(model));
//! state.set_joint_values("j1", &[1.0]).unwrap();
//! state.update_link_transforms();
//! let pose = state.global_link_transform("link1").unwrap();
//! assert!((pose.translation.z - 0.5).abs() < 1e-12);
//! ```

pub mod kinematic_traits;
pub mod kinematic_error;

#[path = "utils/utils.rs"]
pub mod utils;

pub mod joint_model;

#[path = "joints/fixed.rs"]
pub mod fixed_joint;

#[path = "joints/revolute.rs"]
pub mod revolute_joint;

#[path = "joints/prismatic.rs"]
pub mod prismatic_joint;

#[path = "joints/planar.rs"]
pub mod planar_joint;

#[path = "joints/floating.rs"]
pub mod floating_joint;

pub mod link_model;
pub mod robot_model;

pub mod joint_state;
pub mod link_state;
pub mod attached_body;
pub mod robot_state;

pub mod constraint_sampler;

#[cfg(feature = "parallel")]
pub mod batch;

#[cfg(test)]
mod tests;
