//! Forward kinematics for many configurations at once, spread over threads.

use rayon::prelude::*;

use crate::kinematic_error::KinematicError;
use crate::kinematic_traits::Pose;
use crate::robot_state::RobotState;

/// Global link transforms (in link order) for every configuration. Each configuration is
/// propagated on its own clone of `state`, so the root transform and attached bodies of
/// `state` apply to all of them and `state` itself is left unchanged.
pub fn global_link_transforms(
    state: &RobotState,
    configurations: &[Vec<f64>],
) -> Result<Vec<Vec<Pose>>, KinematicError> {
    configurations
        .par_iter()
        .map(|values| {
            let mut local = state.clone();
            local.set_variable_values(values)?;
            local.update_link_transforms();
            Ok(local
                .link_states()
                .iter()
                .map(|link| *link.global_link_transform())
                .collect())
        })
        .collect()
}
