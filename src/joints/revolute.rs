//! Single rotational degree of freedom about a fixed axis.
//! A continuous revolute joint has no limits and is treated as a circle in every
//! operation, a bounded one is a plain interval of angles.

use nalgebra::{Unit, UnitQuaternion, Vector3};
use std::f64::consts::PI;

use crate::joint_model::JointVariant;
use crate::kinematic_traits::{Pose, UniformSource, VariableBounds};
use crate::utils::{angular_distance, interpolate_angle, normalize_angle, random_angle_near_by};

#[derive(Debug, Clone, PartialEq)]
pub struct RevoluteJoint {
    /// Rotation axis in the joint frame
    pub axis: Unit<Vector3<f64>>,
    pub continuous: bool,
}

impl JointVariant for RevoluteJoint {
    fn variable_names(&self, joint_name: &str) -> Vec<String> {
        vec![joint_name.to_string()]
    }

    fn initial_bounds(&self) -> Vec<VariableBounds> {
        vec![VariableBounds::new(-PI, PI)]
    }

    fn maximum_extent(&self, bounds: &[VariableBounds]) -> f64 {
        if self.continuous {
            PI
        } else {
            bounds[0].range()
        }
    }

    fn default_values(&self, bounds: &[VariableBounds], values: &mut Vec<f64>) {
        if self.continuous {
            values.push(0.0);
        } else {
            values.push(bounds[0].default_value());
        }
    }

    fn random_values<R: UniformSource + ?Sized>(
        &self,
        rng: &mut R,
        bounds: &[VariableBounds],
        values: &mut Vec<f64>,
    ) {
        if self.continuous {
            values.push(normalize_angle(rng.uniform_real(-PI, PI)));
        } else {
            values.push(bounds[0].sample(rng));
        }
    }

    fn random_values_near_by<R: UniformSource + ?Sized>(
        &self,
        rng: &mut R,
        bounds: &[VariableBounds],
        near: &[f64],
        distance: f64,
        values: &mut Vec<f64>,
    ) {
        if self.continuous {
            values.push(random_angle_near_by(rng, near[0], distance));
        } else {
            values.push(bounds[0].sample_near_by(rng, near[0], distance));
        }
    }

    fn interpolate(&self, from: &[f64], to: &[f64], t: f64, state: &mut [f64]) {
        state[0] = if self.continuous {
            interpolate_angle(from[0], to[0], t)
        } else {
            from[0] + (to[0] - from[0]) * t
        };
    }

    fn distance(&self, values1: &[f64], values2: &[f64]) -> f64 {
        if self.continuous {
            angular_distance(values1[0], values2[0])
        } else {
            (values1[0] - values2[0]).abs()
        }
    }

    fn satisfies_bounds(&self, values: &[f64], bounds: &[VariableBounds], margin: f64) -> bool {
        // Every angle is reachable on a continuous joint
        self.continuous || bounds[0].contains(values[0], margin)
    }

    fn normalize_rotation(&self, values: &mut [f64]) {
        if self.continuous {
            values[0] = normalize_angle(values[0]);
        }
    }

    fn enforce_bounds(&self, values: &mut [f64], bounds: &[VariableBounds]) {
        if self.continuous {
            self.normalize_rotation(values);
        } else {
            values[0] = bounds[0].clamp(values[0]);
        }
    }

    fn compute_transform(&self, values: &[f64]) -> Pose {
        Pose::from_parts(
            nalgebra::Translation3::identity(),
            UnitQuaternion::from_axis_angle(&self.axis, values[0]),
        )
    }

    fn compute_joint_state_values(&self, transform: &Pose, values: &mut [f64]) {
        // Signed angle of the rotation projected on the joint axis
        values[0] = transform.rotation.scaled_axis().dot(&self.axis.into_inner());
    }
}
