//! Motion in the XY plane of the joint frame: translation x, y and rotation theta about Z.
//! Theta lives on the circle and is kept in (-PI, PI].

use nalgebra::{Translation3, UnitQuaternion, Vector3};
use std::f64::consts::PI;

use crate::joint_model::JointVariant;
use crate::kinematic_traits::{Pose, UniformSource, VariableBounds};
use crate::utils::{angular_distance, interpolate_angle, normalize_angle, random_angle_near_by};

const X: usize = 0;
const Y: usize = 1;
const THETA: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct PlanarJoint {
    /// Weight of theta when combined with the translation into one distance
    pub angular_distance_weight: f64,
}

impl Default for PlanarJoint {
    fn default() -> Self {
        Self {
            angular_distance_weight: 1.0,
        }
    }
}

impl JointVariant for PlanarJoint {
    fn variable_names(&self, joint_name: &str) -> Vec<String> {
        ["x", "y", "theta"]
            .iter()
            .map(|local| format!("{}/{}", joint_name, local))
            .collect()
    }

    fn initial_bounds(&self) -> Vec<VariableBounds> {
        vec![
            VariableBounds::unbounded(),
            VariableBounds::unbounded(),
            VariableBounds::new(-PI, PI),
        ]
    }

    fn maximum_extent(&self, bounds: &[VariableBounds]) -> f64 {
        let dx = bounds[X].lower - bounds[X].upper;
        let dy = bounds[Y].lower - bounds[Y].upper;
        (dx * dx + dy * dy).sqrt() + PI * self.angular_distance_weight
    }

    fn default_values(&self, bounds: &[VariableBounds], values: &mut Vec<f64>) {
        values.push(bounds[X].default_value());
        values.push(bounds[Y].default_value());
        values.push(0.0);
    }

    fn random_values<R: UniformSource + ?Sized>(
        &self,
        rng: &mut R,
        bounds: &[VariableBounds],
        values: &mut Vec<f64>,
    ) {
        values.extend(bounds[X..=Y].iter().map(|b| b.sample(rng)));
        values.push(normalize_angle(bounds[THETA].sample(rng)));
    }

    fn random_values_near_by<R: UniformSource + ?Sized>(
        &self,
        rng: &mut R,
        bounds: &[VariableBounds],
        near: &[f64],
        distance: f64,
        values: &mut Vec<f64>,
    ) {
        for i in X..=Y {
            values.push(bounds[i].sample_near_by(rng, near[i], distance));
        }
        // A zero weight leaves the rotation where it is, even for an unbounded distance
        let da = if self.angular_distance_weight > 0.0 {
            self.angular_distance_weight * distance
        } else {
            0.0
        };
        values.push(random_angle_near_by(rng, near[THETA], da));
    }

    fn interpolate(&self, from: &[f64], to: &[f64], t: f64, state: &mut [f64]) {
        state[X] = from[X] + (to[X] - from[X]) * t;
        state[Y] = from[Y] + (to[Y] - from[Y]) * t;
        state[THETA] = interpolate_angle(from[THETA], to[THETA], t);
    }

    fn distance(&self, values1: &[f64], values2: &[f64]) -> f64 {
        let dx = values1[X] - values2[X];
        let dy = values1[Y] - values2[Y];
        (dx * dx + dy * dy).sqrt()
            + self.angular_distance_weight * angular_distance(values1[THETA], values2[THETA])
    }

    fn satisfies_bounds(&self, values: &[f64], bounds: &[VariableBounds], margin: f64) -> bool {
        values
            .iter()
            .zip(bounds)
            .all(|(&v, b)| b.contains(v, margin))
    }

    fn normalize_rotation(&self, values: &mut [f64]) {
        values[THETA] = normalize_angle(values[THETA]);
    }

    fn enforce_bounds(&self, values: &mut [f64], bounds: &[VariableBounds]) {
        self.normalize_rotation(values);
        for i in X..=Y {
            values[i] = bounds[i].clamp(values[i]);
        }
    }

    fn compute_transform(&self, values: &[f64]) -> Pose {
        Pose::from_parts(
            Translation3::new(values[X], values[Y], 0.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), values[THETA]),
        )
    }

    fn compute_joint_state_values(&self, transform: &Pose, values: &mut [f64]) {
        values[X] = transform.translation.x;
        values[Y] = transform.translation.y;

        let q = transform.rotation;
        // q and -q are the same rotation, take the one with w >= 0
        let (w, z) = if q.w < 0.0 { (-q.w, -q.k) } else { (q.w, q.k) };
        let s_squared = 1.0 - w * w;
        values[THETA] = if s_squared < 10.0 * f64::EPSILON {
            0.0
        } else {
            let s = 1.0 / s_squared.sqrt();
            (w.min(1.0).acos() * 2.0) * (z * s)
        };
    }
}
