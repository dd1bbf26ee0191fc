//! Single translational degree of freedom along a fixed axis.

use nalgebra::{Translation3, Unit, UnitQuaternion, Vector3};

use crate::joint_model::JointVariant;
use crate::kinematic_traits::{Pose, UniformSource, VariableBounds};

#[derive(Debug, Clone, PartialEq)]
pub struct PrismaticJoint {
    /// Direction of motion in the joint frame
    pub axis: Unit<Vector3<f64>>,
}

impl JointVariant for PrismaticJoint {
    fn variable_names(&self, joint_name: &str) -> Vec<String> {
        vec![joint_name.to_string()]
    }

    fn initial_bounds(&self) -> Vec<VariableBounds> {
        vec![VariableBounds::unbounded()]
    }

    fn maximum_extent(&self, bounds: &[VariableBounds]) -> f64 {
        bounds[0].range()
    }

    fn default_values(&self, bounds: &[VariableBounds], values: &mut Vec<f64>) {
        values.push(bounds[0].default_value());
    }

    fn random_values<R: UniformSource + ?Sized>(
        &self,
        rng: &mut R,
        bounds: &[VariableBounds],
        values: &mut Vec<f64>,
    ) {
        values.push(bounds[0].sample(rng));
    }

    fn random_values_near_by<R: UniformSource + ?Sized>(
        &self,
        rng: &mut R,
        bounds: &[VariableBounds],
        near: &[f64],
        distance: f64,
        values: &mut Vec<f64>,
    ) {
        values.push(bounds[0].sample_near_by(rng, near[0], distance));
    }

    fn interpolate(&self, from: &[f64], to: &[f64], t: f64, state: &mut [f64]) {
        state[0] = from[0] + (to[0] - from[0]) * t;
    }

    fn distance(&self, values1: &[f64], values2: &[f64]) -> f64 {
        (values1[0] - values2[0]).abs()
    }

    fn satisfies_bounds(&self, values: &[f64], bounds: &[VariableBounds], margin: f64) -> bool {
        bounds[0].contains(values[0], margin)
    }

    fn normalize_rotation(&self, _values: &mut [f64]) {}

    fn enforce_bounds(&self, values: &mut [f64], bounds: &[VariableBounds]) {
        values[0] = bounds[0].clamp(values[0]);
    }

    fn compute_transform(&self, values: &[f64]) -> Pose {
        Pose::from_parts(
            Translation3::from(self.axis.into_inner() * values[0]),
            UnitQuaternion::identity(),
        )
    }

    fn compute_joint_state_values(&self, transform: &Pose, values: &mut [f64]) {
        values[0] = transform.translation.vector.dot(&self.axis.into_inner());
    }
}
