//! Joint without degrees of freedom, rigidly welding the child link to its parent.

use crate::joint_model::JointVariant;
use crate::kinematic_traits::{Pose, UniformSource, VariableBounds};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixedJoint;

impl JointVariant for FixedJoint {
    fn variable_names(&self, _joint_name: &str) -> Vec<String> {
        Vec::new()
    }

    fn initial_bounds(&self) -> Vec<VariableBounds> {
        Vec::new()
    }

    fn maximum_extent(&self, _bounds: &[VariableBounds]) -> f64 {
        0.0
    }

    fn default_values(&self, _bounds: &[VariableBounds], _values: &mut Vec<f64>) {}

    fn random_values<R: UniformSource + ?Sized>(
        &self,
        _rng: &mut R,
        _bounds: &[VariableBounds],
        _values: &mut Vec<f64>,
    ) {
    }

    fn random_values_near_by<R: UniformSource + ?Sized>(
        &self,
        _rng: &mut R,
        _bounds: &[VariableBounds],
        _near: &[f64],
        _distance: f64,
        _values: &mut Vec<f64>,
    ) {
    }

    fn interpolate(&self, _from: &[f64], _to: &[f64], _t: f64, _state: &mut [f64]) {}

    fn distance(&self, _values1: &[f64], _values2: &[f64]) -> f64 {
        0.0
    }

    fn satisfies_bounds(&self, _values: &[f64], _bounds: &[VariableBounds], _margin: f64) -> bool {
        true
    }

    fn normalize_rotation(&self, _values: &mut [f64]) {}

    fn enforce_bounds(&self, _values: &mut [f64], _bounds: &[VariableBounds]) {}

    fn compute_transform(&self, _values: &[f64]) -> Pose {
        Pose::identity()
    }

    fn compute_joint_state_values(&self, _transform: &Pose, _values: &mut [f64]) {}
}
