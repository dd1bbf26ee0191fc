//! Joint models: the configuration space of one joint and all operations on it.
//!
//! A [`JointModel`] is immutable once the robot description is built and is shared by every
//! state of that robot. The joint kind is a closed set ([`JointType`]); each kind knows its
//! variable layout and how to sample, interpolate, measure, clamp and convert its values.
//! Operations taking explicit bounds accept any bounds of the right length, so callers can
//! pass tightened limits (for instance from constraints) instead of the joint's own.
//!
//! ```
//! use rs_kinematic_tree::joint_model::JointModel;
//!
//! let base = JointModel::planar("base");
//! assert_eq!(base.state_space_dimension(), 3);
//! assert_eq!(base.default_values(), vec![0.0, 0.0, 0.0]);
//! assert_eq!(base.distance(&[0.0, 0.0, 0.0], &[3.0, 4.0, 0.0]), 5.0);
//! ```

use nalgebra::{Unit, Vector3};

use crate::fixed_joint::FixedJoint;
use crate::floating_joint::FloatingJoint;
use crate::kinematic_error::KinematicError;
use crate::kinematic_traits::{Pose, UniformSource, VariableBounds};
use crate::planar_joint::PlanarJoint;
use crate::prismatic_joint::PrismaticJoint;
use crate::revolute_joint::RevoluteJoint;

/// Operations every joint kind provides. Slices passed in are exactly one joint long.
pub(crate) trait JointVariant {
    fn variable_names(&self, joint_name: &str) -> Vec<String>;

    fn initial_bounds(&self) -> Vec<VariableBounds>;

    fn maximum_extent(&self, bounds: &[VariableBounds]) -> f64;

    fn default_values(&self, bounds: &[VariableBounds], values: &mut Vec<f64>);

    fn random_values<R: UniformSource + ?Sized>(
        &self,
        rng: &mut R,
        bounds: &[VariableBounds],
        values: &mut Vec<f64>,
    );

    fn random_values_near_by<R: UniformSource + ?Sized>(
        &self,
        rng: &mut R,
        bounds: &[VariableBounds],
        near: &[f64],
        distance: f64,
        values: &mut Vec<f64>,
    );

    fn interpolate(&self, from: &[f64], to: &[f64], t: f64, state: &mut [f64]);

    fn distance(&self, values1: &[f64], values2: &[f64]) -> f64;

    fn satisfies_bounds(&self, values: &[f64], bounds: &[VariableBounds], margin: f64) -> bool;

    fn normalize_rotation(&self, values: &mut [f64]);

    fn enforce_bounds(&self, values: &mut [f64], bounds: &[VariableBounds]);

    fn compute_transform(&self, values: &[f64]) -> Pose;

    fn compute_joint_state_values(&self, transform: &Pose, values: &mut [f64]);
}

/// The kind of a joint, with the data specific to that kind.
#[derive(Debug, Clone, PartialEq)]
pub enum JointType {
    Fixed(FixedJoint),
    Revolute(RevoluteJoint),
    Prismatic(PrismaticJoint),
    Planar(PlanarJoint),
    Floating(FloatingJoint),
}

/// Runs the same expression on whatever variant the joint is.
macro_rules! dispatch {
    ($joint_type:expr, $variant:ident => $call:expr) => {
        match $joint_type {
            JointType::Fixed($variant) => $call,
            JointType::Revolute($variant) => $call,
            JointType::Prismatic($variant) => $call,
            JointType::Planar($variant) => $call,
            JointType::Floating($variant) => $call,
        }
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct JointModel {
    name: String,
    joint_type: JointType,
    variable_names: Vec<String>,
    variable_bounds: Vec<VariableBounds>,
}

impl JointModel {
    fn new(name: &str, joint_type: JointType) -> Self {
        let (variable_names, variable_bounds) =
            dispatch!(&joint_type, j => (j.variable_names(name), j.initial_bounds()));
        JointModel {
            name: name.to_string(),
            joint_type,
            variable_names,
            variable_bounds,
        }
    }

    /// Joint that rigidly connects the child link to its parent.
    pub fn fixed(name: &str) -> Self {
        Self::new(name, JointType::Fixed(FixedJoint))
    }

    /// Revolute joint limited to [lower, upper] radians.
    pub fn revolute(name: &str, axis: Unit<Vector3<f64>>, lower: f64, upper: f64) -> Self {
        Self::new(
            name,
            JointType::Revolute(RevoluteJoint {
                axis,
                continuous: false,
            }),
        )
        .with_bounds(vec![VariableBounds::new(lower, upper)])
    }

    /// Revolute joint that can turn without limit, like a wheel.
    pub fn continuous(name: &str, axis: Unit<Vector3<f64>>) -> Self {
        Self::new(
            name,
            JointType::Revolute(RevoluteJoint {
                axis,
                continuous: true,
            }),
        )
    }

    /// Prismatic joint sliding along the axis within [lower, upper].
    pub fn prismatic(name: &str, axis: Unit<Vector3<f64>>, lower: f64, upper: f64) -> Self {
        Self::new(name, JointType::Prismatic(PrismaticJoint { axis }))
            .with_bounds(vec![VariableBounds::new(lower, upper)])
    }

    /// Planar joint (x, y, theta), translation unbounded unless restricted later.
    pub fn planar(name: &str) -> Self {
        Self::new(name, JointType::Planar(PlanarJoint::default()))
    }

    /// Floating joint (x, y, z and orientation quaternion), translation unbounded.
    pub fn floating(name: &str) -> Self {
        Self::new(name, JointType::Floating(FloatingJoint::default()))
    }

    /// Replaces all variable bounds. Panics if the count does not match the dimension.
    pub fn with_bounds(mut self, bounds: Vec<VariableBounds>) -> Self {
        assert_eq!(
            bounds.len(),
            self.state_space_dimension(),
            "Joint {} needs one bounds pair per variable",
            self.name
        );
        self.variable_bounds = bounds;
        self
    }

    /// Replaces the bounds of a single variable, found by its full name.
    pub fn with_variable_bounds(
        mut self,
        variable: &str,
        bounds: VariableBounds,
    ) -> Result<Self, KinematicError> {
        let index = self
            .variable_index(variable)
            .ok_or_else(|| KinematicError::UnknownVariable(variable.to_string()))?;
        if bounds.lower > bounds.upper {
            return Err(KinematicError::InvalidBounds {
                variable: variable.to_string(),
                lower: bounds.lower,
                upper: bounds.upper,
            });
        }
        self.variable_bounds[index] = bounds;
        Ok(self)
    }

    /// Sets how rotation is weighted against translation in distances and near-by sampling.
    /// Only joints combining both (planar, floating) use it. Panics unless the weight is
    /// non-negative.
    pub fn with_angular_distance_weight(mut self, weight: f64) -> Self {
        assert!(
            weight >= 0.0,
            "Angular distance weight of joint {} must be non-negative, got {}",
            self.name,
            weight
        );
        match &mut self.joint_type {
            JointType::Planar(j) => j.angular_distance_weight = weight,
            JointType::Floating(j) => j.angular_distance_weight = weight,
            _ => {}
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn joint_type(&self) -> &JointType {
        &self.joint_type
    }

    /// Fully qualified variable names, "joint/x" style for multi variable joints.
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    pub fn variable_bounds(&self) -> &[VariableBounds] {
        &self.variable_bounds
    }

    pub fn variable_index(&self, variable: &str) -> Option<usize> {
        self.variable_names.iter().position(|n| n == variable)
    }

    pub fn variable_bounds_of(&self, variable: &str) -> Option<VariableBounds> {
        self.variable_index(variable).map(|i| self.variable_bounds[i])
    }

    pub fn angular_distance_weight(&self) -> f64 {
        match &self.joint_type {
            JointType::Planar(j) => j.angular_distance_weight,
            JointType::Floating(j) => j.angular_distance_weight,
            _ => 1.0,
        }
    }

    /// True for continuous revolute joints
    pub fn is_continuous(&self) -> bool {
        matches!(&self.joint_type, JointType::Revolute(j) if j.continuous)
    }

    pub fn state_space_dimension(&self) -> usize {
        self.variable_names.len()
    }

    /// Upper bound on `distance` between any two configurations within the joint's bounds.
    pub fn maximum_extent(&self) -> f64 {
        dispatch!(&self.joint_type, j => j.maximum_extent(&self.variable_bounds))
    }

    /// Appends the default configuration for the given bounds to `values`.
    pub fn default_values_with_bounds(&self, bounds: &[VariableBounds], values: &mut Vec<f64>) {
        self.check_bounds(bounds);
        dispatch!(&self.joint_type, j => j.default_values(bounds, values))
    }

    pub fn default_values(&self) -> Vec<f64> {
        let mut values = Vec::with_capacity(self.state_space_dimension());
        self.default_values_with_bounds(&self.variable_bounds, &mut values);
        values
    }

    /// Appends one uniformly sampled configuration to `values`. Unbounded variables get 0.
    pub fn random_values_with_bounds<R: UniformSource + ?Sized>(
        &self,
        rng: &mut R,
        bounds: &[VariableBounds],
        values: &mut Vec<f64>,
    ) {
        self.check_bounds(bounds);
        dispatch!(&self.joint_type, j => j.random_values(rng, bounds, values))
    }

    pub fn random_values<R: UniformSource + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        let mut values = Vec::with_capacity(self.state_space_dimension());
        self.random_values_with_bounds(rng, &self.variable_bounds, &mut values);
        values
    }

    /// Appends a configuration sampled within `distance` of `near` (this joint's values only).
    /// Angular windows are scaled by the angular distance weight and results are normalized.
    pub fn random_values_near_by_with_bounds<R: UniformSource + ?Sized>(
        &self,
        rng: &mut R,
        bounds: &[VariableBounds],
        near: &[f64],
        distance: f64,
        values: &mut Vec<f64>,
    ) {
        self.check_bounds(bounds);
        self.check_values(near);
        dispatch!(&self.joint_type, j => j.random_values_near_by(rng, bounds, near, distance, values))
    }

    pub fn random_values_near_by<R: UniformSource + ?Sized>(
        &self,
        rng: &mut R,
        near: &[f64],
        distance: f64,
    ) -> Vec<f64> {
        let mut values = Vec::with_capacity(self.state_space_dimension());
        self.random_values_near_by_with_bounds(rng, &self.variable_bounds, near, distance, &mut values);
        values
    }

    /// Writes the configuration at fraction `t` of the way from `from` to `to` into `state`.
    /// Periodic variables follow the shorter arc; inputs must be within bounds.
    pub fn interpolate(&self, from: &[f64], to: &[f64], t: f64, state: &mut [f64]) {
        self.check_values(from);
        self.check_values(to);
        self.check_values(state);
        dispatch!(&self.joint_type, j => j.interpolate(from, to, t, state))
    }

    /// Translational distance plus weighted angular distance. Symmetric, zero for equal values.
    pub fn distance(&self, values1: &[f64], values2: &[f64]) -> f64 {
        self.check_values(values1);
        self.check_values(values2);
        dispatch!(&self.joint_type, j => j.distance(values1, values2))
    }

    /// True if every variable is within its own bounds widened by `margin`.
    pub fn satisfies_bounds(&self, values: &[f64], bounds: &[VariableBounds], margin: f64) -> bool {
        self.check_values(values);
        self.check_bounds(bounds);
        dispatch!(&self.joint_type, j => j.satisfies_bounds(values, bounds, margin))
    }

    pub fn satisfies_own_bounds(&self, values: &[f64], margin: f64) -> bool {
        self.satisfies_bounds(values, &self.variable_bounds, margin)
    }

    /// Wraps angles into (-PI, PI] and renormalizes quaternions. No-op for Euclidean joints.
    pub fn normalize_rotation(&self, values: &mut [f64]) {
        self.check_values(values);
        dispatch!(&self.joint_type, j => j.normalize_rotation(values))
    }

    /// Normalizes rotation, then clamps the bounded Euclidean variables.
    pub fn enforce_bounds(&self, values: &mut [f64], bounds: &[VariableBounds]) {
        self.check_values(values);
        self.check_bounds(bounds);
        dispatch!(&self.joint_type, j => j.enforce_bounds(values, bounds))
    }

    pub fn enforce_own_bounds(&self, values: &mut [f64]) {
        self.enforce_bounds(values, &self.variable_bounds)
    }

    /// Local transform of the joint for the given configuration.
    pub fn compute_transform(&self, values: &[f64]) -> Pose {
        self.check_values(values);
        dispatch!(&self.joint_type, j => j.compute_transform(values))
    }

    /// Recovers configuration values from a local transform. Components of the transform
    /// the joint cannot produce are ignored.
    pub fn compute_joint_state_values(&self, transform: &Pose) -> Vec<f64> {
        let mut values = vec![0.0; self.state_space_dimension()];
        dispatch!(&self.joint_type, j => j.compute_joint_state_values(transform, &mut values));
        values
    }

    fn check_values(&self, values: &[f64]) {
        assert_eq!(
            values.len(),
            self.state_space_dimension(),
            "Joint {} expects {} values",
            self.name,
            self.state_space_dimension()
        );
    }

    fn check_bounds(&self, bounds: &[VariableBounds]) {
        assert_eq!(
            bounds.len(),
            self.state_space_dimension(),
            "Joint {} expects {} bounds",
            self.name,
            self.state_space_dimension()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn all_kinds() -> Vec<JointModel> {
        vec![
            JointModel::fixed("weld"),
            JointModel::revolute("elbow", Vector3::y_axis(), -2.0, 2.0),
            JointModel::continuous("wheel", Vector3::x_axis()),
            JointModel::prismatic("lift", Vector3::z_axis(), 0.0, 0.8),
            JointModel::planar("base")
                .with_bounds(vec![
                    VariableBounds::new(-5.0, 5.0),
                    VariableBounds::unbounded(),
                    VariableBounds::new(-PI, PI),
                ])
                .with_angular_distance_weight(0.5),
            JointModel::floating("world"),
        ]
    }

    #[test]
    fn test_dimensions_agree() {
        let mut rng = StdRng::seed_from_u64(42);
        let expected = [0, 1, 1, 1, 3, 7];
        for (joint, dim) in all_kinds().iter().zip(expected) {
            assert_eq!(joint.state_space_dimension(), dim, "{}", joint.name());
            assert_eq!(joint.variable_names().len(), dim);
            assert_eq!(joint.variable_bounds().len(), dim);
            assert_eq!(joint.default_values().len(), dim);
            assert_eq!(joint.random_values(&mut rng).len(), dim);
        }
    }

    #[test]
    fn test_variable_names() {
        assert_eq!(JointModel::planar("base").variable_names(), &["base/x", "base/y", "base/theta"]);
        assert_eq!(JointModel::revolute("elbow", Vector3::y_axis(), -1.0, 1.0).variable_names(), &["elbow"]);
        assert_eq!(JointModel::floating("world").variable_names()[6], "world/rot_w");
        assert!(JointModel::fixed("weld").variable_names().is_empty());
    }

    #[test]
    fn test_enforce_then_satisfies() {
        let mut rng = StdRng::seed_from_u64(43);
        for joint in all_kinds() {
            for _ in 0..50 {
                let mut values = joint.random_values(&mut rng);
                for v in values.iter_mut() {
                    *v = *v * 3.0 + 4.0;
                }
                joint.enforce_own_bounds(&mut values);
                assert!(joint.satisfies_own_bounds(&values, 0.0), "{} {:?}", joint.name(), values);
            }
        }
    }

    #[test]
    fn test_normalize_rotation_idempotent() {
        let mut rng = StdRng::seed_from_u64(44);
        for joint in all_kinds() {
            for _ in 0..50 {
                let mut values = joint.random_values(&mut rng);
                for v in values.iter_mut() {
                    *v *= 5.0;
                }
                joint.normalize_rotation(&mut values);
                let once = values.clone();
                joint.normalize_rotation(&mut values);
                assert_eq!(once, values, "{}", joint.name());
            }
        }
    }

    #[test]
    fn test_interpolation_end_points_and_distance_laws() {
        let mut rng = StdRng::seed_from_u64(45);
        for joint in all_kinds() {
            for _ in 0..50 {
                let a = joint.random_values(&mut rng);
                let b = joint.random_values(&mut rng);
                let mut state = vec![0.0; a.len()];

                joint.interpolate(&a, &b, 0.0, &mut state);
                assert!(joint.distance(&state, &a) < 1e-7, "{}", joint.name());
                joint.interpolate(&a, &b, 1.0, &mut state);
                assert!(joint.distance(&state, &b) < 1e-7, "{}", joint.name());

                assert_eq!(joint.distance(&a, &a), 0.0);
                assert!((joint.distance(&a, &b) - joint.distance(&b, &a)).abs() < 1e-12);
                assert!(joint.distance(&a, &b) >= 0.0);
            }
        }
    }

    #[test]
    fn test_distance_below_maximum_extent() {
        let mut rng = StdRng::seed_from_u64(46);
        let joints = [
            JointModel::revolute("elbow", Vector3::y_axis(), -2.0, 2.0),
            JointModel::continuous("wheel", Vector3::x_axis()),
            JointModel::prismatic("lift", Vector3::z_axis(), 0.0, 0.8),
        ];
        for joint in joints {
            for _ in 0..50 {
                let a = joint.random_values(&mut rng);
                let b = joint.random_values(&mut rng);
                assert!(joint.distance(&a, &b) <= joint.maximum_extent() + 1e-12);
            }
        }
    }

    #[test]
    fn test_planar_scenarios() {
        let planar = JointModel::planar("base");
        assert_eq!(planar.default_values(), vec![0.0, 0.0, 0.0]);
        assert_eq!(planar.distance(&[0.0, 0.0, 0.0], &[3.0, 4.0, 0.0]), 5.0);

        let mut state = [0.0; 3];
        planar.interpolate(&[0.0, 0.0, 3.0], &[0.0, 0.0, -3.0], 0.5, &mut state);
        assert!((state[2].abs() - PI).abs() < 1e-9, "theta {}", state[2]);
        assert_eq!(planar.maximum_extent(), f64::INFINITY);
    }

    #[test]
    fn test_planar_value_round_trip() {
        let mut rng = StdRng::seed_from_u64(47);
        let planar = JointModel::planar("base").with_bounds(vec![
            VariableBounds::new(-10.0, 10.0),
            VariableBounds::new(-10.0, 10.0),
            VariableBounds::new(-PI, PI),
        ]);
        for _ in 0..100 {
            let values = planar.random_values(&mut rng);
            let back = planar.compute_joint_state_values(&planar.compute_transform(&values));
            assert!(planar.distance(&values, &back) < 1e-7, "{:?} vs {:?}", values, back);
        }
    }

    #[test]
    fn test_variable_bounds_by_name() {
        let planar = JointModel::planar("base")
            .with_variable_bounds("base/x", VariableBounds::new(1.0, 2.0))
            .unwrap();
        assert_eq!(planar.variable_bounds_of("base/x"), Some(VariableBounds::new(1.0, 2.0)));
        assert_eq!(planar.default_values(), vec![1.5, 0.0, 0.0]);
        assert!(matches!(
            JointModel::planar("base").with_variable_bounds("base/z", VariableBounds::unbounded()),
            Err(KinematicError::UnknownVariable(_))
        ));
    }

    #[test]
    fn test_weight_only_for_combined_joints() {
        let revolute = JointModel::continuous("wheel", Vector3::x_axis()).with_angular_distance_weight(3.0);
        assert_eq!(revolute.angular_distance_weight(), 1.0);
        assert!(revolute.is_continuous());
        let floating = JointModel::floating("world").with_angular_distance_weight(3.0);
        assert_eq!(floating.angular_distance_weight(), 3.0);
    }

    #[test]
    #[should_panic(expected = "must be non-negative")]
    fn test_negative_angular_weight_rejected() {
        JointModel::planar("base").with_angular_distance_weight(-1.0);
    }

    #[test]
    #[should_panic(expected = "must be non-negative")]
    fn test_nan_angular_weight_rejected() {
        JointModel::floating("world").with_angular_distance_weight(f64::NAN);
    }

    #[test]
    fn test_zero_angular_weight_keeps_rotation_near_by() {
        let mut rng = StdRng::seed_from_u64(21);
        let planar = JointModel::planar("base").with_angular_distance_weight(0.0);
        let values = planar.random_values_near_by(&mut rng, &[0.0, 0.0, 1.0], f64::INFINITY);
        assert_eq!(values, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    #[should_panic]
    fn test_mismatched_lengths_are_contract_violations() {
        JointModel::planar("base").distance(&[0.0, 0.0], &[0.0, 0.0, 0.0]);
    }
}
