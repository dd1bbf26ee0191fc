//! Variable values of one joint together with the transform they produce.

use std::sync::Arc;

use crate::joint_model::JointModel;
use crate::kinematic_traits::Pose;
use crate::robot_model::RobotModel;

/// Current values of a joint. The variable transform is refreshed on every change, so it
/// always matches the values.
#[derive(Debug, Clone)]
pub struct JointState {
    model: Arc<RobotModel>,
    joint: usize,
    values: Vec<f64>,
    variable_transform: Pose,
}

impl JointState {
    /// State of the given joint of the model at its default values.
    pub fn new(model: Arc<RobotModel>, joint: usize) -> Self {
        let joint_model = &model.joint_models()[joint];
        let values = joint_model.default_values();
        let variable_transform = joint_model.compute_transform(&values);
        JointState {
            model,
            joint,
            values,
            variable_transform,
        }
    }

    pub fn joint_model(&self) -> &JointModel {
        &self.model.joint_models()[self.joint]
    }

    /// Index of the joint in the robot model
    pub fn joint_index(&self) -> usize {
        self.joint
    }

    pub fn name(&self) -> &str {
        self.joint_model().name()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Transform the joint applies between its origin frame and the child link.
    pub fn variable_transform(&self) -> &Pose {
        &self.variable_transform
    }

    /// Panics if the number of values does not match the joint's dimension.
    pub fn set_values(&mut self, values: &[f64]) {
        assert_eq!(
            values.len(),
            self.values.len(),
            "Joint {} expects {} values",
            self.name(),
            self.values.len()
        );
        self.values.copy_from_slice(values);
        self.variable_transform = self.joint_model().compute_transform(&self.values);
    }

    /// Recovers the values from a joint transform. Components the joint cannot express are
    /// dropped, so the stored transform may differ from the one given.
    pub fn set_variable_transform(&mut self, transform: &Pose) {
        let values = self.model.joint_models()[self.joint].compute_joint_state_values(transform);
        self.set_values(&values);
    }

    pub fn satisfies_bounds(&self, margin: f64) -> bool {
        self.joint_model().satisfies_own_bounds(&self.values, margin)
    }

    pub fn enforce_bounds(&mut self) {
        let joint_model = &self.model.joint_models()[self.joint];
        joint_model.enforce_own_bounds(&mut self.values);
        self.variable_transform = joint_model.compute_transform(&self.values);
    }

    pub fn distance(&self, other: &JointState) -> f64 {
        assert_eq!(self.joint, other.joint, "Distance between different joints");
        self.joint_model().distance(&self.values, &other.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link_model::LinkSpec;
    use nalgebra::Vector3;

    fn single_joint_model() -> Arc<RobotModel> {
        let specs = vec![
            LinkSpec::root("base", JointModel::fixed("world_joint")),
            LinkSpec::child(
                "arm",
                "base",
                JointModel::revolute("shoulder", Vector3::z_axis(), -1.0, 1.0),
                Pose::identity(),
            ),
        ];
        Arc::new(RobotModel::new("single", specs).expect("valid model"))
    }

    #[test]
    fn test_transform_tracks_values() {
        let model = single_joint_model();
        let mut state = JointState::new(model, 1);
        assert_eq!(state.values(), &[0.0]);
        assert_eq!(state.variable_transform(), &Pose::identity());

        state.set_values(&[0.5]);
        let angle = state.variable_transform().rotation.angle();
        assert!((angle - 0.5).abs() < 1e-12);

        state.set_values(&[3.0]);
        assert!(!state.satisfies_bounds(0.0));
        state.enforce_bounds();
        assert_eq!(state.values(), &[1.0]);
        assert!((state.variable_transform().rotation.angle() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_values_from_transform() {
        let model = single_joint_model();
        let mut source = JointState::new(Arc::clone(&model), 1);
        source.set_values(&[-0.7]);
        let mut target = JointState::new(model, 1);
        target.set_variable_transform(source.variable_transform());
        assert!((target.values()[0] + 0.7).abs() < 1e-12);
        assert!(target.distance(&source) < 1e-12);
    }

    #[test]
    #[should_panic]
    fn test_wrong_number_of_values() {
        let mut state = JointState::new(single_joint_model(), 1);
        state.set_values(&[0.1, 0.2]);
    }
}
