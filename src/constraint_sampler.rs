//! Sampling configurations that respect joint position constraints.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::kinematic_error::KinematicError;
use crate::kinematic_traits::{UniformSource, VariableBounds};
use crate::robot_model::RobotModel;
use crate::robot_state::RobotState;

/// Requires a variable to stay within `[position - tolerance_below, position + tolerance_above]`.
#[derive(Debug, Clone, PartialEq)]
pub struct JointConstraint {
    pub variable: String,
    pub position: f64,
    pub tolerance_above: f64,
    pub tolerance_below: f64,
}

impl JointConstraint {
    pub fn new(variable: &str, position: f64, tolerance_above: f64, tolerance_below: f64) -> Self {
        JointConstraint {
            variable: variable.to_string(),
            position,
            tolerance_above,
            tolerance_below,
        }
    }

    /// Same tolerance on both sides
    pub fn symmetric(variable: &str, position: f64, tolerance: f64) -> Self {
        Self::new(variable, position, tolerance, tolerance)
    }
}

/// Range a single constrained variable is sampled from
#[derive(Debug, Clone, Copy, PartialEq)]
struct ConstrainedVariable {
    index: usize,
    bounds: VariableBounds,
}

/// Samples whole configurations where constrained variables are drawn uniformly from the
/// intersection of their joint bounds and all constraints on them. Joints that are not fully
/// constrained get ordinary random values first.
#[derive(Debug, Clone)]
pub struct JointConstraintSampler {
    model: Arc<RobotModel>,
    constrained: Vec<ConstrainedVariable>,
    /// Joints sampled without constraints
    free_joints: Vec<usize>,
}

impl JointConstraintSampler {
    /// Builds the sampler. Constraints on unknown variables are skipped; fails if none remain
    /// or if the constraints on some variable leave no admissible value.
    pub fn configure(
        model: Arc<RobotModel>,
        constraints: &[JointConstraint],
    ) -> Result<Self, KinematicError> {
        let mut ranges: BTreeMap<usize, VariableBounds> = BTreeMap::new();
        for constraint in constraints {
            let Some(index) = model.variable_index(&constraint.variable) else {
                warn!(variable = constraint.variable.as_str(), "Constraint on unknown variable skipped");
                continue;
            };
            let joint_bounds = model.variable_bounds()[index];
            let range = ranges.entry(index).or_insert(joint_bounds);
            range.lower = range.lower.max(constraint.position - constraint.tolerance_below);
            range.upper = range.upper.min(constraint.position + constraint.tolerance_above);
            debug!(
                variable = constraint.variable.as_str(),
                lower = range.lower,
                upper = range.upper,
                "Joint constraint bounds"
            );
            if range.lower > range.upper + f64::EPSILON {
                error!(
                    variable = constraint.variable.as_str(),
                    lower = range.lower,
                    upper = range.upper,
                    "No admissible values for constrained variable"
                );
                return Err(KinematicError::EmptyConstraintRange {
                    variable: constraint.variable.clone(),
                    lower: range.lower,
                    upper: range.upper,
                });
            }
        }

        if ranges.is_empty() {
            warn!("No valid joint constraints");
            return Err(KinematicError::NoValidConstraints);
        }

        let free_joints = (0..model.joint_models().len())
            .filter(|&joint| {
                let variables = model.joint_variable_range(joint);
                variables.is_empty() || !variables.into_iter().all(|v| ranges.contains_key(&v))
            })
            .collect();
        let constrained = ranges
            .into_iter()
            .map(|(index, bounds)| ConstrainedVariable {
                index,
                // Ranges within epsilon of empty collapse to a point
                bounds: VariableBounds {
                    lower: bounds.lower.min(bounds.upper),
                    upper: bounds.upper,
                },
            })
            .collect();
        Ok(JointConstraintSampler {
            model,
            constrained,
            free_joints,
        })
    }

    pub fn model(&self) -> &Arc<RobotModel> {
        &self.model
    }

    /// Indices of the constrained variables with their sampling ranges
    pub fn constrained_bounds(&self) -> Vec<(usize, VariableBounds)> {
        self.constrained.iter().map(|c| (c.index, c.bounds)).collect()
    }

    /// Writes a new configuration into `state`. The state must belong to the same model.
    pub fn sample<R: UniformSource + ?Sized>(
        &self,
        rng: &mut R,
        state: &mut RobotState,
    ) -> Result<(), KinematicError> {
        assert!(
            Arc::ptr_eq(&self.model, state.model()),
            "Sampler configured for robot {} used with another model",
            self.model.name()
        );
        let mut values = state.variable_values();
        let mut joint_values = Vec::new();
        for &joint in &self.free_joints {
            joint_values.clear();
            let joint_model = &self.model.joint_models()[joint];
            joint_model.random_values_with_bounds(rng, joint_model.variable_bounds(), &mut joint_values);
            values[self.model.joint_variable_range(joint)].copy_from_slice(&joint_values);
        }
        for variable in &self.constrained {
            values[variable.index] = variable.bounds.sample(rng);
        }
        state.set_variable_values(&values)
    }

    /// Same as [`JointConstraintSampler::sample`]; the current state is not used as a seed.
    pub fn project<R: UniformSource + ?Sized>(
        &self,
        rng: &mut R,
        state: &mut RobotState,
    ) -> Result<(), KinematicError> {
        self.sample(rng, state)
    }
}
