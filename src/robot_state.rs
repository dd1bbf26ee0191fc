//! Configuration of a whole robot and the link poses derived from it.
//!
//! Joint and link states are kept in arrays indexed the same way as the model, so joint `i`
//! always drives link `i` and the descendants of a link follow it contiguously. Changing a
//! joint marks its link and every descendant dirty; [`RobotState::update_link_transforms`]
//! then recomputes only the dirty links, parents first.

use parry3d::shape::SharedShape;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::attached_body::AttachedBody;
use crate::joint_state::JointState;
use crate::kinematic_error::KinematicError;
use crate::kinematic_traits::{Pose, UniformSource};
use crate::link_state::LinkState;
use crate::robot_model::RobotModel;

/// Mutable state of a robot. Cloning gives an independent state that shares the immutable
/// model, so clones can be moved to other threads.
#[derive(Debug, Clone)]
pub struct RobotState {
    model: Arc<RobotModel>,
    root_transform: Pose,
    joint_states: Vec<JointState>,
    link_states: Vec<LinkState>,
}

impl RobotState {
    /// State at the default configuration with all link poses computed.
    pub fn new(model: Arc<RobotModel>) -> Self {
        let joint_states = (0..model.joint_models().len())
            .map(|joint| JointState::new(Arc::clone(&model), joint))
            .collect();
        let link_states = (0..model.link_models().len())
            .map(|link| LinkState::new(Arc::clone(&model), link))
            .collect();
        let mut state = RobotState {
            model,
            root_transform: Pose::identity(),
            joint_states,
            link_states,
        };
        state.update_link_transforms();
        state
    }

    pub fn model(&self) -> &Arc<RobotModel> {
        &self.model
    }

    pub fn joint_states(&self) -> &[JointState] {
        &self.joint_states
    }

    pub fn link_states(&self) -> &[LinkState] {
        &self.link_states
    }

    pub fn joint_state(&self, joint: &str) -> Option<&JointState> {
        self.model.joint_index(joint).map(|j| &self.joint_states[j])
    }

    pub fn link_state(&self, link: &str) -> Option<&LinkState> {
        self.model.link_index(link).map(|l| &self.link_states[l])
    }

    /// All variables, joints concatenated in tree order
    pub fn variable_values(&self) -> Vec<f64> {
        let mut values = Vec::with_capacity(self.model.variable_count());
        for joint in &self.joint_states {
            values.extend_from_slice(joint.values());
        }
        values
    }

    /// Sets the whole configuration. Only joints whose values actually change invalidate
    /// the links below them.
    pub fn set_variable_values(&mut self, values: &[f64]) -> Result<(), KinematicError> {
        if values.len() != self.model.variable_count() {
            return Err(KinematicError::InvalidLength {
                expected: self.model.variable_count(),
                found: values.len(),
            });
        }
        for joint in 0..self.joint_states.len() {
            let range = self.model.joint_variable_range(joint);
            if self.joint_states[joint].values() != &values[range.clone()] {
                self.apply_joint_values(joint, &values[range]);
            }
        }
        Ok(())
    }

    /// Sets the named variables and keeps the others. Nothing changes if a name is unknown.
    pub fn set_variable_values_by_name(
        &mut self,
        values: &HashMap<String, f64>,
    ) -> Result<(), KinematicError> {
        let mut all = self.variable_values();
        for (name, value) in values {
            let index = self
                .model
                .variable_index(name)
                .ok_or_else(|| KinematicError::UnknownVariable(name.clone()))?;
            all[index] = *value;
        }
        self.set_variable_values(&all)
    }

    pub fn joint_values(&self, joint: &str) -> Option<&[f64]> {
        self.joint_state(joint).map(|j| j.values())
    }

    pub fn set_joint_values(&mut self, joint: &str, values: &[f64]) -> Result<(), KinematicError> {
        let index = self.joint_index(joint)?;
        let expected = self.joint_states[index].values().len();
        if values.len() != expected {
            return Err(KinematicError::InvalidLength {
                expected,
                found: values.len(),
            });
        }
        self.apply_joint_values(index, values);
        Ok(())
    }

    /// Sets a joint from the transform it should produce.
    pub fn set_joint_transform(&mut self, joint: &str, transform: &Pose) -> Result<(), KinematicError> {
        let index = self.joint_index(joint)?;
        self.joint_states[index].set_variable_transform(transform);
        self.invalidate_subtree(index);
        Ok(())
    }

    pub fn set_to_default_values(&mut self) {
        for joint in 0..self.joint_states.len() {
            let values = self.joint_states[joint].joint_model().default_values();
            self.apply_joint_values(joint, &values);
        }
    }

    pub fn set_to_random_values<R: UniformSource + ?Sized>(&mut self, rng: &mut R) {
        for joint in 0..self.joint_states.len() {
            let values = self.joint_states[joint].joint_model().random_values(rng);
            self.apply_joint_values(joint, &values);
        }
    }

    /// Samples every joint within `distance` of the same joint in `near`.
    pub fn set_to_random_values_near_by<R: UniformSource + ?Sized>(
        &mut self,
        rng: &mut R,
        near: &RobotState,
        distance: f64,
    ) {
        self.assert_same_model(near);
        for joint in 0..self.joint_states.len() {
            let values = self.joint_states[joint].joint_model().random_values_near_by(
                rng,
                near.joint_states[joint].values(),
                distance,
            );
            self.apply_joint_values(joint, &values);
        }
    }

    /// Sum of the per-joint distances. Both states must come from the same model.
    pub fn distance(&self, other: &RobotState) -> f64 {
        self.assert_same_model(other);
        self.joint_states
            .iter()
            .zip(&other.joint_states)
            .map(|(a, b)| a.distance(b))
            .sum()
    }

    /// New state at fraction `t` of the way to `to`, with link poses computed. Attached
    /// bodies and the root transform are taken from `self`.
    pub fn interpolate(&self, to: &RobotState, t: f64) -> RobotState {
        self.assert_same_model(to);
        let mut state = self.clone();
        for (joint, (from, to)) in self.joint_states.iter().zip(&to.joint_states).enumerate() {
            let mut values = from.values().to_vec();
            from.joint_model().interpolate(from.values(), to.values(), t, &mut values);
            state.apply_joint_values(joint, &values);
        }
        state.update_link_transforms();
        state
    }

    pub fn satisfies_bounds(&self, margin: f64) -> bool {
        self.joint_states.iter().all(|joint| joint.satisfies_bounds(margin))
    }

    pub fn enforce_bounds(&mut self) {
        // Continuous joints always satisfy their bounds but may still need wrapping
        for joint in 0..self.joint_states.len() {
            let before = self.joint_states[joint].values().to_vec();
            self.joint_states[joint].enforce_bounds();
            if self.joint_states[joint].values() != before.as_slice() {
                self.invalidate_subtree(joint);
            }
        }
    }

    /// Pose of the model root relative to the world
    pub fn root_transform(&self) -> &Pose {
        &self.root_transform
    }

    pub fn set_root_transform(&mut self, transform: Pose) {
        self.root_transform = transform;
        self.invalidate_subtree(0);
    }

    /// Recomputes every dirty link, parents before children, along with its attached bodies.
    pub fn update_link_transforms(&mut self) {
        for link in 0..self.link_states.len() {
            if self.link_states[link].is_dirty() {
                self.update_link(link);
            }
        }
    }

    /// Places a link at a known world pose and recomputes everything below it from there.
    /// Joint values are not solved for, so the pose holds until an ancestor joint changes.
    pub fn update_state_with_link_at(&mut self, link: &str, transform: &Pose) -> Result<(), KinematicError> {
        let index = self.link_index(link)?;
        self.link_states[index].update_given_global_link_transform(transform);
        for descendant in self.model.link_models()[index].descendants() {
            self.update_link(descendant);
        }
        Ok(())
    }

    /// True if no link pose is waiting to be recomputed.
    pub fn is_up_to_date(&self) -> bool {
        self.link_states.iter().all(|link| !link.is_dirty())
    }

    /// Cached world pose of the link. Stale unless [`RobotState::is_up_to_date`].
    pub fn global_link_transform(&self, link: &str) -> Option<&Pose> {
        self.link_state(link).map(|l| l.global_link_transform())
    }

    pub fn global_collision_body_transform(&self, link: &str) -> Option<&Pose> {
        self.link_state(link).map(|l| l.global_collision_body_transform())
    }

    pub fn attach_body(
        &mut self,
        link: &str,
        id: &str,
        shapes: Vec<SharedShape>,
        attach_transforms: Vec<Pose>,
        touch_links: BTreeSet<String>,
    ) -> Result<(), KinematicError> {
        let index = self.link_index(link)?;
        self.link_states[index].attach_body(id, shapes, attach_transforms, touch_links)
    }

    /// Returns false if the link is unknown or has no such body.
    pub fn clear_attached_body(&mut self, link: &str, id: &str) -> bool {
        match self.model.link_index(link) {
            Some(index) => self.link_states[index].clear_attached_body(id),
            None => false,
        }
    }

    pub fn clear_attached_bodies_on(&mut self, link: &str) -> Result<(), KinematicError> {
        let index = self.link_index(link)?;
        self.link_states[index].clear_attached_bodies();
        Ok(())
    }

    /// Removes the bodies from every link.
    pub fn clear_attached_bodies(&mut self) {
        for link in &mut self.link_states {
            link.clear_attached_bodies();
        }
    }

    /// First body with this id, searching links in tree order
    pub fn attached_body(&self, id: &str) -> Option<&AttachedBody> {
        self.link_states.iter().find_map(|link| link.attached_body(id))
    }

    pub fn has_attached_body(&self, id: &str) -> bool {
        self.attached_body(id).is_some()
    }

    pub fn attached_bodies(&self) -> Vec<&AttachedBody> {
        self.link_states.iter().flat_map(|link| link.attached_bodies()).collect()
    }

    fn apply_joint_values(&mut self, joint: usize, values: &[f64]) {
        self.joint_states[joint].set_values(values);
        self.invalidate_subtree(joint);
    }

    /// Joint `i` drives link `i`, so a joint change dirties that link and its descendants.
    fn invalidate_subtree(&mut self, link: usize) {
        let end = self.model.link_models()[link].descendants().end;
        for state in &mut self.link_states[link..end] {
            state.mark_dirty();
        }
    }

    fn update_link(&mut self, link: usize) {
        let parent = match self.link_states[link].parent_link_index() {
            Some(p) => *self.link_states[p].global_link_transform(),
            None => self.root_transform,
        };
        let joint = self.link_states[link].parent_joint_index();
        let state = &mut self.link_states[link];
        state.compute_transform(&parent, &self.joint_states[joint]);
        state.update_attached_bodies();
    }

    fn joint_index(&self, joint: &str) -> Result<usize, KinematicError> {
        self.model
            .joint_index(joint)
            .ok_or_else(|| KinematicError::UnknownJoint(joint.to_string()))
    }

    fn link_index(&self, link: &str) -> Result<usize, KinematicError> {
        self.model
            .link_index(link)
            .ok_or_else(|| KinematicError::UnknownLink(link.to_string()))
    }

    fn assert_same_model(&self, other: &RobotState) {
        assert!(
            Arc::ptr_eq(&self.model, &other.model),
            "States of robot {} and {} are not comparable",
            self.model.name(),
            other.model.name()
        );
    }
}
