//! Global pose of one link and the bodies attached to it.

use parry3d::shape::SharedShape;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

use crate::attached_body::AttachedBody;
use crate::joint_state::JointState;
use crate::kinematic_error::KinematicError;
use crate::kinematic_traits::Pose;
use crate::link_model::LinkModel;
use crate::robot_model::RobotModel;

/// Cached world pose of a link. A dirty state holds a pose that no longer matches the
/// joint values above it and must be recomputed before use.
#[derive(Debug, Clone)]
pub struct LinkState {
    model: Arc<RobotModel>,
    link: usize,
    global_link_transform: Pose,
    global_collision_body_transform: Pose,
    attached_bodies: BTreeMap<String, AttachedBody>,
    dirty: bool,
}

impl LinkState {
    pub fn new(model: Arc<RobotModel>, link: usize) -> Self {
        LinkState {
            model,
            link,
            global_link_transform: Pose::identity(),
            global_collision_body_transform: Pose::identity(),
            attached_bodies: BTreeMap::new(),
            dirty: true,
        }
    }

    pub fn link_model(&self) -> &LinkModel {
        &self.model.link_models()[self.link]
    }

    pub fn name(&self) -> &str {
        self.link_model().name()
    }

    /// Index of the parent link, None for the root
    pub fn parent_link_index(&self) -> Option<usize> {
        self.link_model().parent_link()
    }

    /// Index of the joint connecting this link to its parent
    pub fn parent_joint_index(&self) -> usize {
        self.link_model().parent_joint()
    }

    pub fn global_link_transform(&self) -> &Pose {
        &self.global_link_transform
    }

    pub fn global_collision_body_transform(&self) -> &Pose {
        &self.global_collision_body_transform
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Places the link below the given parent pose (the root transform for the root link):
    /// parent, then the fixed joint origin, then the joint's variable transform.
    /// Attached bodies are left as they are; see [`LinkState::update_attached_bodies`].
    pub fn compute_transform(&mut self, parent_transform: &Pose, joint: &JointState) {
        let link = &self.model.link_models()[self.link];
        debug_assert_eq!(joint.joint_index(), link.parent_joint());
        self.global_link_transform =
            parent_transform * link.joint_origin_transform() * joint.variable_transform();
        self.global_collision_body_transform =
            self.global_link_transform * link.collision_origin_transform();
        self.dirty = false;
    }

    /// Sets the world pose of the link directly and moves its attached bodies along.
    pub fn update_given_global_link_transform(&mut self, transform: &Pose) {
        self.global_link_transform = *transform;
        self.global_collision_body_transform =
            transform * self.model.link_models()[self.link].collision_origin_transform();
        self.dirty = false;
        self.update_attached_bodies();
    }

    /// Recomputes the attached body transforms from the current link pose.
    pub fn update_attached_bodies(&mut self) {
        for body in self.attached_bodies.values_mut() {
            body.compute_transform(&self.global_link_transform);
        }
    }

    /// Attaches a body under the given id. Ids are unique per link.
    pub fn attach_body(
        &mut self,
        id: &str,
        shapes: Vec<SharedShape>,
        attach_transforms: Vec<Pose>,
        touch_links: BTreeSet<String>,
    ) -> Result<(), KinematicError> {
        if self.attached_bodies.contains_key(id) {
            return Err(KinematicError::DuplicateAttachedBody {
                link: self.name().to_string(),
                id: id.to_string(),
            });
        }
        let mut body = AttachedBody::new(self.name(), id, shapes, attach_transforms, touch_links);
        body.compute_transform(&self.global_link_transform);
        debug!(link = self.name(), body = id, shapes = body.shapes().len(), "Attached body");
        self.attached_bodies.insert(id.to_string(), body);
        Ok(())
    }

    /// Removes the body, returns false if no body with this id was attached.
    pub fn clear_attached_body(&mut self, id: &str) -> bool {
        let removed = self.attached_bodies.remove(id).is_some();
        if removed {
            debug!(link = self.name(), body = id, "Cleared attached body");
        }
        removed
    }

    pub fn clear_attached_bodies(&mut self) {
        if !self.attached_bodies.is_empty() {
            debug!(link = self.name(), count = self.attached_bodies.len(), "Cleared attached bodies");
        }
        self.attached_bodies.clear();
    }

    pub fn attached_body(&self, id: &str) -> Option<&AttachedBody> {
        self.attached_bodies.get(id)
    }

    pub fn has_attached_body(&self, id: &str) -> bool {
        self.attached_bodies.contains_key(id)
    }

    /// Attached bodies ordered by id
    pub fn attached_bodies(&self) -> impl Iterator<Item = &AttachedBody> {
        self.attached_bodies.values()
    }
}
