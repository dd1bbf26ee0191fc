//! Bodies rigidly attached to a link, like a grasped object or a tool.

use parry3d::shape::SharedShape;
use std::collections::BTreeSet;
use std::fmt;

use crate::kinematic_traits::Pose;

/// Object welded to a link at fixed offsets. It moves with the link and carries the names of
/// links it may touch, so collision checking can ignore those contacts. Shapes are only
/// referenced here, never inspected.
#[derive(Clone)]
pub struct AttachedBody {
    id: String,
    link: String,
    shapes: Vec<SharedShape>,
    /// Offset of every shape relative to the link frame
    attach_transforms: Vec<Pose>,
    touch_links: BTreeSet<String>,
    /// Link global transform composed with every offset
    global_transforms: Vec<Pose>,
}

impl AttachedBody {
    /// Panics if the number of shapes and offsets differ.
    pub fn new(
        link: &str,
        id: &str,
        shapes: Vec<SharedShape>,
        attach_transforms: Vec<Pose>,
        touch_links: BTreeSet<String>,
    ) -> Self {
        assert_eq!(
            shapes.len(),
            attach_transforms.len(),
            "Attached body {} needs exactly one transform per shape",
            id
        );
        AttachedBody {
            id: id.to_string(),
            link: link.to_string(),
            global_transforms: attach_transforms.clone(),
            shapes,
            attach_transforms,
            touch_links,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name of the link this body is attached to
    pub fn attached_link_name(&self) -> &str {
        &self.link
    }

    pub fn shapes(&self) -> &[SharedShape] {
        &self.shapes
    }

    /// Offsets of the shapes relative to the link
    pub fn fixed_transforms(&self) -> &[Pose] {
        &self.attach_transforms
    }

    /// Links the body is allowed to touch
    pub fn touch_links(&self) -> &BTreeSet<String> {
        &self.touch_links
    }

    pub fn global_collision_body_transforms(&self) -> &[Pose] {
        &self.global_transforms
    }

    /// Recomputes the shape transforms for the given link pose.
    pub fn compute_transform(&mut self, parent_link_transform: &Pose) {
        for (global, local) in self.global_transforms.iter_mut().zip(&self.attach_transforms) {
            *global = parent_link_transform * local;
        }
    }
}

impl fmt::Debug for AttachedBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachedBody")
            .field("id", &self.id)
            .field("link", &self.link)
            .field("shapes", &self.shapes.len())
            .field("attach_transforms", &self.attach_transforms)
            .field("touch_links", &self.touch_links)
            .finish()
    }
}
