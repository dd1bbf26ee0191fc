//! Static description of a single rigid link and how it hangs off its parent.

use crate::kinematic_traits::Pose;
use crate::joint_model::JointModel;

/// Description of a link as supplied by whoever loads the robot. Turned into [`LinkModel`]
/// when the [`crate::robot_model::RobotModel`] is built.
#[derive(Debug, Clone)]
pub struct LinkSpec {
    pub name: String,
    /// Name of the parent link, None only for the root
    pub parent: Option<String>,
    /// Joint connecting this link to its parent. For the root this joint places the robot
    /// in the world (fixed for a bolted arm, planar or floating for mobile robots).
    pub joint: JointModel,
    /// Fixed transform from the parent link frame to the joint frame
    pub joint_origin: Pose,
    /// Fixed transform from the link frame to its collision geometry
    pub collision_origin: Pose,
}

impl LinkSpec {
    pub fn root(name: &str, joint: JointModel) -> Self {
        LinkSpec {
            name: name.to_string(),
            parent: None,
            joint,
            joint_origin: Pose::identity(),
            collision_origin: Pose::identity(),
        }
    }

    pub fn child(name: &str, parent: &str, joint: JointModel, joint_origin: Pose) -> Self {
        LinkSpec {
            name: name.to_string(),
            parent: Some(parent.to_string()),
            joint,
            joint_origin,
            collision_origin: Pose::identity(),
        }
    }

    pub fn with_collision_origin(mut self, collision_origin: Pose) -> Self {
        self.collision_origin = collision_origin;
        self
    }
}

/// Immutable link of a built robot model. Links are stored root first, every parent
/// before its children, and the descendants of a link occupy the index range right after it.
#[derive(Debug, Clone)]
pub struct LinkModel {
    pub(crate) name: String,
    pub(crate) index: usize,
    pub(crate) parent_link: Option<usize>,
    pub(crate) parent_joint: usize,
    pub(crate) child_links: Vec<usize>,
    /// One past the index of the last descendant
    pub(crate) subtree_end: usize,
    pub(crate) joint_origin_transform: Pose,
    pub(crate) collision_origin_transform: Pose,
}

impl LinkModel {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of this link in the model (and in every state of it)
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn parent_link(&self) -> Option<usize> {
        self.parent_link
    }

    /// Index of the joint connecting this link to its parent
    pub fn parent_joint(&self) -> usize {
        self.parent_joint
    }

    pub fn child_links(&self) -> &[usize] {
        &self.child_links
    }

    /// Indices of all links below this one, in propagation order.
    pub fn descendants(&self) -> std::ops::Range<usize> {
        self.index + 1..self.subtree_end
    }

    pub fn joint_origin_transform(&self) -> &Pose {
        &self.joint_origin_transform
    }

    pub fn collision_origin_transform(&self) -> &Pose {
        &self.collision_origin_transform
    }
}
