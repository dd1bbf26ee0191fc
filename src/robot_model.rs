//! The static kinematic tree: all links and joints of one robot, validated and laid out
//! for root-to-leaf propagation. Built once, then shared read-only (behind an `Arc`)
//! by any number of [`crate::robot_state::RobotState`] instances.

use std::collections::HashMap;
use std::ops::Range;
use tracing::debug;

use crate::joint_model::JointModel;
use crate::kinematic_error::KinematicError;
use crate::kinematic_traits::{UniformSource, VariableBounds};
use crate::link_model::{LinkModel, LinkSpec};

#[derive(Debug)]
pub struct RobotModel {
    name: String,
    links: Vec<LinkModel>,
    /// Joint i connects link i to its parent
    joints: Vec<JointModel>,
    link_index: HashMap<String, usize>,
    joint_index: HashMap<String, usize>,
    /// First variable of each joint in the full configuration vector, plus the total at the end
    variable_start: Vec<usize>,
    variable_names: Vec<String>,
    variable_index: HashMap<String, usize>,
    variable_bounds: Vec<VariableBounds>,
}

impl RobotModel {
    /// Builds the tree from link descriptions given in any order. Exactly one link must
    /// have no parent; every other parent must name an existing link.
    pub fn new(name: &str, specs: Vec<LinkSpec>) -> Result<Self, KinematicError> {
        let (parents, root) = Self::validate(&specs)?;

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); specs.len()];
        for (i, parent) in parents.iter().enumerate() {
            if let Some(p) = parent {
                children[*p].push(i);
            }
        }

        // Pre-order: parents before children, every subtree contiguous
        let mut order = Vec::with_capacity(specs.len());
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            order.push(i);
            stack.extend(children[i].iter().rev());
        }
        if order.len() < specs.len() {
            // Only a cycle detached from the root can be missed
            let mut reached = vec![false; specs.len()];
            order.iter().for_each(|&i| reached[i] = true);
            let lost = (0..specs.len()).find(|&i| !reached[i]).unwrap_or_default();
            return Err(KinematicError::UnreachableLink(specs[lost].name.clone()));
        }

        let mut position_of = vec![0; specs.len()];
        for (position, &i) in order.iter().enumerate() {
            position_of[i] = position;
        }

        let mut specs: Vec<Option<LinkSpec>> = specs.into_iter().map(Some).collect();
        let mut links = Vec::with_capacity(order.len());
        let mut joints = Vec::with_capacity(order.len());
        for (position, &i) in order.iter().enumerate() {
            let Some(spec) = specs[i].take() else {
                unreachable!("link visited twice");
            };
            links.push(LinkModel {
                name: spec.name,
                index: position,
                parent_link: parents[i].map(|p| position_of[p]),
                parent_joint: position,
                child_links: children[i].iter().map(|&c| position_of[c]).collect(),
                subtree_end: position + 1,
                joint_origin_transform: spec.joint_origin,
                collision_origin_transform: spec.collision_origin,
            });
            joints.push(spec.joint);
        }

        // Children sit after their parent, so walking backwards sees them first
        for position in (0..links.len()).rev() {
            if let Some(&last_child) = links[position].child_links.last() {
                links[position].subtree_end = links[last_child].subtree_end;
            }
        }

        let mut variable_start = Vec::with_capacity(joints.len() + 1);
        let mut variable_names = Vec::new();
        let mut variable_bounds = Vec::new();
        for joint in &joints {
            variable_start.push(variable_names.len());
            variable_names.extend(joint.variable_names().iter().cloned());
            variable_bounds.extend_from_slice(joint.variable_bounds());
        }
        variable_start.push(variable_names.len());

        let model = RobotModel {
            name: name.to_string(),
            link_index: links.iter().map(|l| (l.name.clone(), l.index)).collect(),
            joint_index: joints.iter().enumerate().map(|(i, j)| (j.name().to_string(), i)).collect(),
            variable_index: variable_names.iter().enumerate().map(|(i, n)| (n.clone(), i)).collect(),
            links,
            joints,
            variable_start,
            variable_names,
            variable_bounds,
        };
        debug!(
            robot = model.name.as_str(),
            links = model.links.len(),
            variables = model.variable_count(),
            "Robot model built"
        );
        Ok(model)
    }

    /// Returns the parent index of every link description and the root index.
    fn validate(specs: &[LinkSpec]) -> Result<(Vec<Option<usize>>, usize), KinematicError> {
        let mut by_name: HashMap<&str, usize> = HashMap::with_capacity(specs.len());
        let mut joint_names: HashMap<&str, usize> = HashMap::with_capacity(specs.len());
        for (i, spec) in specs.iter().enumerate() {
            if by_name.insert(spec.name.as_str(), i).is_some() {
                return Err(KinematicError::DuplicateLink(spec.name.clone()));
            }
            if joint_names.insert(spec.joint.name(), i).is_some() {
                return Err(KinematicError::DuplicateJoint(spec.joint.name().to_string()));
            }
        }

        let roots: Vec<usize> = (0..specs.len()).filter(|&i| specs[i].parent.is_none()).collect();
        let root = match roots.as_slice() {
            [] => return Err(KinematicError::NoRootLink),
            [root] => *root,
            _ => {
                return Err(KinematicError::MultipleRootLinks(
                    roots.iter().map(|&i| specs[i].name.clone()).collect(),
                ));
            }
        };

        let parents = specs
            .iter()
            .map(|spec| match &spec.parent {
                None => Ok(None),
                Some(parent) => by_name.get(parent.as_str()).map(|&p| Some(p)).ok_or_else(|| {
                    KinematicError::UnknownParent {
                        link: spec.name.clone(),
                        parent: parent.clone(),
                    }
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((parents, root))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root_link(&self) -> &LinkModel {
        &self.links[0]
    }

    /// All links, root first, each parent before its children
    pub fn link_models(&self) -> &[LinkModel] {
        &self.links
    }

    /// All joints, in the same order as `link_models`
    pub fn joint_models(&self) -> &[JointModel] {
        &self.joints
    }

    pub fn link_index(&self, name: &str) -> Option<usize> {
        self.link_index.get(name).copied()
    }

    pub fn link_model(&self, name: &str) -> Option<&LinkModel> {
        self.link_index(name).map(|i| &self.links[i])
    }

    pub fn joint_index(&self, name: &str) -> Option<usize> {
        self.joint_index.get(name).copied()
    }

    pub fn joint_model(&self, name: &str) -> Option<&JointModel> {
        self.joint_index(name).map(|i| &self.joints[i])
    }

    /// Joint connecting the given link to its parent
    pub fn parent_joint_model(&self, link: &LinkModel) -> &JointModel {
        &self.joints[link.parent_joint]
    }

    /// Total number of configuration variables
    pub fn variable_count(&self) -> usize {
        self.variable_names.len()
    }

    /// Names of all variables, joints concatenated in tree order
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    pub fn variable_bounds(&self) -> &[VariableBounds] {
        &self.variable_bounds
    }

    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.variable_index.get(name).copied()
    }

    /// Position of the joint's variables in the full configuration vector
    pub fn joint_variable_range(&self, joint: usize) -> Range<usize> {
        self.variable_start[joint]..self.variable_start[joint + 1]
    }

    /// Sum of the joints' maximum extents
    pub fn maximum_extent(&self) -> f64 {
        self.joints.iter().map(|j| j.maximum_extent()).sum()
    }

    pub fn default_values(&self) -> Vec<f64> {
        let mut values = Vec::with_capacity(self.variable_count());
        for joint in &self.joints {
            joint.default_values_with_bounds(joint.variable_bounds(), &mut values);
        }
        values
    }

    /// One configuration for the whole robot, sampled joint by joint in a single pass.
    pub fn random_values<R: UniformSource + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        let mut values = Vec::with_capacity(self.variable_count());
        for joint in &self.joints {
            joint.random_values_with_bounds(rng, joint.variable_bounds(), &mut values);
        }
        values
    }
}
