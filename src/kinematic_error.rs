//! Errors reported by model construction, state lookups and constraint sampling.
//! Contract violations (wrong vector lengths and the like) are not errors but panics.

/// Unified error for the recoverable failures of this crate.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicError {
    DuplicateLink(String),
    DuplicateJoint(String),
    UnknownParent { link: String, parent: String },
    NoRootLink,
    MultipleRootLinks(Vec<String>),
    UnreachableLink(String),
    UnknownLink(String),
    UnknownJoint(String),
    UnknownVariable(String),
    InvalidLength { expected: usize, found: usize },
    InvalidBounds { variable: String, lower: f64, upper: f64 },
    DuplicateAttachedBody { link: String, id: String },
    NoValidConstraints,
    EmptyConstraintRange { variable: String, lower: f64, upper: f64 },
}

impl std::fmt::Display for KinematicError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            KinematicError::DuplicateLink(ref name) =>
                write!(f, "Duplicate link: {}", name),
            KinematicError::DuplicateJoint(ref name) =>
                write!(f, "Duplicate joint: {}", name),
            KinematicError::UnknownParent { ref link, ref parent } =>
                write!(f, "Link {} refers to unknown parent link {}", link, parent),
            KinematicError::NoRootLink =>
                write!(f, "No root link: every link has a parent"),
            KinematicError::MultipleRootLinks(ref roots) =>
                write!(f, "Multiple root links: {}", roots.join(", ")),
            KinematicError::UnreachableLink(ref name) =>
                write!(f, "Link {} is not reachable from the root", name),
            KinematicError::UnknownLink(ref name) =>
                write!(f, "Unknown link: {}", name),
            KinematicError::UnknownJoint(ref name) =>
                write!(f, "Unknown joint: {}", name),
            KinematicError::UnknownVariable(ref name) =>
                write!(f, "Unknown variable: {}", name),
            KinematicError::InvalidLength { expected, found } =>
                write!(f, "Invalid Length: expected {}, found {}", expected, found),
            KinematicError::InvalidBounds { ref variable, lower, upper } =>
                write!(f, "Invalid bounds for {}: lower {} exceeds upper {}", variable, lower, upper),
            KinematicError::DuplicateAttachedBody { ref link, ref id } =>
                write!(f, "Body {} is already attached to link {}", id, link),
            KinematicError::NoValidConstraints =>
                write!(f, "No valid joint constraints"),
            KinematicError::EmptyConstraintRange { ref variable, lower, upper } =>
                write!(f, "Constraints leave no possible values for {}: min {}, max {}",
                       variable, lower, upper),
        }
    }
}

impl std::error::Error for KinematicError {}
