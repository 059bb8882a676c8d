//! Identifiers for tracked bodies and their visual targets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a tracked rigid body, such as an IMU-bearing HMD.
///
/// Stable for the lifetime of the body in the tracking system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(pub u32);

/// Identifier of a visually trackable target pattern on a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub u32);

/// A specific target on a specific body: the identity of a video sample source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyTargetId {
    pub body: BodyId,
    pub target: TargetId,
}

impl BodyTargetId {
    pub fn new(body: BodyId, target: TargetId) -> Self {
        Self { body, target }
    }
}

impl From<(BodyId, TargetId)> for BodyTargetId {
    fn from((body, target): (BodyId, TargetId)) -> Self {
        Self { body, target }
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body {}", self.0)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target {}", self.0)
    }
}

impl fmt::Display for BodyTargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.body, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_requires_both_components() {
        let a = BodyTargetId::new(BodyId(1), TargetId(0));
        assert_eq!(a, BodyTargetId::from((BodyId(1), TargetId(0))));
        assert_ne!(a, BodyTargetId::new(BodyId(1), TargetId(1)));
        assert_ne!(a, BodyTargetId::new(BodyId(2), TargetId(0)));
    }

    #[test]
    fn display_names_body_and_target() {
        let id = BodyTargetId::new(BodyId(3), TargetId(7));
        assert_eq!(id.to_string(), "body 3/target 7");
    }

    #[test]
    fn json_ids_are_transparent() {
        let id = BodyTargetId::new(BodyId(2), TargetId(5));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#"{"body":2,"target":5}"#);
        let restored: BodyTargetId = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, id);
    }
}
