//! Ragdoll: a tree of physics links driven by a skeleton

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{ATTACHMENT_LINK_PREFIX, BONE_LINK_PREFIX, TORSO_LINK_NAME};

use super::{BodyId, JointId};

/// What a link is attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkKind {
    Torso,
    /// Linked bone
    Bone(String),
    /// Model attached to a bone
    Attachment(String),
}

impl LinkKind {
    /// Link name: "Torso:", "Bone:<bone>" or "Attachment:<bone>"
    pub fn link_name(&self) -> String {
        match self {
            LinkKind::Torso => TORSO_LINK_NAME.to_string(),
            LinkKind::Bone(bone) => format!("{BONE_LINK_PREFIX}{bone}"),
            LinkKind::Attachment(bone) => format!("{ATTACHMENT_LINK_PREFIX}{bone}"),
        }
    }

    /// Parse a link name back into a kind
    pub fn from_link_name(name: &str) -> Option<Self> {
        if name == TORSO_LINK_NAME {
            Some(LinkKind::Torso)
        } else if let Some(bone) = name.strip_prefix(BONE_LINK_PREFIX) {
            Some(LinkKind::Bone(bone.to_string()))
        } else {
            name.strip_prefix(ATTACHMENT_LINK_PREFIX)
                .map(|bone| LinkKind::Attachment(bone.to_string()))
        }
    }

    /// Bone the link is associated with (None for the torso)
    pub fn bone_name(&self) -> Option<&str> {
        match self {
            LinkKind::Torso => None,
            LinkKind::Bone(bone) | LinkKind::Attachment(bone) => Some(bone),
        }
    }
}

/// Joint limits of a bone link, in radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeOfMotion {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Default for RangeOfMotion {
    fn default() -> Self {
        Self {
            min: [-1.0; 3],
            max: [1.0; 3],
        }
    }
}

/// One link of a ragdoll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsLink {
    pub kind: LinkKind,
    pub body: BodyId,
    /// Joint to the parent link (None for the torso)
    pub joint: Option<JointId>,
    /// Name of the parent link (None for the torso)
    pub parent: Option<String>,
    /// Limits (bone links only)
    pub range_of_motion: Option<RangeOfMotion>,
}

impl PhysicsLink {
    pub fn name(&self) -> String {
        self.kind.link_name()
    }

    pub fn is_bone_link(&self) -> bool {
        matches!(self.kind, LinkKind::Bone(_))
    }
}

/// Tree of links, keyed by link name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ragdoll {
    links: BTreeMap<String, PhysicsLink>,
}

impl Ragdoll {
    /// Create a ragdoll whose torso uses the given body
    pub fn new(torso_body: BodyId) -> Self {
        let torso = PhysicsLink {
            kind: LinkKind::Torso,
            body: torso_body,
            joint: None,
            parent: None,
            range_of_motion: None,
        };
        let mut links = BTreeMap::new();
        links.insert(torso.name(), torso);
        Self { links }
    }

    pub fn torso(&self) -> Option<&PhysicsLink> {
        self.links.get(TORSO_LINK_NAME)
    }

    pub fn link(&self, name: &str) -> Option<&PhysicsLink> {
        self.links.get(name)
    }

    pub fn find_bone_link(&self, bone: &str) -> Option<&PhysicsLink> {
        self.links.get(&LinkKind::Bone(bone.to_string()).link_name())
    }

    pub fn find_attachment_link(&self, bone: &str) -> Option<&PhysicsLink> {
        self.links
            .get(&LinkKind::Attachment(bone.to_string()).link_name())
    }

    /// All link names, sorted
    pub fn links_sorted(&self) -> Vec<String> {
        self.links.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Names of the direct children of a link, sorted
    pub fn children(&self, name: &str) -> Vec<String> {
        self.links
            .values()
            .filter(|l| l.parent.as_deref() == Some(name))
            .map(|l| l.name())
            .collect()
    }

    /// Insert a link, replacing any link of the same name
    pub fn insert_link(&mut self, link: PhysicsLink) {
        self.links.insert(link.name(), link);
    }

    /// Remove a link by name
    pub fn remove_link(&mut self, name: &str) -> Option<PhysicsLink> {
        self.links.remove(name)
    }
}
