//! Global constants for cgm-core

/// Collision margin given to newly created shapes
pub const DEFAULT_MARGIN: f32 = 0.04;

/// First id handed out by a fresh physics space
pub const FIRST_OBJECT_ID: u64 = 0x1000;

/// Default light color (white, RGBA)
pub const DEFAULT_LIGHT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Link name prefix for bone links
pub const BONE_LINK_PREFIX: &str = "Bone:";

/// Link name prefix for attachment links
pub const ATTACHMENT_LINK_PREFIX: &str = "Attachment:";

/// Name of the torso link
pub const TORSO_LINK_NAME: &str = "Torso:";
