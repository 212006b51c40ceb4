//! CGM Editor Model
//!
//! Editor-side state over a loaded model:
//! - Selections of material parameters, collision shapes, joints, ragdoll
//!   links and lights
//! - EditableCgm: edits with snapshot undo/redo
//! - StaffTrack: normalized sparkline data for the track being scored
//! - EditorConfig: RON-backed settings

pub mod cgm;
pub mod config;
pub mod constants;
pub mod cycle;
pub mod editable;
pub mod history;
pub mod select;
pub mod staff;

pub use cgm::{Cgm, LoadedCgm};
pub use config::{ConfigError, EditorConfig, HistoryConfig, ScoreConfig};
pub use constants::*;
pub use editable::{CgmEditor, EditError, EditableCgm};
pub use history::{Checkpoint, History};
pub use select::{
    MatParamRef, SelectedJoint, SelectedLight, SelectedLink, SelectedMatParam, SelectedShape,
    SelectionError, Selections, ShapeParameter,
};
pub use staff::{Channel, Plot, ScoreView, StaffError, StaffTrack};
