//! Selection state for the sub-objects of a loaded model
//!
//! Each wrapper remembers only the identity of its selection. Queries take the
//! model to read from, and mutations take the editor to forward edits to.

mod joint;
mod light;
mod link;
mod mat_param;
mod shape;

pub use joint::SelectedJoint;
pub use light::SelectedLight;
pub use link::SelectedLink;
pub use mat_param::{MatParamRef, SelectedMatParam};
pub use shape::{SelectedShape, ShapeParameter};

use crate::editable::EditError;

/// Errors from selection operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum SelectionError {
    #[error("No {kind} named {id}")]
    InvalidSelection { kind: &'static str, id: String },
    #[error("No {0} is selected")]
    NotSelected(&'static str),
    #[error("Cannot {operation} the selected {kind}")]
    Unsupported {
        kind: &'static str,
        operation: &'static str,
    },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Edit failed: {0}")]
    Edit(#[from] EditError),
}

/// Every selection made in one model
#[derive(Debug, Clone, Default)]
pub struct Selections {
    pub mat_param: SelectedMatParam,
    pub shape: SelectedShape,
    pub joint: SelectedJoint,
    pub link: SelectedLink,
    pub light: SelectedLight,
}

impl Selections {
    /// Deselect everything. Called whenever the model is replaced wholesale.
    pub fn clear(&mut self) {
        self.mat_param.deselect();
        self.shape.select_none();
        self.joint.select_none();
        self.link.select_none();
        self.light.post_load();
    }
}
