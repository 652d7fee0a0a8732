use quill_dom::DomError;
use thiserror::Error;

use crate::tree::ViewId;

/// Errors raised by the view tree.
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("invalid axis: {0}")]
    InvalidAxis(i32),

    #[error("invalid side: {0}")]
    InvalidSide(i32),

    #[error("view {0:?} is no longer part of the tree")]
    StaleView(ViewId),

    #[error(transparent)]
    Dom(#[from] DomError),
}
