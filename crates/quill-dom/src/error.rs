use thiserror::Error;

use crate::document::ElementId;

/// Errors raised by the element arena and the markup writer.
#[derive(Error, Debug)]
pub enum DomError {
    #[error("element {0:?} does not exist or was removed")]
    StaleElement(ElementId),

    #[error("element {0:?} is a content run and cannot have children")]
    NotABranch(ElementId),

    #[error("failed to write markup: {0}")]
    Write(#[from] std::fmt::Error),
}
