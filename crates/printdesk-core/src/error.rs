//! Error taxonomy for page editing operations.
//!
//! Every error is recoverable at the operation level: a failed call leaves
//! the page in its last valid state.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::external::ExternalError;
use crate::page::ObjectId;
use crate::render::RenderError;
use crate::transform::{CropError, InvalidCropRegion};

/// Errors returned by page, crop and session operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The image bytes could not be decoded; nothing was placed or replaced.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Page dimensions or export scale are not positive finite numbers.
    #[error("Invalid page: {width}x{height} at export scale {export_scale}")]
    InvalidPage {
        width: f64,
        height: f64,
        export_scale: f64,
    },

    /// The crop rectangle is degenerate or outside the crop source.
    #[error(transparent)]
    InvalidCropRegion(#[from] InvalidCropRegion),

    /// The operation needs a state the editor is not in (no selection,
    /// crop already pending, no crop pending).
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    /// The target object no longer exists on the page.
    #[error("Object {0} not found on page")]
    ObjectNotFound(ObjectId),

    /// The editor session was closed; the page may not be mutated.
    #[error("Editor session is closed")]
    SessionClosed,

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// Export, print or file-system failure from an external collaborator.
    #[error(transparent)]
    Io(#[from] ExternalError),
}

impl From<CropError> for EditorError {
    fn from(err: CropError) -> Self {
        match err {
            CropError::Region(region) => EditorError::InvalidCropRegion(region),
            CropError::Source(decode) => EditorError::Decode(decode),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = EditorError> = std::result::Result<T, E>;
