//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error, PartialEq)]
pub enum MapcamTypesError {
    /// Zoom scale for a world projection must be a finite positive number.
    #[error("invalid zoom scale: {0}")]
    InvalidZoomScale(f64),
}
