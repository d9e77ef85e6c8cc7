//! Error types for the optimizer and its distance sources.
//!
//! Only [`OptimizeError`] ever reaches a caller of the optimizer. Provider
//! failures are absorbed by the fallback source.

use thiserror::Error;

/// Latitude or longitude outside the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error(
    "invalid coordinate ({latitude}, {longitude}): \
     latitude must be in [-90, 90] and longitude in [-180, 180]"
)]
pub struct InvalidCoordinateError {
    pub latitude: f64,
    pub longitude: f64,
}

/// Errors returned to the caller of an optimization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    #[error("no stops to optimize")]
    EmptyInput,
    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinateError),
    #[error("invalid start time {0:?}, expected HH:MM")]
    InvalidStartTime(String),
    #[error("minutes per mile must be a positive finite number, got {0}")]
    InvalidMinutesPerMile(f64),
    #[error("duplicate stop id at position {position}")]
    DuplicateStopId { position: usize },
    #[error("stop at position {position} lasts {minutes} minutes, at most {max} allowed")]
    InvalidServiceDuration {
        position: usize,
        minutes: u32,
        max: u32,
    },
}

impl OptimizeError {
    /// Whether the caller can fix the request and retry.
    ///
    /// Every variant describes bad input, so this maps to a 4xx response.
    pub fn is_user_correctable(&self) -> bool {
        match self {
            Self::EmptyInput
            | Self::InvalidCoordinate(_)
            | Self::InvalidStartTime(_)
            | Self::InvalidMinutesPerMile(_)
            | Self::DuplicateStopId { .. }
            | Self::InvalidServiceDuration { .. } => true,
        }
    }
}

/// Whole-call failure of a precise distance provider.
#[derive(Debug, Error)]
pub enum DistanceProviderError {
    #[error("distance service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("distance service returned {code}: {message}")]
    Service { code: String, message: String },
    #[error(
        "distance service returned a {rows}x{cols} matrix, \
         expected {expected_rows}x{expected_cols}"
    )]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },
    #[error("distance service response is missing {0}")]
    MissingAnnotation(&'static str),
}

/// A single origin/destination pair the provider could not answer.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("no distance from origin {origin} to destination {destination}: {reason}")]
pub struct PartialDistanceError {
    pub origin: usize,
    pub destination: usize,
    pub reason: String,
}

impl PartialDistanceError {
    pub fn new(origin: usize, destination: usize, reason: impl Into<String>) -> Self {
        Self {
            origin,
            destination,
            reason: reason.into(),
        }
    }
}
