//! Error types for the formtrack system.
//!
//! This module provides the error taxonomy for repetition counting using
//! [`thiserror`] for automatic `Display` and `Error` trait implementations.
//!
//! # Error Hierarchy
//!
//! - [`CoreError`]: Top-level error type that encompasses all subsystem errors
//! - [`FrameError`]: Errors raised while processing a single frame
//! - [`PoseError`]: Errors from the external pose provider
//! - [`GeometryError`]: Errors from joint-angle computation
//!
//! Per-frame failures are deliberately distinct, named kinds rather than a
//! single message string: callers and tests can match on a decode failure
//! versus a pose-model failure versus degenerate geometry without parsing
//! free text.
//!
//! # Example
//!
//! ```rust
//! use formtrack_core::error::{CoreError, FrameError};
//!
//! fn process_frame() -> Result<(), CoreError> {
//!     Err(FrameError::decode("empty image payload").into())
//! }
//! ```

use thiserror::Error;

use crate::types::JointName;

/// A specialized `Result` type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Top-level error type for the formtrack system.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CoreError {
    /// Per-frame processing error
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
    },

    /// Validation error for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Description of what validation failed
        message: String,
    },
}

impl CoreError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// Every per-frame error is recoverable: the session state is untouched
    /// and the next frame proceeds normally. Configuration and validation
    /// errors are not; they indicate a caller bug.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Frame(e) => e.is_recoverable(),
            Self::Configuration { .. } | Self::Validation { .. } => false,
        }
    }
}

/// Errors raised while processing a single frame.
///
/// None of these are fatal to the pipeline: each one is converted into a
/// well-formed result record that preserves the session's rep count.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FrameError {
    /// The frame payload could not be decoded into an image
    #[error("Frame decode failed: {reason}")]
    Decode {
        /// Reason the payload was rejected
        reason: String,
    },

    /// The external pose provider failed
    #[error("Pose provider error: {0}")]
    Pose(#[from] PoseError),

    /// Joint-angle computation was impossible for this frame
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Landmarks required for the tracked joint triple were absent
    #[error("Missing landmarks: {joints:?}")]
    MissingLandmarks {
        /// The joints that were not detected this frame
        joints: Vec<JointName>,
    },

    /// Landmarks were present but below the confidence threshold
    #[error("Low-confidence landmarks: {joints:?} below {threshold}")]
    LowConfidenceLandmarks {
        /// The joints whose detections were rejected
        joints: Vec<JointName>,
        /// The confidence threshold that was not met
        threshold: f32,
    },
}

impl FrameError {
    /// Creates a new decode error.
    #[must_use]
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    /// Returns `true` if this error is recoverable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Decode { .. }
            | Self::Pose(_)
            | Self::Geometry(_)
            | Self::MissingLandmarks { .. }
            | Self::LowConfidenceLandmarks { .. } => true,
        }
    }
}

/// Errors from the external pose provider.
///
/// The provider is a black box; these variants cover the two ways it can
/// fail without the caller caring about the model internals.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PoseError {
    /// Inference ran but failed
    #[error("Pose inference failed: {reason}")]
    Inference {
        /// Description of the inference failure
        reason: String,
    },

    /// The provider is not in a state where it can run
    #[error("Pose provider unavailable: {reason}")]
    Unavailable {
        /// Description of why the provider cannot run
        reason: String,
    },
}

impl PoseError {
    /// Creates a new inference error.
    #[must_use]
    pub fn inference(reason: impl Into<String>) -> Self {
        Self::Inference {
            reason: reason.into(),
        }
    }

    /// Creates a new unavailable error.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Errors from joint-angle computation.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GeometryError {
    /// An endpoint of the joint triple coincides with the vertex, so the
    /// angle between the two limb rays is undefined
    #[error("Degenerate joint triple: {endpoint} endpoint coincides with the vertex")]
    DegenerateTriple {
        /// Which endpoint collapsed onto the vertex ("first" or "second")
        endpoint: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_display() {
        let err = CoreError::configuration("descent threshold above ascent threshold");
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("descent threshold"));
    }

    #[test]
    fn test_frame_errors_recoverable() {
        assert!(FrameError::decode("truncated payload").is_recoverable());
        assert!(FrameError::from(PoseError::inference("backend crashed")).is_recoverable());
        assert!(FrameError::MissingLandmarks {
            joints: vec![JointName::RightElbow],
        }
        .is_recoverable());
    }

    #[test]
    fn test_configuration_not_recoverable() {
        let err = CoreError::configuration("bad thresholds");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_error_conversion() {
        let pose_err = PoseError::unavailable("model not loaded");
        let frame_err: FrameError = pose_err.into();
        let core_err: CoreError = frame_err.into();
        assert!(matches!(core_err, CoreError::Frame(FrameError::Pose(_))));
    }

    #[test]
    fn test_degenerate_triple_display() {
        let err = GeometryError::DegenerateTriple { endpoint: "first" };
        assert!(err.to_string().contains("first endpoint"));
    }
}
