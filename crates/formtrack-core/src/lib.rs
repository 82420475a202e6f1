//! # Formtrack Core
//!
//! Core types, errors, and traits for the formtrack repetition-counting
//! system.
//!
//! This crate provides the foundational building blocks used throughout the
//! formtrack ecosystem, including:
//!
//! - **Core Data Types**: [`LandmarkFrame`], [`Landmark`], [`JointName`],
//!   [`FrameResult`], and [`MotionPhase`] for representing pose landmarks
//!   and per-frame counting results.
//!
//! - **Error Types**: The per-frame error taxonomy via the [`error`] module,
//!   with distinct, named kinds for decode failures, pose-model failures,
//!   and degenerate geometry.
//!
//! - **Traits**: The [`PoseProvider`] contract that keeps the external
//!   pose-estimation model an opaque collaborator.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization via serde
//!
//! ## Example
//!
//! ```rust
//! use formtrack_core::{Confidence, JointName, Landmark, LandmarkFrame, LandmarkPoint};
//!
//! let frame = LandmarkFrame::new(Confidence::clamped(0.9)).with(Landmark::new(
//!     JointName::RightElbow,
//!     LandmarkPoint::new(0.45, 0.5),
//!     Confidence::clamped(0.95),
//! ));
//!
//! assert_eq!(frame.detected_count(), 1);
//! ```

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types at the crate root
pub use error::{CoreError, CoreResult, FrameError, GeometryError, PoseError};
pub use traits::{PoseProvider, Resettable};
pub use types::{
    // Common types
    Confidence, FrameId, SessionId,
    // Input types
    EncodedImage, FrameInput,
    // Landmark types
    JointName, Landmark, LandmarkFrame, LandmarkPoint,
    // Counting types
    FrameDisposition, FrameFailureKind, FrameResult, MotionPhase, NoAngleReason, RepUpdate,
    ResetConfirmation,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of named joints per pose (COCO format)
pub const MAX_JOINTS: usize = 17;

/// Default confidence threshold for treating a landmark as usable
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Prelude module for convenient imports.
///
/// ```rust
/// use formtrack_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult, FrameError, GeometryError, PoseError};
    pub use crate::traits::{PoseProvider, Resettable};
    pub use crate::types::{
        Confidence, EncodedImage, FrameDisposition, FrameId, FrameInput, FrameResult, JointName,
        Landmark, LandmarkFrame, LandmarkPoint, MotionPhase, RepUpdate, ResetConfirmation,
        SessionId,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_valid() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_constants() {
        assert_eq!(MAX_JOINTS, 17);
        assert!(DEFAULT_CONFIDENCE_THRESHOLD > 0.0);
        assert!(DEFAULT_CONFIDENCE_THRESHOLD < 1.0);
    }
}
