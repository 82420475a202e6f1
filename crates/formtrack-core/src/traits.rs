//! Core trait definitions for the formtrack system.
//!
//! # Traits
//!
//! - [`PoseProvider`]: The external pose-estimation model, behind a contract
//! - [`Resettable`]: Components that can be returned to their initial state
//!
//! The pose model is an opaque, synchronous collaborator: the core depends
//! only on the `detect` contract, never on a specific model or runtime.

use crate::error::PoseError;
use crate::types::{EncodedImage, LandmarkFrame};

/// External pose-estimation provider.
///
/// Implementations decode the image and run whatever model they wrap.
/// Returning `Ok(None)` means "no pose in this frame" and is a normal
/// outcome, not an error; the counting session's state persists unchanged
/// across such frames.
///
/// # Example
///
/// ```ignore
/// use formtrack_core::{PoseProvider, EncodedImage};
///
/// fn frame_has_pose(provider: &impl PoseProvider, image: &EncodedImage) -> bool {
///     matches!(provider.detect(image), Ok(Some(_)))
/// }
/// ```
pub trait PoseProvider: Send + Sync {
    /// Runs pose detection on an encoded frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider itself fails; absence of a pose is
    /// `Ok(None)`.
    fn detect(&self, image: &EncodedImage) -> Result<Option<LandmarkFrame>, PoseError>;
}

/// Trait for types that can be reset to a default state.
pub trait Resettable {
    /// Resets the instance to its initial state.
    fn reset(&mut self);
}
