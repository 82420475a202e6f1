//! Formtrack Repetition Engine
//!
//! This crate turns noisy, frame-by-frame joint coordinates into discrete,
//! monotonic rep counts and per-frame form feedback, tolerating detection
//! gaps and partial or ambiguous motion.
//!
//! # Components
//!
//! - **Geometry**: interior joint angle from three 2D landmarks
//! - **Form Scoring**: banded 0-100 quality score from the instantaneous angle
//! - **Rep Counting**: a two-phase hysteresis state machine per session
//! - **Session Management**: isolated, lazily created per-session state
//! - **Frame Pipeline**: orchestration over an external pose provider
//! - **Progress**: per-session totals with least-squares trend statistics
//!
//! # Example
//!
//! ```rust
//! use formtrack_engine::{RepCounter, assess_angle};
//!
//! let mut counter = RepCounter::new();
//! counter.observe(80.0);               // flexed: phase goes Down
//! let update = counter.observe(170.0); // extended: rep completes
//! assert_eq!(update.total_reps, 1);
//!
//! let form = assess_angle(92.0);
//! assert_eq!(form.score, 95);
//! ```

pub mod counter;
pub mod form;
pub mod geometry;
pub mod pipeline;
pub mod progress;
pub mod session;

// Re-export main types for convenience
pub use counter::{RepCounter, RepCounterConfig, RepCounterConfigBuilder};
pub use form::{assess_angle, FormAssessment, FormTier};
pub use geometry::{joint_angle, try_joint_angle, JointTriple};
pub use pipeline::{FramePipeline, PipelineConfig, PipelineConfigBuilder, SidePolicy};
pub use progress::{ProgressLog, ProgressStats, SessionRecord};
pub use session::SessionRegistry;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Unified error type for engine operations
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Core-level error
    #[error(transparent)]
    Core(#[from] formtrack_core::CoreError),
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::counter::{RepCounter, RepCounterConfig};
    pub use crate::form::{assess_angle, FormAssessment, FormTier};
    pub use crate::geometry::{joint_angle, try_joint_angle, JointTriple};
    pub use crate::pipeline::{FramePipeline, PipelineConfig, SidePolicy};
    pub use crate::progress::{ProgressLog, ProgressStats, SessionRecord};
    pub use crate::session::SessionRegistry;
    pub use crate::{EngineError, Result};
    pub use formtrack_core::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
