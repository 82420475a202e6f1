//! Repetition state machine.
//!
//! Converts a sequence of per-frame angle observations into discrete
//! rep-completion events: Up → (angle below descent threshold) → Down →
//! (angle above ascent threshold) → Up, counting one rep on each
//! Down → Up transition.

use serde::{Deserialize, Serialize};

use formtrack_core::{MotionPhase, RepUpdate, Resettable};

use crate::{EngineError, Result};

/// Configuration for [`RepCounter`] behaviour.
///
/// The gap between the two thresholds is deliberate hysteresis: a single
/// noisy frame hovering near one threshold cannot oscillate the phase and
/// double-count a rep. A rep only counts once the limb has returned to
/// near-full extension after being sufficiently flexed; partial reps that
/// never cross the descent threshold can never be counted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepCounterConfig {
    /// Angle below which an Up phase transitions to Down (default: 90.0)
    pub descent_threshold_deg: f64,
    /// Angle above which a Down phase transitions to Up and counts a rep
    /// (default: 160.0)
    pub ascent_threshold_deg: f64,
}

impl Default for RepCounterConfig {
    fn default() -> Self {
        Self {
            descent_threshold_deg: 90.0,
            ascent_threshold_deg: 160.0,
        }
    }
}

impl RepCounterConfig {
    /// Create a new builder.
    #[must_use]
    pub fn builder() -> RepCounterConfigBuilder {
        RepCounterConfigBuilder::new()
    }

    /// Validates the threshold ordering.
    ///
    /// # Errors
    ///
    /// Returns an error if the descent threshold is not strictly below the
    /// ascent threshold, which would destroy the hysteresis gap.
    pub fn validate(&self) -> Result<()> {
        if self.descent_threshold_deg >= self.ascent_threshold_deg {
            return Err(EngineError::InvalidConfig(format!(
                "descent threshold {} must be below ascent threshold {}",
                self.descent_threshold_deg, self.ascent_threshold_deg
            )));
        }
        Ok(())
    }
}

/// Builder for [`RepCounterConfig`].
#[derive(Debug, Default)]
pub struct RepCounterConfigBuilder {
    config: RepCounterConfig,
}

impl RepCounterConfigBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RepCounterConfig::default(),
        }
    }

    /// Set the descent threshold in degrees.
    #[must_use]
    pub fn descent_threshold_deg(mut self, threshold: f64) -> Self {
        self.config.descent_threshold_deg = threshold;
        self
    }

    /// Set the ascent threshold in degrees.
    #[must_use]
    pub fn ascent_threshold_deg(mut self, threshold: f64) -> Self {
        self.config.ascent_threshold_deg = threshold;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> RepCounterConfig {
        self.config
    }
}

/// Per-session repetition counter.
///
/// Holds the current motion phase and a monotonically non-decreasing rep
/// total. The counter only ever changes by +1, exactly on a Down → Up
/// transition.
#[derive(Debug, Clone)]
pub struct RepCounter {
    config: RepCounterConfig,
    phase: MotionPhase,
    total_reps: u32,
}

impl RepCounter {
    /// Create a counter with default thresholds, starting Up with zero reps.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config_unchecked(RepCounterConfig::default())
    }

    /// Create a counter with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn with_config(config: RepCounterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config_unchecked(config))
    }

    /// Create a counter from a configuration already validated by the caller.
    pub(crate) fn with_config_unchecked(config: RepCounterConfig) -> Self {
        Self {
            config,
            phase: MotionPhase::Up,
            total_reps: 0,
        }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &RepCounterConfig {
        &self.config
    }

    /// Current motion phase.
    #[must_use]
    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    /// Total reps completed so far.
    #[must_use]
    pub fn total_reps(&self) -> u32 {
        self.total_reps
    }

    /// Advance the state machine with one angle observation.
    ///
    /// - Up and angle below the descent threshold: transition to Down.
    ///   Going down is the start of a rep, not its completion, so nothing
    ///   is counted on this edge.
    /// - Down and angle above the ascent threshold: transition to Up and
    ///   count one rep.
    /// - Anything else: no transition, no event.
    pub fn observe(&mut self, angle_deg: f64) -> RepUpdate {
        let mut reps_this_frame = 0;

        match self.phase {
            MotionPhase::Up => {
                if angle_deg < self.config.descent_threshold_deg {
                    self.phase = MotionPhase::Down;
                }
            }
            MotionPhase::Down => {
                if angle_deg > self.config.ascent_threshold_deg {
                    self.phase = MotionPhase::Up;
                    self.total_reps += 1;
                    reps_this_frame = 1;
                }
            }
        }

        RepUpdate {
            reps_this_frame,
            total_reps: self.total_reps,
            phase: self.phase,
        }
    }

    /// Register a frame with no valid angle observation.
    ///
    /// The phase and counter persist unchanged across gaps of arbitrary
    /// length, which makes the machine robust to transient detection
    /// dropouts.
    pub fn observe_missing(&mut self) -> RepUpdate {
        RepUpdate {
            reps_this_frame: 0,
            total_reps: self.total_reps,
            phase: self.phase,
        }
    }
}

impl Default for RepCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Resettable for RepCounter {
    fn reset(&mut self) {
        self.phase = MotionPhase::Up;
        self.total_reps = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let counter = RepCounter::new();
        assert_eq!(counter.phase(), MotionPhase::Up);
        assert_eq!(counter.total_reps(), 0);
    }

    #[test]
    fn test_full_cycle_counts_once() {
        let mut counter = RepCounter::new();

        // Still Up: 175 is above ascent but there is nothing to complete.
        let u = counter.observe(175.0);
        assert_eq!(u.total_reps, 0);
        assert_eq!(u.phase, MotionPhase::Up);

        // 95 is above the descent threshold; still Up.
        let u = counter.observe(95.0);
        assert_eq!(u.phase, MotionPhase::Up);
        assert_eq!(u.total_reps, 0);

        // 80 crosses the descent threshold.
        let u = counter.observe(80.0);
        assert_eq!(u.phase, MotionPhase::Down);
        assert_eq!(u.reps_this_frame, 0);
        assert_eq!(u.total_reps, 0);

        // 170 crosses the ascent threshold: exactly one rep, on this frame.
        let u = counter.observe(170.0);
        assert_eq!(u.phase, MotionPhase::Up);
        assert_eq!(u.reps_this_frame, 1);
        assert_eq!(u.total_reps, 1);
    }

    #[test]
    fn test_hysteresis_rejects_oscillation() {
        let mut counter = RepCounter::new();

        // Oscillating across the descent threshold without ever reaching
        // the ascent threshold must never count.
        for _ in 0..50 {
            counter.observe(85.0);
            counter.observe(95.0);
        }
        assert_eq!(counter.total_reps(), 0);
        assert_eq!(counter.phase(), MotionPhase::Down);
    }

    #[test]
    fn test_partial_rep_never_counts() {
        let mut counter = RepCounter::new();

        // Flexion that never crosses the descent threshold stays Up, so
        // the later extension has nothing to complete.
        counter.observe(120.0);
        counter.observe(100.0);
        counter.observe(95.0);
        let u = counter.observe(175.0);
        assert_eq!(u.total_reps, 0);
        assert_eq!(u.phase, MotionPhase::Up);
    }

    #[test]
    fn test_thresholds_are_exclusive_edges() {
        let mut counter = RepCounter::new();

        // Exactly 90 does not trigger the descent (strict less-than).
        counter.observe(90.0);
        assert_eq!(counter.phase(), MotionPhase::Up);
        counter.observe(89.999);
        assert_eq!(counter.phase(), MotionPhase::Down);

        // Exactly 160 does not trigger the ascent (strict greater-than).
        counter.observe(160.0);
        assert_eq!(counter.phase(), MotionPhase::Down);
        let u = counter.observe(160.001);
        assert_eq!(u.total_reps, 1);
    }

    #[test]
    fn test_monotonic_at_most_one_per_frame() {
        let mut counter = RepCounter::new();
        let angles = [175.0, 40.0, 170.0, 30.0, 165.0, 80.0, 85.0, 179.0, 10.0];

        let mut previous_total = 0;
        for angle in angles {
            let u = counter.observe(angle);
            assert!(u.total_reps >= previous_total);
            assert!(u.total_reps - previous_total <= 1);
            assert!(u.reps_this_frame <= 1);
            previous_total = u.total_reps;
        }
        assert_eq!(counter.total_reps(), 3);
    }

    #[test]
    fn test_missing_observations_preserve_state() {
        let mut counter = RepCounter::new();
        counter.observe(80.0);
        assert_eq!(counter.phase(), MotionPhase::Down);

        for _ in 0..100 {
            let u = counter.observe_missing();
            assert_eq!(u.reps_this_frame, 0);
            assert_eq!(u.phase, MotionPhase::Down);
        }

        // The interrupted rep still completes after the gap.
        let u = counter.observe(170.0);
        assert_eq!(u.total_reps, 1);
    }

    #[test]
    fn test_reset() {
        let mut counter = RepCounter::new();
        counter.observe(80.0);
        counter.observe(170.0);
        assert_eq!(counter.total_reps(), 1);

        counter.reset();
        assert_eq!(counter.total_reps(), 0);
        assert_eq!(counter.phase(), MotionPhase::Up);
    }

    #[test]
    fn test_config_builder() {
        let config = RepCounterConfig::builder()
            .descent_threshold_deg(100.0)
            .ascent_threshold_deg(150.0)
            .build();
        assert!((config.descent_threshold_deg - 100.0).abs() < f64::EPSILON);
        assert!((config.ascent_threshold_deg - 150.0).abs() < f64::EPSILON);

        let mut counter = RepCounter::with_config(config).unwrap();
        counter.observe(99.0);
        assert_eq!(counter.phase(), MotionPhase::Down);
        let u = counter.observe(151.0);
        assert_eq!(u.total_reps, 1);
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = RepCounterConfig::builder()
            .descent_threshold_deg(160.0)
            .ascent_threshold_deg(90.0)
            .build();
        assert!(config.validate().is_err());
        assert!(RepCounter::with_config(config).is_err());
    }
}
