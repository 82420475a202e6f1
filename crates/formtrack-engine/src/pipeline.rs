//! Frame processing pipeline.
//!
//! Per invocation: obtain landmarks from the external pose provider,
//! extract the tracked joint triple, compute the angle, and drive the form
//! scorer and rep state machine, composing the per-frame result record.
//!
//! No failure in here is fatal: every error kind is converted into a
//! well-formed [`FrameResult`] that preserves the session's rep total, so a
//! single bad frame never resets visible progress.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use formtrack_core::{
    FrameDisposition, FrameError, FrameFailureKind, FrameInput, FrameResult, LandmarkFrame,
    LandmarkPoint, NoAngleReason, PoseProvider, ResetConfirmation, SessionId,
    DEFAULT_CONFIDENCE_THRESHOLD,
};

use crate::counter::RepCounterConfig;
use crate::form::assess_angle;
use crate::geometry::{try_joint_angle, JointTriple};
use crate::session::SessionRegistry;
use crate::Result;

/// Which limb's joint triple drives the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SidePolicy {
    /// Track the right arm
    #[default]
    Right,
    /// Track the left arm
    Left,
    /// Track whichever side is more confidently detected, per frame
    MostConfident,
}

/// Configuration for the frame pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Joint-selection policy for the tracked limb
    pub side_policy: SidePolicy,
    /// Minimum pose confidence for a detection to count as a pose at all
    pub min_pose_confidence: f32,
    /// Minimum per-landmark confidence for a joint to be usable
    pub min_landmark_confidence: f32,
    /// Confidence reported on frames with no detected pose
    pub no_pose_confidence: f32,
    /// Rep counter thresholds applied to every session
    pub counter: RepCounterConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            side_policy: SidePolicy::default(),
            min_pose_confidence: DEFAULT_CONFIDENCE_THRESHOLD,
            min_landmark_confidence: DEFAULT_CONFIDENCE_THRESHOLD,
            no_pose_confidence: 0.1,
            counter: RepCounterConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Create a new builder.
    #[must_use]
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// Validates thresholds.
    ///
    /// # Errors
    ///
    /// Returns an error if a confidence threshold leaves [0, 1] or the
    /// counter thresholds are mis-ordered.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("min_pose_confidence", self.min_pose_confidence),
            ("min_landmark_confidence", self.min_landmark_confidence),
            ("no_pose_confidence", self.no_pose_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(crate::EngineError::InvalidConfig(format!(
                    "{name} must be in [0.0, 1.0], got {value}"
                )));
            }
        }
        self.counter.validate()
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Set the joint-selection policy.
    #[must_use]
    pub fn side_policy(mut self, policy: SidePolicy) -> Self {
        self.config.side_policy = policy;
        self
    }

    /// Set the minimum pose confidence.
    #[must_use]
    pub fn min_pose_confidence(mut self, threshold: f32) -> Self {
        self.config.min_pose_confidence = threshold;
        self
    }

    /// Set the minimum per-landmark confidence.
    #[must_use]
    pub fn min_landmark_confidence(mut self, threshold: f32) -> Self {
        self.config.min_landmark_confidence = threshold;
        self
    }

    /// Set the confidence reported on no-pose frames.
    #[must_use]
    pub fn no_pose_confidence(mut self, confidence: f32) -> Self {
        self.config.no_pose_confidence = confidence;
        self
    }

    /// Set the counter thresholds.
    #[must_use]
    pub fn counter(mut self, counter: RepCounterConfig) -> Self {
        self.config.counter = counter;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

/// Frame pipeline over an external pose provider.
///
/// Owns the session registry; frames for distinct sessions proceed
/// independently, frames for the same session are serialized.
pub struct FramePipeline<P> {
    provider: P,
    config: PipelineConfig,
    sessions: SessionRegistry,
}

impl<P: PoseProvider> FramePipeline<P> {
    /// Create a pipeline with default configuration.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: PipelineConfig::default(),
            sessions: SessionRegistry::new(),
        }
    }

    /// Create a pipeline with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn with_config(provider: P, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let sessions = SessionRegistry::with_config(config.counter)?;
        Ok(Self {
            provider,
            config,
            sessions,
        })
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Access the session registry.
    #[must_use]
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Process one frame for a session.
    ///
    /// Always returns a well-formed result: no-pose frames take the
    /// low-confidence path, and frame-level failures are converted into a
    /// failure record that preserves the session's rep total.
    pub fn process_frame(&self, session: &SessionId, input: FrameInput) -> FrameResult {
        match self.track_frame(session, input) {
            Ok(result) => result,
            Err(err) => self.failure_result(session, &err),
        }
    }

    /// Reset a session's counter back to zero.
    ///
    /// Unknown ids are not an error; other sessions are unaffected.
    pub fn reset_session(&self, session: &SessionId) -> ResetConfirmation {
        self.sessions.reset(session);
        ResetConfirmation {
            session: session.clone(),
            total_reps: 0,
            timestamp: Utc::now(),
        }
    }

    fn track_frame(
        &self,
        session: &SessionId,
        input: FrameInput,
    ) -> std::result::Result<FrameResult, FrameError> {
        let landmarks = match input {
            FrameInput::Image(image) => {
                if image.is_empty() {
                    return Err(FrameError::decode("empty image payload"));
                }
                self.provider.detect(&image)?
            }
            FrameInput::Landmarks(frame) => Some(frame),
        };

        let frame = match landmarks {
            Some(frame) if frame.confidence.exceeds(self.config.min_pose_confidence) => frame,
            _ => return Ok(self.no_pose_result(session)),
        };

        match self.measure_angle(&frame) {
            Ok(angle) => Ok(self.tracked_result(session, &frame, angle)),
            Err(err) => match no_angle_reason(&err) {
                Some(reason) => Ok(self.no_angle_result(session, &frame, reason)),
                None => Err(err),
            },
        }
    }

    /// Selects the tracked joint triple and computes its angle.
    fn measure_angle(&self, frame: &LandmarkFrame) -> std::result::Result<f64, FrameError> {
        let triple = self.select_triple(frame)?;
        let (a, b, c) = self.triple_points(frame, triple)?;
        Ok(try_joint_angle(a, b, c)?)
    }

    fn select_triple(&self, frame: &LandmarkFrame) -> std::result::Result<JointTriple, FrameError> {
        match self.config.side_policy {
            SidePolicy::Right => Ok(JointTriple::RIGHT_ELBOW),
            SidePolicy::Left => Ok(JointTriple::LEFT_ELBOW),
            SidePolicy::MostConfident => {
                let right = triple_min_confidence(frame, JointTriple::RIGHT_ELBOW);
                let left = triple_min_confidence(frame, JointTriple::LEFT_ELBOW);
                match (right, left) {
                    (Some(r), Some(l)) if l > r => Ok(JointTriple::LEFT_ELBOW),
                    (Some(_), _) => Ok(JointTriple::RIGHT_ELBOW),
                    (None, Some(_)) => Ok(JointTriple::LEFT_ELBOW),
                    (None, None) => {
                        let joints = JointTriple::RIGHT_ELBOW
                            .joints()
                            .into_iter()
                            .chain(JointTriple::LEFT_ELBOW.joints())
                            .filter(|j| frame.get(*j).is_none())
                            .collect();
                        Err(FrameError::MissingLandmarks { joints })
                    }
                }
            }
        }
    }

    fn triple_points(
        &self,
        frame: &LandmarkFrame,
        triple: JointTriple,
    ) -> std::result::Result<(LandmarkPoint, LandmarkPoint, LandmarkPoint), FrameError> {
        let mut missing = Vec::new();
        let mut low = Vec::new();
        let mut points = [LandmarkPoint::new(0.0, 0.0); 3];

        for (slot, joint) in points.iter_mut().zip(triple.joints()) {
            match frame.get(joint) {
                None => missing.push(joint),
                Some(landmark) => {
                    if landmark
                        .confidence
                        .exceeds(self.config.min_landmark_confidence)
                    {
                        *slot = landmark.point;
                    } else {
                        low.push(joint);
                    }
                }
            }
        }

        if !missing.is_empty() {
            return Err(FrameError::MissingLandmarks { joints: missing });
        }
        if !low.is_empty() {
            return Err(FrameError::LowConfidenceLandmarks {
                joints: low,
                threshold: self.config.min_landmark_confidence,
            });
        }
        Ok((points[0], points[1], points[2]))
    }

    fn tracked_result(&self, session: &SessionId, frame: &LandmarkFrame, angle: f64) -> FrameResult {
        let update = self.sessions.observe(session, Some(angle));
        let assessment = assess_angle(angle);

        let feedback = if update.rep_completed() {
            debug!(session = %session, total = update.total_reps, "rep completed");
            format!("Great! Rep #{} completed!", update.total_reps)
        } else {
            assessment.feedback.to_string()
        };

        FrameResult {
            reps_this_frame: update.reps_this_frame,
            form_score: assessment.score,
            feedback,
            confidence: frame.confidence.value(),
            total_reps: update.total_reps,
            current_angle: angle,
            timestamp: Utc::now(),
            disposition: FrameDisposition::Tracked,
        }
    }

    fn no_pose_result(&self, session: &SessionId) -> FrameResult {
        let update = self.sessions.observe(session, None);
        FrameResult {
            reps_this_frame: 0,
            form_score: 0,
            feedback: "Please position yourself in the camera view".to_string(),
            confidence: self.config.no_pose_confidence,
            total_reps: update.total_reps,
            current_angle: 0.0,
            timestamp: Utc::now(),
            disposition: FrameDisposition::NoPose,
        }
    }

    fn no_angle_result(
        &self,
        session: &SessionId,
        frame: &LandmarkFrame,
        reason: NoAngleReason,
    ) -> FrameResult {
        let update = self.sessions.observe(session, None);
        let feedback = match reason {
            NoAngleReason::MissingLandmarks | NoAngleReason::LowConfidence => {
                "Keep the tracked arm fully in view"
            }
            NoAngleReason::DegenerateGeometry => "Hold your arm steady and try again",
        };
        FrameResult {
            reps_this_frame: 0,
            form_score: 0,
            feedback: feedback.to_string(),
            confidence: frame.confidence.value(),
            total_reps: update.total_reps,
            current_angle: 0.0,
            timestamp: Utc::now(),
            disposition: FrameDisposition::NoAngle(reason),
        }
    }

    fn failure_result(&self, session: &SessionId, err: &FrameError) -> FrameResult {
        warn!(session = %session, error = %err, "frame processing failed");
        let kind = match err {
            FrameError::Decode { .. } => FrameFailureKind::Decode,
            _ => FrameFailureKind::PoseModel,
        };
        FrameResult {
            reps_this_frame: 0,
            form_score: 0,
            feedback: format!("Detection error: {err}"),
            confidence: 0.0,
            // Preserve the last known total; a bad frame never resets
            // visible progress.
            total_reps: self.sessions.total_reps(session),
            current_angle: 0.0,
            timestamp: Utc::now(),
            disposition: FrameDisposition::Failed(kind),
        }
    }
}

fn no_angle_reason(err: &FrameError) -> Option<NoAngleReason> {
    match err {
        FrameError::MissingLandmarks { .. } => Some(NoAngleReason::MissingLandmarks),
        FrameError::LowConfidenceLandmarks { .. } => Some(NoAngleReason::LowConfidence),
        FrameError::Geometry(_) => Some(NoAngleReason::DegenerateGeometry),
        FrameError::Decode { .. } | FrameError::Pose(_) => None,
        // `FrameError` is `#[non_exhaustive]`; future variants carry no angle.
        _ => None,
    }
}

/// Minimum landmark confidence across a triple, or `None` if any joint is
/// missing from the frame.
fn triple_min_confidence(frame: &LandmarkFrame, triple: JointTriple) -> Option<f32> {
    triple
        .joints()
        .into_iter()
        .map(|joint| frame.get(joint).map(|l| l.confidence.value()))
        .try_fold(f32::INFINITY, |acc, c| c.map(|c| acc.min(c)))
}
