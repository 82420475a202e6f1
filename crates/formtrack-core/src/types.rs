//! Core data types for the formtrack system.
//!
//! This module defines the data structures shared across the formtrack
//! ecosystem for representing pose landmarks, per-frame counting results,
//! and session identity.
//!
//! # Type Categories
//!
//! - **Landmark Types**: [`LandmarkPoint`], [`Landmark`], [`LandmarkFrame`], [`JointName`]
//! - **Counting Types**: [`MotionPhase`], [`RepUpdate`], [`FrameResult`], [`FrameDisposition`]
//! - **Input Types**: [`FrameInput`], [`EncodedImage`]
//! - **Common Types**: [`Confidence`], [`FrameId`], [`SessionId`]

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::MAX_JOINTS;

// =============================================================================
// Common Types
// =============================================================================

/// Unique identifier for a processed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameId(Uuid);

impl FrameId {
    /// Creates a new unique frame ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a frame ID from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for FrameId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FrameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier for one client-visible counting session.
///
/// Each session owns exactly one rep counter; state is created lazily on
/// first use and never shared between ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionId(String);

impl SessionId {
    /// Creates a new session ID from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the session ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Confidence score in the range [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Confidence(f32);

impl Confidence {
    /// Creates a new confidence value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range [0.0, 1.0].
    pub fn new(value: f32) -> CoreResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(CoreError::validation(format!(
                "Confidence must be in [0.0, 1.0], got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Creates a confidence value, clamping into [0.0, 1.0].
    #[must_use]
    pub fn clamped(value: f32) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Returns the raw confidence value.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.0
    }

    /// Returns `true` if the confidence meets the given threshold.
    #[must_use]
    pub fn exceeds(&self, threshold: f32) -> bool {
        self.0 >= threshold
    }

    /// Maximum confidence (1.0).
    pub const MAX: Self = Self(1.0);

    /// Minimum confidence (0.0).
    pub const MIN: Self = Self(0.0);
}

impl Default for Confidence {
    fn default() -> Self {
        Self(0.0)
    }
}

// =============================================================================
// Landmark Types
// =============================================================================

/// Named body joints following COCO format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum JointName {
    /// Nose
    Nose = 0,
    /// Left eye
    LeftEye = 1,
    /// Right eye
    RightEye = 2,
    /// Left ear
    LeftEar = 3,
    /// Right ear
    RightEar = 4,
    /// Left shoulder
    LeftShoulder = 5,
    /// Right shoulder
    RightShoulder = 6,
    /// Left elbow
    LeftElbow = 7,
    /// Right elbow
    RightElbow = 8,
    /// Left wrist
    LeftWrist = 9,
    /// Right wrist
    RightWrist = 10,
    /// Left hip
    LeftHip = 11,
    /// Right hip
    RightHip = 12,
    /// Left knee
    LeftKnee = 13,
    /// Right knee
    RightKnee = 14,
    /// Left ankle
    LeftAnkle = 15,
    /// Right ankle
    RightAnkle = 16,
}

impl JointName {
    /// Returns all joint names in index order.
    #[must_use]
    pub fn all() -> &'static [Self; MAX_JOINTS] {
        &[
            Self::Nose,
            Self::LeftEye,
            Self::RightEye,
            Self::LeftEar,
            Self::RightEar,
            Self::LeftShoulder,
            Self::RightShoulder,
            Self::LeftElbow,
            Self::RightElbow,
            Self::LeftWrist,
            Self::RightWrist,
            Self::LeftHip,
            Self::RightHip,
            Self::LeftKnee,
            Self::RightKnee,
            Self::LeftAnkle,
            Self::RightAnkle,
        ]
    }

    /// Returns the joint name as a string.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }

    /// Returns `true` if this joint is on the left side of the body.
    #[must_use]
    pub fn is_left_side(&self) -> bool {
        matches!(
            self,
            Self::LeftEye
                | Self::LeftEar
                | Self::LeftShoulder
                | Self::LeftElbow
                | Self::LeftWrist
                | Self::LeftHip
                | Self::LeftKnee
                | Self::LeftAnkle
        )
    }

    /// Returns `true` if this joint is on the right side of the body.
    #[must_use]
    pub fn is_right_side(&self) -> bool {
        matches!(
            self,
            Self::RightEye
                | Self::RightEar
                | Self::RightShoulder
                | Self::RightElbow
                | Self::RightWrist
                | Self::RightHip
                | Self::RightKnee
                | Self::RightAnkle
        )
    }

    /// Returns `true` if this is an arm joint.
    #[must_use]
    pub fn is_arm(&self) -> bool {
        matches!(
            self,
            Self::LeftShoulder
                | Self::RightShoulder
                | Self::LeftElbow
                | Self::RightElbow
                | Self::LeftWrist
                | Self::RightWrist
        )
    }
}

impl TryFrom<u8> for JointName {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Nose),
            1 => Ok(Self::LeftEye),
            2 => Ok(Self::RightEye),
            3 => Ok(Self::LeftEar),
            4 => Ok(Self::RightEar),
            5 => Ok(Self::LeftShoulder),
            6 => Ok(Self::RightShoulder),
            7 => Ok(Self::LeftElbow),
            8 => Ok(Self::RightElbow),
            9 => Ok(Self::LeftWrist),
            10 => Ok(Self::RightWrist),
            11 => Ok(Self::LeftHip),
            12 => Ok(Self::RightHip),
            13 => Ok(Self::LeftKnee),
            14 => Ok(Self::RightKnee),
            15 => Ok(Self::LeftAnkle),
            16 => Ok(Self::RightAnkle),
            _ => Err(CoreError::validation(format!("Invalid joint index: {value}"))),
        }
    }
}

/// A 2D normalized landmark position, `(x, y)` in `[0, 1]²`.
///
/// Ephemeral; produced fresh each frame by the external pose provider.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LandmarkPoint {
    /// X coordinate (normalized 0.0-1.0)
    pub x: f64,
    /// Y coordinate (normalized 0.0-1.0)
    pub y: f64,
}

impl LandmarkPoint {
    /// Creates a new landmark point.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` if this point coincides with `other` within floating
    /// point tolerance. A coincident endpoint/vertex pair makes the joint
    /// angle undefined.
    #[must_use]
    pub fn coincides_with(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < f64::EPSILON && (self.y - other.y).abs() < f64::EPSILON
    }

    /// Calculates the Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx.hypot(dy)
    }
}

/// A single detected body landmark with position and confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Landmark {
    /// Which joint this landmark is
    pub joint: JointName,
    /// Normalized position of the joint
    pub point: LandmarkPoint,
    /// Detection confidence for this landmark
    pub confidence: Confidence,
}

impl Landmark {
    /// Creates a new landmark.
    #[must_use]
    pub fn new(joint: JointName, point: LandmarkPoint, confidence: Confidence) -> Self {
        Self {
            joint,
            point,
            confidence,
        }
    }
}

/// One frame's detected landmarks, keyed by joint.
///
/// Produced by the external pose provider for frames where a pose was
/// detected; not every joint is necessarily present.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LandmarkFrame {
    /// Unique identifier for this frame's detection
    pub id: FrameId,
    /// Detected landmarks, indexed by joint
    landmarks: [Option<Landmark>; MAX_JOINTS],
    /// Overall detection confidence for the pose
    pub confidence: Confidence,
}

impl LandmarkFrame {
    /// Creates a new empty landmark frame with the given pose confidence.
    #[must_use]
    pub fn new(confidence: Confidence) -> Self {
        Self {
            id: FrameId::new(),
            landmarks: [None; MAX_JOINTS],
            confidence,
        }
    }

    /// Sets a landmark.
    pub fn set(&mut self, landmark: Landmark) {
        self.landmarks[landmark.joint as usize] = Some(landmark);
    }

    /// Sets a landmark, builder style.
    #[must_use]
    pub fn with(mut self, landmark: Landmark) -> Self {
        self.set(landmark);
        self
    }

    /// Gets a landmark by joint.
    #[must_use]
    pub fn get(&self, joint: JointName) -> Option<&Landmark> {
        self.landmarks[joint as usize].as_ref()
    }

    /// Returns the number of detected landmarks.
    #[must_use]
    pub fn detected_count(&self) -> usize {
        self.landmarks.iter().filter(|l| l.is_some()).count()
    }

    /// Returns all detected landmarks.
    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.landmarks.iter().filter_map(Option::as_ref)
    }
}

// =============================================================================
// Input Types
// =============================================================================

/// An encoded image payload, as received from a camera client.
///
/// Decoding is the pose provider's concern; the pipeline only rejects
/// payloads that are malformed on their face.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EncodedImage {
    data: Vec<u8>,
}

impl EncodedImage {
    /// Creates an encoded image from raw bytes.
    #[must_use]
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Returns the raw encoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Per-frame input to the pipeline.
///
/// "No angle this frame" is a first-class case threaded through the
/// pipeline, so the input is an explicit sum type rather than an image that
/// may or may not have been detected earlier in the call.
#[derive(Debug, Clone)]
pub enum FrameInput {
    /// An encoded camera frame; the pose provider runs on it
    Image(EncodedImage),
    /// Landmarks already extracted by an upstream detector
    Landmarks(LandmarkFrame),
}

// =============================================================================
// Counting Types
// =============================================================================

/// Coarse motion state of the tracked limb.
///
/// Exactly one value per session at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MotionPhase {
    /// Limb extended (near-straight); the state a rep completes into
    #[default]
    Up,
    /// Limb flexed; entered when the angle drops below the descent threshold
    Down,
}

impl MotionPhase {
    /// Returns the phase name as a string.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// Per-frame output of the rep state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RepUpdate {
    /// 1 if a rep completed on this frame, otherwise 0
    pub reps_this_frame: u32,
    /// Total reps completed in this session so far
    pub total_reps: u32,
    /// Motion phase after this frame
    pub phase: MotionPhase,
}

impl RepUpdate {
    /// Returns `true` if a rep completed on this frame.
    #[must_use]
    pub fn rep_completed(&self) -> bool {
        self.reps_this_frame > 0
    }
}

/// Why no angle was available on a frame that did have a detected pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NoAngleReason {
    /// One or more joints of the tracked triple were not detected
    MissingLandmarks,
    /// Joints were detected but below the landmark confidence threshold
    LowConfidence,
    /// A limb endpoint coincided with the joint vertex
    DegenerateGeometry,
}

/// Which stage of frame handling failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrameFailureKind {
    /// The frame payload could not be decoded
    Decode,
    /// The external pose provider errored
    PoseModel,
}

/// How a frame was ultimately handled.
///
/// Lets callers and tests distinguish failure kinds without parsing the
/// feedback string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrameDisposition {
    /// Pose detected, angle computed, counter advanced
    Tracked,
    /// No pose in the frame; a normal, expected outcome
    NoPose,
    /// Pose detected but no usable angle this frame
    NoAngle(NoAngleReason),
    /// Frame-level failure; session state preserved
    Failed(FrameFailureKind),
}

/// The output record for one processed frame.
///
/// Always well-formed: error paths fill in zeroed score/reps and a
/// human-readable feedback string rather than omitting fields, so the
/// record's shape is fixed for every frame.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameResult {
    /// 1 if a rep completed on this frame, otherwise 0
    pub reps_this_frame: u32,
    /// Form quality score, 0-100
    pub form_score: u8,
    /// Human-readable feedback for the user
    pub feedback: String,
    /// Detection confidence for this frame, 0.0-1.0
    pub confidence: f32,
    /// Total reps completed in this session
    pub total_reps: u32,
    /// The joint angle this frame, in degrees; 0.0 when no angle was computed
    pub current_angle: f64,
    /// When the frame was processed
    pub timestamp: DateTime<Utc>,
    /// How the frame was handled
    pub disposition: FrameDisposition,
}

/// Confirmation returned by a session reset.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResetConfirmation {
    /// The session that was reset
    pub session: SessionId,
    /// Total reps after the reset; always 0
    pub total_reps: u32,
    /// When the reset was applied
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_validation() {
        assert!(Confidence::new(0.5).is_ok());
        assert!(Confidence::new(0.0).is_ok());
        assert!(Confidence::new(1.0).is_ok());
        assert!(Confidence::new(-0.1).is_err());
        assert!(Confidence::new(1.1).is_err());
    }

    #[test]
    fn test_confidence_clamped() {
        assert!((Confidence::clamped(1.5).value() - 1.0).abs() < f32::EPSILON);
        assert!((Confidence::clamped(-0.5).value() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_joint_name_conversion() {
        assert_eq!(JointName::try_from(0).unwrap(), JointName::Nose);
        assert_eq!(JointName::try_from(16).unwrap(), JointName::RightAnkle);
        assert!(JointName::try_from(17).is_err());
    }

    #[test]
    fn test_joint_sides() {
        assert!(JointName::LeftElbow.is_left_side());
        assert!(JointName::RightElbow.is_right_side());
        assert!(!JointName::Nose.is_left_side());
        assert!(!JointName::Nose.is_right_side());
        assert!(JointName::RightWrist.is_arm());
        assert!(!JointName::RightKnee.is_arm());
    }

    #[test]
    fn test_landmark_point_distance() {
        let a = LandmarkPoint::new(0.0, 0.0);
        let b = LandmarkPoint::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_landmark_point_coincidence() {
        let a = LandmarkPoint::new(0.25, 0.75);
        let b = LandmarkPoint::new(0.25, 0.75);
        let c = LandmarkPoint::new(0.25, 0.7500001);
        assert!(a.coincides_with(&b));
        assert!(!a.coincides_with(&c));
    }

    #[test]
    fn test_landmark_frame() {
        let frame = LandmarkFrame::new(Confidence::clamped(0.9))
            .with(Landmark::new(
                JointName::RightShoulder,
                LandmarkPoint::new(0.4, 0.3),
                Confidence::clamped(0.95),
            ))
            .with(Landmark::new(
                JointName::RightElbow,
                LandmarkPoint::new(0.45, 0.5),
                Confidence::clamped(0.9),
            ));

        assert_eq!(frame.detected_count(), 2);
        assert!(frame.get(JointName::RightShoulder).is_some());
        assert!(frame.get(JointName::LeftAnkle).is_none());
    }

    #[test]
    fn test_motion_phase_default_is_up() {
        assert_eq!(MotionPhase::default(), MotionPhase::Up);
        assert_eq!(MotionPhase::Up.name(), "up");
        assert_eq!(MotionPhase::Down.name(), "down");
    }

    #[test]
    fn test_encoded_image() {
        let image = EncodedImage::from_bytes(vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(image.len(), 3);
        assert!(!image.is_empty());
        assert!(EncodedImage::from_bytes(Vec::new()).is_empty());
    }

    #[test]
    fn test_session_id_display() {
        let id = SessionId::new("client-42");
        assert_eq!(id.as_str(), "client-42");
        assert_eq!(id.to_string(), "client-42");
    }
}
