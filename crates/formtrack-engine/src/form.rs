//! Form scoring.
//!
//! Maps an instantaneous joint angle to a discrete quality tier with a
//! human-readable feedback string. Pure function of the angle; no
//! confidence weighting or hysteresis is applied, and the score is
//! recomputed independently every frame.

use serde::{Deserialize, Serialize};

/// Inclusive angle band for the optimal tier, in degrees.
pub const OPTIMAL_BAND: (f64, f64) = (80.0, 100.0);
/// Inclusive angle band for the good tier, in degrees.
pub const GOOD_BAND: (f64, f64) = (70.0, 110.0);
/// Inclusive angle band for the moderate tier, in degrees.
pub const MODERATE_BAND: (f64, f64) = (60.0, 120.0);

/// Discrete form-quality tier.
///
/// Bands are nested and evaluated narrowest-first, so the tightest band
/// containing the angle wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormTier {
    /// Angle within the optimal band
    Optimal,
    /// Angle within the good band but outside optimal
    Good,
    /// Angle within the moderate band but outside good
    Moderate,
    /// Angle outside every band
    Poor,
}

impl FormTier {
    /// Returns the 0-100 score for this tier.
    #[must_use]
    pub const fn score(self) -> u8 {
        match self {
            Self::Optimal => 95,
            Self::Good => 85,
            Self::Moderate => 70,
            Self::Poor => 50,
        }
    }

    /// Returns the user-facing feedback for this tier.
    #[must_use]
    pub const fn feedback(self) -> &'static str {
        match self {
            Self::Optimal => "Perfect form! Keep it up!",
            Self::Good => "Good form, slight adjustment needed",
            Self::Moderate => "Moderate form, focus on your elbow angle",
            Self::Poor => "Poor form, check your arm position",
        }
    }
}

/// The result of scoring one angle observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FormAssessment {
    /// Form quality score, 0-100
    pub score: u8,
    /// The tier the angle landed in
    pub tier: FormTier,
    /// User-facing feedback for this tier
    pub feedback: &'static str,
}

/// Scores a joint angle against the fixed form bands.
#[must_use]
pub fn assess_angle(angle_deg: f64) -> FormAssessment {
    let tier = if (OPTIMAL_BAND.0..=OPTIMAL_BAND.1).contains(&angle_deg) {
        FormTier::Optimal
    } else if (GOOD_BAND.0..=GOOD_BAND.1).contains(&angle_deg) {
        FormTier::Good
    } else if (MODERATE_BAND.0..=MODERATE_BAND.1).contains(&angle_deg) {
        FormTier::Moderate
    } else {
        FormTier::Poor
    };

    FormAssessment {
        score: tier.score(),
        tier,
        feedback: tier.feedback(),
    }
}
