//! Joint-angle geometry.
//!
//! Computes the interior angle at a joint vertex from three 2D landmark
//! positions. Pure functions, no state.

use formtrack_core::{GeometryError, JointName, LandmarkPoint};

/// The three joints whose landmarks define one tracked angle.
///
/// `vertex` is the joint the angle is measured at; `first` and `second` are
/// the limb endpoints on either side of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointTriple {
    /// Limb endpoint on one side of the vertex
    pub first: JointName,
    /// The joint the angle is measured at
    pub vertex: JointName,
    /// Limb endpoint on the other side of the vertex
    pub second: JointName,
}

impl JointTriple {
    /// Creates a new joint triple.
    #[must_use]
    pub const fn new(first: JointName, vertex: JointName, second: JointName) -> Self {
        Self {
            first,
            vertex,
            second,
        }
    }

    /// Right elbow angle: shoulder-elbow-wrist.
    pub const RIGHT_ELBOW: Self = Self::new(
        JointName::RightShoulder,
        JointName::RightElbow,
        JointName::RightWrist,
    );

    /// Left elbow angle: shoulder-elbow-wrist.
    pub const LEFT_ELBOW: Self = Self::new(
        JointName::LeftShoulder,
        JointName::LeftElbow,
        JointName::LeftWrist,
    );

    /// The joints of this triple in `[first, vertex, second]` order.
    #[must_use]
    pub fn joints(&self) -> [JointName; 3] {
        [self.first, self.vertex, self.second]
    }
}

/// Computes the unsigned interior angle at vertex `b` between rays `b→a`
/// and `b→c`, in degrees, in `[0, 180]`.
///
/// The raw atan2 difference is folded: take the absolute value, and replace
/// anything above 180° with its 360° complement. The result is always the
/// smaller of the two possible angles between the rays, independent of
/// winding direction.
///
/// Degenerate inputs (`a == b` or `c == b`) still produce a number here;
/// use [`try_joint_angle`] when the caller needs that case rejected.
#[must_use]
pub fn joint_angle(a: LandmarkPoint, b: LandmarkPoint, c: LandmarkPoint) -> f64 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let mut angle = radians.to_degrees().abs();
    if angle > 180.0 {
        angle = 360.0 - angle;
    }
    angle
}

/// Computes the joint angle at `b`, rejecting degenerate triples.
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateTriple`] when either endpoint
/// coincides with the vertex; the angle between a zero-length limb vector
/// and anything is meaningless.
pub fn try_joint_angle(
    a: LandmarkPoint,
    b: LandmarkPoint,
    c: LandmarkPoint,
) -> Result<f64, GeometryError> {
    if a.coincides_with(&b) {
        return Err(GeometryError::DegenerateTriple { endpoint: "first" });
    }
    if c.coincides_with(&b) {
        return Err(GeometryError::DegenerateTriple { endpoint: "second" });
    }
    Ok(joint_angle(a, b, c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> LandmarkPoint {
        LandmarkPoint::new(x, y)
    }

    #[test]
    fn test_right_angle() {
        let angle = joint_angle(p(0.0, 1.0), p(0.0, 0.0), p(1.0, 0.0));
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_straight_limb_is_180() {
        let angle = joint_angle(p(0.0, 0.5), p(0.5, 0.5), p(1.0, 0.5));
        assert!((angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_folded_limb_is_0() {
        let angle = joint_angle(p(1.0, 0.5), p(0.5, 0.5), p(1.0, 0.5));
        assert!(angle.abs() < 1e-9);
    }

    #[test]
    fn test_angle_in_bounds_for_arbitrary_triples() {
        // Sweep a fan of endpoints around a fixed vertex; every angle must
        // land in [0, 180] regardless of winding.
        let b = p(0.5, 0.5);
        let a = p(0.9, 0.1);
        for i in 0..72 {
            let theta = f64::from(i) * std::f64::consts::PI / 36.0;
            let c = p(0.5 + 0.4 * theta.cos(), 0.5 + 0.4 * theta.sin());
            let angle = joint_angle(a, b, c);
            assert!(
                (0.0..=180.0).contains(&angle),
                "angle {angle} out of bounds at step {i}"
            );
        }
    }

    #[test]
    fn test_angle_symmetric_in_endpoints() {
        let a = p(0.2, 0.8);
        let b = p(0.5, 0.5);
        let c = p(0.9, 0.6);
        let forward = joint_angle(a, b, c);
        let swapped = joint_angle(c, b, a);
        assert!((forward - swapped).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_first_endpoint() {
        let b = p(0.5, 0.5);
        let result = try_joint_angle(b, b, p(1.0, 0.5));
        assert!(matches!(
            result,
            Err(GeometryError::DegenerateTriple { endpoint: "first" })
        ));
    }

    #[test]
    fn test_degenerate_second_endpoint() {
        let b = p(0.5, 0.5);
        let result = try_joint_angle(p(0.0, 0.5), b, b);
        assert!(matches!(
            result,
            Err(GeometryError::DegenerateTriple { endpoint: "second" })
        ));
    }

    #[test]
    fn test_non_degenerate_ok() {
        let angle = try_joint_angle(p(0.0, 1.0), p(0.0, 0.0), p(1.0, 0.0)).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_elbow_triples() {
        assert_eq!(
            JointTriple::RIGHT_ELBOW.joints(),
            [
                JointName::RightShoulder,
                JointName::RightElbow,
                JointName::RightWrist
            ]
        );
        assert!(JointTriple::LEFT_ELBOW.vertex.is_left_side());
    }
}
