use thiserror::Error;

/// Errors raised by curve mutations and editor construction.
///
/// Every variant except `InvalidCurve` is recoverable: the interaction
/// layer absorbs the rejection and the gesture becomes a no-op for that
/// tick. `InvalidCurve` is fatal at construction time only.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CurveError {
    /// A curve must contain at least two keyframes at construction
    #[error("curve requires at least two keyframes, got {count}")]
    InvalidCurve { count: usize },

    /// Removing this keyframe would drop the curve below two keyframes
    #[error("removal rejected: a curve keeps at least two keyframes")]
    MinimumKeyframesViolated,

    /// Keyframe index is stale or out of range
    #[error("keyframe index {index} out of range (count {count})")]
    IndexOutOfRange { index: usize, count: usize },

    /// Another keyframe already sits at exactly this time
    #[error("a keyframe already exists at time {time}")]
    DuplicateTime { time: f32 },

    /// The curve has no keyframes; unreachable while the two-key minimum holds
    #[error("curve has no keyframes")]
    EmptyCurve,
}

impl CurveError {
    /// Returns true if the error can be absorbed as a per-tick no-op.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidCurve { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverability() {
        assert!(!CurveError::InvalidCurve { count: 1 }.is_recoverable());
        assert!(CurveError::MinimumKeyframesViolated.is_recoverable());
        assert!(CurveError::DuplicateTime { time: 0.5 }.is_recoverable());
        assert!(CurveError::IndexOutOfRange { index: 9, count: 2 }.is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let msg = CurveError::InvalidCurve { count: 1 }.to_string();
        assert!(msg.contains("two keyframes"));
        let msg = CurveError::IndexOutOfRange { index: 5, count: 3 }.to_string();
        assert!(msg.contains('5') && msg.contains('3'));
    }
}
