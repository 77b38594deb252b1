//! Measurement failure reasons.

use thiserror::Error;

/// Why a single measurement attempt produced no [`Measurement`](super::Measurement).
///
/// The `Display` text of the detection variants is shown to users verbatim.
#[derive(Debug, Error)]
pub enum MeasureError {
    /// The detector found no face candidates at all.
    #[error("No face detected. Please ensure your face is visible and well-lit.")]
    NoFace,

    /// Faces were found but none is centered and large enough.
    #[error("No centered face found. Please adjust your position.")]
    NoCenteredFace,

    /// The qualifying face yielded fewer than two eye candidates.
    #[error("Not enough eyes detected. Please center your face properly.")]
    NotEnoughEyes,

    /// Interpupillary pixel distance was not positive and the caller asked
    /// for that to be an error instead of the unit-ratio fallback.
    #[error("Interpupillary distance is not positive ({interpupil_px} px); cannot derive a scale.")]
    DegenerateScale {
        /// The offending pixel distance.
        interpupil_px: f64,
    },

    /// The detection backend itself failed.
    #[error("Detection backend failed: {0:#}")]
    Backend(#[source] anyhow::Error),
}

impl MeasureError {
    /// Whether the failure is about what was (not) seen in the frame, as
    /// opposed to a backend fault. Such failures are safe to retry on the
    /// next frame.
    #[must_use]
    pub const fn is_detection_failure(&self) -> bool {
        !matches!(self, Self::Backend(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            MeasureError::NoFace.to_string(),
            "No face detected. Please ensure your face is visible and well-lit."
        );
        assert_eq!(
            MeasureError::NoCenteredFace.to_string(),
            "No centered face found. Please adjust your position."
        );
        assert_eq!(
            MeasureError::NotEnoughEyes.to_string(),
            "Not enough eyes detected. Please center your face properly."
        );
    }

    #[test]
    fn test_backend_is_not_detection_failure() {
        let err = MeasureError::Backend(anyhow::anyhow!("cascade not loaded"));
        assert!(!err.is_detection_failure());
        assert!(err.to_string().contains("cascade not loaded"));
        assert!(MeasureError::NoFace.is_detection_failure());
    }
}
