//! Measurement result types.

use serde::{Deserialize, Serialize};

/// Eyeglass-fitting measurement in millimeters, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Total eye width (lens width estimate).
    pub eye_width_mm: f64,
    /// Gap between the inner edges of the eye regions.
    pub bridge_width_mm: f64,
    /// Vertical lens height estimate.
    pub b_size_mm: f64,
}

impl Measurement {
    /// Averages a set of measurements field by field, rounding to two decimals.
    ///
    /// Returns `None` for an empty set.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average(measurements: &[Self]) -> Option<Self> {
        if measurements.is_empty() {
            return None;
        }

        let n = measurements.len() as f64;
        let sum = measurements.iter().fold([0.0_f64; 3], |acc, m| {
            [
                acc[0] + m.eye_width_mm,
                acc[1] + m.bridge_width_mm,
                acc[2] + m.b_size_mm,
            ]
        });

        Some(Self {
            eye_width_mm: round2(sum[0] / n),
            bridge_width_mm: round2(sum[1] / n),
            b_size_mm: round2(sum[2] / n),
        })
    }
}

/// Rounds to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Result of a completed batch scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Average over every measurement of every batch.
    pub measurement: Measurement,
    /// Number of completed batches.
    pub batches: usize,
    /// Total number of measurements averaged.
    pub frames: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert!((round2(36.521_739) - 36.52).abs() < 1e-12);
        assert!((round2(16.428_571) - 16.43).abs() < 1e-12);
        assert!((round2(-3.141_59) - -3.14).abs() < 1e-12);
    }

    #[test]
    fn test_average_empty() {
        assert!(Measurement::average(&[]).is_none());
    }

    #[test]
    fn test_average_rounds_result() {
        let a = Measurement {
            eye_width_mm: 30.0,
            bridge_width_mm: 18.0,
            b_size_mm: 14.0,
        };
        let b = Measurement {
            eye_width_mm: 31.0,
            bridge_width_mm: 19.0,
            b_size_mm: 15.0,
        };
        let c = Measurement {
            eye_width_mm: 31.0,
            bridge_width_mm: 19.0,
            b_size_mm: 15.0,
        };

        let avg = Measurement::average(&[a, b, c]).unwrap_or_else(|| panic!("non-empty"));
        assert!((avg.eye_width_mm - 30.67).abs() < 1e-9);
        assert!((avg.bridge_width_mm - 18.67).abs() < 1e-9);
        assert!((avg.b_size_mm - 14.67).abs() < 1e-9);
    }

    #[test]
    fn test_serializes_field_names() {
        let m = Measurement {
            eye_width_mm: 26.48,
            bridge_width_mm: 36.52,
            b_size_mm: 16.43,
        };
        let json = serde_json::to_value(m).unwrap_or_default();
        assert_eq!(json["eye_width_mm"], 26.48);
        assert_eq!(json["bridge_width_mm"], 36.52);
        assert_eq!(json["b_size_mm"], 16.43);
    }
}
