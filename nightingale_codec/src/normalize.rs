// Per-field scaling between raw event attributes and the [0,1] range.
//
// Each scalar field has a fixed maximum; normalization divides by it,
// denormalization multiplies back and truncates toward zero (an int cast,
// not a round). Callers clamp into [0, max] before normalizing — the
// functions here do no clamping of their own.
//
// There are two maxima tables. The dataset path normalizes delta times
// against 65536 while the generation path uses 65530. These differ on
// purpose: trained models expect the scale their training data used, so
// the two pipelines must keep their own constants. Do not unify them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Delta-time maximum for the dataset (offline) path.
pub const DATASET_TIME_MAX: u32 = 65536;

/// Delta-time maximum for the generation (online) path.
pub const GENERATION_TIME_MAX: u32 = 65530;

/// Scale a raw attribute into [0,1]. The caller has already clamped
/// `value` into `[0, max]`; `max` comes from a validated `FieldMaxima`.
pub fn normalize(value: u32, max: u32) -> f32 {
    value as f32 / max as f32
}

/// Scale a normalized value back to its raw range, truncating toward zero.
pub fn denormalize(value: f32, max: u32) -> u32 {
    (value * max as f32) as u32
}

/// The per-field normalization maxima for one pipeline.
///
/// Immutable configuration: build one with `dataset()` or `generation()`
/// (or deserialize one) and pass it into the codec. Field order here is
/// the order of the seven scalar slots in an event vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMaxima {
    pub channel: u32,
    pub note: u32,
    pub velocity: u32,
    pub control: u32,
    pub value: u32,
    pub program: u32,
    pub time: u32,
}

impl FieldMaxima {
    /// Maxima for encoding training data from MIDI files.
    pub fn dataset() -> FieldMaxima {
        FieldMaxima {
            channel: 15,
            note: 127,
            velocity: 127,
            control: 127,
            value: 127,
            program: 127,
            time: DATASET_TIME_MAX,
        }
    }

    /// Maxima for decoding generated step vectors.
    pub fn generation() -> FieldMaxima {
        FieldMaxima {
            time: GENERATION_TIME_MAX,
            ..FieldMaxima::dataset()
        }
    }

    /// Reject a table containing a zero maximum. A zero would turn
    /// normalization into a division by zero, so it is refused up front
    /// rather than discovered mid-encode.
    pub fn validate(&self) -> Result<(), ZeroMaximumError> {
        for (name, max) in self.named() {
            if max == 0 {
                return Err(ZeroMaximumError { field: name });
            }
        }
        Ok(())
    }

    /// The maxima in vector slot order.
    pub fn as_array(&self) -> [u32; 7] {
        [
            self.channel,
            self.note,
            self.velocity,
            self.control,
            self.value,
            self.program,
            self.time,
        ]
    }

    fn named(&self) -> [(&'static str, u32); 7] {
        [
            ("channel", self.channel),
            ("note", self.note),
            ("velocity", self.velocity),
            ("control", self.control),
            ("value", self.value),
            ("program", self.program),
            ("time", self.time),
        ]
    }
}

/// A maxima table contained a zero entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroMaximumError {
    pub field: &'static str,
}

impl fmt::Display for ZeroMaximumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "normalization maximum for '{}' is zero", self.field)
    }
}

impl std::error::Error for ZeroMaximumError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_scales_into_unit_range() {
        assert_eq!(normalize(0, 127), 0.0);
        assert_eq!(normalize(127, 127), 1.0);
        assert!((normalize(64, 127) - 64.0 / 127.0).abs() < 1e-6);
    }

    #[test]
    fn denormalize_truncates_toward_zero() {
        // 0.999.. * 127 = 126.9.. — an int cast gives 126, not 127.
        assert_eq!(denormalize(0.9999, 127), 126);
        assert_eq!(denormalize(1.0, 127), 127);
        assert_eq!(denormalize(0.0, 127), 0);
    }

    #[test]
    fn pipeline_time_maxima_stay_distinct() {
        assert_eq!(FieldMaxima::dataset().time, 65536);
        assert_eq!(FieldMaxima::generation().time, 65530);
        assert_ne!(FieldMaxima::dataset().time, FieldMaxima::generation().time);
    }

    #[test]
    fn validate_rejects_zero_maximum() {
        let mut maxima = FieldMaxima::dataset();
        assert!(maxima.validate().is_ok());

        maxima.velocity = 0;
        let err = maxima.validate().unwrap_err();
        assert_eq!(err.field, "velocity");
    }

    #[test]
    fn as_array_matches_vector_slot_order() {
        let maxima = FieldMaxima::dataset();
        assert_eq!(maxima.as_array(), [15, 127, 127, 127, 127, 127, 65536]);
    }
}
