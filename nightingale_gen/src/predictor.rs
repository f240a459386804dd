// The black-box model interface.
//
// The controller only needs one thing from a model: given the current
// context window and a genre conditioning vector, a score per event kind
// and the seven continuous parameters of the next event. How those come
// about — a trained network behind FFI, a remote service, a lookup table —
// is the host's business.
//
// `TablePredictor` is the built-in stand-in: kind-to-kind transition
// weights plus a parameter profile per kind, loadable from JSON. It exists
// so the generate binary produces audible output before a trained model is
// wired in, the same way default model tables ship for use before corpus
// analysis is complete.

use nightingale_codec::codec::{KIND_WIDTH, PARAM_WIDTH, STEP_WIDTH};
use nightingale_codec::genre::GENRE_WIDTH;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

/// One model output: probability-like kind scores (non-negative, need not
/// sum to 1 — the sampler re-normalizes) and the next event's parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub kind_scores: [f32; KIND_WIDTH],
    pub params: [f32; PARAM_WIDTH],
}

/// The external probability model, seen from the controller.
///
/// Exactly one call is in flight per generation run; implementations may
/// keep internal caches but must not observe or mutate controller state.
pub trait Predictor {
    fn predict(
        &mut self,
        context: &[[f32; STEP_WIDTH]],
        genre: &[f32; GENRE_WIDTH],
    ) -> Prediction;
}

/// Table-driven fallback predictor.
///
/// Conditions only on the kind of the most recent context vector: row i of
/// `transitions` scores the next kind after kind i, and `profiles` gives
/// the parameter vector emitted alongside each predicted kind. `priors`
/// covers the all-zero padding at the start of a fresh window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePredictor {
    pub priors: [f32; KIND_WIDTH],
    pub transitions: [[f32; KIND_WIDTH]; KIND_WIDTH],
    pub profiles: [[f32; PARAM_WIDTH]; KIND_WIDTH],
}

impl TablePredictor {
    /// Note-heavy defaults: notes mostly follow notes, with occasional
    /// control and program changes, so fallback output passes the note
    /// ratio gate.
    pub fn default_table() -> TablePredictor {
        TablePredictor {
            priors: [0.80, 0.05, 0.10, 0.05],
            transitions: [
                // after note_on
                [0.35, 0.55, 0.07, 0.03],
                // after note_off
                [0.70, 0.20, 0.07, 0.03],
                // after control_change
                [0.60, 0.25, 0.12, 0.03],
                // after program_change
                [0.75, 0.15, 0.08, 0.02],
            ],
            profiles: [
                // channel, note, velocity, control, value, program, time
                [0.0, 0.50, 0.70, 0.0, 0.0, 0.0, 0.004],
                [0.0, 0.50, 0.00, 0.0, 0.0, 0.0, 0.004],
                [0.0, 0.00, 0.00, 0.5, 0.6, 0.0, 0.002],
                [0.0, 0.00, 0.00, 0.0, 0.0, 0.4, 0.000],
            ],
        }
    }

    /// Load an override table from a JSON file.
    pub fn load(path: &Path) -> Result<TablePredictor, Box<dyn Error>> {
        let data = std::fs::read_to_string(path)?;
        let predictor: TablePredictor = serde_json::from_str(&data)?;
        Ok(predictor)
    }

    /// The kind slot of the last context vector, or None on zero padding.
    fn last_kind(context: &[[f32; STEP_WIDTH]]) -> Option<usize> {
        let last = context.last()?;
        let kind_slice = &last[..KIND_WIDTH];
        if kind_slice.iter().all(|&v| v == 0.0) {
            return None;
        }
        let mut best = 0;
        for (i, &value) in kind_slice.iter().enumerate() {
            if value > kind_slice[best] {
                best = i;
            }
        }
        Some(best)
    }
}

impl Predictor for TablePredictor {
    fn predict(
        &mut self,
        context: &[[f32; STEP_WIDTH]],
        _genre: &[f32; GENRE_WIDTH],
    ) -> Prediction {
        let kind_scores = match TablePredictor::last_kind(context) {
            Some(kind) => self.transitions[kind],
            None => self.priors,
        };

        // Emit the profile of the highest-scoring kind.
        let mut best = 0;
        for (i, &score) in kind_scores.iter().enumerate() {
            if score > kind_scores[best] {
                best = i;
            }
        }
        Prediction { kind_scores, params: self.profiles[best] }
    }
}
