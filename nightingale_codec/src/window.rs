// Sliding-window transform from a flat vector stream into training tuples,
// and the persisted dataset format.
//
// For a stream of length L and window size S, tuple i (0 <= i < L - S) is
// (stream[i..i+S], stream[i+S][3..7], stream[i+S][7..14]): the context, the
// next event's kind one-hot, and its continuous parameters. Order is
// stream order; nothing is shuffled here. A stream no longer than the
// window produces no tuples at all, which is fine — short files simply
// contribute nothing.

use crate::codec::{KIND_WIDTH, PARAM_WIDTH, VECTOR_WIDTH};
use crate::genre::GENRE_WIDTH;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

/// One supervised example: a context window and the event that follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub context: Vec<[f32; VECTOR_WIDTH]>,
    pub next_kind: [f32; KIND_WIDTH],
    pub next_params: [f32; PARAM_WIDTH],
}

/// Slice a flat vector stream into training tuples.
///
/// `window_size` must be positive.
pub fn window(vectors: &[[f32; VECTOR_WIDTH]], window_size: usize) -> Vec<TrainingExample> {
    assert!(window_size > 0, "window: window_size must be positive");

    if vectors.len() <= window_size {
        return Vec::new();
    }

    let mut examples = Vec::with_capacity(vectors.len() - window_size);
    for i in 0..vectors.len() - window_size {
        let next = &vectors[i + window_size];
        let mut next_kind = [0.0f32; KIND_WIDTH];
        next_kind.copy_from_slice(&next[GENRE_WIDTH..GENRE_WIDTH + KIND_WIDTH]);
        let mut next_params = [0.0f32; PARAM_WIDTH];
        next_params.copy_from_slice(&next[GENRE_WIDTH + KIND_WIDTH..]);

        examples.push(TrainingExample {
            context: vectors[i..i + window_size].to_vec(),
            next_kind,
            next_params,
        });
    }
    examples
}

/// The persisted training set: three co-indexed arrays, one JSON document.
///
/// `contexts[i]`, `next_kinds[i]` and `next_params[i]` together form
/// example i. Stored column-wise so consumers can feed each array to a
/// model input without re-slicing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub window_size: usize,
    pub contexts: Vec<Vec<[f32; VECTOR_WIDTH]>>,
    pub next_kinds: Vec<[f32; KIND_WIDTH]>,
    pub next_params: Vec<[f32; PARAM_WIDTH]>,
}

impl Dataset {
    pub fn from_examples(window_size: usize, examples: Vec<TrainingExample>) -> Dataset {
        let mut dataset = Dataset {
            window_size,
            contexts: Vec::with_capacity(examples.len()),
            next_kinds: Vec::with_capacity(examples.len()),
            next_params: Vec::with_capacity(examples.len()),
        };
        for example in examples {
            dataset.contexts.push(example.context);
            dataset.next_kinds.push(example.next_kind);
            dataset.next_params.push(example.next_params);
        }
        dataset
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn save(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        let data = serde_json::to_string(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Dataset, Box<dyn Error>> {
        let data = std::fs::read_to_string(path)?;
        let dataset: Dataset = serde_json::from_str(&data)?;
        Ok(dataset)
    }
}
