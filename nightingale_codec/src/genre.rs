// Genre tags and their one-hot conditioning vectors.
//
// Three genres are recognized; everything else collapses to Undefined,
// which encodes as the all-zero vector. The mapping is deliberately lossy:
// an unrecognized label and an explicit "undefined" are indistinguishable
// once encoded, and decode never attempts to reconstruct a genre.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of slots in the genre one-hot vector.
pub const GENRE_WIDTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    Pop,
    Rock,
    Country,
    Undefined,
}

impl Genre {
    /// The genres that actually condition generation, in one-hot slot order.
    pub const LABELED: [Genre; 3] = [Genre::Pop, Genre::Rock, Genre::Country];

    /// Parse a genre label. Whitespace and case are ignored; anything
    /// unrecognized maps to Undefined rather than failing.
    pub fn from_label(label: &str) -> Genre {
        match label.trim().to_lowercase().as_str() {
            "pop" => Genre::Pop,
            "rock" => Genre::Rock,
            "country" => Genre::Country,
            _ => Genre::Undefined,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Genre::Pop => "pop",
            Genre::Rock => "rock",
            Genre::Country => "country",
            Genre::Undefined => "undefined",
        }
    }

    /// The 3-slot conditioning vector. Undefined is all zeros.
    pub fn one_hot(self) -> [f32; GENRE_WIDTH] {
        match self {
            Genre::Pop => [1.0, 0.0, 0.0],
            Genre::Rock => [0.0, 1.0, 0.0],
            Genre::Country => [0.0, 0.0, 1.0],
            Genre::Undefined => [0.0, 0.0, 0.0],
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
