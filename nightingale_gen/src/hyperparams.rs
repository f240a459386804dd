// Genre- and diversity-conditioned sampling hyperparameters.
//
// Each genre carries an ordered list of operating points: a temperature
// and the noise levels that work well with it. These were tuned by
// listening tests per genre, so the table is static configuration — it can
// be overridden from JSON but is never derived at runtime.
//
// Diversity picks which region of the temperature list to draw from: the
// list is split into contiguous thirds by index, and Low/Medium/High map
// to the first/middle/last third. With fewer than three entries a third
// can be empty; in that case the draw falls back to the whole list.

use nightingale_codec::genre::Genre;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

/// Temperature used when a genre has no table entry.
pub const FALLBACK_TEMPERATURE: f64 = 2.0;

/// Noise std used when a genre has no table entry.
pub const FALLBACK_NOISE: f64 = 0.01;

/// How adventurous the sampling should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Diversity {
    Low,
    Medium,
    High,
}

impl Diversity {
    pub fn from_label(label: &str) -> Option<Diversity> {
        match label.trim().to_lowercase().as_str() {
            "low" => Some(Diversity::Low),
            "medium" => Some(Diversity::Medium),
            "high" => Some(Diversity::High),
            _ => None,
        }
    }
}

/// One tuned temperature and its candidate noise levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    pub temperature: f64,
    pub noise: Vec<f64>,
}

/// The chosen sampling parameters for one generation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hyperparams {
    pub temperature: f64,
    pub noise_std: f64,
}

/// Per-genre operating-point lists, in tuned (ascending temperature) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreTable {
    pub pop: Vec<OperatingPoint>,
    pub rock: Vec<OperatingPoint>,
    pub country: Vec<OperatingPoint>,
}

impl GenreTable {
    /// The built-in tuned table.
    pub fn default_table() -> GenreTable {
        GenreTable {
            pop: vec![
                point(0.4, &[0.03, 0.07]),
                point(0.6, &[0.00]),
                point(1.0, &[0.03]),
                point(1.7, &[0.05]),
                point(2.0, &[0.01]),
            ],
            rock: vec![
                point(0.4, &[0.00, 0.01]),
                point(0.6, &[0.01]),
                point(0.8, &[0.01]),
                point(2.0, &[0.00, 0.01]),
            ],
            country: vec![
                point(0.1, &[0.00, 0.01]),
                point(0.4, &[0.01]),
                point(0.8, &[0.01]),
            ],
        }
    }

    /// Load an override table from a JSON file.
    pub fn load(path: &Path) -> Result<GenreTable, Box<dyn Error>> {
        let data = std::fs::read_to_string(path)?;
        let table: GenreTable = serde_json::from_str(&data)?;
        Ok(table)
    }

    /// The operating points for a genre; None for Undefined.
    pub fn points(&self, genre: Genre) -> Option<&[OperatingPoint]> {
        match genre {
            Genre::Pop => Some(&self.pop),
            Genre::Rock => Some(&self.rock),
            Genre::Country => Some(&self.country),
            Genre::Undefined => None,
        }
    }

    /// Choose a (temperature, noise) pair for a genre at a diversity level.
    ///
    /// Undefined genres — and empty tables — bypass the draw entirely and
    /// use the fixed fallback pair.
    pub fn pick(&self, genre: Genre, diversity: Diversity, rng: &mut impl Rng) -> Hyperparams {
        let Some(points) = self.points(genre) else {
            return Hyperparams { temperature: FALLBACK_TEMPERATURE, noise_std: FALLBACK_NOISE };
        };
        let Some(index) = pick_temperature(points, diversity, rng) else {
            return Hyperparams { temperature: FALLBACK_TEMPERATURE, noise_std: FALLBACK_NOISE };
        };

        let chosen = &points[index];
        let noise_std = if chosen.noise.is_empty() {
            FALLBACK_NOISE
        } else {
            chosen.noise[rng.random_range(0..chosen.noise.len())]
        };
        Hyperparams { temperature: chosen.temperature, noise_std }
    }
}

/// Pick an operating-point index for a diversity level.
///
/// The list is partitioned into thirds at indices len/3 and 2*len/3. An
/// empty third (lists shorter than three) widens the draw to the whole
/// list. Returns None only for an empty list.
pub fn pick_temperature(
    points: &[OperatingPoint],
    diversity: Diversity,
    rng: &mut impl Rng,
) -> Option<usize> {
    if points.is_empty() {
        return None;
    }

    let lower_cut = points.len() / 3;
    let upper_cut = 2 * points.len() / 3;
    let range = match diversity {
        Diversity::Low => 0..lower_cut,
        Diversity::Medium => lower_cut..upper_cut,
        Diversity::High => upper_cut..points.len(),
    };
    let range = if range.is_empty() { 0..points.len() } else { range };
    Some(rng.random_range(range))
}

fn point(temperature: f64, noise: &[f64]) -> OperatingPoint {
    OperatingPoint { temperature, noise: noise.to_vec() }
}
