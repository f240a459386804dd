// The generation loop and its acceptance policy.
//
// One attempt: seed the context window, then repeatedly ask the predictor
// for the next event, sample its kind at the configured temperature,
// jitter its parameters, decode the resulting step vector, and slide the
// window forward — until the target number of events has accumulated.
// Step N's input depends on step N-1's output, so there is never more
// than one predictor call in flight.
//
// The outer loop gates whole attempts: a sequence that is less than half
// note events (or empty) is thrown away and generation restarts from a
// fresh random seed. By default this retries forever — the caller sees
// "no result yet", never a partial one. Hosts that cannot afford an
// unbounded loop set `max_attempts` and handle the exhaustion error.

use crate::context::ContextWindow;
use crate::predictor::Predictor;
use crate::sampler::{perturb_params, sample_kind};
use crate::seed::random_seed_sequence;
use nightingale_codec::codec::{EventCodec, KIND_WIDTH, STEP_WIDTH};
use nightingale_codec::event::ChannelEvent;
use nightingale_codec::genre::{GENRE_WIDTH, Genre};
use rand::Rng;
use rand_distr::Normal;
use std::fmt;

/// Seed lengths are drawn uniformly from [SEED_MIN_LEN, SEED_MAX_LEN).
const SEED_MIN_LEN: usize = 1;
const SEED_MAX_LEN: usize = 40;

/// Tunable knobs for one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Number of events to generate per attempt.
    pub target_length: usize,
    /// Context window length fed to the predictor.
    pub fixed_length: usize,
    /// Sampling temperature for the event kind.
    pub temperature: f64,
    /// Std of the Gaussian jitter on continuous parameters.
    pub noise_std: f64,
    /// Minimum fraction of note events for a sequence to be accepted.
    pub note_ratio_threshold: f64,
    /// Cap on generation attempts. None retries until accepted.
    pub max_attempts: Option<u32>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            target_length: 500,
            fixed_length: 50,
            temperature: 0.01,
            noise_std: 0.001,
            note_ratio_threshold: 0.5,
            max_attempts: None,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_length == 0 {
            return Err(ConfigError::ZeroTargetLength);
        }
        if self.fixed_length == 0 {
            return Err(ConfigError::ZeroFixedLength);
        }
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(ConfigError::BadTemperature(self.temperature));
        }
        if !self.noise_std.is_finite() || self.noise_std < 0.0 {
            return Err(ConfigError::BadNoiseStd(self.noise_std));
        }
        if !self.note_ratio_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.note_ratio_threshold)
        {
            return Err(ConfigError::BadThreshold(self.note_ratio_threshold));
        }
        Ok(())
    }
}

/// What happened across a whole (possibly retried) generation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    /// Attempts made, including the accepted one.
    pub attempts: u32,
    /// Attempts rejected by the note-ratio gate.
    pub rejected: u32,
    /// Steps dropped because their vector failed to decode.
    pub skipped_decodes: u32,
    /// Note ratio of the accepted sequence.
    pub note_ratio: f64,
}

/// An accepted sequence and its run statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRun {
    pub events: Vec<ChannelEvent>,
    pub stats: RunStats,
}

/// One ungated attempt from a caller-supplied seed.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceRun {
    pub events: Vec<ChannelEvent>,
    pub skipped_decodes: u32,
}

/// Fraction of events that are note on/off. Zero for an empty slice.
pub fn note_ratio(events: &[ChannelEvent]) -> f64 {
    if events.is_empty() {
        return 0.0;
    }
    let notes = events.iter().filter(|event| event.is_note()).count();
    notes as f64 / events.len() as f64
}

/// Run one generation attempt from the given seed, without the gate.
pub fn generate_sequence(
    predictor: &mut impl Predictor,
    seed: &[[f32; STEP_WIDTH]],
    genre_vector: [f32; GENRE_WIDTH],
    config: &GeneratorConfig,
    rng: &mut impl Rng,
) -> Result<SequenceRun, GenerateError> {
    config.validate()?;
    let codec = EventCodec::generation();
    let noise = gaussian(config.noise_std)?;
    let mut window = ContextWindow::from_seed(seed, config.fixed_length);
    let (events, skipped_decodes) =
        run_attempt(predictor, &codec, &noise, &mut window, genre_vector, config, rng);
    Ok(SequenceRun { events, skipped_decodes })
}

/// Generate an accepted sequence for a genre, retrying until the
/// note-ratio gate passes (or the optional attempt cap is exhausted).
pub fn generate(
    predictor: &mut impl Predictor,
    genre: Genre,
    config: &GeneratorConfig,
    rng: &mut impl Rng,
) -> Result<GenerationRun, GenerateError> {
    config.validate()?;
    let codec = EventCodec::generation();
    let noise = gaussian(config.noise_std)?;
    let genre_vector = genre.one_hot();
    let mut stats = RunStats::default();

    loop {
        stats.attempts += 1;
        let seed_length = rng.random_range(SEED_MIN_LEN..SEED_MAX_LEN);
        let seed = random_seed_sequence(seed_length, rng);
        let mut window = ContextWindow::from_seed(&seed, config.fixed_length);

        let (events, skipped) =
            run_attempt(predictor, &codec, &noise, &mut window, genre_vector, config, rng);
        stats.skipped_decodes += skipped;

        let ratio = note_ratio(&events);
        if !events.is_empty() && ratio >= config.note_ratio_threshold {
            stats.note_ratio = ratio;
            return Ok(GenerationRun { events, stats });
        }

        stats.rejected += 1;
        if let Some(cap) = config.max_attempts {
            if stats.attempts >= cap {
                return Err(GenerateError::AttemptsExhausted { attempts: stats.attempts });
            }
        }
    }
}

fn run_attempt(
    predictor: &mut impl Predictor,
    codec: &EventCodec,
    noise: &Normal<f64>,
    window: &mut ContextWindow,
    genre_vector: [f32; GENRE_WIDTH],
    config: &GeneratorConfig,
    rng: &mut impl Rng,
) -> (Vec<ChannelEvent>, u32) {
    let mut events = Vec::with_capacity(config.target_length);
    let mut skipped = 0u32;

    while events.len() < config.target_length {
        let prediction = predictor.predict(window.vectors(), &genre_vector);

        let kind = sample_kind(&prediction.kind_scores, config.temperature, rng);
        let params = perturb_params(prediction.params, noise, rng);

        let mut step = [0.0f32; STEP_WIDTH];
        step[kind.index()] = 1.0;
        step[KIND_WIDTH..].copy_from_slice(&params);

        match codec.decode_step(&step) {
            Ok(event) => {
                window.push(step);
                events.push(event);
            }
            Err(_) => {
                // The window must not see a vector that failed to decode.
                skipped += 1;
            }
        }
    }

    (events, skipped)
}

fn gaussian(noise_std: f64) -> Result<Normal<f64>, GenerateError> {
    Normal::new(0.0, noise_std)
        .map_err(|_| GenerateError::Config(ConfigError::BadNoiseStd(noise_std)))
}

/// A rejected configuration value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    ZeroTargetLength,
    ZeroFixedLength,
    BadTemperature(f64),
    BadNoiseStd(f64),
    BadThreshold(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroTargetLength => write!(f, "target length must be positive"),
            ConfigError::ZeroFixedLength => write!(f, "context window length must be positive"),
            ConfigError::BadTemperature(t) => {
                write!(f, "temperature must be finite and positive, got {t}")
            }
            ConfigError::BadNoiseStd(n) => {
                write!(f, "noise std must be finite and non-negative, got {n}")
            }
            ConfigError::BadThreshold(r) => {
                write!(f, "note ratio threshold must be within [0,1], got {r}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Why a generation run failed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GenerateError {
    Config(ConfigError),
    /// The attempt cap was reached without an accepted sequence.
    AttemptsExhausted { attempts: u32 },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::Config(e) => write!(f, "invalid generator configuration: {e}"),
            GenerateError::AttemptsExhausted { attempts } => {
                write!(f, "no sequence accepted after {attempts} attempts")
            }
        }
    }
}

impl std::error::Error for GenerateError {}

impl From<ConfigError> for GenerateError {
    fn from(e: ConfigError) -> Self {
        GenerateError::Config(e)
    }
}
