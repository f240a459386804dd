// Nightingale Sequence Generator
//
// The online half of Nightingale: drives an external probability model to
// extend a vector sequence one event at a time, decodes the result into
// symbolic events, and gates the output on a minimum note ratio before
// accepting it.
//
// Architecture:
// - hyperparams.rs: per-genre temperature/noise tables and the
//   diversity-driven operating-point selection
// - predictor.rs: the black-box model interface, plus a table-driven
//   fallback predictor for use before a trained model is wired in
// - sampler.rs: temperature-scaled kind sampling and Gaussian parameter
//   noise
// - context.rs: the fixed-length rolling window of step vectors fed to
//   the predictor
// - seed.rs: random seed sequences that bootstrap each generation attempt
// - controller.rs: the generation loop and its acceptance/retry policy
// - midi.rs: writing accepted sequences to Standard MIDI Files
//
// The generator is deterministic given a seeded RNG, supporting
// reproducible output.

pub mod context;
pub mod controller;
pub mod hyperparams;
pub mod midi;
pub mod predictor;
pub mod sampler;
pub mod seed;
