// Nightingale Event-Vector Codec
//
// Converts streams of symbolic musical events (note on/off, control change,
// program change) into fixed-width normalized vectors for sequence modeling,
// and back again. This crate is the offline half of Nightingale: it ingests
// labeled MIDI files, encodes them into the 14-wide vector format, windows
// the resulting stream into training tuples, and persists the dataset.
//
// Architecture:
// - event.rs: ChannelEvent enum (the four supported message kinds, each
//   carrying only the attributes that kind actually has)
// - genre.rs: Genre tags and their 3-slot one-hot encoding
// - normalize.rs: per-field scaling to/from [0,1] and the FieldMaxima tables
// - codec.rs: EventCodec — 14-wide encode/decode plus the 11-wide
//   generation-step decode used by the online generator
// - window.rs: sliding-window transform into (context, next-kind,
//   next-params) training tuples, and JSON dataset persistence
// - dataset.rs: MIDI ingestion — label manifest, SMF parsing, batch encoding
//
// The online generation half lives in nightingale_gen, which consumes this
// crate's codec and event types.

pub mod codec;
pub mod dataset;
pub mod event;
pub mod genre;
pub mod normalize;
pub mod window;
