// MIDI ingestion: from labeled Standard MIDI Files to a flat vector stream.
//
// The label manifest is a JSON document pairing each MIDI filename with a
// genre label. Each file is parsed with `midly`, its tracks walked in
// order, and only the four supported channel-message kinds are kept — the
// pre-filter that guarantees the codec is never asked to encode an
// unsupported kind. Bad or missing files are reported back to the caller
// and skipped; one broken download should not sink a whole batch.

use crate::codec::{EventCodec, VECTOR_WIDTH};
use crate::event::ChannelEvent;
use crate::genre::Genre;
use midly::{MidiMessage, Smf, TrackEventKind, num::u4};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

/// One labeled source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    pub filename: String,
    pub genre: String,
}

/// The dataset's label manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelManifest {
    pub entries: Vec<LabelEntry>,
}

impl LabelManifest {
    /// Load from a JSON file.
    pub fn load(path: &Path) -> Result<LabelManifest, Box<dyn Error>> {
        let data = std::fs::read_to_string(path)?;
        let manifest: LabelManifest = serde_json::from_str(&data)?;
        Ok(manifest)
    }
}

/// Convert one parsed channel message, or None for unsupported kinds.
///
/// Deltas wider than 16 bits are clamped; the codec clamps again against
/// its own time maximum on encode.
pub fn event_from_midi(channel: u4, message: MidiMessage, delta: u32) -> Option<ChannelEvent> {
    let channel = channel.as_int();
    let time = delta.min(u16::MAX as u32) as u16;
    match message {
        MidiMessage::NoteOn { key, vel } => Some(ChannelEvent::NoteOn {
            channel,
            note: key.as_int(),
            velocity: vel.as_int(),
            time,
        }),
        MidiMessage::NoteOff { key, vel } => Some(ChannelEvent::NoteOff {
            channel,
            note: key.as_int(),
            velocity: vel.as_int(),
            time,
        }),
        MidiMessage::Controller { controller, value } => Some(ChannelEvent::ControlChange {
            channel,
            control: controller.as_int(),
            value: value.as_int(),
            time,
        }),
        MidiMessage::ProgramChange { program } => Some(ChannelEvent::ProgramChange {
            channel,
            program: program.as_int(),
            time,
        }),
        _ => None,
    }
}

/// Extract all supported events from a parsed file, tracks in file order.
pub fn events_from_smf(smf: &Smf) -> Vec<ChannelEvent> {
    let mut events = Vec::new();
    for track in &smf.tracks {
        for track_event in track {
            if let TrackEventKind::Midi { channel, message } = track_event.kind {
                if let Some(event) =
                    event_from_midi(channel, message, track_event.delta.as_int())
                {
                    events.push(event);
                }
            }
        }
    }
    events
}

/// Parse and encode one MIDI file into dataset vectors.
pub fn encode_midi_file(
    codec: &EventCodec,
    path: &Path,
    genre: Genre,
) -> Result<Vec<[f32; VECTOR_WIDTH]>, Box<dyn Error>> {
    let bytes = std::fs::read(path)?;
    let smf = Smf::parse(&bytes)?;
    Ok(events_from_smf(&smf)
        .iter()
        .map(|event| codec.encode(event, genre))
        .collect())
}
