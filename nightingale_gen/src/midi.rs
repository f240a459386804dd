// MIDI output for accepted sequences.
//
// Writes a single-track Standard MIDI File: a preamble assigning the
// chosen instrument program to each playback channel, then the generated
// events with their delta times. Timing is metrical at 1000 ticks per
// beat, matching the resolution the training corpus was prepared at.
//
// Uses the `midly` crate for MIDI writing.

use midly::{
    Format, Header, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u28},
};
use nightingale_codec::event::ChannelEvent;
use std::error::Error;
use std::fmt::Write as _;
use std::path::Path;

/// Ticks per quarter note in generated output.
const TICKS_PER_BEAT: u16 = 1000;

/// Channels covered by the program-assignment preamble.
const PREAMBLE_CHANNELS: u8 = 15;

/// Write a generated sequence to a MIDI file.
pub fn write_midi(
    events: &[ChannelEvent],
    path: &Path,
    instrument: u8,
) -> Result<(), Box<dyn Error>> {
    let smf = events_to_smf(events, instrument);
    let mut buf = Vec::new();
    smf.write(&mut buf)?;
    std::fs::write(path, &buf)?;
    Ok(())
}

/// Write the sequence as one display line per event, for inspection.
pub fn write_text_dump(events: &[ChannelEvent], path: &Path) -> Result<(), Box<dyn Error>> {
    let mut text = String::new();
    for event in events {
        let _ = writeln!(text, "{event}");
    }
    std::fs::write(path, text)?;
    Ok(())
}

/// Build the in-memory SMF for a generated sequence.
pub fn events_to_smf(events: &[ChannelEvent], instrument: u8) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_BEAT)),
    ));

    let mut track: Track<'static> = Vec::new();

    // Program preamble so every channel plays the chosen instrument.
    for channel in 0..PREAMBLE_CHANNELS {
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel: u4::new(channel),
                message: MidiMessage::ProgramChange {
                    program: u7::new(instrument.min(127)),
                },
            },
        });
    }

    for event in events {
        track.push(to_track_event(event));
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
    });

    smf.tracks.push(track);
    smf
}

fn to_track_event(event: &ChannelEvent) -> TrackEvent<'static> {
    let delta = u28::new(event.time() as u32);
    let channel = u4::new(event.channel().min(15));
    let message = match *event {
        ChannelEvent::NoteOn { note, velocity, .. } => MidiMessage::NoteOn {
            key: u7::new(note.min(127)),
            vel: u7::new(velocity.min(127)),
        },
        ChannelEvent::NoteOff { note, velocity, .. } => MidiMessage::NoteOff {
            key: u7::new(note.min(127)),
            vel: u7::new(velocity.min(127)),
        },
        ChannelEvent::ControlChange { control, value, .. } => MidiMessage::Controller {
            controller: u7::new(control.min(127)),
            value: u7::new(value.min(127)),
        },
        ChannelEvent::ProgramChange { program, .. } => MidiMessage::ProgramChange {
            program: u7::new(program.min(127)),
        },
    };
    TrackEvent { delta, kind: TrackEventKind::Midi { channel, message } }
}
