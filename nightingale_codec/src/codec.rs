// The event-vector codec.
//
// Encoding lays an event out as a fixed 14-wide vector:
//
//   [genre one-hot (3) | kind one-hot (4) | channel, note, velocity,
//    control, value, program, time — each normalized to [0,1]]
//
// Fields a kind does not carry encode as zero. Decoding is the lossy
// inverse: the genre slice is ignored (genre is conditioning input, not
// event content), the kind is recovered by arg-max, and only the minimal
// attribute set for that kind is reconstructed — leftover slots are
// dropped. Arg-max rather than a strict one-hot check matters because
// decode also runs on model output, which is never exactly one-hot.
//
// The online generator works with 11-wide vectors (kind + params, no
// genre slice) and its own time maximum; `decode_step` handles those.

use crate::event::{ChannelEvent, EventKind};
use crate::genre::{GENRE_WIDTH, Genre};
use crate::normalize::{FieldMaxima, ZeroMaximumError, denormalize, normalize};
use std::fmt;

/// Number of slots in the kind one-hot.
pub const KIND_WIDTH: usize = 4;

/// Number of continuous parameter slots.
pub const PARAM_WIDTH: usize = 7;

/// Width of a full dataset vector: genre + kind + params.
pub const VECTOR_WIDTH: usize = GENRE_WIDTH + KIND_WIDTH + PARAM_WIDTH;

/// Width of a generation-step vector: kind + params, genre carried
/// externally.
pub const STEP_WIDTH: usize = KIND_WIDTH + PARAM_WIDTH;

/// Encoder/decoder bound to one pipeline's maxima table.
#[derive(Debug, Clone)]
pub struct EventCodec {
    maxima: FieldMaxima,
}

impl EventCodec {
    /// Codec for the offline dataset path (time normalized against 65536).
    pub fn dataset() -> EventCodec {
        EventCodec { maxima: FieldMaxima::dataset() }
    }

    /// Codec for the online generation path (time normalized against 65530).
    pub fn generation() -> EventCodec {
        EventCodec { maxima: FieldMaxima::generation() }
    }

    /// Codec over a custom maxima table, rejected if any maximum is zero.
    pub fn new(maxima: FieldMaxima) -> Result<EventCodec, ZeroMaximumError> {
        maxima.validate()?;
        Ok(EventCodec { maxima })
    }

    pub fn maxima(&self) -> &FieldMaxima {
        &self.maxima
    }

    /// Encode one event and its genre tag as a 14-wide vector.
    ///
    /// Attributes are clamped into [0, max] before normalizing, so an
    /// out-of-range attribute encodes identically to its clamped value.
    pub fn encode(&self, event: &ChannelEvent, genre: Genre) -> [f32; VECTOR_WIDTH] {
        let mut vector = [0.0f32; VECTOR_WIDTH];
        vector[..GENRE_WIDTH].copy_from_slice(&genre.one_hot());
        vector[GENRE_WIDTH + event.kind().index()] = 1.0;

        let raw = field_values(event);
        let maxima = self.maxima.as_array();
        for slot in 0..PARAM_WIDTH {
            let clamped = raw[slot].min(maxima[slot]);
            vector[GENRE_WIDTH + KIND_WIDTH + slot] = normalize(clamped, maxima[slot]);
        }
        vector
    }

    /// Decode a 14-wide dataset vector back into an event.
    ///
    /// The genre slice is not reconstructed. Fails only on width mismatch.
    pub fn decode(&self, vector: &[f32]) -> Result<ChannelEvent, DecodeError> {
        if vector.len() != VECTOR_WIDTH {
            return Err(DecodeError { expected: VECTOR_WIDTH, actual: vector.len() });
        }
        let kind_slice = &vector[GENRE_WIDTH..GENRE_WIDTH + KIND_WIDTH];
        let params = &vector[GENRE_WIDTH + KIND_WIDTH..];
        Ok(self.rebuild(kind_slice, params))
    }

    /// Decode an 11-wide generation-step vector (kind + params, no genre).
    pub fn decode_step(&self, vector: &[f32]) -> Result<ChannelEvent, DecodeError> {
        if vector.len() != STEP_WIDTH {
            return Err(DecodeError { expected: STEP_WIDTH, actual: vector.len() });
        }
        let kind_slice = &vector[..KIND_WIDTH];
        let params = &vector[KIND_WIDTH..];
        Ok(self.rebuild(kind_slice, params))
    }

    /// Build the minimal attribute set for the arg-max kind, dropping the
    /// parameter slots that kind does not carry.
    fn rebuild(&self, kind_slice: &[f32], params: &[f32]) -> ChannelEvent {
        let kind = EventKind::ALL[arg_max(kind_slice)];
        let m = &self.maxima;

        let channel = self.denorm_u8(params[0], m.channel);
        let time = self.denorm_time(params[6]);

        match kind {
            EventKind::NoteOn => ChannelEvent::NoteOn {
                channel,
                note: self.denorm_u8(params[1], m.note),
                velocity: self.denorm_u8(params[2], m.velocity),
                time,
            },
            EventKind::NoteOff => ChannelEvent::NoteOff {
                channel,
                note: self.denorm_u8(params[1], m.note),
                velocity: self.denorm_u8(params[2], m.velocity),
                time,
            },
            EventKind::ControlChange => ChannelEvent::ControlChange {
                channel,
                control: self.denorm_u8(params[3], m.control),
                value: self.denorm_u8(params[4], m.value),
                time,
            },
            EventKind::ProgramChange => ChannelEvent::ProgramChange {
                channel,
                program: self.denorm_u8(params[5], m.program),
                time,
            },
        }
    }

    // Denormalized attributes are capped at the field maximum so a junk
    // input vector cannot produce out-of-range MIDI values.
    fn denorm_u8(&self, value: f32, max: u32) -> u8 {
        denormalize(value, max).min(max).min(u8::MAX as u32) as u8
    }

    fn denorm_time(&self, value: f32) -> u16 {
        denormalize(value, self.maxima.time)
            .min(self.maxima.time)
            .min(u16::MAX as u32) as u16
    }
}

/// Index of the largest entry; ties break toward the lowest index.
fn arg_max(slice: &[f32]) -> usize {
    let mut best = 0;
    for (i, &value) in slice.iter().enumerate() {
        if value > slice[best] {
            best = i;
        }
    }
    best
}

/// A vector had the wrong width for the requested decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeError {
    pub expected: usize,
    pub actual: usize,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "event vector has width {}, expected {}",
            self.actual, self.expected
        )
    }
}

impl std::error::Error for DecodeError {}

/// The seven raw parameter values for an event, absent attributes as zero.
fn field_values(event: &ChannelEvent) -> [u32; PARAM_WIDTH] {
    match *event {
        ChannelEvent::NoteOn { channel, note, velocity, time }
        | ChannelEvent::NoteOff { channel, note, velocity, time } => [
            channel as u32,
            note as u32,
            velocity as u32,
            0,
            0,
            0,
            time as u32,
        ],
        ChannelEvent::ControlChange { channel, control, value, time } => [
            channel as u32,
            0,
            0,
            control as u32,
            value as u32,
            0,
            time as u32,
        ],
        ChannelEvent::ProgramChange { channel, program, time } => {
            [channel as u32, 0, 0, 0, 0, program as u32, time as u32]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_events() -> Vec<ChannelEvent> {
        vec![
            ChannelEvent::NoteOn { channel: 3, note: 60, velocity: 96, time: 480 },
            ChannelEvent::NoteOff { channel: 3, note: 60, velocity: 0, time: 240 },
            ChannelEvent::ControlChange { channel: 9, control: 64, value: 127, time: 0 },
            ChannelEvent::ProgramChange { channel: 15, program: 113, time: 65_000 },
        ]
    }

    #[test]
    fn encode_width_is_always_fourteen() {
        let codec = EventCodec::dataset();
        for event in sample_events() {
            assert_eq!(codec.encode(&event, Genre::Pop).len(), VECTOR_WIDTH);
        }
    }

    #[test]
    fn round_trip_recovers_kind_and_attributes() {
        let codec = EventCodec::dataset();
        for event in sample_events() {
            let decoded = codec.decode(&codec.encode(&event, Genre::Rock)).unwrap();
            assert_eq!(decoded.kind(), event.kind(), "kind changed for {event}");
            assert_attr_close(event.channel(), decoded.channel(), 1, "channel");
            assert_attr_close(event.time() as u32, decoded.time() as u32, 256, "time");
        }
    }

    #[test]
    fn round_trip_note_fields_within_one_unit() {
        let codec = EventCodec::dataset();
        let event = ChannelEvent::NoteOn { channel: 7, note: 72, velocity: 100, time: 1000 };
        match codec.decode(&codec.encode(&event, Genre::Country)).unwrap() {
            ChannelEvent::NoteOn { channel, note, velocity, time } => {
                assert_attr_close(7, channel, 1, "channel");
                assert_attr_close(72, note, 1, "note");
                assert_attr_close(100, velocity, 1, "velocity");
                assert_attr_close(1000u32, time as u32, 256, "time");
            }
            other => panic!("decoded to the wrong kind: {other}"),
        }
    }

    fn assert_attr_close<T: Into<u32>>(original: T, decoded: T, tolerance: u32, name: &str) {
        let (original, decoded) = (original.into(), decoded.into());
        let diff = original.abs_diff(decoded);
        assert!(
            diff <= tolerance,
            "{name}: |{original} - {decoded}| = {diff} exceeds {tolerance}"
        );
    }

    #[test]
    fn decode_rejects_wrong_widths() {
        let codec = EventCodec::dataset();
        for width in [0usize, 1, 13, 15, 20] {
            let vector = vec![0.5f32; width];
            let err = codec.decode(&vector).unwrap_err();
            assert_eq!(err.actual, width);
            assert_eq!(err.expected, VECTOR_WIDTH);
        }
    }

    #[test]
    fn decode_step_rejects_wrong_widths() {
        let codec = EventCodec::generation();
        for width in [0usize, 1, 10, 14, 20] {
            let vector = vec![0.5f32; width];
            assert!(codec.decode_step(&vector).is_err(), "width {width} accepted");
        }
        assert!(codec.decode_step(&vec![0.0f32; STEP_WIDTH]).is_ok());
    }

    #[test]
    fn out_of_range_attribute_encodes_as_clamped() {
        let codec = EventCodec::dataset();
        let wild = ChannelEvent::NoteOn { channel: 200, note: 60, velocity: 200, time: 0 };
        let tame = ChannelEvent::NoteOn { channel: 15, note: 60, velocity: 127, time: 0 };
        assert_eq!(codec.encode(&wild, Genre::Pop), codec.encode(&tame, Genre::Pop));
    }

    #[test]
    fn genre_slice_does_not_affect_decode() {
        let codec = EventCodec::dataset();
        let event = ChannelEvent::ControlChange { channel: 2, control: 7, value: 90, time: 5 };
        let mut pop = codec.encode(&event, Genre::Pop);
        let country = codec.encode(&event, Genre::Country);
        assert_eq!(codec.decode(&pop).unwrap(), codec.decode(&country).unwrap());

        // Even a garbage genre slice is ignored.
        pop[0] = 0.3;
        pop[1] = 0.9;
        pop[2] = 0.4;
        assert_eq!(codec.decode(&pop).unwrap(), event);
    }

    #[test]
    fn arg_max_ties_break_low() {
        assert_eq!(arg_max(&[0.5, 0.5, 0.5, 0.5]), 0);
        assert_eq!(arg_max(&[0.1, 0.9, 0.9, 0.1]), 1);
        assert_eq!(arg_max(&[0.0, 0.0, 0.0, 1.0]), 3);
    }

    #[test]
    fn non_one_hot_kind_slice_still_decodes() {
        // Model output is never exactly one-hot; arg-max must cope.
        let codec = EventCodec::generation();
        let mut vector = [0.05f32; STEP_WIDTH];
        vector[1] = 0.7; // note_off wins
        vector[KIND_WIDTH] = 0.5;
        let decoded = codec.decode_step(&vector).unwrap();
        assert_eq!(decoded.kind(), EventKind::NoteOff);
    }

    #[test]
    fn leftover_slots_are_dropped() {
        // A note_on vector with junk in the control/value/program slots
        // decodes to a note_on with only its own attributes.
        let codec = EventCodec::dataset();
        let event = ChannelEvent::NoteOn { channel: 1, note: 64, velocity: 80, time: 10 };
        let mut vector = codec.encode(&event, Genre::Pop);
        vector[GENRE_WIDTH + KIND_WIDTH + 3] = 0.8; // control slot
        vector[GENRE_WIDTH + KIND_WIDTH + 4] = 0.8; // value slot
        vector[GENRE_WIDTH + KIND_WIDTH + 5] = 0.8; // program slot
        let decoded = codec.decode(&vector).unwrap();
        assert_eq!(decoded.kind(), EventKind::NoteOn);
        assert_eq!(decoded, codec.decode(&codec.encode(&event, Genre::Pop)).unwrap());
    }

    #[test]
    fn custom_maxima_are_validated() {
        let mut maxima = FieldMaxima::dataset();
        maxima.time = 0;
        assert!(EventCodec::new(maxima).is_err());
        assert!(EventCodec::new(FieldMaxima::generation()).is_ok());
    }
}
