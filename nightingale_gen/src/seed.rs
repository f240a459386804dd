// Random seed sequences.
//
// Each generation attempt starts the context window from a short burst of
// random step vectors rather than real music: a random kind one-hot with
// random values in exactly the parameter slots that kind carries. Channel
// and time are present on every kind; the rest depend on the variant.

use nightingale_codec::codec::{KIND_WIDTH, STEP_WIDTH};
use nightingale_codec::event::EventKind;
use rand::Rng;

/// One random step vector: a uniformly chosen kind, with uniform [0,1)
/// draws in that kind's parameter slots and zeros elsewhere.
pub fn random_step_vector(rng: &mut impl Rng) -> [f32; STEP_WIDTH] {
    let kind = EventKind::ALL[rng.random_range(0..KIND_WIDTH)];
    let mut vector = [0.0f32; STEP_WIDTH];
    vector[kind.index()] = 1.0;

    // channel slot
    vector[KIND_WIDTH] = rng.random();
    match kind {
        EventKind::NoteOn | EventKind::NoteOff => {
            vector[KIND_WIDTH + 1] = rng.random(); // note
            vector[KIND_WIDTH + 2] = rng.random(); // velocity
        }
        EventKind::ControlChange => {
            vector[KIND_WIDTH + 3] = rng.random(); // control
            vector[KIND_WIDTH + 4] = rng.random(); // value
        }
        EventKind::ProgramChange => {
            vector[KIND_WIDTH + 5] = rng.random(); // program
        }
    }
    // time slot
    vector[KIND_WIDTH + 6] = rng.random();
    vector
}

/// A seed of `length` random step vectors.
pub fn random_seed_sequence(length: usize, rng: &mut impl Rng) -> Vec<[f32; STEP_WIDTH]> {
    (0..length).map(|_| random_step_vector(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn kind_slots_are_exactly_one_hot() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            let vector = random_step_vector(&mut rng);
            let ones = vector[..KIND_WIDTH].iter().filter(|&&v| v == 1.0).count();
            let zeros = vector[..KIND_WIDTH].iter().filter(|&&v| v == 0.0).count();
            assert_eq!(ones, 1);
            assert_eq!(zeros, KIND_WIDTH - 1);
        }
    }

    #[test]
    fn only_the_variant_slots_are_populated() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..200 {
            let vector = random_step_vector(&mut rng);
            let kind = EventKind::ALL
                [vector[..KIND_WIDTH].iter().position(|&v| v == 1.0).unwrap()];
            // Slots for note, velocity, control, value, program.
            let (note, velocity) = (vector[KIND_WIDTH + 1], vector[KIND_WIDTH + 2]);
            let (control, value) = (vector[KIND_WIDTH + 3], vector[KIND_WIDTH + 4]);
            let program = vector[KIND_WIDTH + 5];
            match kind {
                EventKind::NoteOn | EventKind::NoteOff => {
                    assert_eq!(control, 0.0);
                    assert_eq!(value, 0.0);
                    assert_eq!(program, 0.0);
                }
                EventKind::ControlChange => {
                    assert_eq!(note, 0.0);
                    assert_eq!(velocity, 0.0);
                    assert_eq!(program, 0.0);
                }
                EventKind::ProgramChange => {
                    assert_eq!(note, 0.0);
                    assert_eq!(velocity, 0.0);
                    assert_eq!(control, 0.0);
                    assert_eq!(value, 0.0);
                }
            }
        }
    }

    #[test]
    fn sequences_have_the_requested_length() {
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(random_seed_sequence(0, &mut rng).len(), 0);
        assert_eq!(random_seed_sequence(39, &mut rng).len(), 39);
    }

    #[test]
    fn seeded_sequences_are_reproducible() {
        let a = random_seed_sequence(10, &mut StdRng::seed_from_u64(77));
        let b = random_seed_sequence(10, &mut StdRng::seed_from_u64(77));
        assert_eq!(a, b);
    }
}
