// Temperature-scaled kind sampling and parameter noise.
//
// Kind sampling: scores are clipped into [1e-8, 1], log-scaled by the
// temperature, soft-maxed, and sampled by cumulative weight. Temperature
// near zero sharpens the draw toward the arg-max; large temperatures
// flatten it toward uniform. The largest scaled score is subtracted
// before exponentiating so extreme temperatures cannot underflow the
// whole distribution to zero.
//
// Parameter noise: independent zero-mean Gaussian jitter on each of the
// seven continuous parameters, clamped back into [0,1]. Without it a
// confident model reproduces its favorite loop forever.

use nightingale_codec::codec::KIND_WIDTH;
use nightingale_codec::event::EventKind;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Floor applied to scores before the log; keeps zeros finite.
const SCORE_FLOOR: f64 = 1e-8;

/// The temperature-scaled categorical distribution over event kinds.
pub fn temperature_distribution(
    scores: &[f32; KIND_WIDTH],
    temperature: f64,
) -> [f64; KIND_WIDTH] {
    let mut scaled = [0.0f64; KIND_WIDTH];
    for (slot, &score) in scaled.iter_mut().zip(scores) {
        *slot = (score as f64).clamp(SCORE_FLOOR, 1.0).ln() / temperature;
    }

    let peak = scaled.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mut weights = [0.0f64; KIND_WIDTH];
    for (weight, &value) in weights.iter_mut().zip(&scaled) {
        *weight = (value - peak).exp();
    }
    let total: f64 = weights.iter().sum();
    for weight in &mut weights {
        *weight /= total;
    }
    weights
}

/// Draw an event kind from the temperature-scaled distribution.
pub fn sample_kind(
    scores: &[f32; KIND_WIDTH],
    temperature: f64,
    rng: &mut impl Rng,
) -> EventKind {
    let probs = temperature_distribution(scores, temperature);
    let target: f64 = rng.random();
    let mut cumulative = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        cumulative += p;
        if cumulative > target {
            return EventKind::ALL[i];
        }
    }
    // Cumulative round-off can leave the last sliver uncovered.
    EventKind::ALL[KIND_WIDTH - 1]
}

/// Jitter each parameter with the given Gaussian and clamp into [0,1].
pub fn perturb_params<const N: usize>(
    params: [f32; N],
    noise: &Normal<f64>,
    rng: &mut impl Rng,
) -> [f32; N] {
    let mut out = params;
    for value in &mut out {
        let jittered = *value as f64 + noise.sample(rng);
        *value = jittered.clamp(0.0, 1.0) as f32;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn distribution_sums_to_one() {
        for temperature in [0.01, 0.5, 1.0, 2.0, 100.0] {
            let probs = temperature_distribution(&[0.7, 0.1, 0.1, 0.1], temperature);
            let total: f64 = probs.iter().sum();
            assert!((total - 1.0).abs() < 1e-9, "T={temperature}: total={total}");
        }
    }

    #[test]
    fn low_temperature_converges_to_arg_max() {
        let scores = [0.7f32, 0.1, 0.1, 0.1];
        let mut rng = StdRng::seed_from_u64(99);
        let mut hits = 0;
        for _ in 0..1000 {
            if sample_kind(&scores, 0.01, &mut rng) == EventKind::NoteOn {
                hits += 1;
            }
        }
        assert!(hits >= 990, "expected near-deterministic arg-max, got {hits}/1000");
    }

    #[test]
    fn high_temperature_spreads_across_kinds() {
        let scores = [0.7f32, 0.1, 0.1, 0.1];
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = [0u32; KIND_WIDTH];
        for _ in 0..1000 {
            seen[sample_kind(&scores, 100.0, &mut rng).index()] += 1;
        }
        for (kind, &count) in EventKind::ALL.iter().zip(&seen) {
            assert!(count > 0, "{} never sampled at high temperature", kind.label());
        }
    }

    #[test]
    fn zero_scores_do_not_break_the_draw() {
        let probs = temperature_distribution(&[0.0, 0.0, 0.0, 0.0], 1.0);
        for p in probs {
            assert!((p - 0.25).abs() < 1e-9, "flat scores should sample uniformly");
        }
    }

    #[test]
    fn perturbed_params_stay_in_unit_range() {
        let noise = Normal::new(0.0, 0.5).unwrap();
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..200 {
            let out = perturb_params([0.0f32, 0.2, 0.4, 0.6, 0.8, 1.0, 0.5], &noise, &mut rng);
            for value in out {
                assert!((0.0..=1.0).contains(&value), "param escaped range: {value}");
            }
        }
    }

    #[test]
    fn zero_noise_is_identity() {
        let noise = Normal::new(0.0, 0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let params = [0.1f32, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7];
        assert_eq!(perturb_params(params, &noise, &mut rng), params);
    }
}
