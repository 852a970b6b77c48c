use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random source driving a simulation. Its state is serialisable, so
/// checkpoints resume the exact same stream.
pub type SimRng = ChaCha8Rng;

/// Create a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> SimRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Standard normal sample via the Box-Muller transform.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(f64::EPSILON);
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Normal sample around `mean`. A zero std returns `mean` untouched and
/// consumes no randomness.
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, std: f64) -> f64 {
    if std == 0.0 {
        mean
    } else {
        mean + std * standard_normal(rng)
    }
}
