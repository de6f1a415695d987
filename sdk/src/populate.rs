//! Random instances for generated self-tests.

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

use rand::{distributions::Alphanumeric, rngs::StdRng, Rng, SeedableRng};

/// Nested records below this depth are left unset and arrays empty.
pub const MAX_DEPTH: usize = 3;

/// Set to reproduce a failing self-test with the seed it printed.
pub const SEED_VAR: &str = "BRINE_EQUAL_SEED";

/// Builds a random instance of a generated type.
pub trait Populate: Sized {
    fn populate<R: Rng>(rng: &mut R, depth: usize) -> Self;
}

/// A generator seeded from `BRINE_EQUAL_SEED` or the clock, and its seed.
pub fn seeded_rng() -> (u64, StdRng) {
    let seed = env::var(SEED_VAR)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_nanos() as u64)
                .unwrap_or_default()
        });
    (seed, StdRng::seed_from_u64(seed))
}

pub fn random_len<R: Rng>(rng: &mut R, depth: usize) -> usize {
    if depth >= MAX_DEPTH {
        0
    } else {
        rng.gen_range(0..4)
    }
}

/// Alphanumeric only; Kiwi strings cannot hold NUL.
pub fn random_string<R: Rng>(rng: &mut R) -> String {
    let len = rng.gen_range(0..12);
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

pub fn random_bytes<R: Rng>(rng: &mut R) -> Vec<u8> {
    let len = rng.gen_range(0..12);
    (0..len).map(|_| rng.gen::<u8>()).collect()
}

/// Multiples of 1/8, which the variable-length float encoding keeps exactly.
pub fn random_float<R: Rng>(rng: &mut R) -> f32 {
    rng.gen_range(-8000i32..8000) as f32 / 8.0
}
