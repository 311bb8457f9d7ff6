use rand::rngs::{OsRng, SmallRng, StdRng};
use rand::{RngCore, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Shuffle source for live play: a CSPRNG seeded from the OS, or a small
/// time-seeded generator when the OS source is unavailable.
pub fn default_source() -> Box<dyn RngCore> {
    match StdRng::from_rng(OsRng) {
        Ok(rng) => Box::new(rng),
        Err(err) => {
            warn!(
                target: "trix_core::random",
                error = %err,
                "OS entropy unavailable, falling back to time-seeded generator"
            );
            Box::new(SmallRng::seed_from_u64(fallback_seed()))
        }
    }
}

/// Deterministic source for tests and replays.
pub fn seeded_source(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn fallback_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0x7EA5_u64)
}
