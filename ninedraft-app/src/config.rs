//! The configuration for the demo driver, given from environment variables
//! and lazy initialized when needed.

use once_cell::race::OnceBox;
use std::env;


/// Return the world seed, if one is forced.
///
/// To force a seed, set `NINEDRAFT_SEED=<u64>`. Without it the world random
/// source is seeded from entropy.
pub fn seed() -> Option<u64> {
    static ENV: OnceBox<Option<u64>> = OnceBox::new();
    *ENV.get_or_init(|| {
        Box::new(env::var("NINEDRAFT_SEED").ok()
            .and_then(|s| s.parse().ok()))
    })
}

/// Return the number of steps the scripted demo runs for.
///
/// To change it from the default of 600, set `NINEDRAFT_STEPS=<u64>`.
pub fn steps() -> u64 {
    static ENV: OnceBox<u64> = OnceBox::new();
    *ENV.get_or_init(|| {
        Box::new(env::var("NINEDRAFT_STEPS").ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(600))
    })
}

/// Return the target delay between steps, in milliseconds.
///
/// To change it from the default of 15, set `NINEDRAFT_CADENCE_MS=<u64>`.
pub fn cadence_ms() -> u64 {
    static ENV: OnceBox<u64> = OnceBox::new();
    *ENV.get_or_init(|| {
        Box::new(env::var("NINEDRAFT_CADENCE_MS").ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(15))
    })
}
