//! Environment-variable tuning knobs.
//!
//! All env-var reads go through these helpers so the parsing rules live in
//! one place. Values are read once per process and cached.

use std::sync::OnceLock;

/// Parses the environment variable as a positive (> 0) integer.
#[inline]
fn env_var_positive_usize(var_name: &str) -> Option<usize> {
    std::env::var(var_name)
        .ok()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
}

/// Worker-count override from `NDCAST_WORKERS`, if set.
#[inline]
pub(crate) fn env_workers() -> Option<usize> {
    static VALUE: OnceLock<Option<usize>> = OnceLock::new();
    *VALUE.get_or_init(|| env_var_positive_usize("NDCAST_WORKERS"))
}

/// Parallelism threshold override from `NDCAST_MIN_PARALLEL_PIXELS`, if set.
#[inline]
pub(crate) fn env_min_parallel_pixels() -> Option<usize> {
    static VALUE: OnceLock<Option<usize>> = OnceLock::new();
    *VALUE.get_or_init(|| env_var_positive_usize("NDCAST_MIN_PARALLEL_PIXELS"))
}
