//! Logging initialization.
//!
//! The crate logs through the `log` facade; binaries and tests call
//! [`init`] once to get an `env_logger` backend honoring `RUST_LOG`.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize `env_logger` with an `info` default level. Safe to call more
/// than once; later calls are no-ops.
pub fn init() {
    INIT.call_once(|| {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .is_test(cfg!(test))
            .try_init()
            .ok();
    });
}
