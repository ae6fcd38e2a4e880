//! `tracing_subscriber` wiring, matching this crate family's other binaries
//! (§4.9): `RUST_LOG` drives an `EnvFilter`, with `-v`/`--verbose` raising
//! the default floor.

use tracing_subscriber::EnvFilter;

/// `verbosity` is the repeat count of `-v` (0 = default `warn`, 1 = `info`,
/// 2 = `debug`, 3+ = `trace`). `RUST_LOG`, if set, always wins.
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wisp_core={default_level},wisp_repl={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
