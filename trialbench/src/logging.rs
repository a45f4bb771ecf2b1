//! Logging setup
//!
//! Library code only emits `tracing` events. Binaries and tests that want to
//! see them call [`init_logging`] once.

/// Install a `tracing_subscriber::fmt` subscriber filtered to trialbench
/// targets. Returns `false` if a global subscriber was already installed.
pub fn init_logging(verbose: bool) -> bool {
    let filter = if verbose {
        "trialbench=debug,trialbench_core=debug"
    } else {
        "trialbench=info,trialbench_core=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
