//! Shared test infrastructure.


/// Routes library logs to the test harness; filter with `RUST_LOG`.
///
/// Safe to call from every test: only the first call installs a subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
