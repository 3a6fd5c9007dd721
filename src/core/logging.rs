//! Logging initialization

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// # Example
/// ```
/// weedfield::core::logging::init();
/// log::info!("Field ready");
/// ```
pub fn init() {
    // try_init so a second call (doctests, embedding apps) is harmless
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .format_timestamp_millis()
    .try_init();
}

/// Route log output through the test harness capture.
#[cfg(test)]
pub(crate) fn init_for_tests() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("debug")
    )
    .is_test(true)
    .try_init();
}
