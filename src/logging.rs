use log::info;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the logging system
/// This should be called once at application startup
pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .parse_default_env()
            .filter_module("r2d2", log::LevelFilter::Warn)
            .format_timestamp_secs()
            .init();

        info!("Logging system initialized");
    });
}
