use log::{debug, error, info, warn};

/// Initialize the logger, defaulting to `info` when RUST_LOG is unset
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Log an informational message
pub fn log_info(message: &str) {
    info!("{}", message);
}

/// Log a debug message
pub fn log_debug(message: &str) {
    debug!("{}", message);
}

/// Log a warning message
pub fn log_warning(message: &str) {
    warn!("{}", message);
}

/// Log an error message
pub fn log_error(message: &str) {
    error!("{}", message);
}

/// Log chain endpoint details
pub fn log_chain_connection_details(chain_id: &str, rpc_url: &str, rest_url: &str) {
    info!(
        "[{}] Chain endpoints: rpc={} rest={}",
        chain_id, rpc_url, rest_url
    );
}

/// Log database connection details without credentials
pub fn log_database_connection_details(url: &str) {
    let redacted = match url.split_once('@') {
        Some((_, host)) => format!("***@{}", host),
        None => url.to_string(),
    };
    info!("Database connection details: {}", redacted);
}
