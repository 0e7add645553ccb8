//! Support for library configuration options

use std::sync::{Arc, Mutex};
use std::time::Duration;

use once_cell::sync::Lazy;

/// Base URL of the task backend API, used by [`Client::default_from_config`](crate::client::Client::default_from_config).
/// Feel free to override it when initing this library.
pub static API_BASE: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("http://localhost:8080/api".to_string())));

/// The `User-Agent` header sent with every request.
/// Feel free to override it when initing this library.
pub static USER_AGENT: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new(format!("tasktrack/{}", env!("CARGO_PKG_VERSION")))));

/// A task start or end is "now" when it is at most this many seconds away from the current time
pub const NOTIFICATION_WINDOW_SECS: i64 = 60;

/// How often the notification timer scans the tasks.
///
/// Any period up to [`NOTIFICATION_WINDOW_SECS`] guarantees every start and end is seen at least once.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(30);

/// How far ahead (in seconds) a task is still "starting soon"
pub const STARTING_SOON_HORIZON_SECS: i64 = 3600;

/// [`NOTIFICATION_WINDOW_SECS`] as a duration
pub fn notification_window() -> chrono::Duration {
    chrono::Duration::seconds(NOTIFICATION_WINDOW_SECS)
}

/// [`STARTING_SOON_HORIZON_SECS`] as a duration
pub fn starting_soon_horizon() -> chrono::Duration {
    chrono::Duration::seconds(STARTING_SOON_HORIZON_SECS)
}

/// Returns a copy of the current [`API_BASE`]
pub fn api_base() -> String {
    match API_BASE.lock() {
        Ok(base) => base.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Returns a copy of the current [`USER_AGENT`]
pub fn user_agent() -> String {
    match USER_AGENT.lock() {
        Ok(ua) => ua.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
