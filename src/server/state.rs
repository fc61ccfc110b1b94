use std::sync::Arc;

use crate::config::Config;
use crate::core::tracker::TrackerOptions;
use crate::db::pool::SharedPool;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: the pool and the configuration sit behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub pool: SharedPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: SharedPool, config: Config) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }

    pub fn tracker_options(&self) -> TrackerOptions {
        TrackerOptions {
            clock: self.config.clock,
            duplicate_window_secs: self.config.duplicate_window_secs,
        }
    }

    pub fn code_prefix(&self) -> String {
        self.config.code_prefix.clone()
    }
}
