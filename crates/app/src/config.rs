//! Application configuration.
//!
//! All values are compiled-in defaults; there is no config file and no
//! environment override.

use std::time::Duration;

/// Window and interaction settings for the pdf2clip window.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Window title (also used as the eframe app id)
    pub window_title: String,
    /// Fixed inner window size in points
    pub window_size: [f32; 2],
    /// How long the copy button reads "copied!" after a successful copy
    pub flash_duration: Duration,
    /// Hover delay before the last-copied tooltip appears
    pub tooltip_delay: Duration,
    /// Wrap width for the chosen file path label
    pub path_wrap_width: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: "pdf2clip".to_string(),
            window_size: [400.0, 190.0],
            flash_duration: Duration::from_millis(1500),
            tooltip_delay: Duration::from_millis(200),
            path_wrap_width: 380.0,
        }
    }
}
