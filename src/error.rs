//! Error types for the auto clicker.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClickerError {
    /// A hotkey name that does not map to a known key.
    #[error("unknown key '{0}'")]
    UnknownKey(String),

    #[error("interval {0}s is outside {min}..={max} seconds", min = crate::config::MIN_INTERVAL_SECS, max = crate::config::MAX_INTERVAL_SECS)]
    IntervalOutOfRange(f64),

    #[error("click target must be greater than zero")]
    ZeroClickTarget,

    #[error("gui error: {0}")]
    Gui(#[from] eframe::Error),
}

pub type Result<T> = std::result::Result<T, ClickerError>;
