use clap::Parser;
use rdev::Key;
use std::time::Duration;

use crate::error::{ClickerError, Result};
use crate::hotkeys::Bindings;
use crate::keys::parse_key;

pub const MIN_INTERVAL_SECS: f64 = 0.1;
pub const MAX_INTERVAL_SECS: f64 = 10.0;

/// Simulate left clicks at a fixed interval, driven by global hotkeys.
#[derive(Parser, Debug, Clone)]
#[command(name = "auto_clicker", version, about)]
pub struct Args {
    /// Seconds between clicks (0.1 to 10.0)
    #[arg(short, long, default_value_t = 0.1)]
    pub interval: f64,

    /// Initial number of clicks for a bounded session
    #[arg(short, long, default_value_t = 10)]
    pub clicks: u64,

    /// Key that starts and stops clicking
    #[arg(long, default_value = "F6")]
    pub start_key: String,

    /// Key that quits the application
    #[arg(long, default_value = "F5")]
    pub quit_key: String,

    /// Key that starts a bounded click session
    #[arg(long, default_value = "F7")]
    pub set_clicks_key: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub interval: Duration,
    pub click_target: u64,
    pub bindings: Bindings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs_f64(MIN_INTERVAL_SECS),
            click_target: 10,
            bindings: Bindings { start_stop: Key::F6, quit: Key::F5, set_clicks: Key::F7 },
        }
    }
}

impl TryFrom<Args> for Config {
    type Error = ClickerError;

    fn try_from(args: Args) -> Result<Self> {
        if !(MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&args.interval) {
            return Err(ClickerError::IntervalOutOfRange(args.interval));
        }
        if args.clicks == 0 {
            return Err(ClickerError::ZeroClickTarget);
        }
        Ok(Self {
            interval: Duration::from_secs_f64(args.interval),
            click_target: args.clicks,
            bindings: Bindings {
                start_stop: parse_key(&args.start_key)?,
                quit: parse_key(&args.quit_key)?,
                set_clicks: parse_key(&args.set_clicks_key)?,
            },
        })
    }
}

/// Clamps a user-entered interval into the accepted range.
pub fn clamp_interval(secs: f64) -> Duration {
    let secs = if secs.is_nan() { MIN_INTERVAL_SECS } else { secs };
    Duration::from_secs_f64(secs.clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS))
}
