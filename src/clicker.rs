use enigo::{self, MouseButton, MouseControllable};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::{num::IntErrorKind, sync::{atomic::{AtomicBool, AtomicU64, Ordering}, Arc}, thread, time::{Duration, Instant}};
use tracing::{debug, info};

use crate::cps::CpsWindow;

pub const IDLE_POLL: Duration = Duration::from_millis(100);
const SLEEP_SLICE: Duration = Duration::from_millis(50);

// -------------- Input Simulator --------------
pub trait Clicker {
    /// Presses and releases the primary button wherever the cursor is.
    fn click(&mut self);
}

static ENIGO: Lazy<Mutex<enigo::Enigo>> = Lazy::new(|| Mutex::new(enigo::Enigo::new()));

#[derive(Clone, Copy, Debug, Default)]
pub struct EnigoClicker;

impl Clicker for EnigoClicker {
    fn click(&mut self) { ENIGO.lock().mouse_click(MouseButton::Left); }
}

// -------------- Shared State --------------
/// Active flag and bounded countdown. Kept under one lock so a countdown never
/// survives `active == false`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub active: bool,
    pub remaining: Option<u64>,
}

#[derive(Debug)]
pub struct ClickState {
    session: Mutex<Session>,
    total: AtomicU64,
    interval: Mutex<Duration>,
    recent: Mutex<CpsWindow>,
}

impl ClickState {
    pub fn new(interval: Duration) -> Self {
        Self {
            session: Mutex::new(Session::default()),
            total: AtomicU64::new(0),
            interval: Mutex::new(interval),
            recent: Mutex::new(CpsWindow::new()),
        }
    }

    pub fn session(&self) -> Session { *self.session.lock() }

    pub fn total_clicks(&self) -> u64 { self.total.load(Ordering::Relaxed) }

    pub fn interval(&self) -> Duration { *self.interval.lock() }

    pub fn set_interval(&self, interval: Duration) { *self.interval.lock() = interval; }

    /// Flips the active flag. Turning it off cancels any bounded session.
    pub fn toggle(&self) -> bool {
        let mut s = self.session.lock();
        s.active = !s.active;
        if !s.active {
            s.remaining = None;
        }
        info!(active = s.active, "clicking toggled");
        s.active
    }

    /// Starts a bounded session from user input. Anything that is not a positive integer
    /// leaves the state untouched.
    pub fn request_bounded(&self, input: &str) -> bool {
        let Some(target) = parse_click_target(input) else {
            debug!(input, "ignoring bounded click request");
            return false;
        };
        let mut s = self.session.lock();
        s.remaining = Some(target);
        s.active = true;
        info!(clicks = target, "bounded click session started");
        true
    }

    pub fn cps(&self, now: Instant) -> usize { self.recent.lock().cps(now) }

    /// One pass of the click loop. Returns how long to sleep before the next pass.
    /// The session lock is released while the OS click is injected.
    pub fn tick(&self, clicker: &mut impl Clicker, now: Instant) -> Duration {
        if !self.session.lock().active {
            return IDLE_POLL;
        }

        clicker.click();
        self.recent.lock().record(now);
        self.total.fetch_add(1, Ordering::Relaxed);

        let mut s = self.session.lock();
        // a toggle during the click already cleared the countdown
        if s.active {
            if let Some(left) = s.remaining {
                let left = left.saturating_sub(1);
                if left == 0 {
                    s.active = false;
                    s.remaining = None;
                    info!(total = self.total_clicks(), "bounded click session finished");
                } else {
                    s.remaining = Some(left);
                }
            }
        }
        drop(s);

        self.interval()
    }
}

/// Parses the bounded click target. Only strictly positive integers are accepted;
/// targets too large for `u64` saturate.
pub fn parse_click_target(input: &str) -> Option<u64> {
    match input.trim().parse::<u64>() {
        Ok(0) => None,
        Ok(n) => Some(n),
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => Some(u64::MAX),
        Err(_) => None,
    }
}

// -------------- Click Loop --------------
pub struct ClickJob {
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ClickJob {
    pub fn spawn<C: Clicker + Send + 'static>(state: Arc<ClickState>, mut clicker: C) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = Arc::clone(&running);

        debug!(interval = ?state.interval(), "starting click loop");

        let handle = thread::spawn(move || {
            while running_clone.load(Ordering::Relaxed) {
                let pause = state.tick(&mut clicker, Instant::now());

                let mut left = pause;
                while left > Duration::ZERO && running_clone.load(Ordering::Relaxed) {
                    let slice = left.min(SLEEP_SLICE);
                    thread::sleep(slice);
                    left -= slice;
                }
            }
        });

        Self { running, handle: Some(handle) }
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ClickJob {
    fn drop(&mut self) { self.stop(); }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Counts clicks instead of touching the OS.
    #[derive(Clone, Default)]
    pub(crate) struct CountingClicker(pub Arc<AtomicU64>);

    impl Clicker for CountingClicker {
        fn click(&mut self) { self.0.fetch_add(1, Ordering::Relaxed); }
    }

    #[test]
    fn test_parse_click_target() {
        assert_eq!(parse_click_target("10"), Some(10));
        assert_eq!(parse_click_target(" 3 "), Some(3));
        assert_eq!(parse_click_target("0"), None);
        assert_eq!(parse_click_target("-4"), None);
        assert_eq!(parse_click_target("2.5"), None);
        assert_eq!(parse_click_target("ten"), None);
        assert_eq!(parse_click_target(""), None);
        assert_eq!(parse_click_target("4294967296"), Some(4_294_967_296));
        assert_eq!(parse_click_target("99999999999999999999999"), Some(u64::MAX));
        assert_eq!(parse_click_target("-99999999999999999999999"), None);
    }

    #[test]
    fn test_large_bounded_request_starts_session() {
        let state = ClickState::new(Duration::from_millis(100));
        assert!(state.request_bounded("4294967296"));
        assert_eq!(state.session(), Session { active: true, remaining: Some(4_294_967_296) });
    }

    /// Flips the session off from inside the click, as a UI toggle racing the loop would.
    struct TogglingClicker(Arc<ClickState>);

    impl Clicker for TogglingClicker {
        fn click(&mut self) { self.0.toggle(); }
    }

    #[test]
    fn test_toggle_during_click_does_not_block() {
        let state = Arc::new(ClickState::new(Duration::from_millis(100)));
        let mut clicker = TogglingClicker(Arc::clone(&state));
        assert!(state.request_bounded("5"));

        // with the session lock held across the click this would deadlock
        assert_eq!(state.tick(&mut clicker, Instant::now()), Duration::from_millis(100));
        assert_eq!(state.total_clicks(), 1);
        assert_eq!(state.session(), Session::default());
    }

    #[test]
    fn test_invalid_bounded_request_changes_nothing() {
        let state = ClickState::new(Duration::from_millis(100));
        for input in ["0", "-1", "abc", ""] {
            assert!(!state.request_bounded(input));
            assert_eq!(state.session(), Session::default());
        }

        state.toggle();
        assert!(!state.request_bounded("nope"));
        assert_eq!(state.session(), Session { active: true, remaining: None });
    }

    #[test]
    fn test_idle_tick_does_not_click() {
        let state = ClickState::new(Duration::from_millis(250));
        let mut clicker = CountingClicker::default();
        assert_eq!(state.tick(&mut clicker, Instant::now()), IDLE_POLL);
        assert_eq!(clicker.0.load(Ordering::Relaxed), 0);
        assert_eq!(state.total_clicks(), 0);
    }

    #[test]
    fn test_active_tick_clicks_and_sleeps_interval() {
        let state = ClickState::new(Duration::from_millis(250));
        let mut clicker = CountingClicker::default();
        state.toggle();
        let now = Instant::now();
        assert_eq!(state.tick(&mut clicker, now), Duration::from_millis(250));
        assert_eq!(clicker.0.load(Ordering::Relaxed), 1);
        assert_eq!(state.total_clicks(), 1);
        assert_eq!(state.cps(now), 1);
        assert!(state.session().active);
    }

    #[test]
    fn test_bounded_session_stops_after_target() {
        let state = ClickState::new(Duration::from_millis(100));
        let mut clicker = CountingClicker::default();
        assert!(state.request_bounded("4"));

        let now = Instant::now();
        for _ in 0..10 {
            state.tick(&mut clicker, now);
        }
        assert_eq!(clicker.0.load(Ordering::Relaxed), 4);
        assert_eq!(state.session(), Session::default());
    }

    #[test]
    fn test_toggle_off_cancels_bounded_session() {
        let state = ClickState::new(Duration::from_millis(100));
        let mut clicker = CountingClicker::default();
        state.request_bounded("5");
        state.tick(&mut clicker, Instant::now());
        assert_eq!(state.session().remaining, Some(4));

        assert!(!state.toggle());
        assert_eq!(state.session(), Session { active: false, remaining: None });

        // turning it back on is unbounded
        assert!(state.toggle());
        assert_eq!(state.session().remaining, None);
    }

    #[test]
    fn test_job_stop() {
        let state = Arc::new(ClickState::new(Duration::from_millis(100)));
        let mut job = ClickJob::spawn(Arc::clone(&state), CountingClicker::default());
        assert!(job.running.load(Ordering::Relaxed));
        job.stop();
        assert!(!job.running.load(Ordering::Relaxed));
        assert!(job.handle.is_none());

        // the loop is gone, so toggling on no longer produces clicks
        state.toggle();
        std::thread::sleep(Duration::from_millis(150));
        assert_eq!(state.total_clicks(), 0);
    }
}
