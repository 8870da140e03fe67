use crossbeam_channel::Sender;
use eframe::egui;
use parking_lot::Mutex;
use rdev::{listen, Event, EventType, Key};
use std::{sync::Arc, thread};
use tracing::{debug, error, trace};

use crate::hotkeys::{HotkeyEvent, HotkeyHub};

/// Routes one OS key press through the hub and forwards whatever it produced.
/// Returns false once the receiving side is gone.
pub fn dispatch(hub: &Mutex<HotkeyHub>, tx: &Sender<HotkeyEvent>, key: Key) -> bool {
    let events = hub.lock().handle_press(key);
    for event in events {
        trace!(?event, "hotkey");
        if tx.send(event).is_err() {
            return false;
        }
    }
    true
}

/// Starts the system-wide keyboard hook on its own thread. The hook lives until the
/// process exits; each press also wakes the UI so it can react while unfocused.
pub fn spawn(hub: Arc<Mutex<HotkeyHub>>, tx: Sender<HotkeyEvent>, ctx: egui::Context) {
    thread::spawn(move || {
        debug!("global key listener starting");
        let result = listen(move |event: Event| {
            if let EventType::KeyPress(key) = event.event_type {
                if dispatch(&hub, &tx, key) {
                    ctx.request_repaint();
                }
            }
        });
        if let Err(err) = result {
            error!("global key listener failed: {:?}", err);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkeys::{Bindings, Trigger};

    fn hub() -> Mutex<HotkeyHub> {
        Mutex::new(HotkeyHub::new(Bindings { start_stop: Key::F6, quit: Key::F5, set_clicks: Key::F7 }))
    }

    #[test]
    fn test_dispatch_forwards_events() {
        let hub = hub();
        let (tx, rx) = crossbeam_channel::unbounded();

        assert!(dispatch(&hub, &tx, Key::F7));
        assert!(dispatch(&hub, &tx, Key::KeyZ));
        hub.lock().begin_capture(Trigger::Quit);
        assert!(dispatch(&hub, &tx, Key::Escape));

        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            got,
            vec![
                HotkeyEvent::Fired(Trigger::SetClicks),
                HotkeyEvent::Rebound { trigger: Trigger::Quit, key: Key::Escape },
            ]
        );
    }

    #[test]
    fn test_dispatch_reports_closed_channel() {
        let hub = hub();
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        assert!(!dispatch(&hub, &tx, Key::F6));
        // presses that produce nothing never touch the channel
        assert!(dispatch(&hub, &tx, Key::KeyZ));
    }
}
