use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use parking_lot::Mutex;
use rdev::Key;
use std::{sync::Arc, time::Instant};
use tracing::info;

use crate::clicker::{ClickJob, ClickState, Clicker, EnigoClicker};
use crate::config::{clamp_interval, Config, MAX_INTERVAL_SECS, MIN_INTERVAL_SECS};
use crate::cps::CPS_REFRESH;
use crate::hotkeys::{HotkeyEvent, HotkeyHub, Trigger};
use crate::keys::key_name;
use crate::listener;

pub const WINDOW_SIZE: [f32; 2] = [320.0, 430.0];

pub fn toggle_label(active: bool, key: Key) -> String {
    format!("{} ({})", if active { "Stop" } else { "Start" }, key_name(key))
}

// -------------- UI State --------------
pub struct AutoClickerApp {
    pub(crate) state: Arc<ClickState>,
    pub(crate) hub: Arc<Mutex<HotkeyHub>>,
    events: Receiver<HotkeyEvent>,
    pub(crate) hotkey_tx: Sender<HotkeyEvent>,
    _job: ClickJob,

    pub(crate) interval_secs: f64,
    pub(crate) click_target_input: String,
    pub(crate) status: String,
    pub(crate) cps: usize,
    last_cps_refresh: Option<Instant>,
}

impl AutoClickerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let app = Self::build(config, EnigoClicker);
        listener::spawn(Arc::clone(&app.hub), app.hotkey_tx.clone(), cc.egui_ctx.clone());
        app
    }

    /// Wires state, hotkeys and the click loop without touching the OS key hook.
    pub(crate) fn build<C: Clicker + Send + 'static>(config: Config, clicker: C) -> Self {
        info!(interval = ?config.interval, clicks = config.click_target, bindings = ?config.bindings, "starting auto clicker");

        let state = Arc::new(ClickState::new(config.interval));
        let hub = Arc::new(Mutex::new(HotkeyHub::new(config.bindings)));
        let (hotkey_tx, events) = crossbeam_channel::unbounded();
        let job = ClickJob::spawn(Arc::clone(&state), clicker);

        Self {
            state,
            hub,
            events,
            hotkey_tx,
            _job: job,
            interval_secs: config.interval.as_secs_f64(),
            click_target_input: config.click_target.to_string(),
            status: String::new(),
            cps: 0,
            last_cps_refresh: None,
        }
    }

    /// Applies one hotkey event. Returns true when the app should quit.
    pub(crate) fn apply(&mut self, event: HotkeyEvent) -> bool {
        match event {
            HotkeyEvent::Fired(Trigger::StartStop) => { self.state.toggle(); }
            HotkeyEvent::Fired(Trigger::SetClicks) => { self.state.request_bounded(&self.click_target_input); }
            HotkeyEvent::Fired(Trigger::Quit) => return true,
            HotkeyEvent::Rebound { trigger, key } => {
                self.status = format!("Updated {trigger} hotkey to: {}", key_name(key));
            }
        }
        false
    }

    pub(crate) fn begin_capture(&mut self, trigger: Trigger) {
        self.hub.lock().begin_capture(trigger);
        self.status = format!("Press a key to set for {trigger}");
    }

    pub(crate) fn set_interval(&mut self, secs: f64) {
        let interval = clamp_interval(secs);
        self.interval_secs = interval.as_secs_f64();
        self.state.set_interval(interval);
    }

    /// Recomputes CPS at most once per refresh period.
    pub(crate) fn refresh_cps(&mut self, now: Instant) {
        let due = match self.last_cps_refresh {
            Some(last) => now.saturating_duration_since(last) >= CPS_REFRESH,
            None => true,
        };
        if due {
            self.cps = self.state.cps(now);
            self.last_cps_refresh = Some(now);
        }
    }

    /// Drains pending hotkey events. Returns true if one of them asked to quit.
    pub(crate) fn drain_events(&mut self) -> bool {
        let mut quit = false;
        while let Ok(event) = self.events.try_recv() {
            quit |= self.apply(event);
        }
        quit
    }
}

impl eframe::App for AutoClickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.drain_events() {
            info!("quit hotkey pressed");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        self.refresh_cps(Instant::now());

        let (bindings, pending) = {
            let hub = self.hub.lock();
            (hub.bindings(), hub.pending_capture())
        };
        let session = self.state.session();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.group(|ui| {
                ui.label("Click Interval (seconds)");
                let mut secs = self.interval_secs;
                let resp = ui.add(
                    egui::DragValue::new(&mut secs)
                        .speed(0.1)
                        .clamp_range(MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS)
                        .max_decimals(3),
                );
                if resp.changed() { self.set_interval(secs); }
            });

            ui.label(format!("Clicks: {}", self.state.total_clicks()));
            ui.label(format!("CPS: {}", self.cps));
            if let Some(left) = session.remaining {
                ui.label(format!("Remaining: {left}"));
            }

            if ui.button(toggle_label(session.active, bindings.start_stop)).clicked() {
                self.state.toggle();
            }

            ui.separator();

            ui.group(|ui| {
                ui.label("Click Set Options");
                ui.horizontal(|ui| {
                    ui.label("Number of Clicks:");
                    ui.text_edit_singleline(&mut self.click_target_input);
                });
                if ui.button("Click Set").clicked() {
                    self.state.request_bounded(&self.click_target_input);
                }
            });

            ui.group(|ui| {
                ui.label("Current Hotkeys");
                ui.monospace(bindings.describe());
            });

            ui.group(|ui| {
                ui.label("Change Hotkeys (click a button, then press a key)");
                for trigger in Trigger::ALL {
                    let text = if pending == Some(trigger) {
                        format!("{trigger}: press a key...")
                    } else {
                        format!("{}: {}", trigger, key_name(bindings.get(trigger)))
                    };
                    if ui.button(text).clicked() { self.begin_capture(trigger); }
                }
            });

            if !self.status.is_empty() {
                ui.separator();
                ui.label(self.status.as_str());
            }
        });

        ctx.request_repaint_after(CPS_REFRESH);
    }
}
