use rdev::Key;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

use crate::keys::key_name;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Trigger { StartStop, Quit, SetClicks }

impl Trigger {
    pub const ALL: [Trigger; 3] = [Trigger::StartStop, Trigger::Quit, Trigger::SetClicks];

    pub fn label(self) -> &'static str {
        match self {
            Trigger::StartStop => "Start/Stop",
            Trigger::Quit => "Quit",
            Trigger::SetClicks => "Set Clicks",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

/// The key currently assigned to each trigger.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bindings {
    pub start_stop: Key,
    pub quit: Key,
    pub set_clicks: Key,
}

impl Bindings {
    pub fn get(&self, trigger: Trigger) -> Key {
        match trigger {
            Trigger::StartStop => self.start_stop,
            Trigger::Quit => self.quit,
            Trigger::SetClicks => self.set_clicks,
        }
    }

    pub fn set(&mut self, trigger: Trigger, key: Key) {
        match trigger {
            Trigger::StartStop => self.start_stop = key,
            Trigger::Quit => self.quit = key,
            Trigger::SetClicks => self.set_clicks = key,
        }
    }

    pub fn describe(&self) -> String {
        Trigger::ALL
            .iter()
            .map(|t| format!("{}: {}", t, key_name(self.get(*t))))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HotkeyId(u64);

/// Table of key press registrations, each with its own handle.
#[derive(Debug, Default)]
pub struct HotkeyRegistry {
    next_id: u64,
    entries: BTreeMap<HotkeyId, (Key, Trigger)>,
}

impl HotkeyRegistry {
    pub fn register(&mut self, key: Key, trigger: Trigger) -> HotkeyId {
        let id = HotkeyId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, (key, trigger));
        id
    }

    /// Unknown handles are ignored.
    pub fn remove(&mut self, id: HotkeyId) -> bool { self.entries.remove(&id).is_some() }

    pub fn triggers_for(&self, key: Key) -> Vec<Trigger> {
        self.entries.values().filter(|(k, _)| *k == key).map(|(_, t)| *t).collect()
    }

    pub fn len(&self) -> usize { self.entries.len() }
}

/// What a global key press turned into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HotkeyEvent {
    Fired(Trigger),
    Rebound { trigger: Trigger, key: Key },
}

/// Bindings, their live registrations and the pending capture slot, kept together so a
/// capture and the rebind it causes happen under one lock.
#[derive(Debug)]
pub struct HotkeyHub {
    bindings: Bindings,
    registry: HotkeyRegistry,
    handles: BTreeMap<Trigger, HotkeyId>,
    capture: Option<Trigger>,
}

impl HotkeyHub {
    pub fn new(bindings: Bindings) -> Self {
        let mut hub = Self {
            bindings,
            registry: HotkeyRegistry::default(),
            handles: BTreeMap::new(),
            capture: None,
        };
        hub.rebind();
        hub
    }

    pub fn bindings(&self) -> Bindings { self.bindings }

    #[cfg(test)]
    pub fn registry(&self) -> &HotkeyRegistry { &self.registry }

    pub fn pending_capture(&self) -> Option<Trigger> { self.capture }

    /// Drops the registration of every trigger, then registers each one again from the
    /// current bindings.
    pub fn rebind(&mut self) {
        for trigger in Trigger::ALL {
            if let Some(id) = self.handles.remove(&trigger) {
                self.registry.remove(id);
            }
        }
        for trigger in Trigger::ALL {
            let id = self.registry.register(self.bindings.get(trigger), trigger);
            self.handles.insert(trigger, id);
        }
        debug!("{} hotkeys registered: {:?}", self.registry.len(), self.bindings);
    }

    /// Arms capture for `trigger`. A pending capture for another trigger is replaced.
    pub fn begin_capture(&mut self, trigger: Trigger) {
        if let Some(prev) = self.capture.replace(trigger) {
            debug!("capture for {prev} replaced by {trigger}");
        }
        info!("waiting for a key to bind to {trigger}");
    }

    /// Handles one global key press. While capturing, the press is consumed as the new
    /// binding and does not fire any trigger.
    pub fn handle_press(&mut self, key: Key) -> Vec<HotkeyEvent> {
        if let Some(trigger) = self.capture.take() {
            self.bindings.set(trigger, key);
            self.rebind();
            info!("{trigger} hotkey set to {}", key_name(key));
            return vec![HotkeyEvent::Rebound { trigger, key }];
        }
        self.registry.triggers_for(key).into_iter().map(HotkeyEvent::Fired).collect()
    }
}
