use rdev::Key;

use crate::error::{ClickerError, Result};

// Display name <-> key. First match wins when formatting, so canonical names go first.
const NAMED_KEYS: &[(&str, Key)] = &[
    ("F1", Key::F1), ("F2", Key::F2), ("F3", Key::F3), ("F4", Key::F4),
    ("F5", Key::F5), ("F6", Key::F6), ("F7", Key::F7), ("F8", Key::F8),
    ("F9", Key::F9), ("F10", Key::F10), ("F11", Key::F11), ("F12", Key::F12),
    ("A", Key::KeyA), ("B", Key::KeyB), ("C", Key::KeyC), ("D", Key::KeyD),
    ("E", Key::KeyE), ("F", Key::KeyF), ("G", Key::KeyG), ("H", Key::KeyH),
    ("I", Key::KeyI), ("J", Key::KeyJ), ("K", Key::KeyK), ("L", Key::KeyL),
    ("M", Key::KeyM), ("N", Key::KeyN), ("O", Key::KeyO), ("P", Key::KeyP),
    ("Q", Key::KeyQ), ("R", Key::KeyR), ("S", Key::KeyS), ("T", Key::KeyT),
    ("U", Key::KeyU), ("V", Key::KeyV), ("W", Key::KeyW), ("X", Key::KeyX),
    ("Y", Key::KeyY), ("Z", Key::KeyZ),
    ("0", Key::Num0), ("1", Key::Num1), ("2", Key::Num2), ("3", Key::Num3),
    ("4", Key::Num4), ("5", Key::Num5), ("6", Key::Num6), ("7", Key::Num7),
    ("8", Key::Num8), ("9", Key::Num9),
    ("Escape", Key::Escape), ("Esc", Key::Escape),
    ("Space", Key::Space),
    ("Tab", Key::Tab),
    ("Return", Key::Return), ("Enter", Key::Return),
    ("Backspace", Key::Backspace),
    ("Insert", Key::Insert),
    ("Delete", Key::Delete),
    ("Home", Key::Home),
    ("End", Key::End),
    ("PageUp", Key::PageUp),
    ("PageDown", Key::PageDown),
    ("Up", Key::UpArrow), ("Down", Key::DownArrow),
    ("Left", Key::LeftArrow), ("Right", Key::RightArrow),
    ("Pause", Key::Pause),
    ("ScrollLock", Key::ScrollLock),
    ("CapsLock", Key::CapsLock),
    ("PrintScreen", Key::PrintScreen),
];

/// Parses a key name such as `F6`, `q` or `PageUp`, ignoring case.
pub fn parse_key(name: &str) -> Result<Key> {
    let name = name.trim();
    NAMED_KEYS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, key)| *key)
        .ok_or_else(|| ClickerError::UnknownKey(name.to_string()))
}

/// Human readable name for a key. Keys without a short name fall back to rdev's.
pub fn key_name(key: Key) -> String {
    match NAMED_KEYS.iter().find(|(_, k)| *k == key) {
        Some((name, _)) => (*name).to_string(),
        None => match key {
            Key::Unknown(code) => format!("Key#{code}"),
            other => format!("{other:?}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(parse_key("f6").unwrap(), Key::F6);
        assert_eq!(parse_key(" PageUp ").unwrap(), Key::PageUp);
        assert_eq!(parse_key("enter").unwrap(), Key::Return);
        assert_eq!(parse_key("q").unwrap(), Key::KeyQ);
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(parse_key("Hyper"), Err(ClickerError::UnknownKey(k)) if k == "Hyper"));
        assert!(parse_key("").is_err());
    }

    #[test]
    fn test_key_name() {
        assert_eq!(key_name(Key::F7), "F7");
        assert_eq!(key_name(Key::Return), "Return");
        assert_eq!(key_name(Key::Escape), "Escape");
        assert_eq!(key_name(Key::ShiftLeft), "ShiftLeft");
        assert_eq!(key_name(Key::Unknown(42)), "Key#42");
    }
}
