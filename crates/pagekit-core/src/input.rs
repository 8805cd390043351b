#![forbid(unsafe_code)]

//! Normalized input schema for page controllers.
//!
//! The web host (JS/WASM glue) is expected to provide:
//! - DOM `key`/`code` strings plus modifier state for keyboard events,
//! - `screenX`/`screenY` of the changed touches for touch events,
//! - an [`EventId`] that is identical for every listener observing the same
//!   DOM event.
//!
//! This module focuses on:
//! - stable key normalization (DOM `key`/`code` → [`KeyCode`]),
//! - a compact modifier bitset,
//! - the [`Disposition`] flags a handler hands back to the host,
//! - JSON encoding of dispatched input for trace logs.

use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Modifier keys held during an input event.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

impl Modifiers {
    /// Build a modifier set from the four DOM boolean flags.
    #[must_use]
    pub fn from_dom(shift: bool, alt: bool, ctrl: bool, meta: bool) -> Self {
        let mut mods = Self::empty();
        mods.set(Self::SHIFT, shift);
        mods.set(Self::ALT, alt);
        mods.set(Self::CTRL, ctrl);
        mods.set(Self::SUPER, meta);
        mods
    }
}

bitflags! {
    /// What the host must do with the DOM event after a handler ran.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Disposition: u8 {
        /// Call `event.preventDefault()`.
        const PREVENT_DEFAULT  = 0b01;
        /// Call `event.stopPropagation()`.
        const STOP_PROPAGATION = 0b10;
    }
}

/// Identity of one dispatched DOM event.
///
/// The host derives it from a value shared by every listener that sees the
/// same event (the web host uses the bits of `Event.timeStamp`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(pub u64);

/// Normalized key code.
///
/// Only the keys the controllers react to get their own variant; anything
/// else is kept as [`KeyCode::Char`] or [`KeyCode::Unidentified`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Escape,
    Tab,
    /// Shift+Tab.
    BackTab,
    Left,
    Right,
    Unidentified { key: Box<str>, code: Box<str> },
}

impl KeyCode {
    #[must_use]
    pub fn to_code_string(&self) -> String {
        match self {
            Self::Char(c) => c.to_string(),
            Self::Escape => "Escape".to_string(),
            Self::Tab => "Tab".to_string(),
            Self::BackTab => "BackTab".to_string(),
            Self::Left => "Left".to_string(),
            Self::Right => "Right".to_string(),
            Self::Unidentified { .. } => "Unidentified".to_string(),
        }
    }

    /// True for both `Tab` and `BackTab`.
    #[must_use]
    pub const fn is_tab(&self) -> bool {
        matches!(self, Self::Tab | Self::BackTab)
    }
}

/// Normalized key-down event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub code: KeyCode,
    pub mods: Modifiers,
    pub repeat: bool,
}

impl KeyInput {
    /// A plain, non-repeating key press without modifiers.
    #[must_use]
    pub fn plain(code: KeyCode) -> Self {
        Self {
            code,
            mods: Modifiers::empty(),
            repeat: false,
        }
    }

    /// Normalize a DOM `keydown` payload.
    #[must_use]
    pub fn from_dom(dom_key: &str, dom_code: &str, mods: Modifiers, repeat: bool) -> Self {
        Self {
            code: normalize_dom_key_code(dom_key, dom_code, mods),
            mods,
            repeat,
        }
    }
}

/// Phase for touch events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    Start,
    End,
    Cancel,
}

/// One changed touch, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TouchPoint {
    pub id: u32,
    pub screen_x: f64,
    pub screen_y: f64,
}

/// Normalized touch event carrying the DOM `changedTouches` list.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchInput {
    pub phase: TouchPhase,
    pub changed: Vec<TouchPoint>,
}

impl TouchInput {
    /// Single-touch helper, mostly for tests and synthetic input.
    #[must_use]
    pub fn single(phase: TouchPhase, screen_x: f64, screen_y: f64) -> Self {
        Self {
            phase,
            changed: vec![TouchPoint {
                id: 0,
                screen_x,
                screen_y,
            }],
        }
    }

    /// The first changed touch, if any.
    #[must_use]
    pub fn primary(&self) -> Option<&TouchPoint> {
        self.changed.first()
    }
}

/// Input that is worth tracing: keyboard and touch.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(KeyInput),
    Touch(TouchInput),
}

/// Deterministic normalization of DOM key/code strings into a [`KeyCode`].
#[must_use]
pub fn normalize_dom_key_code(dom_key: &str, dom_code: &str, mods: Modifiers) -> KeyCode {
    // Shift+Tab should be represented explicitly.
    if dom_key == "Tab" && mods.contains(Modifiers::SHIFT) {
        return KeyCode::BackTab;
    }

    // Prefer the logical `key` for printable characters (already includes shift).
    let mut chars = dom_key.chars();
    if let Some(first) = chars.next()
        && chars.next().is_none()
    {
        return KeyCode::Char(first);
    }

    match dom_key {
        "Escape" | "Esc" => KeyCode::Escape,
        "Tab" => KeyCode::Tab,
        "ArrowLeft" | "Left" => KeyCode::Left,
        "ArrowRight" | "Right" => KeyCode::Right,
        "Spacebar" => KeyCode::Char(' '),
        _ => key_code_from_dom_code(dom_code, mods).unwrap_or_else(|| KeyCode::Unidentified {
            key: dom_key.into(),
            code: dom_code.into(),
        }),
    }
}

fn key_code_from_dom_code(dom_code: &str, mods: Modifiers) -> Option<KeyCode> {
    if dom_code == "Tab" && mods.contains(Modifiers::SHIFT) {
        return Some(KeyCode::BackTab);
    }

    Some(match dom_code {
        "Escape" => KeyCode::Escape,
        "Tab" => KeyCode::Tab,
        "ArrowLeft" => KeyCode::Left,
        "ArrowRight" => KeyCode::Right,
        _ => return None,
    })
}

/// JSON encoding used for trace logs.
///
/// A `kind` tag plus the fields that identify the input.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEventJson {
    Key {
        code: String,
        mods: u8,
        repeat: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        raw_key: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        raw_code: Option<String>,
    },
    Touch {
        phase: TouchPhase,
        touches: Vec<TouchPoint>,
    },
}

impl From<&InputEvent> for InputEventJson {
    fn from(event: &InputEvent) -> Self {
        match event {
            InputEvent::Key(key) => {
                let (raw_key, raw_code) = match &key.code {
                    KeyCode::Unidentified { key, code } => {
                        (Some(key.to_string()), Some(code.to_string()))
                    }
                    _ => (None, None),
                };
                Self::Key {
                    code: key.code.to_code_string(),
                    mods: key.mods.bits(),
                    repeat: key.repeat,
                    raw_key,
                    raw_code,
                }
            }
            InputEvent::Touch(touch) => Self::Touch {
                phase: touch.phase,
                touches: touch.changed.clone(),
            },
        }
    }
}

impl InputEvent {
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&InputEventJson::from(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn map_dom_key_specials() {
        let mods = Modifiers::empty();
        assert_eq!(normalize_dom_key_code("Escape", "Escape", mods), KeyCode::Escape);
        assert_eq!(normalize_dom_key_code("Esc", "", mods), KeyCode::Escape);
        assert_eq!(
            normalize_dom_key_code("ArrowLeft", "ArrowLeft", mods),
            KeyCode::Left
        );
        assert_eq!(
            normalize_dom_key_code("ArrowRight", "ArrowRight", mods),
            KeyCode::Right
        );
        assert_eq!(normalize_dom_key_code("a", "KeyA", mods), KeyCode::Char('a'));
        assert_eq!(
            normalize_dom_key_code("Enter", "Enter", mods),
            KeyCode::Unidentified {
                key: "Enter".into(),
                code: "Enter".into(),
            }
        );
    }

    #[test]
    fn shift_tab_is_backtab() {
        assert_eq!(
            normalize_dom_key_code("Tab", "Tab", Modifiers::SHIFT),
            KeyCode::BackTab
        );
        assert_eq!(
            normalize_dom_key_code("Unidentified", "Tab", Modifiers::SHIFT),
            KeyCode::BackTab
        );
        assert!(KeyCode::BackTab.is_tab());
    }

    #[test]
    fn unknown_key_keeps_raw_strings() {
        let code = normalize_dom_key_code("MediaPlayPause", "MediaPlayPause", Modifiers::empty());
        assert_eq!(
            code,
            KeyCode::Unidentified {
                key: "MediaPlayPause".into(),
                code: "MediaPlayPause".into(),
            }
        );
    }

    #[test]
    fn modifiers_from_dom_flags() {
        let mods = Modifiers::from_dom(true, false, true, false);
        assert_eq!(mods, Modifiers::SHIFT | Modifiers::CTRL);
    }

    #[test]
    fn key_event_json_is_stable() {
        let ev = InputEvent::Key(KeyInput::from_dom("Tab", "Tab", Modifiers::SHIFT, false));
        let json = ev.to_json_string().expect("serialize");
        assert_eq!(
            json,
            r#"{"kind":"key","code":"BackTab","mods":1,"repeat":false}"#
        );
    }

    #[test]
    fn unidentified_key_json_keeps_raw_fields() {
        let ev = InputEvent::Key(KeyInput::from_dom(
            "AudioVolumeUp",
            "AudioVolumeUp",
            Modifiers::empty(),
            true,
        ));
        assert_eq!(
            ev.to_json_string().expect("serialize"),
            r#"{"kind":"key","code":"Unidentified","mods":0,"repeat":true,"raw_key":"AudioVolumeUp","raw_code":"AudioVolumeUp"}"#
        );
    }

    #[test]
    fn touch_event_json_uses_snake_case_phase() {
        let ev = InputEvent::Touch(TouchInput::single(TouchPhase::End, 12.5, 3.0));
        let json = ev.to_json_string().expect("serialize");
        assert_eq!(
            json,
            r#"{"kind":"touch","phase":"end","touches":[{"id":0,"screen_x":12.5,"screen_y":3.0}]}"#
        );
    }
}
