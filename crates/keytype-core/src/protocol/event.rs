//! The key event record written to the virtual keyboard.
//!
//! Every keystroke the synthesizer produces is a short run of three kinds of
//! event: a key going down, the same key coming up, and a sync marker that
//! tells the kernel "deliver what you have so far".
//!
//! # Why the sync marker? (for beginners)
//!
//! The kernel input subsystem batches events into *frames*.  Nothing written
//! to the device is delivered to applications until an `EV_SYN` /
//! `SYN_REPORT` event closes the frame.  A key tap is therefore
//! `PRESS, RELEASE, SYNC`.  A modifier pressed right before a tap shares the
//! tap's frame, so the receiving side sees SHIFT and the key together.

use serde::{Deserialize, Serialize};

use crate::keymap::keycode::Keycode;

// ── Wire constants (linux/input-event-codes.h) ───────────────────────────────

/// Event type for synchronization markers.
pub const EV_SYN: u16 = 0x00;

/// Event type for key state changes.
pub const EV_KEY: u16 = 0x01;

/// Sync code that closes an input frame.
pub const SYN_REPORT: u16 = 0x00;

/// `value` of a key-down event.
pub const KEY_DOWN: i32 = 1;

/// `value` of a key-up event.
pub const KEY_UP: i32 = 0;

/// Size in bytes of the `{type, code, value}` part of an event record.
pub const EVENT_RECORD_SIZE: usize = 8;

/// The three kinds of event the synthesizer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Press,
    Release,
    Sync,
}

impl EventKind {
    /// The kernel event type (`EV_KEY` or `EV_SYN`).
    pub const fn event_type(self) -> u16 {
        match self {
            EventKind::Press | EventKind::Release => EV_KEY,
            EventKind::Sync => EV_SYN,
        }
    }

    /// The kernel event value (1 for down, 0 otherwise).
    pub const fn value(self) -> i32 {
        match self {
            EventKind::Press => KEY_DOWN,
            EventKind::Release | EventKind::Sync => KEY_UP,
        }
    }
}

/// One event for the virtual keyboard.
///
/// `key` is `None` exactly when `kind` is [`EventKind::Sync`]; the
/// constructors below are the only way the synthesizer builds events, so the
/// pairing always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyEvent {
    pub kind: EventKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub key: Option<Keycode>,
}

impl KeyEvent {
    /// A key-down event.
    pub const fn press(key: Keycode) -> Self {
        Self {
            kind: EventKind::Press,
            key: Some(key),
        }
    }

    /// A key-up event.
    pub const fn release(key: Keycode) -> Self {
        Self {
            kind: EventKind::Release,
            key: Some(key),
        }
    }

    /// A `SYN_REPORT` frame marker.
    pub const fn sync() -> Self {
        Self {
            kind: EventKind::Sync,
            key: None,
        }
    }

    /// The `type` field of the wire record.
    pub const fn event_type(&self) -> u16 {
        self.kind.event_type()
    }

    /// The `code` field of the wire record (`SYN_REPORT` for sync events).
    pub fn code(&self) -> u16 {
        self.key.map_or(SYN_REPORT, Keycode::code)
    }

    /// The `value` field of the wire record.
    pub const fn value(&self) -> i32 {
        self.kind.value()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
