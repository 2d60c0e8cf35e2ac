//! Mock virtual keyboard for unit and integration testing.
//!
//! # Why a mock keyboard?
//!
//! The real [`uinput`](super) device:
//!
//! - Needs write access to `/dev/uinput` (root or the `input` group).
//! - Actually types into whatever window has focus on the test machine.
//! - Cannot be observed directly from Rust test code.
//!
//! `MockKeyboard` replaces the device with in-memory recording.  Each emitted
//! event is pushed into a `Mutex<Vec<...>>` so test assertions can inspect
//! exactly what was emitted and in what order.
//!
//! # Usage in tests
//!
//! ```ignore
//! let keyboard = Arc::new(MockKeyboard::new());
//! let session = TypingSession::new(Arc::clone(&keyboard) as Arc<dyn VirtualKeyboard>);
//!
//! session.press("RETURN");
//!
//! assert_eq!(keyboard.events().len(), 3);
//! ```
//!
//! # Failure injection
//!
//! Set `should_fail = true` to make every write fail, or `fail_on` to make
//! only writes of one particular event fail.  Failed writes are not recorded.

use std::sync::Mutex;

use keytype_core::KeyEvent;

use crate::application::emit_events::{DeviceError, VirtualKeyboard};

/// A keyboard that records every event instead of typing it.
#[derive(Default)]
pub struct MockKeyboard {
    /// Every successfully written event, in order.
    pub written: Mutex<Vec<KeyEvent>>,
    /// When `true`, every write returns [`DeviceError::Unavailable`].
    pub should_fail: bool,
    /// When set, writes of exactly this event return [`DeviceError::Unavailable`].
    pub fail_on: Option<KeyEvent>,
}

impl MockKeyboard {
    /// Creates a new `MockKeyboard` with an empty record and no failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a keyboard whose every write fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Returns a copy of the recorded events.
    pub fn events(&self) -> Vec<KeyEvent> {
        self.written
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.written
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl VirtualKeyboard for MockKeyboard {
    /// Records the event, or returns an error if failure injection matches.
    fn emit(&self, event: KeyEvent) -> Result<(), DeviceError> {
        if self.should_fail || self.fail_on == Some(event) {
            return Err(DeviceError::Unavailable("mock failure".into()));
        }
        self.written
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
