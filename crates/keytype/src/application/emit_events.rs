//! Event emission: the port to the virtual keyboard and the tap primitives.
//!
//! The [`VirtualKeyboard`] trait is the only thing the application layer knows
//! about the device.  Concrete implementations live in
//! `infrastructure::keyboard` (uinput on Linux, an in-memory recorder for
//! tests, and a byte stream for dry runs).
//!
//! [`EventEmitter`] builds the small fixed sequences every keystroke is made
//! of on top of that trait.  It holds no state of its own beyond the device
//! handle.

use std::path::PathBuf;
use std::sync::Arc;

use keytype_core::{KeyEvent, Keycode};
use thiserror::Error;
use tracing::trace;

/// Error type for virtual keyboard operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The uinput character device could not be opened.
    #[error("could not open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A device setup ioctl was rejected by the kernel.
    #[error("{request} failed: {source}")]
    Ioctl {
        request: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Writing an event record to the device failed.
    #[error("write to virtual keyboard failed: {0}")]
    Write(#[source] std::io::Error),

    /// The device accepted only part of a record.
    #[error("short write to virtual keyboard: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    /// The device is closed or otherwise unusable.
    #[error("virtual keyboard unavailable: {0}")]
    Unavailable(String),
}

/// A virtual keyboard that accepts one event at a time.
///
/// Implementations must write each event immediately and in call order; the
/// synthesizer relies on that ordering to keep modifiers and taps in the same
/// input frame.
#[cfg_attr(test, mockall::automock)]
pub trait VirtualKeyboard: Send + Sync {
    /// Writes one event to the device.
    fn emit(&self, event: KeyEvent) -> Result<(), DeviceError>;
}

/// Writes key events and the fixed tap sequences to a [`VirtualKeyboard`].
#[derive(Clone)]
pub struct EventEmitter {
    device: Arc<dyn VirtualKeyboard>,
}

impl EventEmitter {
    /// Creates an emitter writing to `device`.
    pub fn new(device: Arc<dyn VirtualKeyboard>) -> Self {
        Self { device }
    }

    /// Writes a single event.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError`] if the device rejects the write.
    pub fn emit(&self, event: KeyEvent) -> Result<(), DeviceError> {
        trace!(?event, "emit");
        self.device.emit(event)
    }

    /// Presses `key` without a trailing sync.
    ///
    /// Used for modifiers, which share the input frame of the tap that follows.
    pub fn press(&self, key: Keycode) -> Result<(), DeviceError> {
        self.emit(KeyEvent::press(key))
    }

    /// Releases `key` and closes the frame.
    ///
    /// The SYNC is written even when the release fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`DeviceError`] encountered.
    pub fn release_and_sync(&self, key: Keycode) -> Result<(), DeviceError> {
        let released = self.emit(KeyEvent::release(key));
        let synced = self.emit(KeyEvent::sync());
        released.and(synced)
    }

    /// Types `key` once: PRESS, RELEASE, SYNC.
    ///
    /// A failed press sends nothing more.  Once the press is written the
    /// release and SYNC are always attempted, so the key cannot stay down.
    ///
    /// # Errors
    ///
    /// Returns the first [`DeviceError`] encountered.
    pub fn tap(&self, key: Keycode) -> Result<(), DeviceError> {
        self.press(key)?;
        self.release_and_sync(key)
    }

    /// Holds `modifier` around a tap of `key`:
    /// PRESS(modifier), tap(key), RELEASE(modifier), SYNC.
    ///
    /// Once the modifier is down its release is always attempted, even when
    /// the tap in between fails, so a broken write cannot leave it latched.
    ///
    /// # Errors
    ///
    /// Returns the first [`DeviceError`] encountered.
    pub fn tap_with_modifier(&self, modifier: Keycode, key: Keycode) -> Result<(), DeviceError> {
        self.press(modifier)?;
        let tapped = self.tap(key);
        let released = self.release_and_sync(modifier);
        tapped.and(released)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
