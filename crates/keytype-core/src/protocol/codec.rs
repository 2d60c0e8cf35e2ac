//! Binary codec for key event records.
//!
//! Wire format (the tail of the kernel's `struct input_event`):
//! ```text
//! [type:2][code:2][value:4]
//! ```
//! Total size: 8 bytes.  All integers are in **native** byte order, because
//! the record is handed verbatim to the local kernel.  The kernel record puts
//! a `struct timeval` in front of these 8 bytes; the device adapter writes
//! that prefix as zeros and lets the kernel stamp the time.

use thiserror::Error;

use crate::keymap::keycode::Keycode;
use crate::protocol::event::{
    EventKind, KeyEvent, EVENT_RECORD_SIZE, EV_KEY, EV_SYN, KEY_DOWN, KEY_UP, SYN_REPORT,
};

/// Errors that can occur while decoding event records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The byte slice is shorter than one record.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The `type` field is neither `EV_KEY` nor `EV_SYN`.
    #[error("unknown event type: 0x{0:04X}")]
    UnknownEventType(u16),

    /// The `code` field of a key event names a key keytype never emits.
    #[error("unknown keycode: {0}")]
    UnknownKeycode(u16),

    /// The `code`/`value` pair is not one keytype produces (e.g. autorepeat).
    #[error("invalid value {value} for event type 0x{event_type:04X} code {code}")]
    InvalidValue {
        event_type: u16,
        code: u16,
        value: i32,
    },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes one [`KeyEvent`] into its 8-byte record.
///
/// # Examples
///
/// ```rust
/// use keytype_core::{encode_event, decode_event, KeyEvent, Keycode};
///
/// let ev = KeyEvent::press(Keycode::KeyA);
/// let bytes = encode_event(&ev);
/// let (decoded, consumed) = decode_event(&bytes).unwrap();
/// assert_eq!(decoded, ev);
/// assert_eq!(consumed, bytes.len());
/// ```
pub fn encode_event(event: &KeyEvent) -> [u8; EVENT_RECORD_SIZE] {
    let mut buf = [0u8; EVENT_RECORD_SIZE];
    buf[0..2].copy_from_slice(&event.event_type().to_ne_bytes());
    buf[2..4].copy_from_slice(&event.code().to_ne_bytes());
    buf[4..8].copy_from_slice(&event.value().to_ne_bytes());
    buf
}

/// Decodes one [`KeyEvent`] from the beginning of `bytes`.
///
/// Returns the event and the number of bytes consumed.
///
/// # Errors
///
/// Returns [`ProtocolError`] if fewer than 8 bytes are available or the record
/// is not one keytype could have produced.
pub fn decode_event(bytes: &[u8]) -> Result<(KeyEvent, usize), ProtocolError> {
    if bytes.len() < EVENT_RECORD_SIZE {
        return Err(ProtocolError::InsufficientData {
            needed: EVENT_RECORD_SIZE,
            available: bytes.len(),
        });
    }

    let event_type = u16::from_ne_bytes([bytes[0], bytes[1]]);
    let code = u16::from_ne_bytes([bytes[2], bytes[3]]);
    let value = i32::from_ne_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

    let event = match (event_type, value) {
        (EV_SYN, KEY_UP) if code == SYN_REPORT => KeyEvent::sync(),
        (EV_KEY, KEY_DOWN | KEY_UP) => {
            let key = Keycode::from_u16(code).ok_or(ProtocolError::UnknownKeycode(code))?;
            let kind = if value == KEY_DOWN {
                EventKind::Press
            } else {
                EventKind::Release
            };
            KeyEvent {
                kind,
                key: Some(key),
            }
        }
        (EV_SYN | EV_KEY, _) => {
            return Err(ProtocolError::InvalidValue {
                event_type,
                code,
                value,
            })
        }
        _ => return Err(ProtocolError::UnknownEventType(event_type)),
    };

    Ok((event, EVENT_RECORD_SIZE))
}

/// Decodes a whole stream of back-to-back records.
///
/// # Errors
///
/// Returns the first [`ProtocolError`] encountered, including
/// [`ProtocolError::InsufficientData`] for a truncated trailing record.
pub fn decode_events(mut bytes: &[u8]) -> Result<Vec<KeyEvent>, ProtocolError> {
    let mut events = Vec::with_capacity(bytes.len() / EVENT_RECORD_SIZE);
    while !bytes.is_empty() {
        let (event, consumed) = decode_event(bytes)?;
        events.push(event);
        bytes = &bytes[consumed..];
    }
    Ok(events)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
