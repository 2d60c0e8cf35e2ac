//! TypeTextUseCase: turns characters and text buffers into key events.
//!
//! # Per-character sequence
//!
//! ```text
//! [PRESS LEFTSHIFT]            if the character is on the shifted level
//! PRESS key, RELEASE key, SYNC
//! [RELEASE LEFTSHIFT, SYNC]    if SHIFT was pressed
//! [PRESS SPACE, RELEASE SPACE, SYNC]  if the character is on a dead key
//! ```
//!
//! # Buffer scan
//!
//! A buffer is scanned in *units*.  A byte below 0x80 is one unit and goes
//! through the character table.  A byte with the top bit set starts a
//! multi-byte unit: the lead byte plus the continuation bytes it announces.
//! The unit is decoded as UTF-8 and typed through AltGr if the decoded
//! character is on the layout's third level; anything else is skipped.
//!
//! A unit that cannot be typed never aborts the scan.  It is logged, recorded
//! in the [`TypingReport`], and the scan moves on.

use keytype_core::keymap::us_intl::{is_dead_key, lookup, lookup_level3};
use keytype_core::Keycode;
use thiserror::Error;
use tracing::{debug, warn};

use super::emit_events::{DeviceError, EventEmitter};

/// Why a unit of text or a command could not be typed.
#[derive(Debug, Error)]
pub enum TypingError {
    /// The device rejected a write.
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// The 7-bit character has no key on the reference layout.
    #[error("no key for character 0x{0:02X}")]
    UnmappedCharacter(u8),

    /// A multi-byte sequence other than a recognised AltGr symbol.
    #[error("unsupported multi-byte sequence {0:02X?}")]
    UnsupportedSequence(Vec<u8>),

    /// The command token is not one of `BACK`, `RETURN`, `TAB`.
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),
}

/// A unit of the buffer that was not typed.
#[derive(Debug)]
pub struct SkippedUnit {
    /// Byte offset of the unit's first byte.
    pub offset: usize,
    /// Why it was skipped.
    pub error: TypingError,
}

/// Outcome of typing one buffer.
#[derive(Debug, Default)]
pub struct TypingReport {
    /// Number of units typed successfully.
    pub typed: usize,
    /// Units that were skipped, in buffer order.
    pub skipped: Vec<SkippedUnit>,
}

impl TypingReport {
    /// `true` when every unit was typed.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// The Type Text use case.
pub struct TypeTextUseCase {
    emitter: EventEmitter,
}

impl TypeTextUseCase {
    /// Creates a new use case writing through `emitter`.
    pub fn new(emitter: EventEmitter) -> Self {
        Self { emitter }
    }

    /// Types one 7-bit character.
    ///
    /// # Errors
    ///
    /// Returns [`TypingError::UnmappedCharacter`] (and emits nothing) when the
    /// character is not in the table, or [`TypingError::Device`] if a write
    /// fails.
    pub fn type_char(&self, c: u8) -> Result<(), TypingError> {
        let mapping = lookup(c).ok_or(TypingError::UnmappedCharacter(c))?;
        debug!(ch = ?(c as char), key = ?mapping.keycode, shift = mapping.requires_shift, "typing");

        if mapping.requires_shift {
            self.emitter
                .tap_with_modifier(Keycode::LeftShift, mapping.keycode)?;
        } else {
            self.emitter.tap(mapping.keycode)?;
        }

        if is_dead_key(c) {
            debug!("dead key, typing a SPACE");
            self.emitter.tap(Keycode::Space)?;
        }
        Ok(())
    }

    /// Types one multi-byte unit through AltGr.
    ///
    /// # Errors
    ///
    /// Returns [`TypingError::UnsupportedSequence`] (and emits nothing) unless
    /// the unit decodes to a single level-3 character.
    pub fn type_multibyte(&self, unit: &[u8]) -> Result<(), TypingError> {
        let key = decode_single_char(unit)
            .and_then(lookup_level3)
            .ok_or_else(|| TypingError::UnsupportedSequence(unit.to_vec()))?;
        debug!(bytes = ?unit, ?key, "typing level-3 symbol");
        self.emitter.tap_with_modifier(Keycode::RightAlt, key)?;
        Ok(())
    }

    /// Types a whole buffer, best effort.
    ///
    /// Never fails for content reasons; every problem is reported in the
    /// returned [`TypingReport`] and logged as a warning.
    pub fn type_text(&self, buffer: &[u8]) -> TypingReport {
        let mut report = TypingReport::default();
        let mut offset = 0;

        while offset < buffer.len() {
            let rest = &buffer[offset..];
            let (len, result) = if rest[0].is_ascii() {
                (1, self.type_char(rest[0]))
            } else {
                let len = multibyte_unit_len(rest);
                (len, self.type_multibyte(&rest[..len]))
            };

            match result {
                Ok(()) => report.typed += 1,
                Err(error) => {
                    warn!(offset, "could not type unit: {error}");
                    report.skipped.push(SkippedUnit { offset, error });
                }
            }
            offset += len;
        }

        report
    }
}

/// Length of the multi-byte unit at the start of `bytes` (`bytes[0] >= 0x80`).
///
/// A valid lead byte claims at most as many continuation bytes as its UTF-8
/// length announces.  A stray continuation byte or an invalid lead claims
/// every continuation byte that follows it.
fn multibyte_unit_len(bytes: &[u8]) -> usize {
    let limit = match bytes[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => usize::MAX,
    };
    let mut len = 1;
    while len < limit && len < bytes.len() && is_continuation(bytes[len]) {
        len += 1;
    }
    len
}

fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

fn decode_single_char(unit: &[u8]) -> Option<char> {
    let text = std::str::from_utf8(unit).ok()?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
