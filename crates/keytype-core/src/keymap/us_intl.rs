//! Character table for the "English (US, international with dead keys)" layout.
//!
//! Reference: <http://dry.sailingissues.com/us-international-keyboard-layout.html>
//!
//! # How a character becomes key presses (for beginners)
//!
//! Each printable ASCII character sits on one physical key, on either the
//! base level (no modifier) or the shifted level (SHIFT held).  The table
//! below stores *which key*; whether SHIFT is needed is decided by membership
//! in [`SHIFTED_CHARS`].  This is why `'` and `"` share `KEY_APOSTROPHE`: the
//! shift flag is the only thing that tells them apart.
//!
//! # Dead keys
//!
//! On this layout five keys do not print anything on their own.  They wait
//! for the next keystroke so they can combine with it (`'` + `e` = `é`).  To
//! get the bare mark the typist presses SPACE right after them.  The set is
//! [`DEAD_KEYS`].
//!
//! # Level 3 (AltGr)
//!
//! A third level, reached with the right Alt key, holds non-ASCII symbols.
//! Those characters arrive as multi-byte sequences, so they are looked up by
//! decoded `char` in [`lookup_level3`] rather than by byte.

use super::keycode::Keycode;
use crate::domain::command::Command;

/// Characters that need SHIFT held on the reference layout.
pub const SHIFTED_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ@#%&*+()!\":?~|{}$^_<>";

/// Characters whose key is a dead key on the reference layout.
pub const DEAD_KEYS: &[u8] = b"\"'~`^";

/// One entry of the character table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharMapping {
    /// The 7-bit character this entry types.
    pub source: u8,
    /// The key that produces it.
    pub keycode: Keycode,
    /// Whether LEFTSHIFT must be held while the key is tapped.
    pub requires_shift: bool,
}

/// Letter keys in alphabetical order; both cases map to the same key.
const LETTER_KEYS: [Keycode; 26] = [
    Keycode::KeyA,
    Keycode::KeyB,
    Keycode::KeyC,
    Keycode::KeyD,
    Keycode::KeyE,
    Keycode::KeyF,
    Keycode::KeyG,
    Keycode::KeyH,
    Keycode::KeyI,
    Keycode::KeyJ,
    Keycode::KeyK,
    Keycode::KeyL,
    Keycode::KeyM,
    Keycode::KeyN,
    Keycode::KeyO,
    Keycode::KeyP,
    Keycode::KeyQ,
    Keycode::KeyR,
    Keycode::KeyS,
    Keycode::KeyT,
    Keycode::KeyU,
    Keycode::KeyV,
    Keycode::KeyW,
    Keycode::KeyX,
    Keycode::KeyY,
    Keycode::KeyZ,
];

/// Every non-letter character the layout can type without AltGr.
const SYMBOL_KEYS: &[(u8, Keycode)] = &[
    (b' ', Keycode::Space),
    // Number row, base level
    (b'1', Keycode::Digit1),
    (b'2', Keycode::Digit2),
    (b'3', Keycode::Digit3),
    (b'4', Keycode::Digit4),
    (b'5', Keycode::Digit5),
    (b'6', Keycode::Digit6),
    (b'7', Keycode::Digit7),
    (b'8', Keycode::Digit8),
    (b'9', Keycode::Digit9),
    (b'0', Keycode::Digit0),
    // Number row, shifted level
    (b'!', Keycode::Digit1),
    (b'@', Keycode::Digit2),
    (b'#', Keycode::Digit3),
    (b'$', Keycode::Digit4),
    (b'%', Keycode::Digit5),
    (b'^', Keycode::Digit6), // dead
    (b'&', Keycode::Digit7),
    (b'*', Keycode::Digit8),
    (b'(', Keycode::Digit9),
    (b')', Keycode::Digit0),
    (b'-', Keycode::Minus),
    (b'_', Keycode::Minus),
    (b'=', Keycode::Equal),
    (b'+', Keycode::Equal),
    // Punctuation
    (b'[', Keycode::LeftBrace),
    (b'{', Keycode::LeftBrace),
    (b']', Keycode::RightBrace),
    (b'}', Keycode::RightBrace),
    (b';', Keycode::Semicolon),
    (b':', Keycode::Semicolon),
    (b'\'', Keycode::Apostrophe), // dead
    (b'"', Keycode::Apostrophe),  // dead
    (b'`', Keycode::Grave),       // dead
    (b'~', Keycode::Grave),       // dead
    (b'\\', Keycode::Backslash),
    (b'|', Keycode::Backslash),
    (b',', Keycode::Comma),
    (b'<', Keycode::Comma),
    (b'.', Keycode::Dot),
    (b'>', Keycode::Dot),
    (b'/', Keycode::Slash),
    (b'?', Keycode::Slash),
];

/// Non-ASCII characters on the AltGr level, keyed by decoded character.
const LEVEL3_KEYS: &[(char, Keycode)] = &[('€', Keycode::Digit5)];

const fn contains(set: &[u8], c: u8) -> bool {
    let mut i = 0;
    while i < set.len() {
        if set[i] == c {
            return true;
        }
        i += 1;
    }
    false
}

const fn mapping(source: u8, keycode: Keycode) -> Option<CharMapping> {
    Some(CharMapping {
        source,
        keycode,
        requires_shift: contains(SHIFTED_CHARS, source),
    })
}

const fn build_ascii_index() -> [Option<CharMapping>; 128] {
    let mut index = [None; 128];

    let mut i = 0;
    while i < LETTER_KEYS.len() {
        let lower = b'a' + i as u8;
        let upper = b'A' + i as u8;
        index[lower as usize] = mapping(lower, LETTER_KEYS[i]);
        index[upper as usize] = mapping(upper, LETTER_KEYS[i]);
        i += 1;
    }

    let mut j = 0;
    while j < SYMBOL_KEYS.len() {
        let (source, keycode) = SYMBOL_KEYS[j];
        index[source as usize] = mapping(source, keycode);
        j += 1;
    }

    index
}

/// Lookup table indexed by the 7-bit character value, built at compile time.
static ASCII_INDEX: [Option<CharMapping>; 128] = build_ascii_index();

/// Returns the key and shift requirement for a 7-bit character.
///
/// Returns `None` for characters the layout cannot type directly (control
/// characters, DEL, and any byte with the top bit set).
///
/// # Panics
///
/// This function never panics.
pub fn lookup(c: u8) -> Option<CharMapping> {
    ASCII_INDEX.get(c as usize).copied().flatten()
}

/// Returns `true` when `c` sits on a dead key and needs a neutralizing SPACE.
pub fn is_dead_key(c: u8) -> bool {
    DEAD_KEYS.contains(&c)
}

/// Returns the base key to combine with AltGr for a non-ASCII character.
///
/// Only `€` (AltGr + `5`) is recognised.
pub fn lookup_level3(ch: char) -> Option<Keycode> {
    LEVEL3_KEYS
        .iter()
        .find(|(symbol, _)| *symbol == ch)
        .map(|(_, key)| *key)
}

/// Returns every keycode the synthesizer can emit, sorted and deduplicated.
///
/// This covers the character table, the AltGr level, both modifiers and the
/// command keys.  A device that enables exactly these keys accepts every
/// event keytype produces.
pub fn referenced_keycodes() -> Vec<Keycode> {
    let mut keys: Vec<Keycode> = ASCII_INDEX
        .iter()
        .flatten()
        .map(|m| m.keycode)
        .chain(LEVEL3_KEYS.iter().map(|(_, key)| *key))
        .chain([Keycode::LeftShift, Keycode::RightAlt, Keycode::Space])
        .chain(Command::ALL.iter().map(|cmd| cmd.keycode()))
        .collect();
    keys.sort_unstable();
    keys.dedup();
    keys
}

// ── Tests ─────────────────────────────────────────────────────────────────────
