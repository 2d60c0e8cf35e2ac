//! Linux input keycodes (`KEY_*` in `linux/input-event-codes.h`).
//!
//! These are the codes written into the `code` field of an `EV_KEY` event.
//!
//! # What is a keycode? (for beginners)
//!
//! A keycode names a **physical key position**, not a character.  `KEY_A`
//! (30) is "the key where A sits on a US keyboard", whatever character the
//! active layout assigns to it.  The kernel only ever sees keycodes; turning a
//! keycode back into a character is the job of the desktop's layout handling.
//!
//! | Key          | Keycode |
//! |--------------|---------|
//! | `KEY_1`      | 2       |
//! | `KEY_A`      | 30      |
//! | `KEY_LEFTSHIFT` | 42   |
//! | `KEY_SPACE`  | 57      |
//! | `KEY_RIGHTALT` | 100   |
//!
//! Only the keys this crate can emit are listed.  The virtual device may
//! still enable the whole 0–255 range; see
//! [`crate::keymap::us_intl::referenced_keycodes`] for the narrow set.

use serde::{Deserialize, Serialize};

/// Linux input keycode.
///
/// The numeric value of each variant is the kernel's `KEY_*` constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u16)]
pub enum Keycode {
    // Number row (KEY_1 = 2 .. KEY_0 = 11)
    Digit1 = 2,
    Digit2 = 3,
    Digit3 = 4,
    Digit4 = 5,
    Digit5 = 6,
    Digit6 = 7,
    Digit7 = 8,
    Digit8 = 9,
    Digit9 = 10,
    Digit0 = 11,
    Minus = 12,
    Equal = 13,
    Backspace = 14,
    Tab = 15,

    // Top letter row
    KeyQ = 16,
    KeyW = 17,
    KeyE = 18,
    KeyR = 19,
    KeyT = 20,
    KeyY = 21,
    KeyU = 22,
    KeyI = 23,
    KeyO = 24,
    KeyP = 25,
    LeftBrace = 26,
    RightBrace = 27,
    Enter = 28,

    // Home row
    KeyA = 30,
    KeyS = 31,
    KeyD = 32,
    KeyF = 33,
    KeyG = 34,
    KeyH = 35,
    KeyJ = 36,
    KeyK = 37,
    KeyL = 38,
    Semicolon = 39,
    Apostrophe = 40,
    Grave = 41,
    LeftShift = 42,
    Backslash = 43,

    // Bottom row
    KeyZ = 44,
    KeyX = 45,
    KeyC = 46,
    KeyV = 47,
    KeyB = 48,
    KeyN = 49,
    KeyM = 50,
    Comma = 51,
    Dot = 52,
    Slash = 53,

    Space = 57,

    /// AltGr on international layouts (level-3 shift).
    RightAlt = 100,
}

impl Keycode {
    /// Returns the raw kernel keycode.
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Converts a raw kernel keycode to a [`Keycode`].
    ///
    /// Returns `None` for codes this crate never emits.
    pub fn from_u16(value: u16) -> Option<Self> {
        let key = match value {
            2 => Keycode::Digit1,
            3 => Keycode::Digit2,
            4 => Keycode::Digit3,
            5 => Keycode::Digit4,
            6 => Keycode::Digit5,
            7 => Keycode::Digit6,
            8 => Keycode::Digit7,
            9 => Keycode::Digit8,
            10 => Keycode::Digit9,
            11 => Keycode::Digit0,
            12 => Keycode::Minus,
            13 => Keycode::Equal,
            14 => Keycode::Backspace,
            15 => Keycode::Tab,
            16 => Keycode::KeyQ,
            17 => Keycode::KeyW,
            18 => Keycode::KeyE,
            19 => Keycode::KeyR,
            20 => Keycode::KeyT,
            21 => Keycode::KeyY,
            22 => Keycode::KeyU,
            23 => Keycode::KeyI,
            24 => Keycode::KeyO,
            25 => Keycode::KeyP,
            26 => Keycode::LeftBrace,
            27 => Keycode::RightBrace,
            28 => Keycode::Enter,
            30 => Keycode::KeyA,
            31 => Keycode::KeyS,
            32 => Keycode::KeyD,
            33 => Keycode::KeyF,
            34 => Keycode::KeyG,
            35 => Keycode::KeyH,
            36 => Keycode::KeyJ,
            37 => Keycode::KeyK,
            38 => Keycode::KeyL,
            39 => Keycode::Semicolon,
            40 => Keycode::Apostrophe,
            41 => Keycode::Grave,
            42 => Keycode::LeftShift,
            43 => Keycode::Backslash,
            44 => Keycode::KeyZ,
            45 => Keycode::KeyX,
            46 => Keycode::KeyC,
            47 => Keycode::KeyV,
            48 => Keycode::KeyB,
            49 => Keycode::KeyN,
            50 => Keycode::KeyM,
            51 => Keycode::Comma,
            52 => Keycode::Dot,
            53 => Keycode::Slash,
            57 => Keycode::Space,
            100 => Keycode::RightAlt,
            _ => return None,
        };
        Some(key)
    }
}

impl From<Keycode> for u16 {
    fn from(key: Keycode) -> Self {
        key.code()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_kernel_values() {
        assert_eq!(Keycode::KeyA.code(), 30);
        assert_eq!(Keycode::Space.code(), 57);
        assert_eq!(Keycode::LeftShift.code(), 42);
        assert_eq!(Keycode::RightAlt.code(), 100);
        assert_eq!(Keycode::Enter.code(), 28);
        assert_eq!(Keycode::Backspace.code(), 14);
        assert_eq!(Keycode::Tab.code(), 15);
    }

    #[test]
    fn test_from_u16_inverts_code_for_every_known_value() {
        for raw in 0..=255u16 {
            if let Some(key) = Keycode::from_u16(raw) {
                assert_eq!(key.code(), raw, "from_u16({raw}) returned {key:?}");
            }
        }
    }

    #[test]
    fn test_from_u16_rejects_unlisted_codes() {
        // KEY_ESC (1), KEY_LEFTCTRL (29) and KEY_RIGHTSHIFT (54) are never emitted.
        assert_eq!(Keycode::from_u16(0), None);
        assert_eq!(Keycode::from_u16(1), None);
        assert_eq!(Keycode::from_u16(29), None);
        assert_eq!(Keycode::from_u16(54), None);
    }
}
