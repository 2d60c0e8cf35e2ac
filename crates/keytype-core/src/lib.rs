//! # keytype-core
//!
//! Shared library for keytype containing the keycode enumeration, the
//! character-to-keycode table for the reference keyboard layout, the key event
//! record and its wire codec, and the named command set.
//!
//! This crate has zero dependencies on OS APIs or device handles.  Everything
//! in it is a pure function or an immutable table, so it can be tested on any
//! platform.
//!
//! # Architecture overview (for beginners)
//!
//! keytype types text by pretending to be a keyboard.  The kernel does not know
//! about characters: it only knows that "the key in position 30 went down" and
//! "the key in position 30 went up".  Turning the character `'A'` into key
//! events therefore needs three pieces of knowledge, one per module:
//!
//! - **`keymap`** – Which physical key produces a character on the reference
//!   layout ("English (US, international with dead keys)"), whether SHIFT must
//!   be held, and which keys are dead keys.
//!
//! - **`protocol`** – What a single key event looks like (`PRESS`, `RELEASE`,
//!   `SYNC`) and how it is laid out byte-for-byte when written to the device.
//!
//! - **`domain`** – The small closed set of named commands (`BACK`, `RETURN`,
//!   `TAB`) that bypass the character table entirely.

pub mod domain;
pub mod keymap;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `keytype_core::Keycode` instead of `keytype_core::keymap::keycode::Keycode`.
pub use domain::command::{Command, ParseCommandError};
pub use keymap::keycode::Keycode;
pub use keymap::us_intl::{is_dead_key, lookup, lookup_level3, CharMapping};
pub use protocol::codec::{decode_event, encode_event, ProtocolError};
pub use protocol::event::{EventKind, KeyEvent};
