//! keytype library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does keytype do? (for beginners)
//!
//! keytype types text for you by registering a virtual keyboard with the
//! kernel and replaying the key presses a person would make.  Applications
//! receive ordinary key events and cannot tell them apart from a real
//! keyboard.
//!
//! For every request keytype:
//!
//! 1. Splits the text into units: single ASCII bytes and multi-byte
//!    characters.
//! 2. Looks each unit up in the "English (US, international with dead keys)"
//!    table to find the physical key and whether SHIFT or AltGr is needed.
//! 3. Writes PRESS / RELEASE / SYNC events for that key to the device,
//!    wrapping them in modifier presses where needed, and neutralises dead
//!    keys with an extra SPACE so `'` types an apostrophe instead of waiting
//!    to combine with the next letter.
//!
//! Named commands (`BACK`, `RETURN`, `TAB`) skip the table and tap one key.

/// Application layer: the emitter, the typing use cases and the session.
pub mod application;

/// Infrastructure layer: virtual keyboard devices and configuration.
pub mod infrastructure;
