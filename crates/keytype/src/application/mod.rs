//! Application layer use cases.
//!
//! # What use cases does keytype have?
//!
//! - **`emit_events`** – The [`emit_events::VirtualKeyboard`] port and the
//!   tap primitives every keystroke is built from.
//!
//! - **`type_text`** – Types single characters and whole text buffers,
//!   handling SHIFT, dead keys and AltGr symbols.
//!
//! - **`press_command`** – Taps the key bound to a named command
//!   (`BACK`, `RETURN`, `TAB`).
//!
//! - **`session`** – The fire-and-forget entry points a host calls.

pub mod emit_events;
pub mod press_command;
pub mod session;
pub mod type_text;
