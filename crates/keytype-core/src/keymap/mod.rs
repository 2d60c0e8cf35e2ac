//! Key code tables for the reference keyboard layout.
//!
//! [`keycode`] enumerates the kernel keycodes, [`us_intl`] maps characters of
//! the "English (US, international with dead keys)" layout onto them.

pub mod keycode;
pub mod us_intl;

pub use keycode::Keycode;
pub use us_intl::{is_dead_key, lookup, lookup_level3, referenced_keycodes, CharMapping};
