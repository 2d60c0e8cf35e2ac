//! Infrastructure layer: the concrete virtual keyboards and the config file.
//!
//! - **`keyboard`** – [`VirtualKeyboard`](crate::application::emit_events::VirtualKeyboard)
//!   implementations: uinput on Linux, an in-memory recorder and a byte stream.
//! - **`config`** – Loading and saving `config.toml`.

pub mod config;
pub mod keyboard;
