//! Virtual keyboard implementations.
//!
//! The uinput device is compiled only on Linux.  The mock and stream devices
//! are available everywhere and are what the tests and dry runs use.

pub mod mock;
pub mod stream;

#[cfg(target_os = "linux")]
pub mod uinput;
