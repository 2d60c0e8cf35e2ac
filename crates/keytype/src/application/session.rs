//! TypingSession: the fire-and-forget surface a host calls into.
//!
//! A host (the CLI in `main.rs`, or any embedding that owns the device) only
//! ever asks for two things: "type this text" and "press this command".
//! Neither call returns anything.  Problems are reported through `tracing`
//! warnings and never propagate to the host.

use std::sync::Arc;

use tracing::{debug, warn};

use super::emit_events::{EventEmitter, VirtualKeyboard};
use super::press_command::PressCommandUseCase;
use super::type_text::TypeTextUseCase;

/// Owns the use cases wired to one virtual keyboard.
pub struct TypingSession {
    text: TypeTextUseCase,
    commands: PressCommandUseCase,
}

impl TypingSession {
    /// Wires both use cases to `device`.
    pub fn new(device: Arc<dyn VirtualKeyboard>) -> Self {
        let emitter = EventEmitter::new(device);
        Self {
            text: TypeTextUseCase::new(emitter.clone()),
            commands: PressCommandUseCase::new(emitter),
        }
    }

    /// Types `buffer`, best effort.
    pub fn text(&self, buffer: &[u8]) {
        let report = self.text.type_text(buffer);
        if report.is_clean() {
            debug!(units = report.typed, "text typed");
        } else {
            warn!(
                typed = report.typed,
                skipped = report.skipped.len(),
                "text typed with skipped units"
            );
        }
    }

    /// Presses the command named `name`.
    pub fn press(&self, name: &str) {
        if let Err(e) = self.commands.dispatch(name) {
            warn!("could not press {name:?}: {e}");
        }
    }
}
