//! PressCommandUseCase: taps the key bound to a named command.
//!
//! Commands skip the character table and all modifier logic: each one is a
//! single tap on a fixed key.

use keytype_core::Command;
use tracing::debug;

use super::emit_events::EventEmitter;
use super::type_text::TypingError;

/// The Press Command use case.
pub struct PressCommandUseCase {
    emitter: EventEmitter,
}

impl PressCommandUseCase {
    /// Creates a new use case writing through `emitter`.
    pub fn new(emitter: EventEmitter) -> Self {
        Self { emitter }
    }

    /// Parses `name` and taps the command's key.
    ///
    /// # Errors
    ///
    /// Returns [`TypingError::UnknownCommand`] (and emits nothing) for any
    /// token other than `BACK`, `RETURN` or `TAB`, or [`TypingError::Device`]
    /// if a write fails.
    pub fn dispatch(&self, name: &str) -> Result<(), TypingError> {
        let command: Command = name
            .parse()
            .map_err(|_| TypingError::UnknownCommand(name.to_string()))?;
        self.press(command)
    }

    /// Taps the key bound to `command`.
    ///
    /// # Errors
    ///
    /// Returns [`TypingError::Device`] if a write fails.
    pub fn press(&self, command: Command) -> Result<(), TypingError> {
        debug!(%command, key = ?command.keycode(), "pressing command");
        self.emitter.tap(command.keycode())?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::emit_events::MockVirtualKeyboard;
    use keytype_core::{KeyEvent, Keycode};
    use std::sync::Arc;

    fn use_case_expecting_tap(key: Keycode) -> PressCommandUseCase {
        let mut mock = MockVirtualKeyboard::new();
        let mut seq = mockall::Sequence::new();
        for expected in [KeyEvent::press(key), KeyEvent::release(key), KeyEvent::sync()] {
            mock.expect_emit()
                .withf(move |ev| *ev == expected)
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));
        }
        PressCommandUseCase::new(EventEmitter::new(Arc::new(mock)))
    }

    #[test]
    fn test_back_taps_backspace() {
        use_case_expecting_tap(Keycode::Backspace)
            .dispatch("BACK")
            .unwrap();
    }

    #[test]
    fn test_return_taps_enter() {
        use_case_expecting_tap(Keycode::Enter)
            .dispatch("RETURN")
            .unwrap();
    }

    #[test]
    fn test_tab_taps_tab() {
        use_case_expecting_tap(Keycode::Tab).dispatch("TAB").unwrap();
    }

    #[test]
    fn test_unknown_command_emits_nothing() {
        // Arrange: any emit call would panic because no expectation is set
        let mock = MockVirtualKeyboard::new();
        let uc = PressCommandUseCase::new(EventEmitter::new(Arc::new(mock)));

        // Act
        let err = uc.dispatch("left").unwrap_err();

        // Assert
        assert!(matches!(err, TypingError::UnknownCommand(ref name) if name == "left"));
    }

    #[test]
    fn test_lowercase_token_is_unknown() {
        let uc = PressCommandUseCase::new(EventEmitter::new(Arc::new(MockVirtualKeyboard::new())));
        assert!(matches!(uc.dispatch("return"), Err(TypingError::UnknownCommand(_))));
    }
}
