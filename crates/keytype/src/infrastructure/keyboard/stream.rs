//! A virtual keyboard that writes event records to any byte stream.
//!
//! Used for dry runs (`keytype --dry-run`) and for capturing exactly what
//! would reach the kernel without touching `/dev/uinput`.
//!
//! Two output formats are supported:
//!
//! | Format   | Per event                                            |
//! |----------|------------------------------------------------------|
//! | `binary` | the 8-byte `{type, code, value}` record, native order |
//! | `json`   | one JSON object per line, e.g. `{"kind":"press","key":"KeyA"}` |

use std::io::Write;
use std::sync::Mutex;

use keytype_core::{encode_event, KeyEvent};

use crate::application::emit_events::{DeviceError, VirtualKeyboard};

/// Output format of a [`StreamKeyboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RecordFormat {
    /// Raw 8-byte event records.
    Binary,
    /// One JSON object per line.
    #[default]
    Json,
}

/// Writes each event to `W` as soon as it is emitted.
pub struct StreamKeyboard<W: Write + Send> {
    writer: Mutex<W>,
    format: RecordFormat,
}

impl<W: Write + Send> StreamKeyboard<W> {
    /// Creates a keyboard writing `format` records to `writer`.
    pub fn new(writer: W, format: RecordFormat) -> Self {
        Self {
            writer: Mutex::new(writer),
            format,
        }
    }

    /// Consumes the keyboard and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> VirtualKeyboard for StreamKeyboard<W> {
    fn emit(&self, event: KeyEvent) -> Result<(), DeviceError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| DeviceError::Unavailable("stream writer poisoned".into()))?;

        let written = match self.format {
            RecordFormat::Binary => writer.write_all(&encode_event(&event)),
            RecordFormat::Json => serde_json::to_writer(&mut *writer, &event)
                .map_err(std::io::Error::from)
                .and_then(|()| writer.write_all(b"\n")),
        };
        written
            .and_then(|()| writer.flush())
            .map_err(DeviceError::Write)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
