//! keytype command-line host.
//!
//! Opens one virtual keyboard, runs the requested action against it and
//! destroys the device on exit.
//!
//! # Usage
//!
//! ```text
//! keytype [OPTIONS] <COMMAND>
//!
//! Commands:
//!   text <TEXT>      Type TEXT
//!   press <COMMAND>  Press BACK, RETURN or TAB
//!   repl             Read `text <payload>` / `press <COMMAND>` lines from stdin
//!   init-config      Write the effective configuration to the config file
//!
//! Options:
//!   --config <PATH>       Config file [default: $XDG_CONFIG_HOME/keytype/config.toml]
//!   --device <PATH>       uinput node, overrides [device].path
//!   --dry-run             Write events to stdout instead of a device
//!   --format <FORMAT>     Dry-run record format: binary | json [default: json]
//!   --log-level <LEVEL>   Overrides [logging].log_level
//! ```
//!
//! # Log level precedence
//!
//! `RUST_LOG` wins when set, then `--log-level`, then the config file.
//! Logs go to stderr so a dry run's stdout carries nothing but events.
//!
//! # Bytes, not strings
//!
//! Text reaches the typist as raw bytes.  Neither the `text` argument nor
//! repl input has to be valid UTF-8: a byte sequence the layout cannot type
//! is skipped with a warning and the rest is still typed.
//!
//! # Repl mode
//!
//! `repl` keeps a single device for the whole session, which avoids paying
//! the settle delay once per request:
//!
//! ```text
//! $ printf 'text Hello, world!\npress RETURN\n' | keytype repl
//! ```

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use keytype::application::emit_events::VirtualKeyboard;
use keytype::application::session::TypingSession;
use keytype::infrastructure::config::{self, AppConfig};
use keytype::infrastructure::keyboard::stream::{RecordFormat, StreamKeyboard};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Types text and named commands through a virtual keyboard.
#[derive(Debug, Parser)]
#[command(name = "keytype", version)]
struct Cli {
    /// Path of the config file.
    #[arg(long, env = "KEYTYPE_CONFIG")]
    config: Option<PathBuf>,

    /// uinput device node.
    #[arg(long, env = "KEYTYPE_DEVICE")]
    device: Option<PathBuf>,

    /// Write events to stdout instead of creating a device.
    #[arg(long)]
    dry_run: bool,

    /// Record format used by `--dry-run`.
    #[arg(long, value_enum, default_value_t = RecordFormat::Json)]
    format: RecordFormat,

    /// Log level when `RUST_LOG` is unset.
    #[arg(long, env = "KEYTYPE_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Type TEXT.
    Text { text: OsString },
    /// Press a named command: BACK, RETURN or TAB.
    Press { command: String },
    /// Read requests from stdin, one per line.
    Repl,
    /// Write the effective configuration (file plus overrides) to the config file.
    InitConfig {
        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Loads the config file and applies the command-line overrides.
    fn load_config(&self) -> anyhow::Result<AppConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::load_config_from(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => config::load_config().context("loading config")?,
        };
        if let Some(device) = &self.device {
            cfg.device.path = device.clone();
        }
        if let Some(level) = &self.log_level {
            cfg.logging.log_level = level.clone();
        }
        Ok(cfg)
    }

    /// `--config`, or the default location.
    fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => config::config_file_path().context("locating config file"),
        }
    }
}

/// The bytes of a command-line argument, exactly as passed.
#[cfg(unix)]
fn arg_bytes(arg: &OsStr) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(arg.as_bytes())
}

/// The bytes of a command-line argument; unrepresentable parts become U+FFFD.
#[cfg(not(unix))]
fn arg_bytes(arg: &OsStr) -> Cow<'_, [u8]> {
    match arg.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}

// ── Repl requests ─────────────────────────────────────────────────────────────

/// One parsed stdin line.
#[derive(Debug, PartialEq, Eq)]
enum Request<'a> {
    Text(&'a [u8]),
    Press(&'a [u8]),
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Parses `text <payload>` or `press <COMMAND>`.
///
/// The payload is everything after the first space, inner and trailing
/// spaces included, in whatever encoding it arrived.  Blank lines yield
/// `Ok(None)`.
fn parse_request(line: &[u8]) -> Result<Option<Request<'_>>, String> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    if line.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let (verb, rest) = match line.iter().position(|&b| b == b' ') {
        Some(space) => (&line[..space], &line[space + 1..]),
        None => (line, &line[line.len()..]),
    };
    match verb {
        b"text" => Ok(Some(Request::Text(rest))),
        b"press" => Ok(Some(Request::Press(trim_ascii(rest)))),
        other => Err(format!(
            "unknown request {:?}; expected `text` or `press`",
            String::from_utf8_lossy(other)
        )),
    }
}

/// Runs every request in `input` against `session`.
///
/// Only a failing read ends the loop; bad requests are logged and skipped.
fn run_repl(session: &TypingSession, input: impl BufRead) -> anyhow::Result<()> {
    for (number, line) in input.split(b'\n').enumerate() {
        let line = line.context("reading stdin")?;
        match parse_request(&line) {
            Ok(Some(Request::Text(text))) => session.text(text),
            Ok(Some(Request::Press(command))) => session.press(&String::from_utf8_lossy(command)),
            Ok(None) => {}
            Err(e) => warn!(line = number + 1, "{e}"),
        }
    }
    Ok(())
}

// ── Config file ───────────────────────────────────────────────────────────────

/// Writes `cfg` to `path`, refusing to replace an existing file unless `force`.
fn init_config(path: &Path, cfg: &AppConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists; pass --force to replace it", path.display());
    }
    config::save_config_to(path, cfg)
        .with_context(|| format!("writing config to {}", path.display()))?;
    info!(path = %path.display(), "config written");
    Ok(())
}

// ── Device ────────────────────────────────────────────────────────────────────

fn open_device(cli: &Cli, cfg: &AppConfig) -> anyhow::Result<Arc<dyn VirtualKeyboard>> {
    if cli.dry_run {
        info!(format = ?cli.format, "dry run: writing events to stdout");
        return Ok(Arc::new(StreamKeyboard::new(std::io::stdout(), cli.format)));
    }
    open_uinput(cfg)
}

#[cfg(target_os = "linux")]
fn open_uinput(cfg: &AppConfig) -> anyhow::Result<Arc<dyn VirtualKeyboard>> {
    use keytype::infrastructure::keyboard::uinput::UinputKeyboard;

    let keyboard = UinputKeyboard::open(&cfg.device)
        .with_context(|| format!("creating virtual keyboard on {}", cfg.device.path.display()))?;
    // Give the desktop time to attach to the new device.
    std::thread::sleep(cfg.device.settle_delay());
    Ok(Arc::new(keyboard))
}

#[cfg(not(target_os = "linux"))]
fn open_uinput(_cfg: &AppConfig) -> anyhow::Result<Arc<dyn VirtualKeyboard>> {
    anyhow::bail!("uinput devices are only available on Linux; use --dry-run")
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = cli.load_config()?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.log_level)),
        )
        .init();

    if let Action::InitConfig { force } = &cli.action {
        return init_config(&cli.config_path()?, &cfg, *force);
    }

    let device = open_device(&cli, &cfg)?;
    let session = TypingSession::new(device);

    match &cli.action {
        Action::Text { text } => session.text(&arg_bytes(text)),
        Action::Press { command } => session.press(command),
        Action::Repl => run_repl(&session, std::io::stdin().lock())?,
        Action::InitConfig { .. } => {}
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use keytype::infrastructure::keyboard::mock::MockKeyboard;
    use keytype_core::{KeyEvent, Keycode};
    use std::io::Cursor;

    fn tap(key: Keycode) -> Vec<KeyEvent> {
        vec![KeyEvent::press(key), KeyEvent::release(key), KeyEvent::sync()]
    }

    fn scratch_config(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("keytype-main-test-{}", std::process::id()))
            .join(name)
            .join("config.toml")
    }

    // ── Arguments ─────────────────────────────────────────────────────────────

    #[test]
    fn test_cli_parses_text_action() {
        // Arrange / Act
        let cli = Cli::parse_from(["keytype", "text", "Hi there!"]);

        // Assert
        assert!(matches!(cli.action, Action::Text { ref text } if text == "Hi there!"));
        assert!(!cli.dry_run);
        assert_eq!(cli.format, RecordFormat::Json);
    }

    #[test]
    fn test_cli_parses_dry_run_binary_press() {
        let cli = Cli::parse_from([
            "keytype", "--dry-run", "--format", "binary", "press", "RETURN",
        ]);

        assert!(cli.dry_run);
        assert_eq!(cli.format, RecordFormat::Binary);
        assert!(matches!(cli.action, Action::Press { ref command } if command == "RETURN"));
    }

    #[cfg(unix)]
    #[test]
    fn test_text_argument_keeps_non_utf8_bytes() {
        use std::os::unix::ffi::OsStrExt;

        // Arrange
        let raw = OsStr::from_bytes(b"a\x82b");

        // Act
        let cli = Cli::parse_from([OsStr::new("keytype"), OsStr::new("text"), raw]);

        // Assert
        let Action::Text { text } = &cli.action else {
            panic!("expected the text action, got {:?}", cli.action);
        };
        assert_eq!(arg_bytes(text).as_ref(), b"a\x82b");
    }

    #[test]
    fn test_cli_overrides_win_over_config_file() {
        // Arrange: point --config at a file that does not exist so defaults load
        let cli = Cli::parse_from([
            "keytype",
            "--config",
            "/nonexistent/keytype/config.toml",
            "--device",
            "/dev/uinput-test",
            "--log-level",
            "trace",
            "repl",
        ]);

        // Act
        let cfg = cli.load_config().unwrap();

        // Assert
        assert_eq!(cfg.device.path, PathBuf::from("/dev/uinput-test"));
        assert_eq!(cfg.logging.log_level, "trace");
        assert_eq!(cfg.device.name, "keytype");
    }

    // ── Repl requests ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_request_keeps_payload_spaces() {
        assert_eq!(
            parse_request(b"text  two  spaces ").unwrap(),
            Some(Request::Text(b" two  spaces "))
        );
    }

    #[test]
    fn test_parse_request_press_and_blank_lines() {
        assert_eq!(parse_request(b"press TAB\r").unwrap(), Some(Request::Press(b"TAB")));
        assert_eq!(parse_request(b"   ").unwrap(), None);
        assert_eq!(parse_request(b"text").unwrap(), Some(Request::Text(b"")));
    }

    #[test]
    fn test_parse_request_passes_invalid_utf8_through() {
        assert_eq!(
            parse_request(b"text a\x82b").unwrap(),
            Some(Request::Text(b"a\x82b"))
        );
    }

    #[test]
    fn test_parse_request_rejects_unknown_verb() {
        assert!(parse_request(b"type hello").is_err());
        assert!(parse_request(b"\xFFtext hello").is_err());
    }

    #[test]
    fn test_repl_survives_invalid_utf8_and_types_later_lines() {
        // Arrange
        let keyboard = Arc::new(MockKeyboard::new());
        let session = TypingSession::new(Arc::clone(&keyboard) as Arc<dyn VirtualKeyboard>);
        let input = Cursor::new(b"text a\x82b\nbogus\ntext c\npress RETURN\n".to_vec());

        // Act
        run_repl(&session, input).unwrap();

        // Assert: the stray byte and the bogus line are skipped, nothing else is
        let mut expected = tap(Keycode::KeyA);
        expected.extend(tap(Keycode::KeyB));
        expected.extend(tap(Keycode::KeyC));
        expected.extend(tap(Keycode::Enter));
        assert_eq!(keyboard.events(), expected);
    }

    // ── Config file ───────────────────────────────────────────────────────────

    #[test]
    fn test_init_config_writes_a_loadable_file() {
        // Arrange
        let path = scratch_config("init");
        let mut cfg = AppConfig::default();
        cfg.device.settle_delay_ms = 50;

        // Act
        init_config(&path, &cfg, false).unwrap();

        // Assert
        assert_eq!(config::load_config_from(&path).unwrap(), cfg);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_init_config_refuses_to_overwrite_without_force() {
        let path = scratch_config("overwrite");
        init_config(&path, &AppConfig::default(), false).unwrap();

        let mut changed = AppConfig::default();
        changed.logging.log_level = "warn".to_string();

        assert!(init_config(&path, &changed, false).is_err());
        assert_eq!(config::load_config_from(&path).unwrap(), AppConfig::default());

        init_config(&path, &changed, true).unwrap();
        assert_eq!(config::load_config_from(&path).unwrap(), changed);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
