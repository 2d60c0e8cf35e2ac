//! TOML-based configuration for keytype.
//!
//! The file lives at `$XDG_CONFIG_HOME/keytype/config.toml`, falling back to
//! `~/.config/keytype/config.toml`.  A missing file is not an error: every
//! field has a default, so keytype runs out of the box.
//!
//! ```toml
//! [device]
//! path = "/dev/uinput"
//! name = "keytype"
//! key_capabilities = "mapped"
//! settle_delay_ms = 300
//!
//! [logging]
//! log_level = "debug"
//! ```
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent, and `#[serde(default)]` on a
//! section lets the whole section be omitted.  A file containing only
//! `[logging]` therefore still yields a complete device configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use keytype_core::keymap::referenced_keycodes;
use keytype_core::Keycode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which keycodes the virtual keyboard advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyCapabilities {
    /// Every keycode from 0 to 255.
    #[default]
    All,
    /// Only the keycodes keytype can actually emit.
    Mapped,
}

impl KeyCapabilities {
    /// The keycodes to enable on the device, in ascending order.
    pub fn keycodes(self) -> Vec<u16> {
        match self {
            Self::All => (0..=255).collect(),
            Self::Mapped => referenced_keycodes().into_iter().map(Keycode::code).collect(),
        }
    }
}

/// Virtual keyboard settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    /// uinput character device.
    #[serde(default = "default_device_path")]
    pub path: PathBuf,
    /// Device name shown by `libinput list-devices` and friends.  At most 79
    /// bytes are registered.
    #[serde(default = "default_device_name")]
    pub name: String,
    #[serde(default = "default_id")]
    pub vendor: u16,
    #[serde(default = "default_id")]
    pub product: u16,
    #[serde(default = "default_id")]
    pub version: u16,
    #[serde(default)]
    pub key_capabilities: KeyCapabilities,
    /// Pause after registering the device so the desktop can attach to it
    /// before the first key arrives.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl DeviceConfig {
    /// [`Self::settle_delay_ms`] as a [`Duration`].
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_device_path() -> PathBuf {
    PathBuf::from("/dev/uinput")
}
fn default_device_name() -> String {
    "keytype".to_string()
}
fn default_id() -> u16 {
    0x1
}
fn default_settle_delay_ms() -> u64 {
    200
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            path: default_device_path(),
            name: default_device_name(),
            vendor: default_id(),
            product: default_id(),
            version: default_id(),
            key_capabilities: KeyCapabilities::default(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the directory holding the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when neither
/// `XDG_CONFIG_HOME` nor `HOME` is set.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok_or(ConfigError::NoPlatformConfigDir)?;
    Ok(base.join("keytype"))
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads the config from its default location.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("keytype-config-test-{}", std::process::id()))
            .join(name)
            .join("config.toml")
    }

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_device_config_defaults_match_kernel_registration() {
        // Arrange / Act
        let cfg = DeviceConfig::default();

        // Assert
        assert_eq!(cfg.path, PathBuf::from("/dev/uinput"));
        assert_eq!(cfg.name, "keytype");
        assert_eq!((cfg.vendor, cfg.product, cfg.version), (1, 1, 1));
        assert_eq!(cfg.key_capabilities, KeyCapabilities::All);
        assert_eq!(cfg.settle_delay(), Duration::from_millis(200));
    }

    #[test]
    fn test_logging_default_is_info() {
        assert_eq!(LoggingConfig::default().log_level, "info");
    }

    // ── Key capabilities ──────────────────────────────────────────────────────

    #[test]
    fn test_all_capabilities_cover_the_first_256_codes() {
        let codes = KeyCapabilities::All.keycodes();
        assert_eq!(codes.len(), 256);
        assert_eq!(codes.first(), Some(&0));
        assert_eq!(codes.last(), Some(&255));
    }

    #[test]
    fn test_mapped_capabilities_include_modifiers_and_commands() {
        let codes = KeyCapabilities::Mapped.keycodes();
        for key in [
            Keycode::LeftShift,
            Keycode::RightAlt,
            Keycode::Space,
            Keycode::Backspace,
            Keycode::Enter,
            Keycode::Tab,
            Keycode::Digit5,
        ] {
            assert!(codes.contains(&key.code()), "{key:?} not enabled");
        }
        assert!(codes.windows(2).all(|w| w[0] < w[1]), "codes must be sorted and unique");
    }

    // ── TOML parsing ──────────────────────────────────────────────────────────

    #[test]
    fn test_empty_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_partial_device_section_overrides_defaults() {
        // Arrange
        let toml_str = r#"
[device]
name = "my-typer"
key_capabilities = "mapped"
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.device.name, "my-typer");
        assert_eq!(cfg.device.key_capabilities, KeyCapabilities::Mapped);
        // Unspecified fields keep their defaults
        assert_eq!(cfg.device.path, PathBuf::from("/dev/uinput"));
        assert_eq!(cfg.device.settle_delay_ms, 200);
        assert_eq!(cfg.logging.log_level, "info");
    }

    #[test]
    fn test_unknown_capability_is_a_parse_error() {
        let toml_str = "[device]\nkey_capabilities = \"some\"\n";
        let result: Result<AppConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_toml_returns_parse_error() {
        let result: Result<AppConfig, toml::de::Error> = toml::from_str("[[[ not valid toml");
        assert!(result.is_err());
    }

    // ── Files ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_missing_file_loads_defaults() {
        let cfg = load_config_from(&scratch_path("missing")).expect("missing file is fine");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        // Arrange
        let path = scratch_path("round-trip");
        let mut cfg = AppConfig::default();
        cfg.device.settle_delay_ms = 0;
        cfg.device.key_capabilities = KeyCapabilities::Mapped;
        cfg.logging.log_level = "debug".to_string();

        // Act
        save_config_to(&path, &cfg).expect("save");
        let restored = load_config_from(&path).expect("load");

        // Assert
        assert_eq!(restored, cfg);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_malformed_file_returns_parse_error() {
        let path = scratch_path("malformed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[device\n").unwrap();

        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
