//! Settings and TOML config file loading.
//!
//! Settings are layered: built-in defaults, then the config file, then
//! command-line overrides. Each layer is a [`FileConfig`] whose `None`
//! fields leave the value underneath untouched.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::debug;

use crate::download::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};

/// Directory name used under the user's config home.
pub const CONFIG_DIR_NAME: &str = "url-downloader";

/// Config file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Protocol prepended to URLs that do not name one.
pub const DEFAULT_PROTOCOL: &str = "http://";

/// Effective settings for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Treat a non-empty selection as the URL to open.
    pub open_selection: bool,
    /// Prefix for URLs that start with neither `http` nor `file`.
    pub default_protocol: String,
    /// Show `[URL: ...]` alongside the opened file.
    pub show_url: bool,
    /// Editor command line; falls back to `$VISUAL` then `$EDITOR`. Quote a
    /// program path that contains spaces.
    pub editor: Option<String>,
    /// Directory for temp files; falls back to the system temp dir.
    pub temp_dir: Option<PathBuf>,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// HTTP read timeout in seconds.
    pub read_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            open_selection: false,
            default_protocol: DEFAULT_PROTOCOL.to_string(),
            show_url: false,
            editor: None,
            temp_dir: None,
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Returns these settings with every value set in `layer` applied on top.
    #[must_use]
    pub fn layered(mut self, layer: &FileConfig) -> Self {
        if let Some(open_selection) = layer.open_selection {
            self.open_selection = open_selection;
        }
        if let Some(default_protocol) = &layer.default_protocol {
            self.default_protocol.clone_from(default_protocol);
        }
        if let Some(show_url) = layer.show_url {
            self.show_url = show_url;
        }
        if let Some(editor) = &layer.editor {
            self.editor = Some(editor.clone());
        }
        if let Some(temp_dir) = &layer.temp_dir {
            self.temp_dir = Some(temp_dir.clone());
        }
        if let Some(secs) = layer.connect_timeout_secs {
            self.connect_timeout_secs = secs;
        }
        if let Some(secs) = layer.read_timeout_secs {
            self.read_timeout_secs = secs;
        }
        self
    }

    /// Directory new temp files are created in.
    #[must_use]
    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(env::temp_dir)
    }
}

/// TOML-backed settings layer. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// See [`Settings::open_selection`].
    pub open_selection: Option<bool>,
    /// See [`Settings::default_protocol`].
    pub default_protocol: Option<String>,
    /// See [`Settings::show_url`].
    pub show_url: Option<bool>,
    /// See [`Settings::editor`].
    pub editor: Option<String>,
    /// See [`Settings::temp_dir`].
    pub temp_dir: Option<PathBuf>,
    /// See [`Settings::connect_timeout_secs`].
    pub connect_timeout_secs: Option<u64>,
    /// See [`Settings::read_timeout_secs`].
    pub read_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Validates config values against runtime constraints.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        if let Some(protocol) = &self.default_protocol
            && !protocol.ends_with("://")
        {
            bail!(
                "Invalid config value for `default_protocol`: '{protocol}'. Expected a scheme prefix such as \"https://\""
            );
        }

        if let Some(editor) = &self.editor
            && editor.trim().is_empty()
        {
            bail!("Invalid config value for `editor`: expected a command, got an empty string");
        }

        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;

        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
    /// Indicates whether configuration was loaded from disk.
    pub loaded_from_file: bool,
}

impl LoadedConfig {
    /// The file layer, or an empty layer when nothing was loaded.
    #[must_use]
    pub fn layer(&self) -> FileConfig {
        self.config.clone().unwrap_or_default()
    }
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/url-downloader/config.toml`
/// 2. `$HOME/.config/url-downloader/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path if present.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read, parsed or
/// validated.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    };

    if !path_ref.exists() {
        debug!(path = %path_ref.display(), "no config file, using defaults");
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    }

    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
        loaded_from_file: true,
    })
}

/// Loads config from an explicitly named file, which must exist.
///
/// # Errors
///
/// Returns an error when the file is missing, unreadable or invalid.
pub fn load_explicit_file_config(path: &Path) -> Result<LoadedConfig> {
    let config = load_file_config(path)?;
    Ok(LoadedConfig {
        path: Some(path.to_path_buf()),
        config: Some(config),
        loaded_from_file: true,
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    let config = parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
    debug!(path = %path.display(), ?config, "loaded config file");
    Ok(config)
}

/// Parses and validates a TOML config document.
///
/// # Errors
///
/// Returns an error for malformed TOML, unknown keys, wrong value types or
/// values that fail [`FileConfig::validate`].
pub fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let config: FileConfig = toml::from_str(raw)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert!(!settings.open_selection);
        assert_eq!(settings.default_protocol, "http://");
        assert!(!settings.show_url);
        assert_eq!(settings.editor, None);
        assert_eq!(settings.connect_timeout_secs, 30);
        assert_eq!(settings.read_timeout_secs, 300);
    }

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str("show_url = true\ndefault_protocol = \"https://\"\n").unwrap();
        assert_eq!(cfg.show_url, Some(true));
        assert_eq!(cfg.default_protocol.as_deref(), Some("https://"));
        assert_eq!(cfg.open_selection, None);
    }

    #[test]
    fn test_parse_config_all_fields() {
        let raw = r#"
            # personal defaults
            open_selection = true
            default_protocol = "https://"
            show_url = true
            editor = "nvim -R"
            temp_dir = "/var/tmp/urls"
            connect_timeout_secs = 5
            read_timeout_secs = 60
        "#;
        let cfg = parse_config_str(raw).unwrap();
        assert_eq!(cfg.editor.as_deref(), Some("nvim -R"));
        assert_eq!(cfg.temp_dir, Some(PathBuf::from("/var/tmp/urls")));
        assert_eq!(cfg.connect_timeout_secs, Some(5));
        assert_eq!(cfg.read_timeout_secs, Some(60));
    }

    #[test]
    fn test_parse_config_rejects_unknown_key() {
        let err = parse_config_str("open_selections = true").unwrap_err();
        assert!(
            format!("{err:#}").contains("open_selections"),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn test_parse_config_rejects_wrong_type() {
        assert!(parse_config_str("show_url = \"yes\"").is_err());
    }

    #[test]
    fn test_parse_config_rejects_bad_protocol() {
        let err = parse_config_str("default_protocol = \"https\"").unwrap_err();
        assert!(err.to_string().contains("default_protocol"), "{err}");
    }

    #[test]
    fn test_parse_config_rejects_out_of_range_timeout() {
        let err = parse_config_str("read_timeout_secs = 0").unwrap_err();
        assert!(err.to_string().contains("read_timeout_secs"), "{err}");
        assert!(parse_config_str("connect_timeout_secs = 3601").is_err());
    }

    #[test]
    fn test_parse_config_rejects_blank_editor() {
        assert!(parse_config_str("editor = \"  \"").is_err());
    }

    #[test]
    fn test_settings_layering_order() {
        let file = FileConfig {
            show_url: Some(true),
            default_protocol: Some("https://".to_string()),
            ..FileConfig::default()
        };
        let cli = FileConfig {
            show_url: Some(false),
            editor: Some("vi".to_string()),
            ..FileConfig::default()
        };
        let settings = Settings::default().layered(&file).layered(&cli);
        assert!(!settings.show_url, "CLI layer wins over file");
        assert_eq!(settings.default_protocol, "https://");
        assert_eq!(settings.editor.as_deref(), Some("vi"));
        assert!(!settings.open_selection, "default kept");
    }

    #[test]
    fn test_settings_temp_dir_fallback() {
        let settings = Settings::default();
        assert_eq!(settings.temp_dir(), env::temp_dir());

        let settings = Settings {
            temp_dir: Some(PathBuf::from("/srv/scratch")),
            ..Settings::default()
        };
        assert_eq!(settings.temp_dir(), PathBuf::from("/srv/scratch"));
    }

    #[test]
    fn test_load_explicit_file_config_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "open_selection = true\n").unwrap();

        let loaded = load_explicit_file_config(&path).unwrap();
        assert!(loaded.loaded_from_file);
        assert_eq!(loaded.layer().open_selection, Some(true));
    }

    #[test]
    fn test_load_explicit_file_config_missing_is_error() {
        let dir = TempDir::new().unwrap();
        let err = load_explicit_file_config(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"), "{err}");
    }
}
