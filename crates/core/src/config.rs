use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::Autoescape;

pub const DEFAULT_CONFIG_FILE: &str = "agenda.toml";
const NESTED_CONFIG_FILE: &str = "config/agenda.toml";

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub render: RenderConfig,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub autoescape: Autoescape,
    /// Terminate the document with a newline when it lacks one.
    pub trailing_newline: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub autoescape: Option<Autoescape>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { autoescape: Autoescape::Extension, trailing_newline: true }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    /// Precedence, lowest first: defaults, config file, environment, overrides.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = resolve_config_path(options.config_path.as_deref()) {
            config.apply_patch(read_patch(&path)?);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        if let Some(render) = patch.render {
            if let Some(autoescape) = render.autoescape {
                self.render.autoescape = autoescape;
            }
            if let Some(trailing_newline) = render.trailing_newline {
                self.render.trailing_newline = trailing_newline;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let log_level = read_env("AGENDA_LOGGING_LEVEL").or_else(|| read_env("AGENDA_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("AGENDA_LOGGING_FORMAT").or_else(|| read_env("AGENDA_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        if let Some(value) = read_env("AGENDA_RENDER_AUTOESCAPE") {
            self.render.autoescape =
                value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                    key: "AGENDA_RENDER_AUTOESCAPE".to_string(),
                    value: value.clone(),
                })?;
        }
        if let Some(value) = read_env("AGENDA_RENDER_TRAILING_NEWLINE") {
            self.render.trailing_newline = parse_bool("AGENDA_RENDER_TRAILING_NEWLINE", &value)?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(autoescape) = overrides.autoescape {
            self.render.autoescape = autoescape;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_logging(&self.logging)
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(NESTED_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.trim().parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    logging: Option<LoggingPatch>,
    render: Option<RenderPatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RenderPatch {
    autoescape: Option<Autoescape>,
    trailing_newline: Option<bool>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
    use crate::render::Autoescape;

    const ENV_KEYS: [&str; 6] = [
        "AGENDA_LOGGING_LEVEL",
        "AGENDA_LOG_LEVEL",
        "AGENDA_LOGGING_FORMAT",
        "AGENDA_LOG_FORMAT",
        "AGENDA_RENDER_AUTOESCAPE",
        "AGENDA_RENDER_TRAILING_NEWLINE",
    ];

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars() {
        for var in ENV_KEYS {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    fn isolated_options(dir: &TempDir) -> LoadOptions {
        // Points away from any agenda.toml in the working directory.
        LoadOptions { config_path: Some(dir.path().join("absent.toml")), ..LoadOptions::default() }
    }

    #[test]
    fn defaults_apply_without_file_or_env() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars();

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let config = AppConfig::load(isolated_options(&dir))
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.logging.level == "info", "default level should be info")?;
        ensure(matches!(config.logging.format, LogFormat::Compact), "default format is compact")?;
        ensure(config.render.autoescape == Autoescape::Extension, "default autoescape by name")?;
        ensure(config.render.trailing_newline, "trailing newline is on by default")
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars();
        env::set_var("AGENDA_LOG_FORMAT", "json");
        env::set_var("AGENDA_RENDER_AUTOESCAPE", "always");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("agenda.toml");
            fs::write(
                &path,
                r#"
[logging]
level = "warn"
format = "pretty"

[render]
autoescape = "never"
trailing_newline = false
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "debug", "override log level should win")?;
            ensure(matches!(config.logging.format, LogFormat::Json), "env format beats file")?;
            ensure(config.render.autoescape == Autoescape::Always, "env autoescape beats file")?;
            ensure(!config.render.trailing_newline, "file value beats default")
        })();

        clear_vars();
        result
    }

    #[test]
    fn required_file_must_exist() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars();

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let options = LoadOptions { require_file: true, ..isolated_options(&dir) };

        match AppConfig::load(options) {
            Err(ConfigError::MissingConfigFile(path)) => {
                ensure(path.ends_with("absent.toml"), "error should name the requested file")
            }
            Err(other) => Err(format!("unexpected error: {other}")),
            Ok(_) => Err("expected missing file failure".to_string()),
        }
    }

    #[test]
    fn invalid_level_fails_validation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars();
        env::set_var("AGENDA_LOGGING_LEVEL", "loud");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let error = match AppConfig::load(isolated_options(&dir)) {
                Ok(_) => return Err("expected validation failure".to_string()),
                Err(error) => error,
            };
            ensure(
                matches!(error, ConfigError::Validation(ref message) if message.contains("logging.level")),
                "validation failure should mention logging.level",
            )
        })();

        clear_vars();
        result
    }

    #[test]
    fn malformed_env_override_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars();
        env::set_var("AGENDA_RENDER_TRAILING_NEWLINE", "maybe");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            ensure(
                matches!(
                    AppConfig::load(isolated_options(&dir)),
                    Err(ConfigError::InvalidEnvOverride { ref key, .. })
                        if key == "AGENDA_RENDER_TRAILING_NEWLINE"
                ),
                "bad boolean should be reported with its key",
            )
        })();

        clear_vars();
        result
    }

    #[test]
    fn unknown_file_keys_are_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars();

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("agenda.toml");
        fs::write(&path, "[render]\nescape = true\n").map_err(|err| err.to_string())?;

        ensure(
            matches!(
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() }),
                Err(ConfigError::ParseFile { .. })
            ),
            "unknown key should fail parsing",
        )
    }
}
