pub mod render;

use agenda_core::{AgendaError, ConfigError};

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_TEMPLATE: u8 = 3;
pub const EXIT_INPUT: u8 = 4;
pub const EXIT_SCHEMA: u8 = 5;

/// Outcome of one command. `output` is written to stdout only on success.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
    pub error_class: Option<&'static str>,
    pub message: Option<String>,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self { exit_code: EXIT_OK, output: output.into(), error_class: None, message: None }
    }

    pub fn failure(error_class: &'static str, message: impl Into<String>, exit_code: u8) -> Self {
        Self {
            exit_code,
            output: String::new(),
            error_class: Some(error_class),
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == EXIT_OK
    }
}

impl From<&AgendaError> for CommandResult {
    fn from(error: &AgendaError) -> Self {
        let class = error.error_class();
        let exit_code = match class {
            "template" => EXIT_TEMPLATE,
            "input" => EXIT_INPUT,
            "schema" => EXIT_SCHEMA,
            _ => EXIT_FAILURE,
        };
        Self::failure(class, error.to_string(), exit_code)
    }
}

impl From<&ConfigError> for CommandResult {
    fn from(error: &ConfigError) -> Self {
        Self::failure("config_validation", format!("config validation failed: {error}"), EXIT_CONFIG)
    }
}
