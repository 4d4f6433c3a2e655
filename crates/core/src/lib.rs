pub mod agenda;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod parse;
pub mod render;
pub mod sanitize;
pub mod schema;
pub mod talk;

pub use agenda::Agenda;
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, TracingSink};
pub use errors::{AgendaError, AgendaResult};
pub use parse::{parse_rows, Row};
pub use render::{AgendaTemplate, Autoescape};
pub use sanitize::sanitize_quotes;
pub use schema::{ColumnIndex, TalkField};
pub use talk::{build_talks, validate_duration, Talk, DURATION_PATTERN};
