use std::path::PathBuf;

use thiserror::Error;

pub type AgendaResult<T> = Result<T, AgendaError>;

#[derive(Debug, Error)]
pub enum AgendaError {
    #[error("could not read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse tab-separated input: {0}")]
    Parse(#[from] csv::Error),
    #[error("input contains no header row")]
    EmptyInput,
    #[error("Missing column title: {title}")]
    MissingColumn { title: String },
    #[error("could not read template `{path}`: {source}")]
    TemplateRead { path: PathBuf, source: std::io::Error },
    #[error("could not compile template `{name}`: {source}")]
    TemplateCompile { name: String, source: tera::Error },
    #[error("could not render template `{name}`: {source}")]
    Render { name: String, source: tera::Error },
    #[error("could not serialize agenda: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl AgendaError {
    /// Stable snake_case classification used for exit codes and log fields.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Io(_) | Self::Parse(_) | Self::EmptyInput => "input",
            Self::MissingColumn { .. } => "schema",
            Self::TemplateRead { .. } | Self::TemplateCompile { .. } | Self::Render { .. } => {
                "template"
            }
            Self::Serialize(_) => "serialization",
        }
    }
}
