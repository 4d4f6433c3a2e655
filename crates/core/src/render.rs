//! Rendering of an [`Agenda`] through a user supplied Tera template.
//!
//! The template sees one variable, `talks`, holding every talk in sheet
//! order, e.g. `{% for talk in talks %}{{ talk.title }}{% endfor %}`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use tracing::debug;

use crate::agenda::Agenda;
use crate::errors::{AgendaError, AgendaResult};

const FALLBACK_TEMPLATE_NAME: &str = "agenda";

/// When HTML escaping is applied to substituted values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Autoescape {
    /// Escape only templates named `*.html`, `*.htm` or `*.xml`.
    #[default]
    Extension,
    Always,
    Never,
}

impl std::str::FromStr for Autoescape {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "extension" => Ok(Self::Extension),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => {
                Err(format!("unsupported autoescape mode `{other}` (expected extension|always|never)"))
            }
        }
    }
}

/// A compiled template, loaded once and rendered once per run.
#[derive(Clone, Debug)]
pub struct AgendaTemplate {
    tera: Tera,
    name: String,
}

impl AgendaTemplate {
    pub fn from_file(path: &Path, autoescape: Autoescape) -> AgendaResult<Self> {
        let source = fs::read_to_string(path)
            .map_err(|source| AgendaError::TemplateRead { path: path.to_path_buf(), source })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| FALLBACK_TEMPLATE_NAME.to_owned());

        debug!(event_name = "agenda.template.loaded", path = %path.display(), "template read");
        Self::from_source(&name, &source, autoescape)
    }

    pub fn from_source(name: &str, source: &str, autoescape: Autoescape) -> AgendaResult<Self> {
        let mut tera = Tera::default();
        match autoescape {
            Autoescape::Extension => {}
            Autoescape::Always => tera.autoescape_on(vec![""]),
            Autoescape::Never => tera.autoescape_on(vec![]),
        }

        tera.add_raw_template(name, source)
            .map_err(|source| AgendaError::TemplateCompile { name: name.to_owned(), source })?;

        Ok(Self { tera, name: name.to_owned() })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render(&self, agenda: &Agenda) -> AgendaResult<String> {
        let render_error =
            |source: tera::Error| AgendaError::Render { name: self.name.clone(), source };
        let context = Context::from_serialize(agenda).map_err(render_error)?;
        self.tera.render(&self.name, &context).map_err(render_error)
    }
}
