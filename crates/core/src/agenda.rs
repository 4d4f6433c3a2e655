use serde::{Deserialize, Serialize};
use tracing::info;

use crate::diagnostics::DiagnosticSink;
use crate::errors::{AgendaError, AgendaResult};
use crate::parse::parse_rows;
use crate::sanitize::sanitize_quotes;
use crate::schema::ColumnIndex;
use crate::talk::{build_talks, Talk};

/// The document handed to the template: `{ talks: [...] }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agenda {
    pub talks: Vec<Talk>,
}

impl Agenda {
    /// Runs the whole conversion over one buffered submission sheet.
    ///
    /// Fails before any talk is built when the header lacks a required
    /// column. Warnings go to `sink` and never abort the conversion.
    pub fn from_tsv(raw: &str, sink: &mut dyn DiagnosticSink) -> AgendaResult<Self> {
        let sanitized = sanitize_quotes(raw, sink);
        let mut rows = parse_rows(&sanitized)?.into_iter();

        let header = rows.next().ok_or(AgendaError::EmptyInput)?;
        let index = ColumnIndex::resolve(&header)?;

        let rows: Vec<_> = rows.collect();
        let talks = build_talks(&index, &rows, sink);
        info!(event_name = "agenda.build.completed", talks = talks.len(), "agenda assembled");

        Ok(Self { talks })
    }

    pub fn to_json_pretty(&self) -> AgendaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
