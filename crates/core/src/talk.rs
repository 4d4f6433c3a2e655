use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::parse::Row;
use crate::schema::{ColumnIndex, TalkField};

pub const DURATION_PATTERN: &str = "^[0-9]+min$";

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DURATION_PATTERN).expect("duration pattern is a valid regex"));

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Talk {
    pub title: String,
    pub description: String,
    pub duration: String,
    pub speaker: String,
    pub bio: String,
    #[serde(rename = "personalPage")]
    pub personal_page: String,
}

impl Talk {
    /// Copies the mapped cells verbatim. Cells past the end of a short row
    /// read as empty strings.
    pub fn from_row(index: &ColumnIndex, row: &[String]) -> Self {
        let mut talk = Self::default();
        for (field, position) in index.iter() {
            let value = row.get(position).cloned().unwrap_or_default();
            *talk.field_mut(field) = value;
        }
        talk
    }

    pub fn field(&self, field: TalkField) -> &str {
        match field {
            TalkField::Title => &self.title,
            TalkField::Description => &self.description,
            TalkField::Duration => &self.duration,
            TalkField::Speaker => &self.speaker,
            TalkField::Bio => &self.bio,
            TalkField::PersonalPage => &self.personal_page,
        }
    }

    fn field_mut(&mut self, field: TalkField) -> &mut String {
        match field {
            TalkField::Title => &mut self.title,
            TalkField::Description => &mut self.description,
            TalkField::Duration => &mut self.duration,
            TalkField::Speaker => &mut self.speaker,
            TalkField::Bio => &mut self.bio,
            TalkField::PersonalPage => &mut self.personal_page,
        }
    }

    pub fn has_valid_duration(&self) -> bool {
        DURATION_RE.is_match(&self.duration)
    }
}

/// Reports a duration that is not written like `45min`. Never rejects.
pub fn validate_duration(talk: &Talk, sink: &mut dyn DiagnosticSink) {
    if !talk.has_valid_duration() {
        sink.report(Diagnostic::DurationMismatch {
            title: talk.title.clone(),
            duration: talk.duration.clone(),
            pattern: DURATION_PATTERN.to_owned(),
        });
    }
}

/// Builds one talk per non-empty row, keeping input order.
pub fn build_talks(index: &ColumnIndex, rows: &[Row], sink: &mut dyn DiagnosticSink) -> Vec<Talk> {
    let required_len = index.max_position() + 1;

    rows.iter()
        .enumerate()
        .filter(|(_, row)| !row.is_empty())
        .map(|(offset, row)| {
            if row.len() < required_len {
                debug!(
                    event_name = "agenda.build.short_row",
                    data_row = offset + 1,
                    cells = row.len(),
                    expected = required_len,
                    "row is shorter than the header; missing cells read as empty"
                );
            }
            let talk = Talk::from_row(index, row);
            validate_duration(&talk, sink);
            talk
        })
        .collect()
}
