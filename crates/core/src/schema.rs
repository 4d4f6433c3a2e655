use crate::errors::{AgendaError, AgendaResult};

/// A logical talk attribute and the sheet column it is read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TalkField {
    Title,
    Description,
    Duration,
    Speaker,
    Bio,
    PersonalPage,
}

impl TalkField {
    pub const ALL: [TalkField; 6] = [
        Self::Title,
        Self::Description,
        Self::Duration,
        Self::Speaker,
        Self::Bio,
        Self::PersonalPage,
    ];

    /// Header text expected verbatim in the first row.
    pub fn column_title(self) -> &'static str {
        match self {
            Self::Title => "Talk title",
            Self::Description => "Talk description",
            Self::Duration => "Length of the talk",
            Self::Speaker => "Speaker name",
            Self::Bio => "Speaker description",
            Self::PersonalPage => "URL of personal page",
        }
    }

    /// Name the field is exposed under in templates.
    pub fn key(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Duration => "duration",
            Self::Speaker => "speaker",
            Self::Bio => "bio",
            Self::PersonalPage => "personalPage",
        }
    }
}

/// Cell position of every [`TalkField`], resolved from a header row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: [(TalkField, usize); 6],
}

impl ColumnIndex {
    /// Matching is exact and case-sensitive; the first matching column wins.
    pub fn resolve(header: &[String]) -> AgendaResult<Self> {
        let mut positions = [(TalkField::Title, 0); 6];

        for (slot, field) in positions.iter_mut().zip(TalkField::ALL) {
            let title = field.column_title();
            let position = header
                .iter()
                .position(|cell| cell == title)
                .ok_or_else(|| AgendaError::MissingColumn { title: title.to_owned() })?;
            *slot = (field, position);
        }

        Ok(Self { positions })
    }

    pub fn position(&self, field: TalkField) -> usize {
        self.positions.iter().find(|(candidate, _)| *candidate == field).map_or(0, |(_, at)| *at)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TalkField, usize)> + '_ {
        self.positions.iter().copied()
    }

    /// Highest referenced cell position, used to detect truncated rows.
    pub fn max_position(&self) -> usize {
        self.iter().map(|(_, at)| at).max().unwrap_or(0)
    }
}
