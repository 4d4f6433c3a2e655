//! Non-fatal findings raised while converting a submission sheet.
//!
//! Components report through a [`DiagnosticSink`] instead of writing to the
//! console, so the warnings can be asserted on in tests and routed to the
//! log stream (never standard output) by the binary.

use std::fmt;

use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// A quote survived sanitization and reaches the parser as a literal.
    UnescapedQuote { quote: char },
    /// A talk's duration does not look like `45min`.
    DurationMismatch { title: String, duration: String, pattern: String },
}

impl Diagnostic {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::UnescapedQuote { .. } => "agenda.sanitize.unescaped_quote",
            Self::DurationMismatch { .. } => "agenda.validate.duration_mismatch",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnescapedQuote { quote } => write!(
                f,
                "there is an unescaped quote ({quote}) inside a cell. It is kept as a literal \
                 character. Change to something else (e.g. a curly quote) if that's a problem."
            ),
            Self::DurationMismatch { title, duration, pattern } => write!(
                f,
                "talk duration `{duration}` of `{title}` does not match pattern {pattern}"
            ),
        }
    }
}

pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Keeps every diagnostic in arrival order.
#[derive(Clone, Debug, Default)]
pub struct CollectingSink {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_inner(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Emits each diagnostic as a `WARN` event and remembers it.
#[derive(Debug, Default)]
pub struct TracingSink {
    collected: CollectingSink,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warning_count(&self) -> usize {
        self.collected.len()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.collected.into_inner()
    }
}

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        warn!(event_name = diagnostic.event_name(), "{diagnostic}");
        self.collected.report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::{CollectingSink, Diagnostic, DiagnosticSink, TracingSink};

    #[test]
    fn collecting_sink_preserves_order() {
        let mut sink = CollectingSink::new();
        sink.report(Diagnostic::UnescapedQuote { quote: '"' });
        sink.report(Diagnostic::DurationMismatch {
            title: "Intro".to_owned(),
            duration: "45 minutes".to_owned(),
            pattern: "^[0-9]+min$".to_owned(),
        });

        assert_eq!(sink.len(), 2);
        assert!(matches!(sink.diagnostics()[0], Diagnostic::UnescapedQuote { .. }));
        assert!(matches!(sink.diagnostics()[1], Diagnostic::DurationMismatch { .. }));
    }

    #[test]
    fn tracing_sink_counts_without_a_subscriber() {
        let mut sink = TracingSink::new();
        sink.report(Diagnostic::UnescapedQuote { quote: '"' });

        assert_eq!(sink.warning_count(), 1);
        assert_eq!(sink.into_diagnostics(), vec![Diagnostic::UnescapedQuote { quote: '"' }]);
    }

    #[test]
    fn duration_mismatch_message_names_value_and_pattern() {
        let message = Diagnostic::DurationMismatch {
            title: "Intro".to_owned(),
            duration: "45 minutes".to_owned(),
            pattern: "^[0-9]+min$".to_owned(),
        }
        .to_string();

        assert!(message.contains("45 minutes"));
        assert!(message.contains("^[0-9]+min$"));
    }
}
