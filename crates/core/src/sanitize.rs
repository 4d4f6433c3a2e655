use crate::diagnostics::{Diagnostic, DiagnosticSink};

pub const DELIMITER: char = '\t';
pub const QUOTE: char = '"';

/// Repairs quote artifacts left behind by spreadsheet exports.
///
/// Drops one wrapping quote at each end of the blob and every quote that
/// touches a delimiter. Must run on the whole blob before rows are split.
/// Quotes that remain afterwards are reported once and passed through.
pub fn sanitize_quotes(raw: &str, sink: &mut dyn DiagnosticSink) -> String {
    let trimmed = raw.strip_prefix(QUOTE).unwrap_or(raw);
    let trimmed = trimmed.strip_suffix(QUOTE).unwrap_or(trimmed);

    let delimiter = DELIMITER.to_string();
    let sanitized = trimmed
        .replace(&format!("{DELIMITER}{QUOTE}"), &delimiter)
        .replace(&format!("{QUOTE}{DELIMITER}"), &delimiter);

    if sanitized.contains(QUOTE) {
        sink.report(Diagnostic::UnescapedQuote { quote: QUOTE });
    }

    sanitized
}
