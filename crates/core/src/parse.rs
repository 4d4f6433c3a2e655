use csv::ReaderBuilder;

use crate::errors::AgendaResult;
use crate::sanitize::DELIMITER;

pub type Row = Vec<String>;

/// Splits sanitized text into rows of cells.
///
/// Quotes carry no meaning here: the sanitizer has already removed the
/// ones that wrapped cells, so any left over are ordinary characters.
/// Row lengths may differ. Blank lines yield no row.
pub fn parse_rows(text: &str) -> AgendaResult<Vec<Row>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER as u8)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_owned).collect());
    }

    Ok(rows)
}
