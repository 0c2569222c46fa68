//! Line-oriented journal decoding: one JSON object per line.

use std::io::BufRead;

use thiserror::Error;

use crate::event::Event;

/// Errors raised while decoding journal text.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("line {line}: invalid journal record: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: journal record is not a JSON object")]
    NotAnObject { line: usize },
    #[error("failed to read journal: {0}")]
    Io(#[from] std::io::Error),
}

/// Decode a single line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns an error if the line is not a JSON object.
pub fn decode_line(text: &str, line: usize) -> Result<Option<Event>, JournalError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: serde_json::Value = serde_json::from_str(trimmed)
        .map_err(|source| JournalError::Malformed { line, source })?;
    if !value.is_object() {
        return Err(JournalError::NotAnObject { line });
    }
    Ok(Some(Event::from_value(value)))
}

/// Decode every line, failing on the first malformed record.
///
/// # Errors
///
/// Returns the first decoding or read error encountered.
pub fn read_strict(reader: impl BufRead) -> Result<Vec<Event>, JournalError> {
    let mut events = Vec::new();
    for (idx, text) in reader.lines().enumerate() {
        if let Some(event) = decode_line(&text?, idx + 1)? {
            events.push(event);
        }
    }
    Ok(events)
}

/// Events decoded leniently, with a count of skipped lines.
#[derive(Debug, Clone, Default)]
pub struct JournalRead {
    pub events: Vec<Event>,
    pub skipped: usize,
}

/// Decode every line, logging and skipping malformed records.
///
/// # Errors
///
/// Returns an error only when the underlying reader fails.
pub fn read_lenient(reader: impl BufRead) -> Result<JournalRead, JournalError> {
    let mut read = JournalRead::default();
    for (idx, text) in reader.lines().enumerate() {
        match decode_line(&text?, idx + 1) {
            Ok(Some(event)) => read.events.push(event),
            Ok(None) => {}
            Err(err) => {
                log::warn!("skipping journal record: {err}");
                read.skipped += 1;
            }
        }
    }
    Ok(read)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;

    const SAMPLE: &str = r#"{"timestamp":"2025-03-29T10:30:53Z","event":"PowerplayMerits","Power":"Jerome Archer","MeritsGained":20,"TotalMerits":1084567}

{"timestamp":"2025-03-29T10:47:35Z","event":"PowerplayRank","Power":"Jerome Archer","Rank":139}
not json at all
[1, 2]
{"timestamp":"2025-03-29T11:42:44Z","event":"Died","KillerName":"Exobyte Corp"}
"#;

    #[test]
    fn blank_lines_are_skipped() {
        assert!(decode_line("   ", 3).expect("blank").is_none());
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = decode_line("{oops", 7).expect_err("malformed");
        assert!(err.to_string().starts_with("line 7:"));
        let err = decode_line("42", 9).expect_err("scalar");
        assert!(matches!(err, JournalError::NotAnObject { line: 9 }));
    }

    #[test]
    fn strict_reader_stops_at_first_error() {
        let err = read_strict(SAMPLE.as_bytes()).expect_err("malformed line");
        assert!(matches!(err, JournalError::Malformed { line: 4, .. }));
    }

    #[test]
    fn lenient_reader_skips_bad_lines() {
        let read = read_lenient(SAMPLE.as_bytes()).expect("in-memory read");
        assert_eq!(read.skipped, 2);
        let kinds: Vec<_> = read.events.iter().map(|event| event.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::PowerplayMerits,
                EventKind::PowerplayRank,
                EventKind::Died
            ]
        );
    }
}
