//! AsciiDoc `|===` tables.

use crate::text::fix_encoding;

/// Table delimiter line.
pub(crate) const DELIMITER: &str = "|===";

/// Leading space run removed from indented cell continuation lines.
const INDENT_RUN: &str = "                            ";

/// What one table line turns into.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum TableLine {
    /// The `|===` that opens a `[cols…]` table. Dropped.
    Open,
    /// The closing `|===`. Dropped; back to prose.
    Close,
    /// Lines to emit; still inside the table.
    Rows(Vec<String>),
}

/// Whether a line starts a table.
pub(crate) fn is_start(line: &str) -> bool {
    line == DELIMITER || line.starts_with("[cols")
}

/// Classify and convert one line inside a table.
pub(crate) fn convert(line: &str, opened: bool) -> TableLine {
    if line == DELIMITER {
        return if opened {
            TableLine::Close
        } else {
            TableLine::Open
        };
    }

    if line.starts_with("     ") {
        return TableLine::Rows(vec![fix_encoding(&line.replace(INDENT_RUN, ""))]);
    }

    let row = fix_encoding(line);
    if line.starts_with("| *") {
        let separator = header_separator(line);
        return TableLine::Rows(vec![row, separator]);
    }

    TableLine::Rows(vec![row])
}

/// `|---` once per bold cell (two asterisks each).
fn header_separator(header: &str) -> String {
    let asterisks = header.chars().filter(|c| *c == '*').count();
    "|---".repeat(asterisks / 2)
}
