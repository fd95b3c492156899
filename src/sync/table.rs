//! Parser for the schema engine's tabular diff output.
//!
//! The engine renders detected differences as a pipe-delimited table:
//!
//! ```text
//! +----+-----------+-------------+-----------+----------+
//! | Id | Operation | Object type | Schema    | Name     |
//! +----+-----------+-------------+-----------+----------+
//! | 1  | Edit      | Table       | Operation | Products |
//! +----+-----------+-------------+-----------+----------+
//! ```
//!
//! The grammar is strict per row but lenient per document: a row that
//! does not match the five-column shape contributes no entry rather
//! than failing the parse, so minor formatting drift in the upstream
//! tool never breaks the sync flow.

use crate::model::{DiffChange, DiffChangeKind};

const HEADER_ID_CELL: &str = "Id";
const NO_DIFFERENCES: &str = "No differences";

/// Scan engine output and collect one [`DiffChange`] per well-formed
/// data row. Once a border or header line has been seen, every later
/// line is treated as potential data; there is no transition back out
/// of the table, which tolerates interior border lines.
pub fn parse_diff_table(output: &str) -> Vec<DiffChange> {
    let mut entries = Vec::new();
    let mut in_table = false;

    for line in output.lines() {
        let line = line.trim();

        if !in_table {
            if is_border(line) || is_header_row(line) {
                in_table = true;
            }
            continue;
        }

        let Some(cells) = split_row(line) else {
            continue;
        };
        if cells[0].eq_ignore_ascii_case(HEADER_ID_CELL) {
            continue;
        }
        if cells.iter().any(|c| c.contains(NO_DIFFERENCES)) {
            continue;
        }
        let Some(kind) = DiffChangeKind::parse(cells[1]) else {
            continue;
        };
        if cells[0].is_empty() {
            continue;
        }

        entries.push(DiffChange {
            id: cells[0].to_string(),
            kind,
            object_type: cells[2].to_string(),
            schema: cells[3].to_string(),
            name: cells[4].to_string(),
        });
    }

    entries
}

/// A border line is non-empty and built only from table-frame
/// characters.
fn is_border(line: &str) -> bool {
    !line.is_empty()
        && line
            .chars()
            .all(|c| matches!(c, '+' | '-' | '=' | '|') || c.is_whitespace())
}

fn is_header_row(line: &str) -> bool {
    split_row(line).is_some_and(|cells| cells[0].eq_ignore_ascii_case(HEADER_ID_CELL))
}

/// Split a `| a | b | c | d | e |` line into its five trimmed cells.
/// Anything else is not a data row.
fn split_row(line: &str) -> Option<Vec<&str>> {
    let inner = line.strip_prefix('|')?.strip_suffix('|')?;
    let cells: Vec<&str> = inner.split('|').map(str::trim).collect();
    if cells.len() == 5 {
        Some(cells)
    } else {
        None
    }
}
