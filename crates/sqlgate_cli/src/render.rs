//! Plain-text rendering of panels, tables and status notices.

use sqlgate_core::ResultSet;
use std::fmt::Write as _;

/// Severity of a one-line status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Success,
    Info,
    Warning,
    Error,
}

impl Notice {
    fn tag(self) -> &'static str {
        match self {
            Self::Success => "[ok]",
            Self::Info => "[info]",
            Self::Warning => "[warn]",
            Self::Error => "[error]",
        }
    }
}

pub fn notice(kind: Notice, message: impl AsRef<str>) -> String {
    format!("{} {}", kind.tag(), message.as_ref())
}

/// Titled block with an underline the width of the title.
pub fn panel(title: &str, body: &str) -> String {
    let rule = "=".repeat(title.chars().count());
    if body.is_empty() {
        format!("{title}\n{rule}")
    } else {
        format!("{title}\n{rule}\n{body}")
    }
}

/// Renders rows as an aligned text table with a header rule.
///
/// An empty set renders the header only.
pub fn table(set: &ResultSet) -> String {
    let cells = set
        .rows
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    let mut widths = set
        .columns
        .iter()
        .map(|column| column.chars().count())
        .collect::<Vec<_>>();
    for row in &cells {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", join_padded(&set.columns, &widths));
    let _ = write!(
        out,
        "{}",
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-")
    );
    for row in &cells {
        let _ = write!(out, "\n{}", join_padded(row, &widths));
    }
    out
}

fn join_padded(values: &[String], widths: &[usize]) -> String {
    values
        .iter()
        .zip(widths)
        .map(|(value, width)| format!("{value:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{notice, panel, table, Notice};
    use sqlgate_core::{CellValue, ResultSet};

    fn sample_set() -> ResultSet {
        ResultSet {
            columns: vec!["id".to_string(), "name".to_string()],
            rows: vec![
                vec![CellValue::Integer(1), CellValue::Text("John Doe".to_string())],
                vec![CellValue::Integer(12), CellValue::Null],
            ],
        }
    }

    #[test]
    fn table_aligns_columns_to_widest_cell() {
        let rendered = table(&sample_set());
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "id | name");
        assert_eq!(lines[1], "---+---------");
        assert_eq!(lines[2], "1  | John Doe");
        assert_eq!(lines[3], "12 | NULL");
    }

    #[test]
    fn empty_table_renders_header_only() {
        let set = ResultSet {
            columns: vec!["id".to_string()],
            rows: Vec::new(),
        };
        assert_eq!(table(&set), "id\n--");
    }

    #[test]
    fn panel_underlines_title() {
        assert_eq!(panel("Query Results", "x"), "Query Results\n=============\nx");
        assert_eq!(notice(Notice::Warning, "careful"), "[warn] careful");
    }
}
