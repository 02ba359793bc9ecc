//! CSV and Markdown table parsing and alignment.
//!
//! Tables are collected through a [`LineReader`], so the collection pass obeys
//! the same streaming contract as everything else, and an optional row cap can
//! stop it early on huge inputs. Column widths use display width rather than
//! byte length so multi-byte content still lines up.

use crate::error::Result;
use crate::reader::{LineReader, ReadResult};
use crate::theme::ansi;
use unicode_width::UnicodeWidthStr;

/// 256-color codes cycled across columns in rainbow mode.
const RAINBOW_COLORS: [u8; 12] = [196, 202, 208, 214, 220, 226, 46, 47, 39, 45, 165, 171];

/// A parsed CSV table with per-column display widths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub rows: Vec<Vec<String>>,
    pub col_widths: Vec<usize>,
}

impl CsvTable {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_cols(&self) -> usize {
        self.col_widths.len()
    }

    fn push_row(&mut self, row: Vec<String>) {
        for (i, cell) in row.iter().enumerate() {
            let width = cell.width();
            if i >= self.col_widths.len() {
                self.col_widths.push(width);
            } else {
                self.col_widths[i] = self.col_widths[i].max(width);
            }
        }
        self.rows.push(row);
    }
}

/// Heuristic: the line contains at least one comma and is not only commas.
pub fn looks_like_csv(line: &str) -> bool {
    let commas = line.bytes().filter(|b| *b == b',').count();
    commas > 0 && commas < line.len()
}

/// Split one CSV line into fields, honoring quoted fields with doubled-quote
/// escapes. Commas inside quotes stay in the field.
pub fn parse_csv_row(line: &str) -> Vec<String> {
    let bytes = line.as_bytes();
    let mut cells = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let mut value = String::new();
        let mut in_quotes = false;
        if bytes[i] == b'"' {
            in_quotes = true;
            i += 1;
        }

        while i < bytes.len() {
            if in_quotes {
                match memchr::memchr(b'"', &bytes[i..]) {
                    Some(pos) => {
                        value.push_str(&line[i..i + pos]);
                        i += pos;
                        if bytes.get(i + 1) == Some(&b'"') {
                            value.push('"');
                            i += 2;
                        } else {
                            in_quotes = false;
                            i += 1;
                        }
                    }
                    None => {
                        // Unterminated quote: take the rest of the line
                        value.push_str(&line[i..]);
                        i = bytes.len();
                    }
                }
            } else {
                match memchr::memchr(b',', &bytes[i..]) {
                    Some(pos) => {
                        value.push_str(&line[i..i + pos]);
                        i += pos;
                        break;
                    }
                    None => {
                        value.push_str(&line[i..]);
                        i = bytes.len();
                        break;
                    }
                }
            }
        }

        cells.push(value);
        if i < bytes.len() && bytes[i] == b',' {
            i += 1;
        }
    }

    cells
}

/// What a CSV collection pass found in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvOutcome {
    /// The source held no lines at all.
    Empty,
    /// The first line did not look like CSV. Carries that line so the caller
    /// can fall back to plain output; the reader cannot be rewound on stdin.
    NotCsv(ReadResult),
    Table(CsvTable),
}

/// Collect rows from a reader into a table, computing column widths as rows
/// arrive. The first line is checked with [`looks_like_csv`]; a source whose
/// first line has no commas is reported as [`CsvOutcome::NotCsv`] instead of
/// being forced into a one-column grid. `max_rows == 0` means unbounded.
pub fn collect_table(reader: &mut LineReader, max_rows: usize) -> Result<CsvOutcome> {
    let first = reader.read_line()?;
    if first.is_eof {
        return Ok(CsvOutcome::Empty);
    }
    if !looks_like_csv(&first.text) {
        return Ok(CsvOutcome::NotCsv(first));
    }

    let mut table = CsvTable::default();
    table.push_row(parse_csv_row(&first.text));

    while max_rows == 0 || table.num_rows() < max_rows {
        let result = reader.read_line()?;
        if result.is_eof {
            break;
        }
        table.push_row(parse_csv_row(&result.text));
    }

    Ok(CsvOutcome::Table(table))
}

fn pad(cell: &str, width: usize) -> String {
    let mut out = String::from(cell);
    for _ in cell.width()..width {
        out.push(' ');
    }
    out
}

fn grid_separator(col_widths: &[usize]) -> String {
    let mut sep = String::from("+");
    for width in col_widths {
        sep.push_str(&"-".repeat(width + 2));
        sep.push('+');
    }
    sep
}

/// Render the table as a bordered grid:
///
/// ```text
/// +------+-----+
/// | name | age |
/// +------+-----+
/// ```
pub fn format_aligned(table: &CsvTable) -> Vec<String> {
    let separator = grid_separator(&table.col_widths);
    let mut lines = vec![separator.clone()];

    for row in &table.rows {
        let mut line = String::from("|");
        for (i, cell) in row.iter().enumerate() {
            line.push(' ');
            line.push_str(&pad(cell, table.col_widths[i]));
            line.push_str(" |");
        }
        lines.push(line);
        lines.push(separator.clone());
    }

    lines
}

/// 256-color escape for a column index, cycling the rainbow palette.
pub fn rainbow_color(col_index: usize) -> String {
    format!(
        "\x1b[38;5;{}m",
        RAINBOW_COLORS[col_index % RAINBOW_COLORS.len()]
    )
}

/// Render the table with each column in its own 256-color and dim separators.
pub fn format_rainbow(table: &CsvTable) -> Vec<String> {
    let separator = format!(
        "{}{}{}",
        ansi::BRIGHT_BLACK,
        grid_separator(&table.col_widths),
        ansi::RESET
    );
    let mut lines = vec![separator.clone()];

    for row in &table.rows {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            line.push('|');
            line.push_str(&rainbow_color(i));
            line.push(' ');
            line.push_str(&pad(cell, table.col_widths[i]));
            line.push(' ');
            line.push_str(ansi::RESET);
        }
        line.push('|');
        lines.push(line);
        lines.push(separator.clone());
    }

    lines
}

/// Whether a line looks like a markdown table row (a separator row or a row
/// with at least two pipes).
pub fn looks_like_md_table(line: &str) -> bool {
    if is_md_separator(line) {
        return true;
    }
    line.bytes().filter(|b| *b == b'|').count() >= 2
}

/// A markdown separator row: starts with `|` and contains only `|`, `-`, `:`,
/// and whitespace.
pub fn is_md_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('|')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

fn parse_md_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

/// Re-align a run of markdown table rows (separator rows already removed).
/// A fresh separator is inserted after the header row.
pub fn format_md_table(table_lines: &[String]) -> Vec<String> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut col_widths: Vec<usize> = Vec::new();

    for line in table_lines {
        let cells = parse_md_row(line);
        if cells.is_empty() {
            continue;
        }
        for (i, cell) in cells.iter().enumerate() {
            let width = cell.width();
            if i >= col_widths.len() {
                col_widths.push(width);
            } else {
                col_widths[i] = col_widths[i].max(width);
            }
        }
        rows.push(cells);
    }

    if rows.is_empty() {
        return Vec::new();
    }

    let separator = {
        let mut sep = String::new();
        for width in &col_widths {
            sep.push('|');
            sep.push_str(&"-".repeat(width + 2));
        }
        sep.push('|');
        sep
    };

    let mut formatted = Vec::new();
    for (r, row) in rows.iter().enumerate() {
        let mut line = String::from("|");
        for (i, width) in col_widths.iter().enumerate() {
            let cell = row.get(i).map(String::as_str).unwrap_or("");
            line.push(' ');
            line.push_str(&pad(cell, *width));
            line.push_str(" |");
        }
        formatted.push(line);

        if r == 0 && rows.len() > 1 {
            formatted.push(separator.clone());
        }
    }

    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::LineReader;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn reader_over(content: &[u8]) -> (NamedTempFile, LineReader) {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(content).expect("write test content");
        file.flush().expect("flush test file");
        let reader = LineReader::open(file.path());
        (file, reader)
    }

    fn expect_table(outcome: CsvOutcome) -> CsvTable {
        match outcome {
            CsvOutcome::Table(table) => table,
            other => panic!("expected a table, got {other:?}"),
        }
    }

    #[test]
    fn test_looks_like_csv() {
        assert!(looks_like_csv("a,b,c"));
        assert!(looks_like_csv("name,age"));
        assert!(!looks_like_csv("no commas here"));
        assert!(!looks_like_csv(",,,"));
        assert!(!looks_like_csv(""));
    }

    #[test]
    fn test_parse_csv_row_plain() {
        assert_eq!(parse_csv_row("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_csv_row("one"), vec!["one"]);
        assert_eq!(parse_csv_row("a,,c"), vec!["a", "", "c"]);
    }

    #[test]
    fn test_parse_csv_row_quoted_fields() {
        assert_eq!(
            parse_csv_row("\"hello, world\",plain"),
            vec!["hello, world", "plain"]
        );
        assert_eq!(
            parse_csv_row("\"she said \"\"hi\"\"\",x"),
            vec!["she said \"hi\"", "x"]
        );
    }

    #[test]
    fn test_collect_table_widths_and_cap() {
        let (_file, mut reader) = reader_over(b"name,age\nalice,30\nbartholomew,9\n");

        let table = expect_table(collect_table(&mut reader, 0).unwrap());
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.num_cols(), 2);
        assert_eq!(table.col_widths, vec![11, 3]);

        // Row cap stops collection early; 0 means unbounded
        reader.rewind();
        let capped = expect_table(collect_table(&mut reader, 2).unwrap());
        assert_eq!(capped.num_rows(), 2);
    }

    #[test]
    fn test_collect_table_empty_source() {
        let (_file, mut reader) = reader_over(b"");
        assert_eq!(collect_table(&mut reader, 0).unwrap(), CsvOutcome::Empty);
    }

    #[test]
    fn test_collect_table_rejects_non_csv_first_line() {
        let (_file, mut reader) = reader_over(b"no commas here\nbut,these,do\n");

        let outcome = collect_table(&mut reader, 0).unwrap();
        let CsvOutcome::NotCsv(first) = outcome else {
            panic!("expected NotCsv, got {outcome:?}");
        };
        assert_eq!(first.text, "no commas here");
        assert_eq!(first.line_number, 1);

        // The rest of the source is still readable for plain fallback
        assert_eq!(reader.read_line().unwrap().text, "but,these,do");
    }

    #[test]
    fn test_format_aligned_grid() {
        let (_file, mut reader) = reader_over(b"a,bb\nccc,d\n");
        let table = expect_table(collect_table(&mut reader, 0).unwrap());

        let lines = format_aligned(&table);
        assert_eq!(
            lines,
            vec![
                "+-----+----+",
                "| a   | bb |",
                "+-----+----+",
                "| ccc | d  |",
                "+-----+----+",
            ]
        );
    }

    #[test]
    fn test_format_rainbow_cycles_palette() {
        assert_eq!(rainbow_color(0), "\x1b[38;5;196m");
        assert_eq!(rainbow_color(12), rainbow_color(0));
        assert_ne!(rainbow_color(1), rainbow_color(2));

        let (_file, mut reader) = reader_over(b"x,y\n");
        let table = expect_table(collect_table(&mut reader, 0).unwrap());
        let lines = format_rainbow(&table);
        assert!(lines[1].contains("\x1b[38;5;196m"));
        assert!(lines[1].contains("\x1b[38;5;202m"));
        assert!(lines[0].starts_with(ansi::BRIGHT_BLACK));
    }

    #[test]
    fn test_display_width_alignment() {
        let (_file, mut reader) = reader_over("id,name\n1,caf\u{e9}\n22,x\n".as_bytes());
        let table = expect_table(collect_table(&mut reader, 0).unwrap());

        // "café" is four columns wide despite five bytes
        assert_eq!(table.col_widths, vec![2, 4]);
    }

    #[test]
    fn test_md_separator_detection() {
        assert!(is_md_separator("|---|---|"));
        assert!(is_md_separator("  | :--- | ---: |  "));
        assert!(!is_md_separator("| a | b |"));
        assert!(!is_md_separator("---"));
    }

    #[test]
    fn test_looks_like_md_table() {
        assert!(looks_like_md_table("| a | b |"));
        assert!(looks_like_md_table("|---|---|"));
        assert!(looks_like_md_table("a | b | c"));
        assert!(!looks_like_md_table("plain text"));
    }

    #[test]
    fn test_format_md_table_realigns_and_regenerates_separator() {
        let input = vec![
            "| name | qty |".to_string(),
            "| apple | 3 |".to_string(),
            "| watermelon | 12 |".to_string(),
        ];

        let lines = format_md_table(&input);
        assert_eq!(
            lines,
            vec![
                "| name       | qty |",
                "|------------|-----|",
                "| apple      | 3   |",
                "| watermelon | 12  |",
            ]
        );
    }

    #[test]
    fn test_format_md_table_pads_short_rows() {
        let input = vec!["| a | b | c |".to_string(), "| only |".to_string()];
        let lines = format_md_table(&input);
        assert_eq!(lines[2], "| only |   |   |");
    }

    #[test]
    fn test_format_md_table_empty_input() {
        assert!(format_md_table(&[]).is_empty());
    }
}
