use ledgerscan_core::{re, RawTable};

/// A header needs at least this many cells to open a table.
const MIN_HEADER_CELLS: usize = 3;

/// A line with fewer cells than this ends the open table.
const MIN_ROW_CELLS: usize = 2;

const AMOUNT_KEYWORDS: &[&str] = &["amount", "debit", "credit"];

// Words joined by single spaces; two or more spaces separate cells.
re!(re_cell, r"\S+(?: \S+)*");

struct Cell<'a> {
    text: &'a str,
    center: f32,
}

fn split_cells(line: &str) -> Vec<Cell<'_>> {
    re_cell()
        .find_iter(line)
        .map(|m| {
            let start = line[..m.start()].chars().count() as f32;
            let width = m.as_str().chars().count() as f32;
            Cell { text: m.as_str(), center: start + width / 2.0 }
        })
        .collect()
}

fn is_header(cells: &[Cell<'_>]) -> bool {
    if cells.len() < MIN_HEADER_CELLS {
        return false;
    }
    let lower: Vec<String> = cells.iter().map(|c| c.text.to_lowercase()).collect();
    lower.iter().any(|c| c.contains("date"))
        && lower.iter().any(|c| AMOUNT_KEYWORDS.iter().any(|k| c.contains(k)))
}

/// Table under construction: header text plus the column boundaries derived
/// from header cell centres.
struct OpenTable {
    boundaries: Vec<f32>,
    rows: Vec<Vec<String>>,
}

impl OpenTable {
    fn from_header(cells: &[Cell<'_>]) -> Self {
        let boundaries = cells
            .windows(2)
            .map(|pair| (pair[0].center + pair[1].center) / 2.0)
            .collect();
        let header = cells.iter().map(|c| c.text.to_string()).collect();
        OpenTable { boundaries, rows: vec![header] }
    }

    fn push_row(&mut self, cells: &[Cell<'_>]) {
        let mut row = vec![String::new(); self.boundaries.len() + 1];
        for cell in cells {
            let column = self.boundaries.iter().filter(|b| **b < cell.center).count();
            let slot = &mut row[column];
            if !slot.is_empty() {
                slot.push(' ');
            }
            slot.push_str(cell.text);
        }
        self.rows.push(row);
    }

    fn finish(self) -> RawTable {
        RawTable::new(self.rows)
    }
}

/// Detect every column-aligned transaction table in a page's text. A header
/// line that names a date column and an amount-like column opens a table; the
/// header's cell positions define column boundaries for the rows beneath it.
/// Header-only tables are still returned; the interpreter rejects them.
pub fn detect_tables(text: &str) -> Vec<RawTable> {
    let mut tables = Vec::new();
    let mut open: Option<OpenTable> = None;

    for line in text.lines() {
        let cells = split_cells(line);

        if let Some(table) = open.as_mut() {
            if cells.len() >= MIN_ROW_CELLS && !is_header(&cells) {
                table.push_row(&cells);
                continue;
            }
            if let Some(done) = open.take() {
                tables.push(done.finish());
            }
        }

        if is_header(&cells) {
            open = Some(OpenTable::from_header(&cells));
        }
    }

    if let Some(done) = open {
        tables.push(done.finish());
    }
    tables
}
