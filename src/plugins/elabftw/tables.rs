//! Protocol tables from an experiment body
//!
//! eLabFTW experiments describe each protocol as an HTML table with a
//! parameter column and a value column. A third column is tolerated when it
//! is headed `Comments` or `Measurement`. A protocol that does not fit one
//! table may continue in the next one.

use scraper::{ElementRef, Html, Selector};

use crate::types::Parameters;

/// A protocol needs at least this many parameters to be kept
pub const MIN_PARAMETERS: usize = 4;

/// Third-column headings that still make a table a parameter table
const EXTRA_COLUMN_HEADINGS: [&str; 2] = ["Comments", "Measurement"];

/// Parameter groups extracted from one experiment body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolTables {
    /// Number of `<table>` elements in the body
    pub tables_found: usize,
    /// One parameter map per protocol, in document order
    pub groups: Vec<Parameters>,
}

/// Extract protocol parameter groups from an experiment body.
///
/// Keys listed in `exclude` are dropped before groups smaller than
/// [`MIN_PARAMETERS`] are discarded.
pub fn extract_protocol_tables(html: &str, exclude: &[String]) -> ProtocolTables {
    let document = Html::parse_fragment(html);
    let (Ok(table_sel), Ok(row_sel), Ok(cell_sel)) = (
        Selector::parse("table"),
        Selector::parse("tr"),
        Selector::parse("th, td"),
    ) else {
        return ProtocolTables::default();
    };

    let tables: Vec<ElementRef> = document.select(&table_sel).collect();
    let mut groups: Vec<Parameters> = Vec::new();

    for table in &tables {
        let rows = table_rows(table, &row_sel, &cell_sel);
        let Some(pairs) = parameter_pairs(&rows) else {
            continue;
        };

        match groups.last_mut() {
            Some(last) if last.len() < MIN_PARAMETERS => last.extend(pairs),
            _ => groups.push(pairs),
        }
    }

    for group in &mut groups {
        for key in exclude {
            group.shift_remove(key.trim());
        }
    }
    groups.retain(|g| g.len() >= MIN_PARAMETERS);

    ProtocolTables {
        tables_found: tables.len(),
        groups,
    }
}

/// Cell texts per row, without leading header rows made only of `<th>`
fn table_rows(table: &ElementRef, row_sel: &Selector, cell_sel: &Selector) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut in_header = true;

    for row in table.select(row_sel) {
        let cells: Vec<ElementRef> = row.select(cell_sel).collect();
        if cells.is_empty() {
            continue;
        }

        let all_th = cells.iter().all(|c| c.value().name() == "th");
        if in_header && all_th {
            continue;
        }
        in_header = false;

        rows.push(cells.iter().map(cell_text).collect());
    }

    rows
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Left column → right column if the table qualifies as a parameter table
fn parameter_pairs(rows: &[Vec<String>]) -> Option<Parameters> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let extra_heading = rows
        .first()
        .and_then(|r| r.get(2))
        .is_some_and(|h| EXTRA_COLUMN_HEADINGS.contains(&h.as_str()));

    let data_rows = match columns {
        2 => rows,
        n if n > 2 && extra_heading => &rows[1..],
        _ => return None,
    };

    let pairs = data_rows
        .iter()
        .filter_map(|row| match (row.first(), row.get(1)) {
            (Some(key), Some(value)) if !key.is_empty() && !value.is_empty() => {
                Some((key.clone(), value.clone()))
            }
            _ => None,
        })
        .collect();

    Some(pairs)
}
