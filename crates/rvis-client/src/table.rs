use std::sync::LazyLock;

use rvis_core::models::TableRow;
use scraper::{ElementRef, Html, Selector};

static RESULTS_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"table[class*="table"]"#).expect("valid selector"));

/// Minimum cell count for a data row: county, name, phone, address.
const MIN_CELLS: usize = 4;

/// Parse the results table into rows, in document order.
///
/// Uses the first table whose class contains `table`. Only the table's own
/// rows and cells count; tables nested inside a cell contribute text to that
/// cell and nothing else. A leading row is dropped only when it holds `<th>`
/// cells; rows with fewer than four `<td>` cells are skipped.
pub fn extract_table_rows(html: &str) -> Vec<TableRow> {
    let document = Html::parse_document(html);
    let Some(table) = document.select(&RESULTS_TABLE).next() else {
        return Vec::new();
    };

    own_rows(table)
        .enumerate()
        .filter(|(i, row)| !(*i == 0 && child_elements(*row, "th").next().is_some()))
        .filter_map(|(_, row)| parse_row(row))
        .collect()
}

/// `<tr>` elements belonging to `table` itself, directly or through its
/// row groups.
fn own_rows<'a>(table: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    table
        .children()
        .filter_map(ElementRef::wrap)
        .flat_map(|child| match child.value().name() {
            "tr" => vec![child],
            "thead" | "tbody" | "tfoot" => child_elements(child, "tr").collect(),
            _ => Vec::new(),
        })
}

fn child_elements<'a>(
    parent: ElementRef<'a>,
    name: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == name)
}

fn parse_row(row: ElementRef<'_>) -> Option<TableRow> {
    let cells: Vec<String> = child_elements(row, "td").map(cell_text).collect();
    if cells.len() < MIN_CELLS {
        return None;
    }
    let mut cells = cells.into_iter();
    Some(TableRow {
        county: cells.next()?,
        name: cells.next()?,
        phone: cells.next()?,
        address: cells.next()?,
    })
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}
