//! Reconciliation of script coordinates with table rows.
//!
//! The two sources come from the same rendered page but share no identifier.
//! Each table row first looks for a script entry whose label equals its name;
//! failing that it takes the script entry at its own position. Script entries
//! beyond the table's length become coordinate-only records so no position
//! is dropped.

use crate::models::{LocationRecord, ScriptLocation, TableRow};

/// Merge table rows and script locations into location records.
///
/// Emits exactly one record per table row, in table order, followed by one
/// coordinate-only record per surplus script entry, in script order.
pub fn merge(rows: &[TableRow], locations: &[ScriptLocation]) -> Vec<LocationRecord> {
    let mut merged = Vec::with_capacity(rows.len().max(locations.len()));

    for row in rows {
        let mut record = LocationRecord::from_row(row);

        let source = match_by_name(row, locations).or_else(|| locations.get(merged.len()));
        if let Some(location) = source {
            record.lat = location.lat;
            record.lng = location.lng;
        }

        merged.push(record);
    }

    if locations.len() > rows.len() {
        merged.extend(locations[rows.len()..].iter().map(LocationRecord::from_script));
    }

    merged
}

/// First script entry whose trimmed label equals the row's trimmed name.
fn match_by_name<'a>(row: &TableRow, locations: &'a [ScriptLocation]) -> Option<&'a ScriptLocation> {
    let name = row.name.trim();
    locations
        .iter()
        .find(|loc| loc.label.as_deref().is_some_and(|label| label.trim() == name))
}
