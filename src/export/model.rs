// src/export/model.rs

use crate::core::history::{HistoryRow, HistoryView};
use crate::models::language::Language;
use crate::ui::labels::label;

/// Localized column headers, in cell order.
pub(crate) fn get_headers(lang: Language) -> [&'static str; 3] {
    [
        label(lang, "col_identity"),
        label(lang, "col_date"),
        label(lang, "col_time"),
    ]
}

pub(crate) fn row_cells(r: &HistoryRow) -> [&str; 3] {
    [r.identity.as_str(), r.date.as_str(), r.time.as_str()]
}

/// Exactly the rows the view displays.
pub(crate) fn view_to_table(view: &HistoryView) -> Vec<[&str; 3]> {
    view.rows.iter().map(row_cells).collect()
}
