// src/export/mod.rs

mod excel_date;
mod fs_utils;
mod model;
mod xlsx;

pub(crate) use fs_utils::write_bytes;

use crate::core::history::HistoryView;
use crate::errors::AppResult;
use crate::models::language::Language;
use crate::ui::labels::label;
use crate::ui::messages::success;
use std::path::Path;

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A finished spreadsheet, ready to be written or downloaded.
#[derive(Debug, Clone)]
pub struct XlsxExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// `{month}_{identity-or-all}_{record-label}.xlsx`, with path separators replaced.
pub fn export_file_name(month: &str, selected: Option<&str>, lang: Language) -> String {
    let who = selected
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| label(lang, "all_users_label"));

    let raw = format!("{month}_{who}_{}.xlsx", label(lang, "file_label"));
    raw.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Workbook of exactly the displayed rows, one sheet named after the month.
pub fn export_history(view: &HistoryView, lang: Language) -> AppResult<XlsxExport> {
    let headers = model::get_headers(lang);
    let rows = model::view_to_table(view);
    let bytes = xlsx::build_workbook(&view.month, &headers, &rows)?;

    Ok(XlsxExport {
        file_name: export_file_name(&view.month, view.selected_user.as_deref(), lang),
        bytes,
    })
}

pub(crate) fn notify_export_success(path: &Path) {
    success(format!("XLSX export completed: {}", path.display()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_the_selection() {
        assert_eq!(
            export_file_name("202501", None, Language::En),
            "202501_All_checkin_records.xlsx"
        );
        assert_eq!(
            export_file_name("202501", Some("alice"), Language::ZhTw),
            "202501_alice_打卡紀錄.xlsx"
        );
        assert_eq!(
            export_file_name("202501", Some("a/b"), Language::En),
            "202501_a_b_checkin_records.xlsx"
        );
    }
}
