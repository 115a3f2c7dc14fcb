//! Bilingual label lookup.

use crate::errors::{AppError, AuthError};
use crate::models::language::Language;
use std::collections::BTreeMap;

/// (key, 中文, English)
const LABELS: &[(&str, &str, &str)] = &[
    ("title", "線上打卡系統", "Online Check-in System"),
    ("login_title", "登入打卡系統", "Sign in"),
    ("account", "帳號", "Account"),
    ("password", "密碼", "Password"),
    ("login_button", "登入", "Log in"),
    ("login_success", "登入成功", "Logged in"),
    ("login_failed", "帳號或密碼錯誤", "Wrong account or password"),
    ("account_disabled", "此帳號已停用，請聯絡管理員", "This account is disabled, please contact an administrator"),
    ("welcome", "歡迎回來：", "Welcome back: "),
    ("logout", "登出", "Log out"),
    ("logged_out", "已登出", "Logged out"),
    ("language", "語言", "Language"),
    ("checkin_button", "我要打卡", "Check in"),
    ("checkin_success", "打卡成功！時間：", "Checked in at "),
    ("history_title", "歷史打卡紀錄", "Check-in history"),
    ("select_month", "選擇月份", "Select month"),
    ("select_user", "選擇使用者", "Select user"),
    ("all_users_label", "全部", "All"),
    ("no_months", "尚無任何打卡工作表", "No check-in sheets yet"),
    ("partition_empty", "這個月份尚無任何打卡資料", "No check-ins recorded for this month"),
    ("no_record", "你本月尚未打過卡", "You have not checked in this month"),
    ("no_data", "查無資料", "No data"),
    ("skipped_rows", "筆資料的日期或時間無法解析，已略過", "row(s) with an unreadable date or time were skipped"),
    ("missing_column", "表單缺少必要欄位：", "Sheet is missing a required column: "),
    ("sheet_not_found", "找不到對應月份的工作表：", "No sheet for month: "),
    ("read_error", "無法讀取資料：", "Cannot read data: "),
    ("download", "下載 Excel", "Download Excel"),
    ("file_label", "打卡紀錄", "checkin_records"),
    ("col_index", "編號", "No."),
    ("col_identity", "姓名", "Name"),
    ("col_date", "日期", "Date"),
    ("col_time", "時間", "Time"),
    ("admin_menu", "管理功能", "Admin menu"),
    ("view_records", "查看打卡紀錄", "View records"),
    ("manage_accounts", "帳號管理", "Manage accounts"),
    ("add_user", "新增帳號", "Add account"),
    ("new_account", "新帳號", "New account"),
    ("new_password", "新密碼", "New password"),
    ("new_role", "角色", "Role"),
    ("enabled", "是否啟用", "Enabled"),
    ("add_user_button", "新增", "Add"),
    ("add_user_success", "已新增帳號", "Account added"),
    ("add_user_failed", "新增帳號失敗", "Failed to add account"),
    ("account_exists", "此帳號已存在，請使用其他帳號", "This account already exists, choose another one"),
    ("input_required", "請輸入完整帳號與密碼", "Please enter both account and password"),
    ("all_users", "所有使用者帳號", "All user accounts"),
    ("no_users", "尚無使用者資料", "No users yet"),
    ("manage_user_status", "帳號狀態管理", "Account status"),
    ("select_account", "請選擇帳號", "Select an account"),
    ("enable_account", "啟用帳號", "Enable account"),
    ("disable_account", "停用帳號", "Disable account"),
    ("delete_account", "刪除帳號", "Delete account"),
    ("execute_action", "執行操作", "Apply"),
    ("enabled_account", "已啟用帳號", "Account enabled"),
    ("disabled_account", "已停用帳號", "Account disabled"),
    ("deleted_account", "已刪除帳號", "Account deleted"),
    ("account_not_found", "找不到此帳號", "No such account"),
    ("operation_failed", "操作失敗：", "Operation failed: "),
    ("not_logged_in", "請先登入", "Please log in first"),
    ("forbidden", "需要管理員權限", "Administrator rights required"),
    ("invalid_input", "輸入格式錯誤：", "Invalid input: "),
];

/// Text for `key`; unknown keys come back unchanged.
pub fn label(lang: Language, key: &str) -> &str {
    LABELS
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, zh, en)| match lang {
            Language::ZhTw => *zh,
            Language::En => *en,
        })
        .unwrap_or(key)
}

/// Whole dictionary for one language, for the front end.
pub fn dictionary(lang: Language) -> BTreeMap<&'static str, &'static str> {
    LABELS
        .iter()
        .map(|(k, zh, en)| {
            (
                *k,
                match lang {
                    Language::ZhTw => *zh,
                    Language::En => *en,
                },
            )
        })
        .collect()
}

/// Message shown to the user for an error.
///
/// Unknown account and wrong password share one message.
pub fn error_message(err: &AppError, lang: Language) -> String {
    let l = |key: &str| label(lang, key).to_string();

    match err {
        AppError::Auth(AuthError::UnknownAccount | AuthError::BadSecret) => l("login_failed"),
        AppError::Auth(AuthError::Disabled) => l("account_disabled"),
        AppError::NotLoggedIn => l("not_logged_in"),
        AppError::Forbidden => l("forbidden"),
        AppError::DuplicateAccount(_) => l("account_exists"),
        AppError::MissingField(_) => l("input_required"),
        AppError::SheetNotFound(name) => format!("{}{name}", l("sheet_not_found")),
        AppError::MissingColumn(col) => format!("{}{col}", l("missing_column")),
        AppError::InvalidMonth(_)
        | AppError::InvalidLanguage(_)
        | AppError::InvalidMenu(_)
        | AppError::InvalidRole(_) => format!("{}{err}", l("invalid_input")),
        AppError::Io(_) | AppError::Store(_) | AppError::Migration(_) | AppError::Corrupt(_) => {
            format!("{}{err}", l("read_error"))
        }
        _ => format!("{}{err}", l("operation_failed")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique_and_complete() {
        let zh = dictionary(Language::ZhTw);
        let en = dictionary(Language::En);
        assert_eq!(zh.len(), LABELS.len());
        assert_eq!(en.len(), LABELS.len());
        assert!(en.values().all(|v| !v.is_empty()));
    }

    #[test]
    fn lookup_by_language() {
        assert_eq!(label(Language::ZhTw, "all_users_label"), "全部");
        assert_eq!(label(Language::En, "all_users_label"), "All");
        assert_eq!(label(Language::En, "no_such_key"), "no_such_key");
    }

    #[test]
    fn login_failures_share_a_message() {
        let unknown = error_message(&AppError::Auth(AuthError::UnknownAccount), Language::En);
        let bad = error_message(&AppError::Auth(AuthError::BadSecret), Language::En);
        let disabled = error_message(&AppError::Auth(AuthError::Disabled), Language::En);
        assert_eq!(unknown, bad);
        assert_ne!(unknown, disabled);
    }
}
