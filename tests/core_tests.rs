use rcheckin::core::NewUser;
use rcheckin::core::history::HistoryNotice;
use rcheckin::core::ledger::Ledger;
use rcheckin::errors::{AppError, AuthError};
use rcheckin::models::language::Language;
use rcheckin::models::user::Role;
use rcheckin::store::{SheetStore, SqliteStore};
use std::io::{Cursor, Read};
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::{admin, current_month, login, memory_core, test_config};

fn new_user(account: &str, secret: &str, role: Role, enabled: bool) -> NewUser {
    NewUser {
        account: account.to_string(),
        secret: secret.to_string(),
        role,
        enabled,
    }
}

#[test]
fn test_login_outcomes() {
    let core = memory_core();
    let root = admin(&core);
    core.add_user(&root, &new_user("alice", "pw1", Role::User, true))
        .unwrap();
    core.add_user(&root, &new_user("carol", "pw3", Role::User, false))
        .unwrap();

    let start = core.new_session();

    let alice = core.login(&start, "alice", "pw1").unwrap();
    assert!(alice.logged_in);
    assert_eq!(alice.role, Some(Role::User));
    assert_eq!(alice.identity, "alice");

    let err = core.login(&start, "alice", "wrong").unwrap_err();
    assert!(matches!(err, AppError::Auth(AuthError::BadSecret)));

    let err = core.login(&start, "nobody", "pw1").unwrap_err();
    assert!(matches!(err, AppError::Auth(AuthError::UnknownAccount)));

    let err = core.login(&start, "carol", "pw3").unwrap_err();
    assert!(matches!(err, AppError::Auth(AuthError::Disabled)));

    // failed attempts never touch the starting session
    assert!(!start.logged_in);
    assert!(start.identity.is_empty());
}

#[test]
fn test_plaintext_rows_still_log_in() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let cfg = test_config();
    let core = rcheckin::core::Core::new(store.clone(), &cfg).unwrap();

    // a row typed straight into the sheet
    store
        .append_row(
            &cfg.users_sheet,
            &["alice".into(), "pw1".into(), "user".into(), "Y".into()],
        )
        .unwrap();

    let s = login(&core, "alice", "pw1");
    assert_eq!(s.role, Some(Role::User));
}

#[test]
fn test_new_account_logs_in_immediately() {
    let core = memory_core();
    let root = admin(&core);

    // warm the user cache, then add
    assert!(core.login(&core.new_session(), "bob", "pw2").is_err());
    core.add_user(&root, &new_user("bob", "pw2", Role::User, true))
        .unwrap();

    login(&core, "bob", "pw2");
}

#[test]
fn test_duplicate_and_missing_fields() {
    let core = memory_core();
    let root = admin(&core);

    core.add_user(&root, &new_user("bob", "pw2", Role::User, true))
        .unwrap();
    let err = core
        .add_user(&root, &new_user("bob", "pw2", Role::User, true))
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateAccount(ref a) if a == "bob"));

    let err = core
        .add_user(&root, &new_user("  ", "pw", Role::User, true))
        .unwrap_err();
    assert!(matches!(err, AppError::MissingField("account")));

    let err = core
        .add_user(&root, &new_user("dave", "", Role::User, true))
        .unwrap_err();
    assert!(matches!(err, AppError::MissingField("password")));
}

#[test]
fn test_admin_operations_need_admin() {
    let core = memory_core();
    let root = admin(&core);
    core.add_user(&root, &new_user("alice", "pw1", Role::User, true))
        .unwrap();
    let alice = login(&core, "alice", "pw1");

    assert!(matches!(
        core.add_user(&alice, &new_user("x", "y", Role::Admin, true)),
        Err(AppError::Forbidden)
    ));
    assert!(matches!(core.list_users(&alice), Err(AppError::Forbidden)));
    assert!(matches!(
        core.delete_user(&alice, "root"),
        Err(AppError::Forbidden)
    ));

    let logged_out = core.logout(&alice);
    assert!(matches!(
        core.check_in(&logged_out),
        Err(AppError::NotLoggedIn)
    ));
}

#[test]
fn test_set_enabled_on_missing_account_changes_nothing() {
    let core = memory_core();
    let root = admin(&core);
    core.add_user(&root, &new_user("alice", "pw1", Role::User, true))
        .unwrap();

    let before = core.list_users(&root).unwrap();
    assert!(!core.set_enabled(&root, "carol", false).unwrap());
    assert_eq!(core.list_users(&root).unwrap(), before);

    assert!(core.set_enabled(&root, "alice", false).unwrap());
    let err = core.login(&core.new_session(), "alice", "pw1").unwrap_err();
    assert!(matches!(err, AppError::Auth(AuthError::Disabled)));

    assert!(core.set_enabled(&root, "alice", true).unwrap());
    login(&core, "alice", "pw1");
}

#[test]
fn test_delete_removes_only_that_account() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let cfg = test_config();
    let core = rcheckin::core::Core::new(store.clone(), &cfg).unwrap();
    core.bootstrap_admin("root", "rootpw").unwrap();
    let root = admin(&core);

    for (a, p) in [("alice", "pw1"), ("bob", "pw2"), ("carol", "pw3")] {
        core.add_user(&root, &new_user(a, p, Role::User, true)).unwrap();
    }
    // a stray duplicate row for bob
    store
        .append_row(
            &cfg.users_sheet,
            &["bob".into(), "old".into(), "user".into(), "N".into()],
        )
        .unwrap();

    let header_before = store.header(&cfg.users_sheet).unwrap();
    let others_before: Vec<_> = store
        .read_rows(&cfg.users_sheet)
        .unwrap()
        .into_iter()
        .filter(|r| r.cell(0) != "bob")
        .collect();

    assert_eq!(core.delete_user(&root, "bob").unwrap(), 2);
    assert_eq!(core.delete_user(&root, "bob").unwrap(), 0);

    assert_eq!(store.header(&cfg.users_sheet).unwrap(), header_before);
    assert_eq!(store.read_rows(&cfg.users_sheet).unwrap(), others_before);
}

#[test]
fn test_user_listing_hides_credentials() {
    let core = memory_core();
    let root = admin(&core);
    core.add_user(&root, &new_user("bob", "secret-pw", Role::User, false))
        .unwrap();

    let users = core.list_users(&root).unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].account, "bob");
    assert!(!users[1].enabled);

    let json = serde_json::to_string(&users).unwrap();
    assert!(!json.contains("secret-pw"));
    assert!(!json.contains("scrypt"));
    assert!(!json.contains("credential"));
}

#[test]
fn test_append_then_read_partition() {
    let store: Arc<dyn SheetStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
    let ledger = Ledger::new(store.clone(), Duration::from_secs(60));

    let handle = ledger.get_or_create_partition("202501").unwrap();
    assert!(handle.created);
    assert!(!ledger.get_or_create_partition("202501").unwrap().created);

    ledger
        .append_event(&handle, "alice", "2025/01/15", "09:00:00")
        .unwrap();

    assert!(ledger.list_partitions().unwrap().contains(&"202501".to_string()));

    let table = ledger.read_partition("202501").unwrap();
    assert_eq!(table.header, vec!["name", "date", "time"]);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].cells, vec!["alice", "2025/01/15", "09:00:00"]);

    assert!(matches!(
        ledger.get_or_create_partition("2025-01"),
        Err(AppError::InvalidMonth(_))
    ));
}

#[test]
fn test_partition_listing_ignores_other_sheets() {
    let store: Arc<dyn SheetStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
    store.get_or_create_sheet("users_login", &["account"]).unwrap();
    store.get_or_create_sheet("202502", &["name", "date", "time"]).unwrap();
    store.get_or_create_sheet("202412", &["name", "date", "time"]).unwrap();

    let ledger = Ledger::new(store, Duration::from_secs(60));
    assert_eq!(
        ledger.list_partitions().unwrap().as_ref(),
        &vec!["202412".to_string(), "202502".to_string()]
    );
}

#[test]
fn test_history_is_capped_and_sorted() {
    let store: Arc<dyn SheetStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
    let core = rcheckin::core::Core::new(store.clone(), &test_config()).unwrap();
    core.bootstrap_admin("root", "rootpw").unwrap();
    let root = admin(&core);
    core.add_user(&root, &new_user("alice", "pw1", Role::User, true))
        .unwrap();
    let alice = login(&core, "alice", "pw1");

    let ledger = Ledger::new(store, Duration::from_secs(60));
    let handle = ledger.get_or_create_partition("202501").unwrap();
    // written newest first, so sorting has work to do
    for i in (0..150).rev() {
        let day = i / 24 + 1;
        let hour = i % 24;
        ledger
            .append_event(
                &handle,
                "alice",
                &format!("2025/01/{day:02}"),
                &format!("{hour:02}:00:00"),
            )
            .unwrap();
    }
    ledger
        .append_event(&handle, "bob", "2025/01/01", "00:30:00")
        .unwrap();

    let view = core.history(&alice, "202501", None).unwrap();
    assert_eq!(view.rows.len(), 100);
    assert_eq!(view.total_matched, 150);
    assert_eq!(view.rows[0].index, 1);
    assert_eq!(view.rows[0].date, "2025/01/01");
    assert_eq!(view.rows[0].time, "00:00:00");
    assert!(
        view.rows
            .windows(2)
            .all(|w| (w[0].date.as_str(), w[0].time.as_str()) <= (w[1].date.as_str(), w[1].time.as_str()))
    );
    assert!(view.rows.iter().all(|r| r.identity == "alice"));
}

#[test]
fn test_non_admin_only_sees_own_rows() {
    let store: Arc<dyn SheetStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
    let core = rcheckin::core::Core::new(store.clone(), &test_config()).unwrap();
    core.bootstrap_admin("root", "rootpw").unwrap();
    let root = admin(&core);
    core.add_user(&root, &new_user("alice", "pw1", Role::User, true))
        .unwrap();
    let alice = login(&core, "alice", "pw1");

    let ledger = Ledger::new(store, Duration::from_secs(60));
    let handle = ledger.get_or_create_partition("202501").unwrap();
    ledger.append_event(&handle, "bob", "2025/01/02", "09:00:00").unwrap();
    ledger.append_event(&handle, "alice", "2025/01/03", "09:00:00").unwrap();

    // asking for bob still yields alice's rows only
    let view = core.history(&alice, "202501", Some("bob")).unwrap();
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].identity, "alice");
    assert!(view.users.is_empty());

    let all = core.history(&root, "202501", None).unwrap();
    assert_eq!(all.rows.len(), 2);
    assert_eq!(all.users, vec!["alice".to_string(), "bob".to_string()]);

    let only_bob = core.history(&root, "2025-01", Some("bob")).unwrap();
    assert_eq!(only_bob.rows.len(), 1);
    assert_eq!(only_bob.selected_user.as_deref(), Some("bob"));
}

#[test]
fn test_empty_month_and_no_record() {
    let core = memory_core();
    let root = admin(&core);
    core.add_user(&root, &new_user("alice", "pw1", Role::User, true))
        .unwrap();
    let alice = login(&core, "alice", "pw1");

    // root checks in, alice has nothing yet
    let receipt = core.check_in(&root).unwrap();
    let view = core.history(&alice, &receipt.partition, None).unwrap();
    assert_eq!(view.notice, Some(HistoryNotice::NoRecord));
    assert!(view.rows.is_empty());
}

#[test]
fn test_check_in_creates_current_month() {
    let core = memory_core();
    let root = admin(&core);
    core.add_user(&root, &new_user("alice", "pw1", Role::User, true))
        .unwrap();
    let alice = login(&core, "alice", "pw1");

    let first = core.check_in(&alice).unwrap();
    let second = core.check_in(&alice).unwrap();
    assert_eq!(first.partition, current_month());
    assert_ne!(first.row_id, second.row_id);

    let months = core.months(&alice).unwrap();
    assert_eq!(months.months, vec![current_month()]);
    assert_eq!(months.default, Some(current_month()));

    let view = core.history(&alice, &first.partition, None).unwrap();
    assert_eq!(view.rows.len(), 2);
}

#[test]
fn test_export_is_admin_only() {
    let core = memory_core();
    let root = admin(&core);
    core.add_user(&root, &new_user("alice", "pw1", Role::User, true))
        .unwrap();
    let alice = login(&core, "alice", "pw1");
    let receipt = core.check_in(&alice).unwrap();

    assert!(matches!(
        core.export(&alice, &receipt.partition, None),
        Err(AppError::Forbidden)
    ));

    let file = core.export(&root, &receipt.partition, Some("alice")).unwrap();
    assert_eq!(
        file.file_name,
        format!("{}_alice_checkin_records.xlsx", receipt.partition)
    );
    assert!(file.bytes.starts_with(b"PK"));
}

/// Contents of one part of an xlsx package.
fn xlsx_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("xlsx is a zip");
    let mut part = archive.by_name(name).expect("part exists");
    let mut xml = String::new();
    part.read_to_string(&mut xml).expect("utf-8 xml");
    xml
}

#[test]
fn test_export_holds_exactly_the_displayed_rows() {
    let store: Arc<dyn SheetStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
    let core = rcheckin::core::Core::new(store.clone(), &test_config()).unwrap();
    core.bootstrap_admin("root", "rootpw").unwrap();
    let root = admin(&core);

    let ledger = Ledger::new(store, Duration::from_secs(60));
    let handle = ledger.get_or_create_partition("202501").unwrap();
    for i in 0..150 {
        ledger
            .append_event(
                &handle,
                "alice",
                &format!("2025/01/{:02}", i / 24 + 1),
                &format!("{:02}:00:00", i % 24),
            )
            .unwrap();
    }
    ledger
        .append_event(&handle, "bob", "2025/01/01", "00:30:00")
        .unwrap();

    let view = core.history(&root, "202501", None).unwrap();
    assert_eq!(view.rows.len(), 100);
    assert_eq!(view.total_matched, 151);

    let file = core.export(&root, "202501", None).unwrap();

    let workbook = xlsx_part(&file.bytes, "xl/workbook.xml");
    assert!(workbook.contains(r#"<sheet name="202501""#), "{workbook}");
    assert_eq!(workbook.matches("<sheet ").count(), 1);

    let sheet = xlsx_part(&file.bytes, "xl/worksheets/sheet1.xml");
    assert_eq!(sheet.matches("<row ").count(), 1 + view.rows.len());

    let strings = xlsx_part(&file.bytes, "xl/sharedStrings.xml");
    for header in ["Name", "Date", "Time"] {
        assert!(strings.contains(&format!("<t>{header}</t>")), "{strings}");
    }

    // headers follow the session language
    let zh = core
        .export(&root.with_language(Language::ZhTw), "202501", Some("bob"))
        .unwrap();
    let strings = xlsx_part(&zh.bytes, "xl/sharedStrings.xml");
    for header in ["姓名", "日期", "時間"] {
        assert!(strings.contains(&format!("<t>{header}</t>")), "{strings}");
    }
    let sheet = xlsx_part(&zh.bytes, "xl/worksheets/sheet1.xml");
    assert_eq!(sheet.matches("<row ").count(), 2);
}

#[test]
fn test_account_active_follows_the_credential_sheet() {
    let core = memory_core();
    let root = admin(&core);
    core.add_user(&root, &new_user("alice", "pw1", Role::User, true))
        .unwrap();

    assert!(core.account_active("alice").unwrap());
    core.set_enabled(&root, "alice", false).unwrap();
    assert!(!core.account_active("alice").unwrap());
    core.set_enabled(&root, "alice", true).unwrap();
    core.delete_user(&root, "alice").unwrap();
    assert!(!core.account_active("alice").unwrap());
    assert!(!core.account_active("ghost").unwrap());
}
