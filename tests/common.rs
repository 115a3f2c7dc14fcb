#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rcheckin::config::Config;
use rcheckin::core::Core;
use rcheckin::models::session::SessionContext;
use rcheckin::store::SqliteStore;
use rcheckin::utils::date;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Cheap scrypt cost so hashing does not dominate test time.
pub const TEST_LOG_N: u8 = 4;

pub const ROOT: &str = "root";
pub const ROOT_PW: &str = "rootpw";

pub fn rci(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("rcheckin");
    cmd.env("HOME", home)
        .env_remove("RCHECKIN_DB")
        .env_remove("RCHECKIN_BIND")
        .env_remove("RCHECKIN_PORT");
    cmd
}

/// A private HOME with a config file, plus a database path inside it.
pub struct TestEnv {
    pub home: PathBuf,
    pub db: String,
}

impl TestEnv {
    /// `rcheckin --db <db> ...`
    pub fn cmd(&self) -> Command {
        let mut cmd = rci(&self.home);
        cmd.args(["--db", &self.db]);
        cmd
    }

    /// `init --admin root --password rootpw`
    pub fn init_with_admin(&self) {
        self.cmd()
            .args(["--test", "init", "--admin", ROOT, "--password", ROOT_PW])
            .assert()
            .success();
    }

    pub fn out_file(&self, name: &str) -> PathBuf {
        self.home.join(name)
    }
}

/// Fresh environment under the system temp dir; any previous run is removed.
pub fn setup_env(name: &str) -> TestEnv {
    let mut home: PathBuf = env::temp_dir();
    home.push(format!("rcheckin_test_{name}"));
    fs::remove_dir_all(&home).ok();

    let conf_dir = home.join(".rcheckin");
    fs::create_dir_all(&conf_dir).expect("create config dir");
    fs::write(
        conf_dir.join("rcheckin.conf"),
        format!("password_log_n: {TEST_LOG_N}\ndefault_language: en\nutc_offset_hours: 8\n"),
    )
    .expect("write config");

    let db = home.join("rcheckin.sqlite").to_string_lossy().to_string();
    TestEnv { home, db }
}

pub fn test_config() -> Config {
    Config {
        database: ":memory:".to_string(),
        password_log_n: TEST_LOG_N,
        default_language: rcheckin::models::language::Language::En,
        ..Config::default()
    }
}

/// Core over an in-memory store, with the `root` admin already created.
pub fn memory_core() -> Core {
    memory_core_with(&test_config())
}

pub fn memory_core_with(cfg: &Config) -> Core {
    let store = SqliteStore::open_in_memory().expect("open in-memory store");
    let core = Core::new(Arc::new(store), cfg).expect("core");
    core.bootstrap_admin(ROOT, ROOT_PW).expect("bootstrap admin");
    core
}

pub fn login(core: &Core, account: &str, secret: &str) -> SessionContext {
    core.login(&core.new_session(), account, secret)
        .expect("login succeeds")
}

pub fn admin(core: &Core) -> SessionContext {
    login(core, ROOT, ROOT_PW)
}

/// `YYYYMM` of today in the test offset (+8).
pub fn current_month() -> String {
    date::month_label(&date::now_in(8))
}
