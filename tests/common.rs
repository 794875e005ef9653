#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use tempfile::TempDir;

pub const EMAIL: &str = "student@example.com";
pub const PASSWORD: &str = "secret-pass";

/// Isolated HOME + database for one test, always on the local backend.
pub struct Sandbox {
    pub home: TempDir,
    pub db: String,
}

impl Sandbox {
    pub fn new() -> Self {
        let home = tempfile::tempdir().expect("create temp home");
        let db = home
            .path()
            .join("pacer_test.sqlite")
            .to_string_lossy()
            .to_string();
        Self { home, db }
    }

    /// `pacer --db <tmp> --backend local …` with a clean environment
    pub fn pacer(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("pacer");
        cmd.env("HOME", self.home.path())
            .env("APPDATA", self.home.path())
            .env_remove("PACER_EMAIL")
            .env_remove("PACER_PASSWORD")
            .env_remove("PACER_SUPABASE_URL")
            .env_remove("PACER_SUPABASE_KEY")
            .args(["--db", &self.db, "--backend", "local"]);
        cmd
    }

    /// Absolute output path inside the sandbox
    pub fn out(&self, name: &str) -> String {
        self.home.path().join(name).to_string_lossy().to_string()
    }

    pub fn init(self) -> Self {
        self.pacer().args(["--test", "init"]).assert().success();
        self
    }

    /// Initialized sandbox with a signed-in local account
    pub fn signed_in() -> Self {
        let sb = Self::new().init();
        sb.pacer()
            .args(["signup", "--email", EMAIL, "--password", PASSWORD])
            .assert()
            .success();
        sb
    }

    pub fn add(&self, date: &str, hours: &str) {
        self.pacer()
            .args(["add", "--date", date, "--hours", hours])
            .assert()
            .success();
    }
}
