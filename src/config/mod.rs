use crate::backend::BackendKind;
use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

pub mod migrate;

pub const ENV_SUPABASE_URL: &str = "PACER_SUPABASE_URL";
pub const ENV_SUPABASE_KEY: &str = "PACER_SUPABASE_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_backend")]
    pub backend: BackendKind,
    #[serde(default)]
    pub supabase_url: String,
    #[serde(default)]
    pub supabase_key: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_chart_height")]
    pub chart_height: usize,
}

fn default_backend() -> BackendKind {
    BackendKind::Supabase
}
fn default_request_timeout() -> u64 {
    30
}
fn default_chart_height() -> usize {
    15
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            backend: default_backend(),
            supabase_url: String::new(),
            supabase_key: String::new(),
            request_timeout_secs: default_request_timeout(),
            chart_height: default_chart_height(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("pacer")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".pacer")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("pacer.conf")
    }

    /// Return the full path of the local SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("pacer.sqlite")
    }

    /// Load configuration from file (defaults if not found), then apply
    /// environment overrides.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        let mut cfg = if path.exists() {
            let content = fs::read_to_string(&path)?;
            Self::from_yaml(&content)?
        } else {
            Config::default()
        };

        cfg.apply_env();
        Ok(cfg)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let mut cfg: Config = serde_yaml::from_str(content).map_err(|e| {
            AppError::Config(format!(
                "failed to parse {}: {}",
                Self::config_file().display(),
                e
            ))
        })?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        Ok(cfg)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| AppError::Config(format!("failed to serialize configuration: {}", e)))
    }

    fn apply_env(&mut self) {
        if let Ok(url) = env::var(ENV_SUPABASE_URL)
            && !url.trim().is_empty()
        {
            self.supabase_url = url.trim().to_string();
        }
        if let Ok(key) = env::var(ENV_SUPABASE_KEY)
            && !key.trim().is_empty()
        {
            self.supabase_key = key.trim().to_string();
        }
    }

    /// Initialize configuration and database files
    pub fn init_all(
        custom_db: Option<String>,
        backend: Option<BackendKind>,
        is_test: bool,
    ) -> AppResult<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_db {
            let p = expand_tilde(&name);
            if p.is_absolute() { p } else { dir.join(p) }
        } else {
            Self::database_file()
        };

        // Keep an existing file's settings (e.g. Supabase credentials)
        let mut config = if Self::config_file().exists() {
            Self::from_yaml(&fs::read_to_string(Self::config_file())?)?
        } else {
            Config::default()
        };
        config.database = db_path.to_string_lossy().to_string();
        if let Some(kind) = backend {
            config.backend = kind;
        }

        if !is_test {
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(config)
    }
}
