use std::path::PathBuf;
use serde::Deserialize;

/// All configuration for the tix console.
///
/// Precedence (lowest to highest): defaults → config file → env var → CLI arg.
/// CLI arg merging is done by the caller after `Config::load()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // Remote console API
    pub api_url: String,
    pub token: Option<String>,

    // Logging
    pub log_level: String,
    pub utc: bool,

    // Display
    pub timezone: String,

    // Check-in
    pub use_policy: String,
}

/// Config file layout (~/.tix/config.toml). All fields optional; they layer
/// on top of compiled-in defaults.
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    api_url: Option<String>,
    token: Option<String>,
    log_level: Option<String>,
    utc: Option<bool>,
    timezone: Option<String>,
    use_policy: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:4000".to_string(),
            token: None,
            log_level: "info".to_string(),
            utc: false,
            timezone: "Asia/Jakarta".to_string(),
            use_policy: "optimistic".to_string(),
        }
    }
}

impl Config {
    /// Config directory: ~/.tix/
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tix")
    }

    /// Config file path: ~/.tix/config.toml
    pub fn file_path() -> PathBuf {
        Self::dir().join("config.toml")
    }

    /// Load config: defaults → config file → env vars.
    /// CLI args should be merged by the caller afterward.
    pub fn load() -> Self {
        let mut config = Self::default();

        // Layer 2: config file
        if let Ok(contents) = std::fs::read_to_string(Self::file_path()) {
            config.apply_toml(&contents);
        }

        // Layer 3: environment variables
        config.apply_env(|key| std::env::var(key).ok());

        config
    }

    // --- Private helpers ---

    /// Layer a TOML document on top. Invalid documents are ignored.
    fn apply_toml(&mut self, contents: &str) -> bool {
        match toml::from_str::<FileConfig>(contents) {
            Ok(file) => {
                self.apply_file(file);
                true
            }
            Err(_) => false,
        }
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(v) = file.api_url { self.api_url = v; }
        if let Some(v) = file.token { self.token = Some(v); }
        if let Some(v) = file.log_level { self.log_level = v; }
        if let Some(v) = file.utc { self.utc = v; }
        if let Some(v) = file.timezone { self.timezone = v; }
        if let Some(v) = file.use_policy { self.use_policy = v; }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("TIX_API_URL") { self.api_url = v; }
        if let Some(v) = var("TIX_TOKEN").filter(|t| !t.is_empty()) { self.token = Some(v); }
        if let Some(v) = var("TIX_LOG_LEVEL") { self.log_level = v; }
        if let Some(v) = var("TIX_UTC") {
            self.utc = v == "1" || v.eq_ignore_ascii_case("true");
        }
        if let Some(v) = var("TIX_TIMEZONE") { self.timezone = v; }
        if let Some(v) = var("TIX_USE_POLICY") { self.use_policy = v; }
    }
}
