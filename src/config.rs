//! Configuration management for docsorter using the prefer crate.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::email::DEFAULT_EMAIL_ENDPOINT;
use crate::extract::{ExtractorKind, DEFAULT_OCR_LANGUAGE};
use crate::storage::StoreKind;

/// Config file basename looked up by prefer and next to the data dir.
pub const CONFIG_NAME: &str = "docsorter";

/// Default pause between files in CLI batches.
pub const DEFAULT_PACING_MS: u64 = 500;

/// Default sender recorded for dashboard emails.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@demo.com";

/// Default bind address for `serve`.
pub const DEFAULT_BIND: &str = "127.0.0.1:5050";

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Storage backend.
    pub store: StoreKind,
    /// Base URL of the email service.
    pub email_endpoint: String,
    /// Sender recorded in the email activity log.
    pub admin_email: String,
    /// Delay between files in milliseconds.
    pub pacing_ms: u64,
    /// Text extraction backend.
    pub extractor: ExtractorKind,
    /// Seed for the synthetic extractor (None = random).
    pub seed: Option<u64>,
    /// Tesseract language for OCR, e.g. `eng` or `deu+eng`.
    pub ocr_language: String,
    /// Address the HTTP API binds to.
    pub bind: String,
}

impl Default for Settings {
    fn default() -> Self {
        // Documents dir -> Home dir -> Current dir
        let data_dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docsorter");

        Self {
            data_dir,
            store: StoreKind::default(),
            email_endpoint: DEFAULT_EMAIL_ENDPOINT.to_string(),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            pacing_ms: DEFAULT_PACING_MS,
            extractor: ExtractorKind::default(),
            seed: None,
            ocr_language: DEFAULT_OCR_LANGUAGE.to_string(),
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl Settings {
    /// Create settings with a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Default::default()
        }
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create data directory '{}': {}",
                    self.data_dir.display(),
                    e
                ),
            )
        })
    }

    /// Apply `DOCSORT_*` overrides using the given variable lookup.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|s| !s.is_empty());

        if let Some(dir) = var("DOCSORT_DATA_DIR") {
            tracing::debug!("Using DOCSORT_DATA_DIR from environment: {}", dir);
            self.data_dir = PathBuf::from(shellexpand::tilde(&dir).as_ref());
        }
        if let Some(store) = var("DOCSORT_STORE") {
            match StoreKind::from_str(&store) {
                Some(kind) => self.store = kind,
                None => tracing::warn!("Ignoring unknown DOCSORT_STORE value: {}", store),
            }
        }
        if let Some(endpoint) = var("DOCSORT_EMAIL_ENDPOINT") {
            self.email_endpoint = endpoint;
        }
        if let Some(admin) = var("DOCSORT_ADMIN_EMAIL") {
            self.admin_email = admin;
        }
        if let Some(lang) = var("DOCSORT_OCR_LANGUAGE") {
            self.ocr_language = lang;
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Storage backend: memory, json or sqlite.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
    /// Email service base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_endpoint: Option<String>,
    /// Sender for dashboard emails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_email: Option<String>,
    /// Delay between files in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pacing_ms: Option<u64>,
    /// Extraction backend: synthetic or poppler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extractor: Option<String>,
    /// Seed for synthetic extraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Tesseract language for OCR.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_language: Option<String>,
    /// Bind address for the HTTP API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    pub async fn load() -> Self {
        match prefer::load(CONFIG_NAME).await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => Self::load_from_path(path).await.unwrap_or_else(|e| {
                    tracing::warn!("{}", e);
                    Self::default()
                }),
                None => Self::default(),
            },
            // No config file found
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// The format follows the file extension; anything unknown is read as JSON.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e))?,
            _ => serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e))?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Directory of the config file, if it came from one.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// `~` is expanded; relative paths are joined onto `base_dir`.
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = self.resolve_path(data_dir, base_dir);
        }
        if let Some(ref store) = self.store {
            match StoreKind::from_str(store) {
                Some(kind) => settings.store = kind,
                None => tracing::warn!("Ignoring unknown store backend in config: {}", store),
            }
        }
        if let Some(ref endpoint) = self.email_endpoint {
            settings.email_endpoint = endpoint.clone();
        }
        if let Some(ref admin) = self.admin_email {
            settings.admin_email = admin.clone();
        }
        if let Some(pacing) = self.pacing_ms {
            settings.pacing_ms = pacing;
        }
        if let Some(ref extractor) = self.extractor {
            match ExtractorKind::from_str(extractor) {
                Some(kind) => settings.extractor = kind,
                None => tracing::warn!("Ignoring unknown extractor in config: {}", extractor),
            }
        }
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(ref lang) = self.ocr_language {
            settings.ocr_language = lang.clone();
        }
        if let Some(ref bind) = self.bind {
            settings.bind = bind.clone();
        }
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Use CWD for relative paths instead of config file directory.
    pub use_cwd: bool,
    /// Data directory (--data flag).
    pub data: Option<PathBuf>,
}

/// Look for a config file inside the data directory.
fn find_config_in_data_dir(data_dir: &Path) -> Option<PathBuf> {
    ["toml", "yaml", "yml", "json"]
        .iter()
        .map(|ext| data_dir.join(format!("{}.{}", CONFIG_NAME, ext)))
        .find(|path| path.exists())
}

/// Load config from file sources.
async fn load_file_config(options: &LoadOptions) -> Config {
    // Priority 1: Explicit --config flag
    if let Some(ref config_path) = options.config_path {
        return Config::load_from_path(config_path)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("{}", e);
                Config::default()
            });
    }

    // Priority 2: Config inside the data dir
    if let Some(ref data_dir) = options.data {
        if let Some(config_path) = find_config_in_data_dir(data_dir) {
            tracing::debug!("Found config in data dir: {}", config_path.display());
            return Config::load_from_path(&config_path)
                .await
                .unwrap_or_else(|_| Config::default());
        }
    }

    // Priority 3: Auto-discover via prefer
    Config::load().await
}

/// Load settings with explicit options.
///
/// Precedence, lowest first: defaults, config file, `DOCSORT_*`
/// environment variables, the --data flag.
pub async fn load_settings_with_options(options: LoadOptions) -> (Settings, Config) {
    let config = load_file_config(&options).await;
    let mut settings = Settings::default();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let base_dir = if options.use_cwd {
        cwd.clone()
    } else {
        config.base_dir().unwrap_or_else(|| cwd.clone())
    };

    config.apply_to_settings(&mut settings, &base_dir);
    settings.apply_env_overrides(|name| std::env::var(name).ok());

    if let Some(data) = options.data {
        settings.data_dir = config.resolve_path(&data.to_string_lossy(), &cwd);
    }

    (settings, config)
}
