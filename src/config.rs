use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::normalize::default_aliases;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub display: DisplayConfig,
    pub search: SearchConfig,
    pub log: LogConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DatasetConfig {
    // SQLite file, or a `.json` export of the same rows
    pub path: PathBuf,
    pub table: String,
    pub term_column: String,
    pub translation_column: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub language: String,
    // TUI mode: "interactive" or "simple"
    pub tui_mode: String,
    // Whether to use terminal alternate screen in interactive mode
    pub alt_screen: bool,
    pub per_page: usize,
    pub search_limit: usize,
    // Load the next page when the viewport is this many rows from the end
    pub prefetch_rows: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    // canonical glyph -> glyphs that should match it
    pub aliases: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    // Empty means ~/.slovar/slovar.log
    pub file: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("kar_rus.db"),
            table: "kar_rus".to_string(),
            term_column: "word".to_string(),
            translation_column: "translation".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            tui_mode: "interactive".to_string(),
            alt_screen: false,
            per_page: 100,
            search_limit: 100,
            prefetch_rows: 20,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            aliases: default_aliases(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: String::new(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_path();

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("reading {}", config_path.display()))?;
            Self::from_toml(&content)
                .with_context(|| format!("parsing {}", config_path.display()))
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path();
        fs::create_dir_all(Self::get_base_dir())?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn get_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".slovar")
    }

    fn get_config_path() -> PathBuf {
        Self::get_base_dir().join("config.toml")
    }

    pub fn get_effective_language(&self) -> String {
        if self.display.language == "auto" {
            // Try to get system language
            std::env::var("LANG")
                .unwrap_or_else(|_| "en_US".to_string())
                .split('.')
                .next()
                .unwrap_or("en")
                .to_string()
        } else {
            self.display.language.clone()
        }
    }

    pub fn log_file(&self) -> PathBuf {
        if self.log.file.trim().is_empty() {
            Self::get_base_dir().join("slovar.log")
        } else {
            PathBuf::from(&self.log.file)
        }
    }

    /// Apply `SLOVAR_*` environment overrides. Env wins over the file.
    pub fn apply_env(&mut self) {
        if let Ok(path) = std::env::var("SLOVAR_DB") {
            if !path.trim().is_empty() {
                self.dataset.path = PathBuf::from(path);
            }
        }
        if let Ok(v) = std::env::var("SLOVAR_TUI") {
            let v = v.to_lowercase();
            if v == "0" || v == "false" || v == "simple" {
                self.display.tui_mode = "simple".to_string();
            } else {
                self.display.tui_mode = "interactive".to_string();
            }
        }
        if let Ok(v) = std::env::var("SLOVAR_ALT_SCREEN") {
            let v = v.to_lowercase();
            self.display.alt_screen = !(v == "0" || v == "false");
        }
    }

    pub fn is_simple_mode(&self) -> bool {
        self.display.tui_mode.to_lowercase() == "simple"
    }
}
