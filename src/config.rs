use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::collector::{DateWindow, SearchQuery};
use crate::error::{AppError, Result};

const APP_DIR: &str = "election-sentiment";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_db_path")]
    pub db_path: String,

    pub bearer_token: Option<String>,

    #[serde(default = "default_search_environment")]
    pub search_environment: String,

    #[serde(default = "default_topic")]
    pub topic: String,

    #[serde(default = "default_date_from")]
    pub date_from: String,

    #[serde(default = "default_date_to")]
    pub date_to: String,

    #[serde(default = "default_max_items")]
    pub max_items: usize,

    #[serde(default = "default_model_path")]
    pub model_path: String,

    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn default_data_dir() -> String {
    app_data_dir().to_string_lossy().to_string()
}

fn default_db_path() -> String {
    let data_dir = app_data_dir();
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("archive.db").to_string_lossy().to_string()
}

fn default_search_environment() -> String {
    "dev".to_string()
}

fn default_topic() -> String {
    "#Elecciones4M".to_string()
}

fn default_date_from() -> String {
    "202105040900".to_string()
}

fn default_date_to() -> String {
    "202105042300".to_string()
}

fn default_max_items() -> usize {
    1000
}

fn default_model_path() -> String {
    app_data_dir()
        .join("models")
        .join("sentiment-nb.json")
        .to_string_lossy()
        .to_string()
}

fn default_top_k() -> usize {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            db_path: default_db_path(),
            bearer_token: None,
            search_environment: default_search_environment(),
            topic: default_topic(),
            date_from: default_date_from(),
            date_to: default_date_to(),
            max_items: default_max_items(),
            model_path: default_model_path(),
            top_k: default_top_k(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Reads `path`, writing the defaults there first if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    pub fn raw_csv_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join("raw").join("data.csv")
    }

    pub fn prepared_csv_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join("processed").join("data_prepared.csv")
    }

    pub fn scored_csv_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join("processed").join("data_sentiment.csv")
    }

    pub fn report_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join("processed").join("report.json")
    }

    pub fn search_query(&self) -> SearchQuery {
        SearchQuery {
            topic: self.topic.clone(),
            window: DateWindow {
                from: self.date_from.clone(),
                to: self.date_to.clone(),
            },
            max_items: self.max_items,
        }
    }
}
