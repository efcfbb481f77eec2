use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Path of the TOML config file. Unset means built-in defaults.
pub const CONFIG_ENV: &str = "SLIPSCAN_CONFIG";
/// Overrides `bind_addr` from the file.
pub const BIND_ADDR_ENV: &str = "SLIPSCAN_BIND_ADDR";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract `tessdata` directory; `None` uses the engine default.
    pub data_path: Option<String>,
    pub lang: String,
    pub contrast_stretch: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self { data_path: None, lang: "eng".to_string(), contrast_stretch: false }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Directory holding libpdfium; falls back to the system library.
    pub library_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub max_upload_bytes: usize,
    pub log_format: LogFormat,
    pub ocr: OcrConfig,
    pub pdf: PdfConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
            log_format: LogFormat::default(),
            ocr: OcrConfig::default(),
            pdf: PdfConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_content)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Config file named by `SLIPSCAN_CONFIG` (or defaults), then environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        if let Ok(addr) = std::env::var(BIND_ADDR_ENV) {
            config.bind_addr = addr;
        }
        Ok(config)
    }
}
