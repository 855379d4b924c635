use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use shared_logging::LogLevel;

use crate::{
    arbitration::ClassifierSettings,
    model::{DEFAULT_CURRENCY, DEFAULT_PRICE_SOURCE},
};

/// Runtime configuration for the voice pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceConfig {
    /// Constants stamped onto requests.
    pub classifier: ClassifierSection,
    /// Log and event destinations.
    pub telemetry: TelemetrySection,
    /// Record and project files.
    pub storage: StorageSection,
}

/// `[classifier]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassifierSection {
    /// Three-letter currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Price provenance label.
    #[serde(default = "default_price_source")]
    pub price_source: String,
}

impl Default for ClassifierSection {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            price_source: default_price_source(),
        }
    }
}

/// `[telemetry]` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetrySection {
    /// JSON-lines log file.
    pub log_path: Option<PathBuf>,
    /// JSON-lines event file.
    pub event_log: Option<PathBuf>,
    /// Floor for file logging.
    pub min_level: LogLevel,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            log_path: None,
            event_log: None,
            min_level: LogLevel::Info,
        }
    }
}

/// `[storage]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageSection {
    /// JSON-lines record file.
    #[serde(default = "default_records_path")]
    pub records_path: PathBuf,
    /// JSON project list.
    #[serde(default)]
    pub projects_path: Option<PathBuf>,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            records_path: default_records_path(),
            projects_path: None,
        }
    }
}

impl VoiceConfig {
    /// Loads configuration from a TOML file. Relative paths resolve against
    /// the file's folder.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading voice config {}", path.display()))?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::parse(&raw, &base).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parses TOML text, resolving relative paths against `base`.
    pub fn parse(raw: &str, base: &Path) -> Result<Self> {
        let document: VoiceConfigSerde = toml::from_str(raw)?;
        let classifier = document.classifier;
        let currency = classifier.currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            bail!("invalid currency code `{}`", classifier.currency);
        }
        let min_level = match document.telemetry.min_level.as_deref() {
            Some(raw) => raw.parse()?,
            None => LogLevel::Info,
        };
        let resolve = |candidate: PathBuf| {
            if candidate.is_absolute() {
                candidate
            } else {
                base.join(candidate)
            }
        };
        Ok(Self {
            classifier: ClassifierSection {
                currency: currency.to_ascii_uppercase(),
                price_source: classifier.price_source,
            },
            telemetry: TelemetrySection {
                log_path: document.telemetry.log_path.map(resolve),
                event_log: document.telemetry.event_log.map(resolve),
                min_level,
            },
            storage: StorageSection {
                records_path: resolve(document.storage.records_path),
                projects_path: document.storage.projects_path.map(resolve),
            },
        })
    }

    /// Settings handed to the classifier.
    #[must_use]
    pub fn classifier_settings(&self) -> ClassifierSettings {
        ClassifierSettings {
            currency: self.classifier.currency.clone(),
            price_source: self.classifier.price_source.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VoiceConfigSerde {
    #[serde(default)]
    classifier: ClassifierSection,
    #[serde(default)]
    telemetry: TelemetrySerde,
    #[serde(default)]
    storage: StorageSection,
}

#[derive(Debug, Default, Deserialize)]
struct TelemetrySerde {
    #[serde(default)]
    log_path: Option<PathBuf>,
    #[serde(default)]
    event_log: Option<PathBuf>,
    #[serde(default)]
    min_level: Option<String>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_price_source() -> String {
    DEFAULT_PRICE_SOURCE.to_string()
}

fn default_records_path() -> PathBuf {
    PathBuf::from("data/records.jsonl")
}
