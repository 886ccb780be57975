// File: src/settings.rs
use crate::errors::{Result, TranslatorError};
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationMode {
    /// Overwrite the fragment's text.
    #[default]
    Replace,
    /// Leave the fragment alone and add an annotated sibling.
    Append,
}

impl std::str::FromStr for TranslationMode {
    type Err = TranslatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(TranslationMode::Replace),
            "append" => Ok(TranslationMode::Append),
            other => Err(TranslatorError::Config(format!(
                "unknown translation mode '{}'",
                other
            ))),
        }
    }
}

/// A full snapshot. Absent or unreadable fields take the defaults; the
/// other fields are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_true", deserialize_with = "flag_or_true")]
    pub enabled: bool,
    #[serde(default = "default_true", deserialize_with = "flag_or_true")]
    pub show_original: bool,
    #[serde(default, deserialize_with = "mode_or_default")]
    pub translation_mode: TranslationMode,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(T),
    Invalid(IgnoredAny),
}

fn flag_or_true<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<bool, D::Error> {
    Ok(match Lenient::deserialize(d)? {
        Lenient::Valid(flag) => flag,
        Lenient::Invalid(_) => {
            warn!("ignoring non-boolean settings flag, using true");
            true
        }
    })
}

fn mode_or_default<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<TranslationMode, D::Error> {
    Ok(match Lenient::deserialize(d)? {
        Lenient::Valid(mode) => mode,
        Lenient::Invalid(_) => {
            warn!("ignoring unknown translation mode, using replace");
            TranslationMode::default()
        }
    })
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            show_original: true,
            translation_mode: TranslationMode::Replace,
        }
    }
}

/// A partial update keyed by field name, as delivered by change notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_original: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_mode: Option<TranslationMode>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.enabled.is_none() && self.show_original.is_none() && self.translation_mode.is_none()
    }

    /// Parses `field value` pairs using the stored field names.
    pub fn from_field(field: &str, value: &str) -> Result<Self> {
        let flag = || -> Result<bool> {
            value
                .trim()
                .parse::<bool>()
                .map_err(|_| TranslatorError::Config(format!("'{}' is not a boolean", value)))
        };
        let mut update = Self::default();
        match field {
            "enabled" => update.enabled = Some(flag()?),
            "showOriginal" => update.show_original = Some(flag()?),
            "translationMode" => update.translation_mode = Some(value.parse()?),
            other => {
                return Err(TranslatorError::Config(format!(
                    "unknown settings field '{}'",
                    other
                )))
            }
        }
        Ok(update)
    }
}

impl Settings {
    /// Returns a new snapshot with `update` applied on top.
    pub fn merge(self, update: &SettingsUpdate) -> Self {
        Self {
            enabled: update.enabled.unwrap_or(self.enabled),
            show_original: update.show_original.unwrap_or(self.show_original),
            translation_mode: update.translation_mode.unwrap_or(self.translation_mode),
        }
    }
}

/// The external key/value preference store.
pub trait SettingsStore {
    fn load(&self) -> Result<Settings>;

    /// Persists the update and notifies every subscriber. An empty update
    /// is a no-op and notifies nobody.
    fn update(&mut self, update: SettingsUpdate) -> Result<Settings>;

    fn subscribe(&mut self) -> Receiver<SettingsUpdate>;
}

#[derive(Default)]
struct Subscribers {
    senders: Vec<Sender<SettingsUpdate>>,
}

impl Subscribers {
    fn add(&mut self) -> Receiver<SettingsUpdate> {
        let (tx, rx) = unbounded();
        self.senders.push(tx);
        rx
    }

    fn notify(&mut self, update: SettingsUpdate) {
        // drop subscribers whose receiver is gone
        self.senders.retain(|tx| tx.send(update).is_ok());
    }
}

#[derive(Default)]
pub struct MemoryStore {
    settings: Settings,
    subscribers: Subscribers,
}

impl MemoryStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            subscribers: Subscribers::default(),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Settings> {
        Ok(self.settings)
    }

    fn update(&mut self, update: SettingsUpdate) -> Result<Settings> {
        if update.is_empty() {
            return Ok(self.settings);
        }
        self.settings = self.settings.merge(&update);
        self.subscribers.notify(update);
        Ok(self.settings)
    }

    fn subscribe(&mut self) -> Receiver<SettingsUpdate> {
        self.subscribers.add()
    }
}

/// Settings kept as a JSON object on disk. A missing file means defaults.
pub struct JsonFileStore {
    path: PathBuf,
    subscribers: Subscribers,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            subscribers: Subscribers::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let parent_dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent_dir)?;

        let temp_file = NamedTempFile::new_in(parent_dir)?;
        {
            let mut writer = BufWriter::new(&temp_file);
            serde_json::to_writer_pretty(&mut writer, settings)?;
            writer.flush()?;
        }
        temp_file.persist(&self.path)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn update(&mut self, update: SettingsUpdate) -> Result<Settings> {
        let current = self.load()?;
        if update.is_empty() {
            return Ok(current);
        }
        let settings = current.merge(&update);
        self.save(&settings)?;
        debug!(path = %self.path.display(), ?update, "settings saved");
        self.subscribers.notify(update);
        Ok(settings)
    }

    fn subscribe(&mut self) -> Receiver<SettingsUpdate> {
        self.subscribers.add()
    }
}
