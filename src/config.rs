//! Runtime configuration.
//!
//! Every knob has a default matching the shipped landing page; an optional
//! TOML file overrides any subset of them. `ORBE_CONFIG` names the file
//! (default `orbe.toml` in the working directory) and `ORBE_STORE` relocates
//! the local store file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::Error;
use crate::particles::FieldConfig;

pub const DEFAULT_CONFIG_FILE: &str = "orbe.toml";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub particles: FieldConfig,
    pub page: PageConfig,
    pub i18n: I18nConfig,
    pub storage: StorageConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,
    pub target_fps: usize,
    pub background: [u8; 3],
    /// Where F12 snapshots are written.
    pub snapshot_dir: PathBuf,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Orbe Tácticos".to_owned(),
            width: 1280,
            height: 800,
            target_fps: 60,
            background: [10, 14, 12],
            snapshot_dir: PathBuf::from("."),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Scroll offset (px) past which the navbar turns solid.
    pub scroll_threshold: f32,
    /// Visible share at which a panel is revealed.
    pub reveal_threshold: f32,
    /// Launch instant, RFC 3339; no offset means UTC.
    pub launch_at: String,
    pub resize_debounce_ms: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: 50.0,
            reveal_threshold: 0.1,
            launch_at: "2026-03-31T00:00:00".to_owned(),
            resize_debounce_ms: 250,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    pub default_lang: String,
    pub storage_key: String,
    pub translation_paths: Vec<PathBuf>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_lang: "es".to_owned(),
            storage_key: "orbe-lang".to_owned(),
            translation_paths: vec![
                PathBuf::from("data/translations.json"),
                PathBuf::from("./data/translations.json"),
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: PathBuf,
    pub submissions_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("orbe-storage.json"), submissions_key: "orbe-submissions".to_owned() }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// An explicitly named file must load; the default file is optional.
    pub fn load_from(explicit: Option<&Path>, default_file: &Path) -> Result<Self, Error> {
        if let Some(path) = explicit {
            info!(path = %path.display(), "loading config");
            return Self::from_toml_file(path);
        }
        if default_file.exists() {
            info!(path = %default_file.display(), "loading config");
            return Self::from_toml_file(default_file);
        }
        Ok(Self::default())
    }

    /// Resolve from the environment (call after `dotenv`).
    pub fn from_env() -> Result<Self, Error> {
        let explicit = env::var_os("ORBE_CONFIG").map(PathBuf::from);
        let mut config = Self::load_from(explicit.as_deref(), Path::new(DEFAULT_CONFIG_FILE))?;
        if let Some(store) = env::var_os("ORBE_STORE") {
            config.storage.path = PathBuf::from(store);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_page() {
        let c = Config::default();
        assert_eq!(c.particles.particle_count, 50);
        assert_eq!(c.particles.particle_link_distance, 150.0);
        assert_eq!(c.particles.pointer_link_distance, 200.0);
        assert_eq!(c.page.scroll_threshold, 50.0);
        assert_eq!(c.page.resize_debounce_ms, 250);
        assert_eq!(c.i18n.default_lang, "es");
        assert_eq!(c.i18n.storage_key, "orbe-lang");
        assert_eq!(c.storage.submissions_key, "orbe-submissions");
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let c = Config::from_toml_str(
            r#"
            [particles]
            particle_count = 80

            [i18n]
            default_lang = "en"
            "#,
        )
        .unwrap();
        assert_eq!(c.particles.particle_count, 80);
        assert_eq!(c.particles.pointer_link_distance, 200.0);
        assert_eq!(c.i18n.default_lang, "en");
        assert_eq!(c.i18n.storage_key, "orbe-lang");
        assert_eq!(c.window, WindowConfig::default());
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        assert!(matches!(Config::from_toml_str("[particles\n"), Err(Error::Config(_))));
    }

    #[test]
    fn load_from_rules() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("orbe.toml");
        assert_eq!(Config::load_from(None, &absent).unwrap(), Config::default());
        assert!(Config::load_from(Some(&absent), &absent).is_err());

        fs::write(&absent, "[window]\ntarget_fps = 30\n").unwrap();
        assert_eq!(Config::load_from(None, &absent).unwrap().window.target_fps, 30);
    }
}
