use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use figment::{
    Figment,
    providers::{Format, Json, Serialized},
};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::error::{
    EncodeSettingsSnafu, ParseSettingsSnafu, SaveSettingsSnafu, SettingsError, SettingsResult,
};
use crate::store::Theme;
use crate::surface::SurfaceConfig;

pub const DEFAULT_PLACEHOLDER: &str = "Message Flint AI";
pub const DEFAULT_MAX_ROWS: usize = 8;
pub const DEFAULT_MAX_HEIGHT: f32 = 200.0;
pub const DEFAULT_MAX_CHARS: usize = 4000;
pub const DEFAULT_LINE_HEIGHT: f32 = 20.0;
pub const DEFAULT_CONTENT_WIDTH: f32 = 680.0;
pub const DEFAULT_VERTICAL_PADDING: f32 = 8.0;
/// Upper bound for `max_chars`; far above any prompt a model accepts.
pub const MAX_CHARS_LIMIT: usize = 1_000_000;
pub const SETTINGS_DIRECTORY_NAME: &str = "flint";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposerSettings {
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
    #[serde(default = "default_max_height")]
    pub max_height: f32,
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_line_height")]
    pub line_height: f32,
    #[serde(default = "default_content_width")]
    pub content_width: f32,
    #[serde(default = "default_vertical_padding")]
    pub vertical_padding: f32,
    #[serde(default)]
    pub theme: Theme,
}

impl Default for ComposerSettings {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
            max_rows: default_max_rows(),
            max_height: default_max_height(),
            max_chars: default_max_chars(),
            line_height: default_line_height(),
            content_width: default_content_width(),
            vertical_padding: default_vertical_padding(),
            theme: Theme::default(),
        }
    }
}

impl ComposerSettings {
    pub fn normalized(mut self) -> Self {
        self.placeholder = self.placeholder.trim().to_string();
        if self.placeholder.is_empty() {
            self.placeholder = default_placeholder();
        }
        if !self.line_height.is_finite() || self.line_height <= 0.0 {
            self.line_height = default_line_height();
        }
        if !self.content_width.is_finite() || self.content_width <= 0.0 {
            self.content_width = default_content_width();
        }
        if !self.vertical_padding.is_finite() || self.vertical_padding < 0.0 {
            self.vertical_padding = default_vertical_padding();
        }
        self.max_rows = self.max_rows.max(1);
        self.max_chars = self.max_chars.clamp(1, MAX_CHARS_LIMIT);

        // A cap below one padded line would make the minimum row unreachable.
        let single_row = self.line_height + self.vertical_padding * 2.0;
        if !self.max_height.is_finite() || self.max_height < single_row {
            self.max_height = single_row;
        }

        self
    }

    pub fn surface_config(&self) -> SurfaceConfig {
        SurfaceConfig {
            max_rows: self.max_rows,
            max_height: self.max_height,
            line_height: self.line_height,
            vertical_padding: self.vertical_padding,
        }
    }
}

/// Owns the on-disk settings file and the live copy every view reads.
pub struct SettingsStore {
    settings: Arc<ArcSwap<ComposerSettings>>,
    path: PathBuf,
    load_error: Option<SettingsError>,
}

impl SettingsStore {
    /// `<config dir>/flint/settings.json`, or `.flint/settings.json` when the platform
    /// reports no config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".flint"))
            .join(SETTINGS_FILE_NAME)
    }

    /// Opens the store at `path`. An unreadable file falls back to defaults and the
    /// reason is kept in [`SettingsStore::load_error`].
    pub fn open(path: PathBuf) -> Self {
        let (settings, load_error) = match read_settings(&path) {
            Ok(settings) => (settings, None),
            Err(error) => {
                tracing::warn!("{error}");
                (ComposerSettings::default(), Some(error))
            }
        };

        Self {
            settings: Arc::new(ArcSwap::from_pointee(settings)),
            path,
            load_error,
        }
    }

    pub fn load() -> Self {
        Self::open(Self::default_path())
    }

    pub fn settings(&self) -> Arc<ComposerSettings> {
        self.settings.load_full()
    }

    /// Why the file on disk was ignored at startup, if it was.
    pub fn load_error(&self) -> Option<&SettingsError> {
        self.load_error.as_ref()
    }

    /// Normalizes, saves, then publishes. A failed save keeps the previous settings live.
    pub fn update(&self, settings: ComposerSettings) -> SettingsResult<()> {
        let settings = settings.normalized();
        write_settings(&self.path, &settings)?;
        self.settings.store(Arc::new(settings));
        Ok(())
    }

    /// Saves a new theme choice while keeping every other field.
    pub fn set_theme(&self, theme: Theme) -> SettingsResult<()> {
        let mut settings = (*self.settings()).clone();
        settings.theme = theme;
        self.update(settings)
    }
}

fn read_settings(path: &Path) -> SettingsResult<ComposerSettings> {
    if !path.exists() {
        tracing::info!("no settings file at {:?}, using defaults", path);
        return Ok(ComposerSettings::default());
    }

    let settings = Figment::from(Serialized::defaults(ComposerSettings::default()))
        .merge(Json::file(path))
        .extract::<ComposerSettings>()
        .context(ParseSettingsSnafu { path })?;
    Ok(settings.normalized())
}

/// Writes next to the target and renames over it, so a crash never leaves a torn file.
fn write_settings(path: &Path, settings: &ComposerSettings) -> SettingsResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context(SaveSettingsSnafu {
            stage: "create-directory",
            path: parent,
        })?;
    }

    let content = serde_json::to_string_pretty(settings).context(EncodeSettingsSnafu)?;

    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, content).context(SaveSettingsSnafu {
        stage: "write-temporary-file",
        path: &temp_path,
    })?;

    if let Err(source) = std::fs::rename(&temp_path, path) {
        if let Err(error) = std::fs::remove_file(&temp_path) {
            tracing::warn!("could not remove {:?}: {error}", temp_path);
        }
        return Err(source).context(SaveSettingsSnafu {
            stage: "replace-settings-file",
            path,
        });
    }

    tracing::debug!("saved settings to {:?}", path);
    Ok(())
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

fn default_max_rows() -> usize {
    DEFAULT_MAX_ROWS
}

fn default_max_height() -> f32 {
    DEFAULT_MAX_HEIGHT
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

fn default_line_height() -> f32 {
    DEFAULT_LINE_HEIGHT
}

fn default_content_width() -> f32 {
    DEFAULT_CONTENT_WIDTH
}

fn default_vertical_padding() -> f32 {
    DEFAULT_VERTICAL_PADDING
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SettingsStore::open(dir.path().join("absent.json"));
        assert_eq!(*store.settings(), ComposerSettings::default());
        assert!(store.load_error().is_none());
    }

    #[test]
    fn partial_file_is_merged_over_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, r#"{ "max_chars": 12, "theme": "light" }"#).expect("write");

        let settings = SettingsStore::open(path).settings();
        assert_eq!(settings.max_chars, 12);
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.placeholder, DEFAULT_PLACEHOLDER);
        assert_eq!(settings.max_rows, DEFAULT_MAX_ROWS);
    }

    #[test]
    fn malformed_file_keeps_defaults_and_reports_why() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "{ not json").expect("write");

        let store = SettingsStore::open(path.clone());
        assert_eq!(*store.settings(), ComposerSettings::default());

        let error = store.load_error().expect("load error recorded");
        assert!(matches!(error, SettingsError::ParseSettings { path: p, .. } if *p == path));
        assert!(error.to_string().contains("defaults are in use"));
    }

    #[test]
    fn wrongly_typed_field_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, r#"{ "max_rows": "eight" }"#).expect("write");

        let store = SettingsStore::open(path);
        assert_eq!(store.settings().max_rows, DEFAULT_MAX_ROWS);
        assert!(store.load_error().is_some());
    }

    #[test]
    fn update_persists_and_reloads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(SETTINGS_FILE_NAME);
        let store = SettingsStore::open(path.clone());

        store.set_theme(Theme::Light).expect("persist theme");
        assert_eq!(store.settings().theme, Theme::Light);
        assert!(!path.with_extension("json.tmp").exists());

        let reloaded = SettingsStore::open(path);
        assert_eq!(reloaded.settings().theme, Theme::Light);
        assert!(reloaded.load_error().is_none());
    }

    #[test]
    fn failed_replace_cleans_up_and_keeps_live_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        // A non-empty directory where the file should be makes the final rename fail.
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::create_dir_all(path.join("occupied")).expect("create blocker");

        let store = SettingsStore::open(path.clone());
        let error = store.set_theme(Theme::Light).expect_err("rename must fail");

        assert!(matches!(
            error,
            SettingsError::SaveSettings {
                stage: "replace-settings-file",
                ..
            }
        ));
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(store.settings().theme, Theme::default());
    }

    #[test]
    fn normalization_repairs_degenerate_values() {
        let settings = ComposerSettings {
            placeholder: "   ".to_string(),
            max_rows: 0,
            max_height: 4.0,
            max_chars: 0,
            line_height: -1.0,
            content_width: 0.0,
            vertical_padding: f32::NAN,
            theme: Theme::Dark,
        }
        .normalized();

        assert_eq!(settings.placeholder, DEFAULT_PLACEHOLDER);
        assert_eq!(settings.max_rows, 1);
        assert_eq!(settings.max_chars, 1);
        assert_eq!(settings.line_height, DEFAULT_LINE_HEIGHT);
        assert_eq!(settings.vertical_padding, DEFAULT_VERTICAL_PADDING);
        assert_eq!(
            settings.max_height,
            DEFAULT_LINE_HEIGHT + DEFAULT_VERTICAL_PADDING * 2.0
        );
        assert_eq!(settings.content_width, DEFAULT_CONTENT_WIDTH);
    }

    #[test]
    fn oversized_char_cap_is_clamped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, format!(r#"{{ "max_chars": {} }}"#, usize::MAX)).expect("write");

        assert_eq!(SettingsStore::open(path).settings().max_chars, MAX_CHARS_LIMIT);
    }
}
