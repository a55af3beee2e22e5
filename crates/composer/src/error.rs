use std::path::PathBuf;

use snafu::Snafu;

/// Failures reading or saving the composer settings file.
///
/// Load failures never abort startup: the store keeps defaults and hands the error to
/// the shell so it can be shown. Save failures leave the in-memory settings untouched.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SettingsError {
    #[snafu(display("settings file {path:?} is unreadable, defaults are in use: {source}"))]
    ParseSettings {
        path: PathBuf,
        source: figment::Error,
    },
    #[snafu(display("could not encode settings: {source}"))]
    EncodeSettings { source: serde_json::Error },
    #[snafu(display("could not save settings to {path:?} on `{stage}`: {source}"))]
    SaveSettings {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type SettingsResult<T> = Result<T, SettingsError>;
