use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

/// Application colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Process-wide application state shared between the composer and detached controls.
///
/// One instance is created at application start and cloned into every component that
/// needs it. Clones share the same underlying cells, so a write through one handle is
/// immediately visible through all others.
#[derive(Clone)]
pub struct AppStore {
    prompt: Arc<ArcSwap<String>>,
    theme: Arc<ArcSwap<Theme>>,
}

impl AppStore {
    pub fn new(theme: Theme) -> Self {
        Self {
            prompt: Arc::new(ArcSwap::from_pointee(String::new())),
            theme: Arc::new(ArcSwap::from_pointee(theme)),
        }
    }

    /// Latest mirrored draft.
    pub fn prompt(&self) -> Arc<String> {
        self.prompt.load_full()
    }

    pub fn set_prompt(&self, prompt: impl Into<String>) {
        self.prompt.store(Arc::new(prompt.into()));
    }

    pub fn theme(&self) -> Theme {
        **self.theme.load()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.theme.store(Arc::new(theme));
    }

    /// Flips between light and dark and returns the new theme.
    pub fn toggle_theme(&self) -> Theme {
        let next = self.theme().toggled();
        self.set_theme(next);
        tracing::debug!("app theme switched to {next}");
        next
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl fmt::Debug for AppStore {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AppStore")
            .field("prompt", &self.prompt())
            .field("theme", &self.theme())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_prompt_cell() {
        let store = AppStore::default();
        let reader = store.clone();

        store.set_prompt("draft in progress");
        assert_eq!(reader.prompt().as_str(), "draft in progress");
    }

    #[test]
    fn toggle_theme_round_trips() {
        let store = AppStore::new(Theme::Light);
        assert_eq!(store.toggle_theme(), Theme::Dark);
        assert_eq!(store.toggle_theme(), Theme::Light);
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn theme_serializes_as_lowercase_name() {
        assert_eq!(Theme::Dark.to_string(), "dark");
        assert_eq!(
            serde_json::to_string(&Theme::Light).expect("serialize theme"),
            r#""light""#
        );
    }
}
