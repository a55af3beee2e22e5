use crate::events::{ChangeOutcome, Submit};
use crate::gate::Affordances;
use crate::session::UserStore;
use crate::settings::ComposerSettings;
use crate::store::AppStore;
use crate::surface::{AdaptiveSurface, Geometry, RenderSurface};
use crate::tracker::ChangeTracker;

/// Name of the only field the composer accepts input for.
pub const PROMPT_FIELD: &str = "prompt";

/// Ring drawn around the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusRing {
    Highlighted,
    Neutral,
}

/// Visual state of the send control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendStyle {
    Active,
    Muted,
}

/// Side effects the view must apply after a render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderEffects {
    /// Startup prompt was copied into the draft during this pass.
    pub injected: bool,
    /// New geometry, present only when the draft changed since the last measurement.
    pub geometry: Option<Geometry>,
    /// The text surface should take input focus.
    pub focus: bool,
}

/// Owns the draft for one mounted composer and keeps the shared prompt mirror in step.
pub struct ComposerState {
    draft: String,
    max_chars: usize,
    surface: AdaptiveSurface,
    startup: ChangeTracker<Option<String>>,
    store: AppStore,
    users: UserStore,
}

impl ComposerState {
    pub fn new(settings: &ComposerSettings, store: AppStore, users: UserStore) -> Self {
        Self {
            draft: String::new(),
            max_chars: settings.max_chars.max(1),
            surface: AdaptiveSurface::new(settings.surface_config()),
            startup: ChangeTracker::new(),
            store,
            users,
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn geometry(&self) -> Geometry {
        self.surface.geometry()
    }

    /// Sink for input events coming from the text surface.
    ///
    /// The draft and the shared mirror are written from the same incoming value, so the
    /// mirror never lags one keystroke behind.
    pub fn on_change(&mut self, name: &str, value: &str) -> ChangeOutcome {
        if name != PROMPT_FIELD {
            tracing::debug!(field = name, "ignoring change for unknown composer field");
            return ChangeOutcome::Ignored;
        }

        let attempted_chars = value.chars().count();
        if attempted_chars > self.max_chars {
            tracing::debug!(
                attempted_chars,
                max_chars = self.max_chars,
                "rejected input beyond character cap"
            );
            return ChangeOutcome::Rejected {
                attempted_chars,
                max_chars: self.max_chars,
            };
        }

        self.set_draft(value.to_string());
        ChangeOutcome::Applied
    }

    /// Copies a distinct, non-blank startup prompt into the draft with a trailing space.
    ///
    /// Returns true when the draft was replaced.
    pub fn observe_startup(&mut self, startup: Option<&str>) -> bool {
        let startup = startup.map(str::to_string);
        if !self.startup.observe(&startup) {
            return false;
        }

        let Some(value) = startup.filter(|value| !value.trim().is_empty()) else {
            return false;
        };

        let mut seeded = value;
        seeded.push(' ');
        // Keep the seeded draft within the same cap keystrokes are held to.
        if seeded.chars().count() > self.max_chars {
            seeded = seeded.chars().take(self.max_chars).collect();
        }

        tracing::debug!(chars = seeded.chars().count(), "seeded draft from startup prompt");
        self.set_draft(seeded);
        true
    }

    /// Post-render reaction: startup injection, then geometry, then focus.
    pub fn after_render<S: RenderSurface + ?Sized>(
        &mut self,
        startup: Option<&str>,
        surface: &mut S,
    ) -> RenderEffects {
        let injected = self.observe_startup(startup);
        let geometry = self.surface.sync(&self.draft, surface);
        let focus = self.surface.should_focus(startup, &self.draft);
        if focus {
            tracing::debug!("composer requested input focus");
        }

        RenderEffects {
            injected,
            geometry,
            focus,
        }
    }

    /// Measures the current draft again after the surface itself changed, such as its
    /// wrapping width. Draft-driven changes go through [`ComposerState::after_render`].
    pub fn remeasure<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> Geometry {
        self.surface.remeasure(&self.draft, surface)
    }

    pub fn can_submit(&self) -> bool {
        !self.draft.trim().is_empty()
    }

    /// Hands the trimmed draft to the caller and starts a fresh composition.
    ///
    /// Does nothing and returns `None` while the draft is blank.
    pub fn submit(&mut self) -> Option<Submit> {
        if !self.can_submit() {
            return None;
        }

        let content = self.draft.trim().to_string();
        tracing::debug!(chars = content.chars().count(), "composer submitted");
        self.set_draft(String::new());
        Some(Submit::new(content))
    }

    pub fn focus_ring(&self) -> FocusRing {
        if self.draft.trim().is_empty() {
            FocusRing::Neutral
        } else {
            FocusRing::Highlighted
        }
    }

    pub fn send_style(&self) -> SendStyle {
        if self.can_submit() {
            SendStyle::Active
        } else {
            SendStyle::Muted
        }
    }

    pub fn affordances(&self) -> Affordances {
        let user = self.users.current_user();
        Affordances::for_session(user.as_deref())
    }

    fn set_draft(&mut self, draft: String) {
        self.store.set_prompt(draft.clone());
        self.draft = draft;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::session::User;
    use crate::surface::EstimatedSurface;

    fn composer_with(settings: ComposerSettings) -> (ComposerState, AppStore, UserStore) {
        let store = AppStore::default();
        let users = UserStore::new();
        let composer = ComposerState::new(&settings, store.clone(), users.clone());
        (composer, store, users)
    }

    fn composer() -> (ComposerState, AppStore, UserStore) {
        composer_with(ComposerSettings::default())
    }

    fn measure() -> EstimatedSurface {
        let settings = ComposerSettings::default();
        EstimatedSurface::new(settings.content_width, settings.line_height)
            .with_vertical_padding(settings.vertical_padding)
    }

    #[test]
    fn mirror_tracks_every_keystroke() {
        let (mut composer, store, _) = composer();

        let mut typed = String::new();
        for ch in "hello there".chars() {
            typed.push(ch);
            assert!(composer.on_change(PROMPT_FIELD, &typed).is_applied());
            assert_eq!(store.prompt().as_str(), typed);
            assert_eq!(composer.draft(), typed);
        }

        composer.on_change(PROMPT_FIELD, "hello");
        assert_eq!(store.prompt().as_str(), "hello");
    }

    #[test]
    fn input_beyond_the_cap_is_rejected_whole() {
        let settings = ComposerSettings {
            max_chars: 5,
            ..ComposerSettings::default()
        };
        let (mut composer, store, _) = composer_with(settings);

        assert!(composer.on_change(PROMPT_FIELD, "hello").is_applied());
        assert_eq!(
            composer.on_change(PROMPT_FIELD, "hello!"),
            ChangeOutcome::Rejected {
                attempted_chars: 6,
                max_chars: 5,
            }
        );
        assert_eq!(composer.draft(), "hello");
        assert_eq!(store.prompt().as_str(), "hello");
    }

    #[test]
    fn cap_counts_characters_not_bytes() {
        let settings = ComposerSettings {
            max_chars: 3,
            ..ComposerSettings::default()
        };
        let (mut composer, _, _) = composer_with(settings);
        assert!(composer.on_change(PROMPT_FIELD, "héé").is_applied());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let (mut composer, store, _) = composer();
        assert_eq!(composer.on_change("email", "x"), ChangeOutcome::Ignored);
        assert_eq!(composer.draft(), "");
        assert_eq!(store.prompt().as_str(), "");
    }

    #[test]
    fn submit_enablement_follows_trimmed_draft() {
        let (mut composer, _, _) = composer();

        assert!(!composer.can_submit());
        composer.on_change(PROMPT_FIELD, "   ");
        assert!(!composer.can_submit());
        assert_eq!(composer.send_style(), SendStyle::Muted);
        assert_eq!(composer.submit(), None);
        assert_eq!(composer.draft(), "   ");

        composer.on_change(PROMPT_FIELD, "hi");
        assert!(composer.can_submit());
        assert_eq!(composer.send_style(), SendStyle::Active);
    }

    #[test]
    fn submit_hands_over_trimmed_content_and_clears() {
        let (mut composer, store, _) = composer();
        composer.on_change(PROMPT_FIELD, "  what is rust?\n");

        assert_eq!(composer.submit(), Some(Submit::new("what is rust?")));
        assert_eq!(composer.draft(), "");
        assert_eq!(store.prompt().as_str(), "");
        assert!(!composer.can_submit());
    }

    #[test]
    fn startup_prompt_is_injected_exactly_once() {
        let (mut composer, store, _) = composer();

        assert!(composer.observe_startup(Some("Tell me about X")));
        assert_eq!(composer.draft(), "Tell me about X ");
        assert_eq!(store.prompt().as_str(), "Tell me about X ");

        composer.on_change(PROMPT_FIELD, "Tell me about X and Y");
        assert!(!composer.observe_startup(Some("Tell me about X")));
        assert_eq!(composer.draft(), "Tell me about X and Y");

        assert!(composer.observe_startup(Some("Tell me about Z")));
        assert_eq!(composer.draft(), "Tell me about Z ");
    }

    #[test]
    fn blank_startup_prompt_leaves_draft_alone() {
        let (mut composer, _, _) = composer();
        composer.on_change(PROMPT_FIELD, "typed");

        assert!(!composer.observe_startup(None));
        assert!(!composer.observe_startup(Some("   ")));
        assert_eq!(composer.draft(), "typed");
    }

    #[test]
    fn seeded_draft_respects_the_cap() {
        let settings = ComposerSettings {
            max_chars: 4,
            ..ComposerSettings::default()
        };
        let (mut composer, _, _) = composer_with(settings);
        composer.observe_startup(Some("abcd"));
        assert_eq!(composer.draft(), "abcd");
    }

    #[test]
    fn render_pass_injects_measures_and_focuses_once() {
        let (mut composer, _, _) = composer();
        let mut surface = measure();

        let first = composer.after_render(Some("Tell me about X"), &mut surface);
        assert!(first.injected);
        assert!(first.focus);
        assert_eq!(first.geometry.map(|geometry| geometry.rows), Some(1));

        let second = composer.after_render(Some("Tell me about X"), &mut surface);
        assert_eq!(
            second,
            RenderEffects {
                injected: false,
                geometry: None,
                focus: false,
            }
        );
        assert_eq!(composer.draft(), "Tell me about X ");
    }

    #[test]
    fn padded_single_line_drafts_stay_one_row() {
        let (mut composer, _, _) = composer();
        let mut surface = measure();

        let empty = composer.after_render(None, &mut surface);
        assert_eq!(empty.geometry.map(|geometry| geometry.rows), Some(1));

        composer.on_change(PROMPT_FIELD, "short question");
        let one_line = composer.after_render(None, &mut surface);
        assert_eq!(one_line.geometry.map(|geometry| geometry.rows), Some(1));
        assert_eq!(composer.geometry().height, 36.0);

        composer.on_change(PROMPT_FIELD, "");
        composer.after_render(None, &mut surface);
        assert_eq!(composer.geometry().rows, 1);
    }

    #[test]
    fn narrower_surface_adds_rows_without_a_draft_change() {
        let (mut composer, _, _) = composer();
        let mut surface = measure();

        composer.on_change(PROMPT_FIELD, &"word ".repeat(30));
        assert_eq!(
            composer.after_render(None, &mut surface).geometry.map(|g| g.rows),
            Some(2)
        );

        assert!(surface.set_content_width(350.0));
        assert_eq!(composer.remeasure(&mut surface).rows, 3);
        assert_eq!(composer.after_render(None, &mut surface).geometry, None);
    }

    #[test]
    fn typing_refocuses_only_on_change() {
        let (mut composer, _, _) = composer();
        let mut surface = measure();

        assert!(!composer.after_render(None, &mut surface).focus);
        composer.on_change(PROMPT_FIELD, "h");
        assert!(composer.after_render(None, &mut surface).focus);
        assert!(!composer.after_render(None, &mut surface).focus);
    }

    #[test]
    fn focus_ring_tracks_draft() {
        let (mut composer, _, _) = composer();
        assert_eq!(composer.focus_ring(), FocusRing::Neutral);
        composer.on_change(PROMPT_FIELD, "x");
        assert_eq!(composer.focus_ring(), FocusRing::Highlighted);
        composer.on_change(PROMPT_FIELD, " ");
        assert_eq!(composer.focus_ring(), FocusRing::Neutral);
    }

    #[test]
    fn affordances_follow_session_changes() {
        let (composer, _, users) = composer();
        assert!(!composer.affordances().attachment);

        users.sign_in(User::new("alice"));
        let affordances = composer.affordances();
        assert!(affordances.attachment && affordances.voice && affordances.web_search);

        users.sign_out();
        assert!(!composer.affordances().voice);
    }
}
