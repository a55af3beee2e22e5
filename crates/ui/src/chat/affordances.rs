use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{
    IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
};

use flint_composer::Affordances;

/// Emitted when the user asks to attach a file to the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachRequested;

/// Emitted when voice capture starts; `seed` is the draft the transcript extends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceRequested {
    pub seed: String,
}

/// Emitted when the web-search toggle flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebSearchToggled {
    pub enabled: bool,
}

/// Row of auxiliary composer controls.
///
/// Which buttons appear is decided by [`Affordances`]; this view only lays them out
/// and reports clicks.
pub struct AffordanceBar {
    affordances: Affordances,
    draft: SharedString,
    web_search_enabled: bool,
}

impl EventEmitter<AttachRequested> for AffordanceBar {}
impl EventEmitter<VoiceRequested> for AffordanceBar {}
impl EventEmitter<WebSearchToggled> for AffordanceBar {}

impl AffordanceBar {
    pub fn new(affordances: Affordances) -> Self {
        Self {
            affordances,
            draft: SharedString::default(),
            web_search_enabled: false,
        }
    }

    pub fn set_affordances(&mut self, affordances: Affordances, cx: &mut Context<Self>) {
        if self.affordances != affordances {
            self.affordances = affordances;
            cx.notify();
        }
    }

    pub fn set_draft(&mut self, draft: &str, cx: &mut Context<Self>) {
        if &*self.draft != draft {
            self.draft = SharedString::from(draft.to_string());
            cx.notify();
        }
    }

    fn toggle_web_search(&mut self, cx: &mut Context<Self>) {
        self.web_search_enabled = !self.web_search_enabled;
        cx.emit(WebSearchToggled {
            enabled: self.web_search_enabled,
        });
        cx.notify();
    }
}

impl Render for AffordanceBar {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let affordances = self.affordances;
        let web_search_enabled = self.web_search_enabled;

        h_flex()
            .id("composer-affordances")
            .items_center()
            .gap_2()
            .pl_2()
            .when(affordances.attachment, |row| {
                row.child(
                    Button::new("composer-file-picker")
                        .ghost()
                        .small()
                        .icon(IconName::Plus)
                        .tooltip("Attach file")
                        .on_click(cx.listener(|_, _, _window, cx| {
                            cx.emit(AttachRequested);
                        })),
                )
            })
            .when(affordances.voice, |row| {
                row.child(
                    Button::new("composer-voice-input")
                        .ghost()
                        .small()
                        .child("Voice")
                        .on_click(cx.listener(|this, _, _window, cx| {
                            cx.emit(VoiceRequested {
                                seed: this.draft.to_string(),
                            });
                        })),
                )
            })
            .when(affordances.web_search, |row| {
                let toggle = Button::new("composer-web-search")
                    .small()
                    .icon(IconName::Search)
                    .child("Search")
                    .on_click(cx.listener(|this, _, _window, cx| {
                        this.toggle_web_search(cx);
                    }));

                row.child(if web_search_enabled {
                    toggle.primary()
                } else {
                    toggle.ghost()
                })
            })
    }
}
