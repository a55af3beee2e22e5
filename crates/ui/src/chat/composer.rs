use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{
    ActiveTheme, Disableable, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
    v_flex,
};

use flint_composer::{
    AppStore, ChangeOutcome, ComposerSettings, ComposerState, EstimatedSurface, FocusRing,
    PROMPT_FIELD, SendStyle, Submit, UserStore,
};

use crate::chat::affordances::AffordanceBar;

/// Horizontal inset between the surface edge and where the input's text wraps.
const INPUT_HORIZONTAL_INSET: f32 = 24.0;

/// Chat composer view.
///
/// All draft, sizing and focus decisions live in [`ComposerState`]; this view forwards
/// input events into it and applies the effects it returns.
pub struct ComposerInput {
    input_state: Entity<InputState>,
    affordance_bar: Entity<AffordanceBar>,
    state: ComposerState,
    measure: EstimatedSurface,
    startup_prompt: Option<String>,
    max_rows: usize,
    pending_newline: bool,
}

impl EventEmitter<Submit> for ComposerInput {}

impl ComposerInput {
    pub fn new(
        settings: &ComposerSettings,
        store: AppStore,
        users: UserStore,
        startup_prompt: Option<String>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let input_state = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder(settings.placeholder.clone())
                .auto_grow(1, settings.max_rows)
        });

        cx.subscribe_in(
            &input_state,
            window,
            |this, _, event: &InputEvent, window, cx| {
                if let InputEvent::PressEnter { secondary } = event {
                    if *secondary {
                        this.pending_newline = false;
                        return;
                    }

                    if this.pending_newline {
                        // Shift+Enter already inserted the newline; swallow the paired enter.
                        this.pending_newline = false;
                    } else {
                        this.trim_trailing_newline(window, cx);
                        this.handle_submit(window, cx);
                    }
                    return;
                }

                this.handle_input(window, cx);
            },
        )
        .detach();

        let state = ComposerState::new(settings, store, users);
        let affordance_bar = cx.new(|_| AffordanceBar::new(state.affordances()));

        let mut this = Self {
            input_state,
            affordance_bar,
            state,
            measure: EstimatedSurface::new(settings.content_width, settings.line_height)
                .with_vertical_padding(settings.vertical_padding),
            startup_prompt,
            max_rows: settings.max_rows,
            pending_newline: false,
        };
        this.reconcile(window, cx);
        this
    }

    pub fn affordance_bar(&self) -> &Entity<AffordanceBar> {
        &self.affordance_bar
    }

    /// Re-evaluates session-gated controls, e.g. after sign-in.
    pub fn refresh_affordances(&mut self, cx: &mut Context<Self>) {
        let affordances = self.state.affordances();
        self.affordance_bar
            .update(cx, |bar, cx| bar.set_affordances(affordances, cx));
    }

    fn handle_input(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let value = self.input_state.read(cx).value().to_string();
        if value == self.state.draft() {
            return;
        }

        match self.state.on_change(PROMPT_FIELD, &value) {
            ChangeOutcome::Applied => self.reconcile(window, cx),
            ChangeOutcome::Rejected { .. } => {
                // Put the last accepted draft back so the extra keystroke never lands.
                let draft = self.state.draft().to_string();
                self.input_state.update(cx, |state, cx| {
                    state.set_value(draft, window, cx);
                });
            }
            ChangeOutcome::Ignored => {}
        }
    }

    /// Applies startup injection, geometry and focus for the current draft.
    fn reconcile(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let effects = self
            .state
            .after_render(self.startup_prompt.as_deref(), &mut self.measure);

        if effects.injected {
            let draft = self.state.draft().to_string();
            self.input_state.update(cx, |state, cx| {
                state.set_value(draft, window, cx);
            });
        }

        if effects.focus {
            self.input_state.update(cx, |state, cx| {
                state.focus(window, cx);
            });
        }

        let draft = self.state.draft().to_string();
        let affordances = self.state.affordances();
        self.affordance_bar.update(cx, |bar, cx| {
            bar.set_affordances(affordances, cx);
            bar.set_draft(&draft, cx);
        });

        if effects.geometry.is_some() || effects.injected {
            cx.notify();
        }
    }

    /// Feeds the laid-out surface width back into the estimate.
    fn observe_surface_width(&mut self, width: f32, cx: &mut Context<Self>) {
        if !self.measure.set_content_width(width - INPUT_HORIZONTAL_INSET) {
            return;
        }

        let geometry = self.state.remeasure(&mut self.measure);
        tracing::trace!(width, rows = geometry.rows, "composer surface resized");
        cx.notify();
    }

    fn handle_shift_enter(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.pending_newline = true;
        self.input_state.update(cx, |state, cx| {
            state.insert("\n", window, cx);
        });
        cx.notify();
    }

    fn trim_trailing_newline(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.input_state.update(cx, |state, cx| {
            let value = state.value().to_string();
            if let Some(trimmed) = value.strip_suffix('\n') {
                state.set_value(trimmed.to_string(), window, cx);
            }
        });
        self.handle_input(window, cx);
    }

    fn handle_submit(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let Some(submit) = self.state.submit() else {
            return;
        };

        self.input_state.update(cx, |state, cx| {
            state.set_value("", window, cx);
        });
        self.pending_newline = false;
        cx.emit(submit);
        self.reconcile(window, cx);
        cx.notify();
    }
}

impl Render for ComposerInput {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let geometry = self.state.geometry();
        let at_cap = geometry.rows >= self.max_rows;
        let composer = cx.entity().downgrade();
        let can_submit = self.state.can_submit();

        let highlighted = self.state.focus_ring() == FocusRing::Highlighted;

        let send = Button::new("composer-send")
            .small()
            .icon(IconName::ArrowUp)
            .tooltip("Send Prompt")
            .disabled(!can_submit)
            .on_click(cx.listener(|this, _, window, cx| {
                this.handle_submit(window, cx);
            }));
        let send = match self.state.send_style() {
            SendStyle::Active => send.primary(),
            SendStyle::Muted => send.ghost(),
        };

        v_flex()
            .id("composer")
            .w_full()
            .gap_2()
            .px_2()
            .pt_2()
            .pb_3()
            .rounded_xl()
            .when(highlighted, |el| el.border_2().border_color(theme.primary))
            .when(!highlighted, |el| el.border_1().border_color(theme.border))
            .bg(theme.background)
            .child(
                div()
                    .id("composer-surface")
                    .relative()
                    .w_full()
                    .h(px(geometry.height))
                    .when(at_cap, |el| el.overflow_y_scroll())
                    .when(!at_cap, |el| el.overflow_hidden())
                    .on_key_down(cx.listener(|this, event: &KeyDownEvent, window, cx| {
                        if event.keystroke.key == "enter" && event.keystroke.modifiers.shift {
                            this.handle_shift_enter(window, cx);
                        }
                    }))
                    .child(Input::new(&self.input_state).w_full().h_full())
                    .child(
                        canvas(
                            move |bounds, _window, cx| {
                                let width = f32::from(bounds.size.width);
                                cx.defer(move |cx| {
                                    let _ = composer.update(cx, |this, cx| {
                                        this.observe_surface_width(width, cx);
                                    });
                                });
                            },
                            |_, _, _, _| {},
                        )
                        .absolute()
                        .size_full(),
                    ),
            )
            .child(
                h_flex()
                    .id("composer-footer")
                    .w_full()
                    .items_center()
                    .justify_between()
                    .child(self.affordance_bar.clone())
                    .child(send),
            )
    }
}
