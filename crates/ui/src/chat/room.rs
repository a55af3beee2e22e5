use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{ActiveTheme, h_flex, v_flex};

use flint_composer::{AppStore, ComposerSettings, Submit, UserStore};

use crate::chat::affordances::{AttachRequested, VoiceRequested, WebSearchToggled};
use crate::chat::composer::ComposerInput;

const USER_BUBBLE_MAX_WIDTH: Pixels = px(540.);

/// Chat room page: sent prompts above, composer below.
pub struct ChatRoom {
    composer: Entity<ComposerInput>,
    store: AppStore,
    max_chars: usize,
    sent: Vec<SharedString>,
    web_search_enabled: bool,
}

impl ChatRoom {
    pub fn new(
        settings: &ComposerSettings,
        store: AppStore,
        users: UserStore,
        startup_prompt: Option<String>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let composer = cx.new(|cx| {
            ComposerInput::new(settings, store.clone(), users, startup_prompt, window, cx)
        });

        // Redraw the draft counter whenever the composer changes.
        cx.observe(&composer, |_, _, cx| cx.notify()).detach();

        cx.subscribe(&composer, |this, _, event: &Submit, cx| {
            this.handle_submit(event, cx);
        })
        .detach();

        let affordance_bar = composer.read(cx).affordance_bar().clone();
        cx.subscribe(&affordance_bar, |_, _, _event: &AttachRequested, _cx| {
            tracing::info!("file attachment requested");
        })
        .detach();
        cx.subscribe(&affordance_bar, |_, _, event: &VoiceRequested, _cx| {
            tracing::info!(seed_chars = event.seed.chars().count(), "voice capture requested");
        })
        .detach();
        cx.subscribe(&affordance_bar, |this, _, event: &WebSearchToggled, cx| {
            this.web_search_enabled = event.enabled;
            cx.notify();
        })
        .detach();

        Self {
            composer,
            store,
            max_chars: settings.max_chars,
            sent: Vec::new(),
            web_search_enabled: false,
        }
    }

    pub fn refresh_affordances(&mut self, cx: &mut Context<Self>) {
        self.composer
            .update(cx, |composer, cx| composer.refresh_affordances(cx));
        cx.notify();
    }

    fn handle_submit(&mut self, event: &Submit, cx: &mut Context<Self>) {
        tracing::info!(
            chars = event.content.chars().count(),
            web_search = self.web_search_enabled,
            "sending prompt"
        );
        self.sent.push(SharedString::from(event.content.clone()));
        cx.notify();
    }

    fn render_sent(&self, cx: &Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .id("chat-room-messages")
            .flex_1()
            .min_h_0()
            .overflow_y_scroll()
            .gap_3()
            .p_4()
            .children(self.sent.iter().enumerate().map(|(index, content)| {
                h_flex().id(("chat-room-message", index)).w_full().justify_end().child(
                    div()
                        .max_w(USER_BUBBLE_MAX_WIDTH)
                        .px_3()
                        .py_2()
                        .rounded_lg()
                        .bg(theme.muted)
                        .text_color(theme.foreground)
                        .child(content.clone()),
                )
            }))
    }
}

/// True once the draft uses 90% of the cap.
fn is_near_limit(chars: usize, max_chars: usize) -> bool {
    chars.saturating_mul(10) >= max_chars.saturating_mul(9)
}

impl Render for ChatRoom {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        // Read through the shared mirror, the same path a detached send control uses.
        let mirrored_chars = self.store.prompt().chars().count();
        let near_limit = is_near_limit(mirrored_chars, self.max_chars);

        v_flex()
            .id("chat-room")
            .size_full()
            .min_h_0()
            .overflow_hidden()
            .bg(theme.background)
            .child(self.render_sent(cx))
            .child(
                v_flex()
                    .id("chat-room-composer")
                    .flex_shrink_0()
                    .w_full()
                    .gap_1()
                    .p_3()
                    .border_t_1()
                    .border_color(theme.border)
                    .child(self.composer.clone())
                    .child(
                        div()
                            .id("chat-room-draft-counter")
                            .w_full()
                            .flex()
                            .justify_end()
                            .text_xs()
                            .text_color(theme.muted_foreground)
                            .when(near_limit, |el| el.text_color(theme.danger))
                            .child(format!("{mirrored_chars} / {}", self.max_chars)),
                    ),
            )
    }
}
