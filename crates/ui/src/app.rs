use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{
    ActiveTheme, Icon, IconName, Sizable, Theme, ThemeMode,
    button::{Button, ButtonVariants},
    h_flex, v_flex,
};

use flint_composer::{AppStore, SettingsStore, Theme as AppTheme, UserStore};

use crate::chat::ChatRoom;
use crate::error_panel::ErrorPanel;

gpui::actions!(shell, [ToggleTheme, SignOut, Quit]);

/// Maps the persisted app theme onto the gpui-component theme mode.
pub fn theme_mode(theme: AppTheme) -> ThemeMode {
    if theme.is_dark() {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    }
}

pub fn apply_theme(theme: AppTheme, window: Option<&mut Window>, cx: &mut App) {
    Theme::change(theme_mode(theme), window, cx);
}

/// Root view: top bar, chat room, and account controls.
pub struct ChatAppShell {
    chat_room: Entity<ChatRoom>,
    store: AppStore,
    users: UserStore,
    settings: SettingsStore,
    settings_error: Option<SharedString>,
}

impl ChatAppShell {
    pub fn new(
        settings: SettingsStore,
        store: AppStore,
        users: UserStore,
        startup_prompt: Option<String>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let composer_settings = settings.settings();
        let settings_error = settings
            .load_error()
            .map(|error| SharedString::from(error.to_string()));
        let chat_room = cx.new(|cx| {
            ChatRoom::new(
                &composer_settings,
                store.clone(),
                users.clone(),
                startup_prompt,
                window,
                cx,
            )
        });

        Self {
            chat_room,
            store,
            users,
            settings,
            settings_error,
        }
    }

    fn toggle_theme(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let theme = self.store.toggle_theme();
        apply_theme(theme, Some(window), cx);

        self.settings_error = match self.settings.set_theme(theme) {
            Ok(()) => None,
            Err(error) => {
                tracing::warn!("failed to persist theme choice: {error}");
                Some(SharedString::from(error.to_string()))
            }
        };
        cx.notify();
    }

    fn sign_out(&mut self, cx: &mut Context<Self>) {
        if self.users.current_user().is_none() {
            return;
        }

        self.users.sign_out();
        self.chat_room.update(cx, |room, cx| {
            room.refresh_affordances(cx);
        });
        cx.notify();
    }

    fn render_top_bar(&self, cx: &Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let theme_icon = if self.store.theme().is_dark() {
            IconName::Sun
        } else {
            IconName::Moon
        };

        h_flex()
            .id("app-top-bar")
            .w_full()
            .h(px(40.))
            .flex_shrink_0()
            .px_4()
            .items_center()
            .justify_between()
            .bg(theme.background)
            .border_b_1()
            .border_color(theme.border)
            .child(
                div()
                    .text_sm()
                    .font_weight(FontWeight::SEMIBOLD)
                    .text_color(theme.foreground)
                    .child("Flint AI"),
            )
            .child(
                Button::new("toggle-theme")
                    .ghost()
                    .small()
                    .icon(theme_icon)
                    .on_click(cx.listener(|this, _, window, cx| {
                        this.toggle_theme(window, cx);
                    })),
            )
    }

    fn render_bottom_bar(&self, cx: &Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let username = self
            .users
            .current_user()
            .map(|user| SharedString::from(user.username.clone()));
        let signed_in = username.is_some();

        h_flex()
            .id("app-bottom-bar")
            .w_full()
            .flex_shrink_0()
            .gap_2()
            .px_3()
            .py_1()
            .items_center()
            .border_t_1()
            .border_color(theme.border)
            .child(
                div()
                    .id("app-user-center")
                    .size(px(28.))
                    .rounded_full()
                    .border_1()
                    .border_color(theme.border)
                    .bg(theme.muted)
                    .flex()
                    .items_center()
                    .justify_center()
                    .child(
                        Icon::new(IconName::CircleUser)
                            .size(px(16.))
                            .text_color(theme.foreground),
                    ),
            )
            .child(
                div()
                    .text_xs()
                    .text_color(theme.muted_foreground)
                    .child(username.unwrap_or_else(|| SharedString::from("Guest"))),
            )
            .when(signed_in, |bar| {
                bar.child(
                    Button::new("sign-out")
                        .ghost()
                        .small()
                        .child("Sign out")
                        .on_click(cx.listener(|this, _, _window, cx| {
                            this.sign_out(cx);
                        })),
                )
            })
    }
}

impl Render for ChatAppShell {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .id("app-shell")
            .size_full()
            .bg(theme.background)
            .on_action(cx.listener(|this, _: &ToggleTheme, window, cx| {
                this.toggle_theme(window, cx);
            }))
            .on_action(cx.listener(|this, _: &SignOut, _window, cx| {
                this.sign_out(cx);
            }))
            .child(self.render_top_bar(cx))
            .when_some(self.settings_error.clone(), |shell, error| {
                shell.child(div().px_4().child(ErrorPanel::new(error)))
            })
            .child(
                div()
                    .id("main-content")
                    .flex_1()
                    .min_h_0()
                    .overflow_hidden()
                    .child(self.chat_room.clone()),
            )
            .child(self.render_bottom_bar(cx))
    }
}
