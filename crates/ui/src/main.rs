use gpui::*;
use gpui_component::Root;

use flint::app::{ChatAppShell, Quit, SignOut, ToggleTheme, apply_theme};
use flint_composer::{AppStore, SettingsStore, User, UserStore};

/// Environment variable naming a user whose session was restored by the auth layer.
const SESSION_USER_ENV: &str = "FLINT_USER";

/// Application entry point.
///
/// The first command-line argument, when present, pre-seeds the chat room composer.
fn main() {
    tracing_subscriber::fmt::init();

    let startup_prompt = std::env::args().nth(1);
    let settings = SettingsStore::load();
    let initial_theme = settings.settings().theme;

    // One shared store per running application, injected into every view that needs it.
    let store = AppStore::new(initial_theme);
    let users = UserStore::new();
    if let Ok(username) = std::env::var(SESSION_USER_ENV)
        && !username.trim().is_empty()
    {
        users.sign_in(User::new(username.trim()));
    }

    let app = Application::new().with_assets(gpui_component_assets::Assets);

    app.run(move |cx| {
        // Initialize gpui-component - REQUIRED before any Root usage
        gpui_component::init(cx);
        apply_theme(initial_theme, None, cx);

        cx.on_action(|_: &Quit, cx| {
            cx.quit();
        });

        cx.bind_keys([
            KeyBinding::new("cmd-q", Quit, None),
            KeyBinding::new("cmd-shift-t", ToggleTheme, None),
            KeyBinding::new("cmd-shift-o", SignOut, None),
        ]);

        cx.spawn(async move |cx| {
            cx.update(|cx| {
                let options = WindowOptions {
                    window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                        None,
                        size(px(960.), px(720.)),
                        cx,
                    ))),
                    ..Default::default()
                };

                let window = cx.open_window(options, |window, cx| {
                    let shell = cx.new(|cx| {
                        ChatAppShell::new(settings, store, users, startup_prompt, window, cx)
                    });

                    // Root is REQUIRED by gpui-component for notifications/dialogs/sheets
                    cx.new(|cx| Root::new(shell, window, cx))
                });

                if let Err(error) = window {
                    tracing::error!("failed to open main window: {error}");
                    cx.quit();
                    return;
                }

                cx.activate(true);
            })
        })
        .detach();
    });
}
