use gpui::*;
use gpui_component::{ActiveTheme, v_flex};

/// Inline panel describing a problem the user has to fix.
#[derive(IntoElement)]
pub struct ErrorPanel {
    message: SharedString,
}

impl ErrorPanel {
    pub fn new(message: impl Into<SharedString>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl RenderOnce for ErrorPanel {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .w_full()
            .my_4()
            .p_2()
            .rounded_md()
            .border_1()
            .border_color(theme.border)
            .bg(theme.muted)
            .text_color(theme.danger)
            .child(div().text_sm().font_weight(FontWeight::SEMIBOLD).child("Fix the problem!:"))
            .child(div().child(self.message))
    }
}
