pub mod budget_form;
pub mod window;

use gpui::{
    App, ClickEvent, Div, FontWeight, ParentElement, Pixels, SharedString, Size, Styled,
    TextAlign, Window, div, px,
};
use gpui_component::{
    Sizable,
    button::{Button, ButtonVariants},
    h_flex,
};

pub use budget_form::BudgetFormView;
pub use window::AppWindow;

use crate::config::WindowConfig;

#[derive(Debug, Clone)]
pub struct WindowPreferences {
    pub title: SharedString,
    pub size: Size<Pixels>,
}

impl From<&WindowConfig> for WindowPreferences {
    fn from(config: &WindowConfig) -> Self {
        Self {
            title: SharedString::from(config.title.clone()),
            size: Size {
                width: px(config.width),
                height: px(config.height),
            },
        }
    }
}

/// Creates a primary-styled button with a custom click handler.
pub fn make_button(
    id: impl Into<SharedString>,
    label: impl Into<SharedString>,
    on_click: impl Fn(&ClickEvent, &mut Window, &mut App) + 'static,
) -> Button {
    Button::new(id.into())
        .primary()
        .large()
        .w(px(140.))
        .label(label.into())
        .on_click(on_click)
}

/// A bordered row with a right-aligned label, ready for one more child.
pub fn make_labeled_row(label: impl Into<SharedString>) -> Div {
    h_flex()
        .items_center()
        .gap_3()
        .p(px(2.))
        .rounded_md()
        .border_1()
        .child(
            div()
                .min_w(px(110.))
                .text_align(TextAlign::Right)
                .child(label.into()),
        )
}

/// A result line: label on the left, bold amount on the right.
pub fn make_result_row(
    label: impl Into<SharedString>,
    amount: impl Into<SharedString>,
) -> Div {
    make_labeled_row(label).child(
        div()
            .flex_1()
            .text_align(TextAlign::Right)
            .font_weight(FontWeight::BOLD)
            .child(amount.into()),
    )
}
