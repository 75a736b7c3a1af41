use gpui::{App, Context, Entity, IntoElement, ParentElement, Render, Styled, Subscription, Window, div};
use tracing::info;

use crate::{Quit, components::BudgetFormView, quit};

/// Top-level view of the main window. Closing it ends the application.
pub struct AppWindow {
    form: Entity<BudgetFormView>,
    _window_close_subscription: Subscription,
}

impl AppWindow {
    pub fn new(
        form: Entity<BudgetFormView>,
        cx: &mut Context<Self>,
    ) -> Self {
        let subscription = cx.on_window_closed(|cx: &mut App| {
            info!("main window closed");
            quit(&Quit, cx);
        });

        Self {
            form,
            _window_close_subscription: subscription,
        }
    }
}

impl Render for AppWindow {
    fn render(
        &mut self,
        _: &mut Window,
        _cx: &mut Context<Self>,
    ) -> impl IntoElement {
        div().size_full().child(self.form.clone())
    }
}
