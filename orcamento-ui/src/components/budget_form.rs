use std::path::PathBuf;

use gpui::{
    AppContext, ClickEvent, Context, Entity, FontWeight, IntoElement, ObjectFit, ParentElement,
    Render, SharedString, Styled, StyledImage, Subscription, Window, div, img, px,
};
use gpui_component::{
    Disableable, IndexPath, h_flex,
    input::{Input, InputState},
    select::{Select, SelectEvent, SelectState},
    v_flex,
};
use orcamento_core::{BudgetForm, FieldKey, OutputKey, QuoteDisplay};
use tracing::{debug, info};

use crate::{
    app::BudgetSession,
    components::{make_button, make_labeled_row, make_result_row},
};

type ChoiceState = Entity<SelectState<Vec<SharedString>>>;

/// The budget form: seven inputs on the left, the four results on the right.
pub struct BudgetFormView {
    session: BudgetSession,
    form: BudgetForm,
    logo: Option<PathBuf>,
    choices: Vec<(FieldKey, ChoiceState)>,
    price: Entity<InputState>,
    quantity: Entity<InputState>,
    results: QuoteDisplay,
    _subscriptions: Vec<Subscription>,
}

impl BudgetFormView {
    pub fn new(
        session: BudgetSession,
        logo: Option<PathBuf>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let form = BudgetForm::new(session.dropdowns());

        let mut choices = Vec::with_capacity(FieldKey::CHOICES.len());
        let mut subscriptions = Vec::with_capacity(FieldKey::CHOICES.len());
        for key in FieldKey::CHOICES {
            let Some(field) = form.choice(key) else {
                continue;
            };
            let items: Vec<SharedString> = field
                .options()
                .iter()
                .map(|option| SharedString::from(option.clone()))
                .collect();
            let selected = field.selected_index().map(|row| IndexPath::default().row(row));

            let state = cx.new(|cx| SelectState::new(items, selected, window, cx));
            subscriptions.push(cx.subscribe_in(
                &state,
                window,
                move |this: &mut Self, _, event: &SelectEvent<Vec<SharedString>>, _, cx| {
                    if let SelectEvent::Confirm(Some(value)) = event {
                        this.on_choice(key, value, cx);
                    }
                },
            ));
            choices.push((key, state));
        }

        let price = cx.new(|cx| InputState::new(window, cx).placeholder("0,00"));
        let quantity = cx.new(|cx| InputState::new(window, cx).placeholder("0"));

        Self {
            session,
            form,
            logo,
            choices,
            price,
            quantity,
            results: QuoteDisplay::default(),
            _subscriptions: subscriptions,
        }
    }

    fn on_choice(
        &mut self,
        key: FieldKey,
        value: &SharedString,
        cx: &mut Context<Self>,
    ) {
        if self.form.select(key, value.as_ref()) {
            debug!(field = %key, %value, "selection changed");
            cx.notify();
        }
    }

    fn calculate(
        &mut self,
        cx: &mut Context<Self>,
    ) {
        let price = self.price.read(cx).value();
        let quantity = self.quantity.read(cx).value();
        self.form.set_text(FieldKey::Price, price.as_ref());
        self.form.set_text(FieldKey::Quantity, quantity.as_ref());

        let inputs = self.form.inputs();
        info!(?inputs, "calculating");
        self.results = self.session.calculate(&inputs).display();
        cx.notify();
    }

    fn choice_state(
        &self,
        key: FieldKey,
    ) -> Option<&ChoiceState> {
        self.choices
            .iter()
            .find(|(choice, _)| *choice == key)
            .map(|(_, state)| state)
    }

    fn render_field(
        &self,
        key: FieldKey,
    ) -> Option<gpui::Div> {
        let row = make_labeled_row(key.label());
        match key {
            FieldKey::Price => Some(row.child(Input::new(&self.price).flex_grow())),
            FieldKey::Quantity => Some(row.child(Input::new(&self.quantity).flex_grow())),
            _ => self.choice_state(key).map(|state| {
                row.child(
                    Select::new(state)
                        .w_full()
                        .disabled(!self.form.is_enabled(key)),
                )
            }),
        }
    }
}

impl Render for BudgetFormView {
    fn render(
        &mut self,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) -> impl IntoElement {
        let logo = self.logo.as_ref().map(|path| {
            img(path.clone())
                .w(px(160.))
                .h(px(160.))
                .object_fit(ObjectFit::Contain)
        });

        let fields = v_flex()
            .gap_2()
            .children(FieldKey::ALL.into_iter().filter_map(|key| self.render_field(key)));

        let results = v_flex()
            .gap_2()
            .p_3()
            .rounded_md()
            .border_1()
            .child(div().font_weight(FontWeight::BOLD).child("Resultados"))
            .children(
                OutputKey::ALL
                    .into_iter()
                    .map(|key| make_result_row(key.label(), self.results.get(key).to_string())),
            );

        h_flex()
            .size_full()
            .p_5()
            .gap_5()
            .items_start()
            .child(
                v_flex()
                    .flex_1()
                    .gap_3()
                    .children(logo)
                    .child(fields)
                    .child(make_button(
                        "calculate",
                        "Calcular",
                        cx.listener(|this, _: &ClickEvent, _, cx| this.calculate(cx)),
                    )),
            )
            .child(v_flex().flex_1().child(results))
    }
}
