use anyhow::Result;
use gpui::{
    AnyView, App, AppContext, Bounds, KeyBinding, Menu, MenuItem, TitlebarOptions, WindowBounds,
    WindowOptions,
};
use gpui_component::Root;
use tracing::{debug, info};

use crate::{
    Quit,
    app::BudgetSession,
    components::{AppWindow, BudgetFormView, WindowPreferences},
    config::AppConfig,
    quit,
};

pub fn setup_app(app_cx: &mut App) {
    // Must run before any gpui-component widget is built.
    gpui_component::init(app_cx);

    app_cx.activate(true);

    #[cfg(target_os = "macos")]
    app_cx.bind_keys([KeyBinding::new("cmd-q", Quit, None)]);

    #[cfg(not(target_os = "macos"))]
    app_cx.bind_keys([
        KeyBinding::new("ctrl-q", Quit, None),
        KeyBinding::new("alt-F4", Quit, None),
    ]);

    app_cx.on_action(quit);

    app_cx.set_menus(vec![Menu {
        name: "Orçamento".into(),
        items: vec![MenuItem::action("Sair", Quit)],
    }]);
}

/// Opens the fixed-size budget window, centred on the primary display.
pub fn open_main_window(
    config: &AppConfig,
    session: BudgetSession,
    app_cx: &mut App,
) -> Result<()> {
    let prefs = WindowPreferences::from(&config.window);
    let bounds = Bounds::centered(None, prefs.size, app_cx);

    let logo = config.logo.is_file().then(|| config.logo.clone());
    if logo.is_none() {
        debug!(logo = %config.logo.display(), "logo not found; omitted");
    }

    let options = WindowOptions {
        window_bounds: Some(WindowBounds::Windowed(bounds)),
        titlebar: Some(TitlebarOptions {
            title: Some(prefs.title.clone()),
            ..Default::default()
        }),
        is_resizable: false,
        ..Default::default()
    };

    app_cx.open_window(options, move |window, cx| {
        let form = cx.new(|cx| BudgetFormView::new(session, logo, window, cx));
        let main = cx.new(|cx| AppWindow::new(form, cx));
        cx.new(|cx| Root::new(AnyView::from(main), window, cx))
    })?;

    info!(title = %prefs.title, "main window opened");
    Ok(())
}
