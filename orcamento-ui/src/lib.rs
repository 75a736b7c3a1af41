pub mod app;
pub mod components;
pub mod config;
pub mod gui;
pub mod logging;

use gpui::{App, actions};
pub use gui::{open_main_window, setup_app};
use tracing::info;

actions!(orcamento, [Quit]);

pub fn quit(
    _: &Quit,
    cx: &mut App,
) {
    info!("quitting");
    cx.quit();
}
