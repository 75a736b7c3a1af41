use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gpui::{App, Application};
use tracing::{error, info, warn};

use orcamento_ui::{
    app::BudgetSession,
    config::{AppConfig, resource_dir},
    logging, open_main_window, setup_app,
};

/// Desktop budget calculator backed by an Excel template.
///
/// Reads the dropdown options from the template, writes the entered values
/// into a working copy and shows the results the template last computed.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Configuration file. Defaults to `orcamento.toml` beside the executable.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `orcamento_core=trace`. Overrides the
    /// configuration and `RUST_LOG`.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_problem) = match &cli.config {
        Some(path) => (AppConfig::load(path)?, None),
        None => AppConfig::discover(&resource_dir()),
    };

    logging::init_logging(&config.logging, cli.log_level.as_deref())?;
    if let Some(problem) = config_problem {
        warn!(%problem, "ignoring configuration file; using defaults");
    }
    info!(template = %config.template.display(), "starting");

    let session = BudgetSession::start(&config).context("cannot start session")?;

    Application::new()
        .with_assets(gpui_component_assets::Assets)
        .run(move |cx: &mut App| {
            setup_app(cx);
            if let Err(e) = open_main_window(&config, session, cx) {
                error!(error = ?e, "failed to open main window");
                cx.quit();
            }
        });

    Ok(())
}
