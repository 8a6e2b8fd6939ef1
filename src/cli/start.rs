use crate::{
    cli::{
        actions::Action,
        commands::{self, endpoints, logging::ARG_VERBOSITY},
        dispatch::handler,
        globals::GlobalArgs,
        telemetry,
    },
    config::AppConfig,
};
use anyhow::{Context, Result};
use tracing::Level;

#[must_use]
pub const fn get_verbosity_level(verbose_count: u8) -> Option<Level> {
    match verbose_count {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

/// Start the CLI
///
/// # Errors
/// Returns an error if telemetry cannot be initialized, the configuration is
/// invalid, or the arguments do not map to an action.
pub fn start() -> Result<(Action, GlobalArgs)> {
    let matches = commands::new().get_matches();

    let verbosity_level = get_verbosity_level(
        matches
            .get_one::<u8>(ARG_VERBOSITY)
            .copied()
            .unwrap_or(0),
    );

    telemetry::init(verbosity_level)?;

    let config = AppConfig::load(endpoints::overrides(&matches)).context("invalid configuration")?;

    let action = handler(&matches)?;

    Ok((action, GlobalArgs::new(config)))
}
