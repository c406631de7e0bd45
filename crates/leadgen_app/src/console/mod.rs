//! Console front end: settings, logger setup, the event loop and text output.
mod app;
pub(crate) mod logging;
mod render;
mod settings;

pub(crate) use app::run_campaign;
pub(crate) use settings::load_settings;
