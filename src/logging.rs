//! Console logger setup.

use log::LevelFilter;

use crate::config::Settings;

/// Install the colored console logger.  Returns `false` if a logger was
/// already installed (e.g. by the embedding application).
pub fn init(verbose: bool) -> bool {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let mut builder = colog::default_builder();
    builder.filter_level(level);
    builder.try_init().is_ok()
}

/// [`init`] at the level picked by `settings.verbose`.
pub fn init_from(settings: &Settings) -> bool {
    init(settings.verbose)
}
