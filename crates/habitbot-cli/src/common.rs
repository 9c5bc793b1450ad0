//! Shared plumbing for CLI commands.

use chrono::NaiveDate;
use habitbot_core::storage::{Config, Store};
use habitbot_core::week::today_in;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the store and load the config living next to it.
pub fn open() -> Result<(Store, Config), Box<dyn std::error::Error>> {
    let store = Store::open()?;
    let config = Config::load_from(store.dir())?;
    Ok((store, config))
}

/// Today in the configured timezone.
pub fn today(config: &Config) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    Ok(today_in(config.tz()?))
}
