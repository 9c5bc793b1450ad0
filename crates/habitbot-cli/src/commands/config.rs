use clap::Subcommand;
use habitbot_core::storage::{Config, Store};

use crate::common::CliResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config.toml next to the data files
    Init,
    /// Print the data directory path
    Path,
}

pub fn run(action: ConfigAction) -> CliResult {
    let store = Store::open()?;

    match action {
        ConfigAction::Show => {
            let config = Config::load_from(store.dir())?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Init => {
            let path = store.dir().join("config.toml");
            if path.exists() {
                return Err(format!("{} already exists", path.display()).into());
            }
            Config::default().save_to(store.dir())?;
            println!("Wrote {}", path.display());
        }
        ConfigAction::Path => {
            println!("{}", store.dir().display());
        }
    }
    Ok(())
}
