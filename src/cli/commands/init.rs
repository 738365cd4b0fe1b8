//! Init command handler

use crate::config::Config;
use std::path::Path;

pub fn cmd_init(path: &Path) -> anyhow::Result<()> {
    if Config::create_default_if_missing(path)? {
        println!("Created default config at {}", path.display());
    } else {
        println!("Config already exists at {}", path.display());
    }

    Ok(())
}
