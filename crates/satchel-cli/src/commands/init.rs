use anyhow::Result;
use std::path::Path;

use satchel_core::config::SatchelConfig;

pub fn run(base_dir: &Path) -> Result<()> {
    let path = SatchelConfig::default_path(base_dir);
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }

    let config = SatchelConfig::default_config(base_dir);
    config.save(&path)?;
    std::fs::create_dir_all(&config.satchel.store_root)?;

    println!("Initialized satchel at {}", path.display());
    println!("  store root: {}", config.satchel.store_root);
    Ok(())
}
