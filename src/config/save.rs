use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::config::model::Config;
use crate::error::{BackupError, Result};

pub fn render_config(cfg: &Config) -> Result<String> {
    serde_yaml::to_string(cfg).map_err(|e| BackupError::message(format!("encode config: {}", e)))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let data = render_config(cfg)?;
    let mut file = File::create(path)
        .map_err(|e| BackupError::io("write config", path, e))?;
    file.write_all(data.as_bytes())
        .map_err(|e| BackupError::io("write config", path, e))?;
    Ok(())
}
