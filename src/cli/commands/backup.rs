use std::path::Path;

use chrono::Local;
use uuid::Uuid;

use crate::backup::{print_target_details, run_backup};
use crate::cli::args::BackupArgs;
use crate::config::{load_config, BtrfsConfig};
use crate::error::{BackupError, ConfigError, Result};

pub fn select_targets(targets: &[BtrfsConfig], uuid: Option<&str>) -> Result<Vec<BtrfsConfig>> {
    let Some(uuid) = uuid else {
        return Ok(targets.to_vec());
    };
    let uuid = Uuid::parse_str(uuid.trim())
        .map_err(|e| ConfigError::Invalid(format!("UUID {}: {}", uuid, e)))?;
    let selected: Vec<BtrfsConfig> = targets.iter().filter(|t| t.uuid == uuid).cloned().collect();
    if selected.is_empty() {
        return Err(BackupError::message(format!("target {} not found in config", uuid)));
    }
    Ok(selected)
}

pub fn run_backup_command(config_path: &Path, args: &BackupArgs) -> Result<()> {
    println!("{}", Local::now().format("%d-%m-%Y %H:%M"));

    let cfg = load_config(config_path)?;
    if cfg.targets.is_empty() {
        return Err(BackupError::message(format!(
            "no targets configured in {}; see `butterbackup config`",
            config_path.display()
        )));
    }
    let targets = select_targets(&cfg.targets, args.uuid.as_deref())?;

    if args.print_targets {
        for target in &targets {
            print_target_details(target);
        }
        return Ok(());
    }

    let count = run_backup(&targets, &cfg.tools(), &cfg.mount_settings())?;
    if count == 0 {
        println!("no configured disk is attached");
    }
    println!("{}", Local::now().format("%d-%m-%Y %H:%M"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(uuid: &str) -> BtrfsConfig {
        BtrfsConfig::from_uuid_and_passphrase(Uuid::parse_str(uuid).unwrap(), "pw").unwrap()
    }

    #[test]
    fn selects_by_uuid() {
        let targets = vec![
            target("3d02cfd4-968a-4fe4-a2a0-fe84614485f6"),
            target("0afee777-4fca-45c6-9bed-64bf3091536b"),
        ];
        assert_eq!(select_targets(&targets, None).unwrap().len(), 2);
        let picked = select_targets(&targets, Some("0AFEE777-4fca-45c6-9bed-64bf3091536b")).unwrap();
        assert_eq!(picked, vec![targets[1].clone()]);
        assert!(select_targets(&targets, Some("5f0c6b1e-9a77-4d2e-b3c4-d1e2f3a4b5c6")).is_err());
        assert!(select_targets(&targets, Some("nope")).is_err());
    }
}
