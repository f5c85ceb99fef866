use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::BtrfsConfig;
use crate::crypt::with_decrypted_device;
use crate::error::{BackupError, Result};
use crate::mount::{mounted_device, MountSettings};
use crate::tools::Tools;

pub mod rsync;

pub fn print_target_details(target: &BtrfsConfig) {
    println!("target: {}", target.uuid);
    println!("  device: {}", target.device().display());
    for (src, dest) in &target.folders {
        println!("  folder: {} -> {}", src.display(), dest);
    }
    println!("  files: {} -> {}", target.files.len(), target.files_dest);
}

/// Targets whose device is currently attached, in configuration order.
pub fn available_targets(targets: &[BtrfsConfig]) -> Vec<BtrfsConfig> {
    targets
        .iter()
        .filter(|target| target.device().exists())
        .cloned()
        .collect()
}

/// Unlock, mount, copy, unmount, lock. Both scopes are released on every
/// path out of this function.
pub fn run_target(target: &BtrfsConfig, tools: &Tools, settings: &MountSettings) -> Result<()> {
    let descriptor = target.decryption_descriptor();
    with_decrypted_device(&descriptor, tools, |mapped| {
        mounted_device(mapped, tools, settings, |mount_dir| {
            copy_target(target, tools, mount_dir)
        })
    })
}

pub fn copy_target(target: &BtrfsConfig, tools: &Tools, mount_dir: &Path) -> Result<()> {
    for (src, dest) in &target.folders {
        let dest = mount_dir.join(dest);
        ensure_dest(&dest)?;
        info!(source = %src.display(), dest = %dest.display(), "sync folder");
        rsync::sync_folder(tools, src, &dest)?;
    }
    if !target.files.is_empty() {
        let dest = mount_dir.join(&target.files_dest);
        ensure_dest(&dest)?;
        let files: Vec<PathBuf> = target.files.iter().cloned().collect();
        info!(count = files.len(), dest = %dest.display(), "sync files");
        rsync::sync_files(tools, &files, &dest)?;
    }
    Ok(())
}

fn ensure_dest(dest: &Path) -> Result<()> {
    fs::create_dir_all(dest).map_err(|e| BackupError::io("create", dest, e))
}

pub fn run_backup(targets: &[BtrfsConfig], tools: &Tools, settings: &MountSettings) -> Result<usize> {
    let available = available_targets(targets);
    for target in targets {
        if !available.contains(target) {
            println!("device {} not attached; skipping", target.device().display());
        }
    }
    for target in &available {
        info!(uuid = %target.uuid, "backing up target");
        run_target(target, tools, settings)?;
        println!("backed up {}", target.uuid);
    }
    Ok(available.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn absent_devices_are_not_available() {
        let uuid = Uuid::parse_str("5f0c6b1e-9a77-4d2e-b3c4-d1e2f3a4b5c6").unwrap();
        let target = BtrfsConfig::from_uuid_and_passphrase(uuid, "pw").unwrap();
        assert!(available_targets(&[target]).is_empty());
    }
}
