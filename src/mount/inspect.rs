use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::Result;
use crate::tools::Tools;
use crate::util::command::run_command;

/// Parses `mount` output (`<source> on <target> type <fs> (<opts>)`).
/// Field 1 is the source, field 3 the target; paths containing spaces are
/// not representable in this format. Later entries win for a source that
/// is mounted more than once.
pub fn parse_mount_table(contents: &str) -> HashMap<String, PathBuf> {
    let mut mounts = HashMap::new();
    for line in contents.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            continue;
        }
        mounts.insert(fields[0].to_string(), PathBuf::from(fields[2]));
    }
    mounts
}

/// Live mount table keyed by source device. Re-read on every call.
pub fn list_mounts(tools: &Tools) -> Result<HashMap<String, PathBuf>> {
    let mut cmd = Command::new(&tools.mount);
    let output = run_command(&mut cmd, true)?;
    Ok(parse_mount_table(&output.stdout))
}

pub fn is_mounted(tools: &Tools, device: &Path) -> Result<bool> {
    Ok(list_mounts(tools)?.contains_key(device.to_string_lossy().as_ref()))
}

pub fn find_mountpoint(tools: &Tools, device: &Path) -> Result<Option<PathBuf>> {
    Ok(list_mounts(tools)?.remove(device.to_string_lossy().as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
sysfs on /sys type sysfs (rw,nosuid,nodev,noexec,relatime)
/dev/nvme0n1p2 on / type ext4 (rw,relatime)
/dev/mapper/test-uuid-1234 on /tmp/butterbackup-1-2-3 type btrfs (rw,relatime,compress=zlib:3)

garbage
";

    #[test]
    fn takes_first_and_third_fields() {
        let mounts = parse_mount_table(TABLE);
        assert_eq!(mounts.len(), 3);
        assert_eq!(mounts["/dev/nvme0n1p2"], PathBuf::from("/"));
        assert_eq!(
            mounts["/dev/mapper/test-uuid-1234"],
            PathBuf::from("/tmp/butterbackup-1-2-3")
        );
        assert!(!mounts.contains_key("garbage"));
    }

    #[test]
    fn later_entry_wins_for_repeated_source() {
        let mounts = parse_mount_table("/dev/sdb1 on /a type btrfs (rw)\n/dev/sdb1 on /b type btrfs (rw)\n");
        assert_eq!(mounts["/dev/sdb1"], PathBuf::from("/b"));
    }

    #[test]
    fn empty_table_has_no_mounts() {
        assert!(parse_mount_table("").is_empty());
    }
}
