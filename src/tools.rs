//! External programs the device lifecycle drives.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Command;

pub const MAPPER_DIR: &str = "/dev/mapper";

#[derive(Debug, Clone)]
pub struct Tools {
    pub cryptsetup: PathBuf,
    pub mount: PathBuf,
    pub umount: PathBuf,
    pub rsync: PathBuf,
    /// Directory holding decrypted device-mapper nodes.
    pub mapper_dir: PathBuf,
    /// Prefix for privileged commands, e.g. `sudo`.
    pub elevate: Option<PathBuf>,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            cryptsetup: PathBuf::from("cryptsetup"),
            mount: PathBuf::from("mount"),
            umount: PathBuf::from("umount"),
            rsync: PathBuf::from("rsync"),
            mapper_dir: PathBuf::from(MAPPER_DIR),
            elevate: None,
        }
    }
}

impl Tools {
    pub fn with_sudo(mut self, sudo: bool) -> Self {
        self.elevate = sudo.then(|| PathBuf::from("sudo"));
        self
    }

    pub fn privileged(&self, program: impl AsRef<OsStr>) -> Command {
        match &self.elevate {
            Some(elevate) => {
                let mut cmd = Command::new(elevate);
                cmd.arg(program);
                cmd
            }
            None => Command::new(program),
        }
    }

    pub fn mapped_device(&self, name: &str) -> PathBuf {
        self.mapper_dir.join(name)
    }
}
