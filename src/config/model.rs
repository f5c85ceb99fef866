use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypt::DecryptionDescriptor;
use crate::error::{ConfigError, Result};
use crate::mount::MountSettings;
use crate::tools::Tools;
use crate::types::{Compression, MapName};

pub const BY_UUID_DIR: &str = "/dev/disk/by-uuid";
pub const DEFAULT_FILES_DEST: &str = "files";

/// Characters that would let a passphrase escape the generated pass command.
const UNSAFE_PASSPHRASE_CHARS: [char; 9] = ['\'', ';', '&', '|', '$', '`', '\\', '\n', '\r'];

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "ConfigOptions::is_empty")]
    pub options: ConfigOptions,
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ConfigOptions {
    #[serde(default, rename = "mountBase", skip_serializing_if = "Option::is_none")]
    pub mount_base: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<Compression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sudo: Option<bool>,
}

impl ConfigOptions {
    fn is_empty(&self) -> bool {
        self == &ConfigOptions::default()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TargetConfig {
    #[serde(rename = "UUID")]
    pub uuid: String,
    #[serde(rename = "DevicePassCmd")]
    pub device_pass_cmd: String,
    #[serde(default, rename = "Folders")]
    pub folders: BTreeMap<String, String>,
    #[serde(default, rename = "Files")]
    pub files: Vec<String>,
    #[serde(rename = "FilesDest")]
    pub files_dest: String,
}

/// A validated backup target on a LUKS container holding a btrfs filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BtrfsConfig {
    pub uuid: Uuid,
    pub pass_cmd: String,
    /// Source directory to destination directory name on the backup disk.
    pub folders: BTreeMap<PathBuf, String>,
    pub files: BTreeSet<PathBuf>,
    pub files_dest: String,
}

impl BtrfsConfig {
    pub fn from_uuid_and_passphrase(uuid: Uuid, passphrase: &str) -> Result<Self> {
        if let Some(c) = passphrase.chars().find(|c| UNSAFE_PASSPHRASE_CHARS.contains(c)) {
            return Err(ConfigError::Invalid(format!(
                "passphrase must not contain {:?}",
                c
            ))
            .into());
        }
        Ok(Self {
            uuid,
            pass_cmd: format!("echo '{}'", passphrase),
            folders: BTreeMap::new(),
            files: BTreeSet::new(),
            files_dest: DEFAULT_FILES_DEST.to_string(),
        })
    }

    pub fn device(&self) -> PathBuf {
        Path::new(BY_UUID_DIR).join(self.uuid.hyphenated().to_string())
    }

    pub fn map_name(&self) -> MapName {
        MapName::from(self.uuid)
    }

    pub fn decryption_descriptor(&self) -> DecryptionDescriptor {
        DecryptionDescriptor {
            device: self.device(),
            map_name: self.map_name(),
            pass_cmd: self.pass_cmd.clone(),
        }
    }
}

impl From<&BtrfsConfig> for TargetConfig {
    fn from(cfg: &BtrfsConfig) -> Self {
        TargetConfig {
            uuid: cfg.uuid.hyphenated().to_string(),
            device_pass_cmd: cfg.pass_cmd.clone(),
            folders: cfg
                .folders
                .iter()
                .map(|(src, dest)| (src.to_string_lossy().to_string(), dest.clone()))
                .collect(),
            files: cfg
                .files
                .iter()
                .map(|f| f.to_string_lossy().to_string())
                .collect(),
            files_dest: cfg.files_dest.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub targets: Vec<BtrfsConfig>,
    pub options: ConfigOptions,
}

impl RuntimeConfig {
    pub fn tools(&self) -> Tools {
        Tools::default().with_sudo(self.options.sudo.unwrap_or(false))
    }

    pub fn mount_settings(&self) -> MountSettings {
        MountSettings {
            base: self
                .options
                .mount_base
                .clone()
                .unwrap_or_else(env::temp_dir),
            compression: self.options.compression.unwrap_or_default(),
        }
    }
}

impl From<&RuntimeConfig> for Config {
    fn from(cfg: &RuntimeConfig) -> Self {
        Config {
            options: cfg.options.clone(),
            targets: cfg.targets.iter().map(TargetConfig::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uuid() -> Uuid {
        Uuid::parse_str("0afee777-4fca-45c6-9bed-64bf3091536b").unwrap()
    }

    #[test]
    fn device_ends_in_uuid_and_map_name_is_uuid() {
        let cfg = BtrfsConfig::from_uuid_and_passphrase(uuid(), "hunter2").unwrap();
        assert_eq!(
            cfg.device(),
            PathBuf::from("/dev/disk/by-uuid/0afee777-4fca-45c6-9bed-64bf3091536b")
        );
        assert_eq!(cfg.map_name().as_str(), "0afee777-4fca-45c6-9bed-64bf3091536b");

        let descriptor = cfg.decryption_descriptor();
        assert_eq!(descriptor.device, cfg.device());
        assert_eq!(descriptor.map_name, cfg.map_name());
        assert_eq!(descriptor.pass_cmd, "echo 'hunter2'");
    }

    #[test]
    fn from_uuid_and_passphrase_starts_empty() {
        let cfg = BtrfsConfig::from_uuid_and_passphrase(uuid(), "correct horse").unwrap();
        assert!(cfg.folders.is_empty());
        assert!(cfg.files.is_empty());
        assert_eq!(cfg.uuid, uuid());
        assert!(cfg.pass_cmd.contains("correct horse"));
    }

    #[test]
    fn from_uuid_and_passphrase_rejects_unsafe_passphrases() {
        for passphrase in ["contains_'quote", "contains;_semicolon", "contains&ampersand", "$(reboot)"] {
            assert!(
                BtrfsConfig::from_uuid_and_passphrase(uuid(), passphrase).is_err(),
                "{passphrase} accepted"
            );
        }
    }

    #[test]
    fn runtime_defaults() {
        let cfg = RuntimeConfig {
            targets: Vec::new(),
            options: ConfigOptions::default(),
        };
        assert!(cfg.tools().elevate.is_none());
        let settings = cfg.mount_settings();
        assert_eq!(settings.base, env::temp_dir());
        assert_eq!(settings.compression, Compression::Zlib);
    }
}
