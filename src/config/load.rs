use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use uuid::Uuid;

use crate::config::model::{BtrfsConfig, Config, RuntimeConfig, TargetConfig};
use crate::error::{BackupError, ConfigError, Result};
use crate::util::paths::{expand_user, is_plain_component};

pub fn load_config(path: &Path) -> Result<RuntimeConfig> {
    let mut contents = String::new();
    File::open(path)
        .map_err(|e| BackupError::io("open config", path, e))?
        .read_to_string(&mut contents)
        .map_err(|e| BackupError::io("read config", path, e))?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> Result<RuntimeConfig> {
    let cfg: Config =
        serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
    parse_runtime(cfg)
}

fn parse_runtime(cfg: Config) -> Result<RuntimeConfig> {
    let mut targets = Vec::new();
    let mut uuids = HashSet::new();
    for raw in cfg.targets {
        let target = parse_target(raw)?;
        if !uuids.insert(target.uuid) {
            return Err(ConfigError::Invalid(format!(
                "duplicate target UUID {}",
                target.uuid
            ))
            .into());
        }
        targets.push(target);
    }
    Ok(RuntimeConfig {
        targets,
        options: cfg.options,
    })
}

pub fn parse_target(raw: TargetConfig) -> Result<BtrfsConfig> {
    let uuid = Uuid::parse_str(raw.uuid.trim())
        .map_err(|e| ConfigError::Invalid(format!("UUID {}: {}", raw.uuid, e)))?;
    if raw.device_pass_cmd.trim().is_empty() {
        return Err(invalid(uuid, "DevicePassCmd is empty".to_string()));
    }
    if !is_plain_component(&raw.files_dest) {
        return Err(invalid(
            uuid,
            format!("FilesDest {} must be a single directory name", raw.files_dest),
        ));
    }

    let mut folders = BTreeMap::new();
    let mut dests = HashSet::new();
    for (src, dest) in raw.folders {
        if !is_plain_component(&dest) {
            return Err(invalid(
                uuid,
                format!("folder destination {} must be a single directory name", dest),
            ));
        }
        if !dests.insert(dest.clone()) {
            return Err(invalid(uuid, format!("duplicate folder destination {}", dest)));
        }
        if dest == raw.files_dest {
            return Err(invalid(
                uuid,
                format!("folder destination {} collides with FilesDest", dest),
            ));
        }
        let src = expand_user(Path::new(&src));
        if !src.is_dir() {
            return Err(invalid(
                uuid,
                format!("folder {} is not a directory", src.display()),
            ));
        }
        folders.insert(src, dest);
    }

    let mut files = BTreeSet::new();
    let mut names = HashSet::new();
    for file in raw.files {
        let file = expand_user(Path::new(&file));
        if !file.is_file() {
            return Err(invalid(uuid, format!("file {} is not a file", file.display())));
        }
        let name = file_name(&file)?;
        if !names.insert(name.clone()) {
            return Err(invalid(
                uuid,
                format!("file name {} appears more than once in Files", name),
            ));
        }
        files.insert(file);
    }

    Ok(BtrfsConfig {
        uuid,
        pass_cmd: raw.device_pass_cmd,
        folders,
        files,
        files_dest: raw.files_dest,
    })
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| ConfigError::Invalid(format!("file {} has no name", path.display())).into())
}

fn invalid(uuid: Uuid, msg: String) -> BackupError {
    ConfigError::Invalid(format!("target {}: {}", uuid, msg)).into()
}
