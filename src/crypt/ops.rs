use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::error::{DeviceError, Result};
use crate::tools::Tools;
use crate::types::MapName;
use crate::util::command::{run_command, run_pipeline};

/// `sh -c <pass_cmd> | cryptsetup open <device> <name>`. Only the
/// operator-written pass command goes through a shell; the device path and
/// mapping name are passed as plain arguments.
pub fn open_mapping(tools: &Tools, device: &Path, name: &MapName, pass_cmd: &str) -> Result<()> {
    let mut secret = Command::new("sh");
    secret.arg("-c").arg(pass_cmd);
    let mut open = tools.privileged(&tools.cryptsetup);
    open.arg("open").arg(device).arg(name.as_str());
    run_pipeline(&mut secret, &mut open).map_err(|source| DeviceError::Unlock {
        device: device.to_path_buf(),
        name: name.to_string(),
        source,
    })?;
    info!(device = %device.display(), name = %name, "unlocked");
    Ok(())
}

pub fn close_mapping(tools: &Tools, name: &MapName) -> Result<()> {
    let mut cmd = tools.privileged(&tools.cryptsetup);
    cmd.arg("close").arg(name.as_str());
    run_command(&mut cmd, false).map_err(|source| DeviceError::Lock {
        name: name.to_string(),
        source,
    })?;
    info!(name = %name, "locked");
    Ok(())
}
