use std::path::Path;

use tracing::info;

use crate::error::{DeviceError, Result};
use crate::tools::Tools;
use crate::util::command::run_command;

pub fn mount_device(tools: &Tools, device: &Path, mountpoint: &Path, options: &str) -> Result<()> {
    let mut cmd = tools.privileged(&tools.mount);
    cmd.arg("-o").arg(options).arg(device).arg(mountpoint);
    run_command(&mut cmd, false).map_err(|source| DeviceError::Mount {
        device: device.to_path_buf(),
        mountpoint: mountpoint.to_path_buf(),
        source,
    })?;
    info!(device = %device.display(), mountpoint = %mountpoint.display(), options, "mounted");
    Ok(())
}

pub fn unmount_device(tools: &Tools, device: &Path) -> Result<()> {
    let mut cmd = tools.privileged(&tools.umount);
    cmd.arg(device);
    run_command(&mut cmd, false).map_err(|source| DeviceError::Unmount {
        device: device.to_path_buf(),
        source,
    })?;
    info!(device = %device.display(), "unmounted");
    Ok(())
}
