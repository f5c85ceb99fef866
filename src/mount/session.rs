use std::env;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{with_release, Result};
use crate::mount::inspect::find_mountpoint;
use crate::mount::ops::{mount_device, unmount_device};
use crate::tools::Tools;
use crate::types::Compression;
use crate::util::paths::{create_temp_dir, remove_temp_dir};

const MOUNT_DIR_PREFIX: &str = "butterbackup";

#[derive(Debug, Clone)]
pub struct MountSettings {
    /// Parent directory of the temporary mount points.
    pub base: PathBuf,
    pub compression: Compression,
}

impl Default for MountSettings {
    fn default() -> Self {
        Self {
            base: env::temp_dir(),
            compression: Compression::default(),
        }
    }
}

/// A device mounted at a temporary directory owned by this value.
///
/// `close` unmounts the device and removes the directory. Dropping an open
/// session does the same on a best-effort basis.
#[derive(Debug)]
pub struct MountedDevice<'t> {
    device: PathBuf,
    mount_dir: PathBuf,
    tools: &'t Tools,
    open: bool,
}

impl<'t> MountedDevice<'t> {
    pub fn open(device: &Path, tools: &'t Tools, settings: &MountSettings) -> Result<Self> {
        // A mount left behind by an earlier run is unmounted rather than
        // reused; failing to do so aborts before anything new is created.
        if let Some(stale) = find_mountpoint(tools, device)? {
            warn!(
                device = %device.display(),
                mountpoint = %stale.display(),
                "device already mounted; unmounting stale mount"
            );
            unmount_device(tools, device)?;
        }

        let mount_dir = create_temp_dir(&settings.base, MOUNT_DIR_PREFIX)?;
        let options = settings.compression.mount_option();
        if let Err(err) = mount_device(tools, device, &mount_dir, &options) {
            return with_release(Err(err), remove_temp_dir(&mount_dir));
        }

        Ok(Self {
            device: device.to_path_buf(),
            mount_dir,
            tools,
            open: true,
        })
    }

    pub fn device(&self) -> &Path {
        &self.device
    }

    pub fn mount_dir(&self) -> &Path {
        &self.mount_dir
    }

    pub fn close(mut self) -> Result<()> {
        self.open = false;
        self.release()
    }

    fn release(&self) -> Result<()> {
        let unmounted = unmount_device(self.tools, &self.device);
        let removed = remove_temp_dir(&self.mount_dir);
        with_release(unmounted, removed)
    }
}

impl Drop for MountedDevice<'_> {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        if let Err(err) = self.release() {
            warn!(device = %self.device.display(), "release on drop failed: {}", err);
        }
    }
}

/// Mounts `device`, hands the mount directory to `body`, then always
/// unmounts and removes the directory.
pub fn mounted_device<T, F>(
    device: &Path,
    tools: &Tools,
    settings: &MountSettings,
    body: F,
) -> Result<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    let session = MountedDevice::open(device, tools, settings)?;
    info!(mountpoint = %session.mount_dir().display(), "mount session open");
    let outcome = body(session.mount_dir());
    with_release(outcome, session.close())
}
