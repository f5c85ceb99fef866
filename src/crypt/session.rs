use std::path::{Path, PathBuf};

use tracing::warn;

use crate::crypt::ops::{close_mapping, open_mapping};
use crate::error::{with_release, Result};
use crate::tools::Tools;
use crate::types::MapName;

/// Everything needed to unlock one encrypted device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptionDescriptor {
    pub device: PathBuf,
    pub map_name: MapName,
    /// Shell command whose stdout is the passphrase.
    pub pass_cmd: String,
}

/// An open device-mapper node. Locked again by `close`, or on drop if
/// `close` was never called.
#[derive(Debug)]
pub struct DecryptedDevice<'t> {
    map_name: MapName,
    path: PathBuf,
    tools: &'t Tools,
    open: bool,
}

impl<'t> DecryptedDevice<'t> {
    pub fn open(descriptor: &DecryptionDescriptor, tools: &'t Tools) -> Result<Self> {
        open_mapping(
            tools,
            &descriptor.device,
            &descriptor.map_name,
            &descriptor.pass_cmd,
        )?;
        Ok(Self {
            map_name: descriptor.map_name.clone(),
            path: tools.mapped_device(descriptor.map_name.as_str()),
            tools,
            open: true,
        })
    }

    /// Path of the decrypted node, e.g. `/dev/mapper/<name>`.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn map_name(&self) -> &MapName {
        &self.map_name
    }

    pub fn close(mut self) -> Result<()> {
        self.open = false;
        close_mapping(self.tools, &self.map_name)
    }
}

impl Drop for DecryptedDevice<'_> {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        if let Err(err) = close_mapping(self.tools, &self.map_name) {
            warn!(name = %self.map_name, "lock on drop failed: {}", err);
        }
    }
}

/// Unlocks the device, runs `body` with the decrypted node path, then
/// always locks it again.
pub fn with_decrypted_device<T, F>(
    descriptor: &DecryptionDescriptor,
    tools: &Tools,
    body: F,
) -> Result<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    let session = DecryptedDevice::open(descriptor, tools)?;
    let outcome = body(session.path());
    with_release(outcome, session.close())
}
