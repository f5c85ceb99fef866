//! Backs up files and folders onto LUKS-encrypted, btrfs-compressed
//! removable disks.
//!
//! A run unlocks the disk ([`crypt`]), mounts the decrypted volume with
//! compression at a fresh temporary directory ([`mount`]), copies the
//! configured sources onto it ([`backup`]) and then unmounts and locks the
//! disk again, even when the copy fails.

pub mod backup;
pub mod cli;
pub mod config;
pub mod crypt;
pub mod error;
pub mod mount;
pub mod tools;
pub mod types;
pub mod util;

pub use crypt::{with_decrypted_device, DecryptedDevice, DecryptionDescriptor};
pub use error::{BackupError, Result};
pub use mount::{mounted_device, MountSettings, MountedDevice};
pub use tools::Tools;
