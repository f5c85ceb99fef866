pub mod inspect;
pub mod ops;
pub mod session;

pub use inspect::{is_mounted, list_mounts};
pub use session::{mounted_device, MountSettings, MountedDevice};
