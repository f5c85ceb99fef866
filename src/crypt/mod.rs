pub mod ops;
pub mod session;

pub use session::{with_decrypted_device, DecryptedDevice, DecryptionDescriptor};
