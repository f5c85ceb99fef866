pub mod load;
pub mod model;
pub mod save;

pub use load::{load_config, parse_config};
pub use model::{BtrfsConfig, Config, RuntimeConfig};
