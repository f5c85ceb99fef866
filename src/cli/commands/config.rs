use uuid::Uuid;

use crate::cli::args::ConfigArgs;
use crate::config::model::TargetConfig;
use crate::config::save::render_config;
use crate::config::{BtrfsConfig, Config};
use crate::error::{ConfigError, Result};

pub fn starter_config(uuid: &str, passphrase: &str) -> Result<String> {
    let uuid = Uuid::parse_str(uuid.trim())
        .map_err(|e| ConfigError::Invalid(format!("UUID {}: {}", uuid, e)))?;
    let target = BtrfsConfig::from_uuid_and_passphrase(uuid, passphrase)?;
    render_config(&Config {
        options: Default::default(),
        targets: vec![TargetConfig::from(&target)],
    })
}

pub fn run_config_command(args: &ConfigArgs) -> Result<()> {
    print!("{}", starter_config(&args.uuid, &args.passphrase)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn starter_config_parses_back() {
        let text = starter_config("3d02cfd4-968a-4fe4-a2a0-fe84614485f6", "hunter2").unwrap();
        assert!(text.contains("DevicePassCmd"));
        let cfg = parse_config(&text).unwrap();
        assert_eq!(cfg.targets.len(), 1);
        assert_eq!(cfg.targets[0].pass_cmd, "echo 'hunter2'");
    }

    #[test]
    fn starter_config_rejects_shell_metacharacters() {
        assert!(starter_config("3d02cfd4-968a-4fe4-a2a0-fe84614485f6", "a;b").is_err());
    }
}
