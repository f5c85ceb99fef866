pub mod backup;
pub mod config;

use crate::error::BackupError;

pub fn exit_code(err: &BackupError) -> i32 {
    match err {
        BackupError::Device(_) => 14,
        BackupError::Config(_) => 2,
        BackupError::Cleanup { primary, .. } => exit_code(primary),
        _ => 1,
    }
}

pub fn exit_for_error(err: &BackupError) -> ! {
    println!("{}", err);
    std::process::exit(exit_code(err));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CommandError, ConfigError, DeviceError};

    #[test]
    fn exit_codes_follow_primary_failure() {
        let device = BackupError::from(DeviceError::Lock {
            name: "x".to_string(),
            source: CommandError::Failed {
                command: "cryptsetup close x".to_string(),
                code: 5,
                stderr: String::new(),
            },
        });
        assert_eq!(exit_code(&device), 14);
        assert_eq!(exit_code(&BackupError::from(ConfigError::Invalid("bad".into()))), 2);
        let combined = BackupError::Cleanup {
            primary: Box::new(BackupError::message("rsync")),
            cleanup: Box::new(device),
        };
        assert_eq!(exit_code(&combined), 1);
    }
}
