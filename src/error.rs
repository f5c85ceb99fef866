use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("{0}")]
    Message(String),
    #[error("{0}")]
    Command(CommandError),
    #[error("{0}")]
    Device(DeviceError),
    #[error("{0}")]
    Config(ConfigError),
    #[error("{primary}; cleanup also failed: {cleanup}")]
    Cleanup {
        primary: Box<BackupError>,
        #[source]
        cleanup: Box<BackupError>,
    },
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A failed external command. Never retried.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("{command} failed with exit code {code}{}", stderr_suffix(.stderr))]
    Failed {
        command: String,
        code: i32,
        stderr: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parse config: {0}")]
    Parse(String),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("unlock {device} as {name}: {source}")]
    Unlock {
        device: PathBuf,
        name: String,
        source: CommandError,
    },
    #[error("lock {name}: {source}")]
    Lock { name: String, source: CommandError },
    #[error("mount {device} at {mountpoint}: {source}")]
    Mount {
        device: PathBuf,
        mountpoint: PathBuf,
        source: CommandError,
    },
    #[error("umount {device}: {source}")]
    Unmount {
        device: PathBuf,
        source: CommandError,
    },
}

pub type Result<T> = std::result::Result<T, BackupError>;

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

impl BackupError {
    pub fn message(msg: impl Into<String>) -> Self {
        BackupError::Message(msg.into())
    }

    pub fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        BackupError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

impl CommandError {
    pub fn command(&self) -> &str {
        match self {
            CommandError::Spawn { command, .. } | CommandError::Failed { command, .. } => command,
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CommandError::Spawn { .. } => None,
            CommandError::Failed { code, .. } => Some(*code),
        }
    }
}

impl From<CommandError> for BackupError {
    fn from(err: CommandError) -> Self {
        BackupError::Command(err)
    }
}

impl From<DeviceError> for BackupError {
    fn from(err: DeviceError) -> Self {
        BackupError::Device(err)
    }
}

impl From<ConfigError> for BackupError {
    fn from(err: ConfigError) -> Self {
        BackupError::Config(err)
    }
}

/// Merges the outcome of a scope body with the outcome of releasing the
/// scope. A release failure never hides a body failure.
pub fn with_release<T>(body: Result<T>, release: Result<()>) -> Result<T> {
    match (body, release) {
        (Ok(value), Ok(())) => Ok(value),
        (Err(err), Ok(())) => Err(err),
        (Ok(_), Err(err)) => Err(err),
        (Err(primary), Err(cleanup)) => Err(BackupError::Cleanup {
            primary: Box::new(primary),
            cleanup: Box::new(cleanup),
        }),
    }
}
