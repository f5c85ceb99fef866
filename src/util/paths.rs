use std::env;
use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{BackupError, Result};

static TEMP_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// True for a single, normal path component such as `backup_logs`.
pub fn is_plain_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains('/')
}

/// Expands a leading `~` against `$HOME`. Other paths are returned as-is.
pub fn expand_user(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match env::var_os("HOME") {
        Some(home) if rest.as_os_str().is_empty() => PathBuf::from(home),
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

pub fn ensure_base_dir(path: &Path) -> Result<()> {
    if path.exists() {
        let meta = fs::metadata(path).map_err(|e| BackupError::io("stat", path, e))?;
        if !meta.is_dir() {
            return Err(BackupError::message(format!(
                "{} is not a directory",
                path.display()
            )));
        }
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| BackupError::io("create", path, e))?;
    set_private(path)
}

/// Creates a fresh, private directory below `base`. An existing directory
/// is never reused.
pub fn create_temp_dir(base: &Path, prefix: &str) -> Result<PathBuf> {
    ensure_base_dir(base)?;
    let ts = chrono::Utc::now().format("%Y%m%d%H%M%S%3f");
    loop {
        let seq = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let candidate = base.join(format!("{}-{}-{}-{}", prefix, std::process::id(), ts, seq));
        match fs::create_dir(&candidate) {
            Ok(()) => {
                set_private(&candidate)?;
                return Ok(candidate);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(BackupError::io("create", &candidate, e)),
        }
    }
}

/// Removes an empty mount directory. Never recursive: a directory that is
/// still a mount point must not be emptied.
pub fn remove_temp_dir(path: &Path) -> Result<()> {
    match fs::remove_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BackupError::io("remove", path, e)),
    }
}

fn set_private(path: &Path) -> Result<()> {
    let mut perms = fs::metadata(path)
        .map_err(|e| BackupError::io("stat", path, e))?
        .permissions();
    perms.set_mode(0o700);
    fs::set_permissions(path, perms).map_err(|e| BackupError::io("chmod", path, e))
}
