use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::Result;
use crate::tools::Tools;
use crate::util::command::run_command;

/// Wraps a command line in `nice -n 19 ionice -c 3 -n7` so a backup does not
/// starve the machine it runs on.
fn nice_ionice(args: &[OsString]) -> Command {
    let mut cmd = Command::new("nice");
    cmd.arg("-n")
        .arg("19")
        .arg("ionice")
        .arg("-c")
        .arg("3")
        .arg("-n7");
    cmd.args(args);
    cmd
}

/// Appends a trailing slash so rsync copies directory contents.
fn as_dir_source(path: &Path) -> OsString {
    let mut out = path.as_os_str().to_os_string();
    if !out.to_string_lossy().ends_with('/') {
        out.push("/");
    }
    out
}

pub fn folder_args(tools: &Tools, source: &Path, dest: &Path) -> Vec<OsString> {
    vec![
        tools.rsync.clone().into_os_string(),
        "-a".into(),
        "--delete".into(),
        as_dir_source(source),
        as_dir_source(dest),
    ]
}

pub fn files_args(tools: &Tools, files: &[PathBuf], dest: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![tools.rsync.clone().into_os_string(), "-a".into()];
    args.extend(files.iter().map(|f| f.clone().into_os_string()));
    args.push(as_dir_source(dest));
    args
}

pub fn sync_folder(tools: &Tools, source: &Path, dest: &Path) -> Result<()> {
    run_command(&mut nice_ionice(&folder_args(tools, source, dest)), false)?;
    Ok(())
}

pub fn sync_files(tools: &Tools, files: &[PathBuf], dest: &Path) -> Result<()> {
    if files.is_empty() {
        return Ok(());
    }
    run_command(&mut nice_ionice(&files_args(tools, files, dest)), false)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_sync_copies_contents_with_delete() {
        let args = folder_args(&Tools::default(), Path::new("/etc"), Path::new("/mnt/x/etc_backup"));
        assert_eq!(
            args,
            vec!["rsync", "-a", "--delete", "/etc/", "/mnt/x/etc_backup/"]
                .into_iter()
                .map(OsString::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn files_land_in_one_directory() {
        let files = vec![PathBuf::from("/root/.bashrc"), PathBuf::from("/etc/fstab")];
        let args = files_args(&Tools::default(), &files, Path::new("/mnt/x/files"));
        assert_eq!(args.last().unwrap(), "/mnt/x/files/");
        assert_eq!(args.len(), 5);
    }

    #[test]
    fn nice_prefix() {
        let cmd = nice_ionice(&["rsync".into()]);
        assert_eq!(cmd.get_program(), "nice");
        assert_eq!(cmd.get_args().last().unwrap(), "rsync");
    }
}
