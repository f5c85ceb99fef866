use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{BackupArgs, Cli, Command};
use crate::cli::commands::{backup, config, exit_for_error};

const CONFIG_FILE: &str = "/etc/butterbackup.yaml";
const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod args;
pub mod commands;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let command = cli
        .command
        .unwrap_or_else(|| Command::Backup(BackupArgs::default()));
    let result = match command {
        Command::Backup(args) => {
            println!("ButterBackup {}", VERSION);
            backup::run_backup_command(&config_path, &args)
        }
        Command::Config(args) => config::run_config_command(&args),
    };
    if let Err(err) = result {
        exit_for_error(&err);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
