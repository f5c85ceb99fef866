use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "butterbackup", version, about = "Back up to LUKS-encrypted btrfs disks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Back up every configured target whose disk is attached.
    Backup(BackupArgs),
    /// Print a starter configuration for one disk.
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct BackupArgs {
    /// Only back up the target with this filesystem UUID.
    #[arg(long)]
    pub uuid: Option<String>,
    /// Print the selected targets and exit.
    #[arg(long)]
    pub print_targets: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(long)]
    pub uuid: String,
    #[arg(long)]
    pub passphrase: String,
}
