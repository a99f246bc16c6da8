//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

use crate::pipeline::Passes;

/// Load roles, groups and users from a spreadsheet into an identity realm
#[derive(Debug, Parser)]
#[command(name = "realmsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Create or update groups
    #[arg(short = 'g', long)]
    pub groups: bool,

    /// Create or update users
    #[arg(short = 'u', long)]
    pub users: bool,

    /// Delete all groups, users and roles
    #[arg(short = 'd', long)]
    pub delete: bool,

    /// Spreadsheet file, or a directory of <Sheet>.csv files
    #[arg(short = 'f', long, env = "REALMSYNC_FILE", default_value = "realm.xlsx")]
    pub file: PathBuf,

    /// Append-only run log
    #[arg(long, env = "REALMSYNC_LOG_FILE", default_value = "logs.log")]
    pub log_file: PathBuf,

    /// Mirror the log to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Exit non-zero if any row failed
    #[arg(long)]
    pub strict: bool,

    /// Print the run reports as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn passes(&self) -> Passes {
        Passes {
            groups: self.groups,
            users: self.users,
            delete: self.delete,
        }
    }
}
