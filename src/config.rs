use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::filter::Filter;

#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(about = "Terminal task list backed by a remote task API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base URL of the task API, e.g. http://localhost:5000
    #[arg(long, env = "TASKBOARD_BASE_URL")]
    pub base_url: String,

    /// Where diagnostics are written while the terminal UI is running
    #[arg(long, env = "TASKBOARD_LOG_FILE", default_value = "taskboard.log")]
    pub log_file: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the task list once and exit
    List {
        /// all, Low or High
        #[arg(short, long, default_value = "all")]
        filter: Filter,
    },
}
