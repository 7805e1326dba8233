use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "surety-node")]
#[command(about = "Flight surety ledger node")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config file
    InitConfig {
        #[arg(short, long, value_name = "OUT", default_value = "config.json")]
        out: PathBuf,
    },
    /// Replay a JSON array of calls and print one result per line
    Run {
        #[arg(short, long, value_name = "FILE", default_value = "config.json")]
        config: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        script: PathBuf,
    },
}
