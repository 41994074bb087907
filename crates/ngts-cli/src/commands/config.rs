use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ngts_core::config::RunConfig;

use super::write_toml;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Start from the SuperWASP setup instead of NGTS
    #[arg(long)]
    pub wasp: bool,
}

/// Print or save a full default RunConfig as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let config = if args.wasp {
        RunConfig::wasp()
    } else {
        RunConfig::default()
    };
    write_toml(&config, args.output.as_deref(), "default config")
}
