use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use env_logger::Env;

use marshal::argsets::{ReadArgs, RunArgs};
use marshal::command;
use marshal::constants::{defaults, envvars};
use marshal::helpers::{base_path, load_dotenv};

const CMD_RUN: &str = "run";
const CMD_READ: &str = "read";

fn main() -> Result<()> {
    load_dotenv();
    env_logger::Builder::from_env(Env::default().filter_or(envvars::LOG_LEVEL, defaults::LOG_LEVEL))
        .init();

    let mut args = pico_args::Arguments::from_env();
    let subcommand = args.subcommand()?;
    let software: PathBuf = args
        .opt_value_from_str("--software")?
        .unwrap_or_else(|| base_path::SOFTWARE_CONFIG.clone());
    let hardware: PathBuf = args
        .opt_value_from_str("--hardware")?
        .unwrap_or_else(|| base_path::HARDWARE_CONFIG.clone());
    let free = free_args(args.finish())?;

    let result = match subcommand.as_deref() {
        None | Some(CMD_RUN) if free.is_empty() => command::run(RunArgs { software, hardware }),
        None | Some(CMD_RUN) => Err(anyhow!("Unexpected arguments: {}", free.join(" "))),
        Some(CMD_READ) if free.is_empty() => Err(anyhow!("'read' needs at least one name")),
        Some(CMD_READ) => command::read(ReadArgs {
            hardware,
            names: free,
        }),
        Some(other) => Err(anyhow!(
            "Unknown subcommand '{}'; must be one of 'run', 'read'",
            other
        )),
    };
    if let Err(e) = &result {
        log::error!("{:#}", e);
    }
    result
}

fn free_args(args: Vec<OsString>) -> Result<Vec<String>> {
    args.into_iter()
        .map(|a| {
            a.into_string()
                .map_err(|a| anyhow!("Argument {:?} is not valid UTF-8", a))
        })
        .collect()
}
