mod args;
mod calibration_table;
mod compare;
mod config;
mod flow;
mod mount;
mod pressure_table;

use anyhow::Result;
use args::{Cli, ModeSelect};
use calibration_table::calibration_table;
use clap::Parser;
use compare::compare_session;
use config::ProbeConfig;
use flow::{invert_cmd, predict_cmd};
use log::LevelFilter;
use mount::mount_angles;
use pressure_table::pressure_table;

fn main() -> Result<()> {
    let args = Cli::parse();

    let level = if args.verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    };
    env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .filter(Some("probe_cli"), level)
        .filter(Some("probe_model_core"), level)
        .init();

    let config_path = args.config.unwrap_or_else(ProbeConfig::default_path);
    let config = ProbeConfig::load(&config_path)?;

    match args.mode {
        ModeSelect::Predict(args) => {
            predict_cmd(args, &config)?;
        }
        ModeSelect::Invert(args) => {
            invert_cmd(args, &config)?;
        }
        ModeSelect::CalibrationTable(args) => {
            calibration_table(args, &config)?;
        }
        ModeSelect::PressureTable(args) => {
            pressure_table(args, &config)?;
        }
        ModeSelect::Compare(args) => {
            compare_session(args, &config)?;
        }
        ModeSelect::MountAngles(args) => {
            mount_angles(args, &config)?;
        }
    }

    Ok(())
}
