use anyhow::Result;
use clap::Parser;
use humantime::format_duration;
use log::info;
use std::time::Instant;

mod argparser;
mod data;
mod data_load;
mod extract_methylation_matrix;

use argparser::{Args, Commands};
use extract_methylation_matrix::extract_methylation_matrix;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let total_duration = Instant::now();

    match args.command {
        Commands::MethylationMatrix(matrix_args) => {
            extract_methylation_matrix(matrix_args)?;
        }
    }

    info!(
        "Total time: {}",
        format_duration(total_duration.elapsed()).to_string()
    );
    Ok(())
}
