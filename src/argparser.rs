use clap::{Parser, Subcommand};

use crate::extract_methylation_matrix::MethylationMatrixArgs;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build per-read CpG methylation matrices for genomic windows.
    MethylationMatrix(MethylationMatrixArgs),
}
