use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConventionArg {
    /// Directional Bismark libraries: flags 83/163 are moved back one base.
    Bismark,
    /// Keep aligner coordinates as reported.
    Unadjusted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One row per read, one column per CpG position.
    Wide,
    /// One line per observed read/CpG call.
    Long,
}

#[derive(Parser, Debug)]
pub struct MethylationMatrixArgs {
    #[arg(short, long, required = true, help = "Coordinate sorted and indexed BAM with Bismark XM tags.")]
    pub bam: String,

    #[arg(short, long, num_args(1..), help = "Windows as <chrom>:<start>-<stop> (0-based, inclusive). Example: '-r chr19:300-500'")]
    pub region: Vec<String>,

    #[arg(long, help = "BED file of windows to process.")]
    pub regions: Option<String>,

    #[arg(long, requires = "end_coordinate", help = "Chromosome of a single window ending at --end-coordinate.")]
    pub chromosome: Option<String>,

    #[arg(long, requires = "chromosome", help = "Final coordinate of the window. Example: 500 with a window of 200 gives 300-500.")]
    pub end_coordinate: Option<i64>,

    #[arg(short, long, default_value_t = 200, help = "Size of the window in bp used with --end-coordinate.")]
    pub window: i64,

    #[arg(short, long, default_value_t = 20, help = "Minimum mapping quality for a read to be considered.")]
    pub quality: u8,

    #[arg(long = "read1-5", allow_negative_numbers = true, help = "Calls trimmed from the 5' end of read one.")]
    pub read1_5: Option<i64>,

    #[arg(long = "read1-3", allow_negative_numbers = true, help = "Calls trimmed from the 3' end of read one.")]
    pub read1_3: Option<i64>,

    #[arg(long = "read2-5", allow_negative_numbers = true, help = "Calls trimmed from the 5' end of read two.")]
    pub read2_5: Option<i64>,

    #[arg(long = "read2-3", allow_negative_numbers = true, help = "Calls trimmed from the 3' end of read two.")]
    pub read2_3: Option<i64>,

    #[arg(long, default_value_t = false, help = "Keep reads not starting at the lowest CpG of the window where they are, instead of shifting them back by one base.")]
    pub no_normalize_positions: bool,

    #[arg(long, value_enum, default_value_t = ConventionArg::Bismark)]
    pub convention: ConventionArg,

    #[arg(short, long, required = true, help = "Output directory. One tsv is written per window.")]
    pub output: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Wide)]
    pub format: OutputFormat,

    #[arg(short, long, default_value_t = 1)]
    pub threads: usize,
}
