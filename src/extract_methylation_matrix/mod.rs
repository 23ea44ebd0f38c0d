use ahash::AHashSet;
use anyhow::{bail, Context, Result};
use bytesize::ByteSize;
use humantime::format_duration;
use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use log::{error, info, warn};
use methylome::{
    extract_fragments, BismarkDirectional, CoordinateConvention, MethylationMatrix,
    PipelineConfig, Region, TrimOffsets, Unadjusted,
};
use rayon::prelude::*;
use std::{
    fmt::Write as FmtWrite,
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
    time::Instant,
};

use crate::{data::BamSource, data_load::load_regions};

pub mod args;
pub mod writer;

pub use args::{ConventionArg, MethylationMatrixArgs, OutputFormat};
use writer::{write_long, write_summary, write_wide, WindowSummary};

pub fn extract_methylation_matrix(args: MethylationMatrixArgs) -> Result<()> {
    info!(
        "Running epimatrix 'methylation-matrix' with {} threads",
        &args.threads
    );

    // Configuration is validated before the BAM is opened.
    let regions = collect_regions(&args)?;
    let config = build_config(&args)?;
    let convention: Box<dyn CoordinateConvention> = match args.convention {
        ConventionArg::Bismark => Box::new(BismarkDirectional),
        ConventionArg::Unadjusted => Box::new(Unadjusted),
    };
    info!("Windows to process: {}", regions.len());

    let outdir = Path::new(&args.output);
    fs::create_dir_all(outdir)
        .with_context(|| format!("Could not create output directory: {:?}", outdir))?;

    let bam_size = fs::metadata(&args.bam)
        .with_context(|| format!("Could not read BAM file: '{}'", args.bam))?
        .len();
    info!("Reading alignments from '{}' ({})", args.bam, ByteSize::b(bam_size));

    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()
        .context("Could not initialize threadpool")?;

    let pb = ProgressBar::new(regions.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
        )?
        .with_key("eta", |state: &ProgressState, w: &mut dyn FmtWrite| {
            let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
        })
        .progress_chars("#>-"),
    );

    let extraction_duration = Instant::now();
    let bam_path = PathBuf::from(&args.bam);

    // One BAM handle per rayon job; handles are never shared between threads.
    let results: Vec<(Region, Result<WindowSummary>)> = regions
        .par_iter()
        .map_init(
            || BamSource::open(&bam_path),
            |source, region| {
                let result = match source {
                    Ok(source) => process_window(
                        source,
                        region,
                        &config,
                        convention.as_ref(),
                        outdir,
                        args.format,
                    ),
                    Err(e) => Err(anyhow::anyhow!("{:#}", e)),
                };
                pb.inc(1);
                (region.clone(), result)
            },
        )
        .collect();

    pb.finish_with_message("Finished processing all windows.");

    let mut summaries = Vec::with_capacity(results.len());
    let mut failed = 0;
    for (region, result) in results {
        match result {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                error!("Window {} failed: {:#}", region, e);
                failed += 1;
            }
        }
    }

    write_summary(outdir.join("summary.tsv"), &summaries)?;
    info!(
        "Processed {} windows in {}",
        summaries.len(),
        format_duration(extraction_duration.elapsed()).to_string()
    );

    if failed > 0 {
        bail!("{} of {} windows failed", failed, failed + summaries.len());
    }
    Ok(())
}

fn process_window(
    source: &mut BamSource,
    region: &Region,
    config: &PipelineConfig,
    convention: &dyn CoordinateConvention,
    outdir: &Path,
    format: OutputFormat,
) -> Result<WindowSummary> {
    let (fragments, stats) = extract_fragments(source, region, config, convention)?;
    let matrix = MethylationMatrix::from_fragments(&fragments);

    let outpath = outdir.join(format!("{}.tsv", region.to_file_stem()));
    let outfile = File::create(&outpath)
        .with_context(|| format!("Failed to create file at: {:?}", outpath))?;
    let writer = BufWriter::new(outfile);

    match format {
        OutputFormat::Wide => write_wide(writer, &matrix)?,
        OutputFormat::Long => write_long(writer, &fragments)?,
    }

    Ok(WindowSummary::new(region, &stats, &matrix))
}

fn build_config(args: &MethylationMatrixArgs) -> Result<PipelineConfig> {
    let trim_offsets =
        TrimOffsets::from_optional(args.read1_5, args.read1_3, args.read2_5, args.read2_3)?;
    if let Some(trims) = &trim_offsets {
        info!(
            "M-bias trimming enabled: R1 5'={} 3'={}, R2 5'={} 3'={}",
            trims.read1_5, trims.read1_3, trims.read2_5, trims.read2_3
        );
    }

    Ok(PipelineConfig::new(args.quality)
        .with_trim_offsets(trim_offsets)
        .with_normalization(!args.no_normalize_positions))
}

fn collect_regions(args: &MethylationMatrixArgs) -> Result<Vec<Region>> {
    let mut regions = args
        .region
        .iter()
        .map(|r| r.parse::<Region>())
        .collect::<Result<Vec<Region>>>()?;

    if let Some(bed) = &args.regions {
        let mut from_bed =
            load_regions(bed).with_context(|| format!("Error loading regions from: '{}'", bed))?;
        info!("Loaded {} windows from '{}'", from_bed.len(), bed);
        regions.append(&mut from_bed);
    }

    if let (Some(chromosome), Some(end)) = (&args.chromosome, args.end_coordinate) {
        regions.push(Region::ending_at(chromosome.as_str(), end, args.window)?);
    }

    // Each window owns one output file; a repeated window would be written twice.
    let mut seen = AHashSet::with_capacity(regions.len());
    let supplied = regions.len();
    regions.retain(|region| seen.insert(region.clone()));
    if regions.len() < supplied {
        warn!("Ignoring {} duplicate windows", supplied - regions.len());
    }

    if regions.is_empty() {
        bail!(
            "No windows supplied. Use --region, --regions or --chromosome with --end-coordinate."
        );
    }
    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use methylome::PipelineError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: MethylationMatrixArgs,
    }

    fn parse(cli: &[&str]) -> MethylationMatrixArgs {
        let mut argv = vec!["epimatrix", "-b", "in.bam", "-o", "out"];
        argv.extend_from_slice(cli);
        TestCli::parse_from(argv).args
    }

    #[test]
    fn test_collect_regions() -> Result<()> {
        let args = parse(&[
            "-r",
            "chr19:100-200",
            "chr2:5-6",
            "--chromosome",
            "chr19",
            "--end-coordinate",
            "500",
        ]);
        let regions = collect_regions(&args)?;
        assert_eq!(
            regions,
            vec![
                Region::new("chr19", 100, 200)?,
                Region::new("chr2", 5, 6)?,
                Region::new("chr19", 300, 500)?,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_duplicate_windows_are_collected_once() -> Result<()> {
        let mut bed = NamedTempFile::new()?;
        writeln!(bed, "chr1\t100\t111")?;
        writeln!(bed, "chr2\t0\t10")?;
        let bed_path = bed.path().to_string_lossy().to_string();

        let args = parse(&[
            "-r",
            "chr1:100-110",
            "chr3:1-2",
            "chr1:100-110",
            "--regions",
            bed_path.as_str(),
        ]);
        let regions = collect_regions(&args)?;

        assert_eq!(
            regions,
            vec![
                Region::new("chr1", 100, 110)?,
                Region::new("chr3", 1, 2)?,
                Region::new("chr2", 0, 9)?,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_no_regions() {
        let args = parse(&[]);
        assert!(collect_regions(&args).is_err());
    }

    #[test]
    fn test_inverted_region_is_configuration_error() {
        let args = parse(&["-r", "chr1:200-100"]);
        let err = collect_regions(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_build_config() -> Result<()> {
        let args = parse(&[
            "-r",
            "chr1:1-2",
            "-q",
            "30",
            "--read1-5",
            "2",
            "--no-normalize-positions",
        ]);
        let config = build_config(&args)?;

        assert_eq!(config.min_mapping_quality, 30);
        assert!(!config.normalize_positions);
        let trims = config.trim_offsets.unwrap();
        assert_eq!((trims.read1_5, trims.read1_3, trims.read2_5, trims.read2_3), (2, 0, 0, 0));
        Ok(())
    }

    #[test]
    fn test_negative_trim_rejected() {
        let args = parse(&["-r", "chr1:1-2", "--read2-3", "-4"]);
        let err = build_config(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let args = parse(&["-r", "chr1:1-2"]);
        assert_eq!(args.quality, 20);
        assert_eq!(args.window, 200);
        assert_eq!(args.convention, ConventionArg::Bismark);
        assert_eq!(args.format, OutputFormat::Wide);

        let config = build_config(&args)?;
        assert!(config.trim_offsets.is_none());
        assert!(config.normalize_positions);
        Ok(())
    }
}
