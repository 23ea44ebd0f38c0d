use anyhow::Result;
use log::{debug, warn};

use crate::{
    config::PipelineConfig,
    convention::CoordinateConvention,
    error::PipelineError,
    fragment::Fragment,
    matrix::MethylationMatrix,
    record::AlignmentSource,
    region::Region,
};

pub mod filter;
pub mod join;
pub mod trim;
pub mod window;

pub use filter::passes_quality;
pub use join::join_positions;
pub use trim::trim_mbias;
pub use window::filter_window_cpg;

/// Per-window record accounting, reported at debug level.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionStats {
    pub fetched: usize,
    pub low_quality: usize,
    pub malformed: usize,
    pub fragments: usize,
}

/// Runs every stage up to assembly and returns one fragment per accepted read.
///
/// Fragments without CpG calls in the window are kept as empty fragments so
/// that rows stay aligned with the accepted reads.
///
/// # Errors
/// `PipelineError::InvalidConfiguration` for an inverted region, raised before
/// the source is queried. Errors of the source are returned unchanged.
pub fn extract_fragments<S, C>(
    source: &mut S,
    region: &Region,
    config: &PipelineConfig,
    convention: &C,
) -> Result<(Vec<Fragment>, ExtractionStats)>
where
    S: AlignmentSource + ?Sized,
    C: CoordinateConvention + ?Sized,
{
    if region.start > region.stop {
        return Err(PipelineError::invalid_configuration(format!(
            "region start ({}) is greater than stop ({})",
            region.start, region.stop
        ))
        .into());
    }

    let records = source.fetch(region)?;
    let mut stats = ExtractionStats {
        fetched: records.len(),
        ..Default::default()
    };

    let mut fragments = Vec::with_capacity(records.len());
    for record in &records {
        if !passes_quality(record, config.min_mapping_quality) {
            stats.low_quality += 1;
            continue;
        }

        let fragment = match join_positions(record, convention) {
            Ok(fragment) => fragment,
            Err(e) => {
                warn!("Skipping record in {}: {}", region, e);
                stats.malformed += 1;
                continue;
            }
        };

        let fragment = match &config.trim_offsets {
            Some(offsets) => trim_mbias(fragment, offsets),
            None => fragment,
        };

        fragments.push(filter_window_cpg(fragment, region));
    }

    if config.normalize_positions {
        fragments = convention.normalize(fragments);
    }

    stats.fragments = fragments.len();
    debug!(
        "{}: {} records fetched, {} below mapping quality {}, {} malformed, {} fragments",
        region,
        stats.fetched,
        stats.low_quality,
        config.min_mapping_quality,
        stats.malformed,
        stats.fragments
    );

    Ok((fragments, stats))
}

/// Builds the read x CpG methylation matrix of one genomic window.
///
/// Fragments are reconciled by the convention's normalizer unless
/// `config.normalize_positions` is off.
///
/// # Examples
/// ```
/// use methylome::{
///     build_matrix, AlignmentRecord, BismarkDirectional, InMemorySource, PipelineConfig, Region,
/// };
///
/// let mut source = InMemorySource::with_records(
///     "chr1",
///     vec![AlignmentRecord::contiguous("read", 30, 99, 100, "..Z...z")],
/// );
/// let region = Region::new("chr1", 100, 110).unwrap();
///
/// let config = PipelineConfig::new(20);
/// let matrix = build_matrix(&mut source, &region, &config, &BismarkDirectional).unwrap();
/// assert_eq!(matrix.positions, vec![102, 106]);
/// assert_eq!(matrix.rows, vec![vec![Some(1), Some(0)]]);
/// ```
pub fn build_matrix<S, C>(
    source: &mut S,
    region: &Region,
    config: &PipelineConfig,
    convention: &C,
) -> Result<MethylationMatrix>
where
    S: AlignmentSource + ?Sized,
    C: CoordinateConvention + ?Sized,
{
    let (fragments, _) = extract_fragments(source, region, config, convention)?;
    Ok(MethylationMatrix::from_fragments(&fragments))
}
