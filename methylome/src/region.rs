use anyhow::{Context, Result};
use std::{fmt::Display, str::FromStr};

use crate::error::PipelineError;

/// Inclusive genomic window `[start, stop]` in 0-based reference coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    pub chromosome: String,
    pub start: u64,
    pub stop: u64,
}

impl Region {
    /// Validates and constructs a region.
    ///
    /// # Errors
    /// Returns `PipelineError::InvalidConfiguration` for negative coordinates
    /// or when `start > stop`.
    pub fn new(chromosome: impl Into<String>, start: i64, stop: i64) -> Result<Self> {
        let chromosome = chromosome.into();

        if chromosome.is_empty() {
            return Err(
                PipelineError::invalid_configuration("region has an empty chromosome name").into(),
            );
        }
        if start < 0 || stop < 0 {
            return Err(PipelineError::invalid_configuration(format!(
                "negative coordinate in region {}:{}-{}",
                chromosome, start, stop
            ))
            .into());
        }
        if start > stop {
            return Err(PipelineError::invalid_configuration(format!(
                "region start ({}) is greater than stop ({})",
                start, stop
            ))
            .into());
        }

        Ok(Self {
            chromosome,
            start: start as u64,
            stop: stop as u64,
        })
    }

    /// Window of `window` bases ending at `end`, clamped at the contig start.
    pub fn ending_at(chromosome: impl Into<String>, end: i64, window: i64) -> Result<Self> {
        if window < 0 {
            return Err(PipelineError::invalid_configuration(format!(
                "negative window size {}",
                window
            ))
            .into());
        }
        Region::new(chromosome, (end - window).max(0), end)
    }

    pub fn contains(&self, position: u64) -> bool {
        position >= self.start && position <= self.stop
    }

    pub fn len(&self) -> u64 {
        self.stop - self.start + 1
    }

    /// File name friendly representation, `chrom_start_stop`.
    pub fn to_file_stem(&self) -> String {
        format!("{}_{}_{}", self.chromosome, self.start, self.stop)
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.chromosome, self.start, self.stop)
    }
}

impl FromStr for Region {
    type Err = anyhow::Error;

    /// Parses `chrom:start-stop`. Thousands separators are accepted.
    fn from_str(s: &str) -> Result<Self> {
        let (chromosome, range) = s.rsplit_once(':').ok_or_else(|| {
            PipelineError::invalid_configuration(format!(
                "could not parse region '{}'. Expected format: '<chrom>:<start>-<stop>'",
                s
            ))
        })?;
        let (start, stop) = range.split_once('-').ok_or_else(|| {
            PipelineError::invalid_configuration(format!(
                "could not parse range '{}' in region '{}'",
                range, s
            ))
        })?;

        let parse = |value: &str| -> Result<i64> {
            value
                .replace(',', "")
                .trim()
                .parse::<i64>()
                .map_err(|_| {
                    PipelineError::invalid_configuration(format!(
                        "invalid coordinate '{}' in region '{}'",
                        value, s
                    ))
                })
                .with_context(|| format!("Failed to parse region '{}'", s))
        };

        Region::new(chromosome, parse(start)?, parse(stop)?)
    }
}
