use anyhow::Result;

use crate::{error::PipelineError, strand::MateOrientation};

/// M-bias trim offsets, counted in placed bases from each end of a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrimOffsets {
    pub read1_5: usize,
    pub read1_3: usize,
    pub read2_5: usize,
    pub read2_3: usize,
}

impl TrimOffsets {
    /// Builds trim offsets from optional user values.
    ///
    /// Returns `Ok(None)` when no value is given, which disables trimming.
    /// Values left out of a partially configured set count as zero.
    ///
    /// # Errors
    /// Returns `PipelineError::InvalidConfiguration` for negative values.
    ///
    /// # Examples
    /// ```
    /// use methylome::TrimOffsets;
    ///
    /// assert_eq!(TrimOffsets::from_optional(None, None, None, None).unwrap(), None);
    ///
    /// let trims = TrimOffsets::from_optional(Some(2), None, None, Some(5)).unwrap().unwrap();
    /// assert_eq!(trims.read1_5, 2);
    /// assert_eq!(trims.read1_3, 0);
    /// ```
    pub fn from_optional(
        read1_5: Option<i64>,
        read1_3: Option<i64>,
        read2_5: Option<i64>,
        read2_3: Option<i64>,
    ) -> Result<Option<Self>> {
        let values = [
            ("read1_5", read1_5),
            ("read1_3", read1_3),
            ("read2_5", read2_5),
            ("read2_3", read2_3),
        ];

        if values.iter().all(|(_, v)| v.is_none()) {
            return Ok(None);
        }

        let mut checked = [0usize; 4];
        for (slot, (name, value)) in checked.iter_mut().zip(values) {
            let value = value.unwrap_or(0);
            if value < 0 {
                return Err(PipelineError::invalid_configuration(format!(
                    "trim offset {} cannot be negative ({})",
                    name, value
                ))
                .into());
            }
            *slot = value as usize;
        }

        Ok(Some(Self {
            read1_5: checked[0],
            read1_3: checked[1],
            read2_5: checked[2],
            read2_3: checked[3],
        }))
    }

    /// `(five_prime, three_prime)` offsets for a mate. Unpaired reads are never trimmed.
    pub fn for_mate(&self, mate: MateOrientation) -> (usize, usize) {
        match mate {
            MateOrientation::ReadOne => (self.read1_5, self.read1_3),
            MateOrientation::ReadTwo => (self.read2_5, self.read2_3),
            MateOrientation::Unpaired => (0, 0),
        }
    }
}

/// Read-only settings shared by every window query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub min_mapping_quality: u8,
    pub trim_offsets: Option<TrimOffsets>,
    pub normalize_positions: bool,
}

impl PipelineConfig {
    /// Quality threshold only. Trimming is off and anchor normalization is on.
    pub fn new(min_mapping_quality: u8) -> Self {
        Self {
            min_mapping_quality,
            trim_offsets: None,
            normalize_positions: true,
        }
    }

    pub fn with_trim_offsets(mut self, trim_offsets: Option<TrimOffsets>) -> Self {
        self.trim_offsets = trim_offsets;
        self
    }

    pub fn with_normalization(mut self, normalize_positions: bool) -> Self {
        self.normalize_positions = normalize_positions;
        self
    }

    pub fn mbias_filtering(&self) -> bool {
        self.trim_offsets.is_some()
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(20)
    }
}
