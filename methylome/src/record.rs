use anyhow::Result;

use crate::{
    region::Region,
    strand::{MateOrientation, Strand},
};

/// One aligned, bisulfite-converted read as handed over by an alignment source.
///
/// `aligned_pairs` holds one entry per read base: the offset in the read and
/// the 0-based reference position, or `None` for inserted and soft-clipped
/// bases. `calls` is the raw `XM` call string of the read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord {
    pub name: String,
    pub mapping_quality: u8,
    pub flags: u16,
    pub aligned_pairs: Vec<(usize, Option<u64>)>,
    pub calls: Vec<u8>,
}

impl AlignmentRecord {
    pub fn new(
        name: impl Into<String>,
        mapping_quality: u8,
        flags: u16,
        aligned_pairs: Vec<(usize, Option<u64>)>,
        calls: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            mapping_quality,
            flags,
            aligned_pairs,
            calls,
        }
    }

    /// Builds a record aligned without gaps from `start`.
    pub fn contiguous(
        name: impl Into<String>,
        mapping_quality: u8,
        flags: u16,
        start: u64,
        calls: &str,
    ) -> Self {
        let aligned_pairs = (0..calls.len())
            .map(|offset| (offset, Some(start + offset as u64)))
            .collect();
        Self::new(
            name,
            mapping_quality,
            flags,
            aligned_pairs,
            calls.as_bytes().to_vec(),
        )
    }

    pub fn mate(&self) -> MateOrientation {
        MateOrientation::from_flags(self.flags)
    }

    pub fn strand(&self) -> Strand {
        Strand::from_flags(self.flags)
    }

    /// First and last placed reference position, if any base is placed.
    pub fn reference_span(&self) -> Option<(u64, u64)> {
        let mut placed = self.aligned_pairs.iter().filter_map(|(_, pos)| *pos);
        let first = placed.next()?;
        let (lo, hi) = placed.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some((lo, hi))
    }
}

/// Anything able to return the records overlapping a genomic window.
///
/// Implementations own their I/O. Errors are returned unchanged to the caller
/// of the pipeline and are fatal for that window.
pub trait AlignmentSource {
    fn fetch(&mut self, region: &Region) -> Result<Vec<AlignmentRecord>>;
}

/// Holds records in memory and serves region queries from them.
#[derive(Debug, Default, Clone)]
pub struct InMemorySource {
    contigs: Vec<(String, Vec<AlignmentRecord>)>,
    fetches: usize,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_record(&mut self, contig: &str, record: AlignmentRecord) {
        match self.contigs.iter_mut().find(|(id, _)| id == contig) {
            Some((_, records)) => records.push(record),
            None => self.contigs.push((contig.to_string(), vec![record])),
        }
    }

    pub fn with_records(contig: &str, records: Vec<AlignmentRecord>) -> Self {
        let mut source = Self::new();
        for record in records {
            source.add_record(contig, record);
        }
        source
    }

    /// Number of region queries served so far.
    pub fn fetches(&self) -> usize {
        self.fetches
    }
}

impl AlignmentSource for InMemorySource {
    fn fetch(&mut self, region: &Region) -> Result<Vec<AlignmentRecord>> {
        self.fetches += 1;

        let records = self
            .contigs
            .iter()
            .filter(|(id, _)| id == &region.chromosome)
            .flat_map(|(_, records)| records.iter())
            .filter(|record| match record.reference_span() {
                Some((lo, hi)) => lo <= region.stop && hi >= region.start,
                None => false,
            })
            .cloned()
            .collect();
        Ok(records)
    }
}
