use anyhow::{Context, Result};
use log::debug;
use methylome::{AlignmentRecord, AlignmentSource, Region};
use rust_htslib::bam::{
    self,
    record::{Aux, Cigar},
    Read,
};
use std::path::{Path, PathBuf};

/// Indexed BAM file with Bismark `XM` call strings.
///
/// Each handle owns its own reader; open one per thread.
pub struct BamSource {
    path: PathBuf,
    reader: bam::IndexedReader,
}

impl BamSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let reader = bam::IndexedReader::from_path(&path)
            .with_context(|| format!("Failed to open indexed BAM at: {:?}", path))?;

        Ok(Self { path, reader })
    }
}

impl AlignmentSource for BamSource {
    fn fetch(&mut self, region: &Region) -> Result<Vec<AlignmentRecord>> {
        // htslib regions are half-open
        self.reader
            .fetch((
                region.chromosome.as_str(),
                region.start as i64,
                region.stop as i64 + 1,
            ))
            .with_context(|| format!("Failed to fetch {} from {:?}", region, self.path))?;

        let mut records = Vec::new();
        let mut unmapped = 0;
        for result in self.reader.records() {
            let record = result.with_context(|| {
                format!("Error reading record in {} from {:?}", region, self.path)
            })?;

            if record.is_unmapped() {
                unmapped += 1;
                continue;
            }
            records.push(to_alignment_record(&record));
        }

        if unmapped > 0 {
            debug!("{}: skipped {} unmapped records", region, unmapped);
        }
        Ok(records)
    }
}

fn to_alignment_record(record: &bam::Record) -> AlignmentRecord {
    let name = String::from_utf8_lossy(record.qname()).to_string();

    // A missing tag leaves the calls empty and the joiner rejects the record.
    let calls = match record.aux(b"XM") {
        Ok(Aux::String(xm)) => xm.as_bytes().to_vec(),
        _ => Vec::new(),
    };

    let cigar: Vec<Cigar> = record.cigar().iter().cloned().collect();
    let aligned_pairs = aligned_pairs_from_cigar(record.pos(), &cigar);

    AlignmentRecord::new(name, record.mapq(), record.flags(), aligned_pairs, calls)
}

/// One `(read offset, reference position)` pair per read base.
///
/// Inserted and soft-clipped bases have no reference position. Deletions and
/// skipped regions consume reference only and produce no pair, so the list
/// stays parallel to the read sequence and its `XM` string.
pub fn aligned_pairs_from_cigar(pos: i64, cigar: &[Cigar]) -> Vec<(usize, Option<u64>)> {
    let mut read_pos: usize = 0;
    let mut ref_pos: i64 = pos;
    let mut pairs = Vec::new();

    for op in cigar {
        match *op {
            Cigar::Match(len) | Cigar::Equal(len) | Cigar::Diff(len) => {
                for i in 0..len as usize {
                    let reference = ref_pos + i as i64;
                    pairs.push((read_pos + i, u64::try_from(reference).ok()));
                }
                read_pos += len as usize;
                ref_pos += len as i64;
            }
            Cigar::Ins(len) | Cigar::SoftClip(len) => {
                for i in 0..len as usize {
                    pairs.push((read_pos + i, None));
                }
                read_pos += len as usize;
            }
            Cigar::Del(len) | Cigar::RefSkip(len) => {
                ref_pos += len as i64;
            }
            Cigar::HardClip(_) | Cigar::Pad(_) => {}
        }
    }

    pairs
}
