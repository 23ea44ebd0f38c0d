use anyhow::{Context, Result};
use csv::WriterBuilder;
use methylome::{Call, ExtractionStats, Fragment, MethylationMatrix, Region};
use serde::Serialize;
use std::{fs::File, io::Write, path::Path};

#[derive(Serialize)]
struct LongRecord<'a> {
    read: &'a str,
    mate: String,
    strand: String,
    position: u64,
    call: Call,
}

#[derive(Serialize)]
pub struct WindowSummary {
    pub region: String,
    pub fetched: usize,
    pub low_quality: usize,
    pub malformed: usize,
    pub reads: usize,
    pub cpg_positions: usize,
    pub methylated_fraction: Option<f64>,
}

impl WindowSummary {
    pub fn new(region: &Region, stats: &ExtractionStats, matrix: &MethylationMatrix) -> Self {
        Self {
            region: region.to_string(),
            fetched: stats.fetched,
            low_quality: stats.low_quality,
            malformed: stats.malformed,
            reads: matrix.n_reads(),
            cpg_positions: matrix.n_positions(),
            methylated_fraction: matrix.methylated_fraction(),
        }
    }
}

/// Header `read` followed by one column per position; missing cells are empty.
pub fn write_wide<W: Write>(writer: W, matrix: &MethylationMatrix) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(b'\t')
        .flexible(false)
        .from_writer(writer);

    let mut header = Vec::with_capacity(matrix.n_positions() + 1);
    header.push("read".to_string());
    header.extend(matrix.positions.iter().map(|p| p.to_string()));
    wtr.write_record(&header)?;

    for (name, row) in matrix.read_names.iter().zip(matrix.rows.iter()) {
        let mut fields = Vec::with_capacity(row.len() + 1);
        fields.push(name.clone());
        fields.extend(row.iter().map(|cell| match cell {
            Some(value) => value.to_string(),
            None => String::new(),
        }));
        wtr.write_record(&fields)?;
    }

    wtr.flush()?;
    Ok(())
}

/// One line per observed CpG call of every fragment.
pub fn write_long<W: Write>(writer: W, fragments: &[Fragment]) -> Result<()> {
    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(writer);

    for fragment in fragments {
        for call in &fragment.calls {
            wtr.serialize(LongRecord {
                read: &fragment.name,
                mate: fragment.mate.to_string(),
                strand: fragment.strand.to_string(),
                position: call.position,
                call: call.call,
            })?;
        }
    }

    // A header is still written for windows without calls.
    if fragments.iter().all(Fragment::is_empty) {
        wtr.write_record(["read", "mate", "strand", "position", "call"])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_summary<P: AsRef<Path>>(path: P, summaries: &[WindowSummary]) -> Result<()> {
    let file = File::create(&path)
        .with_context(|| format!("Failed to create file at: {:?}", path.as_ref()))?;
    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(file);

    for summary in summaries {
        wtr.serialize(summary)?;
    }
    wtr.flush()?;
    Ok(())
}
