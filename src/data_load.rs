use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use methylome::Region;
use std::{fs::File, io::BufReader, path::Path};

/// Reads windows from a BED file. BED intervals are half-open, so the last
/// base of each window is `end - 1`.
pub fn load_regions<P: AsRef<Path>>(path: P) -> Result<Vec<Region>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open BED at: {:?}", path.as_ref()))?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .comment(Some(b'#'))
        .flexible(true)
        .from_reader(BufReader::new(file));
    let mut record = StringRecord::new();

    let mut regions = Vec::new();
    let mut line = 0;
    while rdr.read_record(&mut record)? {
        line += 1;

        let chrom = record
            .get(0)
            .ok_or_else(|| anyhow!("Missing chromosome at line {}", line))?;
        if chrom.starts_with("track") || chrom.starts_with("browser") {
            continue;
        }

        let start: i64 = record
            .get(1)
            .ok_or_else(|| anyhow!("Missing start at line {}", line))?
            .parse()
            .with_context(|| format!("Invalid start at line {}", line))?;
        let end: i64 = record
            .get(2)
            .ok_or_else(|| anyhow!("Missing end at line {}", line))?
            .parse()
            .with_context(|| format!("Invalid end at line {}", line))?;

        let region = Region::new(chrom, start, end - 1)
            .with_context(|| format!("Invalid BED interval at line {}", line))?;
        regions.push(region);
    }

    Ok(regions)
}
