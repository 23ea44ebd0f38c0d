use crate::{
    call::Call,
    convention::CoordinateConvention,
    error::PipelineError,
    fragment::{Fragment, PositionedCall},
    record::AlignmentRecord,
};

/// Pairs every placed base of a record with its methylation call.
///
/// Bases without a reference position are dropped. The convention's strand
/// offset is subtracted from each position; a base that would land before the
/// contig start is dropped as well.
///
/// # Errors
/// `PipelineError::MalformedRecord` when the call string and aligned pairs
/// differ in length or the call string holds an unknown symbol.
pub fn join_positions<C: CoordinateConvention + ?Sized>(
    record: &AlignmentRecord,
    convention: &C,
) -> Result<Fragment, PipelineError> {
    if record.calls.len() != record.aligned_pairs.len() {
        return Err(PipelineError::MalformedRecord {
            read: record.name.clone(),
            reason: format!(
                "call string length ({}) does not match aligned pairs ({})",
                record.calls.len(),
                record.aligned_pairs.len()
            ),
        });
    }

    let offset = convention.strand_offset(record.flags);
    let mut calls = Vec::with_capacity(record.calls.len());

    for (&(_, reference), &symbol) in record.aligned_pairs.iter().zip(record.calls.iter()) {
        let call = Call::from_byte(symbol).map_err(|e| PipelineError::MalformedRecord {
            read: record.name.clone(),
            reason: e.to_string(),
        })?;

        let Some(position) = reference.and_then(|p| p.checked_sub(offset)) else {
            continue;
        };
        calls.push(PositionedCall::new(position, call));
    }

    Ok(Fragment::new(
        record.name.clone(),
        record.mate(),
        record.strand(),
        calls,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convention::{BismarkDirectional, Unadjusted};

    fn positions(fragment: &Fragment) -> Vec<u64> {
        fragment.calls.iter().map(|c| c.position).collect()
    }

    #[test]
    fn test_forward_read_keeps_positions() {
        let record = AlignmentRecord::contiguous("fwd", 40, 99, 103, "Z.z");
        let fragment = join_positions(&record, &BismarkDirectional).unwrap();

        assert_eq!(positions(&fragment), vec![103, 104, 105]);
        assert_eq!(fragment.calls[0].call, Call::Methylated);
        assert_eq!(fragment.calls[1].call, Call::NotApplicable);
        assert_eq!(fragment.calls[2].call, Call::Unmethylated);
    }

    #[test]
    fn test_reverse_bisulfite_reads_shift_back() {
        for flag in [83, 163] {
            let record = AlignmentRecord::contiguous("rev", 40, flag, 103, "Z");
            let fragment = join_positions(&record, &BismarkDirectional).unwrap();
            assert_eq!(positions(&fragment), vec![102], "flag {}", flag);
        }

        for flag in [99, 147, 0, 16] {
            let record = AlignmentRecord::contiguous("fwd", 40, flag, 103, "Z");
            let fragment = join_positions(&record, &BismarkDirectional).unwrap();
            assert_eq!(positions(&fragment), vec![103], "flag {}", flag);
        }
    }

    #[test]
    fn test_unadjusted_convention() {
        let record = AlignmentRecord::contiguous("rev", 40, 83, 103, "Z");
        let fragment = join_positions(&record, &Unadjusted).unwrap();
        assert_eq!(positions(&fragment), vec![103]);
    }

    #[test]
    fn test_unplaced_bases_dropped() {
        // soft clip, two matches, insertion, match
        let record = AlignmentRecord::new(
            "clipped",
            40,
            0,
            vec![(0, None), (1, Some(10)), (2, Some(11)), (3, None), (4, Some(12))],
            b"ZzZzZ".to_vec(),
        );
        let fragment = join_positions(&record, &BismarkDirectional).unwrap();

        assert_eq!(positions(&fragment), vec![10, 11, 12]);
        let calls: Vec<Call> = fragment.calls.iter().map(|c| c.call).collect();
        assert_eq!(calls, vec![Call::Unmethylated, Call::Methylated, Call::Methylated]);
    }

    #[test]
    fn test_position_zero_on_reverse_is_dropped() {
        let record = AlignmentRecord::contiguous("edge", 40, 83, 0, "zZ");
        let fragment = join_positions(&record, &BismarkDirectional).unwrap();
        assert_eq!(positions(&fragment), vec![0]);
        assert_eq!(fragment.calls[0].call, Call::Methylated);
    }

    #[test]
    fn test_length_mismatch_is_malformed() {
        let mut record = AlignmentRecord::contiguous("short", 40, 0, 10, "Z.z");
        record.calls.pop();

        let err = join_positions(&record, &BismarkDirectional).unwrap_err();
        assert_eq!(
            err,
            PipelineError::MalformedRecord {
                read: "short".to_string(),
                reason: "call string length (2) does not match aligned pairs (3)".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_symbol_is_malformed() {
        let record = AlignmentRecord::contiguous("bad", 40, 0, 10, "Z?z");
        let err = join_positions(&record, &BismarkDirectional).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedRecord { .. }));
    }
}
