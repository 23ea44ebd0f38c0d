use crate::{config::TrimOffsets, fragment::Fragment};

/// Removes M-bias affected calls from both ends of a fragment.
///
/// A 3' offset of zero leaves the end untouched. Fragments shorter than the
/// combined offsets become empty.
pub fn trim_mbias(mut fragment: Fragment, offsets: &TrimOffsets) -> Fragment {
    let (five_prime, three_prime) = offsets.for_mate(fragment.mate);
    let len = fragment.calls.len();

    let end = if three_prime == 0 {
        len
    } else {
        len.saturating_sub(three_prime)
    };
    let start = five_prime.min(end);

    fragment.calls.truncate(end);
    fragment.calls.drain(..start);
    fragment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        call::Call,
        fragment::PositionedCall,
        strand::{MateOrientation, Strand},
    };

    fn fragment(mate: MateOrientation, n: u64) -> Fragment {
        Fragment::new(
            "read",
            mate,
            Strand::Positive,
            (0..n).map(|p| PositionedCall::new(p, Call::Methylated)).collect(),
        )
    }

    fn positions(fragment: &Fragment) -> Vec<u64> {
        fragment.calls.iter().map(|c| c.position).collect()
    }

    fn offsets(read1_5: usize, read1_3: usize, read2_5: usize, read2_3: usize) -> TrimOffsets {
        TrimOffsets {
            read1_5,
            read1_3,
            read2_5,
            read2_3,
        }
    }

    #[test]
    fn test_zero_three_prime_keeps_end() {
        let trimmed = trim_mbias(fragment(MateOrientation::ReadOne, 10), &offsets(2, 0, 0, 0));
        assert_eq!(positions(&trimmed), (2..10).collect::<Vec<u64>>());
    }

    #[test]
    fn test_both_ends() {
        let trimmed = trim_mbias(fragment(MateOrientation::ReadOne, 10), &offsets(2, 3, 0, 0));
        assert_eq!(positions(&trimmed), vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_read_two_offsets() {
        let trimmed = trim_mbias(fragment(MateOrientation::ReadTwo, 10), &offsets(5, 5, 1, 2));
        assert_eq!(positions(&trimmed), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_unpaired_untouched() {
        let trimmed = trim_mbias(fragment(MateOrientation::Unpaired, 4), &offsets(1, 1, 1, 1));
        assert_eq!(positions(&trimmed), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_over_trimming_gives_empty_fragment() {
        let read_one = |len| fragment(MateOrientation::ReadOne, len);

        assert!(trim_mbias(read_one(3), &offsets(5, 0, 0, 0)).is_empty());
        assert!(trim_mbias(read_one(3), &offsets(0, 5, 0, 0)).is_empty());
        assert!(trim_mbias(read_one(4), &offsets(2, 2, 0, 0)).is_empty());
        assert!(trim_mbias(read_one(0), &offsets(1, 1, 0, 0)).is_empty());
    }
}
