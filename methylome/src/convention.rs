//! Coordinate conventions of bisulfite libraries.
//!
//! A convention decides how far a read's calls are moved before they are
//! placed on the reference and how fragments anchored at different CpG
//! starts are reconciled. Both are heuristics tied to the library protocol.

use crate::fragment::Fragment;

/// SAM flag of a reverse-strand read one in a proper pair (1 + 2 + 16 + 64).
pub const BISMARK_REVERSE_READ_ONE: u16 = 83;
/// SAM flag of a read two whose mate is reverse (1 + 2 + 32 + 128).
pub const BISMARK_REVERSE_READ_TWO: u16 = 163;

pub trait CoordinateConvention: Send + Sync {
    /// Bases subtracted from every reference position of a record.
    fn strand_offset(&self, flags: u16) -> u64;

    /// Reconciles fragment coordinates before assembly.
    fn normalize(&self, fragments: Vec<Fragment>) -> Vec<Fragment>;
}

/// Directional Bismark libraries.
///
/// Reads of the two reverse orientations report the cytosine of a CpG on the
/// G, one base downstream of the forward convention, so they are moved back
/// by one base.
#[derive(Debug, Clone, Copy, Default)]
pub struct BismarkDirectional;

impl CoordinateConvention for BismarkDirectional {
    fn strand_offset(&self, flags: u16) -> u64 {
        if flags == BISMARK_REVERSE_READ_ONE || flags == BISMARK_REVERSE_READ_TWO {
            1
        } else {
            0
        }
    }

    fn normalize(&self, fragments: Vec<Fragment>) -> Vec<Fragment> {
        normalize_to_anchor(fragments)
    }
}

/// Places calls exactly where the aligner reports them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unadjusted;

impl CoordinateConvention for Unadjusted {
    fn strand_offset(&self, _flags: u16) -> u64 {
        0
    }

    fn normalize(&self, fragments: Vec<Fragment>) -> Vec<Fragment> {
        fragments
    }
}

/// Shifts every fragment not starting at the lowest observed first position
/// back by one base.
///
/// Empty fragments neither set the anchor nor move. This is a single uniform
/// step per fragment; it does not check that shifted and unshifted fragments
/// refer to the same CpG when a window holds several of them.
pub fn normalize_to_anchor(fragments: Vec<Fragment>) -> Vec<Fragment> {
    let anchor = match fragments.iter().filter_map(Fragment::first_position).min() {
        Some(anchor) => anchor,
        None => return fragments,
    };

    fragments
        .into_iter()
        .map(|mut fragment| {
            match fragment.first_position() {
                Some(first) if first != anchor => {
                    for call in fragment.calls.iter_mut() {
                        call.position = call.position.saturating_sub(1);
                    }
                }
                _ => {}
            }
            fragment
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        call::Call,
        fragment::PositionedCall,
        strand::{MateOrientation, Strand},
    };

    fn fragment(name: &str, positions: &[u64]) -> Fragment {
        Fragment::new(
            name,
            MateOrientation::ReadOne,
            Strand::Positive,
            positions
                .iter()
                .map(|&p| PositionedCall::new(p, Call::Methylated))
                .collect(),
        )
    }

    fn positions(fragment: &Fragment) -> Vec<u64> {
        fragment.calls.iter().map(|c| c.position).collect()
    }

    #[test]
    fn test_strand_offset() {
        let convention = BismarkDirectional;
        assert_eq!(convention.strand_offset(83), 1);
        assert_eq!(convention.strand_offset(163), 1);
        assert_eq!(convention.strand_offset(99), 0);
        assert_eq!(convention.strand_offset(147), 0);
        assert_eq!(convention.strand_offset(16), 0);
        assert_eq!(Unadjusted.strand_offset(83), 0);
    }

    #[test]
    fn test_normalize_to_lowest_anchor() {
        let fragments = vec![
            fragment("a", &[100, 110]),
            fragment("b", &[101, 111, 120]),
            fragment("c", &[101]),
        ];

        let normalized = BismarkDirectional.normalize(fragments);

        assert_eq!(positions(&normalized[0]), vec![100, 110]);
        assert_eq!(positions(&normalized[1]), vec![100, 110, 119]);
        assert_eq!(positions(&normalized[2]), vec![100]);
        assert!(normalized.iter().all(|f| f.first_position() == Some(100)));
    }

    #[test]
    fn test_empty_fragments_are_ignored() {
        let fragments = vec![
            fragment("empty", &[]),
            fragment("a", &[105]),
            fragment("b", &[106]),
        ];

        let normalized = normalize_to_anchor(fragments);

        assert!(normalized[0].is_empty());
        assert_eq!(positions(&normalized[1]), vec![105]);
        assert_eq!(positions(&normalized[2]), vec![105]);
    }

    #[test]
    fn test_all_empty() {
        let normalized = normalize_to_anchor(vec![fragment("a", &[]), fragment("b", &[])]);
        assert_eq!(normalized.len(), 2);
        assert!(normalized.iter().all(Fragment::is_empty));
        assert!(normalize_to_anchor(Vec::new()).is_empty());
    }

    #[test]
    fn test_unadjusted_is_identity() {
        let fragments = vec![fragment("a", &[100]), fragment("b", &[101])];
        assert_eq!(Unadjusted.normalize(fragments.clone()), fragments);
    }
}
