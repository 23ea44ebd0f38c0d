use crate::record::AlignmentRecord;

/// Keeps records whose mapping quality reaches `min_mapping_quality`.
pub fn passes_quality(record: &AlignmentRecord, min_mapping_quality: u8) -> bool {
    record.mapping_quality >= min_mapping_quality
}
