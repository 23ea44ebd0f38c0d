pub mod bam;

pub use bam::BamSource;
