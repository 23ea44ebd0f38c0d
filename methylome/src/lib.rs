pub mod call;
pub mod config;
pub mod convention;
pub mod error;
pub mod fragment;
pub mod matrix;
pub mod pipeline;
pub mod record;
pub mod region;
pub mod strand;

pub use call::{Call, CallContext};
pub use config::{PipelineConfig, TrimOffsets};
pub use convention::{BismarkDirectional, CoordinateConvention, Unadjusted};
pub use error::PipelineError;
pub use fragment::{Fragment, PositionedCall};
pub use matrix::MethylationMatrix;
pub use pipeline::{build_matrix, extract_fragments, ExtractionStats};
pub use record::{AlignmentRecord, AlignmentSource, InMemorySource};
pub use region::Region;
pub use strand::{MateOrientation, Strand};
