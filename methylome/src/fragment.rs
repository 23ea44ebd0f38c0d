use serde::Serialize;

use crate::{
    call::Call,
    strand::{MateOrientation, Strand},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PositionedCall {
    pub position: u64,
    pub call: Call,
}

impl PositionedCall {
    pub fn new(position: u64, call: Call) -> Self {
        Self { position, call }
    }
}

/// Calls of one read, ordered as the read aligns to the reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub name: String,
    pub mate: MateOrientation,
    pub strand: Strand,
    pub calls: Vec<PositionedCall>,
}

impl Fragment {
    pub fn new(
        name: impl Into<String>,
        mate: MateOrientation,
        strand: Strand,
        calls: Vec<PositionedCall>,
    ) -> Self {
        Self {
            name: name.into(),
            mate,
            strand,
            calls,
        }
    }

    pub fn first_position(&self) -> Option<u64> {
        self.calls.first().map(|c| c.position)
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }
}
