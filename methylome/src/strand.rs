use std::fmt::Display;

pub const FLAG_PAIRED: u16 = 0x1;
pub const FLAG_REVERSE: u16 = 0x10;
pub const FLAG_READ_ONE: u16 = 0x40;
pub const FLAG_READ_TWO: u16 = 0x80;

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum Strand {
    Positive,
    Negative,
}

impl Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let txt = match self {
            Strand::Positive => "+",
            Strand::Negative => "-",
        };
        write!(f, "{}", txt)
    }
}

impl Strand {
    pub fn from_flags(flags: u16) -> Self {
        if flags & FLAG_REVERSE != 0 {
            Strand::Negative
        } else {
            Strand::Positive
        }
    }
}

/// Which mate of a pair a read is. Selects the M-bias trim offsets.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum MateOrientation {
    ReadOne,
    ReadTwo,
    Unpaired,
}

impl MateOrientation {
    pub fn from_flags(flags: u16) -> Self {
        if flags & FLAG_READ_ONE != 0 {
            MateOrientation::ReadOne
        } else if flags & FLAG_READ_TWO != 0 {
            MateOrientation::ReadTwo
        } else {
            MateOrientation::Unpaired
        }
    }
}

impl Display for MateOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let txt = match self {
            MateOrientation::ReadOne => "R1",
            MateOrientation::ReadTwo => "R2",
            MateOrientation::Unpaired => "SE",
        };
        write!(f, "{}", txt)
    }
}
